use serde::{Deserialize, Serialize};

use super::Shape;

/// A quality-graded sub-region of an item or bin
///
/// Lower grades are more severe. The zone is digitized independently of its
/// parent and usually shares part of the parent's boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "Quality")]
    pub quality: u32,
    #[serde(rename = "Geometry")]
    pub shape: Shape,
}

impl Zone {
    pub fn new(quality: u32, shape: Shape) -> Self {
        Self { quality, shape }
    }

    /// Diagnostic label used while cleaning, e.g. `zone_3_q1`
    pub fn label(&self, index: usize) -> String {
        format!("zone_{}_q{}", index, self.quality)
    }
}
