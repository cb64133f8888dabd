/// Fatal conditions raised while cleaning a single polygon
///
/// Both variants abort conversion of the polygon named by `label`; the caller
/// decides whether to skip the item or abort the batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CleanError {
    #[error("{label}: ring has {distinct} distinct points, at least 3 are required")]
    TooFewPoints { label: String, distinct: usize },

    #[error(
        "{label}: self-intersections not resolved after {reversals} reversals (cap {cap}), input needs manual review"
    )]
    ReversalCapExceeded {
        label: String,
        reversals: usize,
        cap: usize,
    },
}

impl CleanError {
    pub fn label(&self) -> &str {
        match self {
            CleanError::TooFewPoints { label, .. } => label,
            CleanError::ReversalCapExceeded { label, .. } => label,
        }
    }
}
