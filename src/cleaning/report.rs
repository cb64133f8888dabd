//! Per-call cleaning diagnostics
//!
//! Every stage returns its counters as a value; nothing here writes to an
//! output stream. Callers decide whether to log, aggregate or drop them.

/// Counters from one shared-vertex snapping pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SnapReport {
    /// Vertices found within the threshold of the reference boundary
    pub candidates: usize,
    /// Candidates moved onto a reference vertex
    pub snapped: usize,
    /// Consecutive duplicates removed after snapping
    pub collapsed: usize,
    /// Candidates with no reference vertex inside the search radius
    pub too_far: usize,
    /// Reference vertices inserted into the ring
    pub injected: usize,
    /// Isolated candidates discarded as noise
    pub false_positives: usize,
}

impl SnapReport {
    pub fn has_changes(&self) -> bool {
        self.snapped > 0 || self.injected > 0
    }

    /// Compact one-line form, e.g. `SN: 4 TF: 0 IJ: 1 FP: 2`
    ///
    /// `SN` counts net snapped vertices (snapped minus collapsed).
    pub fn summary(&self) -> String {
        format!(
            "SN: {} TF: {} IJ: {} FP: {}",
            self.snapped.saturating_sub(self.collapsed),
            self.too_far,
            self.injected,
            self.false_positives
        )
    }
}

/// What happened to a single ring
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RingReport {
    pub duplicates_removed: usize,
    pub reversals: usize,
    pub snap: Option<SnapReport>,
}

impl RingReport {
    pub fn has_changes(&self) -> bool {
        self.duplicates_removed > 0
            || self.reversals > 0
            || self.snap.is_some_and(|s| s.has_changes())
    }
}

/// Report for a whole shape, keyed by the caller's label
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShapeReport {
    pub label: String,
    pub outer: RingReport,
    pub inner: Vec<RingReport>,
}

impl ShapeReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn rings(&self) -> impl Iterator<Item = &RingReport> {
        std::iter::once(&self.outer).chain(self.inner.iter())
    }

    pub fn has_changes(&self) -> bool {
        self.rings().any(|r| r.has_changes())
    }

    pub fn duplicates_removed(&self) -> usize {
        self.rings().map(|r| r.duplicates_removed).sum()
    }

    pub fn reversals(&self) -> usize {
        self.rings().map(|r| r.reversals).sum()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {} duplicate points removed, {} reversals",
            self.label,
            self.duplicates_removed(),
            self.reversals()
        );
        if let Some(snap) = self.outer.snap {
            summary.push_str(&format!(", {}", snap.summary()));
        }
        summary
    }
}
