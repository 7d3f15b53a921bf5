use serde::Serialize;

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Records moved to `Processing` by this run
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Wall-clock time from dispatch until the last call resolved
    pub elapsed_ms: u64,
}

impl BatchSummary {
    /// True when the run found no `Idle` records
    pub fn is_noop(&self) -> bool {
        self.dispatched == 0
    }
}
