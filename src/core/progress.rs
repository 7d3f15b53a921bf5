use serde::{Deserialize, Serialize};
use crate::core::{ImageStatus, RecordId};

/// Progress message type
#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProgressType {
    Start,
    Progress,
    Complete,
    Error,
}

/// Progress event emitted while a batch runs.
///
/// One `Start` event, one `Progress` or `Error` event per resolved record,
/// and one `Complete` event once every call has resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Progress type (start, progress, complete, error)
    pub progress_type: ProgressType,
    /// Number of resolved calls
    pub completed_tasks: usize,
    /// Number of calls dispatched in this batch
    pub total_tasks: usize,
    /// Progress percentage (0-100)
    pub progress_percentage: usize,
    /// Current status message
    pub status: String,
    /// Record this event is about
    #[serde(default)]
    pub record_id: Option<RecordId>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Status the record ended in
    #[serde(default)]
    pub record_status: Option<ImageStatus>,
    /// User-facing error message for failed records
    #[serde(default)]
    pub error: Option<String>,
}

impl Progress {
    /// Create a new Progress instance with basic information
    pub fn new(
        progress_type: ProgressType,
        completed_tasks: usize,
        total_tasks: usize,
        status: &str,
    ) -> Self {
        let progress_percentage = if total_tasks > 0 {
            (completed_tasks * 100) / total_tasks
        } else {
            0
        };

        Self {
            progress_type,
            completed_tasks,
            total_tasks,
            progress_percentage,
            status: status.to_string(),
            record_id: None,
            file_name: None,
            record_status: None,
            error: None,
        }
    }

    /// Event for one resolved record
    pub fn for_record(
        completed_tasks: usize,
        total_tasks: usize,
        record_id: &RecordId,
        file_name: &str,
        error: Option<String>,
    ) -> Self {
        let (progress_type, record_status, status) = match error {
            None => (ProgressType::Progress, ImageStatus::Success, format!("{file_name} transformed")),
            Some(_) => (ProgressType::Error, ImageStatus::Error, format!("{file_name} failed")),
        };

        Self {
            record_id: Some(record_id.clone()),
            file_name: Some(file_name.to_string()),
            record_status: Some(record_status),
            error,
            ..Self::new(progress_type, completed_tasks, total_tasks, &status)
        }
    }
}
