use serde::Serialize;
use crate::core::{ImageStatus, StudioState};

/// What the controls need: counts per status and the batch flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioStatus {
    pub total: usize,
    pub idle: usize,
    pub processing: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub is_processing: bool,
}

impl StudioStatus {
    /// Transform is offered only with idle images and no running batch
    pub fn can_transform(&self) -> bool {
        self.idle > 0 && !self.is_processing
    }

    pub fn can_clear(&self) -> bool {
        !self.is_processing
    }

    /// Label for the transform control
    pub fn transform_label(&self) -> String {
        if self.is_processing {
            "Processing...".to_string()
        } else {
            format!("Transform {} Images", self.idle)
        }
    }
}

pub fn studio_status(state: &StudioState) -> StudioStatus {
    let store = state.store();
    StudioStatus {
        total: store.len(),
        idle: store.count_by_status(ImageStatus::Idle),
        processing: store.count_by_status(ImageStatus::Processing),
        succeeded: store.count_by_status(ImageStatus::Success),
        failed: store.count_by_status(ImageStatus::Error),
        is_processing: state.is_processing(),
    }
}
