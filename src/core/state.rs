//! Application state shared with the UI host.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use crate::config::StudioConfig;
use crate::core::{ImageRecord, PreviewRegistry, RecordSnapshot, RecordStore, UploadedFile};
use crate::processing::{BatchProcessor, GeminiClient, ImageTransformer};
use crate::utils::{StudioError, StudioResult, filter_uploads};

/// Batch-level "processing" flag.
///
/// Held through a [`ProcessingGuard`] so it is released on every exit path.
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sets the flag unless it is already set.
    pub fn try_acquire(&self) -> Option<ProcessingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard(Arc::clone(&self.0)))
    }
}

/// Clears the processing flag when dropped.
#[derive(Debug)]
pub struct ProcessingGuard(Arc<AtomicBool>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Application state handed to the command layer.
///
/// Cheap to clone; all clones share one record collection, one processing
/// flag and one transformation client.
#[derive(Clone)]
pub struct StudioState {
    store: Arc<RecordStore>,
    previews: PreviewRegistry,
    processing: ProcessingFlag,
    transformer: Arc<dyn ImageTransformer>,
}

impl StudioState {
    /// Creates state backed by the Gemini client.
    ///
    /// Fails when the configuration has no usable credential.
    pub fn new(config: &StudioConfig) -> StudioResult<Self> {
        let client = GeminiClient::new(config)?;
        info!("Studio ready (model: {})", client.model());
        Ok(Self::with_transformer(Arc::new(client)))
    }

    /// Creates state around any transformation client
    pub fn with_transformer(transformer: Arc<dyn ImageTransformer>) -> Self {
        Self {
            store: Arc::new(RecordStore::new()),
            previews: PreviewRegistry::new(),
            processing: ProcessingFlag::default(),
            transformer,
        }
    }

    /// Creates a batch processor over this state's records.
    pub fn create_processor(&self) -> BatchProcessor {
        BatchProcessor::new(
            Arc::clone(&self.store),
            Arc::clone(&self.transformer),
            self.processing.clone(),
        )
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_set()
    }

    /// Creates `Idle` records for the image uploads in `files`.
    ///
    /// Non-image and empty files are dropped. Rejected while a batch runs.
    pub fn add_files(&self, files: Vec<UploadedFile>) -> StudioResult<Vec<RecordSnapshot>> {
        if self.is_processing() {
            warn!("Upload rejected: a batch is in progress");
            return Err(StudioError::BatchInProgress);
        }

        let records: Vec<_> = filter_uploads(files)
            .into_iter()
            .map(|file| ImageRecord::new(file, &self.previews))
            .collect();
        debug!("Adding {} images", records.len());
        Ok(self.store.insert_many(records))
    }

    /// Discards every record and releases its preview.
    ///
    /// Holds the processing flag for the duration so no batch can start
    /// underneath; rejected while a batch is running.
    pub fn clear(&self) -> StudioResult<usize> {
        let Some(_guard) = self.processing.try_acquire() else {
            warn!("Clear rejected: a batch is in progress");
            return Err(StudioError::BatchInProgress);
        };

        let removed = self.store.drain();
        info!("Cleared {} images", removed);
        Ok(removed)
    }
}
