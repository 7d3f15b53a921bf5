use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use futures::future::join_all;
use tracing::{debug, info, warn};
use crate::core::{ProcessingFlag, Progress, ProgressType, RecordId, RecordStore, UploadedFile};
use crate::processing::ImageTransformer;
use crate::utils::{StudioError, StudioResult};
use super::BatchSummary;

/// Runs one transformation per `Idle` record, all at once.
pub struct BatchProcessor {
    store: Arc<RecordStore>,
    transformer: Arc<dyn ImageTransformer>,
    processing: ProcessingFlag,
}

impl BatchProcessor {
    pub fn new(
        store: Arc<RecordStore>,
        transformer: Arc<dyn ImageTransformer>,
        processing: ProcessingFlag,
    ) -> Self {
        Self {
            store,
            transformer,
            processing,
        }
    }

    /// Transforms every record that is `Idle` right now.
    ///
    /// The processing flag is held from before dispatch until the last call has
    /// resolved. Calls run concurrently on the caller's task; each result is
    /// written to its own record as soon as it arrives. Failures become record
    /// state and never fail the batch.
    ///
    /// Returns [`StudioError::BatchInProgress`] if another batch (or a clear) holds
    /// the flag. With no `Idle` records the run is a no-op.
    pub async fn run_batch(
        &self,
        progress_callback: impl Fn(Progress) + Send + Sync,
    ) -> StudioResult<BatchSummary> {
        let Some(guard) = self.processing.try_acquire() else {
            warn!("Batch rejected: another batch is in progress");
            return Err(StudioError::BatchInProgress);
        };

        let claimed = self.store.claim_idle();
        if claimed.is_empty() {
            debug!("No idle images, nothing to transform");
            return Ok(BatchSummary::default());
        }

        let total = claimed.len();
        info!("Transforming batch of {} images", total);
        progress_callback(Progress::new(ProgressType::Start, 0, total, "Transforming images"));

        let start = Instant::now();
        let completed = AtomicUsize::new(0);
        let calls = claimed.into_iter().map(|(id, original)| {
            self.transform_one(id, original, total, &completed, &progress_callback)
        });
        let outcomes = join_all(calls).await;
        drop(guard);

        let succeeded = outcomes.iter().filter(|ok| **ok).count();
        let summary = BatchSummary {
            dispatched: total,
            succeeded,
            failed: total - succeeded,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        if summary.failed > 0 {
            warn!(
                "Batch completed with {} failed images out of {}",
                summary.failed, total
            );
        } else {
            info!("Batch completed successfully: {} images transformed", succeeded);
        }
        progress_callback(Progress::new(ProgressType::Complete, total, total, "Transformation complete"));

        Ok(summary)
    }

    /// One record's call: transform, store the outcome, report progress.
    async fn transform_one(
        &self,
        id: RecordId,
        original: UploadedFile,
        total: usize,
        completed: &AtomicUsize,
        progress_callback: &(impl Fn(Progress) + Send + Sync),
    ) -> bool {
        debug!("Dispatching {}", original.name);
        let outcome = self
            .transformer
            .transform(&original.bytes, &original.mime_type)
            .await;

        let error = outcome.as_ref().err().map(ToString::to_string);
        let succeeded = error.is_none();

        if let Err(e) = self.store.update(&id, |record| record.resolve(outcome)).and_then(|r| r) {
            warn!("Could not record result for {}: {}", original.name, e);
        }

        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        progress_callback(Progress::for_record(done, total, &id, &original.name, error));
        succeeded
    }
}
