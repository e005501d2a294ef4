//! Sequential chunked execution of one bulk operation.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tagsweep_core::bulk::{
    chunk_count, confirmation_message, summary_message, BulkCounts, BulkRequest, BulkRequestBody,
};
use tagsweep_core::entity::EntityKind;
use tokio_util::sync::CancellationToken;

use crate::endpoint::BulkEndpoint;
use crate::error::EngineError;
use crate::events::{BulkEvent, ProgressBus};
use crate::policy::ChunkPolicy;

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// A validated bulk operation, ready to run.
///
/// Validation happens entirely here: once a plan exists, the runner never
/// rejects it. The id snapshot taken at preparation time is what runs,
/// even if the underlying list changes afterwards.
#[derive(Debug)]
pub struct BulkPlan {
    pub request: BulkRequest,
    /// Prompt to show the user before starting the run.
    pub confirmation: String,
}

impl BulkPlan {
    /// Validate a raw request body into a runnable plan.
    pub fn prepare(kind: EntityKind, body: BulkRequestBody) -> Result<Self, EngineError> {
        let request = body.into_request(kind)?;
        let confirmation = confirmation_message(
            request.operation,
            kind,
            &request.tag,
            &request.value,
            request.ids.len(),
        );
        Ok(Self {
            request,
            confirmation,
        })
    }

    pub fn total(&self) -> usize {
        self.request.ids.len()
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Final accounting of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkSummary {
    pub counts: BulkCounts,
    /// Ids the plan held, whether or not the run reached them all.
    pub total: usize,
    pub cancelled: bool,
    /// Result line for the user.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Drives plans against a [`BulkEndpoint`], one at a time.
///
/// A runner admits a single run at any moment; a second call to
/// [`run`](BulkRunner::run) while one is in progress fails immediately
/// with [`EngineError::OperationInFlight`] rather than queueing.
pub struct BulkRunner<E> {
    endpoint: E,
    policy: ChunkPolicy,
    bus: ProgressBus,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a run exits by any path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<E: BulkEndpoint> BulkRunner<E> {
    pub fn new(endpoint: E) -> Self {
        Self::with_policy(endpoint, ChunkPolicy::default())
    }

    pub fn with_policy(endpoint: E, policy: ChunkPolicy) -> Self {
        Self {
            endpoint,
            policy,
            bus: ProgressBus::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The bus this runner publishes [`BulkEvent`]s on.
    pub fn bus(&self) -> &ProgressBus {
        &self.bus
    }

    /// Execute a plan to completion or cancellation.
    ///
    /// Chunks are submitted strictly in sequence. Cancellation is observed
    /// at chunk boundaries: the chunk being submitted when the token fires
    /// still completes and is counted, later chunks are never sent. A
    /// chunk whose submission fails outright counts as fully failed and
    /// the run moves on.
    pub async fn run(
        &self,
        plan: &BulkPlan,
        cancel: &CancellationToken,
    ) -> Result<BulkSummary, EngineError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EngineError::OperationInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let request = &plan.request;
        let total = request.ids.len();
        let chunks = chunk_count(total, self.policy.chunk_size);
        tracing::info!(
            kind = request.kind.noun(),
            operation = request.operation.as_str(),
            total,
            chunks,
            "Starting bulk operation"
        );
        self.bus.publish(BulkEvent::Started { total, chunks });

        let mut counts = BulkCounts::default();
        let mut cancelled = false;

        for chunk in request.ids.chunks(self.policy.chunk_size) {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let body = request.chunk_body(chunk);
            match self.endpoint.submit(request.kind, &body).await {
                Ok(response) => counts.record_response(chunk.len(), &response),
                Err(error) => {
                    tracing::warn!(%error, chunk_len = chunk.len(), "Chunk submission failed");
                    counts.record_transport_failure(chunk.len());
                }
            }

            self.bus.publish(BulkEvent::Progress {
                processed: counts.processed(),
                succeeded: counts.succeeded,
                failed: counts.failed,
                total,
            });

            // Pace submissions without blocking cancellation.
            if !self.policy.inter_chunk_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.policy.inter_chunk_delay) => {}
                }
            }
        }

        let message = summary_message(request.operation, request.kind, counts, total, cancelled);
        let summary = BulkSummary {
            counts,
            total,
            cancelled,
            message,
        };
        tracing::info!(
            succeeded = counts.succeeded,
            failed = counts.failed,
            cancelled,
            "Bulk operation finished"
        );
        self.bus.publish(BulkEvent::Finished {
            summary: summary.clone(),
        });
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
