//! Processing lifecycle pipeline.
//!
//! One spawned task per record owns its transitions, so per-record writes are
//! single-writer and strictly ordered: pending, then processing with
//! non-decreasing progress, then completed. Every transition is published to
//! the event hub; status changes are persisted with compare-and-set writes
//! and the task halts on the first persistence failure, leaving the record
//! at its last persisted state rather than advancing past one.
//!
//! The driver is injectable: the simulated implementation stands in for a
//! real classifier job. Any replacement must keep progress monotonically
//! non-decreasing in [0, 100], emit at least one update before reaching 100,
//! and report the verdict exactly once through `ProgressStep::Done`.

use async_trait::async_trait;
use clipcast_core::models::{Classification, MediaEvent, MediaRecord, MediaStatus};
use clipcast_core::{AppError, Config};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

/// Outcome of one driver tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStep {
    /// Still working; the payload is the new progress percentage.
    Progress(u8),
    /// Finished; classification computed exactly once at this point.
    Done(Classification),
}

/// Advances a record's processing by one step per tick.
#[async_trait]
pub trait ProcessingDriver: Send + Sync {
    /// Delay between ticks.
    fn tick(&self) -> Duration;

    /// Advance from `progress` and either report new progress or finish with
    /// a verdict.
    async fn advance(&self, record: &MediaRecord, progress: u8) -> ProgressStep;
}

/// Placeholder driver: fixed progress increments on a fixed cadence, with a
/// biased random verdict at the end. A real implementation plugs an external
/// classifier in behind the same trait without touching the transition logic.
pub struct SimulatedDriver {
    tick: Duration,
    step_percent: u8,
    safe_probability: f64,
}

impl SimulatedDriver {
    pub fn new(tick: Duration, step_percent: u8, safe_probability: f64) -> Self {
        Self {
            tick,
            // At least one intermediate update must precede completion.
            step_percent: step_percent.clamp(1, 50),
            safe_probability: safe_probability.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.processing_tick_ms),
            config.processing_step_percent,
            config.processing_safe_probability,
        )
    }
}

#[async_trait]
impl ProcessingDriver for SimulatedDriver {
    fn tick(&self) -> Duration {
        self.tick
    }

    async fn advance(&self, _record: &MediaRecord, progress: u8) -> ProgressStep {
        let next = progress.saturating_add(self.step_percent);
        if next >= 100 {
            let safe = rand::thread_rng().gen_bool(self.safe_probability);
            let classification = if safe {
                Classification::Safe
            } else {
                Classification::Flagged
            };
            ProgressStep::Done(classification)
        } else {
            ProgressStep::Progress(next)
        }
    }
}

/// Kick off processing for a freshly ingested record.
///
/// Fire-and-continue: the upload response returns before processing finishes,
/// but a halted pipeline is always logged, never dropped silently.
pub fn spawn_processing(state: Arc<AppState>, record: MediaRecord) {
    tokio::spawn(async move {
        let media_id = record.id;
        if let Err(e) = run_pipeline(&state, record).await {
            tracing::error!(
                error = %e,
                media_id = %media_id,
                "Processing pipeline halted; record left at last persisted state"
            );
        }
    });
}

async fn run_pipeline(state: &Arc<AppState>, record: MediaRecord) -> Result<(), AppError> {
    // Entry transition: pending -> processing.
    let mut record = state
        .media
        .advance_status(record.id, record.version, MediaStatus::Processing)
        .await?;
    state.events.publish(MediaEvent {
        id: record.id,
        progress: 0,
        status: MediaStatus::Processing,
        classification: None,
    });

    let mut progress: u8 = 0;
    loop {
        tokio::time::sleep(state.driver.tick()).await;

        match state.driver.advance(&record, progress).await {
            ProgressStep::Progress(next) => {
                debug_assert!(next >= progress, "progress must be non-decreasing");
                progress = next;
                state.events.publish(MediaEvent {
                    id: record.id,
                    progress,
                    status: MediaStatus::Processing,
                    classification: None,
                });
            }
            ProgressStep::Done(classification) => {
                // Terminal transition persists status and verdict together.
                record = state
                    .media
                    .complete(record.id, record.version, classification)
                    .await?;
                state.events.publish(MediaEvent {
                    id: record.id,
                    progress: 100,
                    status: MediaStatus::Completed,
                    classification: Some(classification),
                });
                tracing::info!(
                    media_id = %record.id,
                    classification = %classification,
                    "Processing completed"
                );
                return Ok(());
            }
        }
    }
}
