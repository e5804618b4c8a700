use crate::cancel::{BatchContext, CancellationChannel, StopAck, StopHandle};
use crate::config::DriverConfig;
use crate::error::{DriverError, Stage};
use crate::events::{EventSink, deliver};
use crate::host::HostPage;
use crate::poll::Poller;
use crate::sequencer::Sequencer;
use feedlm_core::{AutomationEvent, WorkItem};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Complete,
    Stopped,
    Failed,
}

/// Summary of a finished run; the events already told the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub total: usize,
    pub processed: usize,
    /// Items whose first step was started
    pub attempted: usize,
}

/// Feeds batches of work items through the insertion sequencer
///
/// Items run strictly one after another: the composer is a single modal
/// that cannot host two insertions at once. The first failure or stop ends
/// the batch.
pub struct BatchRunner<H> {
    host: H,
    config: DriverConfig,
    channel: Arc<CancellationChannel>,
}

impl<H: HostPage> BatchRunner<H> {
    pub fn new(host: H, config: DriverConfig) -> Self {
        Self {
            host,
            config,
            channel: Arc::new(CancellationChannel::new()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Handle a controller can keep to stop whichever batch is running
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.channel))
    }

    pub fn request_stop(&self) -> StopAck {
        self.channel.request_stop()
    }

    pub fn is_running(&self) -> bool {
        self.channel.is_armed()
    }

    /// Run one batch, publishing progress and exactly one terminal event
    ///
    /// Fails with `Busy`, without emitting anything, if a batch is already
    /// in flight on this runner.
    pub async fn run(
        &self,
        items: Vec<WorkItem>,
        sink: &dyn EventSink,
    ) -> Result<BatchReport, DriverError> {
        let token = self.channel.arm().ok_or(DriverError::Busy)?;
        let _armed = Armed(&self.channel);
        let ctx = BatchContext::with_token(token, items.len());
        let (outcome, attempted) = self.run_batch(&ctx, &items, sink).await;

        let report = BatchReport {
            outcome,
            total: ctx.total(),
            processed: ctx.processed(),
            attempted,
        };
        tracing::info!(
            "Batch finished: {:?} ({} of {} added)",
            report.outcome,
            report.processed,
            report.total
        );
        Ok(report)
    }

    async fn run_batch(
        &self,
        ctx: &BatchContext,
        items: &[WorkItem],
        sink: &dyn EventSink,
    ) -> (BatchOutcome, usize) {
        if items.is_empty() {
            deliver(
                sink,
                AutomationEvent::Error {
                    message: DriverError::EmptyInput.to_string(),
                },
            );
            return (BatchOutcome::Failed, 0);
        }

        let total = items.len();
        deliver(
            sink,
            AutomationEvent::Progress {
                message: format!("Starting to add {} videos...", total),
                index: None,
            },
        );

        let poller = Poller::new(ctx, self.config.tick());
        if poller
            .sleep(Stage::Warmup, self.config.pauses.warmup())
            .await
            .is_err()
        {
            return (stopped(sink, "Automation stopped by user."), 0);
        }

        for (index, item) in items.iter().enumerate() {
            if ctx.ensure_running(Stage::BetweenItems).is_err() {
                tracing::info!("Automation stopping due to signal");
                return (stopped(sink, "Automation stopped by user."), index);
            }

            let preview = item.title_preview();
            let message = format!("Adding video {} of {}: \"{}\"", index + 1, total, preview);
            tracing::info!("{}", message);
            deliver(
                sink,
                AutomationEvent::Progress {
                    message,
                    index: Some(index),
                },
            );

            let mut sequencer = Sequencer::new(&self.host, ctx, &self.config);
            match sequencer.insert(item).await {
                Ok(()) => {
                    ctx.record_success();
                    deliver(
                        sink,
                        AutomationEvent::Success {
                            message: format!("Successfully added: \"{}\"", preview),
                            link: item.link.clone(),
                            index,
                        },
                    );
                    let settle = self.config.pauses.settle();
                    if poller.sleep(Stage::Settling, settle).await.is_err() {
                        return (stopped(sink, "Automation stopped by user."), index + 1);
                    }
                }
                Err(e) if e.is_cancelled() => {
                    tracing::info!("Stop observed during video processing: {}", e);
                    return (
                        stopped(sink, "Automation stopped during video processing."),
                        index + 1,
                    );
                }
                Err(e) => {
                    let message = format!("Failed to add \"{}\": {}. Stopping.", item.title, e);
                    tracing::error!("{}", message);
                    deliver(sink, AutomationEvent::Error { message });
                    return (BatchOutcome::Failed, index + 1);
                }
            }
        }

        deliver(
            sink,
            AutomationEvent::Complete {
                message: "All videos processed.".to_string(),
            },
        );
        (BatchOutcome::Complete, total)
    }
}

/// Releases the channel even if the run future is dropped mid-batch
struct Armed<'a>(&'a CancellationChannel);

impl Drop for Armed<'_> {
    fn drop(&mut self) {
        self.0.disarm();
    }
}

fn stopped(sink: &dyn EventSink, message: &str) -> BatchOutcome {
    deliver(
        sink,
        AutomationEvent::Stopped {
            message: message.to_string(),
        },
    );
    BatchOutcome::Stopped
}
