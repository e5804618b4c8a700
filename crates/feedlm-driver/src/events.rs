use feedlm_core::AutomationEvent;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("controller channel unavailable")]
    ChannelUnavailable,
}

/// Publish-only channel from the driver to its controller
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AutomationEvent) -> Result<(), SinkError>;
}

/// Sink backed by an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<AutomationEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AutomationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: AutomationEvent) -> Result<(), SinkError> {
        self.tx
            .send(event)
            .map_err(|_| SinkError::ChannelUnavailable)
    }
}

/// Best-effort delivery: a detached controller is logged, never escalated
pub(crate) fn deliver(sink: &dyn EventSink, event: AutomationEvent) {
    let kind = event.kind();
    if let Err(e) = sink.emit(event) {
        tracing::warn!("Could not deliver '{}' event: {}", kind, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new();
        sink.emit(AutomationEvent::Complete {
            message: "done".into(),
        })
        .unwrap();
        assert_eq!(rx.recv().await.unwrap().kind(), "complete");
    }

    #[test]
    fn test_closed_channel_is_unavailable() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        let err = sink
            .emit(AutomationEvent::Stopped {
                message: "x".into(),
            })
            .unwrap_err();
        assert_eq!(err, SinkError::ChannelUnavailable);

        // Dropped deliveries are swallowed.
        deliver(
            &sink,
            AutomationEvent::Stopped {
                message: "x".into(),
            },
        );
    }
}
