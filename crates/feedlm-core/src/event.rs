use serde::{Deserialize, Serialize};

/// Status events published by the driver to its controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AutomationEvent {
    Progress {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    Success {
        message: String,
        link: String,
        index: usize,
    },
    Error {
        message: String,
    },
    Stopped {
        message: String,
    },
    Complete {
        message: String,
    },
}

impl AutomationEvent {
    pub fn message(&self) -> &str {
        match self {
            AutomationEvent::Progress { message, .. }
            | AutomationEvent::Success { message, .. }
            | AutomationEvent::Error { message }
            | AutomationEvent::Stopped { message }
            | AutomationEvent::Complete { message } => message,
        }
    }

    /// Terminal events end a batch; exactly one is emitted per run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AutomationEvent::Error { .. }
                | AutomationEvent::Stopped { .. }
                | AutomationEvent::Complete { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AutomationEvent::Progress { .. } => "progress",
            AutomationEvent::Success { .. } => "success",
            AutomationEvent::Error { .. } => "error",
            AutomationEvent::Stopped { .. } => "stopped",
            AutomationEvent::Complete { .. } => "complete",
        }
    }
}
