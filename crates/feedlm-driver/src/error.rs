use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Where in a batch a failure was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Warmup,
    OpeningComposer,
    SelectingKind,
    EnteringValue,
    Confirming,
    AwaitingCompletion,
    Settling,
    BetweenItems,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Warmup => "warm-up",
            Stage::OpeningComposer => "opening composer",
            Stage::SelectingKind => "selecting source kind",
            Stage::EnteringValue => "entering link",
            Stage::Confirming => "confirming",
            Stage::AwaitingCompletion => "awaiting completion",
            Stage::Settling => "settling",
            Stage::BetweenItems => "between items",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures reported by a [`crate::HostPage`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Element handle is no longer attached: {0}")]
    StaleHandle(String),

    #[error("Page script failed: {0}")]
    Script(String),
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Timeout while {stage}: {target} after {}ms", .waited.as_millis())]
    Timeout {
        stage: Stage,
        target: String,
        waited: Duration,
    },

    #[error("Automation stopped by user while {stage}")]
    Cancelled { stage: Stage },

    #[error("No videos provided to add")]
    EmptyInput,

    #[error("A batch is already running on this driver")]
    Busy,

    #[error(transparent)]
    Host(#[from] HostError),
}

impl DriverError {
    /// Cancellation is the designed halt path, reported as `stopped` rather than `error`
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DriverError::Cancelled { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_step_and_target() {
        let err = DriverError::Timeout {
            stage: Stage::OpeningComposer,
            target: "button.add-source-button".to_string(),
            waited: Duration::from_millis(7000),
        };
        let message = err.to_string();
        assert!(message.contains("opening composer"));
        assert!(message.contains("button.add-source-button"));
        assert!(message.contains("7000ms"));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled_is_classified() {
        let err = DriverError::Cancelled {
            stage: Stage::SelectingKind,
        };
        assert!(err.is_cancelled());
        assert!(err.to_string().contains("stopped by user"));
    }
}
