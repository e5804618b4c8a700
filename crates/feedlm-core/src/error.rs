use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid work item: {0}")]
    InvalidItem(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("No videos in the list to add")]
    EmptyBatch,

    #[error("An automation batch is already running")]
    AlreadyRunning,

    #[error("Item {0} not found")]
    ItemNotFound(usize),

    #[error("Could not determine data directory: {0}")]
    DataDir(String),
}

pub type Result<T> = std::result::Result<T, Error>;
