use thiserror::Error;

use crate::command::CommandError;

#[derive(Error, Debug)]
pub enum PadError {
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Strip {index} out of range (strip count {count})")]
    StripOutOfRange { index: usize, count: usize },

    #[error("Grid position out of range: ({row}, {col})")]
    InvalidPosition { row: usize, col: usize },

    #[error("Trigger error: {0}")]
    Trigger(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PadError>;
