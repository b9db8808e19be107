use thiserror::Error;

use crate::types::Timestamp;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No object_walker dump found with timestamp {0}")]
    TimestampNotFound(Timestamp),

    #[error("No object_walker dumps found in the log")]
    NoSessions,

    #[error("Cannot diff: no object_walker dump found with timestamp {}", join_timestamps(.0))]
    DiffSessionsMissing(Vec<Timestamp>),

    #[error("Invalid timestamp '{0}': expected YYYY-MM-DDTHH:MM:SS.ffffff")]
    InvalidTimestamp(String),
}

fn join_timestamps(timestamps: &[Timestamp]) -> String {
    timestamps
        .iter()
        .map(Timestamp::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ReaderError>;
