use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("log record {index} of the batch is malformed")]
    InvalidRecord { index: usize },
    #[error("two log records share block {block_number}, transaction {tx_hash} and log index {log_index}")]
    DuplicatePosition {
        block_number: u64,
        tx_hash: String,
        log_index: u64,
    },
    #[error("normalized event {index} has a malformed {field}")]
    MalformedEvent { index: usize, field: &'static str },
    #[error("snapshot {0} does not match its events")]
    Mismatch(&'static str),
}

/// Reasons a single raw log record cannot be normalized.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("log has no block number (pending log)")]
    MissingBlockNumber,
    #[error("log has no transaction hash (pending log)")]
    MissingTransactionHash,
    #[error("log has no log index (pending log)")]
    MissingLogIndex,
    #[error("log index {0} does not fit into 64 bits")]
    LogIndexOutOfRange(String),
    #[error("log was removed by a chain reorganization")]
    Removed,
}
