use ethers_core::types::{Bytes, Log, H256, U256, U64};

/// A log entry exactly as the log source returned it.
///
/// Fields that a pending or reorged log leaves empty stay optional here; the
/// normalizer decides whether the record is usable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawLogRecord {
    pub block_number: Option<U64>,
    pub transaction_hash: Option<H256>,
    pub log_index: Option<U256>,
    pub topics: Vec<H256>,
    pub data: Bytes,
    pub removed: bool,
}

impl From<Log> for RawLogRecord {
    fn from(log: Log) -> Self {
        RawLogRecord {
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
            topics: log.topics,
            data: log.data,
            removed: log.removed.unwrap_or(false),
        }
    }
}
