//! Turns raw log records into [`NormalizedEvent`]s.
//!
//! Encoding is a pure function of the record: byte values become lowercase
//! `0x` hex of their exact length, integers keep 64-bit precision. A record
//! that cannot be encoded without guessing fails the whole batch.

use error_stack::{ensure, Report, Result, ResultExt};
use ethers_core::types::U256;

use crate::error::{Error, RecordError};
use crate::event::NormalizedEvent;
use crate::hex::HexBytes;
use crate::record::RawLogRecord;

pub fn normalize(record: &RawLogRecord) -> Result<NormalizedEvent, RecordError> {
    ensure!(!record.removed, RecordError::Removed);

    let block_number = record
        .block_number
        .ok_or(RecordError::MissingBlockNumber)?
        .as_u64();
    let tx_hash = record
        .transaction_hash
        .ok_or(RecordError::MissingTransactionHash)?;
    let log_index = record
        .log_index
        .ok_or(RecordError::MissingLogIndex)
        .map_err(Report::new)
        .and_then(log_index_as_u64)?;

    Ok(NormalizedEvent::new(
        block_number,
        HexBytes::encode(tx_hash),
        log_index,
        record.topics.iter().map(HexBytes::encode).collect(),
        HexBytes::encode(&record.data),
    ))
}

/// Normalizes every record, failing on the first malformed one.
pub fn normalize_batch<I>(records: I) -> Result<Vec<NormalizedEvent>, Error>
where
    I: IntoIterator<Item = RawLogRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            normalize(&record).change_context(Error::InvalidRecord { index })
        })
        .collect()
}

fn log_index_as_u64(log_index: U256) -> Result<u64, RecordError> {
    ensure!(
        log_index <= U256::from(u64::MAX),
        RecordError::LogIndexOutOfRange(log_index.to_string())
    );

    Ok(log_index.low_u64())
}
