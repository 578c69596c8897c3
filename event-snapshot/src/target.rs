use error_stack::{ensure, Report, Result};
use ethers_core::types::{Address, H256};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TargetError {
    #[error("invalid address {0:?}")]
    InvalidAddress(String),
    #[error("topic is empty")]
    EmptyTopic,
    #[error("topic {0:?} must be a 32-byte hash: 0x followed by 64 hex digits")]
    InvalidTopic(String),
}

/// Parses a contract address in any letter case. Surrounding whitespace is
/// ignored.
pub fn parse_address(address: &str) -> Result<Address, TargetError> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| Report::new(TargetError::InvalidAddress(address.to_string())))?;

    ensure!(
        digits.len() == 40,
        TargetError::InvalidAddress(address.to_string())
    );

    digits
        .parse::<Address>()
        .map_err(|_| Report::new(TargetError::InvalidAddress(address.to_string())))
}

/// Parses the optional topic0 filter. Surrounding whitespace is ignored and the
/// hash may use either letter case; it is rendered lowercase from then on.
pub fn parse_topic(topic: &str) -> Result<H256, TargetError> {
    let trimmed = topic.trim();
    ensure!(!trimmed.is_empty(), TargetError::EmptyTopic);

    let digits = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| Report::new(TargetError::InvalidTopic(topic.to_string())))?;

    ensure!(
        digits.len() == 64,
        TargetError::InvalidTopic(topic.to_string())
    );

    digits
        .parse::<H256>()
        .map_err(|_| Report::new(TargetError::InvalidTopic(topic.to_string())))
}
