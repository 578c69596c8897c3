use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const PREFIX: &str = "0x";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HexError {
    #[error("hex string {0:?} is not prefixed with 0x")]
    MissingPrefix(String),
    #[error("hex string {0:?} has an odd number of digits")]
    OddLength(String),
    #[error("hex string {0:?} contains characters other than lowercase hex digits")]
    InvalidDigit(String),
    #[error("hex string {0:?} does not encode {1} bytes")]
    UnexpectedLength(String, usize),
}

/// Canonical text form of a byte sequence: `0x` followed by two lowercase hex
/// digits per byte. The empty byte sequence is `0x`.
///
/// Ordering compares the text, which for equal-length values is the same as
/// comparing the bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexBytes(String);

impl HexBytes {
    pub fn encode(bytes: impl AsRef<[u8]>) -> Self {
        HexBytes(format!("{PREFIX}{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of bytes the string encodes.
    pub fn byte_len(&self) -> usize {
        self.digits().len() / 2
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        hex::decode(self.digits()).expect("hex digits are validated on construction")
    }

    fn digits(&self) -> &str {
        &self.0[PREFIX.len()..]
    }
}

impl FromStr for HexBytes {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| HexError::MissingPrefix(s.to_string()))?;

        if !digits.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(HexError::InvalidDigit(s.to_string()));
        }

        if digits.len() % 2 != 0 {
            return Err(HexError::OddLength(s.to_string()));
        }

        Ok(HexBytes(s.to_string()))
    }
}

impl TryFrom<String> for HexBytes {
    type Error = HexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexBytes> for String {
    fn from(value: HexBytes) -> Self {
        value.0
    }
}

impl AsRef<str> for HexBytes {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
