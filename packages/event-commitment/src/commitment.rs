//! Canonical ordering, encoding and Keccak-256 commitment over normalized events.
//!
//! The encoding is produced by hand rather than by a generic serializer so
//! that field order, number formatting and separators cannot drift with
//! library versions. It is byte-identical to a JSON dump of the event list
//! with sorted keys and no whitespace.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use error_stack::{bail, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::error::Error;
use crate::event::NormalizedEvent;
use crate::hex::{HexBytes, HexError};

/// Keccak-256 digest of the canonical encoding of an ordered event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commitment([u8; 32]);

impl Commitment {
    fn of(encoding: &[u8]) -> Self {
        Commitment(Keccak256::digest(encoding).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Commitment {
    type Err = HexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = s.parse::<HexBytes>()?.to_bytes();

        <[u8; 32]>::try_from(bytes)
            .map(Commitment)
            .map_err(|_| HexError::UnexpectedLength(s.to_string(), 32))
    }
}

impl TryFrom<String> for Commitment {
    type Error = HexError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Commitment> for String {
    fn from(value: Commitment) -> Self {
        value.to_string()
    }
}

/// Sorts events by `(blockNumber, txHash, logIndex)`.
///
/// Fails if an event carries a hash of the wrong length or if two events
/// occupy the same position.
pub fn canonical_order(mut events: Vec<NormalizedEvent>) -> Result<Vec<NormalizedEvent>, Error> {
    if let Some((index, field)) = events
        .iter()
        .enumerate()
        .find_map(|(index, event)| event.malformed_field().map(|field| (index, field)))
    {
        bail!(Error::MalformedEvent { index, field });
    }

    events.sort_unstable_by(|a, b| a.position().cmp(&b.position()));

    if let Some((a, _)) = events
        .iter()
        .tuple_windows()
        .find(|(a, b)| a.position() == b.position())
    {
        bail!(Error::DuplicatePosition {
            block_number: a.block_number(),
            tx_hash: a.tx_hash().to_string(),
            log_index: a.log_index(),
        });
    }

    Ok(events)
}

/// Serializes an already ordered event list into its canonical byte string.
pub fn canonical_encoding(events: &[NormalizedEvent]) -> Vec<u8> {
    let mut out = String::from("[");

    for (i, event) in events.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        encode_event(&mut out, event);
    }

    out.push(']');
    out.into_bytes()
}

pub fn commit(events: &[NormalizedEvent]) -> Commitment {
    Commitment::of(&canonical_encoding(events))
}

/// Counts events per first topic. Events without topics are not counted.
pub fn tally(events: &[NormalizedEvent]) -> BTreeMap<HexBytes, u64> {
    events
        .iter()
        .filter_map(NormalizedEvent::first_topic)
        .fold(BTreeMap::new(), |mut counts, topic| {
            let count = counts.entry(topic.clone()).or_insert(0u64);
            *count = count.saturating_add(1);
            counts
        })
}

// keys must stay in lexicographic order
fn encode_event(out: &mut String, event: &NormalizedEvent) {
    out.push_str("{\"blockNumber\":");
    out.push_str(&event.block_number().to_string());
    out.push_str(",\"data\":");
    push_quoted(out, event.data());
    out.push_str(",\"logIndex\":");
    out.push_str(&event.log_index().to_string());
    out.push_str(",\"topics\":[");
    for (i, topic) in event.topics().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_quoted(out, topic);
    }
    out.push_str("],\"txHash\":");
    push_quoted(out, event.tx_hash());
    out.push('}');
}

// hex text never needs escaping
fn push_quoted(out: &mut String, value: &HexBytes) {
    out.push('"');
    out.push_str(value.as_str());
    out.push('"');
}
