use std::collections::BTreeMap;

use error_stack::{ensure, Result};
use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

use crate::commitment::{self, Commitment};
use crate::error::Error;
use crate::event::NormalizedEvent;
use crate::hex::HexBytes;
use crate::normalizer;
use crate::record::RawLogRecord;

/// Commitment artifact over the logs of one contract in one block range.
///
/// Fields are declared in lexicographic order of their serialized names so the
/// JSON form has sorted keys without relying on map ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    #[serde(with = "checksum_address")]
    address: Address,
    #[serde(rename = "commitmentKeccak")]
    commitment: Commitment,
    event_count: u64,
    events: Vec<NormalizedEvent>,
    from_block: u64,
    head_block: u64,
    to_block: u64,
    topics_count: BTreeMap<HexBytes, u64>,
}

impl EventSnapshot {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }

    pub fn from_block(&self) -> u64 {
        self.from_block
    }

    pub fn to_block(&self) -> u64 {
        self.to_block
    }

    pub fn head_block(&self) -> u64 {
        self.head_block
    }

    pub fn topics_count(&self) -> &BTreeMap<HexBytes, u64> {
        &self.topics_count
    }

    /// Recomputes order, count, tally and commitment from the embedded events
    /// and fails on the first one that disagrees with the recorded value.
    pub fn verify(&self) -> Result<(), Error> {
        let rebuilt = SnapshotBuilder::new(self.address, self.from_block, self.to_block)
            .head_block(self.head_block)
            .build_from_events(self.events.clone())?;

        ensure!(rebuilt.events == self.events, Error::Mismatch("event order"));
        ensure!(
            rebuilt.event_count == self.event_count,
            Error::Mismatch("eventCount")
        );
        ensure!(
            rebuilt.topics_count == self.topics_count,
            Error::Mismatch("topicsCount")
        );
        ensure!(
            rebuilt.commitment == self.commitment,
            Error::Mismatch("commitmentKeccak")
        );

        Ok(())
    }
}

/// The only way to produce an [`EventSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    address: Address,
    from_block: u64,
    to_block: u64,
    head_block: u64,
}

impl SnapshotBuilder {
    /// The head block defaults to `to_block` until set explicitly.
    pub fn new(address: Address, from_block: u64, to_block: u64) -> Self {
        Self {
            address,
            from_block,
            to_block,
            head_block: to_block,
        }
    }

    pub fn head_block(mut self, head_block: u64) -> Self {
        self.head_block = head_block;
        self
    }

    pub fn build<I>(self, records: I) -> Result<EventSnapshot, Error>
    where
        I: IntoIterator<Item = RawLogRecord>,
    {
        let events = normalizer::normalize_batch(records)?;
        self.build_from_events(events)
    }

    pub fn build_from_events(self, events: Vec<NormalizedEvent>) -> Result<EventSnapshot, Error> {
        let events = commitment::canonical_order(events)?;

        Ok(EventSnapshot {
            address: self.address,
            commitment: commitment::commit(&events),
            event_count: events.len() as u64,
            topics_count: commitment::tally(&events),
            events,
            from_block: self.from_block,
            head_block: self.head_block,
            to_block: self.to_block,
        })
    }
}

mod checksum_address {
    use std::str::FromStr;

    use ethers_core::types::Address;
    use ethers_core::utils::to_checksum;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_checksum(address, None))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(Error::custom)
    }
}
