use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::hex::HexBytes;

const HASH_LEN: usize = 32;

/// A log entry in canonical text form.
///
/// Values are only produced by the normalizer or by deserializing a published
/// snapshot, and never change afterwards. Fields are declared in
/// lexicographic order of their serialized names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    block_number: u64,
    data: HexBytes,
    log_index: u64,
    topics: Vec<HexBytes>,
    tx_hash: HexBytes,
}

/// Sort key of an event: block number, then transaction hash text, then log index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogPosition<'a> {
    pub block_number: u64,
    pub tx_hash: &'a HexBytes,
    pub log_index: u64,
}

impl Display for LogPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block {} tx {} log {}",
            self.block_number, self.tx_hash, self.log_index
        )
    }
}

impl NormalizedEvent {
    pub(crate) fn new(
        block_number: u64,
        tx_hash: HexBytes,
        log_index: u64,
        topics: Vec<HexBytes>,
        data: HexBytes,
    ) -> Self {
        Self {
            block_number,
            data,
            log_index,
            topics,
            tx_hash,
        }
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn tx_hash(&self) -> &HexBytes {
        &self.tx_hash
    }

    pub fn log_index(&self) -> u64 {
        self.log_index
    }

    pub fn topics(&self) -> &[HexBytes] {
        &self.topics
    }

    pub fn first_topic(&self) -> Option<&HexBytes> {
        self.topics.first()
    }

    pub fn data(&self) -> &HexBytes {
        &self.data
    }

    pub fn position(&self) -> LogPosition<'_> {
        LogPosition {
            block_number: self.block_number,
            tx_hash: &self.tx_hash,
            log_index: self.log_index,
        }
    }

    /// Returns the name of the first field that is not a 32-byte hash where
    /// one is required.
    pub(crate) fn malformed_field(&self) -> Option<&'static str> {
        if self.tx_hash.byte_len() != HASH_LEN {
            return Some("txHash");
        }

        if self.topics.iter().any(|topic| topic.byte_len() != HASH_LEN) {
            return Some("topics");
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(block_number: u64, tx_byte: u8, log_index: u64) -> NormalizedEvent {
        NormalizedEvent::new(
            block_number,
            HexBytes::encode([tx_byte; 32]),
            log_index,
            vec![],
            HexBytes::encode([]),
        )
    }

    #[test]
    fn position_should_order_by_block_then_tx_then_index() {
        let mut events = [
            event(5, 0xaa, 1),
            event(5, 0xaa, 0),
            event(3, 0xbb, 9),
            event(5, 0x0f, 4),
        ];
        events.sort_by(|a, b| a.position().cmp(&b.position()));

        let order: Vec<_> = events
            .iter()
            .map(|e| (e.block_number(), e.tx_hash().to_bytes()[0], e.log_index()))
            .collect();
        assert_eq!(order, vec![(3, 0xbb, 9), (5, 0x0f, 4), (5, 0xaa, 0), (5, 0xaa, 1)]);
    }

    #[test]
    fn block_number_should_compare_numerically() {
        assert!(event(9, 0, 0).position() < event(10, 0, 0).position());
        assert!(event(10, 0, 2).position() < event(10, 0, 10).position());
    }

    #[test]
    fn malformed_field_should_detect_short_hashes() {
        assert_eq!(event(1, 0xaa, 0).malformed_field(), None);

        let short_tx = NormalizedEvent::new(
            1,
            HexBytes::encode([0xaa; 31]),
            0,
            vec![],
            HexBytes::encode([]),
        );
        assert_eq!(short_tx.malformed_field(), Some("txHash"));

        let short_topic = NormalizedEvent::new(
            1,
            HexBytes::encode([0xaa; 32]),
            0,
            vec![HexBytes::encode([0x01; 32]), HexBytes::encode([0x02; 20])],
            HexBytes::encode([]),
        );
        assert_eq!(short_topic.malformed_field(), Some("topics"));
    }

    #[test]
    fn serialized_field_names_should_be_sorted() {
        let json = serde_json::to_string(&event(3, 0xbb, 9)).unwrap();

        assert_eq!(
            json,
            format!(
                r#"{{"blockNumber":3,"data":"0x","logIndex":9,"topics":[],"txHash":"0x{}"}}"#,
                "bb".repeat(32)
            )
        );
    }
}
