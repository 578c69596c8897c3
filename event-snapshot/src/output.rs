use std::time::Duration;

use chrono::{DateTime, Utc};
use event_commitment::EventSnapshot;
use serde::{Deserialize, Serialize};

pub const MODE: &str = "zk_l1_event_commitment";

/// The published artifact: a snapshot together with the network it was taken
/// from and when. Fields are declared in lexicographic order of their
/// serialized names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub chain_id: u64,
    pub data: EventSnapshot,
    /// Seconds spent fetching logs, rounded to milliseconds.
    pub elapsed_sec: f64,
    #[serde(with = "utc_timestamp")]
    pub generated_at_utc: DateTime<Utc>,
    pub mode: String,
    pub network: String,
}

impl Envelope {
    pub fn new(
        chain_id: u64,
        network: String,
        data: EventSnapshot,
        fetch_time: Duration,
        generated_at_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            chain_id,
            data,
            elapsed_sec: (fetch_time.as_secs_f64() * 1000.0).round() / 1000.0,
            generated_at_utc,
            mode: MODE.to_string(),
            network,
        }
    }

    /// Compact JSON, or JSON indented by two spaces.
    pub fn render(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// An artifact read back for auditing: either a full envelope or a bare
/// snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SnapshotDocument {
    Envelope(Box<Envelope>),
    Snapshot(EventSnapshot),
}

impl SnapshotDocument {
    pub fn parse(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn snapshot(&self) -> &EventSnapshot {
        match self {
            SnapshotDocument::Envelope(envelope) => &envelope.data,
            SnapshotDocument::Snapshot(snapshot) => snapshot,
        }
    }
}

mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&timestamp.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ethers_core::types::{Address, Bytes, H256, U256, U64};
    use event_commitment::{RawLogRecord, SnapshotBuilder};

    use super::*;

    fn snapshot() -> EventSnapshot {
        let record = RawLogRecord {
            block_number: Some(U64::from(12)),
            transaction_hash: Some(H256::repeat_byte(0x11)),
            log_index: Some(U256::from(0)),
            topics: vec![H256::repeat_byte(0x22)],
            data: Bytes::from(vec![0x01]),
            removed: false,
        };

        SnapshotBuilder::new(Address::repeat_byte(0x42), 10, 20)
            .head_block(25)
            .build(vec![record])
            .unwrap()
    }

    fn envelope() -> Envelope {
        Envelope::new(
            1,
            "Ethereum Mainnet".to_string(),
            snapshot(),
            Duration::from_micros(1_234_567),
            Utc.with_ymd_and_hms(2024, 5, 17, 8, 3, 9).unwrap(),
        )
    }

    #[test]
    fn envelope_should_round_elapsed_time_to_milliseconds() {
        assert_eq!(envelope().elapsed_sec, 1.235);
        assert_eq!(envelope().mode, MODE);
    }

    #[test]
    fn compact_rendering_should_have_sorted_keys_and_no_whitespace() {
        let json = envelope().render(false).unwrap();

        assert!(json.starts_with(r#"{"chainId":1,"data":{"address":"0x"#));
        assert!(json.ends_with(
            r#""elapsedSec":1.235,"generatedAtUtc":"2024-05-17 08:03:09","mode":"zk_l1_event_commitment","network":"Ethereum Mainnet"}"#
        ));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn pretty_rendering_should_indent_by_two_spaces() {
        let json = envelope().render(true).unwrap();

        assert!(json.starts_with("{\n  \"chainId\": 1,\n  \"data\": {\n    \"address\""));
        assert_eq!(
            serde_json::from_str::<Envelope>(&json).unwrap(),
            envelope()
        );
    }

    #[test]
    fn envelope_should_round_trip() {
        let envelope = envelope();

        let parsed: Envelope = serde_json::from_str(&envelope.render(false).unwrap()).unwrap();

        assert_eq!(parsed, envelope);
        assert_eq!(parsed.data.commitment(), envelope.data.commitment());
    }

    #[test]
    fn document_should_accept_envelope_or_bare_snapshot() {
        let from_envelope = SnapshotDocument::parse(&envelope().render(true).unwrap()).unwrap();
        let from_snapshot =
            SnapshotDocument::parse(&serde_json::to_string(&snapshot()).unwrap()).unwrap();

        assert!(matches!(from_envelope, SnapshotDocument::Envelope(_)));
        assert!(matches!(from_snapshot, SnapshotDocument::Snapshot(_)));
        assert_eq!(from_envelope.snapshot(), from_snapshot.snapshot());
    }

    #[test]
    fn document_should_reject_unrelated_json() {
        assert!(SnapshotDocument::parse(r#"{"hello":"world"}"#).is_err());
        assert!(SnapshotDocument::parse("not json").is_err());
    }

    #[test]
    fn malformed_timestamp_should_be_rejected() {
        let mut json = serde_json::to_value(envelope()).unwrap();
        json["generatedAtUtc"] = "17/05/2024".into();

        assert!(serde_json::from_value::<Envelope>(json).is_err());
    }
}
