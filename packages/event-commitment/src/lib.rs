//! Deterministic snapshots of EVM event logs.
//!
//! Raw log records are normalized into a canonical text form, put into a
//! total order and committed to with Keccak-256, so that the same set of logs
//! always yields the same commitment regardless of how the source returned it.

pub mod commitment;
pub mod error;
pub mod event;
pub mod hex;
pub mod normalizer;
pub mod record;
pub mod snapshot;

pub use crate::commitment::Commitment;
pub use crate::error::{Error, RecordError};
pub use crate::event::NormalizedEvent;
pub use crate::hex::HexBytes;
pub use crate::record::RawLogRecord;
pub use crate::snapshot::{EventSnapshot, SnapshotBuilder};
