use thiserror::Error;

pub mod asyncutil;
pub mod commands;
pub mod config;
pub mod evm;
pub mod json_rpc;
pub mod network;
pub mod output;
pub mod range;
pub mod target;
pub mod url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("failed to load config")]
    LoadConfig,
    #[error("invalid contract address")]
    InvalidAddress,
    #[error("invalid topic0 filter")]
    InvalidTopic,
    #[error("invalid block range")]
    InvalidRange,
    #[error("invalid RPC endpoint url")]
    InvalidRpcUrl,
    #[error("failed to connect to the RPC endpoint")]
    Connection,
    #[error("failed to fetch logs")]
    FetchLogs,
    #[error("failed to build the event snapshot")]
    Snapshot,
    #[error("failed to render output")]
    Output,
    #[error("failed to read the snapshot artifact")]
    ReadFile,
    #[error("snapshot artifact failed verification")]
    Verify,
}
