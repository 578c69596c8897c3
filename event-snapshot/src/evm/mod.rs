use std::time::Duration;

use error_stack::{ensure, Result, ResultExt};
use ethers_core::types::U256;
use futures::future::try_join;
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

use crate::evm::json_rpc::EthereumClient;
use crate::network::{network_name, NETWORKS};

pub mod json_rpc;
pub mod logs;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("failed to query chain id and latest block")]
    ChainInfo,
    #[error("chain id {0} does not fit into 64 bits")]
    ChainIdOutOfRange(U256),
    #[error("failed to query the latest block number")]
    BlockNumber,
    #[error("failed to fetch logs in blocks {0}")]
    Logs(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    pub chain_id: u64,
    pub network: String,
    pub tip: u64,
    pub latency: Duration,
}

/// Queries the chain id and tip to confirm the endpoint is usable.
pub async fn connect<C>(client: &C) -> Result<ChainInfo, Error>
where
    C: EthereumClient,
{
    let start = Instant::now();
    let (chain_id, tip) = try_join(client.chain_id(), client.block_number())
        .await
        .change_context(Error::ChainInfo)?;
    let latency = start.elapsed();

    ensure!(
        chain_id <= U256::from(u64::MAX),
        Error::ChainIdOutOfRange(chain_id)
    );
    let chain_id = chain_id.low_u64();
    let network = network_name(NETWORKS, chain_id);
    let tip = tip.as_u64();

    info!(
        network = %network,
        chain_id,
        tip,
        latency = %format!("{:.2}s", latency.as_secs_f64()),
        "connected to RPC endpoint"
    );

    Ok(ChainInfo {
        chain_id,
        network,
        tip,
        latency,
    })
}
