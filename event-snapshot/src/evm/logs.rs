use std::num::NonZeroU64;
use std::time::Duration;

use error_stack::{Result, ResultExt};
use ethers_core::types::{Address, BlockNumber, Filter, Log, H256, U64};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::asyncutil::future::{with_retry, RetryPolicy};
use crate::evm::json_rpc::EthereumClient;
use crate::evm::Error;
use crate::range::BlockRange;

/// Logs of one contract over a block range that has been clamped to the head
/// observed right before fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedLogs {
    pub range: BlockRange,
    pub head: u64,
    pub logs: Vec<Log>,
    pub elapsed: Duration,
}

pub struct LogFetcher<C> {
    client: C,
    max_block_span: NonZeroU64,
    retry_policy: RetryPolicy,
}

impl<C> LogFetcher<C>
where
    C: EthereumClient,
{
    pub fn new(client: C, max_block_span: NonZeroU64, retry_policy: RetryPolicy) -> Self {
        Self {
            client,
            max_block_span,
            retry_policy,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetches the logs of `address` in `range`, optionally restricted to a
    /// first topic. No request is made if the clamped range is empty.
    pub async fn fetch(
        &self,
        address: Address,
        range: BlockRange,
        topic0: Option<H256>,
    ) -> Result<FetchedLogs, Error> {
        let head = with_retry(|| self.client.block_number(), self.retry_policy)
            .await
            .change_context(Error::BlockNumber)?
            .as_u64();
        let range = range.clamp_to(head);

        info!(address = ?address, range = %range, head, "fetching logs");

        let start = Instant::now();
        let mut logs = vec![];
        for chunk in range.chunks(self.max_block_span) {
            let filter = log_filter(address, chunk, topic0);

            let mut chunk_logs = with_retry(|| self.client.logs(filter.clone()), self.retry_policy)
                .await
                .change_context_lazy(|| Error::Logs(chunk.to_string()))?;

            debug!(range = %chunk, count = chunk_logs.len(), "fetched log chunk");
            logs.append(&mut chunk_logs);
        }

        Ok(FetchedLogs {
            range,
            head,
            logs,
            elapsed: start.elapsed(),
        })
    }
}

fn log_filter(address: Address, range: BlockRange, topic0: Option<H256>) -> Filter {
    let filter = Filter::new()
        .address(address)
        .from_block(BlockNumber::Number(U64::from(range.from())))
        .to_block(BlockNumber::Number(U64::from(range.to())));

    match topic0 {
        Some(topic) => filter.topic0(topic),
        None => filter,
    }
}
