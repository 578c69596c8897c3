use std::time::Duration;

use chrono::Utc;
use error_stack::{Report, Result, ResultExt};
use ethers_core::types::{Address, H256};
use ethers_core::utils::to_checksum;
use event_commitment::{EventSnapshot, RawLogRecord, SnapshotBuilder};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::evm::json_rpc::EthereumClient;
use crate::evm::logs::{FetchedLogs, LogFetcher};
use crate::evm::{self, ChainInfo};
use crate::json_rpc::Client;
use crate::output::Envelope;
use crate::range::{BlockRange, RangeError};
use crate::target::{parse_address, parse_topic};
use crate::url::Url;
use crate::Error;

const PROGRESS_INTERVAL: usize = 50;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Contract address whose logs are snapshotted
    address: String,
    /// Only include logs whose first topic matches this event signature hash (0x + 64 hex digits)
    #[arg(long)]
    topic0: Option<String>,
    /// RPC endpoint, overrides the configured one
    #[arg(long, env = "RPC_URL")]
    rpc: Option<String>,
    /// First block of the range [default: the last --blocks blocks up to --to-block]
    #[arg(long)]
    from_block: Option<u64>,
    /// Last block of the range [default: chain tip]
    #[arg(long)]
    to_block: Option<u64>,
    /// Number of recent blocks to cover when the range is not fully specified [default: from config]
    #[arg(long, env = "ZK_EVENT_BLOCKS")]
    blocks: Option<u64>,
    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
    /// Skip the human-readable summary and only print JSON
    #[arg(long)]
    no_human: bool,
}

/// Validated inputs of a snapshot run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Request {
    address: Address,
    topic0: Option<H256>,
    from_block: Option<u64>,
    to_block: Option<u64>,
    blocks: u64,
}

impl Request {
    fn new(args: &Args, default_blocks: u64) -> Result<Self, Error> {
        let address = parse_address(&args.address).change_context(Error::InvalidAddress)?;
        let topic0 = args
            .topic0
            .as_deref()
            .map(parse_topic)
            .transpose()
            .change_context(Error::InvalidTopic)?;

        let blocks = args.blocks.unwrap_or(default_blocks);
        if blocks == 0 {
            return Err(Report::new(RangeError::ZeroBlocks).change_context(Error::InvalidRange));
        }

        Ok(Self {
            address,
            topic0,
            from_block: args.from_block,
            to_block: args.to_block,
            blocks,
        })
    }
}

pub async fn run(mut config: Config, args: Args) -> Result<Option<String>, Error> {
    let request = Request::new(&args, config.default_blocks)?;

    if let Some(rpc) = &args.rpc {
        config.rpc_url = Url::new_sensitive(rpc).change_context(Error::InvalidRpcUrl)?;
    }
    if config.uses_placeholder_rpc() {
        warn!("RPC endpoint still uses a placeholder API key, set RPC_URL or pass --rpc");
    }

    info!(
        rpc = %config.rpc_url,
        contract = %to_checksum(&request.address, None),
        "starting event snapshot"
    );

    let client = Client::new_http(&config.rpc_url, config.rpc_timeout)
        .change_context(Error::Connection)
        .attach_printable_lazy(|| config.rpc_url.clone())?;
    let fetcher = LogFetcher::new(client, config.max_block_span, config.rpc_retry.policy());

    let envelope = take_snapshot(&fetcher, &request, !args.no_human).await?;

    envelope
        .render(args.pretty)
        .change_context(Error::Output)
        .map(Some)
}

async fn take_snapshot<C>(
    fetcher: &LogFetcher<C>,
    request: &Request,
    human: bool,
) -> Result<Envelope, Error>
where
    C: EthereumClient,
{
    let start = Instant::now();

    let ChainInfo {
        chain_id,
        network,
        tip,
        ..
    } = evm::connect(fetcher.client())
        .await
        .change_context(Error::Connection)?;

    let range = BlockRange::resolve(request.from_block, request.to_block, request.blocks, tip)
        .change_context(Error::InvalidRange)?;

    let fetched = fetcher
        .fetch(request.address, range, request.topic0)
        .await
        .change_context(Error::FetchLogs)
        .attach_printable_lazy(|| format!("requested range {range}"))?;
    let fetch_time = fetched.elapsed;

    let envelope = Envelope::new(
        chain_id,
        network,
        build_snapshot(request.address, fetched)?,
        fetch_time,
        Utc::now(),
    );

    if human {
        log_summary(&envelope, start.elapsed());
    }

    Ok(envelope)
}

fn build_snapshot(address: Address, fetched: FetchedLogs) -> Result<EventSnapshot, Error> {
    let FetchedLogs {
        range, head, logs, ..
    } = fetched;
    let total = logs.len();

    let records = logs.into_iter().enumerate().map(|(i, log)| {
        let processed = i.saturating_add(1);
        if processed % PROGRESS_INTERVAL == 0 {
            info!("processed {processed}/{total} logs");
        }

        RawLogRecord::from(log)
    });

    SnapshotBuilder::new(address, range.from(), range.to())
        .head_block(head)
        .build(records)
        .change_context(Error::Snapshot)
}

fn log_summary(envelope: &Envelope, total_time: Duration) {
    let snapshot = &envelope.data;

    info!(
        "{} (chainId {}) blocks [{}, {}] events={}",
        envelope.network,
        envelope.chain_id,
        snapshot.from_block(),
        snapshot.to_block(),
        snapshot.event_count()
    );
    info!("commitmentKeccak: {}", snapshot.commitment());
    info!(
        "snapshot generation took {:.2}s (logs only: {}s)",
        total_time.as_secs_f64(),
        envelope.elapsed_sec
    );
}
