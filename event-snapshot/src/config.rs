use std::num::NonZeroU64;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::asyncutil::future::RetryPolicy;
use crate::url::Url;

pub const DEFAULT_RPC_URL: &str = "https://mainnet.infura.io/v3/your_api_key";
const PLACEHOLDER_API_KEY: &str = "your_api_key";

#[derive(Deserialize, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "Url::deserialize_sensitive")]
    pub rpc_url: Url,
    #[serde(with = "humantime_serde")]
    pub rpc_timeout: Duration,
    pub default_blocks: u64,
    /// Maximum number of blocks covered by a single `eth_getLogs` request.
    pub max_block_span: NonZeroU64,
    pub rpc_retry: RetryConfig,
}

impl Config {
    pub fn uses_placeholder_rpc(&self) -> bool {
        self.rpc_url.as_str().contains(PLACEHOLDER_API_KEY)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: Url::new_sensitive(DEFAULT_RPC_URL).expect("default rpc url is well-formed"),
            rpc_timeout: Duration::from_secs(25),
            default_blocks: 200,
            max_block_span: NonZeroU64::new(10_000).expect("block span is non-zero"),
            rpc_retry: RetryConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Copy)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u64,
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::repeat_constant(self.delay, self.max_attempts)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}
