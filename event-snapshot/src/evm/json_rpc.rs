use async_trait::async_trait;
use ethers_core::types::{Filter, Log, U256, U64};
use ethers_providers::{JsonRpcClient, ProviderError};
use mockall::automock;

use crate::json_rpc::Client;

type Result<T> = error_stack::Result<T, ProviderError>;

#[automock]
#[async_trait]
pub trait EthereumClient {
    async fn chain_id(&self) -> Result<U256>;
    async fn block_number(&self) -> Result<U64>;
    async fn logs(&self, filter: Filter) -> Result<Vec<Log>>;
}

#[async_trait]
impl<P> EthereumClient for Client<P>
where
    P: JsonRpcClient + Send + Sync + 'static,
{
    async fn chain_id(&self) -> Result<U256> {
        self.request("eth_chainId", ()).await
    }

    async fn block_number(&self) -> Result<U64> {
        self.request("eth_blockNumber", ()).await
    }

    async fn logs(&self, filter: Filter) -> Result<Vec<Log>> {
        self.request("eth_getLogs", [filter]).await
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::types::{Address, BlockNumber, Bytes, Filter, Log, H256, U256, U64};
    use ethers_providers::MockProvider;

    use super::EthereumClient;
    use crate::json_rpc::Client;

    #[tokio::test]
    async fn chain_id_should_query_eth_chain_id() {
        let provider = MockProvider::new();
        provider.push::<U256, _>(U256::from(11_155_111)).unwrap();
        let client = Client::new(provider.clone());

        assert_eq!(client.chain_id().await.unwrap(), U256::from(11_155_111));
        provider.assert_request("eth_chainId", ()).unwrap();
    }

    #[tokio::test]
    async fn block_number_should_query_eth_block_number() {
        let provider = MockProvider::new();
        provider.push::<U64, _>(U64::from(19_000_000)).unwrap();
        let client = Client::new(provider.clone());

        assert_eq!(client.block_number().await.unwrap(), U64::from(19_000_000));
        provider.assert_request("eth_blockNumber", ()).unwrap();
    }

    #[tokio::test]
    async fn logs_should_pass_the_filter_through() {
        let log = Log {
            address: Address::random(),
            topics: vec![H256::random()],
            data: Bytes::from(vec![1, 2]),
            block_number: Some(U64::from(7)),
            transaction_hash: Some(H256::random()),
            log_index: Some(U256::from(3)),
            ..Default::default()
        };
        let filter = Filter::new()
            .address(log.address)
            .from_block(BlockNumber::Number(U64::from(5)))
            .to_block(BlockNumber::Number(U64::from(9)));

        let provider = MockProvider::new();
        provider.push::<Vec<Log>, _>(vec![log.clone()]).unwrap();
        let client = Client::new(provider.clone());

        assert_eq!(client.logs(filter.clone()).await.unwrap(), vec![log]);
        provider.assert_request("eth_getLogs", [filter]).unwrap();
    }

    #[tokio::test]
    async fn provider_errors_should_surface() {
        let client = Client::new(MockProvider::new());

        assert!(client.block_number().await.is_err());
    }
}
