use std::fmt::Debug;
use std::time::Duration;

use error_stack::Report;
use ethers_providers::{Http, JsonRpcClient, ProviderError};
use serde::{de::DeserializeOwned, Serialize};

use crate::url::Url;

type Result<T> = error_stack::Result<T, ProviderError>;

pub struct Client<P>
where
    P: JsonRpcClient,
{
    provider: P,
}

impl<P> Client<P>
where
    P: JsonRpcClient,
{
    pub fn new(provider: P) -> Self {
        Client { provider }
    }

    pub async fn request<T, R>(&self, method: &str, params: T) -> Result<R>
    where
        T: Debug + Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        self.provider
            .request(method, params)
            .await
            .map_err(Into::into)
            .map_err(Report::from)
    }
}

impl Client<Http> {
    /// Every request is aborted once `timeout` elapses.
    pub fn new_http(url: &Url, timeout: Duration) -> error_stack::Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Client::new(Http::new_with_client(
            url.to_standard_url(),
            client,
        )))
    }
}
