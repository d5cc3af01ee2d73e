//! Default HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

use crate::builder::PostBody;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::{Endpoints, Transport};

/// Client for a Solr search service.
pub struct SolrClient {
    client: Client,
    origin: Url,
    endpoints: Endpoints,
}

impl SolrClient {
    /// Create a new client with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client for a custom origin, e.g. `https://search.example.com`.
    pub fn with_base_url(origin: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig {
            origin: origin.into(),
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let origin = Url::parse(&config.origin).map_err(|source| Error::InvalidUrl {
            url: config.origin.clone(),
            source,
        })?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            origin,
            endpoints: config.endpoints(),
        })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Absolute URLs are used as is; anything else is joined onto the origin.
    pub fn resolve(&self, target: &str) -> Result<Url> {
        let invalid = |source| Error::InvalidUrl {
            url: target.to_string(),
            source,
        };
        match Url::parse(target) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.origin.join(target).map_err(invalid),
            Err(source) => Err(invalid(source)),
        }
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Value> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transport for SolrClient {
    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get(&self, url: &str) -> Result<Value> {
        let url = self.resolve(url)?;
        self.send(self.client.get(url.clone()), &url).await
    }

    async fn post(&self, url: &str, body: &PostBody) -> Result<Value> {
        let url = self.resolve(url)?;
        self.send(self.client.post(url.clone()).json(body), &url).await
    }
}
