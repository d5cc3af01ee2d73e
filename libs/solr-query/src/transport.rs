use async_trait::async_trait;

use crate::builder::PostBody;
use crate::error::Result;

/// Default path for GET searches.
pub const DEFAULT_GET_PATH: &str = "/myservices/search-service/doRequest/dp-content/dprender";

/// Default path for POST searches (the service root).
pub const DEFAULT_POST_PATH: &str = "";

/// Base URLs used when a builder has no explicit base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub get: String,
    pub post: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            get: DEFAULT_GET_PATH.to_string(),
            post: DEFAULT_POST_PATH.to_string(),
        }
    }
}

/// HTTP collaborator used by [`crate::QueryBuilder::execute`].
///
/// Implementations return the parsed JSON body of the response.
#[async_trait]
pub trait Transport: Send + Sync {
    fn endpoints(&self) -> &Endpoints;

    async fn get(&self, url: &str) -> Result<serde_json::Value>;

    async fn post(&self, url: &str, body: &PostBody) -> Result<serde_json::Value>;
}
