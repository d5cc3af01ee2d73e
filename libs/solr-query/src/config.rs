//! Client configuration.
//!
//! Every field has a default, so a partial source (or none at all) is valid.
//! Environment overrides use the `SOLR_QUERY_` prefix, e.g.
//! `SOLR_QUERY_ORIGIN=https://search.example.com` or `SOLR_QUERY_TIMEOUT_SECS=5`.

use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment};
use serde::Deserialize;

use crate::error::Result;
use crate::transport::{Endpoints, DEFAULT_GET_PATH, DEFAULT_POST_PATH};

const ENV_PREFIX: &str = "SOLR_QUERY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host that relative request URLs are resolved against.
    pub origin: String,
    pub get_path: String,
    pub post_path: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8983".to_string(),
            get_path: DEFAULT_GET_PATH.to_string(),
            post_path: DEFAULT_POST_PATH.to_string(),
            timeout_secs: 30,
            user_agent: concat!("solr-query/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `SOLR_QUERY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::load(Config::builder().add_source(environment()))
    }

    pub(crate) fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            get: self.get_path.clone(),
            post: self.post_path.clone(),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}
