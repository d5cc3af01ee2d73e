//! Solr Query Builder
//!
//! This crate builds Solr search requests from chained clause calls and reshapes
//! the returned documents. It never interprets search semantics beyond quoting
//! and operator composition.
//!
//! # Examples
//!
//! ## Compose clauses
//!
//! ```rust
//! use solr_query::{clause, date, Field};
//!
//! let topics = clause::or(Field::Topics.as_str(), ["news", "events"]);
//! let recent = format!("{}:{}", Field::PublishDate, date::date_from_now());
//! assert_eq!(topics, "(topics:(news events))");
//! assert_eq!(recent, "publishdate:[NOW/DAY TO *]");
//! ```
//!
//! ## Execute a search (async)
//!
//! ```rust,no_run
//! use solr_query::{Field, QueryBuilder, SolrClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SolrClient::with_base_url("https://search.example.com")?;
//! let docs = QueryBuilder::default()
//!     .query(format!("{}:news", Field::AuthTemplate))
//!     .add_field_mapping(Field::TopicsTitle, "topics")
//!     .limit(10)
//!     .execute(&client)
//!     .await;
//! println!("{} documents", docs.len());
//! # Ok(())
//! # }
//! ```
//!
pub mod builder;
pub mod clause;
pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod fields;
pub mod mapper;
pub mod transport;

pub use builder::{
    PageValue, PostBody, QueryBuilder, QueryString, RejectReason, Rejection, SolrRequest,
    SortDirection, TransportMode,
};
pub use client::SolrClient;
pub use crate::config::ClientConfig;
pub use date::{DateFormatter, FormatOptions, MomentFormatter};
pub use error::{Error, Result};
pub use fields::Field;
pub use mapper::{Document, FieldMapping};
pub use transport::{Endpoints, Transport};
