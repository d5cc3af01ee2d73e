//! Fluent search request builder.
//!
//! A [`QueryBuilder`] accumulates clauses for one request in one of two
//! encodings: a GET query string (`?q=...&fq=...`) or a POST JSON body
//! (`{"query": [...], "filter": [...]}`). The encoding is chosen once with
//! [`QueryBuilder::switch_to_post`]; call it before adding anything else.
//!
//! Setters never fail. Invalid input (blank clauses, empty lists, NaN or
//! negative page numbers) leaves the request untouched and is recorded in
//! [`QueryBuilder::rejections`].
//!
//! ```
//! use solr_query::{clause, Field, QueryBuilder};
//!
//! let builder = QueryBuilder::new("/solr/content/select")
//!     .query(format!("{}:news", Field::AuthTemplate))
//!     .filter(clause::not("contenttype:video"))
//!     .sort(Field::PublishDate, false)
//!     .limit(10);
//!
//! assert_eq!(
//!     builder.query_string().unwrap(),
//!     "?q=authtemplate:news&fq=(! contenttype:video)&sort=publishdate desc&rows=10"
//! );
//! ```

use std::fmt;

use serde::Serialize;

use crate::clause::is_valid;
use crate::error::{Error, Result};
use crate::mapper::{map_response, Document, FieldMapping};
use crate::transport::{Endpoints, Transport};

/// Query parameter that limits results to the caller's roles.
pub const ROLES_PARAM: &str = "targetingRoles=true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl From<bool> for SortDirection {
    fn from(ascending: bool) -> Self {
        if ascending {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered `key=value` parameters of a GET request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    params: Vec<(String, String)>,
}

impl QueryString {
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.params.push((key.to_string(), value.into()));
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Same layout as `Display`, with values percent-encoded for the wire.
    pub fn encoded(&self) -> String {
        self.render(|value| urlencoding::encode(value).into_owned())
    }

    fn render(&self, encode: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        for (i, (key, value)) in self.params.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(key);
            out.push('=');
            out.push_str(&encode(value));
        }
        out
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(str::to_string))
    }
}

/// JSON body of a POST search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostBody {
    pub query: Vec<String>,
    pub filter: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Encoding {
    Get(QueryString),
    Post(PostBody),
}

/// Values accepted by [`QueryBuilder::start`] and [`QueryBuilder::limit`].
pub trait PageValue {
    /// `None` for negative, fractional, non-finite or non-numeric input.
    fn to_page_value(&self) -> Option<u64>;
}

macro_rules! impl_page_value_int {
    ($($t:ty),*) => {
        $(
            impl PageValue for $t {
                fn to_page_value(&self) -> Option<u64> {
                    u64::try_from(*self).ok()
                }
            }
        )*
    };
}

impl_page_value_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl PageValue for f64 {
    fn to_page_value(&self) -> Option<u64> {
        if self.is_finite() && self.fract() == 0.0 && *self >= 0.0 && *self < u64::MAX as f64 {
            Some(*self as u64)
        } else {
            None
        }
    }
}

impl PageValue for f32 {
    fn to_page_value(&self) -> Option<u64> {
        f64::from(*self).to_page_value()
    }
}

impl PageValue for str {
    fn to_page_value(&self) -> Option<u64> {
        let trimmed = self.trim();
        trimmed
            .parse::<u64>()
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().and_then(|n| n.to_page_value()))
    }
}

impl PageValue for String {
    fn to_page_value(&self) -> Option<u64> {
        self.as_str().to_page_value()
    }
}

impl<T: PageValue + ?Sized> PageValue for &T {
    fn to_page_value(&self) -> Option<u64> {
        (**self).to_page_value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    BlankClause,
    EmptyList,
    InvalidNumber,
    BlankField,
    EmptyTable,
}

/// A setter call that was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub operation: &'static str,
    pub reason: RejectReason,
}

/// A fully resolved request, ready for a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolrRequest {
    Get { url: String },
    Post { url: String, body: PostBody },
}

impl SolrRequest {
    pub fn url(&self) -> &str {
        match self {
            Self::Get { url } | Self::Post { url, .. } => url,
        }
    }

    pub fn mode(&self) -> TransportMode {
        match self {
            Self::Get { .. } => TransportMode::Get,
            Self::Post { .. } => TransportMode::Post,
        }
    }
}

/// Builder for a single search request. See the module docs.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_url: Option<String>,
    encoding: Encoding,
    field_mapping: FieldMapping,
    restrict_roles: bool,
    has_query: bool,
    rejections: Vec<Rejection>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            encoding: Encoding::Get(QueryString::default()),
            field_mapping: FieldMapping::new(),
            restrict_roles: false,
            has_query: false,
            rejections: Vec::new(),
        }
    }
}

impl QueryBuilder {
    /// Builder targeting `base_url`. A blank URL falls back to the transport's
    /// default endpoint for the active mode.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: is_valid(&base_url).then_some(base_url),
            ..Self::default()
        }
    }

    /// Switches to POST encoding for the rest of this builder's life.
    ///
    /// Parameters already added in GET mode are not carried over.
    pub fn switch_to_post(mut self) -> Self {
        if let Encoding::Get(params) = &self.encoding {
            if !params.is_empty() {
                tracing::warn!(
                    dropped = params.params().len(),
                    "Switching search to POST discards parameters added in GET mode"
                );
                self.has_query = false;
            }
            self.encoding = Encoding::Post(PostBody::default());
        }
        self
    }

    /// Main query clause (`q`).
    pub fn query(mut self, clause: impl AsRef<str>) -> Self {
        let clause = clause.as_ref();
        if !is_valid(clause) {
            return self.reject("query", RejectReason::BlankClause);
        }
        match &mut self.encoding {
            Encoding::Get(params) => params.push("q", clause),
            Encoding::Post(body) => body.query.push(clause.to_string()),
        }
        self.has_query = true;
        self
    }

    /// Filter query clause (`fq`).
    pub fn filter(mut self, clause: impl AsRef<str>) -> Self {
        let clause = clause.as_ref();
        if !is_valid(clause) {
            return self.reject("filter", RejectReason::BlankClause);
        }
        match &mut self.encoding {
            Encoding::Get(params) => params.push("fq", clause),
            Encoding::Post(body) => body.filter.push(clause.to_string()),
        }
        self
    }

    /// Restricts the returned fields (`fl`). Blank names are dropped.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<String> = fields
            .into_iter()
            .filter(|f| is_valid(f.as_ref()))
            .map(|f| f.as_ref().to_string())
            .collect();
        if fields.is_empty() {
            return self.reject("fields", RejectReason::EmptyList);
        }
        match &mut self.encoding {
            Encoding::Get(params) => params.push("fl", fields.join(",")),
            Encoding::Post(body) => body.fields = Some(fields),
        }
        self
    }

    /// Sorts by a single field.
    pub fn sort(self, field: impl AsRef<str>, ascending: bool) -> Self {
        self.sort_many([field], [ascending])
    }

    /// Sorts by several fields, pairing names and flags by position.
    ///
    /// Fields without a matching flag sort ascending.
    pub fn sort_many<I, S, A>(mut self, fields: I, ascending: A) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        A: IntoIterator<Item = bool>,
    {
        let mut flags = ascending.into_iter();
        let tokens: Vec<String> = fields
            .into_iter()
            .map(|field| (field, SortDirection::from(flags.next().unwrap_or(true))))
            .filter(|(field, _)| is_valid(field.as_ref()))
            .map(|(field, direction)| format!("{} {}", field.as_ref().trim(), direction))
            .collect();
        if tokens.is_empty() {
            return self.reject("sort", RejectReason::EmptyList);
        }

        let sort = tokens.join(", ");
        match &mut self.encoding {
            Encoding::Get(params) => params.push("sort", sort),
            Encoding::Post(body) => body.sort = Some(sort),
        }
        self
    }

    /// Offset of the first returned document (`start`).
    pub fn start(mut self, offset: impl PageValue) -> Self {
        let Some(offset) = offset.to_page_value() else {
            return self.reject("start", RejectReason::InvalidNumber);
        };
        match &mut self.encoding {
            Encoding::Get(params) => params.push("start", offset.to_string()),
            Encoding::Post(body) => body.start = Some(offset),
        }
        self
    }

    /// Maximum number of documents; `rows` on the query string, `limit` in a POST body.
    pub fn limit(mut self, count: impl PageValue) -> Self {
        let Some(count) = count.to_page_value() else {
            return self.reject("limit", RejectReason::InvalidNumber);
        };
        match &mut self.encoding {
            Encoding::Get(params) => params.push("rows", count.to_string()),
            Encoding::Post(body) => body.limit = Some(count),
        }
        self
    }

    /// Appends [`ROLES_PARAM`] to the request URL on execution.
    pub fn restrict_by_roles(mut self) -> Self {
        self.restrict_roles = true;
        self
    }

    /// Copies `source` into `destination` on every returned document.
    pub fn add_field_mapping(mut self, source: impl AsRef<str>, destination: impl AsRef<str>) -> Self {
        let (source, destination) = (source.as_ref(), destination.as_ref());
        if !is_valid(source) || !is_valid(destination) {
            return self.reject("add_field_mapping", RejectReason::BlankField);
        }
        self.field_mapping.insert(source, destination);
        self
    }

    /// Merges a whole table; rejected as a unit if empty or if any name is blank.
    pub fn add_field_mapping_table<I, S, D>(mut self, table: I) -> Self
    where
        I: IntoIterator<Item = (S, D)>,
        S: AsRef<str>,
        D: AsRef<str>,
    {
        let table: Vec<(S, D)> = table.into_iter().collect();
        if table.is_empty() {
            return self.reject("add_field_mapping_table", RejectReason::EmptyTable);
        }
        if table
            .iter()
            .any(|(s, d)| !is_valid(s.as_ref()) || !is_valid(d.as_ref()))
        {
            return self.reject("add_field_mapping_table", RejectReason::BlankField);
        }
        self.field_mapping
            .extend(table.iter().map(|(s, d)| (s.as_ref(), d.as_ref())));
        self
    }

    pub fn transport_mode(&self) -> TransportMode {
        match self.encoding {
            Encoding::Get(_) => TransportMode::Get,
            Encoding::Post(_) => TransportMode::Post,
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Raw query string in GET mode, e.g. `?q=authtemplate:news&rows=10`.
    pub fn query_string(&self) -> Option<String> {
        match &self.encoding {
            Encoding::Get(params) => Some(params.to_string()),
            Encoding::Post(_) => None,
        }
    }

    pub fn query_params(&self) -> Option<&QueryString> {
        match &self.encoding {
            Encoding::Get(params) => Some(params),
            Encoding::Post(_) => None,
        }
    }

    pub fn post_body(&self) -> Option<&PostBody> {
        match &self.encoding {
            Encoding::Get(_) => None,
            Encoding::Post(body) => Some(body),
        }
    }

    pub fn field_mapping(&self) -> &FieldMapping {
        &self.field_mapping
    }

    pub fn roles_restricted(&self) -> bool {
        self.restrict_roles
    }

    /// Whether a main query clause has been added.
    pub fn has_query(&self) -> bool {
        self.has_query
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    /// Resolves the URL (and body) that [`Self::execute`] would send.
    pub fn request(&self, endpoints: &Endpoints) -> SolrRequest {
        match &self.encoding {
            Encoding::Get(params) => {
                let base = self.base_url.as_deref().unwrap_or(&endpoints.get);
                let mut url = base.to_string();
                if let Some(query) = params.encoded().strip_prefix('?') {
                    url.push(if base.contains('?') { '&' } else { '?' });
                    url.push_str(query);
                }
                if self.restrict_roles {
                    url.push(if url.contains('?') { '&' } else { '?' });
                    url.push_str(ROLES_PARAM);
                }
                SolrRequest::Get { url }
            }
            Encoding::Post(body) => {
                let base = self.base_url.as_deref().unwrap_or(&endpoints.post);
                let mut url = base.to_string();
                if self.restrict_roles {
                    url.push(if base.contains('?') { '&' } else { '?' });
                    url.push_str(ROLES_PARAM);
                }
                SolrRequest::Post {
                    url,
                    body: body.clone(),
                }
            }
        }
    }

    /// Sends the request and returns the mapped documents.
    ///
    /// Failures are logged and yield an empty list; use [`Self::try_execute`]
    /// to tell them apart from an empty result.
    pub async fn execute<T>(self, transport: &T) -> Vec<Document>
    where
        T: Transport + ?Sized,
    {
        match self.try_execute(transport).await {
            Ok(docs) => docs,
            Err(err @ Error::ShapeMismatch(_)) => {
                tracing::warn!(error = %err, "Search response had no documents list");
                Vec::new()
            }
            Err(err) => {
                tracing::error!(error = %err, "Search request failed");
                Vec::new()
            }
        }
    }

    pub async fn try_execute<T>(self, transport: &T) -> Result<Vec<Document>>
    where
        T: Transport + ?Sized,
    {
        if !self.has_query {
            tracing::debug!("Executing search without a main query clause");
        }

        let request = self.request(transport.endpoints());
        tracing::debug!(mode = ?request.mode(), url = %request.url(), "Executing search request");

        let body = match &request {
            SolrRequest::Get { url } => transport.get(url).await?,
            SolrRequest::Post { url, body } => transport.post(url, body).await?,
        };

        map_response(body, &self.field_mapping)
    }

    fn reject(mut self, operation: &'static str, reason: RejectReason) -> Self {
        tracing::debug!(operation, ?reason, "Ignoring invalid search builder input");
        self.rejections.push(Rejection { operation, reason });
        self
    }
}
