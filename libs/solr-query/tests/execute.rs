use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use solr_query::{
    clause, date, Endpoints, Error, Field, PostBody, QueryBuilder, Result, Transport,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Get(String),
    Post(String, Value),
}

enum Reply {
    Json(Value),
    Status(u16),
}

/// Records every request and answers with a canned reply.
struct StubTransport {
    endpoints: Endpoints,
    reply: Reply,
    calls: Mutex<Vec<Call>>,
}

impl StubTransport {
    fn new(reply: Reply) -> Self {
        Self {
            endpoints: Endpoints::default(),
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, url: &str) -> Result<Value> {
        match &self.reply {
            Reply::Json(body) => Ok(body.clone()),
            Reply::Status(status) => Err(Error::Status {
                status: *status,
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get(&self, url: &str) -> Result<Value> {
        self.calls.lock().unwrap().push(Call::Get(url.to_string()));
        self.answer(url)
    }

    async fn post(&self, url: &str, body: &PostBody) -> Result<Value> {
        let body = serde_json::to_value(body).unwrap();
        self.calls
            .lock()
            .unwrap()
            .push(Call::Post(url.to_string(), body));
        self.answer(url)
    }
}

fn search_response() -> Value {
    json!({
        "responseHeader": {"status": 0, "QTime": 3},
        "response": {
            "numFound": 2,
            "start": 0,
            "docs": [
                {
                    "id": "doc-1",
                    "topicstitle": ["Tech Talk"],
                    "contenttypetitle": ["Videos"],
                    "publishdate": "2016-05-25T22:00:00Z"
                },
                {
                    "id": "doc-2",
                    "topicstitle": ["Product News"],
                    "publishdate": "2017-01-10T08:30:00Z"
                }
            ]
        }
    })
}

#[tokio::test]
async fn test_get_execute_maps_documents() {
    let transport = StubTransport::new(Reply::Json(search_response()));

    let docs = QueryBuilder::new("/solr/content/select")
        .query(format!("{}:news", Field::AuthTemplate))
        .add_field_mapping(Field::TopicsTitle, "topics")
        .limit(2)
        .execute(&transport)
        .await;

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["topics"], json!(["Tech Talk"]));
    assert_eq!(docs[0]["topicstitle"], json!(["Tech Talk"]));
    assert_eq!(docs[0]["contenttypetitle"], json!(["Videos"]));
    assert_eq!(docs[1]["topics"], json!(["Product News"]));

    assert_eq!(
        transport.calls(),
        vec![Call::Get(
            "/solr/content/select?q=authtemplate%3Anews&rows=2".to_string()
        )]
    );
}

#[tokio::test]
async fn test_get_execute_uses_default_endpoint_and_roles() {
    let transport = StubTransport::new(Reply::Json(search_response()));

    QueryBuilder::default()
        .query("authtemplate:news")
        .restrict_by_roles()
        .execute(&transport)
        .await;

    assert_eq!(
        transport.calls(),
        vec![Call::Get(format!(
            "{}?q=authtemplate%3Anews&targetingRoles=true",
            transport.endpoints().get
        ))]
    );
}

#[tokio::test]
async fn test_post_execute_sends_body() {
    let transport = StubTransport::new(Reply::Json(search_response()));

    let docs = QueryBuilder::new("/solr/content/query")
        .switch_to_post()
        .query("authtemplate:news")
        .filter(format!(
            "{}:{}",
            Field::PublishDate,
            date::date_range("2016/01/01 00:00:00", date::SIMPLE_ISO)
        ))
        .sort(Field::PublishDate, false)
        .start(0)
        .limit(20)
        .restrict_by_roles()
        .execute(&transport)
        .await;

    assert_eq!(docs.len(), 2);
    assert_eq!(
        transport.calls(),
        vec![Call::Post(
            "/solr/content/query?targetingRoles=true".to_string(),
            json!({
                "query": ["authtemplate:news"],
                "filter": ["publishdate:[2016-01-01T00:00:00Z TO *]"],
                "sort": "publishdate desc",
                "start": 0,
                "limit": 20
            })
        )]
    );
}

#[tokio::test]
async fn test_transport_failure_yields_empty_list() {
    let transport = StubTransport::new(Reply::Status(500));

    let docs = QueryBuilder::default()
        .query("authtemplate:news")
        .execute(&transport)
        .await;
    assert!(docs.is_empty());

    let err = QueryBuilder::default()
        .query("authtemplate:news")
        .try_execute(&transport)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_shape_mismatch_yields_empty_list() {
    let transport = StubTransport::new(Reply::Json(json!({"error": {"msg": "undefined field"}})));

    let docs = QueryBuilder::default()
        .query("authtemplate:news")
        .execute(&transport)
        .await;
    assert!(docs.is_empty());

    let err = QueryBuilder::default()
        .query("authtemplate:news")
        .try_execute(&transport)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));
}

#[tokio::test]
async fn test_execute_through_trait_object() {
    let transport: Box<dyn Transport> = Box::new(StubTransport::new(Reply::Json(search_response())));

    let docs = QueryBuilder::default()
        .query(clause::and(
            Field::AuthTemplate.as_str(),
            ["news", "events"],
        ))
        .fields([Field::Id, Field::TopicsTitle])
        .execute(transport.as_ref())
        .await;

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1]["id"], json!("doc-2"));
}

#[tokio::test]
async fn test_independent_builders_run_concurrently() {
    let transport = StubTransport::new(Reply::Json(search_response()));

    let (news, events) = tokio::join!(
        QueryBuilder::default()
            .query("authtemplate:news")
            .execute(&transport),
        QueryBuilder::default()
            .query("authtemplate:events")
            .add_field_mapping("id", "key")
            .execute(&transport),
    );

    assert_eq!(news.len(), 2);
    assert!(news[0].get("key").is_none());
    assert_eq!(events[0]["key"], json!("doc-1"));
    assert_eq!(transport.calls().len(), 2);
}
