//! In-process stand-in for a catalog server
//!
//! An axum router serving the session and entityManager endpoints. Only the
//! Facility table exists; queries are interpreted just far enough for the
//! tests.

#![allow(dead_code)]

use axum::{
    extract::{Form, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use icat_admin::api::{CatalogClient, ClientConfig, ResilienceConfig, RetryConfig};
use regex::Regex;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::net::TcpListener;

type Shared = Arc<Mutex<CatalogState>>;
type Params = BTreeMap<String, String>;

pub const USERNAME: &str = "root";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
struct CatalogState {
    sessions: HashSet<String>,
    facilities: BTreeMap<i64, Map<String, Value>>,
    next_id: i64,
    next_session: u32,
    /// entityManager reads answer 503 while this is positive
    fail_reads: usize,
    requests: Vec<String>,
}

impl CatalogState {
    fn seeded() -> Self {
        let mut state = Self {
            next_id: 1,
            ..Self::default()
        };
        for (name, full_name) in [
            ("ISIS", "ISIS Neutron and Muon Source"),
            ("DLS", "Diamond Light Source"),
            ("ESRF", "European Synchrotron"),
        ] {
            state.insert(json!({ "name": name, "fullName": full_name }));
        }
        state
    }

    fn insert(&mut self, value: Value) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        let mut row = value.as_object().cloned().unwrap_or_default();
        row.insert("id".to_string(), json!(id));
        row.insert("createId".to_string(), json!("simple/root"));
        self.facilities.insert(id, row);
        id
    }
}

pub struct StubCatalog {
    pub url: String,
    state: Arc<Mutex<CatalogState>>,
}

impl StubCatalog {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(Mutex::new(CatalogState::seeded()));

        let app = router(Arc::clone(&state));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { url, state }
    }

    pub fn client_config() -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(5),
            resilience: ResilienceConfig::builder()
                .retry_config(RetryConfig::fixed(3, Duration::from_millis(10)))
                .bulk_retry(RetryConfig::fixed(2, Duration::from_millis(10)))
                .build(),
        }
    }

    pub async fn logged_in_client(&self) -> CatalogClient {
        let mut client = CatalogClient::new(self.url.clone(), &Self::client_config()).unwrap();
        client.login("simple", USERNAME, PASSWORD).await.unwrap();
        client
    }

    pub fn facility(&self, id: i64) -> Option<Map<String, Value>> {
        self.state.lock().unwrap().facilities.get(&id).cloned()
    }

    pub fn facility_count(&self) -> usize {
        self.state.lock().unwrap().facilities.len()
    }

    pub fn fail_reads(&self, times: usize) {
        self.state.lock().unwrap().fail_reads = times;
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/icat/session", post(create_session))
        .route(
            "/icat/session/:id",
            get(describe_session).put(refresh_session).delete(end_session),
        )
        .route(
            "/icat/entityManager",
            get(read_entities).post(write_entities).delete(delete_entities),
        )
        .with_state(state)
}

fn reply((status, body): (u16, String)) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Lock the catalog and log the request against it
fn record(state: &Shared, request: String) -> MutexGuard<'_, CatalogState> {
    let mut catalog = state.lock().unwrap();
    catalog.requests.push(request);
    catalog
}

fn error(status: u16, code: &str, message: &str) -> (u16, String) {
    (status, json!({ "code": code, "message": message }).to_string())
}

fn unknown_session(session_id: &str) -> (u16, String) {
    error(403, "SESSION", &format!("Unable to find user by sessionid: {}", session_id))
}

fn check_session(catalog: &CatalogState, params: &Params) -> Result<(), (u16, String)> {
    match params.get("sessionId") {
        Some(id) if catalog.sessions.contains(id) => Ok(()),
        Some(id) => Err(unknown_session(id)),
        None => Err(error(400, "BAD_PARAMETER", "sessionId is not set")),
    }
}

async fn create_session(State(state): State<Shared>, Form(form): Form<Params>) -> Response {
    let mut catalog = record(&state, "POST /icat/session".to_string());
    reply(login(&mut catalog, &form))
}

async fn describe_session(State(state): State<Shared>, Path(session_id): Path<String>) -> Response {
    let catalog = record(&state, format!("GET /icat/session/{}", session_id));
    if !catalog.sessions.contains(&session_id) {
        return reply(unknown_session(&session_id));
    }
    reply((200, json!({ "userName": "simple/root", "remainingMinutes": 119.5 }).to_string()))
}

async fn refresh_session(State(state): State<Shared>, Path(session_id): Path<String>) -> Response {
    let catalog = record(&state, format!("PUT /icat/session/{}", session_id));
    if !catalog.sessions.contains(&session_id) {
        return reply(unknown_session(&session_id));
    }
    StatusCode::OK.into_response()
}

async fn end_session(State(state): State<Shared>, Path(session_id): Path<String>) -> Response {
    let mut catalog = record(&state, format!("DELETE /icat/session/{}", session_id));
    if !catalog.sessions.remove(&session_id) {
        return reply(unknown_session(&session_id));
    }
    StatusCode::OK.into_response()
}

async fn read_entities(State(state): State<Shared>, Query(query): Query<Params>) -> Response {
    if query.get("query").is_some_and(|q| q.contains("'slow'")) {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }

    let mut catalog = record(&state, "GET /icat/entityManager".to_string());
    if let Err(rejection) = check_session(&catalog, &query) {
        return reply(rejection);
    }
    if catalog.fail_reads > 0 {
        catalog.fail_reads -= 1;
        return reply((503, "Service Unavailable".to_string()));
    }

    let Some(query_text) = query.get("query") else {
        return reply(error(400, "BAD_PARAMETER", "query is not set"));
    };
    reply(match query.get("id") {
        Some(id) => get_by_id(&catalog, query_text, id),
        None => run_query(&catalog, query_text),
    })
}

async fn write_entities(State(state): State<Shared>, Form(form): Form<Params>) -> Response {
    let mut catalog = record(&state, "POST /icat/entityManager".to_string());
    if let Err(rejection) = check_session(&catalog, &form) {
        return reply(rejection);
    }
    reply(write(&mut catalog, &form))
}

async fn delete_entities(State(state): State<Shared>, Query(query): Query<Params>) -> Response {
    let mut catalog = record(&state, "DELETE /icat/entityManager".to_string());
    if let Err(rejection) = check_session(&catalog, &query) {
        return reply(rejection);
    }
    reply(delete(&mut catalog, &query))
}

fn login(state: &mut CatalogState, form: &BTreeMap<String, String>) -> (u16, String) {
    let request: Value = form
        .get("json")
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or(Value::Null);

    let credentials = request["credentials"].as_array().cloned().unwrap_or_default();
    let field = |name: &str| {
        credentials
            .iter()
            .find_map(|c| c.get(name).and_then(Value::as_str).map(str::to_string))
    };

    if request["plugin"] != "simple"
        || field("username").as_deref() != Some(USERNAME)
        || field("password").as_deref() != Some(PASSWORD)
    {
        return error(403, "SESSION", "The username and password do not match");
    }

    state.next_session += 1;
    let session_id = format!("session-{}", state.next_session);
    state.sessions.insert(session_id.clone());
    (200, json!({ "sessionId": session_id }).to_string())
}

fn unknown_type(query: &str, table: &str) -> (u16, String) {
    error(
        400,
        "BAD_PARAMETER",
        &format!(
            "Problem with JPQL Exception Description: Problem compiling [{}]. \n[14, {}] The abstract schema type '{}' is unknown.",
            query,
            14 + table.len(),
            table
        ),
    )
}

fn get_by_id(state: &CatalogState, table: &str, id: &str) -> (u16, String) {
    if table != "Facility" {
        return unknown_type(table, table);
    }
    let Ok(id) = id.parse::<i64>() else {
        return error(400, "BAD_PARAMETER", "id is not a number");
    };
    match state.facilities.get(&id) {
        Some(row) => (200, json!({ "Facility": row }).to_string()),
        None => error(404, "NO_SUCH_OBJECT_FOUND", &format!("Facility[id:{}] not found.", id)),
    }
}

fn run_query(state: &CatalogState, query: &str) -> (u16, String) {
    let shape = Regex::new(r"^select (e|count\(e\)) from (\w+) e").unwrap();
    let Some(caps) = shape.captures(query) else {
        return error(400, "BAD_PARAMETER", &format!("Problem with JPQL Syntax error parsing [{}].", query));
    };
    let is_count = &caps[1] != "e";
    let table = &caps[2];
    if table != "Facility" {
        return unknown_type(query, table);
    }

    let mut rows: Vec<&Map<String, Value>> = state.facilities.values().collect();

    let predicate = Regex::new(r"where e\.(\w+) = (?:'([^']*)'|(\d+))").unwrap();
    if let Some(caps) = predicate.captures(query) {
        let field = caps[1].to_string();
        let expected = match (caps.get(2), caps.get(3)) {
            (Some(text), _) => json!(text.as_str()),
            (_, Some(number)) => json!(number.as_str().parse::<i64>().unwrap_or_default()),
            _ => Value::Null,
        };
        rows.retain(|row| row.get(&field) == Some(&expected));
    }

    if is_count {
        return (200, json!([rows.len()]).to_string());
    }

    let order = Regex::new(r"order by e\.(\w+) (asc|desc)").unwrap();
    if let Some(caps) = order.captures(query) {
        let field = caps[1].to_string();
        rows.sort_by_key(|row| row.get(&field).map(|v| v.to_string()).unwrap_or_default());
        if &caps[2] == "desc" {
            rows.reverse();
        }
    }

    let limit = Regex::new(r"limit (\d+), (\d+)").unwrap();
    if let Some(caps) = limit.captures(query) {
        let offset: usize = caps[1].parse().unwrap_or(0);
        let count: usize = caps[2].parse().unwrap_or(0);
        rows = rows.into_iter().skip(offset).take(count).collect();
    }

    let tagged: Vec<Value> = rows.into_iter().map(|row| json!({ "Facility": row })).collect();
    (200, Value::Array(tagged).to_string())
}

fn tagged_facilities(raw: Option<&String>) -> Option<Vec<Map<String, Value>>> {
    let entities: Value = serde_json::from_str(raw?).ok()?;
    entities
        .as_array()?
        .iter()
        .map(|tagged| tagged.get("Facility").and_then(Value::as_object).cloned())
        .collect()
}

fn write(state: &mut CatalogState, form: &BTreeMap<String, String>) -> (u16, String) {
    let Some(entities) = tagged_facilities(form.get("entities")) else {
        return error(400, "BAD_PARAMETER", "entities must be Facility objects");
    };

    let mut ids = Vec::new();
    for entity in entities {
        let id = entity.get("id").and_then(Value::as_i64);
        match id {
            Some(id) => {
                let Some(row) = state.facilities.get_mut(&id) else {
                    return error(404, "NO_SUCH_OBJECT_FOUND", &format!("Facility[id:{}] not found.", id));
                };
                for (field, value) in entity {
                    row.insert(field, value);
                }
                ids.push(id);
            }
            None => {
                if !entity.get("name").is_some_and(Value::is_string) {
                    return error(400, "VALIDATION", "Facility.name cannot be null");
                }
                ids.push(state.insert(Value::Object(entity)));
            }
        }
    }
    (200, json!(ids).to_string())
}

fn delete(state: &mut CatalogState, query: &BTreeMap<String, String>) -> (u16, String) {
    let Some(entities) = tagged_facilities(query.get("entities")) else {
        return error(400, "BAD_PARAMETER", "entities must be Facility objects");
    };

    for entity in entities {
        let id = entity.get("id").and_then(Value::as_i64).unwrap_or_default();
        if state.facilities.remove(&id).is_none() {
            return error(404, "NO_SUCH_OBJECT_FOUND", &format!("Facility[id:{}] not found.", id));
        }
    }
    (200, String::new())
}
