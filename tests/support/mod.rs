#![allow(dead_code)]

use axum::{
    body::{self, Body, Bytes},
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use letterdesk::{build_router, config::Config, state::AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

pub const SHEETS_KEY: &str = "test-key";
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

#[derive(Clone)]
pub enum GenerateReply {
    Json(Value),
    Status(u16),
}

/// Stand-in for the letter service and the spreadsheet API.
#[derive(Clone)]
pub struct FakeUpstream {
    pub generate_hits: Arc<AtomicUsize>,
    pub generate_bodies: Arc<Mutex<Vec<Bytes>>>,
    pub generate_reply: Arc<Mutex<GenerateReply>>,
    pub archive_bodies: Arc<Mutex<Vec<Value>>>,
    pub sheets: Arc<Mutex<HashMap<String, Vec<Vec<String>>>>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self {
            generate_hits: Arc::new(AtomicUsize::new(0)),
            generate_bodies: Arc::new(Mutex::new(Vec::new())),
            generate_reply: Arc::new(Mutex::new(GenerateReply::Json(
                json!({ "letter": "نص الخطاب..." }),
            ))),
            archive_bodies: Arc::new(Mutex::new(Vec::new())),
            sheets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn reply_with(&self, reply: GenerateReply) {
        *self.generate_reply.lock().expect("lock") = reply;
    }

    pub fn seed(&self, worksheet: &str, rows: &[&[&str]]) {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.sheets
            .lock()
            .expect("lock")
            .insert(worksheet.to_string(), rows);
    }

    pub fn rows(&self, worksheet: &str) -> Vec<Vec<String>> {
        self.sheets
            .lock()
            .expect("lock")
            .get(worksheet)
            .cloned()
            .unwrap_or_default()
    }

    pub fn hits(&self) -> usize {
        self.generate_hits.load(Ordering::SeqCst)
    }

    pub fn archived(&self) -> Vec<Value> {
        self.archive_bodies.lock().expect("lock").clone()
    }

    /// Serves the fake on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/generate-letter", post(fake_generate))
            .route("/archive-letter", post(fake_archive))
            .route(
                "/v4/spreadsheets/:id/values/:target",
                get(fake_read).post(fake_append),
            )
            .with_state(self.clone());
        serve(app).await
    }
}

pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

async fn fake_generate(State(fake): State<FakeUpstream>, body: Bytes) -> Response {
    fake.generate_hits.fetch_add(1, Ordering::SeqCst);
    fake.generate_bodies.lock().expect("lock").push(body);
    let reply = fake.generate_reply.lock().expect("lock").clone();
    match reply {
        GenerateReply::Json(value) => Json(value).into_response(),
        GenerateReply::Status(code) => (
            StatusCode::from_u16(code).expect("status"),
            Json(json!({ "error": "upstream failed" })),
        )
            .into_response(),
    }
}

async fn fake_archive(State(fake): State<FakeUpstream>, Json(body): Json<Value>) -> Json<Value> {
    let id = body.get("ID").cloned().unwrap_or(Value::Null);
    fake.archive_bodies.lock().expect("lock").push(body);
    Json(json!({ "status": "archived", "id": id }))
}

async fn fake_read(
    State(fake): State<FakeUpstream>,
    Path((_id, target)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if query.get("key").map(String::as_str) != Some(SHEETS_KEY) {
        return Json(json!({ "error": { "code": 403, "message": "bad key" } }));
    }
    let worksheet = target.split('!').next().unwrap_or_default();
    Json(json!({ "range": target, "values": fake.rows(worksheet) }))
}

async fn fake_append(
    State(fake): State<FakeUpstream>,
    Path((_id, target)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let worksheet = target.trim_end_matches(":append").to_string();
    let new_rows: Vec<Vec<String>> = body["values"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .map(|row| {
            row.iter()
                .map(|c| c.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .collect();
    let count = new_rows.len();
    fake.sheets
        .lock()
        .expect("lock")
        .entry(worksheet)
        .or_default()
        .extend(new_rows);
    Json(json!({ "updates": { "updatedRows": count } }))
}

pub fn config_for(base: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        generation_url: format!("{}/generate-letter", base),
        archive_url: format!("{}/archive-letter", base),
        sheets_api_base: base.to_string(),
        spreadsheet_id: "sheet-test".to_string(),
        sheets_api_key: SHEETS_KEY.to_string(),
        settings_worksheet: "Settings".to_string(),
        submissions_worksheet: "Submissions".to_string(),
        upstream_timeout_secs: 5,
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
    }
}

pub fn app_for(base: &str) -> Router {
    let state = AppState::new(Arc::new(config_for(base))).expect("state");
    build_router(Arc::new(state))
}

pub fn form_body(pairs: &[(&str, &str)]) -> String {
    let mut url = reqwest::Url::parse("http://form.local/").expect("url");
    url.query_pairs_mut().extend_pairs(pairs);
    url.query().unwrap_or_default().to_string()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("response")
}

pub async fn post_form(app: &Router, uri: &str, pairs: &[(&str, &str)]) -> Response {
    let request = Request::post(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form_body(pairs)))
        .expect("request");
    send(app, request).await
}

pub async fn get_page(app: &Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).expect("request")).await
}

pub async fn text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

pub async fn json_body(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn header<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
