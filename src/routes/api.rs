use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::state::AppState;

/// Relays a letter request to the generation service. This route may be
/// called cross-origin, so every response carries permissive CORS headers.
pub async fn generate_letter(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match state.letters.generate(body).await {
        Ok(data) => with_cors(Json(data)),
        Err(e) => {
            error!("Generation API error: {}", e);
            with_cors((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to generate letter",
                    "details": e.to_string()
                })),
            ))
        }
    }
}

pub async fn generate_letter_preflight() -> Response {
    with_cors(StatusCode::OK)
}

pub async fn generate_letter_not_allowed(method: Method) -> Response {
    with_cors((
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST, OPTIONS")],
        Json(serde_json::json!({ "error": format!("Method {} Not Allowed", method) })),
    ))
}

/// Relays a finished letter to the archive service and hands back its JSON.
pub async fn archive_letter(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match state.letters.archive(body).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Archive API error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to archive letter" })),
            )
                .into_response()
        }
    }
}

pub async fn archive_not_allowed(method: Method) -> Response {
    not_allowed(method, "POST")
}

#[derive(Debug, Default, Deserialize)]
pub struct SheetQuery {
    worksheet: Option<String>,
    range: Option<String>,
}

pub async fn read_sheet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SheetQuery>,
) -> Json<Vec<Vec<String>>> {
    let Some(worksheet) = query.worksheet.filter(|w| !w.is_empty()) else {
        return Json(Vec::new());
    };
    Json(state.sheets.read(&worksheet, query.range.as_deref()).await)
}

pub async fn sheets_not_allowed(method: Method) -> Response {
    not_allowed(method, "GET")
}

fn not_allowed(method: Method, allow: &'static str) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, allow)],
        format!("Method {} Not Allowed", method),
    )
        .into_response()
}

fn with_cors(response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
