pub mod config;
pub mod error;
pub mod ids;
pub mod routes;
pub mod sheets;
pub mod state;
pub mod templates;
pub mod theme;
pub mod upstream;
pub mod workflow;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<state::AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    Router::new()
        .route("/", get(routes::index))
        .route("/create-letter", get(routes::create_letter))
        .route("/create-letter/generate", post(routes::generate_letter_form))
        .route("/create-letter/archive", post(routes::archive_letter_form))
        .route("/letters-log", get(routes::letters_log))
        .route("/letters-log/:id/download", get(routes::download_letter))
        .route("/letters-log/:id/print", get(routes::print_letter))
        .route("/review-letter", get(routes::review_letter))
        .route("/review-letter/:id", post(routes::submit_review))
        .route("/theme", post(routes::toggle_theme))
        .route(
            "/api/generate-letter",
            post(routes::generate_letter)
                .options(routes::generate_letter_preflight)
                .fallback(routes::generate_letter_not_allowed),
        )
        .route(
            "/api/archive",
            post(routes::archive_letter).fallback(routes::archive_not_allowed),
        )
        .route(
            "/api/sheets",
            get(routes::read_sheet).fallback(routes::sheets_not_allowed),
        )
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
