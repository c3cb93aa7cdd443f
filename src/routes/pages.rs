use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;
use tracing::{error, info, warn};

use crate::sheets::{DropdownOptions, ReviewStatus, Submission};
use crate::state::AppState;
use crate::theme::Theme;
use crate::workflow::log::{content_disposition, export_text, translate_type, TYPE_FILTER_CHOICES};
use crate::workflow::{
    CreateStage, CreateWorkflow, LetterForm, LogFilter, LogView, ReviewDraft, ReviewOutcome,
    ReviewSession, Template,
};

const GENERATION_FAILED: &str = "حدث خطأ في إنشاء الخطاب";
const ARCHIVE_FAILED: &str = "حدث خطأ في حفظ الخطاب";
const ARCHIVED: &str = "تم حفظ الخطاب بنجاح";
const STATUS_UPDATE_FAILED: &str = "حدث خطأ في تحديث الحالة";

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    reviewed: Option<String>,
}

pub async fn index(headers: HeaderMap, Query(query): Query<IndexQuery>) -> Html<String> {
    let mut ctx = page_context(&headers, "home");
    if let Some(outcome) = query.reviewed.as_deref().and_then(ReviewOutcome::from_slug) {
        ctx.insert(
            "notice",
            &format!("تم تحديث حالة الخطاب إلى: {}", outcome.label()),
        );
    }
    render_template("index.html", ctx)
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateQuery {
    saved: Option<String>,
}

pub async fn create_letter(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CreateQuery>,
) -> Html<String> {
    let notice = query.saved.is_some().then_some(ARCHIVED);
    render_create(&state, &headers, &CreateWorkflow::new(), notice).await
}

pub async fn generate_letter_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LetterForm>,
) -> Html<String> {
    let mut workflow = CreateWorkflow::with_form(form);
    let request = match workflow.generation_request() {
        Ok(request) => request,
        Err(blocked) => {
            return render_create(&state, &headers, &workflow, Some(blocked.message())).await
        }
    };

    let body = match serde_json::to_vec(&request) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to encode letter request: {}", e);
            return render_create(&state, &headers, &workflow, Some(GENERATION_FAILED)).await;
        }
    };

    match state.letters.generate(body.into()).await {
        Ok(data) => {
            workflow.enter_preview(&data);
            render_create(&state, &headers, &workflow, None).await
        }
        Err(e) => {
            error!("Error generating letter: {}", e);
            render_create(&state, &headers, &workflow, Some(GENERATION_FAILED)).await
        }
    }
}

/// Preview step post: the form fields ride along as hidden inputs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewForm {
    letter_type: String,
    purpose: String,
    style: String,
    is_first: String,
    recipient: String,
    title: String,
    content: String,
    generated_letter: String,
    template: String,
    action: String,
}

impl PreviewForm {
    fn into_workflow(self) -> (CreateWorkflow, String) {
        let template = Template::from_id(&self.template);
        let form = LetterForm {
            letter_type: self.letter_type,
            purpose: self.purpose,
            style: self.style,
            is_first: self.is_first,
            recipient: self.recipient,
            title: self.title,
            content: self.content,
        };
        (
            CreateWorkflow::in_preview(form, self.generated_letter, template),
            self.action,
        )
    }
}

pub async fn archive_letter_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(preview): Form<PreviewForm>,
) -> Response {
    let (mut workflow, action) = preview.into_workflow();
    if action == "back" {
        workflow.back_to_form();
        return render_create(&state, &headers, &workflow, None)
            .await
            .into_response();
    }

    let record = match workflow.archive_record(state.archive_ids.next()) {
        Ok(record) => record,
        Err(blocked) => {
            return render_create(&state, &headers, &workflow, Some(blocked.message()))
                .await
                .into_response()
        }
    };

    let body = match serde_json::to_vec(&record) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to encode archive record: {}", e);
            return render_create(&state, &headers, &workflow, Some(ARCHIVE_FAILED))
                .await
                .into_response();
        }
    };

    match state.letters.archive(body.into()).await {
        Ok(_) => {
            info!("Archived letter {}", record.id);
            Redirect::to("/create-letter?saved=1").into_response()
        }
        Err(e) => {
            error!("Error saving letter {}: {}", record.id, e);
            render_create(&state, &headers, &workflow, Some(ARCHIVE_FAILED))
                .await
                .into_response()
        }
    }
}

#[derive(Serialize)]
struct TemplateChoice {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    selected: bool,
}

async fn render_create(
    state: &AppState,
    headers: &HeaderMap,
    workflow: &CreateWorkflow,
    notice: Option<&str>,
) -> Html<String> {
    let mut ctx = page_context(headers, "create");
    if let Some(notice) = notice {
        ctx.insert("notice", notice);
    }
    ctx.insert("form", workflow.form());

    match workflow.stage() {
        CreateStage::Form => {
            let rows = state
                .sheets
                .read(&state.config.settings_worksheet, None)
                .await;
            let options = DropdownOptions::from_settings_sheet(&rows);
            if options.letter_types.is_empty() {
                warn!("No letter types available from {}", state.config.settings_worksheet);
            }
            ctx.insert("options", &options);
            render_template("create_letter.html", ctx)
        }
        CreateStage::Preview => {
            let templates: Vec<TemplateChoice> = Template::ALL
                .into_iter()
                .map(|t| TemplateChoice {
                    id: t.id(),
                    name: t.name(),
                    description: t.description(),
                    selected: workflow.template() == Some(t),
                })
                .collect();
            ctx.insert("generated_letter", workflow.generated_letter());
            ctx.insert("templates", &templates);
            ctx.insert("template_selected", &workflow.template().is_some());
            render_template("letter_preview.html", ctx)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LogQuery {
    q: String,
    #[serde(rename = "type")]
    letter_type: String,
    review: String,
    /// Comma-separated ids removed from this view.
    hidden: String,
}

#[derive(Serialize)]
struct LogRow<'a> {
    letter: &'a Submission,
    type_label: &'a str,
    status_class: &'static str,
    hidden_after: String,
}

pub async fn letters_log(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LogQuery>,
) -> Html<String> {
    let mut view = LogView::new(load_submissions(&state).await);
    for id in query.hidden.split(',').filter(|id| !id.is_empty()) {
        view.hide(id);
    }

    let filter = LogFilter {
        search: query.q,
        letter_type: query.letter_type,
        review: query.review,
    };
    let rows: Vec<LogRow> = view
        .filtered(&filter)
        .into_iter()
        .map(|letter| LogRow {
            letter,
            type_label: translate_type(&letter.letter_type),
            status_class: letter.review.css_class(),
            hidden_after: hidden_with(view.hidden(), &letter.id),
        })
        .collect();

    let mut ctx = page_context(&headers, "log");
    ctx.insert("rows", &rows);
    ctx.insert("q", &filter.search);
    ctx.insert("type_filter", &filter.letter_type);
    ctx.insert("review_filter", &filter.review);
    ctx.insert("hidden", &view.hidden().join(","));
    ctx.insert("type_choices", &TYPE_FILTER_CHOICES);
    ctx.insert("review_choices", &ReviewStatus::filter_choices());
    render_template("letters_log.html", ctx)
}

fn hidden_with(hidden: &[String], id: &str) -> String {
    hidden
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(id))
        .collect::<Vec<_>>()
        .join(",")
}

pub async fn download_letter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let view = LogView::new(load_submissions(&state).await);
    match view.find(&id) {
        Some(letter) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(letter)),
            ],
            export_text(letter),
        )
            .into_response(),
        None => Redirect::to("/letters-log").into_response(),
    }
}

pub async fn print_letter(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let view = LogView::new(load_submissions(&state).await);
    let Some(letter) = view.find(&id) else {
        return Redirect::to("/letters-log").into_response();
    };
    let mut ctx = page_context(&headers, "log");
    ctx.insert("letter", letter);
    ctx.insert("type_label", translate_type(&letter.letter_type));
    render_template("print_letter.html", ctx).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    id: Option<String>,
}

pub async fn review_letter(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ReviewQuery>,
) -> Html<String> {
    let mut session = ReviewSession::new(load_submissions(&state).await);
    if let Some(id) = query.id.as_deref() {
        session.select(id);
    }
    render_review(&headers, &session, None)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    reviewer_name: String,
    letter_content: String,
    notes: String,
    review_completed: Option<String>,
    outcome: String,
}

pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Response {
    let mut session = ReviewSession::new(load_submissions(&state).await);
    if !session.select(&id) {
        return Redirect::to("/review-letter").into_response();
    }

    let reviewer = form.reviewer_name.trim().to_string();
    session.update_draft(ReviewDraft {
        reviewer_name: form.reviewer_name,
        letter_content: form.letter_content,
        notes: form.notes,
        review_completed: form.review_completed.is_some(),
    });

    let Some(outcome) = ReviewOutcome::from_slug(&form.outcome) else {
        return render_review(&headers, &session, Some(STATUS_UPDATE_FAILED)).into_response();
    };

    match session.apply(outcome) {
        Ok(letter) => {
            // The decision only lives in this request's copy of the list.
            info!(
                letter_id = %letter.id,
                reviewer = %reviewer,
                status = %letter.review.label(),
                "Review decision recorded"
            );
            Redirect::to(&format!("/?reviewed={}", outcome.slug())).into_response()
        }
        Err(blocked) => render_review(&headers, &session, Some(blocked.message())).into_response(),
    }
}

#[derive(Serialize)]
struct StatusRow<'a> {
    letter: &'a Submission,
    status_class: &'static str,
}

#[derive(Serialize)]
struct OutcomeButton {
    slug: &'static str,
    label: &'static str,
    class: &'static str,
}

fn render_review(headers: &HeaderMap, session: &ReviewSession, notice: Option<&str>) -> Html<String> {
    let mut ctx = page_context(headers, "review");
    if let Some(notice) = notice {
        ctx.insert("notice", notice);
    }

    match (session.selected(), session.draft()) {
        (Some(letter), Some(draft)) => {
            let outcomes: Vec<OutcomeButton> = ReviewOutcome::ALL
                .into_iter()
                .map(|outcome| OutcomeButton {
                    slug: outcome.slug(),
                    label: outcome.label(),
                    class: outcome.status().css_class(),
                })
                .collect();
            ctx.insert("letter", letter);
            ctx.insert("status_class", letter.review.css_class());
            ctx.insert("reviewer_name", &draft.reviewer_name);
            ctx.insert("letter_content", &draft.letter_content);
            ctx.insert("notes", &draft.notes);
            ctx.insert("review_completed", &draft.review_completed);
            ctx.insert("actions_enabled", &draft.actions_enabled());
            ctx.insert("outcomes", &outcomes);
            render_template("review_letter.html", ctx)
        }
        _ => {
            let rows: Vec<StatusRow> = session
                .letters()
                .iter()
                .map(|letter| StatusRow {
                    letter,
                    status_class: letter.review.css_class(),
                })
                .collect();
            ctx.insert("rows", &rows);
            render_template("review_list.html", ctx)
        }
    }
}

pub async fn toggle_theme(headers: HeaderMap) -> Response {
    let next = Theme::from_headers(&headers).toggled();
    let back = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| "/".to_string());

    ([(header::SET_COOKIE, next.set_cookie())], Redirect::to(&back)).into_response()
}

/// A single leading slash; `//host` and `/\host` would leave the site.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

async fn load_submissions(state: &AppState) -> Vec<Submission> {
    let rows = state
        .sheets
        .read(&state.config.submissions_worksheet, None)
        .await;
    Submission::list_from_sheet(&rows)
}

fn page_context(headers: &HeaderMap, active: &str) -> Context {
    let theme = Theme::from_headers(headers);
    let mut ctx = Context::new();
    ctx.insert("theme", theme.as_str());
    ctx.insert("theme_icon", theme.toggle_icon());
    ctx.insert("active", active);
    ctx
}

fn render_template(name: &str, ctx: Context) -> Html<String> {
    let tera = crate::templates::get_tera();
    let rendered = tera.render(name, &ctx).unwrap_or_else(|e| {
        error!("Template error in {}: {}", name, e);
        format!("Template error: {}", name)
    });
    Html(rendered)
}
