use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use sloleks_inflect::InflectionSection;
use thiserror::Error;

use crate::Catalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

#[derive(Serialize)]
pub struct EntriesResponse<'a> {
    lemma: &'a str,
    sections: Vec<&'a InflectionSection>,
    definitions: Vec<&'a str>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/entries/{lemma}", get(entry_page))
        .route("/v1/entries/{lemma}", get(entry_tables))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn entry_page(
    State(state): State<AppState>,
    Path(lemma): Path<String>,
) -> Result<Html<String>, ApiError> {
    let lemma = checked_lemma(&lemma)?;
    state
        .catalog
        .page(lemma)
        .map(Html)
        .ok_or_else(|| ApiError::not_found(lemma))
}

async fn entry_tables(
    State(state): State<AppState>,
    Path(lemma): Path<String>,
) -> Result<Response, ApiError> {
    let lemma = checked_lemma(&lemma)?;
    let record = state
        .catalog
        .record(lemma)
        .ok_or_else(|| ApiError::not_found(lemma))?;
    let response = EntriesResponse {
        lemma: record.lemma,
        sections: record.entries.iter().map(|r| &r.section).collect(),
        definitions: record
            .definitions
            .iter()
            .flat_map(|d| d.definitions.iter().map(String::as_str))
            .collect(),
    };
    Ok(Json(response).into_response())
}

fn checked_lemma(raw: &str) -> Result<&str, ApiError> {
    let lemma = raw.trim();
    if lemma.is_empty() {
        return Err(ApiError::bad_request("lemma is required"));
    }
    Ok(lemma)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("no entry for lemma {0:?}")]
    NotFound(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }

    fn not_found(lemma: &str) -> Self {
        ApiError::NotFound(lemma.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            err @ ApiError::NotFound(_) => {
                let body = Json(json!({ "error": err.to_string() }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
        }
    }
}
