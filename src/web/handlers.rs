//! HTTP request handlers

use super::state::AppState;
use crate::error::{Error, Result};
use crate::field::HasOneField;
use crate::search::{Candidate, SearchParams};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;
use tera::Context;
use tracing::debug;

/// Header the widget sends to ask for a partial response
pub const PJAX_HEADER: &str = "X-Pjax";

fn lookup_field(state: &AppState, name: &str) -> Result<Arc<HasOneField>> {
    state
        .fields
        .get(name)
        .cloned()
        .ok_or_else(|| Error::UnknownField(name.to_string()))
}

/// Demo edit form with every configured field
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let mut rendered = Vec::with_capacity(state.fields.len());
    for field in state.fields.iter() {
        rendered.push(field.render(&state.templates).await?);
    }

    let mut ctx = Context::new();
    ctx.insert("form_title", state.form_title());
    ctx.insert("fields", &rendered);

    Ok(Html(state.templates.render_with_context("index.html", &ctx)?))
}

/// Markup of a single field
pub async fn field(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>> {
    let field = lookup_field(&state, &name)?;
    Ok(Html(field.render(&state.templates).await?))
}

/// Search action of a field: `?query=TEXT` -> `[{id, name, currentString?}]`
pub async fn search(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<Candidate>>> {
    let field = lookup_field(&state, &name)?;
    debug!(
        "Search on {} for '{}' (partial: {})",
        name,
        params.query,
        headers.contains_key(PJAX_HEADER)
    );

    Ok(Json(field.search(&params.query).await?))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
