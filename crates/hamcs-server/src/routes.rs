//! HTTP handlers
//!
//! Handlers only parse, validate and format. Matching and diffing live in
//! `hamcs-core`.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use hamcs_core::{
    AbsentKeyPolicy, ContextMapping, DecisionRecord, DecisionStore, StoreError, context_change,
    describe_change,
};

use crate::AppState;
use crate::error::ApiError;

/// Reply for a chat request without decision text.
pub const EMPTY_DECISION_REPLY: &str = "Please enter a decision.";

const CATEGORY_FIELD: &str = "category";
const PINNED_FIELD: &str = "pinned";
const DEFAULT_CATEGORY: &str = "general";
const CREATED_AT_FIELD: &str = "createdAt";
const UPDATED_AT_FIELD: &str = "updatedAt";

/// Health check (plain text)
pub async fn home() -> &'static str {
    "Backend OK"
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "HAMCS Backend is running",
    })
}

// === Chat ===

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// Usually a string; other JSON values are rendered as text.
    #[serde(default)]
    pub decision: Value,

    /// Free text or a key-value snapshot of the present situation.
    #[serde(default)]
    pub context: Value,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /chat
///
/// When a stored decision is similar and both sides carry a context object,
/// the reply describes what changed. Otherwise it is the plain template.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let decision_text = match &request.decision {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    let decision = decision_text.as_str();
    if decision.is_empty() {
        return Json(ChatResponse {
            reply: EMPTY_DECISION_REPLY.to_string(),
        });
    }

    if let Some(present) = request.context.as_object() {
        match state.store.find_similar(decision).await {
            Ok(past) => {
                if let (Some(past_decision), Some(past_context)) = (past.decision(), past.context())
                {
                    info!(past_decision, "chat matched a stored decision");
                    return Json(ChatResponse {
                        reply: describe_change(past_decision, past_context, present),
                    });
                }
            }
            Err(StoreError::NotFound) => {}
            Err(e) => warn!(error = %e, "similar decision lookup failed; using template reply"),
        }
    }

    Json(ChatResponse {
        reply: template_reply(decision, &request.context),
    })
}

fn template_reply(decision: &str, context: &Value) -> String {
    let context = match context {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!(
        "Earlier you asked about: \"{decision}\"\n\n\
         Considering your present situation:\n{context}\n\n\
         Suggestion:\n\
         Think again based on your current priorities, time, and constraints.\n"
    )
}

// === Decisions ===

#[derive(Debug, Serialize)]
pub struct SavedDecision {
    pub position: usize,
    pub record: DecisionRecord,
}

fn validate(record: &DecisionRecord) -> Result<(), ApiError> {
    match record.decision() {
        Some(d) if !d.trim().is_empty() => Ok(()),
        _ => Err(ApiError::BadRequest("Decision cannot be empty".to_string())),
    }
}

/// GET /api/decisions
pub async fn list_decisions(State(state): State<AppState>) -> Json<Vec<DecisionRecord>> {
    Json(state.store.list().await)
}

/// POST /api/decisions
pub async fn create_decision(
    State(state): State<AppState>,
    Json(mut record): Json<DecisionRecord>,
) -> Result<(StatusCode, Json<SavedDecision>), ApiError> {
    validate(&record)?;

    let now = Value::String(state.clock.now().to_rfc3339());
    record.insert_default(CATEGORY_FIELD, Value::String(DEFAULT_CATEGORY.to_string()));
    record.insert_default(PINNED_FIELD, Value::Bool(false));
    record.insert(CREATED_AT_FIELD, now.clone());
    record.insert(UPDATED_AT_FIELD, now);

    let position = state.store.save(record.clone()).await?;
    info!(position, "decision created");
    Ok((StatusCode::CREATED, Json(SavedDecision { position, record })))
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub q: String,
}

/// GET /api/decisions/similar?q=...
pub async fn find_similar(
    State(state): State<AppState>,
    Query(query): Query<SimilarQuery>,
) -> Result<Json<DecisionRecord>, ApiError> {
    Ok(Json(state.store.find_similar(&query.q).await?))
}

/// GET /api/decisions/{position}
pub async fn get_decision(
    State(state): State<AppState>,
    Path(position): Path<i64>,
) -> Result<Json<DecisionRecord>, ApiError> {
    Ok(Json(state.store.get(position).await?))
}

/// PUT /api/decisions/{position}
///
/// Replaces the whole record. `createdAt` and `pinned` carry over from the
/// old record unless the body sets them.
pub async fn update_decision(
    State(state): State<AppState>,
    Path(position): Path<i64>,
    Json(mut record): Json<DecisionRecord>,
) -> Result<Json<DecisionRecord>, ApiError> {
    validate(&record)?;

    let now = Value::String(state.clock.now().to_rfc3339());
    let updated = state
        .store
        .update_with(
            position,
            Box::new(move |existing: &DecisionRecord| {
                let created_at = existing
                    .get(CREATED_AT_FIELD)
                    .cloned()
                    .unwrap_or_else(|| now.clone());
                let pinned = existing
                    .get(PINNED_FIELD)
                    .cloned()
                    .unwrap_or(Value::Bool(false));
                record.insert_default(CATEGORY_FIELD, Value::String(DEFAULT_CATEGORY.to_string()));
                record.insert_default(PINNED_FIELD, pinned);
                record.insert_default(CREATED_AT_FIELD, created_at);
                record.insert(UPDATED_AT_FIELD, now);
                record
            }),
        )
        .await?;
    info!(position, "decision updated");
    Ok(Json(updated))
}

/// PATCH /api/decisions/{position}/pin
///
/// Flips `pinned`. Listing order is not affected.
pub async fn toggle_pin(
    State(state): State<AppState>,
    Path(position): Path<i64>,
) -> Result<Json<DecisionRecord>, ApiError> {
    let now = Value::String(state.clock.now().to_rfc3339());
    let updated = state
        .store
        .update_with(
            position,
            Box::new(move |existing: &DecisionRecord| {
                let pinned = existing
                    .get(PINNED_FIELD)
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let mut record = existing.clone();
                record.insert(PINNED_FIELD, Value::Bool(!pinned));
                record.insert(UPDATED_AT_FIELD, now);
                record
            }),
        )
        .await?;
    info!(position, pinned = ?updated.get(PINNED_FIELD), "decision pin toggled");
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: String,
}

/// PATCH /api/decisions/{position}/category
pub async fn update_category(
    State(state): State<AppState>,
    Path(position): Path<i64>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<DecisionRecord>, ApiError> {
    let category = request.category.trim().to_string();
    if category.is_empty() {
        return Err(ApiError::BadRequest("Category cannot be empty".to_string()));
    }

    let now = Value::String(state.clock.now().to_rfc3339());
    let updated = state
        .store
        .update_with(
            position,
            Box::new(move |existing: &DecisionRecord| {
                let mut record = existing.clone();
                record.insert(CATEGORY_FIELD, Value::String(category));
                record.insert(UPDATED_AT_FIELD, now);
                record
            }),
        )
        .await?;
    info!(position, "decision category updated");
    Ok(Json(updated))
}

// === Context ===

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub decision: String,
    pub past: ContextMapping,
    pub present: ContextMapping,

    /// Fail when `present` lacks a key of `past` instead of reporting it as
    /// changed.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub suggestion: String,
    pub changed_keys: Vec<String>,
}

/// POST /api/context/compare
pub async fn compare_context(
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    let policy = if request.strict {
        AbsentKeyPolicy::Strict
    } else {
        AbsentKeyPolicy::Changed
    };
    let change = context_change(&request.decision, &request.past, &request.present, policy)?;
    Ok(Json(CompareResponse {
        suggestion: change.to_string(),
        changed_keys: change.changed_keys,
    }))
}
