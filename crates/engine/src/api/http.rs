//! HTTP routes.
//!
//! Thin handlers: parse the request, run validation, call the storage
//! contract, translate the error taxonomy into status codes. No business
//! logic lives here.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use charvault_domain::{
    validate, Character, CharacterId, CharacterPage, ListQuery, SortKey, SortOrder,
    ValidationError,
};

use crate::app::App;
use crate::infrastructure::ports::StoreError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/characters",
            get(list_characters).post(create_character),
        )
        .route(
            "/api/characters/{id}",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_character(
    State(app): State<Arc<App>>,
    Json(mut character): Json<Character>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    let errors = validate(&character);
    if !errors.is_empty() {
        tracing::warn!(
            name = %character.character_name,
            count = errors.len(),
            "character validation failed"
        );
        return Err(ApiError::Validation(errors));
    }

    app.store.create(&mut character).await?;

    tracing::info!(
        id = ?character.id,
        name = %character.character_name,
        class = %character.class,
        "character created"
    );
    Ok((StatusCode::CREATED, Json(character)))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<Character>, ApiError> {
    let character = app.store.get(&CharacterId::new(id)).await?;
    Ok(Json(character))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    search: Option<String>,
}

async fn list_characters(
    State(app): State<Arc<App>>,
    Query(params): Query<ListParams>,
) -> Result<Json<CharacterPage>, ApiError> {
    let page = params.page.unwrap_or(1);
    if page < 1 {
        return Err(ApiError::BadRequest("Invalid page parameter".to_string()));
    }

    let limit = params.limit.unwrap_or(20);
    if !(1..=100).contains(&limit) {
        return Err(ApiError::BadRequest(
            "Invalid limit parameter (1-100)".to_string(),
        ));
    }

    let query = ListQuery {
        page,
        limit,
        sort_by: params
            .sort_by
            .as_deref()
            .map(SortKey::parse_or_default)
            .unwrap_or_default(),
        sort_order: params
            .sort_order
            .as_deref()
            .map(SortOrder::parse_or_default)
            .unwrap_or_default(),
        search: params.search,
    };

    let result = app.store.list(&query).await?;
    Ok(Json(result))
}

async fn update_character(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(mut character): Json<Character>,
) -> Result<Json<Character>, ApiError> {
    let errors = validate(&character);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    app.store
        .update(&CharacterId::new(id), &mut character)
        .await?;
    Ok(Json(character))
}

async fn delete_character(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    app.store.delete(&CharacterId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Error mapping
// =============================================================================

/// API-level errors mapped onto HTTP status codes.
#[derive(Debug)]
pub enum ApiError {
    /// Full list of field errors; never partial.
    Validation(Vec<ValidationError>),
    NotFound,
    Duplicate(String),
    BadRequest(String),
    Unavailable,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Character not found" })),
            )
                .into_response(),
            ApiError::Duplicate(id) => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "error": format!("Character with id '{id}' already exists")
                })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": "Storage backend unavailable" })),
            )
                .into_response(),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Internal error" })),
            )
                .into_response(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ApiError::NotFound,
            StoreError::Duplicate { id } => ApiError::Duplicate(id),
            StoreError::Unavailable { operation, message } => {
                tracing::error!(operation, %message, "storage backend unavailable");
                ApiError::Unavailable
            }
            StoreError::Serialization(message) => {
                tracing::error!(%message, "stored record could not be decoded");
                ApiError::Internal(message)
            }
        }
    }
}
