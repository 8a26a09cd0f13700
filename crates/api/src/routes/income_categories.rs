//! Income category routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use akiba_db::repositories::income_category::{
    IncomeCategoryError, IncomeCategoryRepository, IncomeCategoryWithSubcategories,
};

/// Creates the income category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/income-categories", get(list_categories))
        .route("/income-categories", post(create_category))
        .route("/income-categories/{category_id}", put(update_category))
}

/// Request body for creating or replacing an income category.
#[derive(Debug, Deserialize)]
pub struct IncomeCategoryRequest {
    /// Category name, unique per user.
    pub name: String,
    /// Subcategory names.
    #[serde(default)]
    pub subcategories: Vec<String>,
}

fn category_json(c: &IncomeCategoryWithSubcategories) -> Value {
    json!({
        "id": c.category.id,
        "name": c.category.name,
        "subcategories": c.subcategories.iter().map(|s| json!({
            "id": s.id,
            "name": s.name
        })).collect::<Vec<_>>(),
        "created_at": c.category.created_at.to_rfc3339(),
        "updated_at": c.category.updated_at.to_rfc3339()
    })
}

/// GET `/income-categories` - List the caller's income categories.
async fn list_categories(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = IncomeCategoryRepository::new((*state.db).clone());

    match repo.list_categories(auth.user_id()).await {
        Ok(categories) => {
            let response: Vec<Value> = categories.iter().map(category_json).collect();
            (
                StatusCode::OK,
                Json(json!({ "income_categories": response })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list income categories");
            map_income_category_error(&e)
        }
    }
}

/// POST `/income-categories` - Create an income category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<IncomeCategoryRequest>,
) -> impl IntoResponse {
    let repo = IncomeCategoryRepository::new((*state.db).clone());

    match repo
        .create_category(auth.user_id(), payload.name, payload.subcategories)
        .await
    {
        Ok(category) => {
            info!(
                category_id = %category.category.id,
                name = %category.category.name,
                "Income category created"
            );
            (StatusCode::CREATED, Json(category_json(&category))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create income category");
            map_income_category_error(&e)
        }
    }
}

/// PUT `/income-categories/{category_id}` - Rename a category and replace
/// its subcategory set.
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<IncomeCategoryRequest>,
) -> impl IntoResponse {
    let repo = IncomeCategoryRepository::new((*state.db).clone());

    match repo
        .update_category(auth.user_id(), category_id, payload.name, payload.subcategories)
        .await
    {
        Ok(category) => (StatusCode::OK, Json(category_json(&category))).into_response(),
        Err(e) => {
            error!(error = %e, category_id = %category_id, "Failed to update income category");
            map_income_category_error(&e)
        }
    }
}

fn map_income_category_error(e: &IncomeCategoryError) -> axum::response::Response {
    match e {
        IncomeCategoryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Income category not found: {id}")
            })),
        )
            .into_response(),
        IncomeCategoryError::DuplicateName(name) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": format!("Income category name already exists: {name}")
            })),
        )
            .into_response(),
        IncomeCategoryError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
