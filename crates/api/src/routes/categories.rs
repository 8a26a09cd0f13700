//! Expense category routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use akiba_db::repositories::category::{
    CategoryError, CategoryRepository, CategoryWithSubcategories,
};

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/subcategory", post(add_subcategory))
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name, unique per user.
    pub name: String,
    /// Initial subcategory names.
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Request body for adding a subcategory to an existing category.
#[derive(Debug, Deserialize)]
pub struct AddSubcategoryRequest {
    /// Parent category.
    pub category_id: Uuid,
    /// Subcategory name.
    pub name: String,
}

fn category_json(c: &CategoryWithSubcategories) -> Value {
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

/// GET `/categories` - List the caller's categories with subcategories.
async fn list_categories(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list_categories(auth.user_id()).await {
        Ok(categories) => {
            let response: Vec<Value> = categories.iter().map(category_json).collect();
            (StatusCode::OK, Json(json!({ "categories": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list categories");
            map_category_error(&e)
        }
    }
}

/// POST `/categories` - Create a category with optional subcategories.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo
        .create_category(auth.user_id(), payload.name, payload.subcategories)
        .await
    {
        Ok(category) => {
            info!(category_id = %category.category.id, name = %category.category.name, "Category created");
            (StatusCode::CREATED, Json(category_json(&category))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create category");
            map_category_error(&e)
        }
    }
}

/// POST `/categories/subcategory` - Add a subcategory to a category.
async fn add_subcategory(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AddSubcategoryRequest>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo
        .add_subcategory(auth.user_id(), payload.category_id, payload.name)
        .await
    {
        Ok(sub) => (
            StatusCode::CREATED,
            Json(json!({
                "id": sub.id,
                "category_id": sub.category_id,
                "name": sub.name
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to add subcategory");
            map_category_error(&e)
        }
    }
}

fn map_category_error(e: &CategoryError) -> axum::response::Response {
    match e {
        CategoryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        CategoryError::DuplicateName(name) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": format!("Category name already exists: {name}")
            })),
        )
            .into_response(),
        CategoryError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
