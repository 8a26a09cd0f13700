//! Income routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use akiba_db::{
    entities::incomes,
    repositories::income::{CreateIncomeInput, IncomeError, IncomeRepository},
};

/// Creates the income routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/income", get(list_incomes))
        .route("/income", post(create_income))
}

/// Request body for recording income.
#[derive(Debug, Deserialize)]
pub struct CreateIncomeRequest {
    /// Where the money came from.
    pub description: String,
    /// Income amount.
    pub amount: Decimal,
    /// Day the income was received.
    pub date: NaiveDate,
    /// Income category.
    pub category_id: Uuid,
    /// Optional subcategory under the category.
    pub subcategory_id: Option<Uuid>,
    /// Account the money entered.
    pub account_id: Uuid,
}

fn income_json(income: &incomes::Model) -> Value {
    json!({
        "id": income.id,
        "description": income.description,
        "amount": income.amount.to_string(),
        "date": income.date,
        "category_id": income.category_id,
        "subcategory_id": income.subcategory_id,
        "account_id": income.account_id,
        "created_at": income.created_at.to_rfc3339(),
        "updated_at": income.updated_at.to_rfc3339()
    })
}

/// GET `/income` - List the caller's income records.
async fn list_incomes(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = IncomeRepository::new((*state.db).clone());

    match repo.list_incomes(auth.user_id()).await {
        Ok(incomes) => {
            let response: Vec<Value> = incomes.iter().map(income_json).collect();
            (StatusCode::OK, Json(json!({ "income": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list income");
            map_income_error(&e)
        }
    }
}

/// POST `/income` - Record income.
async fn create_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateIncomeRequest>,
) -> impl IntoResponse {
    let repo = IncomeRepository::new((*state.db).clone());

    let input = CreateIncomeInput {
        user_id: auth.user_id(),
        description: payload.description,
        amount: payload.amount,
        date: payload.date,
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        account_id: payload.account_id,
    };

    match repo.create_income(input).await {
        Ok(income) => {
            info!(income_id = %income.id, amount = %income.amount, "Income recorded");
            (StatusCode::CREATED, Json(income_json(&income))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to record income");
            map_income_error(&e)
        }
    }
}

fn map_income_error(e: &IncomeError) -> axum::response::Response {
    match e {
        IncomeError::AccountNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "account_not_found",
                "message": format!("Account not found: {id}")
            })),
        )
            .into_response(),
        IncomeError::CategoryNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "category_not_found",
                "message": format!("Income category not found: {id}")
            })),
        )
            .into_response(),
        IncomeError::SubcategoryNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "subcategory_not_found",
                "message": format!("Income subcategory not found under category: {id}")
            })),
        )
            .into_response(),
        IncomeError::NonPositiveAmount => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Income amount must be positive"
            })),
        )
            .into_response(),
        IncomeError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
