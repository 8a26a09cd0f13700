//! Expense routes.
//!
//! Creating or editing an expense also drives budget tracking. The
//! expense write is the primary operation: if budget evaluation fails
//! afterwards, the failure is logged and the response simply carries no
//! notification. The response shape is fixed, `budgetNotification` is
//! always present and is `null` when nothing fired.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use akiba_core::budget::BudgetNotification;
use akiba_db::{
    entities::expenses,
    repositories::budget::{BudgetRepository, ExpenseDelta},
    repositories::expense::{
        CreateExpenseInput, ExpenseError, ExpenseRepository, UpdateExpenseInput,
    },
};

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses))
        .route("/expenses", post(create_expense))
        .route("/expenses/{expense_id}", put(update_expense))
}

/// Request body for creating or replacing an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    /// What the money was spent on.
    pub description: String,
    /// Expense amount.
    pub amount: Decimal,
    /// Day the expense occurred.
    pub date: NaiveDate,
    /// Expense category.
    pub category_id: Uuid,
    /// Subcategory under the category.
    pub subcategory_id: Uuid,
    /// Account the money left.
    pub account_id: Uuid,
}

fn expense_json(expense: &expenses::Model) -> Value {
    json!({
        "id": expense.id,
        "description": expense.description,
        "amount": expense.amount.to_string(),
        "date": expense.date,
        "category_id": expense.category_id,
        "subcategory_id": expense.subcategory_id,
        "account_id": expense.account_id,
        "created_at": expense.created_at.to_rfc3339(),
        "updated_at": expense.updated_at.to_rfc3339()
    })
}

const fn delta(expense: &expenses::Model) -> ExpenseDelta {
    ExpenseDelta {
        account_id: expense.account_id,
        date: expense.date,
        amount: expense.amount,
    }
}

/// GET `/expenses` - List the caller's expenses.
async fn list_expenses(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.list_expenses(auth.user_id()).await {
        Ok(expenses) => {
            let response: Vec<Value> = expenses.iter().map(expense_json).collect();
            (StatusCode::OK, Json(json!({ "expenses": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list expenses");
            map_expense_error(&e)
        }
    }
}

/// POST `/expenses` - Record an expense and charge the covering budget.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ExpenseRequest>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    let user_id = auth.user_id();

    let input = CreateExpenseInput {
        user_id,
        description: payload.description,
        amount: payload.amount,
        date: payload.date,
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        account_id: payload.account_id,
    };

    let expense = match repo.create_expense(input).await {
        Ok(expense) => expense,
        Err(e) => {
            error!(error = %e, "Failed to create expense");
            return map_expense_error(&e);
        }
    };

    info!(expense_id = %expense.id, amount = %expense.amount, "Expense created");

    let budget_repo = BudgetRepository::new((*state.db).clone());
    let notification = match budget_repo.record_spend(user_id, delta(&expense)).await {
        Ok(notification) => notification,
        Err(e) => {
            // The expense is already committed; tracking catches up on the
            // next status check.
            error!(error = %e, expense_id = %expense.id, "Budget tracking failed for new expense");
            None
        }
    };

    (
        StatusCode::CREATED,
        Json(response_body(&expense, notification)),
    )
        .into_response()
}

/// PUT `/expenses/{expense_id}` - Replace an expense and re-apply budget
/// tracking.
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseRequest>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    let user_id = auth.user_id();

    let input = UpdateExpenseInput {
        description: payload.description,
        amount: payload.amount,
        date: payload.date,
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        account_id: payload.account_id,
    };

    let (old, new) = match repo.update_expense(user_id, expense_id, input).await {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, expense_id = %expense_id, "Failed to update expense");
            return map_expense_error(&e);
        }
    };

    let budget_repo = BudgetRepository::new((*state.db).clone());
    let notification = match budget_repo
        .apply_spend_update(user_id, delta(&old), delta(&new))
        .await
    {
        Ok(notification) => notification,
        Err(e) => {
            error!(error = %e, expense_id = %expense_id, "Budget tracking failed for edited expense");
            None
        }
    };

    (StatusCode::OK, Json(response_body(&new, notification))).into_response()
}

fn response_body(expense: &expenses::Model, notification: Option<BudgetNotification>) -> Value {
    json!({
        "expense": expense_json(expense),
        "budgetNotification": notification
    })
}

fn map_expense_error(e: &ExpenseError) -> axum::response::Response {
    match e {
        ExpenseError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Expense not found: {id}")
            })),
        )
            .into_response(),
        ExpenseError::AccountNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "account_not_found",
                "message": format!("Account not found: {id}")
            })),
        )
            .into_response(),
        ExpenseError::CategoryNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "category_not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        ExpenseError::SubcategoryNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "subcategory_not_found",
                "message": format!("Subcategory not found under category: {id}")
            })),
        )
            .into_response(),
        ExpenseError::NonPositiveAmount => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Expense amount must be positive"
            })),
        )
            .into_response(),
        ExpenseError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
