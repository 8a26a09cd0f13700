//! Budget management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
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
    entities::sea_orm_active_enums::BudgetPeriod,
    repositories::budget::{
        BudgetError, BudgetRepository, BudgetWithAccount, CreateBudgetInput,
    },
};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets))
        .route("/budgets", post(create_budget))
        .route("/budgets/check-status/{budget_id}", get(check_status))
}

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Account the budget covers.
    pub account_id: Uuid,
    /// Spending cap.
    pub amount: Decimal,
    /// First day of the window, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the window, inclusive.
    pub end_date: NaiveDate,
    /// Percentage at which a warning fires, 1 to 100.
    pub alert_threshold: i16,
    /// Recurrence: weekly, monthly, yearly.
    pub period: String,
}

/// Converts period string to enum value.
fn parse_period(s: &str) -> Option<BudgetPeriod> {
    match s.to_lowercase().as_str() {
        "weekly" => Some(BudgetPeriod::Weekly),
        "monthly" => Some(BudgetPeriod::Monthly),
        "yearly" => Some(BudgetPeriod::Yearly),
        _ => None,
    }
}

fn budget_json(b: &BudgetWithAccount) -> Value {
    json!({
        "id": b.budget.id,
        "account_id": b.budget.account_id,
        "account_name": b.account_name,
        "amount": b.budget.amount.to_string(),
        "spent": b.budget.spent.to_string(),
        "start_date": b.budget.start_date,
        "end_date": b.budget.end_date,
        "alert_threshold": b.budget.alert_threshold,
        "period": b.budget.period,
        "status": b.budget.status,
        "created_at": b.budget.created_at.to_rfc3339(),
        "updated_at": b.budget.updated_at.to_rfc3339()
    })
}

/// GET `/budgets` - List the caller's budgets with account names.
async fn list_budgets(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.list_budgets(auth.user_id()).await {
        Ok(budgets) => {
            let response: Vec<Value> = budgets.iter().map(budget_json).collect();
            (StatusCode::OK, Json(json!({ "budgets": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list budgets");
            map_budget_error(&e)
        }
    }
}

/// POST `/budgets` - Create a new budget, superseding any live budget on
/// the same account.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&payload.period) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_period",
                "message": "Invalid period. Must be one of: weekly, monthly, yearly"
            })),
        )
            .into_response();
    };

    let repo = BudgetRepository::new((*state.db).clone());

    let input = CreateBudgetInput {
        user_id: auth.user_id(),
        account_id: payload.account_id,
        amount: payload.amount,
        start_date: payload.start_date,
        end_date: payload.end_date,
        alert_threshold: payload.alert_threshold,
        period,
    };

    match repo.create_budget(input).await {
        Ok(budget) => {
            info!(
                budget_id = %budget.budget.id,
                account_id = %budget.budget.account_id,
                "Budget created"
            );
            (StatusCode::CREATED, Json(budget_json(&budget))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create budget");
            map_budget_error(&e)
        }
    }
}

/// GET `/budgets/check-status/{budget_id}` - Recompute a budget's spend
/// from its expenses and reconcile the stored status.
async fn check_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.check_status(auth.user_id(), budget_id).await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "exceeded": report.exceeded,
                "percentage_used": report.percentage_used.to_string(),
                "spent": report.spent.to_string(),
                "amount": report.amount.to_string(),
                "remaining": report.remaining.to_string(),
                "status": report.status
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, budget_id = %budget_id, "Failed to check budget status");
            map_budget_error(&e)
        }
    }
}

fn map_budget_error(e: &BudgetError) -> axum::response::Response {
    match e {
        BudgetError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Budget not found: {id}")
            })),
        )
            .into_response(),
        BudgetError::AccountNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "account_not_found",
                "message": format!("Account not found: {id}")
            })),
        )
            .into_response(),
        BudgetError::InvalidDefinition(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_budget",
                "message": e.to_string()
            })),
        )
            .into_response(),
        BudgetError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("weekly", Some(BudgetPeriod::Weekly))]
    #[case("Monthly", Some(BudgetPeriod::Monthly))]
    #[case("YEARLY", Some(BudgetPeriod::Yearly))]
    #[case("daily", None)]
    #[case("", None)]
    fn test_parse_period(#[case] input: &str, #[case] expected: Option<BudgetPeriod>) {
        assert_eq!(parse_period(input), expected);
    }
}
