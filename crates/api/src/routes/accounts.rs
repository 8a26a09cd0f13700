//! Account management routes.

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

use crate::{AppState, middleware::AuthUser};
use akiba_db::{
    entities::{accounts, sea_orm_active_enums::AccountType},
    repositories::account::{AccountError, AccountRepository, CreateAccountInput},
};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account name.
    pub name: String,
    /// Account type: bank, mobile_money, cash.
    pub account_type: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Converts account type string to enum value.
fn parse_account_type(s: &str) -> Option<AccountType> {
    match s.to_lowercase().as_str() {
        "bank" => Some(AccountType::Bank),
        "mobile_money" => Some(AccountType::MobileMoney),
        "cash" => Some(AccountType::Cash),
        _ => None,
    }
}

/// Converts account type enum to string.
const fn account_type_to_str(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Bank => "bank",
        AccountType::MobileMoney => "mobile_money",
        AccountType::Cash => "cash",
    }
}

fn account_json(account: &accounts::Model) -> Value {
    json!({
        "id": account.id,
        "name": account.name,
        "account_type": account_type_to_str(account.account_type),
        "description": account.description,
        "created_at": account.created_at.to_rfc3339(),
        "updated_at": account.updated_at.to_rfc3339()
    })
}

/// GET `/accounts` - List the caller's accounts.
async fn list_accounts(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.list_accounts(auth.user_id()).await {
        Ok(accounts) => {
            let response: Vec<Value> = accounts.iter().map(account_json).collect();
            (StatusCode::OK, Json(json!({ "accounts": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list accounts");
            map_account_error(&e)
        }
    }
}

/// POST `/accounts` - Create a new account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let Some(account_type) = parse_account_type(&payload.account_type) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_account_type",
                "message": "Invalid account type. Must be one of: bank, mobile_money, cash"
            })),
        )
            .into_response();
    };

    let repo = AccountRepository::new((*state.db).clone());

    let input = CreateAccountInput {
        user_id: auth.user_id(),
        name: payload.name,
        account_type,
        description: payload.description,
    };

    match repo.create_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, name = %account.name, "Account created");
            (StatusCode::CREATED, Json(account_json(&account))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create account");
            map_account_error(&e)
        }
    }
}

fn map_account_error(e: &AccountError) -> axum::response::Response {
    match e {
        AccountError::Database(_) => (
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
    #[case("bank", Some(AccountType::Bank))]
    #[case("Bank", Some(AccountType::Bank))]
    #[case("mobile_money", Some(AccountType::MobileMoney))]
    #[case("CASH", Some(AccountType::Cash))]
    #[case("crypto", None)]
    #[case("", None)]
    fn test_parse_account_type(#[case] input: &str, #[case] expected: Option<AccountType>) {
        assert_eq!(parse_account_type(input), expected);
    }

    #[test]
    fn test_account_type_round_trips_through_str() {
        for ty in [AccountType::Bank, AccountType::MobileMoney, AccountType::Cash] {
            assert_eq!(parse_account_type(account_type_to_str(ty)), Some(ty));
        }
    }
}
