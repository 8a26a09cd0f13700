//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod health;
pub mod income_categories;
pub mod incomes;

/// Creates the protected API router, with auth middleware applied.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(accounts::routes())
        .merge(budgets::routes())
        .merge(categories::routes())
        .merge(expenses::routes())
        .merge(income_categories::routes())
        .merge(incomes::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}
