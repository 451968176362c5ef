mod account;
pub mod middleware;
mod roles;

use std::sync::Arc;

use axum::Router;

use crate::service::AccountService;

pub use middleware::{auth_middleware, authenticate};

/// Shared application state.
pub type AppState = Arc<AccountService>;

/// Build the account and role routers (`/api/account/*`, `/api/roles/*`).
///
/// The auth middleware is applied by the caller over the merged router of
/// all modules, see [`authenticate`].
pub fn build_router(svc: AppState) -> Router {
    Router::new()
        .merge(account::routes())
        .merge(roles::routes())
        .with_state(svc)
}
