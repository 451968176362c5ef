use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use homecook_core::{AuthFailure, ServiceError};

use crate::api::AppState;
use crate::service::AccountError;

/// JWT authentication middleware.
///
/// Runs on every route. A valid Bearer token stores its Claims as a request
/// extension; a rejected token stores the reason as [`AuthFailure`]. Either
/// way the request continues, and handlers that need a caller extract
/// `CurrentUser`, which answers 401 when no claims are present. A storage
/// failure while checking the session ends the request with a 500.
pub async fn auth_middleware(State(svc): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = extract_bearer(req.headers()).map(str::to_string);

    if let Some(token) = token {
        match svc.verify_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(AccountError::Unauthorized(reason)) => {
                tracing::debug!(%reason, "rejected bearer token");
                req.extensions_mut().insert(AuthFailure(reason));
            }
            // The token could not be checked at all; that is a server fault.
            Err(e) => return ServiceError::from(e).into_response(),
        }
    }

    next.run(req).await
}

/// Wrap a router so every route sees the caller's claims.
pub fn authenticate(router: Router, svc: AppState) -> Router {
    router.layer(axum::middleware::from_fn_with_state(svc, auth_middleware))
}

/// Extract the Bearer token from the Authorization header.
fn extract_bearer(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
