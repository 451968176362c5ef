mod comments;
mod likes;
mod ratings;
mod recipes;
mod saved;

use std::sync::Arc;

use axum::Router;

use crate::service::RecipeService;

/// Shared application state.
pub type AppState = Arc<RecipeService>;

/// Build the recipe API router. Reads are public; writes need a caller.
pub fn build_router(svc: AppState) -> Router {
    Router::new()
        .merge(recipes::routes())
        .merge(comments::routes())
        .merge(likes::routes())
        .merge(ratings::routes())
        .merge(saved::routes())
        .with_state(svc)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use homecook_core::Claims;
    use tower::ServiceExt;

    use crate::service::testing::Harness;

    /// Recipe and account routes behind the auth middleware.
    pub fn app(h: &Harness) -> Router {
        let routes = super::build_router(h.svc.clone())
            .merge(account::api::build_router(h.accounts.clone()));
        account::api::authenticate(routes, h.accounts.clone())
    }

    /// Test user with a real session token.
    pub fn login(h: &Harness, email: &str, roles: &[&str]) -> (Claims, String) {
        let claims = h.user(email, roles);
        let user = h.accounts.find_user(&claims.sub).unwrap();
        let token = h.accounts.issue_token(&user).unwrap().access_token;
        (claims, token)
    }

    pub async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {}", t));
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&b).unwrap()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }
}
