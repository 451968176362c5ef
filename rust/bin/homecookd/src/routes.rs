//! Route registration: module routes plus system endpoints.

use std::sync::Arc;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use account::service::AccountService;

/// Build the complete router.
///
/// Module routers already carry their state and absolute `/api/...`
/// paths, so they are merged rather than nested. Authentication wraps the
/// whole tree once; unauthenticated requests still reach public routes.
pub fn build_router(accounts: Arc<AccountService>, module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        tracing::debug!(module = name, "mounting module routes");
        app = app.merge(router);
    }

    account::api::authenticate(app, accounts).layer(TraceLayer::new_for_http())
}

async fn index() -> &'static str {
    "HomeCook API is running."
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "homecookd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use account::AccountModule;
    use account::mailer::MemoryMailer;
    use account::service::{AccountConfig, AccountService};
    use homecook_core::Module;
    use homecook_kv::RedbStore;
    use homecook_sql::SqliteStore;
    use recipe::RecipeModule;
    use recipe::service::RecipeService;

    use super::build_router;

    struct App {
        router: axum::Router,
        mailer: Arc<MemoryMailer>,
        _dir: tempfile::TempDir,
    }

    fn app() -> App {
        let dir = tempfile::tempdir().unwrap();
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(RedbStore::open(&dir.path().join("kv.redb")).unwrap());
        let mailer = Arc::new(MemoryMailer::default());
        let accounts =
            AccountService::new(sql.clone(), kv, mailer.clone(), AccountConfig::default()).unwrap();
        let recipes = RecipeService::new(sql, accounts.clone()).unwrap();

        let account_module = AccountModule::new(accounts.clone());
        let recipe_module = RecipeModule::new(recipes);
        let router = build_router(
            accounts,
            vec![
                (account_module.name(), account_module.routes()),
                (recipe_module.name(), recipe_module.routes()),
            ],
        );
        App {
            router,
            mailer,
            _dir: dir,
        }
    }

    async fn send(
        app: &axum::Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value, String) {
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
        let text = String::from_utf8_lossy(&bytes).to_string();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json, text)
    }

    #[tokio::test]
    async fn system_endpoints() {
        let app = app();
        let (status, _, text) = send(&app.router, "GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "HomeCook API is running.");

        let (status, body, _) = send(&app.router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (_, body, _) = send(&app.router, "GET", "/version", None, None).await;
        assert_eq!(body["name"], "homecookd");
    }

    #[tokio::test]
    async fn register_verify_login_and_post_a_recipe() {
        let app = app();
        let (status, _, _) = send(
            &app.router,
            "POST",
            "/api/account/register",
            None,
            Some(serde_json::json!({
                "email": "cook@example.com",
                "full_name": "Home Cook",
                "password": "secret1",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let login = serde_json::json!({"email": "cook@example.com", "password": "secret1"});
        let (status, _, _) =
            send(&app.router, "POST", "/api/account/login", None, Some(login.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let mail = app.mailer.last_to("cook@example.com").unwrap();
        let link = mail
            .body
            .split_whitespace()
            .find(|w| w.contains("/api/account/verify-email"))
            .unwrap();
        let path = &link[link.find("/api/").unwrap()..];
        let (status, _, _) = send(&app.router, "GET", path, None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body, _) =
            send(&app.router, "POST", "/api/account/login", None, Some(login)).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, created, _) = send(
            &app.router,
            "POST",
            "/api/recipes",
            Some(&token),
            Some(serde_json::json!({
                "name": "Lentil Soup",
                "category": "Soup",
                "intro": "Warming.",
                "ingredients": "Lentils, onion, stock",
                "how_to": "Simmer for 30 minutes.",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["user_name"], "Home Cook");

        let (status, me, _) = send(&app.router, "GET", "/api/account/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["total_recipes"], 1);

        let (status, _, _) = send(&app.router, "POST", "/api/account/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _, _) = send(&app.router, "GET", "/api/account/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
