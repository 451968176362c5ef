use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use homecook_core::{CurrentUser, ServiceError};

use crate::api::AppState;
use crate::model::{LoginRequest, RegisterUser, ReportUser, TokenResponse, UpdateProfile, UserView};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/account/register", post(register))
        .route("/api/account/verify-email", get(verify_email))
        .route("/api/account/login", post(login))
        .route("/api/account/logout", post(logout))
        .route("/api/account/me", get(me))
        .route("/api/account/report", post(report))
        .route("/api/account/users", get(list_users))
        .route(
            "/api/account/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[derive(Debug, Deserialize)]
struct VerifyEmailParams {
    #[serde(rename = "userId")]
    user_id: String,
    token: String,
}

async fn register(
    State(svc): State<AppState>,
    Json(input): Json<RegisterUser>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let user = svc.register(input).map_err(ServiceError::from)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully! Check your email to verify your account.",
            "user": user,
        })),
    ))
}

async fn verify_email(
    State(svc): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.verify_email(&params.user_id, &params.token)
        .map_err(ServiceError::from)?;
    Ok(Json(json!({"message": "Email verified successfully."})))
}

async fn login(
    State(svc): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let tokens = svc.login(input).map_err(ServiceError::from)?;
    Ok(Json(tokens))
}

async fn logout(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.logout(&claims).map_err(ServiceError::from)?;
    Ok(Json(json!({"message": "Logged out."})))
}

async fn me(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserView>, ServiceError> {
    let user = svc.get_user(&claims.sub).map_err(ServiceError::from)?;
    Ok(Json(user))
}

async fn report(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<ReportUser>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let message = svc
        .report_user(&claims, &input.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(json!({"message": message})))
}

async fn list_users(
    State(svc): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<UserView>>, ServiceError> {
    let users = svc.list_users().map_err(ServiceError::from)?;
    Ok(Json(users))
}

async fn get_user(
    State(svc): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ServiceError> {
    let user = svc.get_user(&id).map_err(ServiceError::from)?;
    Ok(Json(user))
}

async fn update_user(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<UpdateProfile>,
) -> Result<Json<UserView>, ServiceError> {
    let user = svc
        .update_profile(&id, patch, &claims)
        .map_err(ServiceError::from)?;
    Ok(Json(user))
}

async fn delete_user(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_user(&id, &claims).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::test_support::{app, call};
    use crate::service::testing::harness;
    use crate::service::verification::token_from_link;

    async fn register_and_verify(
        app: &axum::Router,
        h: &crate::service::testing::Harness,
        email: &str,
    ) -> (String, String) {
        let (status, body) = call(
            app,
            "POST",
            "/api/account/register",
            None,
            Some(json!({"email": email, "password": "secret1", "full_name": "Test Cook"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let id = body["user"]["id"].as_str().unwrap().to_string();

        let token = token_from_link(&h.mailer.last_to(email).unwrap().body).unwrap();
        let (status, _) = call(
            app,
            "GET",
            &format!("/api/account/verify-email?userId={}&token={}", id, token),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            app,
            "POST",
            "/api/account/login",
            None,
            Some(json!({"email": email, "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        (id, body["access_token"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn register_twice_is_bad_request() {
        let h = harness();
        let app = app(&h);
        let payload = json!({"email": "a@example.com", "password": "secret1", "full_name": "Test Cook"});

        let (status, _) = call(&app, "POST", "/api/account/register", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "POST", "/api/account/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn login_requires_verified_email() {
        let h = harness();
        let app = app(&h);
        call(
            &app,
            "POST",
            "/api/account/register",
            None,
            Some(json!({"email": "a@example.com", "password": "secret1", "full_name": "Test Cook"})),
        )
        .await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/account/login",
            None,
            Some(json!({"email": "a@example.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        register_and_verify(&app, &h, "b@example.com").await;
    }

    #[tokio::test]
    async fn verify_email_bad_token() {
        let h = harness();
        let app = app(&h);
        let (_, body) = call(
            &app,
            "POST",
            "/api/account/register",
            None,
            Some(json!({"email": "a@example.com", "password": "secret1", "full_name": "Test Cook"})),
        )
        .await;
        let id = body["user"]["id"].as_str().unwrap();

        let (status, _) = call(
            &app,
            "GET",
            &format!("/api/account/verify-email?userId={}&token=nope", id),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, "GET", "/api/account/verify-email?userId=ghost&token=x", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn me_and_logout() {
        let h = harness();
        let app = app(&h);
        let (id, token) = register_and_verify(&app, &h, "a@example.com").await;

        let (status, body) = call(&app, "GET", "/api/account/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["roles"], json!(["User"]));
        assert_eq!(body["total_recipes"], 0);

        let (status, _) = call(&app, "POST", "/api/account/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, "GET", "/api/account/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "session has been revoked");
    }

    #[tokio::test]
    async fn protected_routes_need_token() {
        let h = harness();
        let app = app(&h);
        for (method, uri) in [
            ("GET", "/api/account/users"),
            ("GET", "/api/account/me"),
            ("POST", "/api/account/logout"),
            ("DELETE", "/api/account/users/abc"),
        ] {
            let (status, _) = call(&app, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        }

        let (status, _) = call(&app, "GET", "/api/account/users", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn users_crud_over_http() {
        let h = harness();
        let app = app(&h);
        let (a, token_a) = register_and_verify(&app, &h, "a@example.com").await;
        let (b, token_b) = register_and_verify(&app, &h, "b@example.com").await;

        let (status, body) = call(&app, "GET", "/api/account/users", Some(&token_a), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = call(
            &app,
            "PUT",
            &format!("/api/account/users/{}", a),
            Some(&token_b),
            Some(json!({"full_name": "Hijacked"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");

        let (status, body) = call(
            &app,
            "PUT",
            &format!("/api/account/users/{}", a),
            Some(&token_a),
            Some(json!({"full_name": "Alice Baker"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_name"], "Alice Baker");

        let (status, body) = call(
            &app,
            "POST",
            "/api/account/report",
            Some(&token_a),
            Some(json!({"user_id": b})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            format!("User {} has been reported to the Super Admin.", b)
        );

        let (status, _) = call(&app, "DELETE", &format!("/api/account/users/{}", b), Some(&token_b), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, "GET", &format!("/api/account/users/{}", b), Some(&token_a), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Sessions cascade with the user.
        let (status, _) = call(&app, "GET", "/api/account/me", Some(&token_b), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
