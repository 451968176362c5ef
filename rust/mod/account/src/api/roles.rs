use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;

use homecook_core::{CurrentUser, ServiceError};

use crate::api::AppState;
use crate::model::{AssignRole, CreateRole, Role};

/// Role administration. Every route requires the SuperAdmin role.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/roles", get(list_roles).post(create_role))
        .route("/api/roles/{name}", delete(delete_role))
        .route("/api/roles/user/{user_id}", get(user_roles))
        .route("/api/roles/assign-role-to-user", post(assign_role))
        .route("/api/roles/change-user-role", post(change_user_role))
}

async fn list_roles(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Vec<Role>>, ServiceError> {
    claims.require_super_admin()?;
    let roles = svc.list_roles().map_err(ServiceError::from)?;
    Ok(Json(roles))
}

async fn create_role(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<CreateRole>,
) -> Result<(StatusCode, Json<Role>), ServiceError> {
    claims.require_super_admin()?;
    let role = svc.create_role(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(role)))
}

async fn delete_role(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(name): Path<String>,
) -> Result<StatusCode, ServiceError> {
    claims.require_super_admin()?;
    svc.delete_role(&name).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn user_roles(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    claims.require_super_admin()?;
    if !svc.user_exists(&user_id).map_err(ServiceError::from)? {
        return Err(ServiceError::NotFound("User not found.".into()));
    }
    let roles = svc.user_roles(&user_id).map_err(ServiceError::from)?;
    Ok(Json(json!({"user_id": user_id, "roles": roles})))
}

async fn assign_role(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<AssignRole>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    claims.require_super_admin()?;
    let message = svc.assign_role(&input).map_err(ServiceError::from)?;
    Ok(Json(json!({"message": message})))
}

async fn change_user_role(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<AssignRole>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    claims.require_super_admin()?;
    let message = svc.change_user_role(&input).map_err(ServiceError::from)?;
    Ok(Json(json!({"message": message})))
}
