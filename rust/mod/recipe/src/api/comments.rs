use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use homecook_core::{CurrentUser, ServiceError};

use crate::api::AppState;
use crate::model::{CommentView, CreateComment, UpdateComment};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/comments", get(list_comments).post(create_comment))
        .route(
            "/api/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route("/api/comments/{id}/replies", get(list_replies))
}

async fn list_comments(
    State(svc): State<AppState>,
) -> Result<Json<Vec<CommentView>>, ServiceError> {
    let comments = svc.list_comments().map_err(ServiceError::from)?;
    Ok(Json(comments))
}

async fn get_comment(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CommentView>, ServiceError> {
    let comment = svc.get_comment(id).map_err(ServiceError::from)?;
    Ok(Json(comment))
}

async fn list_replies(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CommentView>>, ServiceError> {
    let replies = svc.list_replies(id).map_err(ServiceError::from)?;
    Ok(Json(replies))
}

async fn create_comment(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<CreateComment>,
) -> Result<(StatusCode, Json<CommentView>), ServiceError> {
    let comment = svc.create_comment(&claims, input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn update_comment(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateComment>,
) -> Result<Json<CommentView>, ServiceError> {
    let comment = svc
        .update_comment(id, input, &claims)
        .map_err(ServiceError::from)?;
    Ok(Json(comment))
}

async fn delete_comment(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_comment(id, &claims).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
