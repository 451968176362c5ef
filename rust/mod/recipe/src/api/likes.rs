use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

use homecook_core::{CurrentUser, ServiceError};

use crate::api::AppState;
use crate::model::{CreateLike, LikeView};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/likes", get(list_likes).post(like))
        .route("/api/likes/recipe/{recipe_id}", get(likes_for_recipe))
        .route("/api/likes/recipe/{recipe_id}/user/{user_id}", delete(unlike))
}

async fn list_likes(State(svc): State<AppState>) -> Result<Json<Vec<LikeView>>, ServiceError> {
    let likes = svc.list_likes().map_err(ServiceError::from)?;
    Ok(Json(likes))
}

async fn likes_for_recipe(
    State(svc): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<Vec<LikeView>>, ServiceError> {
    let likes = svc.likes_for_recipe(recipe_id).map_err(ServiceError::from)?;
    Ok(Json(likes))
}

async fn like(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<CreateLike>,
) -> Result<(StatusCode, Json<LikeView>), ServiceError> {
    let like = svc.like(&claims, input.recipe_id).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(like)))
}

async fn unlike(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path((recipe_id, user_id)): Path<(i64, String)>,
) -> Result<StatusCode, ServiceError> {
    svc.unlike(recipe_id, &user_id, &claims)
        .map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::test_support::{app, call, login};
    use crate::service::testing::harness;

    #[tokio::test]
    async fn liking_twice_is_bad_request() {
        let h = harness();
        let app = app(&h);
        let (alice, token) = login(&h, "alice@example.com", &[]);
        let recipe = h.recipe(&alice, "Garlic Pasta");

        let (status, _) = call(&app, "POST", "/api/likes", Some(&token), Some(json!({"recipe_id": recipe}))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "POST", "/api/likes", Some(&token), Some(json!({"recipe_id": recipe}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ALREADY_EXISTS");

        let (status, body) = call(&app, "GET", &format!("/api/likes/recipe/{}", recipe), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let uri = format!("/api/likes/recipe/{}/user/{}", recipe, alice.sub);
        let (status, _) = call(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_recipe_is_not_found() {
        let h = harness();
        let app = app(&h);
        let (_, token) = login(&h, "alice@example.com", &[]);
        let (status, _) = call(&app, "POST", "/api/likes", Some(&token), Some(json!({"recipe_id": 77}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
