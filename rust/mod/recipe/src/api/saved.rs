use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use homecook_core::{CurrentUser, ServiceError};

use crate::api::AppState;
use crate::model::{SaveRecipe, SavedRecipeView};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/savedrecipes", post(save))
        .route("/api/savedrecipes/{id}", delete(unsave))
        .route("/api/savedrecipes/user/{user_id}", get(saved_for_user))
}

async fn saved_for_user(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SavedRecipeView>>, ServiceError> {
    let saved = svc
        .saved_for_user(&user_id, &claims)
        .map_err(ServiceError::from)?;
    Ok(Json(saved))
}

async fn save(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<SaveRecipe>,
) -> Result<(StatusCode, Json<SavedRecipeView>), ServiceError> {
    let saved = svc.save(&claims, input.recipe_id).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn unsave(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    svc.unsave(id, &claims).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
