use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use homecook_core::{CurrentUser, ServiceError};

use crate::api::AppState;
use crate::model::{CreateRating, RatingView, UpdateRating};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reciperatings", get(list_ratings).post(rate))
        .route(
            "/api/reciperatings/{id}",
            get(get_rating).put(update_rating).delete(delete_rating),
        )
        .route("/api/reciperatings/recipe/{recipe_id}", get(ratings_for_recipe))
}

async fn list_ratings(State(svc): State<AppState>) -> Result<Json<Vec<RatingView>>, ServiceError> {
    let ratings = svc.list_ratings().map_err(ServiceError::from)?;
    Ok(Json(ratings))
}

async fn ratings_for_recipe(
    State(svc): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<Vec<RatingView>>, ServiceError> {
    let ratings = svc.ratings_for_recipe(recipe_id).map_err(ServiceError::from)?;
    Ok(Json(ratings))
}

async fn get_rating(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RatingView>, ServiceError> {
    let rating = svc.get_rating(id).map_err(ServiceError::from)?;
    Ok(Json(rating))
}

async fn rate(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<CreateRating>,
) -> Result<(StatusCode, Json<RatingView>), ServiceError> {
    let rating = svc.rate(&claims, input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(rating)))
}

async fn update_rating(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateRating>,
) -> Result<Json<RatingView>, ServiceError> {
    let rating = svc
        .update_rating(id, input, &claims)
        .map_err(ServiceError::from)?;
    Ok(Json(rating))
}

async fn delete_rating(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_rating(id, &claims).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
