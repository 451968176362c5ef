use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use homecook_core::{CurrentUser, ListParams, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{CreateRecipe, RecipeView, UpdateRecipe};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

async fn list_recipes(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<RecipeView>>, ServiceError> {
    let result = svc.list_recipes(&params).map_err(ServiceError::from)?;
    Ok(Json(result))
}

async fn get_recipe(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeView>, ServiceError> {
    let recipe = svc.get_recipe(id).map_err(ServiceError::from)?;
    Ok(Json(recipe))
}

async fn create_recipe(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(input): Json<CreateRecipe>,
) -> Result<(StatusCode, Json<RecipeView>), ServiceError> {
    let recipe = svc.create_recipe(&claims, input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn update_recipe(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateRecipe>,
) -> Result<Json<RecipeView>, ServiceError> {
    let recipe = svc
        .update_recipe(id, patch, &claims)
        .map_err(ServiceError::from)?;
    Ok(Json(recipe))
}

async fn delete_recipe(
    State(svc): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_recipe(id, &claims).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use homecook_core::ROLE_ADMIN;

    use crate::api::test_support::{app, call, login};
    use crate::service::testing::harness;

    fn recipe_body(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "category": "Dinner",
            "intro": "Quick and easy.",
            "ingredients": "pasta, garlic",
            "how_to": "Boil and toss.",
        })
    }

    #[tokio::test]
    async fn public_reads_authenticated_writes() {
        let h = harness();
        let app = app(&h);
        let (_, token) = login(&h, "alice@example.com", &[]);

        let (status, _) = call(&app, "POST", "/api/recipes", None, Some(recipe_body("Garlic Pasta"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call(&app, "POST", "/api/recipes", Some(&token), Some(recipe_body("Garlic Pasta"))).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let id = body["id"].as_i64().unwrap();
        assert!(body["image"].is_null());

        let (status, body) = call(&app, "GET", "/api/recipes", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Garlic Pasta");

        // A stale token does not block anonymous reads.
        let (status, _) = call(&app, "GET", &format!("/api/recipes/{}", id), Some("stale"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, "GET", "/api/recipes/424242", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Recipe with ID 424242 not found.");
    }

    #[tokio::test]
    async fn invalid_recipe_is_bad_request() {
        let h = harness();
        let app = app(&h);
        let (_, token) = login(&h, "alice@example.com", &[]);

        let mut body = recipe_body("Garlic Pasta");
        body["image"] = json!("not a url");
        let (status, resp) = call(&app, "POST", "/api/recipes", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn delete_requires_owner_or_admin() {
        let h = harness();
        let app = app(&h);
        let (_, alice) = login(&h, "alice@example.com", &[]);
        let (_, bob) = login(&h, "bob@example.com", &[]);
        let (_, admin) = login(&h, "admin@example.com", &[ROLE_ADMIN]);

        let (_, body) = call(&app, "POST", "/api/recipes", Some(&alice), Some(recipe_body("Garlic Pasta"))).await;
        let uri = format!("/api/recipes/{}", body["id"]);

        let (status, body) = call(&app, "DELETE", &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");

        let (status, _) = call(&app, "PUT", &uri, Some(&bob), Some(json!({"name": "Mine now"}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(&app, "DELETE", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
