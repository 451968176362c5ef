use serde::{Deserialize, Serialize};

/// A 1 to 5 star score; one per (user, recipe).
#[derive(Debug, Clone, Serialize)]
pub struct RatingView {
    pub id: i64,
    pub user_id: String,
    pub user_name: String,
    pub recipe_id: i64,
    pub rating: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRating {
    pub recipe_id: i64,
    pub rating: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRating {
    pub rating: i64,
}
