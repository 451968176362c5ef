use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LikeView {
    pub id: i64,
    pub user_id: String,
    pub user_name: String,
    pub recipe_id: i64,
    pub recipe_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLike {
    pub recipe_id: i64,
}
