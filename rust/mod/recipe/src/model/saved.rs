use serde::{Deserialize, Serialize};

/// A bookmark of a recipe by a user.
#[derive(Debug, Clone, Serialize)]
pub struct SavedRecipeView {
    pub id: i64,
    pub user_id: String,
    pub user_name: String,
    pub recipe_id: i64,
    pub recipe_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveRecipe {
    pub recipe_id: i64,
}
