use serde::{Deserialize, Serialize};

use crate::model::{CommentView, LikeView, RatingView, SavedRecipeView};

/// A recipe with its author's name and everything attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub intro: String,
    pub ingredients: String,
    pub how_to: String,
    pub image: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub user_id: String,
    pub user_name: String,
    /// Mean of `ratings`, or null when unrated.
    pub average_rating: Option<f64>,
    pub comments: Vec<CommentView>,
    pub ratings: Vec<RatingView>,
    pub likes: Vec<LikeView>,
    pub saved_recipes: Vec<SavedRecipeView>,
}

/// Input for creating a recipe. The author comes from the caller's token.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipe {
    pub name: String,
    pub category: String,
    pub intro: String,
    pub ingredients: String,
    pub how_to: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecipe {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub how_to: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
