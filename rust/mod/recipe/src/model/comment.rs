use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub created_at: String,
    pub user_id: String,
    pub user_name: String,
    pub recipe_id: i64,
    /// Set when this comment is a reply.
    pub parent_comment_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub recipe_id: i64,
    pub content: String,
    #[serde(default)]
    pub parent_comment_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateComment {
    pub content: String,
}
