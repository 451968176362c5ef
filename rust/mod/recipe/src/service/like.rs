use homecook_core::{Claims, now_rfc3339};
use homecook_sql::{Row, Value};

use crate::model::LikeView;
use crate::service::{RecipeError, RecipeService, conflict_as};

const LIKE_SELECT: &str = "SELECT l.id, l.user_id, u.full_name AS user_name, l.recipe_id,
        r.name AS recipe_name, l.created_at
    FROM likes l
    JOIN users u ON u.id = l.user_id
    JOIN recipes r ON r.id = l.recipe_id";

fn like_from_row(row: &Row) -> Result<LikeView, RecipeError> {
    Ok(LikeView {
        id: row.int("id")?,
        user_id: row.text("user_id")?,
        user_name: row.text("user_name")?,
        recipe_id: row.int("recipe_id")?,
        recipe_name: row.text("recipe_name")?,
        created_at: row.text("created_at")?,
    })
}

impl RecipeService {
    fn query_likes(&self, filter: &str, params: &[Value]) -> Result<Vec<LikeView>, RecipeError> {
        let sql = format!("{}{} ORDER BY l.id", LIKE_SELECT, filter);
        self.sql.query(&sql, params)?.iter().map(like_from_row).collect()
    }

    pub(crate) fn likes_of(&self, recipe_id: i64) -> Result<Vec<LikeView>, RecipeError> {
        self.query_likes(" WHERE l.recipe_id = ?1", &[recipe_id.into()])
    }

    pub fn list_likes(&self) -> Result<Vec<LikeView>, RecipeError> {
        self.query_likes("", &[])
    }

    pub fn likes_for_recipe(&self, recipe_id: i64) -> Result<Vec<LikeView>, RecipeError> {
        self.require_recipe(recipe_id)?;
        self.likes_of(recipe_id)
    }

    /// Like a recipe as the caller. Each user likes a recipe at most once.
    pub fn like(&self, user: &Claims, recipe_id: i64) -> Result<LikeView, RecipeError> {
        self.require_author(user)?;
        self.require_recipe(recipe_id)?;
        let id = self
            .sql
            .insert(
                "INSERT INTO likes (user_id, recipe_id, created_at) VALUES (?1, ?2, ?3)",
                &[user.sub.as_str().into(), recipe_id.into(), now_rfc3339().into()],
            )
            .map_err(conflict_as("You have already liked this recipe."))?;

        self.query_likes(" WHERE l.id = ?1", &[id.into()])?
            .into_iter()
            .next()
            .ok_or_else(|| RecipeError::Internal(format!("like {} vanished after insert", id)))
    }

    /// Remove `user_id`'s like from a recipe. Callers may only remove their
    /// own likes unless they are administrators.
    pub fn unlike(&self, recipe_id: i64, user_id: &str, caller: &Claims) -> Result<(), RecipeError> {
        if !caller.is_self_or_admin(user_id) {
            return Err(RecipeError::Forbidden(
                "You can only remove your own likes.".into(),
            ));
        }
        let affected = self.sql.exec(
            "DELETE FROM likes WHERE recipe_id = ?1 AND user_id = ?2",
            &[recipe_id.into(), user_id.into()],
        )?;
        if affected == 0 {
            return Err(RecipeError::NotFound("Like not found.".into()));
        }
        Ok(())
    }
}
