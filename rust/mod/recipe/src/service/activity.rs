use std::sync::Arc;

use account::model::UserStats;
use account::service::{AccountError, UserActivity};
use homecook_sql::SQLStore;

/// Per-user counters read straight from the recipe tables.
///
/// Holds only the store, not the recipe service, so attaching it to the
/// account service creates no reference cycle.
pub struct RecipeActivity {
    sql: Arc<dyn SQLStore>,
}

impl RecipeActivity {
    pub fn new(sql: Arc<dyn SQLStore>) -> Self {
        Self { sql }
    }
}

impl UserActivity for RecipeActivity {
    fn stats(&self, user_id: &str) -> Result<UserStats, AccountError> {
        let row = self.sql.query_one(
            "SELECT
                (SELECT COUNT(*) FROM recipes WHERE user_id = ?1) AS total_recipes,
                (SELECT COUNT(*) FROM likes WHERE user_id = ?1) AS total_likes,
                (SELECT COUNT(*) FROM saved_recipes WHERE user_id = ?1) AS total_saved_recipes",
            &[user_id.into()],
        )?;
        Ok(row
            .map(|r| UserStats {
                total_recipes: r.get_i64("total_recipes").unwrap_or(0),
                total_likes: r.get_i64("total_likes").unwrap_or(0),
                total_saved_recipes: r.get_i64("total_saved_recipes").unwrap_or(0),
            })
            .unwrap_or_default())
    }
}
