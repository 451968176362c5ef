use homecook_sql::SQLStore;

use crate::service::RecipeError;

/// Initialize the SQLite schema for recipes and their attachments.
///
/// Every table references `users`; deleting a user or a recipe removes
/// what hangs off it.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), RecipeError> {
    sql.exec_batch(
        "CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            intro TEXT NOT NULL,
            ingredients TEXT NOT NULL,
            how_to TEXT NOT NULL,
            image TEXT,
            created_at TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_recipes_user ON recipes(user_id);
        CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category);

        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            parent_comment_id INTEGER REFERENCES comments(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_comments_recipe ON comments(recipe_id);
        CREATE INDEX IF NOT EXISTS idx_comments_parent ON comments(parent_comment_id);

        CREATE TABLE IF NOT EXISTS likes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, recipe_id)
        );
        CREATE INDEX IF NOT EXISTS idx_likes_recipe ON likes(recipe_id);

        CREATE TABLE IF NOT EXISTS recipe_ratings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, recipe_id)
        );
        CREATE INDEX IF NOT EXISTS idx_ratings_recipe ON recipe_ratings(recipe_id);

        CREATE TABLE IF NOT EXISTS saved_recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, recipe_id)
        );
        CREATE INDEX IF NOT EXISTS idx_saved_recipe ON saved_recipes(recipe_id);",
    )?;
    Ok(())
}
