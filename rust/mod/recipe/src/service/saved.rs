use homecook_core::{Claims, now_rfc3339};
use homecook_sql::{Row, Value};

use crate::model::SavedRecipeView;
use crate::service::{RecipeError, RecipeService, conflict_as};

const SAVED_SELECT: &str = "SELECT s.id, s.user_id, u.full_name AS user_name, s.recipe_id,
        r.name AS recipe_name, s.created_at
    FROM saved_recipes s
    JOIN users u ON u.id = s.user_id
    JOIN recipes r ON r.id = s.recipe_id";

fn saved_from_row(row: &Row) -> Result<SavedRecipeView, RecipeError> {
    Ok(SavedRecipeView {
        id: row.int("id")?,
        user_id: row.text("user_id")?,
        user_name: row.text("user_name")?,
        recipe_id: row.int("recipe_id")?,
        recipe_name: row.text("recipe_name")?,
        created_at: row.text("created_at")?,
    })
}

impl RecipeService {
    fn query_saved(&self, filter: &str, params: &[Value]) -> Result<Vec<SavedRecipeView>, RecipeError> {
        let sql = format!("{}{} ORDER BY s.id", SAVED_SELECT, filter);
        self.sql.query(&sql, params)?.iter().map(saved_from_row).collect()
    }

    pub(crate) fn saves_of(&self, recipe_id: i64) -> Result<Vec<SavedRecipeView>, RecipeError> {
        self.query_saved(" WHERE s.recipe_id = ?1", &[recipe_id.into()])
    }

    /// A user's bookmarks. Visible only to that user.
    pub fn saved_for_user(&self, user_id: &str, caller: &Claims) -> Result<Vec<SavedRecipeView>, RecipeError> {
        if caller.sub != user_id {
            return Err(RecipeError::Forbidden(
                "You can only view your own saved recipes.".into(),
            ));
        }
        self.query_saved(" WHERE s.user_id = ?1", &[user_id.into()])
    }

    pub fn save(&self, user: &Claims, recipe_id: i64) -> Result<SavedRecipeView, RecipeError> {
        self.require_author(user)?;
        self.require_recipe(recipe_id)?;
        let id = self
            .sql
            .insert(
                "INSERT INTO saved_recipes (user_id, recipe_id, created_at) VALUES (?1, ?2, ?3)",
                &[user.sub.as_str().into(), recipe_id.into(), now_rfc3339().into()],
            )
            .map_err(conflict_as("Recipe is already saved."))?;

        self.query_saved(" WHERE s.id = ?1", &[id.into()])?
            .into_iter()
            .next()
            .ok_or_else(|| RecipeError::Internal(format!("saved recipe {} vanished after insert", id)))
    }

    /// Remove a bookmark. Only its owner may do so.
    pub fn unsave(&self, id: i64, caller: &Claims) -> Result<(), RecipeError> {
        let owner = self
            .sql
            .query_one("SELECT user_id FROM saved_recipes WHERE id = ?1", &[id.into()])?
            .and_then(|r| r.opt_text("user_id"))
            .ok_or_else(|| RecipeError::NotFound(format!("Saved recipe with ID {} not found.", id)))?;
        if owner != caller.sub {
            return Err(RecipeError::Forbidden(
                "You can only remove your own saved recipes.".into(),
            ));
        }
        self.sql.exec("DELETE FROM saved_recipes WHERE id = ?1", &[id.into()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use homecook_core::ROLE_SUPER_ADMIN;

    use super::*;
    use crate::service::testing::harness;

    #[test]
    fn save_list_unsave() {
        let h = harness();
        let alice = h.user("alice@example.com", &[]);
        let bob = h.user("bob@example.com", &[]);
        let r = h.recipe(&alice, "Garlic Pasta");

        let saved = h.svc.save(&bob, r).unwrap();
        assert_eq!(saved.recipe_name, "Garlic Pasta");
        assert!(matches!(h.svc.save(&bob, r), Err(RecipeError::Conflict(_))));
        assert!(matches!(h.svc.save(&bob, 9999), Err(RecipeError::NotFound(_))));

        assert_eq!(h.svc.saved_for_user(&bob.sub, &bob).unwrap().len(), 1);
        assert!(matches!(
            h.svc.saved_for_user(&bob.sub, &alice),
            Err(RecipeError::Forbidden(_))
        ));

        assert!(matches!(h.svc.unsave(saved.id, &alice), Err(RecipeError::Forbidden(_))));
        h.svc.unsave(saved.id, &bob).unwrap();
        assert!(matches!(h.svc.unsave(saved.id, &bob), Err(RecipeError::NotFound(_))));
    }

    #[test]
    fn super_admin_cannot_read_others_bookmarks() {
        let h = harness();
        let bob = h.user("bob@example.com", &[]);
        let root = h.user("root@example.com", &[ROLE_SUPER_ADMIN]);
        assert!(matches!(
            h.svc.saved_for_user(&bob.sub, &root),
            Err(RecipeError::Forbidden(_))
        ));
    }
}
