use homecook_core::{Claims, now_rfc3339};
use homecook_sql::{Row, Value};

use crate::model::{CreateRating, RatingView, UpdateRating};
use crate::service::{RecipeError, RecipeService, conflict_as};

const RATING_SELECT: &str = "SELECT rr.id, rr.user_id, u.full_name AS user_name, rr.recipe_id,
        rr.rating, rr.created_at
    FROM recipe_ratings rr JOIN users u ON u.id = rr.user_id";

fn rating_from_row(row: &Row) -> Result<RatingView, RecipeError> {
    Ok(RatingView {
        id: row.int("id")?,
        user_id: row.text("user_id")?,
        user_name: row.text("user_name")?,
        recipe_id: row.int("recipe_id")?,
        rating: row.int("rating")?,
        created_at: row.text("created_at")?,
    })
}

fn validate_rating(rating: i64) -> Result<(), RecipeError> {
    if !(1..=5).contains(&rating) {
        return Err(RecipeError::Validation("Rating must be between 1 and 5.".into()));
    }
    Ok(())
}

impl RecipeService {
    fn query_ratings(&self, filter: &str, params: &[Value]) -> Result<Vec<RatingView>, RecipeError> {
        let sql = format!("{}{} ORDER BY rr.id", RATING_SELECT, filter);
        self.sql.query(&sql, params)?.iter().map(rating_from_row).collect()
    }

    pub(crate) fn ratings_of(&self, recipe_id: i64) -> Result<Vec<RatingView>, RecipeError> {
        self.query_ratings(" WHERE rr.recipe_id = ?1", &[recipe_id.into()])
    }

    pub fn list_ratings(&self) -> Result<Vec<RatingView>, RecipeError> {
        self.query_ratings("", &[])
    }

    pub fn ratings_for_recipe(&self, recipe_id: i64) -> Result<Vec<RatingView>, RecipeError> {
        self.require_recipe(recipe_id)?;
        self.ratings_of(recipe_id)
    }

    pub fn get_rating(&self, id: i64) -> Result<RatingView, RecipeError> {
        self.query_ratings(" WHERE rr.id = ?1", &[id.into()])?
            .into_iter()
            .next()
            .ok_or_else(|| RecipeError::NotFound(format!("Rating with ID {} not found.", id)))
    }

    /// Rate a recipe as the caller. One rating per user and recipe; change
    /// it with [`update_rating`](Self::update_rating).
    pub fn rate(&self, user: &Claims, input: CreateRating) -> Result<RatingView, RecipeError> {
        validate_rating(input.rating)?;
        self.require_author(user)?;
        self.require_recipe(input.recipe_id)?;
        let id = self
            .sql
            .insert(
                "INSERT INTO recipe_ratings (rating, user_id, recipe_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                &[
                    input.rating.into(),
                    user.sub.as_str().into(),
                    input.recipe_id.into(),
                    now_rfc3339().into(),
                ],
            )
            .map_err(conflict_as("You have already rated this recipe."))?;
        self.get_rating(id)
    }

    /// Change a rating. Only the user who gave it may do so.
    pub fn update_rating(
        &self,
        id: i64,
        input: UpdateRating,
        caller: &Claims,
    ) -> Result<RatingView, RecipeError> {
        let current = self.get_rating(id)?;
        if current.user_id != caller.sub {
            return Err(RecipeError::Forbidden(
                "You can only change your own ratings.".into(),
            ));
        }
        validate_rating(input.rating)?;
        self.sql.exec(
            "UPDATE recipe_ratings SET rating = ?1 WHERE id = ?2",
            &[input.rating.into(), id.into()],
        )?;
        self.get_rating(id)
    }

    /// Remove a rating. Allowed for its owner and for administrators.
    pub fn delete_rating(&self, id: i64, caller: &Claims) -> Result<(), RecipeError> {
        let current = self.get_rating(id)?;
        if !caller.is_self_or_admin(&current.user_id) {
            return Err(RecipeError::Forbidden(
                "You are not authorized to delete this rating.".into(),
            ));
        }
        self.sql.exec("DELETE FROM recipe_ratings WHERE id = ?1", &[id.into()])?;
        Ok(())
    }
}
