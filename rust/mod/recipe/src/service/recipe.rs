use homecook_core::{Claims, ListParams, ListResult, now_rfc3339};
use homecook_sql::{Row, Value};

use crate::model::{CreateRecipe, RatingView, RecipeView, UpdateRecipe};
use crate::service::{RecipeError, RecipeService};

const RECIPE_SELECT: &str = "SELECT r.id, r.name, r.category, r.intro, r.ingredients, r.how_to,
        r.image, r.created_at, r.user_id, u.full_name AS user_name
    FROM recipes r JOIN users u ON u.id = r.user_id";

/// Recipe fields after trimming and validation.
struct RecipeFields {
    name: String,
    category: String,
    intro: String,
    ingredients: String,
    how_to: String,
    image: Option<String>,
}

fn required(field: &str, value: &str) -> Result<String, RecipeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RecipeError::Validation(format!("{} is required.", field)));
    }
    Ok(value.to_string())
}

/// Empty means no image; anything else must be an absolute http(s) URL.
fn normalize_image(image: Option<&str>) -> Result<Option<String>, RecipeError> {
    let Some(image) = image.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let rest = image
        .strip_prefix("https://")
        .or_else(|| image.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !image.contains(char::is_whitespace) => {
            Ok(Some(image.to_string()))
        }
        _ => Err(RecipeError::Validation("Invalid image URL format.".into())),
    }
}

impl RecipeFields {
    fn validate(
        name: &str,
        category: &str,
        intro: &str,
        ingredients: &str,
        how_to: &str,
        image: Option<&str>,
    ) -> Result<Self, RecipeError> {
        let name = required("Recipe name", name)?;
        if !(3..=150).contains(&name.chars().count()) {
            return Err(RecipeError::Validation(
                "Recipe name must be between 3 and 150 characters.".into(),
            ));
        }
        let intro = required("Intro", intro)?;
        if intro.chars().count() > 300 {
            return Err(RecipeError::Validation(
                "Intro must be a maximum of 300 characters.".into(),
            ));
        }
        Ok(Self {
            name,
            category: required("Category", category)?,
            intro,
            ingredients: required("Ingredients", ingredients)?,
            how_to: required("Instructions", how_to)?,
            image: normalize_image(image)?,
        })
    }
}

pub(crate) fn average(ratings: &[RatingView]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| r.rating).sum();
    Some(sum as f64 / ratings.len() as f64)
}

impl RecipeService {
    /// List recipes, newest first, optionally filtered by category or by a
    /// substring of the name.
    pub fn list_recipes(&self, params: &ListParams) -> Result<ListResult<RecipeView>, RecipeError> {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(category) = params.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            values.push(category.into());
            clauses.push(format!("r.category = ?{} COLLATE NOCASE", values.len()));
        }
        if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            values.push(q.into());
            clauses.push(format!("r.name LIKE '%' || ?{} || '%'", values.len()));
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let total = self.sql.count(
            &format!("SELECT COUNT(*) AS n FROM recipes r{}", where_sql),
            &values,
        )? as usize;

        let limit_idx = values.len() + 1;
        values.push(Value::Integer(params.effective_limit() as i64));
        values.push(Value::Integer(params.effective_offset()));
        let sql = format!(
            "{}{} ORDER BY r.created_at DESC, r.id DESC LIMIT ?{} OFFSET ?{}",
            RECIPE_SELECT,
            where_sql,
            limit_idx,
            limit_idx + 1,
        );

        let rows = self.sql.query(&sql, &values)?;
        let items = rows
            .iter()
            .map(|row| self.hydrate(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListResult { items, total })
    }

    pub fn get_recipe(&self, id: i64) -> Result<RecipeView, RecipeError> {
        let row = self
            .sql
            .query_one(&format!("{} WHERE r.id = ?1", RECIPE_SELECT), &[id.into()])?
            .ok_or_else(|| RecipeError::NotFound(format!("Recipe with ID {} not found.", id)))?;
        self.hydrate(&row)
    }

    /// Publish a recipe authored by the caller.
    pub fn create_recipe(&self, author: &Claims, input: CreateRecipe) -> Result<RecipeView, RecipeError> {
        self.require_author(author)?;
        let f = RecipeFields::validate(
            &input.name,
            &input.category,
            &input.intro,
            &input.ingredients,
            &input.how_to,
            input.image.as_deref(),
        )?;

        let id = self.sql.insert(
            "INSERT INTO recipes (name, category, intro, ingredients, how_to, image, created_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            &[
                f.name.into(),
                f.category.into(),
                f.intro.into(),
                f.ingredients.into(),
                f.how_to.into(),
                f.image.into(),
                now_rfc3339().into(),
                author.sub.as_str().into(),
            ],
        )?;
        tracing::info!(recipe_id = id, user_id = %author.sub, "created recipe");
        self.get_recipe(id)
    }

    /// Edit a recipe. Only its author may do so.
    pub fn update_recipe(
        &self,
        id: i64,
        patch: UpdateRecipe,
        caller: &Claims,
    ) -> Result<RecipeView, RecipeError> {
        let current = self.get_recipe(id)?;
        if current.user_id != caller.sub {
            return Err(RecipeError::Forbidden(
                "You are not authorized to edit this recipe.".into(),
            ));
        }

        let image = match patch.image.as_deref() {
            Some(image) => Some(image),
            None => current.image.as_deref(),
        };
        let f = RecipeFields::validate(
            patch.name.as_deref().unwrap_or(&current.name),
            patch.category.as_deref().unwrap_or(&current.category),
            patch.intro.as_deref().unwrap_or(&current.intro),
            patch.ingredients.as_deref().unwrap_or(&current.ingredients),
            patch.how_to.as_deref().unwrap_or(&current.how_to),
            image,
        )?;

        self.sql.exec(
            "UPDATE recipes SET name = ?1, category = ?2, intro = ?3, ingredients = ?4,
                how_to = ?5, image = ?6
             WHERE id = ?7",
            &[
                f.name.into(),
                f.category.into(),
                f.intro.into(),
                f.ingredients.into(),
                f.how_to.into(),
                f.image.into(),
                id.into(),
            ],
        )?;
        self.get_recipe(id)
    }

    /// Delete a recipe and everything attached to it. Allowed for the
    /// author and for administrators.
    pub fn delete_recipe(&self, id: i64, caller: &Claims) -> Result<(), RecipeError> {
        let owner = self
            .sql
            .query_one("SELECT user_id FROM recipes WHERE id = ?1", &[id.into()])?
            .and_then(|r| r.opt_text("user_id"))
            .ok_or_else(|| RecipeError::NotFound(format!("Recipe with ID {} not found.", id)))?;
        if !caller.is_self_or_admin(&owner) {
            return Err(RecipeError::Forbidden(
                "You are not authorized to delete this recipe.".into(),
            ));
        }
        self.sql.exec("DELETE FROM recipes WHERE id = ?1", &[id.into()])?;
        tracing::info!(recipe_id = id, deleted_by = %caller.sub, "deleted recipe");
        Ok(())
    }

    fn hydrate(&self, row: &Row) -> Result<RecipeView, RecipeError> {
        let id = row.int("id")?;
        let ratings = self.ratings_of(id)?;
        Ok(RecipeView {
            id,
            name: row.text("name")?,
            category: row.text("category")?,
            intro: row.text("intro")?,
            ingredients: row.text("ingredients")?,
            how_to: row.text("how_to")?,
            image: row.opt_text("image"),
            created_at: row.text("created_at")?,
            user_id: row.text("user_id")?,
            user_name: row.text("user_name")?,
            average_rating: average(&ratings),
            comments: self.comments_of(id)?,
            likes: self.likes_of(id)?,
            saved_recipes: self.saves_of(id)?,
            ratings,
        })
    }
}
