pub mod activity;
pub mod comment;
pub mod like;
pub mod rating;
pub mod recipe;
pub mod saved;
pub mod schema;

use std::sync::Arc;

use thiserror::Error;

use account::service::{AccountError, AccountService};
use homecook_core::Claims;
use homecook_sql::{SQLError, SQLStore};

/// Recipe service error type.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<SQLError> for RecipeError {
    fn from(e: SQLError) -> Self {
        match e {
            SQLError::Unique(m) => RecipeError::Conflict(m),
            other => RecipeError::Storage(other.to_string()),
        }
    }
}

impl From<AccountError> for RecipeError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::NotFound(m) => RecipeError::NotFound(m),
            AccountError::Conflict(m) => RecipeError::Conflict(m),
            AccountError::Validation(m) => RecipeError::Validation(m),
            AccountError::Unauthorized(m) | AccountError::Forbidden(m) => RecipeError::Forbidden(m),
            AccountError::Storage(m) => RecipeError::Storage(m),
            AccountError::Internal(m) => RecipeError::Internal(m),
        }
    }
}

impl From<RecipeError> for homecook_core::ServiceError {
    fn from(e: RecipeError) -> Self {
        use homecook_core::ServiceError;
        match e {
            RecipeError::NotFound(m) => ServiceError::NotFound(m),
            RecipeError::Conflict(m) => ServiceError::Conflict(m),
            RecipeError::Validation(m) => ServiceError::Validation(m),
            RecipeError::Forbidden(m) => ServiceError::PermissionDenied(m),
            RecipeError::Storage(m) => ServiceError::Storage(m),
            RecipeError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

/// Map a unique-constraint failure to a friendlier conflict message.
pub(crate) fn conflict_as(message: &str) -> impl Fn(SQLError) -> RecipeError + '_ {
    move |e| match RecipeError::from(e) {
        RecipeError::Conflict(_) => RecipeError::Conflict(message.to_string()),
        other => other,
    }
}

/// The recipe service: recipes and the comments, likes, ratings and
/// bookmarks users attach to them.
pub struct RecipeService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) accounts: Arc<AccountService>,
}

impl RecipeService {
    /// Create a new RecipeService, initializing the schema and attaching
    /// the activity counters to the account service.
    ///
    /// The account service must share the same SQL store.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        accounts: Arc<AccountService>,
    ) -> Result<Arc<Self>, RecipeError> {
        schema::init_schema(sql.as_ref())?;
        accounts.set_activity(Arc::new(activity::RecipeActivity::new(sql.clone())));
        Ok(Arc::new(Self { sql, accounts }))
    }

    /// Fail with 404 unless the caller's account still exists.
    pub(crate) fn require_author(&self, caller: &Claims) -> Result<(), RecipeError> {
        if !self.accounts.user_exists(&caller.sub)? {
            return Err(RecipeError::NotFound(format!("User with ID {} not found.", caller.sub)));
        }
        Ok(())
    }

    /// Fail with 404 unless the recipe exists.
    pub(crate) fn require_recipe(&self, id: i64) -> Result<(), RecipeError> {
        let n = self
            .sql
            .count("SELECT COUNT(*) AS n FROM recipes WHERE id = ?1", &[id.into()])?;
        if n == 0 {
            return Err(RecipeError::NotFound(format!("Recipe with ID {} not found.", id)));
        }
        Ok(())
    }
}
