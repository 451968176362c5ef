//! Recipe module: recipes and what users attach to them.
//!
//! # Resources
//!
//! - **Recipe**: authored by a user; owner edits, owner or admin deletes
//! - **Comment**: threaded through `parent_comment_id`
//! - **Like**, **Rating**, **SavedRecipe**: one per (user, recipe)
//!
//! Built on top of the account module: users live there, and the recipe
//! service feeds profile counters back through `UserActivity`.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use homecook_core::Module;

use crate::service::RecipeService;

/// Recipe module implementing the Module trait.
pub struct RecipeModule {
    service: Arc<RecipeService>,
}

impl RecipeModule {
    pub fn new(service: Arc<RecipeService>) -> Self {
        Self { service }
    }
}

impl Module for RecipeModule {
    fn name(&self) -> &str {
        "recipe"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
