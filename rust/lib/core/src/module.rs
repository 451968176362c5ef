use axum::Router;

/// A business module that contributes HTTP routes.
///
/// Each module (account, recipe) implements this trait. The server binary
/// collects all modules and merges their routers at the root; modules own
/// their full `/api/...` paths.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes with state already applied.
    fn routes(&self) -> Router;
}
