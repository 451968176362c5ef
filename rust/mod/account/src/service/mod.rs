pub mod password;
pub mod role;
pub mod schema;
pub mod session;
pub mod user;
pub mod verification;

use std::sync::{Arc, OnceLock};

use thiserror::Error;

use homecook_kv::{KVError, KVStore};
use homecook_sql::{SQLError, SQLStore};

use crate::mailer::Mailer;
use crate::model::UserStats;

/// Account service error type.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<SQLError> for AccountError {
    fn from(e: SQLError) -> Self {
        match e {
            SQLError::Unique(m) => AccountError::Conflict(m),
            other => AccountError::Storage(other.to_string()),
        }
    }
}

impl From<KVError> for AccountError {
    fn from(e: KVError) -> Self {
        AccountError::Storage(e.to_string())
    }
}

impl From<AccountError> for homecook_core::ServiceError {
    fn from(e: AccountError) -> Self {
        use homecook_core::ServiceError;
        match e {
            AccountError::NotFound(m) => ServiceError::NotFound(m),
            AccountError::Conflict(m) => ServiceError::Conflict(m),
            AccountError::Validation(m) => ServiceError::Validation(m),
            AccountError::Unauthorized(m) => ServiceError::Unauthorized(m),
            AccountError::Forbidden(m) => ServiceError::PermissionDenied(m),
            AccountError::Storage(m) => ServiceError::Storage(m),
            AccountError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

/// Configuration for the account service.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// `iss` claim written and required on every token.
    pub issuer: String,
    /// Access token lifetime in seconds (default: 24h).
    pub access_token_ttl: i64,
    /// Public base URL used to build verification links.
    pub base_url: String,
    /// Verification token lifetime in seconds (default: 24h).
    pub verification_ttl: i64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "homecook-dev-secret-change-me".to_string(),
            issuer: "homecook".to_string(),
            access_token_ttl: 86400,
            base_url: "http://localhost:5057".to_string(),
            verification_ttl: 86400,
        }
    }
}

/// Source of per-user activity counters.
///
/// Implemented by the module that owns recipes; attached after both
/// services exist so the account service never depends on recipe tables.
pub trait UserActivity: Send + Sync {
    fn stats(&self, user_id: &str) -> Result<UserStats, AccountError>;
}

/// The account service: users, roles, sessions and email verification.
pub struct AccountService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) kv: Arc<dyn KVStore>,
    pub(crate) mailer: Arc<dyn Mailer>,
    pub(crate) config: AccountConfig,
    activity: OnceLock<Arc<dyn UserActivity>>,
}

impl AccountService {
    /// Create a new AccountService, initializing the schema and the
    /// built-in roles.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        kv: Arc<dyn KVStore>,
        mailer: Arc<dyn Mailer>,
        config: AccountConfig,
    ) -> Result<Arc<Self>, AccountError> {
        schema::init_schema(sql.as_ref())?;
        let svc = Arc::new(Self {
            sql,
            kv,
            mailer,
            config,
            activity: OnceLock::new(),
        });
        svc.ensure_builtin_roles()?;
        Ok(svc)
    }

    /// Attach the activity source. Only the first call takes effect.
    pub fn set_activity(&self, activity: Arc<dyn UserActivity>) {
        if self.activity.set(activity).is_err() {
            tracing::warn!("user activity source already attached, ignoring");
        }
    }

    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    pub(crate) fn user_stats(&self, user_id: &str) -> Result<UserStats, AccountError> {
        match self.activity.get() {
            Some(activity) => activity.stats(user_id),
            None => Ok(UserStats::default()),
        }
    }
}
