//! Authenticated-caller plumbing shared by all modules.
//!
//! The account module's middleware validates the bearer token and stores
//! [`Claims`] in the request extensions. Handlers that need a caller take
//! a [`CurrentUser`]; handlers that don't simply never ask.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Built-in role with every administrative right, including role management.
pub const ROLE_SUPER_ADMIN: &str = "SuperAdmin";
/// Built-in moderator role: may delete any recipe, comment or rating.
pub const ROLE_ADMIN: &str = "Admin";
/// Default role given to every registered user.
pub const ROLE_USER: &str = "User";

/// JWT claims payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,
    /// Full name of the user.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role names held at login time.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Session id, used for logout/revocation.
    pub sid: String,
    /// Issuer.
    pub iss: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Admin or SuperAdmin.
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN) || self.has_role(ROLE_SUPER_ADMIN)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// True if the caller is `user_id` or an administrator.
    pub fn is_self_or_admin(&self, user_id: &str) -> bool {
        self.sub == user_id || self.is_admin()
    }

    pub fn require_super_admin(&self) -> Result<(), ServiceError> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "role {} required",
                ROLE_SUPER_ADMIN
            )))
        }
    }
}

/// Why a presented bearer token was rejected. Stored in request extensions
/// by the middleware so that [`CurrentUser`] can report it.
#[derive(Debug, Clone)]
pub struct AuthFailure(pub String);

/// Extractor for the authenticated caller. Rejects with 401 if the request
/// carried no valid token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(CurrentUser(claims.clone()));
        }
        let reason = parts
            .extensions
            .get::<AuthFailure>()
            .map(|f| f.0.clone())
            .unwrap_or_else(|| "missing authorization token".to_string());
        Err(ServiceError::Unauthorized(reason))
    }
}
