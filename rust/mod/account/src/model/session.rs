use serde::{Deserialize, Serialize};

/// A login session. Each issued access token carries its session id in the
/// `sid` claim; revoking the session invalidates the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub revoked: bool,
    pub issued_at: String,
    pub expires_at: String,
}

/// Response of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer".
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
}
