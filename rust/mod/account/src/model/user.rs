use serde::{Deserialize, Serialize};

/// A registered account as stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    pub email: String,

    pub full_name: String,

    /// argon2id PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Set once the emailed verification link has been followed.
    pub email_confirmed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,

    /// RFC 3339 registration timestamp.
    pub join_date: String,
}

/// Input for self-registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Credentials for `POST /api/account/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Body of `POST /api/account/report`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportUser {
    pub user_id: String,
}

/// Activity counters shown on a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total_recipes: i64,
    pub total_likes: i64,
    pub total_saved_recipes: i64,
}

/// Public view of a user: profile, roles and activity counters.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub join_date: String,
    pub roles: Vec<String>,
    pub profile_image: Option<String>,
    #[serde(flatten)]
    pub stats: UserStats,
}
