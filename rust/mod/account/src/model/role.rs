use serde::{Deserialize, Serialize};

/// A named role. Role names are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRole {
    pub name: String,
}

/// Body of the assign/change role endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRole {
    pub user_id: String,
    pub role_name: String,
}
