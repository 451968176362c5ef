use homecook_core::{ROLE_ADMIN, ROLE_SUPER_ADMIN, ROLE_USER, now_rfc3339};

use crate::model::{AssignRole, CreateRole, Role};
use crate::service::{AccountError, AccountService};

/// Roles created at startup. None of them can be deleted.
pub const BUILTIN_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_ADMIN, ROLE_USER];

impl AccountService {
    pub fn ensure_builtin_roles(&self) -> Result<(), AccountError> {
        let now = now_rfc3339();
        for name in BUILTIN_ROLES {
            self.sql.exec(
                "INSERT OR IGNORE INTO roles (name, created_at) VALUES (?1, ?2)",
                &[(*name).into(), now.as_str().into()],
            )?;
        }
        Ok(())
    }

    pub fn list_roles(&self) -> Result<Vec<Role>, AccountError> {
        let rows = self
            .sql
            .query("SELECT name, created_at FROM roles ORDER BY name", &[])?;
        rows.iter()
            .map(|r| {
                Ok(Role {
                    name: r.text("name")?,
                    created_at: r.text("created_at")?,
                })
            })
            .collect()
    }

    pub fn create_role(&self, input: CreateRole) -> Result<Role, AccountError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AccountError::Validation("Role name cannot be empty.".into()));
        }
        let role = Role {
            name: name.to_string(),
            created_at: now_rfc3339(),
        };
        self.sql
            .exec(
                "INSERT INTO roles (name, created_at) VALUES (?1, ?2)",
                &[role.name.clone().into(), role.created_at.clone().into()],
            )
            .map_err(|e| match AccountError::from(e) {
                AccountError::Conflict(_) => AccountError::Conflict("Role already exists.".into()),
                other => other,
            })?;
        tracing::info!(role = %role.name, "created role");
        Ok(role)
    }

    /// Delete a role and every assignment of it. Built-in roles stay.
    pub fn delete_role(&self, name: &str) -> Result<(), AccountError> {
        let name = name.trim();
        if let Some(builtin) = BUILTIN_ROLES.iter().find(|r| r.eq_ignore_ascii_case(name)) {
            return Err(AccountError::Validation(format!(
                "The {} role cannot be deleted.",
                builtin
            )));
        }
        let affected = self
            .sql
            .exec("DELETE FROM roles WHERE name = ?1", &[name.into()])?;
        if affected == 0 {
            return Err(AccountError::NotFound("Role not found.".into()));
        }
        tracing::info!(role = %name, "deleted role");
        Ok(())
    }

    /// Stored spelling of a role name, matched case-insensitively.
    fn canonical_role(&self, name: &str) -> Result<String, AccountError> {
        self.sql
            .query_one("SELECT name FROM roles WHERE name = ?1", &[name.trim().into()])?
            .and_then(|r| r.opt_text("name"))
            .ok_or_else(|| AccountError::NotFound("Role not found.".into()))
    }

    /// Role names held by a user, sorted.
    pub fn user_roles(&self, user_id: &str) -> Result<Vec<String>, AccountError> {
        let rows = self.sql.query(
            "SELECT role_name FROM user_roles WHERE user_id = ?1 ORDER BY role_name",
            &[user_id.into()],
        )?;
        Ok(rows.iter().filter_map(|r| r.opt_text("role_name")).collect())
    }

    /// Add a role to a user without any existence checks on the user.
    /// Granting a role the user already holds is a no-op.
    pub fn grant_role(&self, user_id: &str, role: &str) -> Result<(), AccountError> {
        let role = self.canonical_role(role)?;
        self.sql.exec(
            "INSERT OR IGNORE INTO user_roles (user_id, role_name) VALUES (?1, ?2)",
            &[user_id.into(), role.into()],
        )?;
        Ok(())
    }

    fn require_user(&self, user_id: &str) -> Result<(), AccountError> {
        if self.user_exists(user_id)? {
            Ok(())
        } else {
            Err(AccountError::NotFound("User not found.".into()))
        }
    }

    /// Add a role to a user. Fails if the user already holds it.
    pub fn assign_role(&self, input: &AssignRole) -> Result<String, AccountError> {
        self.require_user(&input.user_id)?;
        let role = self.canonical_role(&input.role_name)?;

        self.sql
            .exec(
                "INSERT INTO user_roles (user_id, role_name) VALUES (?1, ?2)",
                &[input.user_id.as_str().into(), role.as_str().into()],
            )
            .map_err(|e| match AccountError::from(e) {
                AccountError::Conflict(_) => {
                    AccountError::Conflict(format!("User already has role '{}'.", role))
                }
                other => other,
            })?;

        tracing::info!(user_id = %input.user_id, role = %role, "assigned role");
        Ok(format!("Role '{}' assigned to user {}.", role, input.user_id))
    }

    /// Replace all of a user's roles with a single role.
    pub fn change_user_role(&self, input: &AssignRole) -> Result<String, AccountError> {
        self.require_user(&input.user_id)?;
        let role = self.canonical_role(&input.role_name)?;

        self.sql.exec(
            "DELETE FROM user_roles WHERE user_id = ?1",
            &[input.user_id.as_str().into()],
        )?;
        self.sql.exec(
            "INSERT INTO user_roles (user_id, role_name) VALUES (?1, ?2)",
            &[input.user_id.as_str().into(), role.as_str().into()],
        )?;

        // Open tokens still carry the old roles.
        let revoked = self.revoke_all_sessions(&input.user_id)?;
        tracing::info!(user_id = %input.user_id, role = %role, revoked, "changed user role");
        Ok(format!("User {} now has role '{}'.", input.user_id, role))
    }
}
