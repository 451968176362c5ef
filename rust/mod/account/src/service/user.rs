use homecook_core::{Claims, ROLE_USER, new_id, now_rfc3339};
use homecook_sql::{Row, Value};

use crate::model::{RegisterUser, UpdateProfile, User, UserView};
use crate::service::password::{hash_password, validate_password};
use crate::service::verification::verify_key;
use crate::service::{AccountError, AccountService};

const USER_COLUMNS: &str =
    "id, email, full_name, password_hash, email_confirmed, profile_image, join_date";

fn user_from_row(row: &Row) -> Result<User, AccountError> {
    Ok(User {
        id: row.text("id")?,
        email: row.text("email")?,
        full_name: row.text("full_name")?,
        password_hash: row.text("password_hash")?,
        email_confirmed: row.flag("email_confirmed"),
        profile_image: row.opt_text("profile_image"),
        join_date: row.text("join_date")?,
    })
}

pub(crate) fn validate_email(email: &str) -> Result<(), AccountError> {
    let mut parts = email.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AccountError::Validation("Invalid email format.".into()))
    }
}

pub(crate) fn validate_full_name(name: &str) -> Result<(), AccountError> {
    let len = name.chars().count();
    if !(3..=100).contains(&len) {
        return Err(AccountError::Validation(
            "Full name must be between 3 and 100 characters.".into(),
        ));
    }
    Ok(())
}

impl AccountService {
    /// Register a new account with the default role and send the
    /// verification link. The account cannot log in until verified.
    pub fn register(&self, input: RegisterUser) -> Result<UserView, AccountError> {
        let email = input.email.trim().to_string();
        let full_name = input.full_name.trim().to_string();
        validate_email(&email)?;
        validate_password(&input.password)?;
        validate_full_name(&full_name)?;

        let hash = hash_password(&input.password)?;
        let user = self.create_user(&email, &full_name, &hash, false)?;
        let finished = self
            .grant_role(&user.id, ROLE_USER)
            .and_then(|_| self.start_verification(&user));
        if let Err(e) = finished {
            self.discard_user(&user.id);
            return Err(e);
        }
        tracing::info!(user_id = %user.id, "registered new user");
        self.to_view(user)
    }

    /// Undo a half-finished registration so the email can be used again.
    fn discard_user(&self, id: &str) {
        if let Err(e) = self.sql.exec("DELETE FROM users WHERE id = ?1", &[id.into()]) {
            tracing::error!(user_id = %id, error = %e, "failed to remove incomplete registration");
        }
        if let Err(e) = self.kv.delete(&verify_key(id)) {
            tracing::warn!(user_id = %id, error = %e, "failed to remove verification record");
        }
    }

    /// Insert a user row. `password_hash` must already be a PHC string.
    ///
    /// Used by registration and by bootstrap; grants no roles.
    pub fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
        email_confirmed: bool,
    ) -> Result<User, AccountError> {
        let user = User {
            id: new_id(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            password_hash: password_hash.to_string(),
            email_confirmed,
            profile_image: None,
            join_date: now_rfc3339(),
        };

        self.sql
            .exec(
                "INSERT INTO users (id, email, full_name, password_hash, email_confirmed, join_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    user.id.clone().into(),
                    user.email.clone().into(),
                    user.full_name.clone().into(),
                    user.password_hash.clone().into(),
                    user.email_confirmed.into(),
                    user.join_date.clone().into(),
                ],
            )
            .map_err(|e| match AccountError::from(e) {
                AccountError::Conflict(_) => {
                    AccountError::Conflict(format!("Email '{}' is already registered.", email))
                }
                other => other,
            })?;

        Ok(user)
    }

    /// Look up a user by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        self.sql
            .query_one(&sql, &[email.trim().into()])?
            .map(|row| user_from_row(&row))
            .transpose()
    }

    /// Get the stored user record.
    pub fn find_user(&self, id: &str) -> Result<User, AccountError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let row = self
            .sql
            .query_one(&sql, &[id.into()])?
            .ok_or_else(|| AccountError::NotFound(format!("User with ID {} not found.", id)))?;
        user_from_row(&row)
    }

    pub fn user_exists(&self, id: &str) -> Result<bool, AccountError> {
        Ok(self
            .sql
            .count("SELECT COUNT(*) AS n FROM users WHERE id = ?1", &[id.into()])?
            > 0)
    }

    /// Display name of a user, if the user exists.
    pub fn user_name(&self, id: &str) -> Result<Option<String>, AccountError> {
        Ok(self
            .sql
            .query_one("SELECT full_name FROM users WHERE id = ?1", &[id.into()])?
            .and_then(|r| r.opt_text("full_name")))
    }

    pub fn get_user(&self, id: &str) -> Result<UserView, AccountError> {
        let user = self.find_user(id)?;
        self.to_view(user)
    }

    pub fn list_users(&self) -> Result<Vec<UserView>, AccountError> {
        let sql = format!("SELECT {} FROM users ORDER BY join_date, id", USER_COLUMNS);
        let rows = self.sql.query(&sql, &[])?;
        rows.iter()
            .map(|row| user_from_row(row).and_then(|u| self.to_view(u)))
            .collect()
    }

    /// Update profile fields. Callers may edit themselves; admins anyone.
    pub fn update_profile(
        &self,
        id: &str,
        patch: UpdateProfile,
        caller: &Claims,
    ) -> Result<UserView, AccountError> {
        let mut user = self.find_user(id)?;
        if !caller.is_self_or_admin(id) {
            return Err(AccountError::Forbidden(
                "You can only update your own profile.".into(),
            ));
        }

        if let Some(name) = patch.full_name {
            let name = name.trim().to_string();
            validate_full_name(&name)?;
            user.full_name = name;
        }
        if let Some(image) = patch.profile_image {
            let image = image.trim().to_string();
            user.profile_image = if image.is_empty() { None } else { Some(image) };
        }

        self.sql.exec(
            "UPDATE users SET full_name = ?1, profile_image = ?2 WHERE id = ?3",
            &[
                user.full_name.clone().into(),
                user.profile_image.clone().into(),
                id.into(),
            ],
        )?;
        self.to_view(user)
    }

    /// Delete a user. Their recipes, comments, likes, ratings, saved
    /// recipes, sessions and role links go with them.
    pub fn delete_user(&self, id: &str, caller: &Claims) -> Result<(), AccountError> {
        if !self.user_exists(id)? {
            return Err(AccountError::NotFound(format!("User with ID {} not found.", id)));
        }
        if !caller.is_self_or_admin(id) {
            return Err(AccountError::Forbidden(
                "Only the account owner or an administrator can delete this user.".into(),
            ));
        }

        self.sql.exec("DELETE FROM users WHERE id = ?1", &[id.into()])?;
        self.kv.delete(&verify_key(id))?;
        tracing::info!(user_id = %id, deleted_by = %caller.sub, "deleted user");
        Ok(())
    }

    /// Flag a user for review by the super admin.
    pub fn report_user(&self, reporter: &Claims, user_id: &str) -> Result<String, AccountError> {
        if !self.user_exists(user_id)? {
            return Err(AccountError::NotFound("User not found.".into()));
        }
        tracing::warn!(reported = %user_id, reporter = %reporter.sub, "user reported");
        Ok(format!("User {} has been reported to the Super Admin.", user_id))
    }

    pub fn mark_email_confirmed(&self, id: &str) -> Result<(), AccountError> {
        let affected = self.sql.exec(
            "UPDATE users SET email_confirmed = 1 WHERE id = ?1",
            &[Value::Text(id.to_string())],
        )?;
        if affected == 0 {
            return Err(AccountError::NotFound(format!("User with ID {} not found.", id)));
        }
        Ok(())
    }

    pub(crate) fn to_view(&self, user: User) -> Result<UserView, AccountError> {
        let roles = self.user_roles(&user.id)?;
        let stats = self.user_stats(&user.id)?;
        Ok(UserView {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            join_date: user.join_date,
            roles,
            profile_image: user.profile_image,
            stats,
        })
    }
}
