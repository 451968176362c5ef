use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use homecook_core::{Claims, ROLE_USER, new_id};

use crate::model::{LoginRequest, Session, TokenResponse, User};
use crate::service::password::verify_password;
use crate::service::{AccountError, AccountService};

/// Single message for every login failure; it must not reveal which
/// emails are registered.
const BAD_CREDENTIALS: &str = "Invalid email or password.";

impl AccountService {
    /// Authenticate with email and password and issue an access token.
    ///
    /// Accounts whose email has not been verified cannot log in.
    pub fn login(&self, input: LoginRequest) -> Result<TokenResponse, AccountError> {
        let user = self
            .find_by_email(&input.email)?
            .ok_or_else(|| AccountError::Unauthorized(BAD_CREDENTIALS.into()))?;

        if !verify_password(&input.password, &user.password_hash) {
            tracing::info!(user_id = %user.id, "login failed: wrong password");
            return Err(AccountError::Unauthorized(BAD_CREDENTIALS.into()));
        }
        if !user.email_confirmed {
            tracing::info!(user_id = %user.id, "login refused: email not confirmed");
            return Err(AccountError::Unauthorized(BAD_CREDENTIALS.into()));
        }

        self.issue_token(&user)
    }

    /// Issue a signed access token for a user and record its session.
    pub fn issue_token(&self, user: &User) -> Result<TokenResponse, AccountError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.access_token_ttl);

        let mut roles = self.user_roles(&user.id)?;
        if roles.is_empty() {
            roles.push(ROLE_USER.to_string());
        }

        let session = Session {
            id: new_id(),
            user_id: user.id.clone(),
            revoked: false,
            issued_at: now.to_rfc3339(),
            expires_at: exp.to_rfc3339(),
        };

        let claims = Claims {
            sub: user.id.clone(),
            name: user.full_name.clone(),
            email: user.email.clone(),
            roles,
            sid: session.id.clone(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AccountError::Internal(format!("JWT encode failed: {}", e)))?;

        self.sql.exec(
            "INSERT INTO sessions (id, user_id, revoked, issued_at, expires_at)
             VALUES (?1, ?2, 0, ?3, ?4)",
            &[
                session.id.clone().into(),
                session.user_id.clone().into(),
                session.issued_at.clone().into(),
                session.expires_at.clone().into(),
            ],
        )?;

        tracing::debug!(user_id = %user.id, sid = %session.id, "issued access token");
        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
        })
    }

    /// Verify and decode an access token.
    /// Returns the claims if the signature, issuer and expiry are valid and
    /// the session has not been revoked.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AccountError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AccountError::Unauthorized(format!("invalid token: {}", e)))?
        .claims;

        let session = self
            .sql
            .query_one("SELECT revoked FROM sessions WHERE id = ?1", &[claims.sid.as_str().into()])?
            .ok_or_else(|| AccountError::Unauthorized("unknown session".into()))?;
        if session.flag("revoked") {
            return Err(AccountError::Unauthorized("session has been revoked".into()));
        }

        Ok(claims)
    }

    /// Revoke the session behind the caller's token.
    pub fn logout(&self, claims: &Claims) -> Result<(), AccountError> {
        self.sql.exec(
            "UPDATE sessions SET revoked = 1 WHERE id = ?1 AND user_id = ?2",
            &[claims.sid.as_str().into(), claims.sub.as_str().into()],
        )?;
        tracing::info!(user_id = %claims.sub, sid = %claims.sid, "logged out");
        Ok(())
    }

    /// Revoke every open session of a user. Returns how many were revoked.
    pub fn revoke_all_sessions(&self, user_id: &str) -> Result<u64, AccountError> {
        Ok(self.sql.exec(
            "UPDATE sessions SET revoked = 1 WHERE user_id = ?1 AND revoked = 0",
            &[user_id.into()],
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::harness;

    fn confirmed_user(h: &crate::service::testing::Harness) -> User {
        let hash = crate::service::password::hash_password("secret1").unwrap();
        let user = h
            .svc
            .create_user("cook@example.com", "Casey Cook", &hash, true)
            .unwrap();
        h.svc.grant_role(&user.id, ROLE_USER).unwrap();
        user
    }

    fn login(h: &crate::service::testing::Harness, password: &str) -> Result<TokenResponse, AccountError> {
        h.svc.login(LoginRequest {
            email: "COOK@example.com".into(),
            password: password.into(),
        })
    }

    #[test]
    fn login_round_trip() {
        let h = harness();
        let user = confirmed_user(&h);
        let tokens = login(&h, "secret1").unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 86400);

        let claims = h.svc.verify_token(&tokens.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "Casey Cook");
        assert_eq!(claims.roles, vec![ROLE_USER.to_string()]);
        assert_eq!(claims.iss, "homecook");
    }

    #[test]
    fn bad_credentials_share_one_message() {
        let h = harness();
        confirmed_user(&h);
        let wrong = login(&h, "nope!!").unwrap_err();
        let unknown = h
            .svc
            .login(LoginRequest {
                email: "ghost@example.com".into(),
                password: "secret1".into(),
            })
            .unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, AccountError::Unauthorized(_)));
    }

    #[test]
    fn unconfirmed_email_cannot_login() {
        let h = harness();
        let hash = crate::service::password::hash_password("secret1").unwrap();
        h.svc
            .create_user("cook@example.com", "Casey Cook", &hash, false)
            .unwrap();
        assert!(matches!(login(&h, "secret1"), Err(AccountError::Unauthorized(_))));
    }

    #[test]
    fn logout_revokes_token() {
        let h = harness();
        confirmed_user(&h);
        let tokens = login(&h, "secret1").unwrap();
        let claims = h.svc.verify_token(&tokens.access_token).unwrap();

        h.svc.logout(&claims).unwrap();
        let err = h.svc.verify_token(&tokens.access_token).unwrap_err();
        assert!(matches!(err, AccountError::Unauthorized(ref m) if m.contains("revoked")));
    }

    #[test]
    fn revoke_all_sessions_counts() {
        let h = harness();
        let user = confirmed_user(&h);
        let a = login(&h, "secret1").unwrap();
        login(&h, "secret1").unwrap();
        assert_eq!(h.svc.revoke_all_sessions(&user.id).unwrap(), 2);
        assert!(h.svc.verify_token(&a.access_token).is_err());
    }

    #[test]
    fn foreign_or_tampered_tokens_rejected() {
        let h = harness();
        let user = confirmed_user(&h);
        let tokens = h.svc.issue_token(&user).unwrap();

        let mut tampered = tokens.access_token.clone();
        tampered.push('x');
        assert!(h.svc.verify_token(&tampered).is_err());
        assert!(h.svc.verify_token("not.a.jwt").is_err());
    }
}
