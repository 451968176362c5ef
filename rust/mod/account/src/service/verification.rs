use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use homecook_core::new_id;

use crate::mailer::Mail;
use crate::model::User;
use crate::service::{AccountError, AccountService};

/// KV key holding the pending verification for a user.
pub(crate) fn verify_key(user_id: &str) -> String {
    format!("account/verify/{}", user_id)
}

#[derive(Debug, Serialize, Deserialize)]
struct PendingVerification {
    token: String,
    /// Unix timestamp.
    expires_at: i64,
}

const INVALID_TOKEN: &str = "Invalid or expired verification token.";

impl AccountService {
    /// Store a fresh verification token for `user` and mail the link.
    ///
    /// A mail delivery failure is logged; the token stays valid so the
    /// link can be delivered again by an operator.
    pub(crate) fn start_verification(&self, user: &User) -> Result<(), AccountError> {
        let pending = PendingVerification {
            token: format!("{}{}", new_id(), new_id()),
            expires_at: chrono::Utc::now().timestamp() + self.config.verification_ttl,
        };
        let data = serde_json::to_vec(&pending)
            .map_err(|e| AccountError::Internal(e.to_string()))?;
        self.kv.set(&verify_key(&user.id), &data)?;

        let link = format!(
            "{}/api/account/verify-email?userId={}&token={}",
            self.config.base_url.trim_end_matches('/'),
            user.id,
            pending.token,
        );
        let mail = Mail {
            to: user.email.clone(),
            subject: "Confirm your HomeCook account".to_string(),
            body: format!(
                "Hi {},\n\nPlease confirm your email address by opening this link:\n{}\n",
                user.full_name, link
            ),
        };
        if let Err(e) = self.mailer.send(&mail) {
            tracing::error!(user_id = %user.id, error = %e, "failed to send verification mail");
        }
        Ok(())
    }

    /// Confirm a user's email with the token from the verification link.
    pub fn verify_email(&self, user_id: &str, token: &str) -> Result<(), AccountError> {
        if !self.user_exists(user_id)? {
            return Err(AccountError::NotFound("User not found.".into()));
        }

        let key = verify_key(user_id);
        let data = self
            .kv
            .get(&key)?
            .ok_or_else(|| AccountError::Validation(INVALID_TOKEN.into()))?;
        let pending: PendingVerification = serde_json::from_slice(&data)
            .map_err(|e| AccountError::Internal(format!("corrupt verification record: {}", e)))?;

        if pending.expires_at < chrono::Utc::now().timestamp() {
            self.kv.delete(&key)?;
            return Err(AccountError::Validation(INVALID_TOKEN.into()));
        }
        if !bool::from(pending.token.as_bytes().ct_eq(token.as_bytes())) {
            return Err(AccountError::Validation(INVALID_TOKEN.into()));
        }
        // Single use: whoever takes the record confirms the email.
        if self.kv.take(&key)?.is_none() {
            return Err(AccountError::Validation(INVALID_TOKEN.into()));
        }

        self.mark_email_confirmed(user_id)?;
        tracing::info!(user_id = %user_id, "email verified");
        Ok(())
    }
}

/// Pull the `token` query parameter out of a verification link.
#[cfg(test)]
pub(crate) fn token_from_link(body: &str) -> Option<String> {
    let start = body.find("token=")? + "token=".len();
    Some(
        body[start..]
            .chars()
            .take_while(|c| c.is_ascii_hexdigit())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RegisterUser;
    use crate::service::testing::harness;

    fn register(h: &crate::service::testing::Harness) -> String {
        h.svc
            .register(RegisterUser {
                email: "alice@example.com".into(),
                password: "secret1".into(),
                full_name: "Alice Cook".into(),
            })
            .unwrap()
            .id
    }

    #[test]
    fn registration_mails_a_working_link() {
        let h = harness();
        let id = register(&h);

        let mail = h.mailer.last_to("alice@example.com").unwrap();
        assert!(mail.body.contains(&format!("/api/account/verify-email?userId={}&token=", id)));
        let token = token_from_link(&mail.body).unwrap();
        assert_eq!(token.len(), 64);

        h.svc.verify_email(&id, &token).unwrap();
        assert!(h.svc.find_user(&id).unwrap().email_confirmed);

        // Tokens are single use.
        assert!(matches!(
            h.svc.verify_email(&id, &token),
            Err(AccountError::Validation(_))
        ));
    }

    #[test]
    fn wrong_token_rejected() {
        let h = harness();
        let id = register(&h);
        assert!(matches!(
            h.svc.verify_email(&id, "deadbeef"),
            Err(AccountError::Validation(_))
        ));

        let token = token_from_link(&h.mailer.last_to("alice@example.com").unwrap().body).unwrap();
        let mut near_miss = token.clone().into_bytes();
        near_miss[63] = if near_miss[63] == b'0' { b'1' } else { b'0' };
        let near_miss = String::from_utf8(near_miss).unwrap();
        assert!(matches!(
            h.svc.verify_email(&id, &near_miss),
            Err(AccountError::Validation(_))
        ));
        assert!(!h.svc.find_user(&id).unwrap().email_confirmed);

        // Failed attempts do not spend the real token.
        h.svc.verify_email(&id, &token).unwrap();
        assert!(h.svc.find_user(&id).unwrap().email_confirmed);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let h = harness();
        assert!(matches!(
            h.svc.verify_email("nobody", "x"),
            Err(AccountError::NotFound(_))
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let h = harness();
        let id = register(&h);
        let stale = PendingVerification {
            token: "abc".into(),
            expires_at: chrono::Utc::now().timestamp() - 1,
        };
        h.svc
            .kv
            .set(&verify_key(&id), &serde_json::to_vec(&stale).unwrap())
            .unwrap();
        assert!(matches!(
            h.svc.verify_email(&id, "abc"),
            Err(AccountError::Validation(_))
        ));
        assert!(h.svc.kv.get(&verify_key(&id)).unwrap().is_none());
    }
}
