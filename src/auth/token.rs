use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    config::AuthSettings,
    dto::auth::Claims,
    error::{AppError, AppResult},
    models::SessionUser,
};

pub fn issue(user: &SessionUser, settings: &AuthSettings) -> AppResult<String> {
    let expiration = Duration::try_hours(settings.session_ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        role: user.role,
        exp: usize::try_from(expiration.timestamp())
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.session_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Checks signature and expiry, returning the id of the signed-in user.
pub fn verify(token: &str, settings: &AuthSettings) -> AppResult<Uuid> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.session_secret.as_bytes()),
        &Validation::default(),
    )?;

    Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid user id in token")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn settings(ttl_hours: i64) -> AuthSettings {
        AuthSettings {
            session_secret: "unit-secret".into(),
            session_ttl_hours: ttl_hours,
            argon2_memory_kib: 64,
            argon2_iterations: 1,
        }
    }

    fn ada() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn issued_token_verifies_to_the_user_id() {
        let user = ada();
        let token = issue(&user, &settings(1)).unwrap();
        assert_eq!(verify(&token, &settings(1)).unwrap(), user.id);
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        for ttl in [3_000_000_000_000, i64::MAX, i64::MIN] {
            let err = issue(&ada(), &settings(ttl)).unwrap_err();
            assert!(matches!(err, AppError::Internal(_)), "ttl {ttl} gave {err:?}");
        }
    }
}
