use std::env;

use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_url: String,
    pub auth: AuthSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage_url =
            env::var("STORAGE_URL").unwrap_or_else(|_| "sqlite://restaurants.db".to_string());
        let session_secret = env::var("SESSION_SECRET")?;
        let session_ttl_hours = session_ttl_hours(env::var("SESSION_TTL_HOURS").ok())?;
        let argon2_memory_kib = env::var("ARGON2_MEMORY_KIB")
            .ok()
            .and_then(|m| m.parse::<u32>().ok())
            .unwrap_or(Params::DEFAULT_M_COST);
        let argon2_iterations = env::var("ARGON2_ITERATIONS")
            .ok()
            .and_then(|t| t.parse::<u32>().ok())
            .unwrap_or(Params::DEFAULT_T_COST);
        Ok(Self {
            storage_url,
            auth: AuthSettings {
                session_secret,
                session_ttl_hours,
                argon2_memory_kib,
                argon2_iterations,
            },
        })
    }
}

/// Longest accepted session lifetime, one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

fn session_ttl_hours(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(24);
    };
    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) => Ok(hours),
        _ => anyhow::bail!("SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}"),
    }
}

/// Password hashing cost and session token signing parameters.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

impl AuthSettings {
    pub fn hasher(&self) -> AppResult<Argon2<'static>> {
        let params = Params::new(self.argon2_memory_kib, self.argon2_iterations, 1, None)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ttl_defaults_and_bounds() {
        assert_eq!(session_ttl_hours(None).unwrap(), 24);
        assert_eq!(session_ttl_hours(Some(" 48 ".into())).unwrap(), 48);
        for bad in ["0", "-3", "3000000000000", "soon"] {
            assert!(session_ttl_hours(Some(bad.into())).is_err(), "{bad} accepted");
        }
    }
}
