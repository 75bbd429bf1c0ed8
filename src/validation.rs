use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub const MIN_NAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Fails with the names of every field that is empty or whitespace.
pub fn require_fields(fields: &[(&str, &str)]) -> AppResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Missing required field(s): {}",
            missing.join(", ")
        )))
    }
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(AppError::validation("Please enter a valid email"))
    }
}

pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().chars().count() < MIN_NAME_CHARS {
        return Err(AppError::validation(format!(
            "Name must be at least {MIN_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str, confirm: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    if password != confirm {
        return Err(AppError::validation("Passwords do not match"));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> AppResult<()> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(AppError::validation("price must be a non-negative number"))
    }
}

/// Parses a price typed into a form field.
pub fn parse_price(raw: &str) -> AppResult<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::validation("Missing required field(s): price"));
    }
    let price = raw
        .parse::<f64>()
        .map_err(|_| AppError::validation("price must be a number"))?;
    validate_price(price)?;
    Ok(price)
}

pub fn validate_rating(rating: u8) -> AppResult<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::validation("rating must be between 1 and 5"))
    }
}

/// Blank optional text is stored as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
