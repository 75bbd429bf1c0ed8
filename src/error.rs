use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Storage error")]
    Storage(#[from] sqlx::Error),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    #[error("Session token error")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Infrastructure failures, as opposed to rejected user input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_)
                | AppError::Serialization(_)
                | AppError::Token(_)
                | AppError::Internal(_)
        )
    }

    /// Text shown to the user in an error notice.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::NotFound(_)
            | AppError::Forbidden(_)
            | AppError::InvalidCredentials => self.to_string(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
