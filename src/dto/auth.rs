use serde::{Deserialize, Serialize};

use crate::models::{Role, SessionUser};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
}

/// What the session slot holds between restarts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSnapshot {
    pub user: SessionUser,
    pub token: String,
}
