use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Role, SessionUser},
};

pub mod token;

/// Identity of the signed-in user as seen by the services.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
}

impl From<&SessionUser> for AuthUser {
    fn from(user: &SessionUser) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

pub fn ensure_role(user: &AuthUser, role: Role, message: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::forbidden(message));
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser, action: &str) -> Result<(), AppError> {
    ensure_role(
        user,
        Role::Admin,
        &format!("You do not have permission to {action}"),
    )
}

/// Reviews are written by regular users only.
pub fn ensure_reviewer(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::User, "Administrators cannot write reviews")
}

pub fn ensure_author(user: &AuthUser, author_id: Uuid) -> Result<(), AppError> {
    if user.user_id != author_id {
        return Err(AppError::forbidden("Only the author can change this review"));
    }
    Ok(())
}
