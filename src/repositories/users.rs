use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::KeyValueStore,
    error::{AppError, AppResult},
    models::{Role, User},
    store::Collection,
    validation::require_fields,
};

use super::Users;

impl<S: KeyValueStore> Users<'_, S> {
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim();
        Ok(self.find_all().await?.into_iter().find(|u| u.email == email))
    }

    /// The first user ever stored becomes the administrator.
    pub async fn create(&self, name: &str, email: &str, password_hash: String) -> AppResult<User> {
        require_fields(&[("name", name), ("email", email), ("password", password_hash.as_str())])?;
        let email = email.trim();

        let mut users = self.find_all().await?;
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict("This email is already registered".into()));
        }

        let role = if users.is_empty() { Role::Admin } else { Role::User };
        let user = User {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        self.store().save(Collection::Users, &users).await?;
        Ok(user)
    }
}
