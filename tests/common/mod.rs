#![allow(dead_code)]

use restaurant_directory::{
    auth::AuthUser,
    config::AuthSettings,
    db::{KeyValueStore, MemoryStore},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        restaurants::CreateRestaurantRequest,
    },
    models::{Restaurant, User},
    services::{auth_service::SessionManager, restaurant_service},
    state::AppState,
};

pub const PASSWORD: &str = "correct horse";

// Cheap argon2 parameters keep registration fast in debug builds.
pub fn test_settings() -> AuthSettings {
    AuthSettings {
        session_secret: "test-secret".into(),
        session_ttl_hours: 1,
        argon2_memory_kib: 64,
        argon2_iterations: 1,
    }
}

pub fn memory_state() -> AppState<MemoryStore> {
    AppState::new(MemoryStore::new(), test_settings())
}

pub fn register_request(name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        name: name.into(),
        email: email.into(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
    }
}

pub fn login_request(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: PASSWORD.into(),
    }
}

pub async fn register<S: KeyValueStore>(
    state: &AppState<S>,
    name: &str,
    email: &str,
) -> anyhow::Result<User> {
    let mut session = SessionManager::restore(state.clone()).await?;
    Ok(session.register(register_request(name, email)).await?.into_data())
}

/// Registers an administrator (first account) and one regular user.
pub async fn admin_and_user<S: KeyValueStore>(
    state: &AppState<S>,
) -> anyhow::Result<(AuthUser, AuthUser)> {
    let admin = register(state, "Ada Admin", "ada@example.com").await?;
    let user = register(state, "Uma User", "uma@example.com").await?;
    Ok((auth_user(&admin), auth_user(&user)))
}

pub fn auth_user(user: &User) -> AuthUser {
    AuthUser {
        user_id: user.id,
        name: user.name.clone(),
        role: user.role,
    }
}

pub fn restaurant_request(name: &str) -> CreateRestaurantRequest {
    CreateRestaurantRequest {
        name: name.into(),
        description: "Family kitchen".into(),
        category: "Mexican".into(),
        location: "Main St 1".into(),
        image: None,
    }
}

pub async fn create_restaurant<S: KeyValueStore>(
    state: &AppState<S>,
    admin: &AuthUser,
    name: &str,
) -> anyhow::Result<Restaurant> {
    Ok(
        restaurant_service::create_restaurant(state, admin, restaurant_request(name))
            .await?
            .into_data(),
    )
}
