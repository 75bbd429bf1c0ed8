mod common;

use restaurant_directory::{
    config::AuthSettings,
    db::{KeyValueStore, MemoryStore},
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    models::Role,
    services::auth_service::{SessionManager, SessionState},
    state::AppState,
    store::SESSION_SLOT,
};

use common::{PASSWORD, login_request, memory_state, register_request, test_settings};

#[tokio::test]
async fn first_registration_is_admin_and_later_ones_are_users() -> anyhow::Result<()> {
    let state = memory_state();
    let mut session = SessionManager::restore(state.clone()).await?;

    let first = session
        .register(register_request("Ada Admin", "ada@example.com"))
        .await?;
    assert_eq!(first.data.role, Role::Admin);
    assert!(first.message.contains("Administrator"));

    let second = session
        .register(register_request("Uma User", "uma@example.com"))
        .await?;
    assert_eq!(second.data.role, Role::User);

    let third = session
        .register(register_request("Otto Other", "otto@example.com"))
        .await?;
    assert_eq!(third.data.role, Role::User);

    assert_eq!(state.store.users().find_all().await?.len(), 3);
    // Registration never signs anyone in.
    assert_eq!(session.state(), SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict_whatever_the_other_fields() -> anyhow::Result<()> {
    let state = memory_state();
    let mut session = SessionManager::restore(state.clone()).await?;
    session
        .register(register_request("Ada Admin", "ada@example.com"))
        .await?;

    let err = session
        .register(RegisterRequest {
            name: "Somebody Else".into(),
            email: "ada@example.com".into(),
            password: "another password".into(),
            confirm_password: "another password".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(state.store.users().find_all().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn registration_rejects_malformed_input() -> anyhow::Result<()> {
    let state = memory_state();
    let mut session = SessionManager::restore(state.clone()).await?;

    let cases = [
        (
            RegisterRequest {
                name: "".into(),
                email: "".into(),
                password: PASSWORD.into(),
                confirm_password: PASSWORD.into(),
            },
            "name, email",
        ),
        (
            RegisterRequest {
                name: "Al".into(),
                ..register_request("", "al@example.com")
            },
            "at least 3",
        ),
        (
            RegisterRequest {
                password: "short".into(),
                confirm_password: "short".into(),
                ..register_request("Alice", "alice@example.com")
            },
            "at least 8",
        ),
        (
            RegisterRequest {
                confirm_password: "something different".into(),
                ..register_request("Alice", "alice@example.com")
            },
            "do not match",
        ),
        (register_request("Alice", "alice@example"), "valid email"),
        (register_request("Alice", "alice @example.com"), "valid email"),
    ];

    for (request, expected) in cases {
        match session.register(request).await {
            Err(AppError::Validation(message)) => {
                assert!(message.contains(expected), "{message:?} should mention {expected:?}")
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
    assert!(state.store.users().find_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn login_checks_email_and_password() -> anyhow::Result<()> {
    let state = memory_state();
    let mut session = SessionManager::restore(state.clone()).await?;
    session
        .register(register_request("Ada Admin", "ada@example.com"))
        .await?;

    let err = session
        .login(login_request("nobody@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = session
        .login(LoginRequest {
            email: "ada@example.com".into(),
            password: "wrong password".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
    assert_eq!(session.state(), SessionState::Anonymous);

    let err = session
        .login(LoginRequest {
            email: "ada@example.com".into(),
            password: "".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn login_persists_a_session_that_survives_a_restart() -> anyhow::Result<()> {
    let state = memory_state();
    let mut session = SessionManager::restore(state.clone()).await?;
    session
        .register(register_request("Ada Admin", "ada@example.com"))
        .await?;
    session
        .register(register_request("Uma User", "uma@example.com"))
        .await?;

    let user = session.login(login_request("uma@example.com")).await?.into_data();
    assert_eq!(user.role, Role::User);
    assert_eq!(session.state(), SessionState::User);
    assert!(session.token().is_some());

    let reloaded = SessionManager::restore(state.clone()).await?;
    assert_eq!(reloaded.current_user(), Some(&user));
    assert_eq!(reloaded.current_role(), Some(Role::User));

    session.logout().await?;
    assert_eq!(session.state(), SessionState::Anonymous);
    let reloaded = SessionManager::restore(state.clone()).await?;
    assert_eq!(reloaded.state(), SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn registering_signs_out_the_current_session() -> anyhow::Result<()> {
    let state = memory_state();
    let mut session = SessionManager::restore(state.clone()).await?;
    session
        .register(register_request("Ada Admin", "ada@example.com"))
        .await?;
    session.login(login_request("ada@example.com")).await?;
    assert_eq!(session.state(), SessionState::Admin);

    session
        .register(register_request("Uma User", "uma@example.com"))
        .await?;
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(state.store.load_slot::<serde_json::Value>(SESSION_SLOT).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn expired_or_foreign_tokens_are_discarded_on_restore() -> anyhow::Result<()> {
    let state = memory_state();
    let mut session = SessionManager::restore(state.clone()).await?;
    session
        .register(register_request("Ada Admin", "ada@example.com"))
        .await?;

    // A token signed with another secret.
    let foreign = AppState {
        store: state.store.clone(),
        auth: AuthSettings {
            session_secret: "another-secret".into(),
            ..test_settings()
        },
    };
    let mut other = SessionManager::restore(foreign).await?;
    other.login(login_request("ada@example.com")).await?;

    let restored = SessionManager::restore(state.clone()).await?;
    assert_eq!(restored.state(), SessionState::Anonymous);
    assert!(state.store.load_slot::<serde_json::Value>(SESSION_SLOT).await?.is_none());

    // A token that expired an hour ago.
    let expired = AppState {
        store: state.store.clone(),
        auth: AuthSettings {
            session_ttl_hours: -1,
            ..test_settings()
        },
    };
    let mut stale = SessionManager::restore(expired).await?;
    stale.login(login_request("ada@example.com")).await?;

    let restored = SessionManager::restore(state.clone()).await?;
    assert_eq!(restored.state(), SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn unrepresentable_session_lifetime_fails_login_without_signing_in() -> anyhow::Result<()> {
    let state = AppState::new(
        MemoryStore::new(),
        AuthSettings {
            session_ttl_hours: 3_000_000_000_000,
            ..test_settings()
        },
    );
    let mut session = SessionManager::restore(state.clone()).await?;
    session
        .register(register_request("Ada Admin", "ada@example.com"))
        .await?;

    let err = session
        .login(login_request("ada@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(state.store.load_slot::<serde_json::Value>(SESSION_SLOT).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn corrupt_session_slot_restores_as_anonymous() -> anyhow::Result<()> {
    let state = memory_state();
    state
        .store
        .backend()
        .set_item(SESSION_SLOT, "{not json".into())
        .await?;

    let session = SessionManager::restore(state.clone()).await?;
    assert_eq!(session.state(), SessionState::Anonymous);
    Ok(())
}
