use argon2::{
    PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    auth::{AuthUser, token},
    db::KeyValueStore,
    dto::auth::{LoginRequest, RegisterRequest, SessionSnapshot},
    error::{AppError, AppResult},
    models::{Role, SessionUser, User},
    response::ActionResponse,
    state::AppState,
    store::SESSION_SLOT,
    validation::{require_fields, validate_email, validate_name, validate_password},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    User,
    Admin,
}

/// The one session of this profile.
///
/// Built from the persisted snapshot at startup and changed only by
/// `login`, `logout` and `register`.
pub struct SessionManager<S> {
    state: AppState<S>,
    current: Option<SessionSnapshot>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Resumes the stored session if its token still verifies and its user exists.
    pub async fn restore(state: AppState<S>) -> AppResult<Self> {
        let snapshot: Option<SessionSnapshot> = state.store.load_slot(SESSION_SLOT).await?;
        let had_snapshot = snapshot.is_some();

        let current = match snapshot {
            None => None,
            Some(snapshot) => match token::verify(&snapshot.token, &state.auth) {
                Ok(user_id) if user_id == snapshot.user.id => {
                    match state.store.users().find_by_id(user_id).await {
                        Ok(user) => Some(SessionSnapshot {
                            user: SessionUser::from(&user),
                            token: snapshot.token,
                        }),
                        Err(AppError::NotFound(_)) => None,
                        Err(err) => return Err(err),
                    }
                }
                Ok(_) => None,
                Err(err) => {
                    tracing::warn!(error = %err, "stored session token rejected");
                    None
                }
            },
        };

        if had_snapshot && current.is_none() {
            state.store.clear_slot(SESSION_SLOT).await?;
            tracing::info!("discarded stale session");
        }
        if let Some(session) = &current {
            tracing::info!(
                user_id = %session.user.id,
                role = %session.user.role,
                "session restored"
            );
        }

        Ok(Self { state, current })
    }

    /// Creates the account and leaves the profile signed out.
    pub async fn register(&mut self, payload: RegisterRequest) -> AppResult<ActionResponse<User>> {
        let RegisterRequest {
            name,
            email,
            password,
            confirm_password,
        } = payload;
        require_fields(&[
            ("name", name.as_str()),
            ("email", email.as_str()),
            ("password", password.as_str()),
            ("confirm password", confirm_password.as_str()),
        ])?;
        validate_name(&name)?;
        validate_password(&password, &confirm_password)?;
        validate_email(email.trim())?;

        let users = self.state.store.users();
        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("This email is already registered".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .state
            .auth
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
            .to_string();

        let user = users.create(&name, &email, password_hash).await?;
        self.clear().await?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        let message = format!("Registration successful! Role: {}", user.role.label());
        Ok(ActionResponse::success(message, user))
    }

    pub async fn login(&mut self, payload: LoginRequest) -> AppResult<ActionResponse<SessionUser>> {
        let LoginRequest { email, password } = payload;
        require_fields(&[("email", email.as_str()), ("password", password.as_str())])?;

        let user = self
            .state
            .store
            .users()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
        if self
            .state
            .auth
            .hasher()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let session_user = SessionUser::from(&user);
        let snapshot = SessionSnapshot {
            token: token::issue(&session_user, &self.state.auth)?,
            user: session_user.clone(),
        };
        self.state.store.save_slot(SESSION_SLOT, &snapshot).await?;
        self.current = Some(snapshot);

        tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
        let message = format!("Welcome {} ({})", session_user.name, session_user.role);
        Ok(ActionResponse::success(message, session_user))
    }

    pub async fn logout(&mut self) -> AppResult<ActionResponse<()>> {
        if let Some(session) = &self.current {
            tracing::info!(user_id = %session.user.id, "user logged out");
        }
        self.clear().await?;
        Ok(ActionResponse::success("Signed out", ()))
    }

    async fn clear(&mut self) -> AppResult<()> {
        self.state.store.clear_slot(SESSION_SLOT).await?;
        self.current = None;
        Ok(())
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn current_role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn state(&self) -> SessionState {
        match self.current_role() {
            None => SessionState::Anonymous,
            Some(Role::User) => SessionState::User,
            Some(Role::Admin) => SessionState::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.current_role() == Some(Role::Admin)
    }

    pub fn auth_user(&self) -> Option<AuthUser> {
        self.current_user().map(AuthUser::from)
    }

    pub fn require_user(&self) -> AppResult<AuthUser> {
        self.auth_user()
            .ok_or_else(|| AppError::forbidden("Please log in first"))
    }
}
