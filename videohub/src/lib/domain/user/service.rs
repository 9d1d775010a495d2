use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::lifecycle::Lifecycle;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn issue_session(&self, user: User) -> Result<AuthSession, UserError> {
        let token = self
            .authenticator
            .issue_token(user.id, user.email.as_str())
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<AuthSession, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            created_at: now,
            modified_at: now,
            lifecycle: Lifecycle::Active,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        self.issue_session(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            // Same hashing work as a wrong password.
            if let Err(e) = self.authenticator.verify_dummy_password(&command.password) {
                tracing::error!(error = %e, "Dummy password verification failed");
            }
            tracing::info!(email = %command.email, "Login rejected");
            return Err(UserError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &user.password_hash,
                user.id,
                user.email.as_str(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
                AuthenticationError::Password(err) => UserError::Hashing(err.to_string()),
                AuthenticationError::Token(err) => UserError::Token(err.to_string()),
            });

        match result {
            Ok(token) => {
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(AuthSession { user, token })
            }
            Err(UserError::InvalidCredentials) => {
                tracing::info!(email = %command.email, "Login rejected");
                Err(UserError::InvalidCredentials)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_profile(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
