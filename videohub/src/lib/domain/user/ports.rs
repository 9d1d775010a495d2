use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user and issue a session token.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, and password
    ///
    /// # Returns
    /// Created user with its token
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered by an active user
    /// * `Hashing` - Password hashing failed
    /// * `Token` - Token issuance failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<AuthSession, UserError>;

    /// Verify credentials and issue a session token.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`,
    /// after the same amount of password-hashing work.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No active user with this email, or password mismatch
    /// * `Hashing` - Password verification failed
    /// * `Token` - Token issuance failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError>;

    /// Retrieve the profile of an active user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or has been deleted
    /// * `DatabaseError` - Database operation failed
    async fn get_profile(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user in a single transaction.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered by an active user
    /// * `DatabaseError` - Database operation failed (nothing was written)
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve an active user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found or deleted)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve an active user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found or deleted)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}
