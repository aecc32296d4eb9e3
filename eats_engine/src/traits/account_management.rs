use thiserror::Error;

use crate::db_types::{NewUserAccount, ProfileUpdate, UserAccount, UserCredentials};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User account {0} does not exist")]
    UserNotFound(i64),
    #[error("An account already exists for {0}")]
    EmailAlreadyRegistered(String),
    #[error("{0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}

/// User accounts. Email addresses are unique (and compared case-insensitively).
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    async fn create_user_account(&self, user: NewUserAccount) -> Result<UserAccount, AccountApiError>;

    async fn fetch_user_account(&self, id: i64) -> Result<Option<UserAccount>, AccountApiError>;

    async fn fetch_credentials_for_email(&self, email: &str) -> Result<Option<UserCredentials>, AccountApiError>;

    /// Stamps the account's last login time and returns the updated account.
    async fn record_login(&self, id: i64) -> Result<UserAccount, AccountApiError>;

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<UserAccount, AccountApiError>;
}
