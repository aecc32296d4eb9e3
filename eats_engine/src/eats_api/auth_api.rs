use std::fmt::Debug;

use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_types::{NewUserAccount, UserAccount},
    traits::{AccountApiError, AccountManagement},
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("An account already exists for {0}")]
    EmailAlreadyRegistered(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Could not hash password. {0}")]
    PasswordHashError(String),
    #[error("{0}")]
    AccountError(#[from] AccountApiError),
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub contact: String,
}

impl Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"****")
            .field("contact", &self.contact)
            .finish()
    }
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), AuthApiError> {
        if self.fullname.trim().is_empty() {
            return Err(AuthApiError::ValidationError("Full name is required".into()));
        }
        if !is_plausible_email(&self.email) {
            return Err(AuthApiError::ValidationError(format!("{} is not a valid email address", self.email)));
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthApiError::ValidationError(format!(
                "Passwords must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((user, domain)) => !user.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// Password-based signup and login. Passwords are stored as bcrypt hashes.
///
/// Accounts whose email is in the admin list are given the admin flag when they sign up.
pub struct AuthApi<B> {
    db: B,
    hash_cost: u32,
    admin_emails: Vec<String>,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db, hash_cost: bcrypt::DEFAULT_COST, admin_emails: Vec::new() }
    }

    /// Lower costs are only appropriate for tests.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn with_admin_emails(mut self, emails: Vec<String>) -> Self {
        self.admin_emails = emails.into_iter().map(|e| e.trim().to_lowercase()).collect();
        self
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<UserAccount, AuthApiError> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();
        if self.db.fetch_credentials_for_email(&email).await?.is_some() {
            return Err(AuthApiError::EmailAlreadyRegistered(email));
        }
        let password_hash = hash_password(request.password, self.hash_cost).await?;
        let admin = self.admin_emails.contains(&email);
        let fullname = request.fullname.trim().to_string();
        let user = NewUserAccount { fullname, email, password_hash, contact: request.contact, admin };
        let account = self.db.create_user_account(user).await.map_err(|e| match e {
            AccountApiError::EmailAlreadyRegistered(email) => AuthApiError::EmailAlreadyRegistered(email),
            e => e.into(),
        })?;
        info!("👤️ New account #{} created for {}{}", account.id, account.email, if admin { " (admin)" } else { "" });
        Ok(account)
    }

    /// Checks the password and records the login. Unknown emails and wrong passwords are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserAccount, AuthApiError> {
        let email = email.trim().to_lowercase();
        let Some(credentials) = self.db.fetch_credentials_for_email(&email).await? else {
            debug!("👤️ Login attempt for unknown account {email}");
            return Err(AuthApiError::InvalidCredentials);
        };
        if !verify_password(password.to_string(), credentials.password_hash).await? {
            debug!("👤️ Wrong password for {email}");
            return Err(AuthApiError::InvalidCredentials);
        }
        let account = self.db.record_login(credentials.id).await?;
        debug!("👤️ User #{} logged in", account.id);
        Ok(account)
    }
}

// bcrypt blocks for a noticeable time, so it runs on the blocking pool
async fn hash_password(password: String, cost: u32) -> Result<String, AuthApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))?
        .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))
}

async fn verify_password(password: String, hash: String) -> Result<bool, AuthApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))?
        .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    fn request(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            fullname: "Sana Mir".into(),
            email: email.into(),
            password: password.into(),
            contact: String::new(),
        }
    }

    #[test]
    fn signup_validation() {
        assert!(request("sana@example.com", "secret1").validate().is_ok());
        assert!(request("sana@example", "secret1").validate().is_err());
        assert!(request("@example.com", "secret1").validate().is_err());
        assert!(request("sana@example.com", "short").validate().is_err());
    }

    #[test]
    fn passwords_are_not_printed() {
        let s = format!("{:?}", request("sana@example.com", "hunter22"));
        assert!(!s.contains("hunter22"));
    }

    #[tokio::test]
    async fn hash_and_verify() {
        let hash = hash_password("open sesame".into(), 4).await.unwrap();
        assert!(verify_password("open sesame".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("open says me".into(), hash).await.unwrap());
    }
}
