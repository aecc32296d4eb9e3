//! Unifies API for accessing user accounts.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{ProfileUpdate, UserAccount},
    traits::{AccountApiError, AccountManagement},
};

pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the user account for the given id. If no account exists, `None` is returned.
    pub async fn account_by_id(&self, id: i64) -> Result<Option<UserAccount>, AccountApiError> {
        self.db.fetch_user_account(id).await
    }

    pub async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<UserAccount, AccountApiError> {
        if update.fullname.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AccountApiError::ValidationError("Full name cannot be empty".into()));
        }
        if update.is_empty() {
            return self.db.fetch_user_account(id).await?.ok_or(AccountApiError::UserNotFound(id));
        }
        let account = self.db.update_profile(id, update).await?;
        debug!("👤️ Profile for user #{id} updated");
        Ok(account)
    }
}
