use anyhow::{anyhow, Result};
use eats_engine::{
    db_types::{ProfileUpdate, UserAccount},
    SignupRequest,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{client::EatsClient, storage::StateDir};

const SESSION_STATE: &str = "session";

/// ```text
/// Unauthenticated --(login/signup)--> Authenticated
///        ^                                 |
///        |                            (check_auth)
///        +------(rejected)------ Checking <-+
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Checking,
    Authenticated { user: UserAccount },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SavedSession {
    token: Option<String>,
    #[serde(default)]
    state: SessionState,
}

pub struct SessionStore {
    dir: StateDir,
    token: Option<String>,
    state: SessionState,
}

impl SessionStore {
    /// Restores the last session. A session that was interrupted mid-check is treated as logged out until it is
    /// checked again.
    pub fn load(dir: StateDir) -> Result<Self> {
        let saved: SavedSession = dir.load(SESSION_STATE)?;
        let state = match (saved.state, &saved.token) {
            (SessionState::Authenticated { user }, Some(_)) => SessionState::Authenticated { user },
            _ => SessionState::Unauthenticated,
        };
        Ok(Self { dir, token: saved.token, state })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserAccount> {
        match &self.state {
            SessionState::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.admin)
    }

    pub async fn signup(&mut self, client: &mut EatsClient, request: &SignupRequest) -> Result<&UserAccount> {
        let res = client.signup(request).await?;
        info!("{}", res.message);
        self.authenticated(client, res.user, res.token)
    }

    pub async fn login(&mut self, client: &mut EatsClient, email: &str, password: &str) -> Result<&UserAccount> {
        let res = client.login(email, password).await?;
        info!("{}", res.message);
        self.authenticated(client, res.user, res.token)
    }

    /// Asks the server whether the saved token is still good. Returns whether the session is authenticated.
    pub async fn check_authentication(&mut self, client: &mut EatsClient) -> Result<bool> {
        if self.token.is_none() {
            self.set_state(SessionState::Unauthenticated)?;
            return Ok(false);
        }
        self.set_state(SessionState::Checking)?;
        client.set_access_token(self.token.clone());
        match client.check_auth().await {
            Ok(Some(user)) => {
                self.set_state(SessionState::Authenticated { user })?;
                Ok(true)
            },
            Ok(None) => {
                debug!("The server rejected the saved access token");
                self.signed_out(client)?;
                Ok(false)
            },
            Err(e) => {
                // Keep the token, the server may just be unreachable
                self.set_state(SessionState::Unauthenticated)?;
                Err(e)
            },
        }
    }

    pub async fn logout(&mut self, client: &mut EatsClient) -> Result<()> {
        if let Err(e) = client.logout().await {
            warn!("Logging out on the server failed. The local session is cleared anyway. {e}");
        }
        self.signed_out(client)
    }

    pub async fn update_profile(&mut self, client: &EatsClient, update: &ProfileUpdate) -> Result<&UserAccount> {
        if !self.is_authenticated() {
            return Err(anyhow!("You need to log in first"));
        }
        let user = client.update_profile(update).await?;
        self.set_state(SessionState::Authenticated { user })?;
        self.user().ok_or_else(|| anyhow!("Session was lost while updating the profile"))
    }

    fn authenticated(&mut self, client: &mut EatsClient, user: UserAccount, token: String) -> Result<&UserAccount> {
        client.set_access_token(Some(token.clone()));
        self.token = Some(token);
        self.set_state(SessionState::Authenticated { user })?;
        self.user().ok_or_else(|| anyhow!("Session was lost while logging in"))
    }

    fn signed_out(&mut self, client: &mut EatsClient) -> Result<()> {
        client.set_access_token(None);
        self.token = None;
        self.set_state(SessionState::Unauthenticated)
    }

    fn set_state(&mut self, state: SessionState) -> Result<()> {
        self.state = state;
        self.save()
    }

    fn save(&self) -> Result<()> {
        self.dir.save(SESSION_STATE, &SavedSession { token: self.token.clone(), state: self.state.clone() })
    }
}
