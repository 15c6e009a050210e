//! # Session State
//!
//! Who is signed in and whether the first-run setup has been completed.
//! Tokens themselves live in the API crate's credential store; both are
//! persisted together as the `auth` snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use medidash_api::CredentialSnapshot;
use medidash_core::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    /// `None` until the backend has told us either way.
    #[serde(default)]
    pub setup_complete: Option<bool>,
}

/// The persisted `auth` snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub cookies: CredentialSnapshot,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<Session>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_session(session: Session) -> Self {
        SessionState {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn get(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.get().user
    }

    pub fn setup_complete(&self) -> Option<bool> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .setup_complete
    }

    pub fn sign_in(&self, user: User, setup_complete: Option<bool>) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        session.user = Some(user);
        session.setup_complete = setup_complete;
    }

    pub fn set_setup_complete(&self, complete: bool) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .setup_complete = Some(complete);
    }

    pub fn sign_out(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
    }
}
