//! # Point-of-Sale State
//!
//! Cart, local transaction history and the active register session for the
//! selected branch, persisted together as the `pos` snapshot.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PosState  Arc<Mutex<PosStore>>                                         │
//! │                                                                         │
//! │   cart ─────────────── add / update / remove / clear                    │
//! │   history ──────────── add_transaction / refund_transaction             │
//! │   active_session ───── NoSession ──► Open ──► Closed                    │
//! │   open_dialog_shown ── set once the operator has seen the open prompt   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is never held across an await: commands read what they need,
//! release, talk to the server, then lock again to apply the result.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use medidash_core::cart::Cart;
use medidash_core::history::TransactionHistory;
use medidash_core::register::{RegisterPhase, RegisterSession};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosStore {
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub history: TransactionHistory,
    #[serde(default)]
    pub active_session: Option<RegisterSession>,
    #[serde(default)]
    pub open_dialog_shown: bool,
}

impl PosStore {
    pub fn phase(&self) -> RegisterPhase {
        RegisterPhase::of(self.active_session.as_ref())
    }

    /// True when a branch is selected and it has no open session.
    pub fn must_open_register(&self, branch_selected: bool) -> bool {
        branch_selected
            && !self
                .active_session
                .as_ref()
                .map(RegisterSession::is_open)
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PosState {
    inner: Arc<Mutex<PosStore>>,
}

impl PosState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_store(store: PosStore) -> Self {
        PosState {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Read access to the whole store.
    pub fn with_pos<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PosStore) -> R,
    {
        let store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    /// Write access to the whole store.
    pub fn with_pos_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PosStore) -> R,
    {
        let mut store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        self.with_pos_mut(|store| f(&mut store.cart))
    }

    pub fn snapshot(&self) -> PosStore {
        self.with_pos(Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medidash_core::Money;

    #[test]
    fn test_must_open_register() {
        let mut store = PosStore::default();
        assert!(!store.must_open_register(false));
        assert!(store.must_open_register(true));

        store.active_session =
            Some(RegisterSession::open("reg-1", "main", Money::from_cents(10_000)).unwrap());
        assert!(!store.must_open_register(true));

        if let Some(session) = store.active_session.as_mut() {
            session.close(Money::from_cents(10_000)).unwrap();
        }
        assert!(store.must_open_register(true));
        assert_eq!(store.phase(), RegisterPhase::Closed);
    }
}
