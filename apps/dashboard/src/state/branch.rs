//! # Branch Context
//!
//! The branches the user may work in and the one currently selected.
//! Branch-scoped commands call [`BranchState::require_active`] first.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use medidash_core::Branch;

use crate::error::{CommandError, CommandResult};

/// The persisted `store-context` snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchContext {
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub active_branch_id: Option<String>,
}

impl BranchContext {
    pub fn active(&self) -> Option<&Branch> {
        let id = self.active_branch_id.as_deref()?;
        self.branches.iter().find(|b| b.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BranchState {
    inner: Arc<Mutex<BranchContext>>,
}

impl BranchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_context(context: BranchContext) -> Self {
        BranchState {
            inner: Arc::new(Mutex::new(context)),
        }
    }

    pub fn snapshot(&self) -> BranchContext {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replaces the branch list. A selection that no longer exists is dropped.
    pub fn set_branches(&self, branches: Vec<Branch>) {
        let mut ctx = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        ctx.branches = branches;
        if ctx.active().is_none() {
            ctx.active_branch_id = None;
        }
    }

    pub fn select(&self, branch_id: &str) -> CommandResult<Branch> {
        let mut ctx = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let branch = ctx
            .branches
            .iter()
            .find(|b| b.id == branch_id)
            .cloned()
            .ok_or_else(|| CommandError::not_found("Branch", branch_id))?;
        ctx.active_branch_id = Some(branch.id.clone());
        info!(branch_id = %branch.id, name = %branch.name, "Branch selected");
        Ok(branch)
    }

    pub fn active(&self) -> Option<Branch> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active()
            .cloned()
    }

    pub fn require_active(&self) -> CommandResult<Branch> {
        self.active().ok_or_else(CommandError::no_active_branch)
    }

    pub fn clear(&self) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = BranchContext::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn branch(id: &str) -> Branch {
        Branch {
            id: id.to_string(),
            name: format!("Branch {id}"),
            address: None,
            is_main: id == "main",
        }
    }

    #[test]
    fn test_require_active_without_selection() {
        let state = BranchState::new();
        state.set_branches(vec![branch("main")]);
        assert_eq!(state.require_active().unwrap_err().code, ErrorCode::NoActiveBranch);

        state.select("main").unwrap();
        assert_eq!(state.require_active().unwrap().id, "main");
    }

    #[test]
    fn test_refresh_drops_vanished_selection() {
        let state = BranchState::new();
        state.set_branches(vec![branch("main"), branch("east")]);
        state.select("east").unwrap();

        state.set_branches(vec![branch("main")]);
        assert!(state.active().is_none());
        assert_eq!(state.select("east").unwrap_err().code, ErrorCode::NotFound);
    }
}
