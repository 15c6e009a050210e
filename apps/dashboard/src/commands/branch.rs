//! # Branch Commands

use tracing::info;

use medidash_core::Branch;

use crate::error::CommandResult;
use crate::Dashboard;

use super::report_failure;

/// Fetches the branch list and keeps the selection if it still exists.
pub async fn load_branches(dash: &Dashboard) -> CommandResult<Vec<Branch>> {
    let branches = dash
        .api
        .list_branches()
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not load branches", e))?;
    dash.branch.set_branches(branches.clone());
    dash.persist_branch().await?;
    Ok(branches)
}

/// Switches branch. A register session from another branch is dropped, and
/// the open-register prompt will show again.
pub async fn select_branch(dash: &Dashboard, branch_id: &str) -> CommandResult<Branch> {
    let branch = dash.branch.select(branch_id)?;

    let dropped = dash.pos.with_pos_mut(|pos| {
        let stale = pos
            .active_session
            .as_ref()
            .map(|s| s.store_id != branch.id)
            .unwrap_or(false);
        if stale {
            pos.active_session = None;
            pos.open_dialog_shown = false;
        }
        stale
    });
    if dropped {
        info!(branch_id = %branch.id, "Dropped register session of previous branch");
        dash.persist_pos().await?;
    }

    dash.persist_branch().await?;
    Ok(branch)
}

pub fn active_branch(dash: &Dashboard) -> Option<Branch> {
    dash.branch.active()
}
