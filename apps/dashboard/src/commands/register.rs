//! # Register Commands
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Register Session Lifecycle                            │
//! │                                                                         │
//! │  NoSession ──open_register(float)──► Open ──close_register(count)──► Closed
//! │                                       │                                 │
//! │                                 record_sale (checkout)                  │
//! │                                 record_expense                          │
//! │                                                                         │
//! │  open:  branch + float >= 0 checked locally, then POST register/open    │
//! │  close: count >= 0 checked locally, expected/variance computed here,    │
//! │         POST register/{id}/close, then the session flips to Closed      │
//! │  either failing: toast, local state untouched                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use medidash_api::endpoints::register::{CloseRegisterRequest, OpenRegisterRequest};
use medidash_api::{spawn_session_poller, PollerHandle};
use medidash_core::register::{validate_open_request, CloseSummary, RegisterPhase, RegisterSession};
use medidash_core::{CoreError, Money};
use medidash_db::SnapshotKey;

use crate::error::CommandResult;
use crate::state::PosState;
use crate::Dashboard;

use super::report_failure;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStatusView {
    pub phase: RegisterPhase,
    pub session: Option<RegisterSession>,
    pub expected_balance: Option<Money>,
    /// Show the open-register prompt.
    pub must_open_register: bool,
    pub open_dialog_shown: bool,
}

pub fn register_status(dash: &Dashboard) -> RegisterStatusView {
    let branch_selected = dash.branch.active().is_some();
    dash.pos.with_pos(|pos| RegisterStatusView {
        phase: pos.phase(),
        session: pos.active_session.clone(),
        expected_balance: pos.active_session.as_ref().map(RegisterSession::expected_balance),
        must_open_register: pos.must_open_register(branch_selected),
        open_dialog_shown: pos.open_dialog_shown,
    })
}

pub async fn open_register(
    dash: &Dashboard,
    opening_balance: Money,
) -> CommandResult<RegisterSession> {
    let branch = dash.branch.require_active()?;
    validate_open_request(&branch.id, opening_balance)?;

    let already_open = dash.pos.with_pos(|pos| {
        pos.active_session
            .as_ref()
            .map(|s| s.is_open() && s.store_id == branch.id)
            .unwrap_or(false)
    });
    if already_open {
        return Err(CoreError::RegisterAlreadyOpen {
            store_id: branch.id,
        }
        .into());
    }

    let request = OpenRegisterRequest {
        store_id: branch.id.clone(),
        opening_balance,
    };
    let session = dash
        .api
        .open_register(&request)
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not open register", e))?;

    dash.pos.with_pos_mut(|pos| {
        pos.active_session = Some(session.clone());
        pos.open_dialog_shown = true;
    });
    dash.persist_pos().await?;
    dash.notifier().success("Register opened");
    info!(session_id = %session.id, opening = %opening_balance, "Register opened");
    Ok(session)
}

/// Closes the active session with the counted drawer amount.
///
/// Underage and overage are both accepted; the variance is informational.
pub async fn close_register(
    dash: &Dashboard,
    actual_balance: Money,
) -> CommandResult<CloseSummary> {
    let (session_id, summary) = dash.pos.with_pos_mut(|pos| {
        let session = pos.active_session.as_mut().ok_or(CoreError::NoOpenRegister)?;
        let summary = session.begin_close(actual_balance)?;
        Ok::<_, CoreError>((session.id.clone(), summary))
    })?;

    let sent = dash
        .api
        .close_register(&session_id, &CloseRegisterRequest::from(summary))
        .await;

    let summary = match sent {
        Ok(()) => dash.pos.with_pos_mut(|pos| {
            pos.active_session
                .as_mut()
                .filter(|s| s.id == session_id)
                .map(|s| s.finish_close(summary))
                .ok_or(CoreError::NoOpenRegister)
        })?,
        Err(e) => {
            dash.pos.with_pos_mut(|pos| {
                if let Some(session) = pos.active_session.as_mut().filter(|s| s.id == session_id) {
                    session.abort_close();
                }
            });
            return Err(report_failure(dash.notifier(), "Could not close register", e));
        }
    };
    dash.persist_pos().await?;

    dash.notifier().success("Register closed");
    info!(
        session_id = %session_id,
        expected = %summary.expected_balance,
        actual = %summary.actual_balance,
        variance = %summary.variance,
        "Register closed"
    );
    Ok(summary)
}

/// Records a cash expense against the open session.
pub async fn record_expense(dash: &Dashboard, amount: Money) -> CommandResult<RegisterSession> {
    let session = dash.pos.with_pos_mut(|pos| {
        let session = pos.active_session.as_mut().ok_or(CoreError::NoOpenRegister)?;
        session.record_expense(amount)?;
        Ok::<_, CoreError>(session.clone())
    })?;
    dash.persist_pos().await?;
    Ok(session)
}

pub async fn mark_open_dialog_shown(dash: &Dashboard) -> CommandResult<()> {
    dash.pos.with_pos_mut(|pos| pos.open_dialog_shown = true);
    dash.persist_pos().await
}

/// Replaces the local session with what the server reports for the branch.
/// The newest answer wins, except that a stale `Open` copy never undoes a
/// local close, finished or in flight.
pub fn apply_active_session(pos: &PosState, store_id: &str, session: Option<RegisterSession>) {
    pos.with_pos_mut(|store| {
        let Some(local) = store.active_session.as_ref() else {
            debug!(store_id, open = session.is_some(), "Active session refreshed");
            store.active_session = session;
            return;
        };
        if local.store_id != store_id {
            return;
        }
        let accept = match &session {
            Some(incoming) => local.is_superseded_by(incoming),
            None => !local.closing,
        };
        if accept {
            debug!(store_id, open = session.is_some(), "Active session refreshed");
            store.active_session = session;
        } else {
            debug!(store_id, session_id = %local.id, "Ignored stale session refresh");
        }
    });
}

pub async fn refresh_active_session(dash: &Dashboard) -> CommandResult<Option<RegisterSession>> {
    let branch = dash.branch.require_active()?;
    let session = dash
        .api
        .active_register(&branch.id)
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not refresh register", e))?;
    apply_active_session(&dash.pos, &branch.id, session.clone());
    dash.persist_pos().await?;
    Ok(session)
}

/// Background refresh of the active session. Dropping it stops polling.
pub struct SessionRefresh {
    poller: PollerHandle<Option<RegisterSession>>,
    forwarder: JoinHandle<()>,
}

impl SessionRefresh {
    pub fn latest(&self) -> Option<Option<RegisterSession>> {
        self.poller.latest()
    }
}

impl Drop for SessionRefresh {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

/// Starts polling the active session at the configured interval.
pub fn start_session_refresh(dash: &Dashboard) -> CommandResult<SessionRefresh> {
    let branch = dash.branch.require_active()?;
    let every: Duration = dash.config.poll_interval();
    let poller = spawn_session_poller(dash.api.clone(), branch.id.clone(), every);

    let mut rx = poller.subscribe();
    let pos = dash.pos.clone();
    let db = dash.db.clone();
    let store_id = branch.id;
    let forwarder = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let latest = rx.borrow_and_update().clone();
            if let Some(session) = latest {
                apply_active_session(&pos, &store_id, session);
                if let Err(e) = db.save(SnapshotKey::Pos, &pos.snapshot()).await {
                    warn!(error = %e, "Could not persist refreshed session");
                }
            }
        }
    });

    info!(interval_secs = every.as_secs(), "Active session refresh started");
    Ok(SessionRefresh { poller, forwarder })
}
