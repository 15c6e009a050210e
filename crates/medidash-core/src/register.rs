//! # Cash Register Session
//!
//! Local mirror of a branch's cash-register session.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────┐  open(opening ≥ 0)  ┌────────┐  close(actual ≥ 0)      │
//! │   │ NoSession │ ──────────────────► │  Open  │ ──────────────────┐     │
//! │   └───────────┘                     └────────┘                   ▼     │
//! │                                      │    ▲                 ┌────────┐ │
//! │                     record_sale ─────┘    │                 │ Closed │ │
//! │                     record_expense ───────┘                 └────────┘ │
//! │                                                          (irreversible)│
//! │                                                                         │
//! │   expected = opening + sales − expenses                                 │
//! │   variance = actual − expected        (display only, never enforced)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server posts the actual ledger entries. Nothing here blocks an
//! underage close.
//!
//! While a close is on the wire the session is frozen: sales and expenses
//! fail with `RegisterClosing` until the answer arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_non_negative, validate_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RegisterStatus {
    #[default]
    Open,
    Closed,
}

/// Where the register workflow currently is for the active branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RegisterPhase {
    NoSession,
    Open,
    Closed,
}

impl RegisterPhase {
    pub fn of(session: Option<&RegisterSession>) -> Self {
        match session.map(|s| s.status) {
            None => RegisterPhase::NoSession,
            Some(RegisterStatus::Open) => RegisterPhase::Open,
            Some(RegisterStatus::Closed) => RegisterPhase::Closed,
        }
    }
}

/// A register session for one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSession {
    pub id: String,
    pub store_id: String,
    pub opening_balance: Money,
    pub sales_amount: Money,
    pub sales_count: u32,
    pub expenses_amount: Money,
    pub expenses_count: u32,
    pub status: RegisterStatus,
    #[serde(default)]
    pub actual_balance: Option<Money>,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
    /// Set between [`RegisterSession::begin_close`] and the server's answer.
    #[serde(skip)]
    #[ts(skip)]
    pub closing: bool,
}

/// Figures shown to the operator when a session closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CloseSummary {
    pub expected_balance: Money,
    pub actual_balance: Money,
    /// `actual - expected`. Negative means the drawer is short.
    pub variance: Money,
}

impl RegisterSession {
    /// Creates a freshly opened session.
    ///
    /// ## Errors
    /// `Validation` when the opening balance is negative or the branch id is empty.
    pub fn open(
        id: impl Into<String>,
        store_id: impl Into<String>,
        opening_balance: Money,
    ) -> CoreResult<Self> {
        let store_id = store_id.into();
        validate_open_request(&store_id, opening_balance)?;

        Ok(RegisterSession {
            id: id.into(),
            store_id,
            opening_balance,
            sales_amount: Money::zero(),
            sales_count: 0,
            expenses_amount: Money::zero(),
            expenses_count: 0,
            status: RegisterStatus::Open,
            actual_balance: None,
            opened_at: Utc::now(),
            closed_at: None,
            closing: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }

    /// Fails with `RegisterClosed` once the session is closed and with
    /// `RegisterClosing` while a close is in flight.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if !self.is_open() {
            return Err(CoreError::RegisterClosed {
                session_id: self.id.clone(),
            });
        }
        if self.closing {
            return Err(CoreError::RegisterClosing {
                session_id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Whether `incoming`, a server copy of this session, would undo a local
    /// close. A closed or closing session never goes back to plain `Open`.
    pub fn is_superseded_by(&self, incoming: &RegisterSession) -> bool {
        if self.id != incoming.id {
            return true;
        }
        let locally_settling = !self.is_open() || self.closing;
        !(locally_settling && incoming.is_open())
    }

    /// `opening + sales − expenses`.
    pub fn expected_balance(&self) -> Money {
        self.opening_balance + self.sales_amount - self.expenses_amount
    }

    /// `actual − expected`, once an actual balance was submitted.
    pub fn variance(&self) -> Option<Money> {
        self.actual_balance.map(|actual| actual - self.expected_balance())
    }

    pub fn record_sale(&mut self, amount: Money) -> CoreResult<()> {
        self.ensure_open()?;
        validate_non_negative("sale amount", amount)?;
        self.sales_amount += amount;
        self.sales_count += 1;
        Ok(())
    }

    pub fn record_expense(&mut self, amount: Money) -> CoreResult<()> {
        self.ensure_open()?;
        validate_positive("expense amount", amount)?;
        self.expenses_amount += amount;
        self.expenses_count += 1;
        Ok(())
    }

    /// Validates a close request and computes the figures, without mutating.
    ///
    /// Used before the close is submitted to the server, so a failed
    /// submission leaves the session untouched.
    pub fn prepare_close(&self, actual_balance: Money) -> CoreResult<CloseSummary> {
        self.ensure_open()?;
        validate_non_negative("actual balance", actual_balance)?;

        let expected_balance = self.expected_balance();
        Ok(CloseSummary {
            expected_balance,
            actual_balance,
            variance: actual_balance - expected_balance,
        })
    }

    /// Computes the close figures and freezes the session until
    /// [`finish_close`](Self::finish_close) or
    /// [`abort_close`](Self::abort_close). The figures cannot drift while
    /// the close is on the wire.
    pub fn begin_close(&mut self, actual_balance: Money) -> CoreResult<CloseSummary> {
        let summary = self.prepare_close(actual_balance)?;
        self.closing = true;
        Ok(summary)
    }

    /// Applies the figures that were sent. There is no way back to `Open`.
    pub fn finish_close(&mut self, summary: CloseSummary) -> CloseSummary {
        self.closing = false;
        self.status = RegisterStatus::Closed;
        self.actual_balance = Some(summary.actual_balance);
        self.closed_at = Some(Utc::now());
        summary
    }

    /// Unfreezes the session after a failed close.
    pub fn abort_close(&mut self) {
        self.closing = false;
    }

    /// Closes the session in one step.
    pub fn close(&mut self, actual_balance: Money) -> CoreResult<CloseSummary> {
        let summary = self.begin_close(actual_balance)?;
        Ok(self.finish_close(summary))
    }
}

/// Pre-check for an open request: a branch and a non-negative float.
pub fn validate_open_request(store_id: &str, opening_balance: Money) -> CoreResult<()> {
    if store_id.trim().is_empty() {
        return Err(crate::error::ValidationError::Required {
            field: "branch".to_string(),
        }
        .into());
    }
    validate_non_negative("opening balance", opening_balance)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_negative_float_and_missing_branch() {
        assert!(RegisterSession::open("s1", "b1", Money::from_cents(-1)).is_err());
        assert!(RegisterSession::open("s1", "  ", Money::zero()).is_err());
        assert!(RegisterSession::open("s1", "b1", Money::zero()).is_ok());
    }

    #[test]
    fn test_open_sale_close_scenario() {
        let mut session = RegisterSession::open("s1", "b1", Money::from_cents(10_000)).unwrap();
        assert_eq!(RegisterPhase::of(Some(&session)), RegisterPhase::Open);

        session.record_sale(Money::from_cents(4_550)).unwrap();
        assert_eq!(session.expected_balance().cents(), 14_550);

        let summary = session.close(Money::from_cents(14_000)).unwrap();
        assert_eq!(summary.expected_balance.to_string(), "145.50");
        assert_eq!(summary.variance.to_string(), "-5.50");
        assert_eq!(session.status, RegisterStatus::Closed);
        assert_eq!(session.variance(), Some(Money::from_cents(-550)));

        // closed is final
        assert!(matches!(
            session.record_sale(Money::from_cents(100)),
            Err(CoreError::RegisterClosed { .. })
        ));
        assert!(session.record_expense(Money::from_cents(100)).is_err());
        assert!(session.close(Money::from_cents(14_550)).is_err());
        assert_eq!(session.actual_balance, Some(Money::from_cents(14_000)));
    }

    #[test]
    fn test_underage_close_is_allowed_negative_is_not() {
        let mut session = RegisterSession::open("s1", "b1", Money::from_cents(5_000)).unwrap();
        assert!(session.prepare_close(Money::from_cents(-1)).is_err());
        assert!(session.is_open());

        let summary = session.close(Money::zero()).unwrap();
        assert_eq!(summary.variance.cents(), -5_000);
    }

    #[test]
    fn test_expenses_reduce_expected_balance() {
        let mut session = RegisterSession::open("s1", "b1", Money::from_cents(10_000)).unwrap();
        session.record_expense(Money::from_cents(1_250)).unwrap();
        session.record_sale(Money::from_cents(2_000)).unwrap();
        assert_eq!(session.expenses_count, 1);
        assert_eq!(session.sales_count, 1);
        assert_eq!(session.expected_balance().cents(), 10_750);
        assert!(session.record_expense(Money::zero()).is_err());
    }

    #[test]
    fn test_in_flight_close_freezes_figures() {
        let mut session = RegisterSession::open("s1", "b1", Money::from_cents(10_000)).unwrap();
        session.record_sale(Money::from_cents(4_550)).unwrap();

        let sent = session.begin_close(Money::from_cents(14_000)).unwrap();
        assert!(matches!(
            session.record_sale(Money::from_cents(100)),
            Err(CoreError::RegisterClosing { .. })
        ));
        assert!(session.record_expense(Money::from_cents(100)).is_err());
        assert!(session.begin_close(Money::from_cents(14_000)).is_err());

        let done = session.finish_close(sent);
        assert_eq!(done.expected_balance, session.expected_balance());
        assert_eq!(session.status, RegisterStatus::Closed);
        assert!(!session.closing);
    }

    #[test]
    fn test_aborted_close_reopens_for_sales() {
        let mut session = RegisterSession::open("s1", "b1", Money::zero()).unwrap();
        session.begin_close(Money::zero()).unwrap();
        session.abort_close();
        assert!(session.record_sale(Money::from_cents(100)).is_ok());
    }

    #[test]
    fn test_server_copy_cannot_reopen_closed_session() {
        let mut local = RegisterSession::open("s1", "b1", Money::from_cents(10_000)).unwrap();
        let stale = local.clone();
        local.close(Money::from_cents(10_000)).unwrap();

        assert!(!local.is_superseded_by(&stale));

        let mut closed_copy = stale.clone();
        closed_copy.close(Money::from_cents(10_000)).unwrap();
        assert!(local.is_superseded_by(&closed_copy));

        let next = RegisterSession::open("s2", "b1", Money::zero()).unwrap();
        assert!(local.is_superseded_by(&next));

        let mut closing = stale.clone();
        closing.begin_close(Money::from_cents(10_000)).unwrap();
        assert!(!closing.is_superseded_by(&stale));
    }

    #[test]
    fn test_phase_without_session() {
        assert_eq!(RegisterPhase::of(None), RegisterPhase::NoSession);
    }
}
