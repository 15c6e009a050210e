//! # Account Commands
//!
//! Cash withdrawals from a branch account. The amount is checked against
//! the balance the operator is looking at before anything is sent.

use serde::Deserialize;
use tracing::info;

use medidash_api::endpoints::accounts::WithdrawalRequest;
use medidash_core::validation::validate_withdrawal;
use medidash_core::{Account, Money};

use crate::error::CommandResult;
use crate::Dashboard;

use super::report_failure;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalInput {
    pub amount: Money,
    #[serde(default)]
    pub reason: Option<String>,
}

pub async fn list_accounts(dash: &Dashboard) -> CommandResult<Vec<Account>> {
    let branch = dash.branch.require_active()?;
    dash.api
        .list_accounts(&branch.id)
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not load accounts", e))
}

/// Withdraws from `account`. Returns the account with its new balance.
pub async fn withdraw(
    dash: &Dashboard,
    account: &Account,
    input: WithdrawalInput,
) -> CommandResult<Account> {
    validate_withdrawal(input.amount, account.current_balance)?;

    let request = WithdrawalRequest {
        amount: input.amount,
        reason: input
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
    };
    let updated = dash
        .api
        .withdraw(&account.id, &request)
        .await
        .map_err(|e| report_failure(dash.notifier(), "Withdrawal failed", e))?;

    dash.notifier()
        .success(format!("Withdrew {} from {}", input.amount, account.name));
    info!(account_id = %account.id, balance = %updated.current_balance, "Withdrawal done");
    Ok(updated)
}
