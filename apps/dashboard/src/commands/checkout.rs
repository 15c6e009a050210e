//! # Checkout Command
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Flow                                   │
//! │                                                                         │
//! │  cart empty? ───────────────────────────────► EmptyCart                 │
//! │  branch selected? register open? ───────────► NoActiveBranch / ...      │
//! │       │                                                                 │
//! │  check_interactions(cart drugs)                                         │
//! │       ├─ found, not acknowledged ──► NeedsConfirmation (nothing changes)│
//! │       ▼                                                                 │
//! │  LOCAL COMMIT (one critical section)                                    │
//! │    history.add_transaction(tx)                                          │
//! │    session.record_sale(tx.total)                                        │
//! │    cart.clear()                                                         │
//! │  persist `pos`                                                          │
//! │       │                                                                 │
//! │  POST sales ──┬─ ok ──► Completed { transaction, receipt }              │
//! │               └─ err ─► toast + error. The local sale stays recorded.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server submission happens after the local commit and is not rolled
//! back on failure, so local history and the server can disagree until the
//! sale is re-entered on the server side.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use medidash_api::endpoints::sales::{SaleReceipt, SaleRequest};
use medidash_core::history::Transaction;
use medidash_core::interactions::{check_interactions, Interaction};
use medidash_core::{CoreError, Money, PaymentMethod};

use crate::error::CommandResult;
use crate::Dashboard;

use super::report_failure;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub discount: Money,
    /// Set once the operator confirmed the interaction warnings.
    #[serde(default)]
    pub interactions_acknowledged: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CheckoutOutcome {
    /// Show these to the operator and call again with the acknowledgement.
    NeedsConfirmation { interactions: Vec<Interaction> },
    Completed {
        transaction: Transaction,
        receipt: SaleReceipt,
    },
}

pub async fn checkout(dash: &Dashboard, request: CheckoutRequest) -> CommandResult<CheckoutOutcome> {
    let branch = dash.branch.require_active()?;
    let tax_rate = dash.tax_rate();

    let committed = dash.pos.with_pos_mut(|pos| {
        if pos.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let session = pos.active_session.as_mut().ok_or(CoreError::NoOpenRegister)?;
        session.ensure_open()?;

        let interactions = check_interactions(&pos.cart.drug_names());
        if !interactions.is_empty() && !request.interactions_acknowledged {
            return Ok(Err(interactions));
        }

        let tx = Transaction::from_cart(
            &pos.cart,
            tax_rate,
            request.discount,
            request.payment_method,
        );
        session.record_sale(tx.total)?;
        let register_id = session.id.clone();
        pos.history.add_transaction(tx.clone());
        pos.cart.clear();
        Ok(Ok((tx, register_id)))
    })?;

    let (tx, register_id) = match committed {
        Ok(done) => done,
        Err(interactions) => {
            info!(count = interactions.len(), "Checkout needs interaction confirmation");
            return Ok(CheckoutOutcome::NeedsConfirmation { interactions });
        }
    };

    info!(transaction_id = %tx.id, total = %tx.total, "Sale recorded locally");
    dash.persist_pos().await?;

    let sale = SaleRequest::from_transaction(&tx, &branch.id, Some(&register_id));
    match dash.api.submit_sale(&sale).await {
        Ok(receipt) => {
            dash.notifier().success(format!("Sale {} completed", tx.id));
            Ok(CheckoutOutcome::Completed {
                transaction: tx,
                receipt,
            })
        }
        Err(e) => {
            warn!(transaction_id = %tx.id, "Sale kept locally but not accepted by server");
            Err(report_failure(dash.notifier(), "Sale could not be submitted", e))
        }
    }
}

/// Marks a local transaction refunded. Unknown ids and repeat refunds are
/// no-ops.
pub async fn refund_transaction(
    dash: &Dashboard,
    transaction_id: &str,
) -> CommandResult<Option<Transaction>> {
    let refunded = dash
        .pos
        .with_pos_mut(|pos| pos.history.refund_transaction(transaction_id).cloned());
    dash.persist_pos().await?;
    Ok(refunded)
}

/// Newest transactions first.
pub fn recent_transactions(dash: &Dashboard, limit: usize) -> Vec<Transaction> {
    dash.pos
        .with_pos(|pos| pos.history.recent(limit).into_iter().cloned().collect())
}
