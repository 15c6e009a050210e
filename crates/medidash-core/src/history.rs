//! # Local Transaction History
//!
//! Append-only list of completed POS transactions kept on the client.
//!
//! ```text
//!   add_transaction ──► [tx1, tx2, tx3]        (never deleted)
//!
//!   refund_transaction(tx2):
//!        Completed ──────► Refunded            (one way only)
//! ```
//!
//! The server holds the authoritative ledger. This history only feeds the
//! "recent sales" panel and the refund button.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::money::Money;
use crate::types::{PaymentMethod, TaxRate};

/// Transaction status. Only `Completed → Refunded` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TransactionStatus {
    #[default]
    Completed,
    Refunded,
}

/// A finished sale as recorded locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<CartLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
    pub status: TransactionStatus,
    pub payment_method: PaymentMethod,
}

impl Transaction {
    /// Snapshots the cart into a completed transaction.
    pub fn from_cart(
        cart: &Cart,
        tax_rate: TaxRate,
        discount: Money,
        payment_method: PaymentMethod,
    ) -> Self {
        let totals = cart.totals(tax_rate, discount);
        Transaction {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            items: cart.lines.clone(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
            status: TransactionStatus::Completed,
            payment_method,
        }
    }
}

/// Append-only transaction history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHistory {
    pub transactions: Vec<Transaction>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Flips a transaction to `Refunded`.
    ///
    /// Unknown ids are ignored; refunding twice leaves it `Refunded`.
    /// Returns the transaction when it exists.
    pub fn refund_transaction(&mut self, id: &str) -> Option<&Transaction> {
        let tx = self.transactions.iter_mut().find(|t| t.id == id)?;
        tx.status = TransactionStatus::Refunded;
        Some(tx)
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Most recent first.
    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        self.transactions.iter().rev().take(limit).collect()
    }

    /// Sum of totals that have not been refunded.
    pub fn completed_total(&self) -> Money {
        self.transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Completed)
            .map(|t| t.total)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItemInput;

    fn cart_with(price_cents: i64) -> Cart {
        let mut cart = Cart::new();
        cart.add_to_cart(CartItemInput {
            id: "p1".into(),
            name: "Ibuprofen 200mg".into(),
            unit_price: Money::from_cents(price_cents),
            batch_number: Some("IB-7".into()),
            expiry_date: None,
            stock_reference: None,
        });
        cart
    }

    #[test]
    fn test_from_cart_snapshots_lines_and_totals() {
        let cart = cart_with(4550);
        let tx = Transaction::from_cart(&cart, TaxRate::zero(), Money::zero(), PaymentMethod::Cash);
        assert_eq!(tx.items.len(), 1);
        assert_eq!(tx.total.cents(), 4550);
        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[test]
    fn test_refund_is_one_way_and_idempotent() {
        let mut history = TransactionHistory::new();
        let tx = Transaction::from_cart(&cart_with(1000), TaxRate::zero(), Money::zero(), PaymentMethod::Card);
        let id = tx.id.clone();
        history.add_transaction(tx);
        history.add_transaction(Transaction::from_cart(
            &cart_with(500),
            TaxRate::zero(),
            Money::zero(),
            PaymentMethod::Cash,
        ));

        assert_eq!(history.completed_total().cents(), 1500);

        let refunded = history.refund_transaction(&id).unwrap();
        assert_eq!(refunded.status, TransactionStatus::Refunded);
        assert_eq!(
            history.refund_transaction(&id).unwrap().status,
            TransactionStatus::Refunded
        );
        assert!(history.refund_transaction("missing").is_none());

        // nothing is ever removed
        assert_eq!(history.len(), 2);
        assert_eq!(history.completed_total().cents(), 500);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let mut history = TransactionHistory::new();
        for cents in [100, 200, 300] {
            history.add_transaction(Transaction::from_cart(
                &cart_with(cents),
                TaxRate::zero(),
                Money::zero(),
                PaymentMethod::Cash,
            ));
        }
        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].total.cents(), 300);
    }
}
