//! # Point-of-Sale Cart
//!
//! The in-memory cart behind the POS screen.
//!
//! ## Line Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A line is identified by (id, batch_number), not by id alone.          │
//! │                                                                         │
//! │   Paracetamol 500mg  batch PCM-01   x3   ◄── one line                  │
//! │   Paracetamol 500mg  batch PCM-02   x1   ◄── a DIFFERENT line          │
//! │   Bandage roll       (no batch)     x2                                 │
//! │                                                                         │
//! │  add_to_cart ──────► same key? quantity += 1 : push(quantity = 1)      │
//! │  update_quantity ──► quantity = max(1, quantity + delta)               │
//! │  remove_from_cart ─► drop the line with the exact key                  │
//! │  clear ────────────► empty (after checkout)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation here always succeeds. Missing lines are no-ops.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// Item as handed to [`Cart::add_to_cart`] by the product picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub id: String,
    pub name: String,
    pub unit_price: Money,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub stock_reference: Option<String>,
}

impl CartItemInput {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        CartItemInput {
            id: id.into(),
            name: name.into(),
            unit_price,
            batch_number: None,
            expiry_date: None,
            stock_reference: None,
        }
    }

    pub fn with_batch(mut self, batch_number: impl Into<String>) -> Self {
        self.batch_number = Some(batch_number.into());
        self
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product id as known by the backend.
    pub id: String,
    pub name: String,
    /// Price frozen when the line was created.
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub stock_reference: Option<String>,
}

impl CartLine {
    fn from_input(item: CartItemInput) -> Self {
        CartLine {
            id: item.id,
            name: item.name,
            unit_price: item.unit_price,
            quantity: 1,
            batch_number: item.batch_number,
            expiry_date: item.expiry_date,
            stock_reference: item.stock_reference,
        }
    }

    /// True when this line has the given `(id, batch_number)` key.
    pub fn matches(&self, id: &str, batch_number: Option<&str>) -> bool {
        self.id == id && self.batch_number.as_deref() == batch_number
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - At most one line per `(id, batch_number)`
/// - Every line has `quantity >= 1`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<CartLine>,
    /// When the cart was created/last cleared
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of an item, merging into an existing line with the
    /// same `(id, batch_number)`.
    pub fn add_to_cart(&mut self, item: CartItemInput) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.matches(&item.id, item.batch_number.as_deref()))
        {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.lines.push(CartLine::from_input(item));
    }

    /// Applies a quantity delta to a line, never going below 1.
    ///
    /// Removing a line is a separate, explicit operation.
    pub fn update_quantity(&mut self, id: &str, delta: i64, batch_number: Option<&str>) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.matches(id, batch_number))
        {
            line.quantity = line.quantity.saturating_add(delta).max(1);
        }
    }

    /// Removes the line with the exact `(id, batch_number)` key.
    pub fn remove_from_cart(&mut self, id: &str, batch_number: Option<&str>) {
        self.lines.retain(|l| !l.matches(id, batch_number));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Drug names currently in the cart, in line order, for the
    /// interaction check.
    pub fn drug_names(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.name.clone()).collect()
    }

    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Computes totals for display and checkout.
    ///
    /// Tax applies to the discounted subtotal. A discount larger than the
    /// subtotal is capped so the total never goes negative.
    pub fn totals(&self, tax_rate: TaxRate, discount: Money) -> CartTotals {
        let subtotal = self.subtotal();
        let discount = discount.max(Money::zero()).min(subtotal);
        let taxable = subtotal - discount;
        let tax = taxable.calculate_tax(tax_rate);

        CartTotals {
            line_count: self.line_count(),
            total_quantity: self.total_quantity(),
            subtotal,
            discount,
            tax,
            total: taxable + tax,
        }
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: &str, batch: Option<&str>, price_cents: i64) -> CartItemInput {
        CartItemInput {
            id: id.to_string(),
            name: format!("Drug {id}"),
            unit_price: Money::from_cents(price_cents),
            batch_number: batch.map(str::to_string),
            expiry_date: None,
            stock_reference: None,
        }
    }

    #[test]
    fn test_add_merges_same_key_and_splits_batches() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("p1", Some("B1"), 250));
        cart.add_to_cart(item("p1", Some("B1"), 250));
        cart.add_to_cart(item("p1", Some("B2"), 250));
        cart.add_to_cart(item("p1", None, 250));

        assert_eq!(cart.line_count(), 3);
        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("p1", None, 100));
        cart.update_quantity("p1", 4, None);
        assert_eq!(cart.lines[0].quantity, 5);

        cart.update_quantity("p1", -10, None);
        assert_eq!(cart.lines[0].quantity, 1);

        // unknown line is ignored
        cart.update_quantity("nope", 3, None);
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_update_quantity_extreme_deltas_saturate() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("p1", None, 100));

        cart.update_quantity("p1", i64::MAX, None);
        assert_eq!(cart.lines[0].quantity, i64::MAX);

        cart.add_to_cart(item("p1", None, 100));
        assert_eq!(cart.lines[0].quantity, i64::MAX);
        assert_eq!(cart.subtotal(), Money::from_cents(i64::MAX));

        cart.update_quantity("p1", i64::MIN, None);
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_remove_only_matching_batch() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("p1", Some("B1"), 100));
        cart.add_to_cart(item("p1", Some("B2"), 100));

        cart.remove_from_cart("p1", Some("B1"));

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].batch_number.as_deref(), Some("B2"));
    }

    #[test]
    fn test_totals_with_tax_and_discount() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("p1", None, 1000));
        cart.update_quantity("p1", 1, None);

        let totals = cart.totals(TaxRate::from_bps(1000), Money::from_cents(500));
        assert_eq!(totals.subtotal.cents(), 2000);
        assert_eq!(totals.discount.cents(), 500);
        assert_eq!(totals.tax.cents(), 150);
        assert_eq!(totals.total.cents(), 1650);

        let capped = cart.totals(TaxRate::zero(), Money::from_cents(9999));
        assert_eq!(capped.discount.cents(), 2000);
        assert!(capped.total.is_zero());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("p1", None, 100));
        cart.clear();
        assert!(cart.is_empty());
    }

    proptest! {
        #[test]
        fn prop_repeated_adds_count_calls(n in 1usize..50, batch in proptest::option::of("[A-Z]{2}[0-9]{2}")) {
            let mut cart = Cart::new();
            for _ in 0..n {
                cart.add_to_cart(item("p1", batch.as_deref(), 100));
            }
            prop_assert_eq!(cart.line_count(), 1);
            prop_assert_eq!(cart.lines[0].quantity, n as i64);
        }

        #[test]
        fn prop_quantity_never_below_one(deltas in proptest::collection::vec(-20i64..20, 0..30)) {
            let mut cart = Cart::new();
            cart.add_to_cart(item("p1", None, 100));
            for d in deltas {
                cart.update_quantity("p1", d, None);
                prop_assert!(cart.lines[0].quantity >= 1);
            }
        }
    }
}
