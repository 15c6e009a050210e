//! # Cart Commands
//!
//! ```text
//! ┌──────────┐  add_to_cart     ┌──────────┐  checkout (checkout.rs)  ┌──────────┐
//! │  Empty   │────────────────►│ In Cart  │─────────────────────────►│  Sold    │
//! └──────────┘                  └──────────┘                          └──────────┘
//!      ▲                         update_quantity                            │
//!      │                         remove_from_cart                           │
//!      └──────── clear_cart ◄───────────────────────────────────────────────┘
//! ```
//!
//! Every mutation persists the `pos` snapshot. The response carries the
//! current interaction warnings so the cart view can show them early.

use serde::{Deserialize, Serialize};
use tracing::debug;

use medidash_core::cart::{Cart, CartItemInput, CartLine, CartTotals};
use medidash_core::interactions::{check_interactions, Interaction};
use medidash_core::{Money, TaxRate};

use crate::error::CommandResult;
use crate::Dashboard;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub interactions: Vec<Interaction>,
}

impl CartResponse {
    pub fn build(cart: &Cart, tax_rate: TaxRate, discount: Money) -> Self {
        CartResponse {
            lines: cart.lines.clone(),
            totals: cart.totals(tax_rate, discount),
            interactions: check_interactions(&cart.drug_names()),
        }
    }
}

/// Identifies one cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub id: String,
    #[serde(default)]
    pub batch_number: Option<String>,
}

pub fn get_cart(dash: &Dashboard) -> CartResponse {
    let tax_rate = dash.tax_rate();
    dash.pos
        .with_pos(|pos| CartResponse::build(&pos.cart, tax_rate, Money::zero()))
}

pub async fn add_to_cart(dash: &Dashboard, item: CartItemInput) -> CommandResult<CartResponse> {
    debug!(id = %item.id, batch = ?item.batch_number, "add_to_cart command");
    dash.pos.with_cart_mut(|cart| cart.add_to_cart(item));
    dash.persist_pos().await?;
    Ok(get_cart(dash))
}

/// Applies `delta` to a line. Quantity never drops below 1.
pub async fn update_quantity(
    dash: &Dashboard,
    line: LineKey,
    delta: i64,
) -> CommandResult<CartResponse> {
    debug!(id = %line.id, delta, "update_quantity command");
    dash.pos
        .with_cart_mut(|cart| cart.update_quantity(&line.id, delta, line.batch_number.as_deref()));
    dash.persist_pos().await?;
    Ok(get_cart(dash))
}

pub async fn remove_from_cart(dash: &Dashboard, line: LineKey) -> CommandResult<CartResponse> {
    debug!(id = %line.id, batch = ?line.batch_number, "remove_from_cart command");
    dash.pos
        .with_cart_mut(|cart| cart.remove_from_cart(&line.id, line.batch_number.as_deref()));
    dash.persist_pos().await?;
    Ok(get_cart(dash))
}

pub async fn clear_cart(dash: &Dashboard) -> CommandResult<CartResponse> {
    dash.pos.with_cart_mut(Cart::clear);
    dash.persist_pos().await?;
    Ok(get_cart(dash))
}
