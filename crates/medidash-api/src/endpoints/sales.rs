//! Sale submission.

use serde::{Deserialize, Serialize};
use tracing::info;

use medidash_core::cart::CartLine;
use medidash_core::history::Transaction;
use medidash_core::{Money, PaymentMethod};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    pub quantity: i64,
    #[serde(with = "medidash_core::money::decimal")]
    pub unit_price: Money,
}

impl From<&CartLine> for SaleLine {
    fn from(line: &CartLine) -> Self {
        SaleLine {
            item_id: line.id.clone(),
            batch_number: line.batch_number.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    /// Local transaction id, so the server can deduplicate.
    pub client_reference: String,
    pub store_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_id: Option<String>,
    pub items: Vec<SaleLine>,
    #[serde(with = "medidash_core::money::decimal")]
    pub subtotal: Money,
    #[serde(with = "medidash_core::money::decimal")]
    pub tax: Money,
    #[serde(with = "medidash_core::money::decimal")]
    pub discount: Money,
    #[serde(with = "medidash_core::money::decimal")]
    pub total: Money,
    pub payment_method: PaymentMethod,
}

impl SaleRequest {
    pub fn from_transaction(tx: &Transaction, store_id: &str, register_id: Option<&str>) -> Self {
        SaleRequest {
            client_reference: tx.id.clone(),
            store_id: store_id.to_string(),
            register_id: register_id.map(str::to_string),
            items: tx.items.iter().map(SaleLine::from).collect(),
            subtotal: tx.subtotal,
            tax: tx.tax,
            discount: tx.discount,
            total: tx.total,
            payment_method: tx.payment_method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub id: String,
    #[serde(default)]
    pub invoice_number: Option<String>,
}

impl ApiClient {
    pub async fn submit_sale(&self, request: &SaleRequest) -> ApiResult<SaleReceipt> {
        let receipt: SaleReceipt = self.post("sales", request).await?.into_data()?;
        info!(
            sale_id = %receipt.id,
            reference = %request.client_reference,
            total = %request.total,
            "Sale submitted"
        );
        Ok(receipt)
    }
}
