//! Register open, close and active-session lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use medidash_core::register::{CloseSummary, RegisterSession, RegisterStatus};
use medidash_core::Money;

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRegisterRequest {
    pub store_id: String,
    #[serde(with = "medidash_core::money::decimal")]
    pub opening_balance: Money,
}

/// Expected balance and variance are computed locally and sent for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRegisterRequest {
    #[serde(with = "medidash_core::money::decimal")]
    pub actual_balance: Money,
    #[serde(with = "medidash_core::money::decimal")]
    pub expected_balance: Money,
    #[serde(with = "medidash_core::money::decimal")]
    pub variance: Money,
}

impl From<CloseSummary> for CloseRegisterRequest {
    fn from(summary: CloseSummary) -> Self {
        CloseRegisterRequest {
            actual_balance: summary.actual_balance,
            expected_balance: summary.expected_balance,
            variance: summary.variance,
        }
    }
}

/// Register session as the server sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSessionDto {
    pub id: String,
    pub store_id: String,
    #[serde(with = "medidash_core::money::decimal")]
    pub opening_balance: Money,
    #[serde(default, with = "medidash_core::money::option_decimal")]
    pub sales_amount: Option<Money>,
    #[serde(default)]
    pub sales_count: u32,
    #[serde(default, with = "medidash_core::money::option_decimal")]
    pub expenses_amount: Option<Money>,
    #[serde(default)]
    pub expenses_count: u32,
    #[serde(default)]
    pub status: RegisterStatus,
    #[serde(default, with = "medidash_core::money::option_decimal")]
    pub actual_balance: Option<Money>,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<RegisterSessionDto> for RegisterSession {
    fn from(dto: RegisterSessionDto) -> Self {
        RegisterSession {
            id: dto.id,
            store_id: dto.store_id,
            opening_balance: dto.opening_balance,
            sales_amount: dto.sales_amount.unwrap_or_default(),
            sales_count: dto.sales_count,
            expenses_amount: dto.expenses_amount.unwrap_or_default(),
            expenses_count: dto.expenses_count,
            status: dto.status,
            actual_balance: dto.actual_balance,
            opened_at: dto.opened_at,
            closed_at: dto.closed_at,
            closing: false,
        }
    }
}

impl ApiClient {
    pub async fn open_register(&self, request: &OpenRegisterRequest) -> ApiResult<RegisterSession> {
        let dto: RegisterSessionDto = self.post("register/open", request).await?.into_data()?;
        info!(session_id = %dto.id, store_id = %dto.store_id, "Register opened on server");
        Ok(dto.into())
    }

    pub async fn close_register(
        &self,
        session_id: &str,
        request: &CloseRegisterRequest,
    ) -> ApiResult<()> {
        self.post::<_, serde_json::Value>(&format!("register/{session_id}/close"), request)
            .await?
            .into_optional()?;
        info!(session_id, "Register closed on server");
        Ok(())
    }

    /// The branch's open session, if any.
    pub async fn active_register(&self, store_id: &str) -> ApiResult<Option<RegisterSession>> {
        let dto: Option<RegisterSessionDto> = self
            .get_with_query("register/active", &[("storeId", store_id)])
            .await?
            .into_optional()?;
        Ok(dto.map(RegisterSession::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_dto_decimal_amounts() {
        let json = r#"{
            "id": "reg-1",
            "storeId": "store-main",
            "openingBalance": 100.00,
            "salesAmount": "45.50",
            "salesCount": 1,
            "status": "open",
            "openedAt": "2024-03-05T08:00:00Z"
        }"#;
        let session: RegisterSession = serde_json::from_str::<RegisterSessionDto>(json)
            .unwrap()
            .into();
        assert_eq!(session.opening_balance, Money::from_cents(10_000));
        assert_eq!(session.sales_amount, Money::from_cents(4_550));
        assert_eq!(session.expenses_amount, Money::zero());
        assert_eq!(session.expected_balance(), Money::from_cents(14_550));
    }

    #[test]
    fn test_close_request_serializes_decimals() {
        let request = CloseRegisterRequest::from(CloseSummary {
            expected_balance: Money::from_cents(14_550),
            actual_balance: Money::from_cents(14_000),
            variance: Money::from_cents(-550),
        });
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["actualBalance"], 140.0);
        assert_eq!(value["variance"], -5.5);
    }
}
