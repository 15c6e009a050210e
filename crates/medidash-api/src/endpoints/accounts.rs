//! Branch cash accounts and withdrawals.

use serde::{Deserialize, Serialize};
use tracing::info;

use medidash_core::{Account, Money};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub name: String,
    #[serde(with = "medidash_core::money::decimal")]
    pub current_balance: Money,
}

impl From<AccountDto> for Account {
    fn from(dto: AccountDto) -> Self {
        Account {
            id: dto.id,
            name: dto.name,
            current_balance: dto.current_balance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    #[serde(with = "medidash_core::money::decimal")]
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ApiClient {
    pub async fn list_accounts(&self, store_id: &str) -> ApiResult<Vec<Account>> {
        let dtos: Option<Vec<AccountDto>> = self
            .get_with_query("accounts", &[("storeId", store_id)])
            .await?
            .into_optional()?;
        Ok(dtos.unwrap_or_default().into_iter().map(Account::from).collect())
    }

    /// Posts a withdrawal and returns the account with its new balance.
    pub async fn withdraw(&self, account_id: &str, request: &WithdrawalRequest) -> ApiResult<Account> {
        let dto: AccountDto = self
            .post(&format!("accounts/{account_id}/withdrawals"), request)
            .await?
            .into_data()?;
        info!(account_id, amount = %request.amount, "Withdrawal recorded");
        Ok(dto.into())
    }
}
