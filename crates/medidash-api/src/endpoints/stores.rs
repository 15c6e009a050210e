//! Branch listing.

use medidash_core::Branch;

use crate::client::ApiClient;
use crate::error::ApiResult;

impl ApiClient {
    pub async fn list_branches(&self) -> ApiResult<Vec<Branch>> {
        Ok(self.get("stores").await?.into_optional()?.unwrap_or_default())
    }
}
