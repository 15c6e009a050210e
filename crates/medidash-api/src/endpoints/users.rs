//! User and role management.

use serde::Serialize;
use tracing::info;

use medidash_core::{Role, User};

use crate::client::ApiClient;
use crate::envelope::{PageQuery, Paginated};
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}

impl ApiClient {
    pub async fn list_users(&self, page: PageQuery) -> ApiResult<Paginated<User>> {
        self.get_with_query("users", &page.as_query()).await?.into_page()
    }

    pub async fn list_roles(&self) -> ApiResult<Vec<Role>> {
        Ok(self.get("roles").await?.into_optional()?.unwrap_or_default())
    }

    /// Password confirmation is checked by the caller before this runs.
    pub async fn create_user(&self, request: &CreateUserRequest) -> ApiResult<User> {
        let user: User = self.post("users", request).await?.into_data()?;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }
}
