//! Login, logout and the current user.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use medidash_core::User;

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    /// Absent on older backends, which never ask for setup.
    #[serde(default)]
    pub setup_complete: Option<bool>,
}

impl ApiClient {
    /// Signs in and stores both tokens.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let response: LoginResponse = self.post("auth/login", request).await?.into_data()?;
        self.credentials()
            .set_tokens(response.access_token.clone(), response.refresh_token.clone());
        info!(user_id = %response.user.id, "Signed in");
        Ok(response)
    }

    /// Clears local credentials, then tells the server.
    ///
    /// Local credentials are gone even when the server call fails.
    pub async fn logout(&self) -> ApiResult<()> {
        let refresh_token = self.credentials().refresh_token();
        self.credentials().clear();

        let body = serde_json::json!({ "refreshToken": refresh_token });
        if let Err(e) = self.post::<_, serde_json::Value>("auth/logout", &body).await {
            warn!(error = %e, "Server logout failed, local credentials already cleared");
            return Err(e);
        }
        info!("Signed out");
        Ok(())
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.get("auth/me").await?.into_data()
    }
}
