//! # Auth Commands
//!
//! ```text
//! login ──► POST auth/login ──► tokens into cookie jar (7d / 30d)
//!                           └─► user + setup flag into SessionState
//!                           └─► persist `auth`
//! logout ─► clear cookie jar, clear session, persist, tell server
//! ```

use serde::Deserialize;
use tracing::{info, warn};

use medidash_api::endpoints::auth::LoginRequest;
use medidash_core::validation::{validate_email, validate_required};
use medidash_core::User;

use crate::error::CommandResult;
use crate::Dashboard;

use super::report_failure;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub async fn login(dash: &Dashboard, input: LoginInput) -> CommandResult<User> {
    validate_email(&input.email)?;
    validate_required("password", &input.password)?;

    let request = LoginRequest {
        email: input.email.trim().to_string(),
        password: input.password,
    };
    let response = dash
        .api
        .login(&request)
        .await
        .map_err(|e| report_failure(dash.notifier(), "Sign in failed", e))?;

    dash.session
        .sign_in(response.user.clone(), response.setup_complete);
    dash.persist_auth().await?;
    Ok(response.user)
}

/// Always signs out locally. A failed server logout is only logged.
pub async fn logout(dash: &Dashboard) -> CommandResult<()> {
    if let Err(e) = dash.api.logout().await {
        warn!(error = %e, "Server logout failed");
    }
    dash.session.sign_out();
    dash.persist_auth().await?;
    info!("Session cleared");
    Ok(())
}

/// Re-reads the signed-in user from the server.
pub async fn refresh_current_user(dash: &Dashboard) -> CommandResult<User> {
    let user = dash
        .api
        .current_user()
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not load your profile", e))?;
    let setup = dash.session.setup_complete();
    dash.session.sign_in(user.clone(), setup);
    dash.persist_auth().await?;
    Ok(user)
}

pub async fn complete_setup(dash: &Dashboard) -> CommandResult<()> {
    dash.session.set_setup_complete(true);
    dash.persist_auth().await
}
