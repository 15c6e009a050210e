//! # Navigation Commands
//!
//! Runs the route guard against the current session for every navigation.

use tracing::debug;

use medidash_core::navigation::{guard, RouteDecision, RouteRequest};

use crate::error::{CommandError, CommandResult};
use crate::Dashboard;

pub fn guard_navigation(dash: &Dashboard, path: &str) -> RouteDecision {
    let request = RouteRequest {
        path: path.to_string(),
        locale_cookie: dash.credentials().locale(),
        has_access_token: dash.credentials().has_access_token(),
        setup_complete: dash.session.setup_complete(),
    };
    let decision = guard(&request, &dash.config.locale_policy());
    debug!(path, ?decision, "Route guard");
    decision
}

/// Stores the locale preference (`NEXT_LOCALE`).
pub async fn set_locale(dash: &Dashboard, locale: &str) -> CommandResult<()> {
    let policy = dash.config.locale_policy();
    if !policy.is_supported(locale) {
        return Err(CommandError::validation(format!("Unsupported locale: {locale}")));
    }
    dash.credentials().set_locale(locale);
    dash.persist_auth().await
}
