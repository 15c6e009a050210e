//! # User Commands

use serde::Deserialize;

use medidash_api::endpoints::users::CreateUserRequest;
use medidash_api::{PageQuery, Paginated};
use medidash_core::validation::{validate_email, validate_password_confirmation, validate_required};
use medidash_core::{Role, User};

use crate::error::CommandResult;
use crate::Dashboard;

use super::report_failure;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    pub role_id: Option<String>,
}

pub async fn list_users(dash: &Dashboard, page: PageQuery) -> CommandResult<Paginated<User>> {
    dash.api
        .list_users(page)
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not load users", e))
}

pub async fn list_roles(dash: &Dashboard) -> CommandResult<Vec<Role>> {
    dash.api
        .list_roles()
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not load roles", e))
}

/// Creates a user. Field checks and the password confirmation run before
/// any request is made.
pub async fn create_user(dash: &Dashboard, input: NewUserInput) -> CommandResult<User> {
    validate_required("name", &input.name)?;
    validate_email(&input.email)?;
    validate_required("password", &input.password)?;
    validate_password_confirmation(&input.password, &input.password_confirmation)?;

    let request = CreateUserRequest {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        password: input.password,
        role_id: input.role_id,
    };
    let user = dash
        .api
        .create_user(&request)
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not create user", e))?;

    dash.notifier().success(format!("User {} created", user.name));
    Ok(user)
}
