//! Login, logout, registration.

use bookstand_client::api::RegisterRequest;
use bookstand_core::Email;
use secrecy::SecretString;
use serde_json::json;

use super::{App, CommandError, Context};
use crate::output;

/// Log in to the storefront or the back-office.
///
/// # Errors
///
/// Returns `CommandError` if the backend rejects the login or, for the
/// back-office, the account is not an admin.
pub async fn login(ctx: &Context, username: &str, password: SecretString, app: App) -> Result<(), CommandError> {
    let login = match app {
        App::Storefront => ctx.storefront.login(username, password).await?,
        App::Admin => ctx.admin.login(username, password).await?,
    };
    output::line(format!("Logged in as {} ({})", login.username, login.role))?;
    Ok(())
}

/// Clear the session file.
///
/// # Errors
///
/// Returns `CommandError::Session` if the file cannot be written.
pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    ctx.storefront.logout()?;
    output::line("Logged out")?;
    Ok(())
}

/// Show the session and, when logged in, the backend's view of the account.
///
/// # Errors
///
/// Returns `CommandError` if the account lookup fails.
pub async fn whoami(ctx: &Context) -> Result<(), CommandError> {
    let session = ctx.session();
    if !session.is_logged_in() {
        output::line("Not logged in")?;
        return Ok(());
    }

    let account = ctx.storefront.api().users().current_user().await?;
    output::emit(&json!({
        "username": session.username(),
        "role": session.role(),
        "user_id": session.user_id(),
        "account": account,
    }))?;
    Ok(())
}

/// Create a storefront account.
///
/// # Errors
///
/// Returns `CommandError` if the username is taken or the backend rejects it.
pub async fn register(
    ctx: &Context,
    username: String,
    email: Email,
    password: SecretString,
) -> Result<(), CommandError> {
    let user = ctx
        .storefront
        .register(&RegisterRequest {
            username,
            email,
            password,
        })
        .await?;
    output::emit(&user)?;
    Ok(())
}
