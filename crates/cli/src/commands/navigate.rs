//! Route guard inspection.

use bookstand_client::GuardDecision;

use super::{App, CommandError, Context};
use crate::output;

/// Run the guard for `path` and report the outcome.
///
/// A denial clears the session, exactly as it would in the application.
///
/// # Errors
///
/// Returns `CommandError::Output` if the result cannot be written.
pub fn run(ctx: &Context, app: App, path: &str) -> Result<(), CommandError> {
    let (decision, notice) = match app {
        App::Storefront => {
            let decision = ctx.storefront.navigate(path);
            let notice = denial_notice(&decision);
            (decision.to_string(), notice)
        }
        App::Admin => {
            let decision = ctx.admin.navigate(path);
            let notice = denial_notice(&decision);
            (decision.to_string(), notice)
        }
    };

    if let Some(notice) = notice {
        tracing::warn!("{notice}");
    }
    output::line(decision)?;
    Ok(())
}

const fn denial_notice<R>(decision: &GuardDecision<R>) -> Option<&'static str> {
    match decision {
        GuardDecision::Deny { notice, .. } => Some(*notice),
        _ => None,
    }
}
