//! User account and profile commands.

use bookstand_client::api::{NewUser, PasswordChange, ProfileUpdate, UserUpdate};
use bookstand_core::{Email, Gender, Role, UserId, UserStatus};
use clap::Subcommand;
use secrecy::SecretString;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum UsersAction {
    /// List all accounts (admin)
    List,
    /// Create an account (admin)
    Add {
        username: String,

        email: Email,

        #[arg(long, env = "BOOKSTAND_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Update an account (admin)
    Update {
        id: UserId,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<Email>,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        role: Option<Role>,

        #[arg(long)]
        status: Option<UserStatus>,
    },
    /// Delete an account (admin)
    Delete { id: UserId },
    /// Enable or disable an account (admin)
    Status { id: UserId, status: UserStatus },
    /// Account totals (admin)
    Count,
    /// Whether a username exists and is enabled
    Check { username: String },
    /// Show a profile, updating it first when any field is given
    Profile {
        /// Defaults to the logged-in user
        #[arg(long)]
        user: Option<UserId>,

        #[arg(long)]
        nickname: Option<String>,

        #[arg(long)]
        email: Option<Email>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        avatar: Option<String>,

        #[arg(long)]
        gender: Option<Gender>,

        /// `YYYY-MM-DD`
        #[arg(long)]
        birthday: Option<String>,
    },
    /// Change a password
    Password {
        #[arg(long)]
        user: Option<UserId>,

        #[arg(long, env = "BOOKSTAND_PASSWORD", hide_env_values = true)]
        old: String,

        #[arg(long, env = "BOOKSTAND_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
}

/// Run a users subcommand.
///
/// # Errors
///
/// Returns `CommandError` if no user is known or the backend call fails.
pub async fn run(ctx: &Context, action: UsersAction) -> Result<(), CommandError> {
    let users = ctx.admin.api().users();

    match action {
        UsersAction::List => output::emit(&users.all_users().await?)?,
        UsersAction::Add {
            username,
            email,
            password,
            role,
        } => {
            let user = NewUser {
                username,
                email,
                password: SecretString::from(password),
                role,
                status: None,
            };
            output::emit(&users.add_user(&user).await?)?;
        }
        UsersAction::Update {
            id,
            username,
            email,
            password,
            role,
            status,
        } => {
            let update = UserUpdate {
                username,
                email,
                password: password.map(SecretString::from),
                role,
                status,
            };
            output::emit(&users.update_user(id, &update).await?)?;
        }
        UsersAction::Delete { id } => {
            users.delete_user(id).await?;
            output::line(format!("Deleted user {id}"))?;
        }
        UsersAction::Status { id, status } => {
            output::emit(&users.set_user_status(id, status).await?)?;
        }
        UsersAction::Count => output::emit(&users.users_count().await?)?,
        UsersAction::Check { username } => output::emit(&users.check_user_status(&username).await?)?,
        UsersAction::Profile {
            user,
            nickname,
            email,
            phone,
            avatar,
            gender,
            birthday,
        } => {
            let id = ctx.user_or_current(user)?;
            let update = ProfileUpdate {
                nickname,
                email,
                phone,
                avatar,
                gender,
                birthday,
            };
            if update != ProfileUpdate::default() {
                users.update_user_profile(id, &update).await?;
            }
            output::emit(&users.user_profile(id).await?)?;
        }
        UsersAction::Password { user, old, new } => {
            let change = PasswordChange {
                old_password: SecretString::from(old),
                new_password: SecretString::from(new),
            };
            users.change_password(ctx.user_or_current(user)?, &change).await?;
            output::line("Password changed")?;
        }
    }
    Ok(())
}
