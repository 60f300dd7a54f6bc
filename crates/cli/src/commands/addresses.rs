//! Shipping address commands.

use bookstand_client::api::{AddressUpdate, NewAddress};
use bookstand_core::{AddressId, UserId};
use clap::{Args, Subcommand};

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum AddressesAction {
    /// List addresses
    List {
        /// Defaults to the logged-in user
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Add an address
    Add {
        #[arg(long)]
        user: Option<UserId>,

        #[command(flatten)]
        fields: AddressFields,

        /// Make it the default address
        #[arg(long)]
        default: bool,
    },
    /// Update an address
    Update {
        id: AddressId,

        #[command(flatten)]
        fields: AddressUpdateFields,
    },
    /// Delete an address
    Delete { id: AddressId },
    /// Make an address the default
    #[command(name = "default")]
    SetDefault { id: AddressId },
}

#[derive(Args)]
pub struct AddressFields {
    #[arg(long)]
    receiver_name: String,

    #[arg(long)]
    receiver_phone: String,

    #[arg(long)]
    province: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    district: String,

    #[arg(long)]
    detail_address: String,

    #[arg(long)]
    postal_code: Option<String>,
}

#[derive(Args)]
pub struct AddressUpdateFields {
    #[arg(long)]
    receiver_name: Option<String>,

    #[arg(long)]
    receiver_phone: Option<String>,

    #[arg(long)]
    province: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    district: Option<String>,

    #[arg(long)]
    detail_address: Option<String>,

    #[arg(long)]
    postal_code: Option<String>,
}

/// Run an addresses subcommand.
///
/// # Errors
///
/// Returns `CommandError` if no user is known or the backend call fails.
pub async fn run(ctx: &Context, action: AddressesAction) -> Result<(), CommandError> {
    let addresses = ctx.storefront.api().addresses();

    match action {
        AddressesAction::List { user } => {
            output::emit(&addresses.addresses(ctx.user_or_current(user)?).await?)?;
        }
        AddressesAction::Add {
            user,
            fields,
            default,
        } => {
            let address = NewAddress {
                user_id: ctx.user_or_current(user)?,
                receiver_name: fields.receiver_name,
                receiver_phone: fields.receiver_phone,
                province: fields.province,
                city: fields.city,
                district: fields.district,
                detail_address: fields.detail_address,
                postal_code: fields.postal_code,
                is_default: default,
            };
            match addresses.add_address(&address).await? {
                Some(stored) => output::emit(&stored)?,
                None => output::line("Address added")?,
            }
        }
        AddressesAction::Update { id, fields } => {
            let update = AddressUpdate {
                receiver_name: fields.receiver_name,
                receiver_phone: fields.receiver_phone,
                province: fields.province,
                city: fields.city,
                district: fields.district,
                detail_address: fields.detail_address,
                postal_code: fields.postal_code,
                is_default: None,
            };
            addresses.update_address(id, &update).await?;
            output::line(format!("Updated address {id}"))?;
        }
        AddressesAction::Delete { id } => {
            addresses.delete_address(id).await?;
            output::line(format!("Deleted address {id}"))?;
        }
        AddressesAction::SetDefault { id } => {
            addresses.set_default_address(id).await?;
            output::line(format!("Address {id} is now the default"))?;
        }
    }
    Ok(())
}
