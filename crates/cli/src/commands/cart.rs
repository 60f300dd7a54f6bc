//! Shopping cart commands.

use bookstand_core::{BookId, CartItemId, UserId};
use clap::Subcommand;
use serde_json::json;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show {
        /// Defaults to the logged-in user
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Add copies of a book
    Add {
        book_id: BookId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(long)]
        user: Option<UserId>,
    },
    /// Change the quantity of a cart line
    Update { cart_id: CartItemId, quantity: u32 },
    /// Remove a cart line
    Remove { cart_id: CartItemId },
    /// Empty the cart
    Clear {
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Order everything in the logged-in user's cart
    Checkout,
}

/// Run a cart subcommand.
///
/// # Errors
///
/// Returns `CommandError` if no user is known or the backend call fails.
pub async fn run(ctx: &Context, action: CartAction) -> Result<(), CommandError> {
    let carts = ctx.storefront.api().carts();

    match action {
        CartAction::Show { user } => {
            let cart = carts.get_cart(ctx.user_or_current(user)?).await?;
            output::emit(&json!({
                "items": cart.items,
                "total": cart.total,
                "amount": cart.amount(),
            }))?;
        }
        CartAction::Add {
            book_id,
            quantity,
            user,
        } => {
            carts
                .add_to_cart(ctx.user_or_current(user)?, book_id, quantity)
                .await?;
            output::line(format!("Added {quantity} x book {book_id} to cart"))?;
        }
        CartAction::Update { cart_id, quantity } => {
            carts.update_cart_item(cart_id, quantity).await?;
            output::line(format!("Cart line {cart_id} set to {quantity}"))?;
        }
        CartAction::Remove { cart_id } => {
            carts.remove_from_cart(cart_id).await?;
            output::line(format!("Removed cart line {cart_id}"))?;
        }
        CartAction::Clear { user } => {
            carts.clear_cart(ctx.user_or_current(user)?).await?;
            output::line("Cart cleared")?;
        }
        CartAction::Checkout => output::emit(&ctx.storefront.checkout().await?)?,
    }
    Ok(())
}
