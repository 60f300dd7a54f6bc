//! Order commands.

use bookstand_client::api::{NewOrder, NewOrderItem};
use bookstand_core::{BookId, OrderId, OrderStatus, UserId};
use clap::Subcommand;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List orders
    List {
        /// Every order (admin) instead of one user's
        #[arg(long, conflicts_with = "user")]
        all: bool,

        /// Defaults to the logged-in user
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Show one order with its lines
    Show { id: OrderId },
    /// Place an order
    Create {
        /// Line as `BOOK_ID:QUANTITY`; repeat for more lines
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<NewOrderItem>,

        #[arg(long)]
        user: Option<UserId>,
    },
    /// Cancel an order (restores stock)
    Cancel { id: OrderId },
    /// Move an order to another status (admin)
    Status { id: OrderId, status: OrderStatus },
    /// Delete an order record (admin)
    Delete { id: OrderId },
}

fn parse_item(raw: &str) -> Result<NewOrderItem, String> {
    let (book, quantity) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected BOOK_ID:QUANTITY, got '{raw}'"))?;
    let book_id: BookId = book.parse().map_err(|e| format!("invalid book id '{book}': {e}"))?;
    let quantity: u32 = quantity
        .trim()
        .parse()
        .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
    Ok(NewOrderItem { book_id, quantity })
}

/// Run an orders subcommand.
///
/// # Errors
///
/// Returns `CommandError` if no user is known or the backend call fails.
pub async fn run(ctx: &Context, action: OrdersAction) -> Result<(), CommandError> {
    let orders = ctx.storefront.api().orders();

    match action {
        OrdersAction::List { all: true, .. } => output::emit(&orders.all_orders().await?)?,
        OrdersAction::List { all: false, user } => {
            output::emit(&orders.orders_for_user(ctx.user_or_current(user)?).await?)?;
        }
        OrdersAction::Show { id } => {
            let order = orders
                .order_detail(id)
                .await?
                .ok_or_else(|| CommandError::NotFound(format!("order {id}")))?;
            if !order.total_matches_items() {
                tracing::warn!(order_id = %id, "Order total differs from the sum of its lines");
            }
            output::emit(&order)?;
        }
        OrdersAction::Create { items, user } => {
            let order = NewOrder {
                user_id: ctx.user_or_current(user)?,
                items,
            };
            output::emit(&orders.create_order(&order).await?)?;
        }
        OrdersAction::Cancel { id } => {
            orders.cancel_order(id).await?;
            output::line(format!("Cancelled order {id}"))?;
        }
        OrdersAction::Status { id, status } => {
            orders.update_order_status(id, status).await?;
            output::line(format!("Order {id} is now {status}"))?;
        }
        OrdersAction::Delete { id } => {
            orders.delete_order(id).await?;
            output::line(format!("Deleted order {id}"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(
            parse_item("5:2").unwrap(),
            NewOrderItem {
                book_id: BookId::new(5),
                quantity: 2,
            }
        );
        assert!(parse_item("5").is_err());
        assert!(parse_item("five:2").is_err());
        assert!(parse_item("5:-1").is_err());
    }
}
