//! Orders.

use bookstand_core::{BookId, CreatedOrder, Order, OrderId, OrderList, OrderStatus, UserId};
use serde::Serialize;
use serde_json::json;
use tracing::{error, instrument};

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

/// One line of a checkout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub book_id: BookId,
    pub quantity: u32,
}

/// Payload for `POST /orders/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
        }
    }

    /// Add a line.
    #[must_use]
    pub fn item(mut self, book_id: BookId, quantity: u32) -> Self {
        self.items.push(NewOrderItem { book_id, quantity });
        self
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.items.is_empty() {
            return Err(ApiError::Invalid("order has no items".to_string()));
        }
        if let Some(line) = self.items.iter().find(|line| line.quantity == 0) {
            return Err(ApiError::Invalid(format!(
                "quantity for book {} must be positive",
                line.book_id
            )));
        }
        Ok(())
    }
}

/// Order operations.
#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    api: &'a ApiClient,
}

impl<'a> Orders<'a> {
    pub(crate) const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Orders placed by one user.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        let payload = self
            .api
            .execute(ApiRequest::get("/orders").query("user_id", user_id))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch user orders"))?;
        Ok(payload.list_or_empty("orders"))
    }

    /// Every order, for the back-office listing.
    ///
    /// An empty payload yields an empty list with a zero total.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<OrderList, ApiError> {
        let payload = self
            .api
            .execute(ApiRequest::get("/orders"))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch order list"))?;

        let orders: Vec<Order> = payload.list_or_empty("orders");
        let total = payload.field("total").unwrap_or(orders.len() as u64);
        Ok(OrderList {
            orders,
            total,
            page: payload.field("page").ok(),
            page_size: payload.field("page_size").ok(),
            total_pages: payload.field("total_pages").ok(),
        })
    }

    /// One order with its lines. `None` when the backend returns no data.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails (including 404).
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order_detail(&self, id: OrderId) -> Result<Option<Order>, ApiError> {
        let result: Result<Option<Order>, ApiError> = async {
            let payload = self
                .api
                .execute(ApiRequest::get(format!("/orders/{id}")))
                .await?;
            Ok(payload.optional()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to fetch order detail"))
    }

    /// Check out. The backend validates stock, decrements it and clears the
    /// purchased lines from the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for an empty order or a zero quantity,
    /// `ApiError::Shape` if the acknowledgement is missing, otherwise the
    /// adapter's error (e.g. a 400 for insufficient stock).
    #[instrument(skip(self, order), fields(user_id = %order.user_id, lines = order.items.len()))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, ApiError> {
        let result: Result<CreatedOrder, ApiError> = async {
            order.validate()?;
            let payload = self
                .api
                .execute(ApiRequest::post("/orders/create").json(order)?)
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to create order"))
    }

    /// Move an order to another status.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = async {
            let request = ApiRequest::put(format!("/orders/{id}/status")).json(&json!({ "status": status }))?;
            self.api
                .execute(request)
                .await?;
            Ok(())
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to update order status"))
    }

    /// Cancel an order. The backend restores stock and removes the order.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete(format!("/orders/{id}/cancel")))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to cancel order"))?;
        Ok(())
    }

    /// Delete an order record without restoring stock.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete(format!("/orders/{id}")))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to delete order"))?;
        Ok(())
    }
}
