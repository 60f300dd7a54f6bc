//! Session-bound storefront facade.

use bookstand_client::api::{LoginRequest, NewOrder, RegisterRequest};
use bookstand_client::{ApiClient, ClientConfig, GuardDecision, NavigationGuard, Session};
use bookstand_core::{BookId, Cart, CreatedOrder, LoginResponse, Order, User, UserId};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::error::StorefrontError;
use crate::route::StorefrontRoute;

/// The storefront application.
#[derive(Debug, Clone)]
pub struct Storefront {
    api: ApiClient,
    guard: NavigationGuard,
}

impl Storefront {
    /// Build a storefront over `session`.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Api` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, StorefrontError> {
        let api = ApiClient::new(config, session.clone())?;
        Ok(Self {
            api,
            guard: NavigationGuard::new(session),
        })
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// Run the navigation guard for `path`.
    #[must_use]
    pub fn navigate(&self, path: &str) -> GuardDecision<StorefrontRoute> {
        self.guard.navigate(path)
    }

    /// Log in and persist the session.
    ///
    /// A disabled account is reported by the backend as a 403, which is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Api` if the backend rejects the login and
    /// `StorefrontError::Session` if it cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: SecretString,
    ) -> Result<LoginResponse, StorefrontError> {
        let login = self
            .api
            .users()
            .login(&LoginRequest::new(username, password))
            .await?;
        self.session().begin(&login)?;
        info!(username = %login.username, "Logged in");
        Ok(login)
    }

    /// Sign up. Does not log in.
    ///
    /// Checks the username first so a taken name is reported without
    /// submitting the form.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::UsernameTaken` if the username exists, or
    /// `StorefrontError::Api` if the backend rejects the registration.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &RegisterRequest) -> Result<User, StorefrontError> {
        let check = self
            .api
            .users()
            .check_user_status(&registration.username)
            .await?;
        if check.exists {
            warn!("Username already registered");
            return Err(StorefrontError::UsernameTaken(registration.username.clone()));
        }
        Ok(self.api.users().register(registration).await?)
    }

    /// Whether `username` exists but is disabled.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Api` if the request fails.
    pub async fn is_disabled(&self, username: &str) -> Result<bool, StorefrontError> {
        let check = self.api.users().check_user_status(username).await?;
        Ok(check.is_disabled())
    }

    /// Clear the session.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Session` if a key cannot be removed.
    pub fn logout(&self) -> Result<(), StorefrontError> {
        self.session().clear()?;
        info!("Logged out");
        Ok(())
    }

    /// ID of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotLoggedIn` without a login or stored ID.
    pub fn current_user_id(&self) -> Result<UserId, StorefrontError> {
        if !self.session().is_logged_in() {
            return Err(StorefrontError::NotLoggedIn);
        }
        self.session().user_id().ok_or(StorefrontError::NotLoggedIn)
    }

    /// The logged-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotLoggedIn` or the API error.
    pub async fn cart(&self) -> Result<Cart, StorefrontError> {
        let user_id = self.current_user_id()?;
        Ok(self.api.carts().get_cart(user_id).await?)
    }

    /// Add copies of a book to the logged-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotLoggedIn` or the API error.
    pub async fn add_to_cart(&self, book_id: BookId, quantity: u32) -> Result<(), StorefrontError> {
        let user_id = self.current_user_id()?;
        Ok(self.api.carts().add_to_cart(user_id, book_id, quantity).await?)
    }

    /// The logged-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotLoggedIn` or the API error.
    pub async fn my_orders(&self) -> Result<Vec<Order>, StorefrontError> {
        let user_id = self.current_user_id()?;
        Ok(self.api.orders().orders_for_user(user_id).await?)
    }

    /// Order every line of the logged-in user's cart.
    ///
    /// The backend clears the ordered lines from the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::EmptyCart` when there is nothing to order,
    /// otherwise `StorefrontError::NotLoggedIn` or the API error.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<CreatedOrder, StorefrontError> {
        let user_id = self.current_user_id()?;
        let cart = self.api.carts().get_cart(user_id).await?;
        if cart.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let order = cart
            .items
            .iter()
            .fold(NewOrder::new(user_id), |order, line| {
                order.item(line.book_id, line.quantity)
            });
        let created = self.api.orders().create_order(&order).await?;
        info!(order_number = %created.order_number, "Order placed");
        Ok(created)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstand_client::RedirectReason;
    use bookstand_core::{OrderId, Role};

    use super::*;

    fn storefront() -> Storefront {
        let config = ClientConfig::from_values(None, None).unwrap();
        Storefront::new(&config, Session::in_memory()).unwrap()
    }

    fn log_in(storefront: &Storefront, user_id: Option<UserId>) {
        storefront
            .session()
            .begin(&LoginResponse {
                token: "mock-jwt-token-reader".to_string(),
                user_id,
                username: "reader".to_string(),
                role: Role::User,
            })
            .unwrap();
    }

    #[test]
    fn test_orders_require_login() {
        let storefront = storefront();
        assert_eq!(
            storefront.navigate("/orders"),
            GuardDecision::Redirect {
                to: StorefrontRoute::Login,
                reason: RedirectReason::NotAuthenticated,
            }
        );
        assert!(storefront.navigate("/book/2").is_proceed());
    }

    #[test]
    fn test_logged_in_user_reaches_orders() {
        let storefront = storefront();
        log_in(&storefront, Some(UserId::new(3)));
        assert_eq!(
            storefront.navigate("/order/8"),
            GuardDecision::Proceed(StorefrontRoute::OrderDetail(OrderId::new(8)))
        );
        assert_eq!(
            storefront.navigate("/login").destination(),
            &StorefrontRoute::Home
        );
    }

    #[test]
    fn test_current_user_id() {
        let storefront = storefront();
        assert!(matches!(
            storefront.current_user_id(),
            Err(StorefrontError::NotLoggedIn)
        ));

        log_in(&storefront, None);
        assert!(matches!(
            storefront.current_user_id(),
            Err(StorefrontError::NotLoggedIn)
        ));

        log_in(&storefront, Some(UserId::new(3)));
        assert_eq!(storefront.current_user_id().unwrap(), UserId::new(3));
    }

    #[test]
    fn test_logout_clears_session() {
        let storefront = storefront();
        log_in(&storefront, Some(UserId::new(3)));
        storefront.logout().unwrap();
        assert!(!storefront.session().is_logged_in());
        assert!(storefront.session().token().is_none());
    }

    #[tokio::test]
    async fn test_cart_requires_login_before_any_request() {
        let storefront = storefront();
        assert!(matches!(
            storefront.cart().await,
            Err(StorefrontError::NotLoggedIn)
        ));
    }
}
