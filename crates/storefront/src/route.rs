//! Storefront route table.

use std::fmt::Display;

use bookstand_client::{Access, Route};
use bookstand_core::{BookId, OrderId};

/// Storefront routes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StorefrontRoute {
    /// Catalog (landing page)
    #[default]
    Home,
    Login,
    Register,
    BookDetail(BookId),
    /// Order history (requires login)
    Orders,
    /// One order (requires login)
    OrderDetail(OrderId),
    NotFound,
}

impl Route for StorefrontRoute {
    fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/orders" => Self::Orders,
            _ => {
                if let Some(id) = trimmed.strip_prefix("/book/") {
                    id.parse().map_or(Self::NotFound, Self::BookDetail)
                } else if let Some(id) = trimmed.strip_prefix("/order/") {
                    id.parse().map_or(Self::NotFound, Self::OrderDetail)
                } else {
                    Self::NotFound
                }
            }
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::BookDetail(id) => format!("/book/{id}"),
            Self::Orders => "/orders".to_string(),
            Self::OrderDetail(id) => format!("/order/{id}"),
            Self::NotFound => "/404".to_string(),
        }
    }

    fn access(&self) -> Access {
        match self {
            Self::Orders | Self::OrderDetail(_) => Access::Authenticated,
            _ => Access::Public,
        }
    }

    fn login() -> Self {
        Self::Login
    }

    fn landing() -> Self {
        Self::Home
    }

    fn redirects_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl Display for StorefrontRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(StorefrontRoute::from_path("/"), StorefrontRoute::Home);
        assert_eq!(StorefrontRoute::from_path(""), StorefrontRoute::Home);
        assert_eq!(StorefrontRoute::from_path("/login"), StorefrontRoute::Login);
        assert_eq!(StorefrontRoute::from_path("/orders/"), StorefrontRoute::Orders);
        assert_eq!(
            StorefrontRoute::from_path("/book/12"),
            StorefrontRoute::BookDetail(BookId::new(12))
        );
        assert_eq!(
            StorefrontRoute::from_path("/order/9?tab=items"),
            StorefrontRoute::OrderDetail(OrderId::new(9))
        );
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        assert_eq!(StorefrontRoute::from_path("/book/abc"), StorefrontRoute::NotFound);
        assert_eq!(StorefrontRoute::from_path("/cart"), StorefrontRoute::NotFound);
        assert_eq!(StorefrontRoute::from_path("/home"), StorefrontRoute::NotFound);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in [
            StorefrontRoute::Home,
            StorefrontRoute::Login,
            StorefrontRoute::Register,
            StorefrontRoute::BookDetail(BookId::new(3)),
            StorefrontRoute::Orders,
            StorefrontRoute::OrderDetail(OrderId::new(4)),
        ] {
            assert_eq!(StorefrontRoute::from_path(&route.path()), route);
        }
    }

    #[test]
    fn test_only_order_routes_require_login() {
        assert_eq!(StorefrontRoute::Orders.access(), Access::Authenticated);
        assert_eq!(
            StorefrontRoute::OrderDetail(OrderId::new(1)).access(),
            Access::Authenticated
        );
        assert_eq!(StorefrontRoute::Home.access(), Access::Public);
        assert_eq!(
            StorefrontRoute::BookDetail(BookId::new(1)).access(),
            Access::Public
        );
    }
}
