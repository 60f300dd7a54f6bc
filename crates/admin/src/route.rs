//! Admin route table.

use std::fmt::Display;

use bookstand_client::{Access, Route};

/// Admin routes. Everything under `/home` requires the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminRoute {
    /// Login page (default route)
    #[default]
    Login,
    /// Dashboard
    Home,
    BookManage,
    UserManage,
    OrderManage,
    NotFound,
}

impl Route for AdminRoute {
    fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => Self::Login,
            "/home" => Self::Home,
            "/home/book-manage" => Self::BookManage,
            "/home/user-manage" => Self::UserManage,
            "/home/order-manage" => Self::OrderManage,
            _ => Self::NotFound,
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Login => "/",
            Self::Home => "/home",
            Self::BookManage => "/home/book-manage",
            Self::UserManage => "/home/user-manage",
            Self::OrderManage => "/home/order-manage",
            Self::NotFound => "/404",
        }
        .to_string()
    }

    fn access(&self) -> Access {
        match self {
            Self::Login | Self::NotFound => Access::Public,
            Self::Home | Self::BookManage | Self::UserManage | Self::OrderManage => Access::Admin,
        }
    }

    fn login() -> Self {
        Self::Login
    }

    fn landing() -> Self {
        Self::Home
    }
}

impl Display for AdminRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
