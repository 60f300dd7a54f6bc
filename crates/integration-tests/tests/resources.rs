//! Request shapes for addresses, cart lines and account profiles, plus the
//! per-operation failure logging.

#![allow(clippy::unwrap_used)]

use std::io;
use std::sync::{Arc, Mutex};

use axum::http::Method;
use bookstand_client::api::{AddressUpdate, NewAddress, NewBook, PasswordChange, ProfileUpdate};
use bookstand_client::{ApiClient, ErrorKind, Session};
use bookstand_core::{AddressId, CartItemId, UserId};
use bookstand_integration_tests::MockBackend;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;

async fn setup() -> (MockBackend, ApiClient) {
    let backend = MockBackend::start().await.unwrap();
    let api = ApiClient::new(&backend.config().unwrap(), Session::in_memory()).unwrap();
    (backend, api)
}

fn address_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "receiver_name": "Li Lei",
        "receiver_phone": "13800000000",
        "province": "Zhejiang",
        "city": "Hangzhou",
        "district": "Xihu",
        "detail_address": "1 Lake Rd",
        "is_default": true
    })
}

fn new_address() -> NewAddress {
    NewAddress {
        user_id: UserId::new(1),
        receiver_name: "Li Lei".to_string(),
        receiver_phone: "13800000000".to_string(),
        province: "Zhejiang".to_string(),
        city: "Hangzhou".to_string(),
        district: "Xihu".to_string(),
        detail_address: "1 Lake Rd".to_string(),
        postal_code: None,
        is_default: true,
    }
}

// =============================================================================
// Addresses
// =============================================================================

#[tokio::test]
async fn test_addresses_read_from_addresses_field() {
    let (backend, api) = setup().await;
    backend.respond(Method::GET, "/addresses", json!({ "addresses": [address_json(4)] }));

    let addresses = api.addresses().addresses(UserId::new(1)).await.unwrap();

    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].id, AddressId::new(4));
    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.query.as_deref(), Some("user_id=1"));
}

#[tokio::test]
async fn test_addresses_malformed_field_is_empty() {
    let (backend, api) = setup().await;
    backend.respond(Method::GET, "/addresses", json!({ "list": [address_json(4)] }));

    let addresses = api.addresses().addresses(UserId::new(1)).await.unwrap();

    assert!(addresses.is_empty());
}

#[tokio::test]
async fn test_add_address_without_data_is_none() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::POST, "/addresses");

    let stored = api.addresses().add_address(&new_address()).await.unwrap();

    assert!(stored.is_none());
    let request = backend.last_request().unwrap();
    assert_eq!(request.path, "/addresses");
    assert_eq!(
        request.body,
        Some(json!({
            "user_id": 1,
            "receiver_name": "Li Lei",
            "receiver_phone": "13800000000",
            "province": "Zhejiang",
            "city": "Hangzhou",
            "district": "Xihu",
            "detail_address": "1 Lake Rd",
            "is_default": true
        }))
    );
}

#[tokio::test]
async fn test_add_address_returns_stored_record() {
    let (backend, api) = setup().await;
    backend.respond(Method::POST, "/addresses", address_json(5));

    let stored = api.addresses().add_address(&new_address()).await.unwrap();

    assert_eq!(stored.unwrap().id, AddressId::new(5));
}

#[tokio::test]
async fn test_update_address_sends_only_set_fields() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::PUT, "/addresses/4");

    let update = AddressUpdate {
        city: Some("Suzhou".to_string()),
        ..AddressUpdate::default()
    };
    api.addresses().update_address(AddressId::new(4), &update).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.body, Some(json!({ "city": "Suzhou" })));
}

#[tokio::test]
async fn test_delete_address() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::DELETE, "/addresses/4");

    api.addresses().delete_address(AddressId::new(4)).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/addresses/4");
}

#[tokio::test]
async fn test_set_default_address() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::PUT, "/addresses/4/set-default");

    api.addresses().set_default_address(AddressId::new(4)).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/addresses/4/set-default");
    assert_eq!(request.body, None);
}

// =============================================================================
// Cart lines
// =============================================================================

#[tokio::test]
async fn test_update_cart_item_body() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::PUT, "/cart/update");

    api.carts().update_cart_item(CartItemId::new(10), 3).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.body, Some(json!({ "cart_id": 10, "quantity": 3 })));
}

#[tokio::test]
async fn test_zero_quantity_sends_nothing() {
    let (backend, api) = setup().await;

    let err = api.carts().update_cart_item(CartItemId::new(10), 0).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_remove_from_cart_query() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::DELETE, "/cart/remove");

    api.carts().remove_from_cart(CartItemId::new(10)).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.query.as_deref(), Some("cart_id=10"));
}

#[tokio::test]
async fn test_clear_cart_query() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::DELETE, "/cart/clear");

    api.carts().clear_cart(UserId::new(1)).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.path, "/cart/clear");
    assert_eq!(request.query.as_deref(), Some("user_id=1"));
}

// =============================================================================
// Profile & password
// =============================================================================

#[tokio::test]
async fn test_user_profile() {
    let (backend, api) = setup().await;
    backend.respond(
        Method::GET,
        "/user/profile/1",
        json!({
            "id": 1, "username": "reader", "nickname": "Bookworm", "email": "r@example.com",
            "role": "user", "status": "active",
            "stats": {"total_orders": 3, "completed_orders": 2, "total_spent": 120.5}
        }),
    );

    let profile = api.users().user_profile(UserId::new(1)).await.unwrap();

    assert_eq!(profile.display_name(), "Bookworm");
    assert_eq!(profile.stats.unwrap().total_orders, 3);
}

#[tokio::test]
async fn test_update_user_profile_body() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::PUT, "/user/profile/1");

    let update = ProfileUpdate {
        nickname: Some("Bookworm".to_string()),
        ..ProfileUpdate::default()
    };
    api.users().update_user_profile(UserId::new(1), &update).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.body, Some(json!({ "nickname": "Bookworm" })));
}

#[tokio::test]
async fn test_change_password_body() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::PUT, "/user/password/1");

    let change = PasswordChange {
        old_password: SecretString::from("old-secret"),
        new_password: SecretString::from("new-secret"),
    };
    api.users().change_password(UserId::new(1), &change).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.path, "/user/password/1");
    assert_eq!(
        request.body,
        Some(json!({ "old_password": "old-secret", "new_password": "new-secret" }))
    );
}

// =============================================================================
// Failure logging
// =============================================================================

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

#[tokio::test]
async fn test_missing_entity_is_logged_by_operation() {
    let (backend, api) = setup().await;
    backend.respond_ok(Method::GET, "/books/count");
    let (logs, _guard) = capture_logs();

    let err = api.books().books_count().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(logs.contents().contains("Failed to fetch book statistics"));
}

#[tokio::test]
async fn test_rejected_payload_is_logged_by_operation() {
    let (backend, api) = setup().await;
    let (logs, _guard) = capture_logs();

    let book = NewBook::new("  ", "Lao She", Decimal::new(29, 0), 8);
    let err = api.books().add_book(&book).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert!(backend.requests().is_empty());
    assert!(logs.contents().contains("Failed to add book"));
}
