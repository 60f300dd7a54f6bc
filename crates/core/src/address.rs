//! Shipping addresses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::AddressId;
use crate::types::timestamp;

/// A shipping address owned by a user.
///
/// At most one address per user is marked default; the backend enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, with = "timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    /// Backend-rendered single-line form, when provided.
    #[serde(default)]
    pub full_address: Option<String>,
}

impl Address {
    /// Single-line form, preferring the backend's rendering.
    #[must_use]
    pub fn one_line(&self) -> String {
        self.full_address.clone().unwrap_or_else(|| {
            format!(
                "{} {} {} {}",
                self.province, self.city, self.district, self.detail_address
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_fallback() {
        let address: Address = serde_json::from_value(serde_json::json!({
            "id": 1,
            "receiver_name": "Li Lei",
            "receiver_phone": "13800000000",
            "province": "Zhejiang",
            "city": "Hangzhou",
            "district": "Xihu",
            "detail_address": "1 Lake Rd"
        }))
        .unwrap();

        assert!(!address.is_default);
        assert_eq!(address.one_line(), "Zhejiang Hangzhou Xihu 1 Lake Rd");
    }
}
