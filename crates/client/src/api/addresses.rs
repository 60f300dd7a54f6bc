//! Shipping addresses.

use bookstand_core::{Address, AddressId, UserId};
use serde::Serialize;
use tracing::{error, instrument};

use super::ensure_present;
use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

/// Payload for `POST /addresses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAddress {
    pub user_id: UserId,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub is_default: bool,
}

impl NewAddress {
    fn validate(&self) -> Result<(), ApiError> {
        ensure_present("receiver_name", &self.receiver_name)?;
        ensure_present("receiver_phone", &self.receiver_phone)?;
        ensure_present("detail_address", &self.detail_address)
    }
}

/// Partial update for `PUT /addresses/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Address operations.
#[derive(Debug, Clone, Copy)]
pub struct Addresses<'a> {
    api: &'a ApiClient,
}

impl<'a> Addresses<'a> {
    pub(crate) const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// A user's addresses.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn addresses(&self, user_id: UserId) -> Result<Vec<Address>, ApiError> {
        let payload = self
            .api
            .execute(ApiRequest::get("/addresses").query("user_id", user_id))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch addresses"))?;
        Ok(payload.list_or_empty("addresses"))
    }

    /// Add an address. Returns the stored address when the backend echoes it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for blank receiver or street fields,
    /// otherwise the adapter's error.
    #[instrument(skip(self, address), fields(user_id = %address.user_id))]
    pub async fn add_address(&self, address: &NewAddress) -> Result<Option<Address>, ApiError> {
        let result: Result<Option<Address>, ApiError> = async {
            address.validate()?;
            let payload = self
                .api
                .execute(ApiRequest::post("/addresses").json(address)?)
                .await?;
            Ok(payload.optional()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to add address"))
    }

    /// Update an address.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self, update), fields(address_id = %id))]
    pub async fn update_address(&self, id: AddressId, update: &AddressUpdate) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = async {
            self.api
                .execute(ApiRequest::put(format!("/addresses/{id}")).json(update)?)
                .await?;
            Ok(())
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to update address"))
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: AddressId) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete(format!("/addresses/{id}")))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to delete address"))?;
        Ok(())
    }

    /// Make an address the user's default. The backend unsets the previous one.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn set_default_address(&self, id: AddressId) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::put(format!("/addresses/{id}/set-default")))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to set default address"))?;
        Ok(())
    }
}
