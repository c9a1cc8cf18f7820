//! Response envelope shared by every API endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};

/// Envelope carried by every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl<T> ApiEnvelope<T> {
    fn failure_message(&self) -> String {
        self.message
            .clone()
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| "Request failed".to_string())
    }

    /// Unwraps the envelope into its payload.
    ///
    /// `success: false` becomes an `Api` error carrying the server message;
    /// a successful envelope with no payload is a `Parse` error.
    pub fn into_data(self) -> ApiResult<T> {
        if !self.success {
            return Err(ApiError::api(self.failure_message()));
        }
        self.data
            .ok_or_else(|| ApiError::parse("Response envelope is missing data"))
    }

    /// Unwraps an envelope whose payload does not matter (deletes, locks).
    pub fn into_unit(self) -> ApiResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::api(self.failure_message()))
        }
    }
}

impl<T> ApiEnvelope<Vec<T>> {
    /// Unwraps a paged listing, combining the payload with the envelope's
    /// pagination fields. Falls back to sensible values when the server
    /// omits them (some listings are unpaged).
    pub fn into_page(self, requested_page: u32, requested_size: u32) -> ApiResult<Page<T>> {
        let total = self.total;
        let page = self.page;
        let page_size = self.page_size;
        let items = self.into_data()?;
        Ok(Page {
            total: total.unwrap_or(items.len() as u64),
            page: page.unwrap_or(requested_page),
            page_size: page_size.unwrap_or(requested_size),
            items,
        })
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Returns the number of pages needed for `total` at the current size.
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size)) as u32
    }

    /// Returns an empty first page.
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size,
        }
    }
}

/// Parses a response body into an envelope.
pub(super) fn decode_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<ApiEnvelope<T>> {
    serde_json::from_str(body)
        .map_err(|err| ApiError::parse(format!("Failed to parse response envelope: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_envelope_becomes_api_error() {
        let envelope: ApiEnvelope<String> = serde_json::from_str(
            r#"{"success": false, "message": "Slug already in use", "data": null}"#,
        )
        .unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.kind, crate::api::ApiErrorKind::Api);
        assert_eq!(err.message, "Slug already in use");
    }

    #[test]
    fn success_envelope_yields_data() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "message": null, "data": [1, 2, 3]}"#)
                .unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn page_combines_payload_and_pagination() {
        let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str(
            r#"{"success": true, "message": null, "data": [1, 2], "total": 23, "page": 2, "page_size": 10}"#,
        )
        .unwrap();
        let page = envelope.into_page(2, 10).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn unpaged_listing_falls_back_to_item_count() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3]}"#).unwrap();
        let page = envelope.into_page(1, 10).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn unit_ignores_missing_data() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": true, "message": "Deleted"}"#).unwrap();
        assert!(envelope.into_unit().is_ok());
    }
}
