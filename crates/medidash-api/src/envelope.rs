//! # Response Envelope
//!
//! Every backend response is wrapped:
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Patients fetched",
//!   "data": [ ... ],
//!   "meta": { "page": 1, "pageSize": 20, "totalPages": 3, "totalItems": 47,
//!             "hasNextPage": true, "hasPreviousPage": false }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ApiResult, ClientError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// The payload, or `Rejected` when the server reported `success: false`.
    pub fn into_data(self) -> ApiResult<T> {
        if !self.success {
            return Err(ClientError::Rejected {
                message: self.message.unwrap_or_else(|| "Request was not successful".into()),
            });
        }
        self.data
            .ok_or_else(|| ClientError::Decode("response has no data".into()))
    }

    /// Like [`into_data`](Self::into_data) but a missing payload is `None`.
    pub fn into_optional(self) -> ApiResult<Option<T>> {
        if !self.success {
            return Err(ClientError::Rejected {
                message: self.message.unwrap_or_else(|| "Request was not successful".into()),
            });
        }
        Ok(self.data)
    }
}

impl<T> ApiEnvelope<Vec<T>> {
    /// Payload plus pagination meta. A response without meta is one page.
    pub fn into_page(self) -> ApiResult<Paginated<T>> {
        let meta = self.meta;
        let items = self.into_optional()?.unwrap_or_default();
        let meta = meta.unwrap_or_else(|| PageMeta::single(items.len() as u64));
        Ok(Paginated { items, meta })
    }
}

/// Error body of a non-2xx response. Only the message is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMeta {
    fn single(total_items: u64) -> Self {
        PageMeta {
            page: 1,
            page_size: total_items as u32,
            total_pages: 1,
            total_items,
            has_next_page: false,
            has_previous_page: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Page request, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery {
            page: 1,
            page_size: 20,
        }
    }
}

impl PageQuery {
    pub fn as_query(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.max(1).to_string()),
            ("pageSize", self.page_size.max(1).to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_envelope() {
        let json = r#"{
            "success": true,
            "message": "ok",
            "data": [1, 2],
            "meta": {"page": 2, "pageSize": 2, "totalPages": 3, "totalItems": 6,
                     "hasNextPage": true, "hasPreviousPage": true}
        }"#;
        let env: ApiEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        let page = env.into_page().unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.meta.total_items, 6);
        assert!(page.meta.has_next_page);
    }

    #[test]
    fn test_unsuccessful_envelope_is_rejected() {
        let env: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success": false, "message": "Branch inactive"}"#).unwrap();
        match env.into_data() {
            Err(ClientError::Rejected { message }) => assert_eq!(message, "Branch inactive"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_meta_is_single_page_and_null_data_is_none() {
        let env: ApiEnvelope<Vec<u32>> = serde_json::from_str(r#"{"data": [7]}"#).unwrap();
        assert_eq!(env.into_page().unwrap().meta.total_pages, 1);

        let env: ApiEnvelope<u32> = serde_json::from_str(r#"{"success": true, "data": null}"#).unwrap();
        assert_eq!(env.into_optional().unwrap(), None);
    }
}
