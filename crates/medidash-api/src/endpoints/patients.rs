//! Patient listing.

use medidash_core::Patient;

use crate::client::ApiClient;
use crate::envelope::{PageQuery, Paginated};
use crate::error::ApiResult;

impl ApiClient {
    /// One page of patients, optionally filtered by a name/phone search.
    pub async fn list_patients(
        &self,
        page: PageQuery,
        search: Option<&str>,
    ) -> ApiResult<Paginated<Patient>> {
        let mut query: Vec<(&str, String)> = page.as_query().to_vec();
        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", term.to_string()));
        }
        self.get_with_query("patients", &query).await?.into_page()
    }
}
