//! Cursor pagination over Fivetran listing endpoints

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::model::{ApiEnvelope, Page};
use crate::domain::{FivetranApi, FivetranError, FivetranResult};

/// Fetch every page of `endpoint`, following `data.next_cursor`.
///
/// `base_params` are sent on every request; the `cursor` parameter is added
/// from the second page on. Items keep upstream order and are not
/// de-duplicated. Fails with `PaginationLimit` if the upstream still reports a
/// cursor after `max_pages` pages.
pub async fn paginate<T>(
    api: &dyn FivetranApi,
    endpoint: &str,
    base_params: &[(String, String)],
    max_pages: usize,
) -> FivetranResult<Vec<T>>
where
    T: DeserializeOwned,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 1..=max_pages {
        let mut params = base_params.to_vec();
        if let Some(cursor) = cursor.take() {
            params.push(("cursor".to_string(), cursor));
        }

        let response = api.get(endpoint, &params).await?;
        let page: Page<T> = serde_json::from_value::<ApiEnvelope<Page<T>>>(response)?.into_data();
        debug!(endpoint, page = page_number, items = page.items.len(), "Fetched page");
        items.extend(page.items);

        match page.next_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => return Ok(items),
        }
    }

    Err(FivetranError::PaginationLimit {
        endpoint: endpoint.to_string(),
        max_pages,
    })
}
