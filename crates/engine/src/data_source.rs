//! Item data sources: inline JSON and remote JSON documents.

use std::time::Duration;

use navtree_types::{ItemPayload, SidebarItem};
use reqwest::{Client, header};
use tracing::debug;
use url::Url;

use crate::error::DataSourceError;
use crate::tree::ItemTree;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Parse an item payload (array or `{ "items": [...] }`) and validate ids.
pub fn parse_items(json: &str) -> Result<Vec<SidebarItem>, DataSourceError> {
    let items = serde_json::from_str::<ItemPayload>(json)?.into_items();
    validate_items(items)
}

fn validate_items(items: Vec<SidebarItem>) -> Result<Vec<SidebarItem>, DataSourceError> {
    ItemTree::from_items(items.clone())?;
    Ok(items)
}

/// HTTP client for a JSON item document.
#[derive(Debug, Clone)]
pub struct RemoteItemSource {
    url: Url,
    http: Client,
}

impl RemoteItemSource {
    pub fn new(url: Url) -> Result<Self, DataSourceError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(default_headers)
            .user_agent(format!("navtree/{}; {}", env!("CARGO_PKG_VERSION"), std::env::consts::OS))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DataSourceError::Client)?;
        Ok(Self { url, http })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch and parse the item document.
    pub async fn fetch(&self) -> Result<Vec<SidebarItem>, DataSourceError> {
        debug!(url = %self.url, "fetching sidebar items");
        let response = self.http.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::Status { status: status.as_u16() });
        }
        let body = response.text().await?;
        parse_items(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;

    #[test]
    fn parses_array_and_wrapped_payloads() {
        let array = parse_items(r#"[{"key":"a","text":"A"}]"#).unwrap();
        let wrapped = parse_items(r#"{"items":[{"key":"a","text":"A"}]}"#).unwrap();
        assert_eq!(array, wrapped);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(parse_items("[{"), Err(DataSourceError::Parse(_))));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = parse_items(r#"[{"id":"a","text":"A"},{"id":"a","text":"again"}]"#);
        assert!(matches!(result, Err(DataSourceError::Tree(TreeError::DuplicateId(id))) if id == "a"));
    }
}
