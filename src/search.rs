use std::collections::HashMap;

use anyhow::Context;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

/// Results per page, fixed by the upstream API.
pub const PAGE_SIZE: u64 = 10;
/// The API refuses start indices past the first 100 results.
pub const MAX_PAGE: u64 = 10;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no search API key configured")]
    MissingApiKey,
    #[error("invalid response from search backend")]
    InvalidResponse,
    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Modifiers for the outbound API query that are never user-visible.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub hidden_query: Option<String>,
    pub no_language_filter: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawApiResponse {
    #[serde(rename = "searchInformation", default)]
    pub search_information: SearchInformation,
    #[serde(default)]
    pub items: Option<Vec<RawResultItem>>,
}

impl RawApiResponse {
    /// The API reports the total as a decimal string.
    pub fn total_results(&self) -> u64 {
        self.search_information.total_results.parse().unwrap_or(0)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchInformation {
    #[serde(rename = "totalResults", default)]
    pub total_results: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawResultItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub pagemap: Option<Pagemap>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Pagemap {
    #[serde(default)]
    pub metatags: Option<Vec<HashMap<String, String>>>,
}

/// Client for the Custom Search JSON API backing the documentation index.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    api_key: String,
    cse_id: String,
    base_url: Url,
}

impl SearchClient {
    pub fn new(config: &Config) -> anyhow::Result<SearchClient> {
        let base_url = Url::parse(&config.cse_base_url)
            .context("Failed to parse search backend base URL")?;

        Ok(SearchClient {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            cse_id: config.cse_id.clone(),
            base_url,
        })
    }

    /// Fetch one page of raw results for `query`, scoped to `locale`.
    ///
    /// Fails without touching the network when no API key is configured.
    /// Upstream failures are logged with their body but surfaced to the
    /// caller as a generic error.
    pub async fn search(
        &self,
        query: &str,
        locale: &str,
        page: u64,
        options: &SearchOptions,
    ) -> Result<RawApiResponse, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let language = language_for(locale);
        let start_index = start_index(page);

        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("cx", &self.cse_id)
                .append_pair("key", &self.api_key)
                .append_pair("hl", &language)
                .append_pair("q", query)
                .append_pair("start", &start_index.to_string());
            if !options.no_language_filter {
                pairs.append_pair("lr", &format!("lang_{language}"));
            }
            if let Some(hq) = &options.hidden_query {
                pairs.append_pair("hq", hq);
            }
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("search backend returned {status}: {body}");
            return Err(SearchError::InvalidResponse);
        }

        Ok(response.json::<RawApiResponse>().await?)
    }
}

/// The API wants a bare language code, not a full locale.
pub fn language_for(locale: &str) -> String {
    locale.chars().take(2).collect()
}

/// Saturates instead of overflowing: the handler accepts any page ≥ 1 and
/// lets the upstream API reject out-of-range start indices.
pub fn start_index(page: u64) -> u64 {
    page.saturating_sub(1)
        .saturating_mul(PAGE_SIZE)
        .saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_key() -> Config {
        Config {
            api_key: String::new(),
            cse_id: "test-cx".to_string(),
            cse_base_url: "http://127.0.0.1:1/customsearch/v1".to_string(),
            port: 0,
        }
    }

    #[test]
    fn language_is_first_two_chars() {
        assert_eq!(language_for("en"), "en");
        assert_eq!(language_for("pt_BR"), "pt");
        // short locales pass through unchanged
        assert_eq!(language_for("e"), "e");
        assert_eq!(language_for(""), "");
    }

    #[test]
    fn start_index_steps_by_page_size() {
        assert_eq!(start_index(1), 1);
        assert_eq!(start_index(2), 11);
        assert_eq!(start_index(10), 91);
    }

    #[test]
    fn start_index_saturates_for_absurd_pages() {
        // pages far past the upstream limit must not panic; the API will
        // reject the start index instead
        assert_eq!(start_index(u64::MAX), u64::MAX);
        assert_eq!(start_index(i64::MAX as u64), u64::MAX);
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_network() {
        let client = SearchClient::new(&config_without_key()).unwrap();
        // base_url points at a closed port; an attempted call would show
        // up as a Network error instead of MissingApiKey
        let err = client
            .search("amp-list", "en", 1, &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::MissingApiKey));
    }

    #[test]
    fn total_results_parses_wire_string() {
        let raw: RawApiResponse =
            serde_json::from_str(r#"{"searchInformation": {"totalResults": "1234"}}"#).unwrap();
        assert_eq!(raw.total_results(), 1234);

        let empty: RawApiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.total_results(), 0);
    }
}
