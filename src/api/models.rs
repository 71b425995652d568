use serde::{Deserialize, Serialize};

use crate::results::Page;

/// Inbound query-string parameters. Everything arrives as a string; the
/// handler owns parsing and defaulting.
#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    #[serde(rename = "totalResults")]
    pub total_results: u64,
    #[serde(rename = "currentPage")]
    pub current_page: u64,
    #[serde(rename = "pageCount")]
    pub page_count: u64,
    pub components: Vec<Page>,
    pub pages: Vec<Page>,
    #[serde(rename = "isTruncated", skip_serializing_if = "Option::is_none")]
    pub is_truncated: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ResultEnvelope {
    pub result: SearchResult,
    /// Always false: tells the client this is a query response, not the
    /// pre-rendered initial state.
    pub initial: bool,
    #[serde(rename = "nextUrl", skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
    #[serde(rename = "prevUrl", skip_serializing_if = "Option::is_none")]
    pub prev_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
