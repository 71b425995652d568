use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::results;
use crate::search::{SearchClient, SearchOptions};

use super::models::{ErrorBody, ResultEnvelope, SearchParams, SearchResult};

pub const DEFAULT_LOCALE: &str = "en";

pub async fn search_handler(
    State(client): State<Arc<SearchClient>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let locale = params
        .locale
        .clone()
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    let raw_page = params.page.clone().unwrap_or_else(|| "1".to_string());
    let query = params.q.as_deref().unwrap_or("").trim().to_string();

    let page = raw_page.trim().parse::<i64>().unwrap_or(0);
    if page < 1 || query.is_empty() {
        // 200 on purpose: validation problems must not show up as errors
        // in the client console.
        let q = params.q.as_deref().unwrap_or("");
        return (
            StatusCode::OK,
            Json(ErrorBody {
                error: format!("Invalid search params (q={q}, page={raw_page})"),
            }),
        )
            .into_response();
    }
    let page = page as u64;

    // Results are always scoped to pages tagged with the request locale.
    // For non-default locales the index may lack translated entries, so
    // admit default-locale pages too and drop the strict language filter
    // that would otherwise defeat the OR clause.
    let mut hidden_query = format!("more:pagemap:metatags-page-locale:{locale}");
    let mut options = SearchOptions::default();
    if locale != DEFAULT_LOCALE {
        hidden_query.push_str(&format!(
            " OR more:pagemap:metatags-page-locale:{DEFAULT_LOCALE}"
        ));
        options.no_language_filter = true;
    }
    options.hidden_query = Some(hidden_query);

    let response = match client.search(&query, &locale, page, &options).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("search for {query:?} (locale {locale}, page {page}) failed: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let total_results = response.total_results();
    let mut classified = results::ClassifiedResults::default();
    if total_results > 0 {
        let items = response.items.as_deref().unwrap_or(&[]);
        classified = results::classify_items(items, &locale, page);
    }
    let pagination = results::paginate(&query, &locale, page, total_results);

    let envelope = ResultEnvelope {
        result: SearchResult {
            total_results,
            current_page: page,
            page_count: pagination.page_count,
            components: classified.components,
            pages: classified.pages,
            is_truncated: pagination.is_truncated.then_some(true),
        },
        initial: false,
        next_url: pagination.next_url,
        prev_url: pagination.prev_url,
    };

    // Responses are cacheable per query; CORS echoes the caller's origin.
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("*")
        .to_string();

    (
        StatusCode::OK,
        [
            (header::CACHE_CONTROL, "max-age=3600, immutable".to_string()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
        ],
        Json(envelope),
    )
        .into_response()
}
