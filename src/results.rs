use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::search::{MAX_PAGE, PAGE_SIZE, RawResultItem};

/// At most this many results are promoted to the components bucket.
pub const MAX_COMPONENTS: usize = 3;
/// Last batch index still considered for component promotion.
const COMPONENT_SCAN_LIMIT: usize = 7;

/// Matches component reference docs like
/// `https://amp.dev/documentation/components/amp-list` with an optional
/// locale path segment, capturing the component name.
static COMPONENT_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://[^/]+)?(?:/[^/]+)?/documentation/components/(amp-[^/?#&]+)")
        .expect("component path pattern is valid")
});

/// Strips markdown links down to their label. The target may be a URL or a
/// `{{...}}` template fragment; a missing `)` at end of string is tolerated
/// because snippets arrive truncated mid-link.
static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| {
    // the template branch must come first: a terminated `{{...}}` may
    // contain `)` and has to be consumed whole
    Regex::new(r"\[([^\]]*)\]\((?:\{\{.*?\}\}|[^)])*(?:\)|$)")
        .expect("markdown link pattern is valid")
});

/// Display-ready record for one search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "exampleUrl", skip_serializing_if = "Option::is_none")]
    pub example_url: Option<String>,
    #[serde(rename = "playgroundUrl", skip_serializing_if = "Option::is_none")]
    pub playground_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct ClassifiedResults {
    pub components: Vec<Page>,
    pub pages: Vec<Page>,
}

#[derive(Debug)]
pub struct Pagination {
    pub page_count: u64,
    pub is_truncated: bool,
    pub next_url: Option<String>,
    pub prev_url: Option<String>,
}

/// Extract the component name when `url` points at a component reference doc.
pub fn component_name(url: &str) -> Option<&str> {
    COMPONENT_PATH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn cleanup_text(text: &str) -> String {
    let text = text.replace('`', "'");
    MARKDOWN_LINK.replace_all(&text, "$1").into_owned()
}

/// Cut everything up to and including the last `:`, so
/// "Components: amp-list" becomes "amp-list". Titles that start with a
/// colon or end on one are left alone.
fn strip_title_prefix(title: &str) -> String {
    match title.rfind(':') {
        Some(idx) if idx > 0 && idx + 1 < title.len() => title[idx + 1..].trim().to_string(),
        _ => title.to_string(),
    }
}

fn urlencode(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

fn enrich_component_page(page: &mut Page, item: &RawResultItem, locale: &str) {
    let metatags = item
        .pagemap
        .as_ref()
        .and_then(|pagemap| pagemap.metatags.as_ref())
        .and_then(|tags| tags.first());
    if let Some(description) = metatags.and_then(|tags| tags.get("twitter:description")) {
        page.description = description.clone();
    }

    page.title = strip_title_prefix(&page.title);

    if let Some(name) = component_name(&page.url) {
        page.example_url = Some(format!("/{locale}/documentation/examples/?q={name}"));
        page.playground_url = Some(format!(
            "https://playground.amp.dev/#url={}",
            urlencode(&page.url)
        ));
    }
}

/// Bucket one batch of raw items into component docs and generic pages.
///
/// Component promotion only happens on the first page, only for items
/// within the first eight of the batch, and stops once three components
/// have been collected. Everything else lands in `pages`.
pub fn classify_items(items: &[RawResultItem], locale: &str, page: u64) -> ClassifiedResults {
    let mut results = ClassifiedResults::default();
    let mut highlight_components = page == 1;

    for (index, item) in items.iter().enumerate() {
        let mut result = Page {
            title: item.title.clone().unwrap_or_default(),
            description: item.snippet.clone().unwrap_or_default(),
            url: item.link.clone().unwrap_or_default(),
            example_url: None,
            playground_url: None,
        };

        let is_component = highlight_components
            && index <= COMPONENT_SCAN_LIMIT
            && component_name(&result.url).is_some();

        if is_component {
            enrich_component_page(&mut result, item, locale);
        }

        result.title = cleanup_text(&result.title);
        result.description = cleanup_text(&result.description);

        if is_component {
            results.components.push(result);
            if results.components.len() >= MAX_COMPONENTS {
                highlight_components = false;
            }
        } else {
            results.pages.push(result);
        }
    }

    results
}

pub fn page_count(total_results: u64) -> u64 {
    total_results.div_ceil(PAGE_SIZE)
}

/// Pagination bookkeeping for the response envelope. The upstream index
/// stops serving past page 10, so `next_url` never points beyond it and
/// `is_truncated` marks the cut-off when more results exist.
pub fn paginate(query: &str, locale: &str, page: u64, total_results: u64) -> Pagination {
    let page_count = page_count(total_results);

    let next_url =
        (page < page_count && page < MAX_PAGE).then(|| search_url(query, locale, page + 1));
    let prev_url = (page > 1).then(|| search_url(query, locale, page - 1));

    Pagination {
        page_count,
        is_truncated: page == MAX_PAGE && page_count > MAX_PAGE,
        next_url,
        prev_url,
    }
}

fn search_url(query: &str, locale: &str, page: u64) -> String {
    format!(
        "/search/do?q={}&locale={}&page={page}",
        urlencode(query),
        urlencode(locale)
    )
}
