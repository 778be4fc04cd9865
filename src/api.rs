// Search client: talks to the image search endpoint, reports how many
// results a term has and turns result pages into download items.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::download::DownloadItem;
use crate::error::{Error, Result};
use crate::http::{Request, Transport};
use crate::sanitize::sanitize;

/// Number of results the endpoint returns per page.
pub const PAGE_SIZE: u32 = 20;

/// Quality labels the endpoint usually offers. Shown to the user but not
/// enforced: an unknown label simply matches nothing.
pub const KNOWN_QUALITIES: [&str; 6] = ["raw", "full", "regular", "small", "thumb", "small_s3"];

/// A search term plus pagination. Values are immutable; use
/// [`SearchQuery::at_page`] to derive the query for a given page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub page_size: u32,
    pub page: Option<u32>,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        SearchQuery {
            term: term.into(),
            page_size: PAGE_SIZE,
            page: None,
        }
    }

    pub fn at_page(&self, page: u32) -> Self {
        SearchQuery {
            page: Some(page),
            ..self.clone()
        }
    }
}

/// One entry of a result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub raw_description: Option<String>,
    pub urls_by_quality: BTreeMap<String, String>,
}

impl ImageResult {
    /// URL for the given quality label, if this image offers it.
    pub fn url_for(&self, quality: &str) -> Option<&str> {
        self.urls_by_quality.get(quality).map(String::as_str)
    }
}

// Wire shapes. Every field is optional so a missing key surfaces as a
// `Protocol` error with a clear reason instead of a serde message.
#[derive(Deserialize)]
struct CountResponse {
    total: Option<u64>,
}

#[derive(Deserialize)]
struct PageResponse {
    results: Option<Vec<RawResult>>,
}

#[derive(Deserialize)]
struct RawResult {
    alt_description: Option<String>,
    description: Option<String>,
    urls: Option<BTreeMap<String, Option<String>>>,
}

impl From<RawResult> for ImageResult {
    fn from(raw: RawResult) -> Self {
        let raw_description = raw
            .alt_description
            .filter(|d| !d.is_empty())
            .or(raw.description.filter(|d| !d.is_empty()));
        let urls_by_quality = raw
            .urls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(quality, url)| url.map(|u| (quality, u)))
            .collect();
        ImageResult {
            raw_description,
            urls_by_quality,
        }
    }
}

/// Client for the search endpoint. Generic over the transport so tests can
/// run without a network.
pub struct SearchClient<T> {
    transport: T,
    endpoint: String,
    cookie: Option<String>,
}

impl<T: Transport> SearchClient<T> {
    pub fn new(transport: T, config: &Config) -> Self {
        SearchClient {
            transport,
            endpoint: config.search_url.clone(),
            cookie: config.cookie.clone(),
        }
    }

    fn request(&self, query: &SearchQuery) -> Request {
        let mut req = Request::get(&self.endpoint)
            .param("query", query.term.as_str())
            .param("per_page", query.page_size.to_string())
            .cookie(self.cookie.as_deref());
        if let Some(page) = query.page {
            req = req.param("page", page.to_string());
        }
        req
    }

    fn fetch_json<R: DeserializeOwned>(&self, query: &SearchQuery) -> Result<R> {
        let body = self.transport.get(&self.request(query))?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::protocol(&self.endpoint, format!("invalid JSON: {e}")))
    }

    /// Total number of results the endpoint reports for `query.term`.
    /// Any page set on the query is ignored.
    pub fn total_count(&self, query: &SearchQuery) -> Result<u64> {
        let first = SearchQuery {
            page: None,
            ..query.clone()
        };
        let resp: CountResponse = self.fetch_json(&first)?;
        let total = resp
            .total
            .ok_or_else(|| Error::protocol(&self.endpoint, "missing `total` field"))?;
        debug!(term = %query.term, total, "search total");
        Ok(total)
    }

    /// Fetch and decode a single 1-indexed result page. No retry.
    pub fn fetch_page(&self, query: &SearchQuery, page: u32) -> Result<Vec<ImageResult>> {
        let resp: PageResponse = self.fetch_json(&query.at_page(page))?;
        let results = resp
            .results
            .ok_or_else(|| Error::protocol(&self.endpoint, "missing `results` field"))?;
        debug!(page, count = results.len(), "fetched page");
        Ok(results.into_iter().map(ImageResult::from).collect())
    }

    /// Collect download items for pages `1..=page_count` at `quality`.
    pub fn get_links(
        &self,
        query: &SearchQuery,
        page_count: u32,
        quality: &str,
    ) -> Result<Vec<DownloadItem>> {
        self.get_links_with(query, page_count, quality, |_| {})
    }

    /// Same as [`get_links`](Self::get_links), calling `on_item` for each
    /// item as soon as it is collected.
    ///
    /// Images without the requested quality are skipped silently. Ordinals
    /// are 0-based and keep counting across pages.
    pub fn get_links_with<F>(
        &self,
        query: &SearchQuery,
        page_count: u32,
        quality: &str,
        mut on_item: F,
    ) -> Result<Vec<DownloadItem>>
    where
        F: FnMut(&DownloadItem),
    {
        let mut items = Vec::new();
        for page in 1..=page_count {
            for image in self.fetch_page(query, page)? {
                let Some(url) = image.url_for(quality) else {
                    debug!(page, quality, "image lacks requested quality, skipping");
                    continue;
                };
                let item = DownloadItem {
                    url: url.to_string(),
                    safe_name: sanitize(image.raw_description.as_deref()),
                    ordinal: items.len(),
                };
                on_item(&item);
                items.push(item);
            }
        }
        debug!(pages = page_count, links = items.len(), quality, "collected links");
        Ok(items)
    }
}
