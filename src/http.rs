// HTTP layer: a tiny blocking GET abstraction. Both the search client and
// the downloader go through `Transport` so they can be exercised without a
// network in unit tests.

use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, COOKIE};
use tracing::debug;

use crate::error::{Error, Result};

/// A single GET request: target URL, query parameters and an optional
/// cookie header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub cookie: Option<String>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Request {
            url: url.into(),
            query: Vec::new(),
            cookie: None,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn cookie(mut self, cookie: Option<&str>) -> Self {
        self.cookie = cookie.map(str::to_string);
        self
    }

    /// Value of the query parameter `key`, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Anything able to perform a blocking GET and hand back the body bytes.
///
/// Implementations must map connection failures to `Error::Network` and a
/// non-success status to `Error::Protocol`.
pub trait Transport {
    fn get(&self, request: &Request) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, request: &Request) -> Result<Vec<u8>> {
        (**self).get(request)
    }
}

/// `Transport` backed by a reqwest blocking client. The client keeps its
/// connection pool between calls; each response body is read fully and
/// dropped before `get` returns.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &Request) -> Result<Vec<u8>> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        if let Some(cookie) = &request.cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| Error::Config("cookie is not a valid header value".into()))?;
            builder = builder.header(COOKIE, value);
        }

        debug!(url = %request.url, query = ?request.query, "GET");
        let res = builder
            .send()
            .map_err(|e| Error::network(&request.url, e))?;

        let status = res.status();
        if !status.is_success() {
            let txt = res.text().unwrap_or_default();
            let snippet: String = txt.chars().take(200).collect();
            return Err(Error::protocol(
                &request.url,
                format!("HTTP {status} {snippet}").trim_end().to_string(),
            ));
        }

        let body = res.bytes().map_err(|e| Error::network(&request.url, e))?;
        Ok(body.to_vec())
    }
}

/// In-memory transport for unit tests: canned responses keyed by URL and
/// `page` parameter, with a log of every request seen.
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::{Request, Transport};
    use crate::error::{Error, Result};

    #[derive(Clone)]
    pub(crate) enum Canned {
        Body(Vec<u8>),
        NetworkDown,
        Status(u16),
    }

    #[derive(Default)]
    pub(crate) struct FakeTransport {
        responses: HashMap<(String, Option<String>), Canned>,
        pub(crate) seen: RefCell<Vec<Request>>,
    }

    impl FakeTransport {
        pub(crate) fn respond(mut self, url: &str, page: Option<u32>, canned: Canned) -> Self {
            self.responses
                .insert((url.to_string(), page.map(|p| p.to_string())), canned);
            self
        }

        pub(crate) fn json(self, url: &str, page: Option<u32>, body: serde_json::Value) -> Self {
            self.respond(url, page, Canned::Body(body.to_string().into_bytes()))
        }

        pub(crate) fn requested_urls(&self) -> Vec<String> {
            self.seen.borrow().iter().map(|r| r.url.clone()).collect()
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, request: &Request) -> Result<Vec<u8>> {
            self.seen.borrow_mut().push(request.clone());
            let key = (
                request.url.clone(),
                request.query_value("page").map(str::to_string),
            );
            match self.responses.get(&key) {
                Some(Canned::Body(bytes)) => Ok(bytes.clone()),
                Some(Canned::Status(code)) => {
                    Err(Error::protocol(&request.url, format!("HTTP {code}")))
                }
                Some(Canned::NetworkDown) | None => {
                    Err(Error::network(&request.url, "connection refused"))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_collects_params_in_order() {
        let req = Request::get("https://unsplash.test/search")
            .param("query", "cats")
            .param("per_page", "20")
            .cookie(Some("ugid=abc"));
        assert_eq!(req.query_value("query"), Some("cats"));
        assert_eq!(req.query_value("per_page"), Some("20"));
        assert_eq!(req.query_value("page"), None);
        assert_eq!(req.cookie.as_deref(), Some("ugid=abc"));
        assert_eq!(req.query[0].0, "query");
    }
}
