// Runtime configuration read from the environment, with the search
// credential optionally read from a file in the user's home directory.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{Error, Result};

pub const DEFAULT_SEARCH_URL: &str = "https://unsplash.com/napi/search/photos";
pub const DEFAULT_OUTPUT_DIR: &str = "unsplash";

const SEARCH_URL_VAR: &str = "UNSPLASH_SEARCH_URL";
const OUTPUT_DIR_VAR: &str = "UNSPLASH_OUTPUT_DIR";
const COOKIE_VAR: &str = "UNSPLASH_COOKIE";
const COOKIE_FILE: &str = ".unsplash_cookie";

/// Everything the search client and downloader need to know about their
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Search endpoint, queried with `query`, `per_page` and `page`.
    pub search_url: String,
    /// Directory images are written into.
    pub output_dir: PathBuf,
    /// Opaque value sent as the `cookie` header on search requests. The
    /// upstream service may expire it, so it is never hardcoded.
    pub cookie: Option<String>,
}

impl Config {
    /// Build the configuration from the process environment:
    /// `UNSPLASH_SEARCH_URL`, `UNSPLASH_OUTPUT_DIR` and `UNSPLASH_COOKIE`
    /// (falling back to `~/.unsplash_cookie`).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), load_cookie().ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup
    /// and stored cookie.
    pub fn from_lookup<F>(lookup: F, stored_cookie: Option<String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let search_url = non_empty(SEARCH_URL_VAR).unwrap_or_else(|| DEFAULT_SEARCH_URL.into());
        let output_dir = non_empty(OUTPUT_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let cookie = non_empty(COOKIE_VAR).or_else(|| {
            stored_cookie
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
        });

        if cookie.is_none() {
            warn!("no search cookie configured; set {COOKIE_VAR} if the endpoint rejects requests");
        }
        debug!(%search_url, output_dir = %output_dir.display(), has_cookie = cookie.is_some(), "configuration loaded");

        Config {
            search_url,
            output_dir,
            cookie,
        }
    }
}

fn cookie_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(COOKIE_FILE)
}

/// Load the cookie stored in `~/.unsplash_cookie`.
pub fn load_cookie() -> Result<String> {
    let path = cookie_path();
    std::fs::read_to_string(&path).map_err(|e| Error::io(path, e))
}
