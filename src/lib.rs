// Library root
// -----------
// The binary (`main.rs`) drives the interactive flow in `ui`; everything
// below it is plain library code that can be used and tested on its own.
//
// Module responsibilities:
// - `api`: search endpoint client (total count, result pages, links).
// - `sanitize`: description -> filesystem-safe name.
// - `download`: sequential downloader tolerant of per-item failures.
// - `http`: the blocking GET seam shared by `api` and `download`.
// - `plan`: quantity validation and page arithmetic.
// - `config`, `error`, `logging`: environment, error types, tracing setup.
// - `ui`: terminal prompts and progress output.
pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod logging;
pub mod plan;
pub mod sanitize;
pub mod ui;

pub use api::{ImageResult, SearchClient, SearchQuery, PAGE_SIZE};
pub use config::Config;
pub use download::{DownloadItem, DownloadOutcome, Downloader};
pub use error::{Error, Result};
pub use http::{HttpTransport, Request, Transport};
pub use sanitize::sanitize;
