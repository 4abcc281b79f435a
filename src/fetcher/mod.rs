/*!
 * Remote page retrieval.
 *
 * `PageSource` is the seam the sync controller depends on; `HttpFetcher`
 * is the reqwest-backed implementation used by the binary.
 */

use async_trait::async_trait;

use crate::errors::FetchError;

/// Anything that can hand back the HTML of a page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `url` and return its body as text.
    ///
    /// Any non-success status is an error; no retries are attempted.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

pub mod http;

pub use http::{Download, HttpFetcher};
