pub mod http;

use std::future::Future;

use crate::error::ScrapeError;
use crate::request::{ExportFormat, ExportPayload, ScrapeRequest};
use crate::results::ScrapeResult;

pub use http::HttpBackend;

/// The remote service that performs scraping, summarization and export.
///
/// Every call is independent: the backend keeps no client-side state and
/// the same request parameters are resent for export and summary.
pub trait ScrapeBackend: Send + Sync {
    /// Run an extraction and return the page-grouped result
    fn scrape(
        &self,
        request: &ScrapeRequest,
    ) -> impl Future<Output = Result<ScrapeResult, ScrapeError>> + Send;

    /// Produce an AI summary of what the request extracts
    fn summarize(
        &self,
        request: &ScrapeRequest,
    ) -> impl Future<Output = Result<String, ScrapeError>> + Send;

    /// Download the backend's rendering of the request in the given format
    fn export(
        &self,
        request: &ScrapeRequest,
        format: ExportFormat,
    ) -> impl Future<Output = Result<ExportPayload, ScrapeError>> + Send;

    /// Text chunks of the last scraped content most similar to `query`
    fn semantic_search(
        &self,
        request: &ScrapeRequest,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, ScrapeError>> + Send;
}
