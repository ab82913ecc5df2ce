use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::backend::ScrapeBackend;
use crate::config::ClientConfig;
use crate::error::{ConfigError, ScrapeError};
use crate::request::{ExportFormat, ExportPayload, ScrapeRequest};
use crate::results::{LegacyEntry, ScrapeResult};
use crate::utils::{filename_from_content_disposition, sanitize_filename};

/// Backend operations that map to an HTTP endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Scrape,
    Summarize,
    Export(ExportFormat),
    SemanticSearch,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Scrape => "scrape",
            Operation::Summarize => "summary",
            Operation::Export(ExportFormat::Csv) => "CSV export",
            Operation::Export(ExportFormat::Pdf) => "PDF export",
            Operation::SemanticSearch => "semantic search",
        }
    }
}

/// Path (relative to the backend base URL) serving `op` for this request shape.
///
/// Selector requests summarize through their own endpoint. Intent requests
/// have no separate summary call: the preview already carries one, and
/// posting it again re-runs the whole crawl.
pub fn route(request: &ScrapeRequest, op: Operation) -> Result<&'static str, ScrapeError> {
    match (request, op) {
        (ScrapeRequest::Selector { .. }, Operation::Scrape) => Ok("api/scrape"),
        (ScrapeRequest::Selector { .. }, Operation::Summarize) => Ok("api/scrape/summary"),
        (ScrapeRequest::Selector { .. }, Operation::Export(ExportFormat::Csv)) => {
            Ok("api/scrape/csv")
        }
        (ScrapeRequest::Intent { .. }, Operation::Scrape) => Ok("api/smart-scrape/preview"),
        (ScrapeRequest::Intent { .. }, Operation::Export(ExportFormat::Csv)) => {
            Ok("api/smart-scrape/export/csv")
        }
        (ScrapeRequest::Intent { .. }, Operation::Export(ExportFormat::Pdf)) => {
            Ok("api/smart-scrape/export/pdf")
        }
        (ScrapeRequest::Intent { .. }, Operation::SemanticSearch) => Ok("api/smart-scrape/search"),
        (ScrapeRequest::Selector { .. }, unsupported)
        | (ScrapeRequest::Intent { .. }, unsupported @ Operation::Summarize) => {
            Err(ScrapeError::Unsupported(unsupported.name()))
        }
    }
}

/// File name to save an export under: the sanitized suggestion from
/// `Content-Disposition`, or the format's default
fn export_filename(disposition: Option<&str>, format: ExportFormat) -> String {
    disposition
        .and_then(filename_from_content_disposition)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format.default_filename().to_string())
}

/// reqwest client for the scraping backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        ::log::debug!("HTTP backend at {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ScrapeError> {
        self.base_url
            .join(path)
            .map_err(|e| ScrapeError::Request(format!("invalid endpoint {path}: {e}")))
    }

    /// POST a JSON body and fail on any non-success status
    async fn post<B>(&self, path: &str, body: &B) -> Result<Response, ScrapeError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        ::log::debug!("POST {}", url);

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            ::log::warn!("Backend answered {} for {}", status, path);
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

impl ScrapeBackend for HttpBackend {
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ScrapeError> {
        let path = route(request, Operation::Scrape)?;
        let response = self.post(path, request).await?;

        let result: ScrapeResult = match request {
            ScrapeRequest::Selector { .. } => {
                let entries: Vec<LegacyEntry> = response.json().await?;
                ScrapeResult::from_legacy(entries)
            }
            ScrapeRequest::Intent { .. } => response.json().await?,
        };

        ::log::info!(
            "Received {} pages with {} items from {}",
            result.total_pages(),
            result.total_items(),
            request.target_url()
        );
        Ok(result)
    }

    async fn summarize(&self, request: &ScrapeRequest) -> Result<String, ScrapeError> {
        let path = route(request, Operation::Summarize)?;
        let response = self.post(path, request).await?;
        Ok(response.text().await?)
    }

    async fn export(
        &self,
        request: &ScrapeRequest,
        format: ExportFormat,
    ) -> Result<ExportPayload, ScrapeError> {
        let path = route(request, Operation::Export(format))?;
        let response = self.post(path, request).await?;

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok());
        let filename = export_filename(disposition, format);

        let bytes = response.bytes().await?.to_vec();
        ::log::info!("Downloaded {} export '{}' ({} bytes)", format, filename, bytes.len());

        Ok(ExportPayload { filename, bytes })
    }

    async fn semantic_search(
        &self,
        request: &ScrapeRequest,
        query: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        let path = route(request, Operation::SemanticSearch)?;
        let response = self.post(path, &json!({ "query": query })).await?;
        Ok(response.json().await?)
    }
}
