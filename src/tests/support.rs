//! Fake backends shared by the scenario tests.

use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::backend::ScrapeBackend;
use crate::error::ScrapeError;
use crate::request::{ExportFormat, ExportPayload, ScrapeRequest};
use crate::results::{PageContent, RowKind, ScrapeResult};

/// Two pages of 15 paragraphs each; paragraphs 4, 9 and 14 of the second
/// page mention "needle"
pub fn two_page_result() -> ScrapeResult {
    let first: Vec<String> = (1..=15).map(|i| format!("alpha paragraph {i}")).collect();
    let second: Vec<String> = (1..=15)
        .map(|i| {
            if i % 5 == 4 {
                format!("beta paragraph {i} with a needle")
            } else {
                format!("beta paragraph {i}")
            }
        })
        .collect();

    ScrapeResult::new(vec![
        PageContent::new("https://site.test/one").with(RowKind::Paragraph, first),
        PageContent::new("https://site.test/two").with(RowKind::Paragraph, second),
    ])
}

/// Backend answering every call from canned values
#[derive(Default)]
pub struct CannedBackend {
    pub scrape: Option<Result<ScrapeResult, ScrapeError>>,
    pub summary: Option<Result<String, ScrapeError>>,
    pub export: Option<Result<ExportPayload, ScrapeError>>,
    pub matches: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl CannedBackend {
    pub fn returning(result: ScrapeResult) -> Self {
        Self {
            scrape: Some(Ok(result)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ScrapeBackend for CannedBackend {
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ScrapeError> {
        self.record(format!("scrape {}", request.target_url()));
        self.scrape
            .clone()
            .unwrap_or_else(|| Err(ScrapeError::Request("no canned scrape".into())))
    }

    async fn summarize(&self, request: &ScrapeRequest) -> Result<String, ScrapeError> {
        self.record(format!("summarize {}", request.target_url()));
        self.summary
            .clone()
            .unwrap_or_else(|| Err(ScrapeError::Request("no canned summary".into())))
    }

    async fn export(
        &self,
        request: &ScrapeRequest,
        format: ExportFormat,
    ) -> Result<ExportPayload, ScrapeError> {
        self.record(format!("export {} {}", format, request.target_url()));
        self.export
            .clone()
            .unwrap_or_else(|| Err(ScrapeError::Request("no canned export".into())))
    }

    async fn semantic_search(
        &self,
        request: &ScrapeRequest,
        query: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        self.record(format!("search {} {}", query, request.target_url()));
        match request {
            ScrapeRequest::Selector { .. } => Err(ScrapeError::Unsupported("semantic search")),
            ScrapeRequest::Intent { .. } => Ok(self.matches.clone()),
        }
    }
}

/// Backend whose scrapes block until the test releases them, keyed by URL
#[derive(Default)]
pub struct GatedBackend {
    gates: Mutex<HashMap<String, oneshot::Sender<Result<ScrapeResult, ScrapeError>>>>,
}

impl GatedBackend {
    pub fn is_waiting(&self, url: &str) -> bool {
        self.gates.lock().unwrap().contains_key(url)
    }

    /// Yield until a scrape for `url` is parked on its gate
    pub async fn wait_for(&self, url: &str) {
        while !self.is_waiting(url) {
            tokio::task::yield_now().await;
        }
    }

    pub fn release(&self, url: &str, outcome: Result<ScrapeResult, ScrapeError>) {
        let gate = self.gates.lock().unwrap().remove(url);
        if let Some(tx) = gate {
            let _ = tx.send(outcome);
        }
    }
}

impl ScrapeBackend for GatedBackend {
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ScrapeError> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(request.target_url().to_string(), tx);
        rx.await
            .unwrap_or_else(|_| Err(ScrapeError::Request("gate dropped".into())))
    }

    async fn summarize(&self, _request: &ScrapeRequest) -> Result<String, ScrapeError> {
        Err(ScrapeError::Unsupported("summary"))
    }

    async fn export(
        &self,
        _request: &ScrapeRequest,
        _format: ExportFormat,
    ) -> Result<ExportPayload, ScrapeError> {
        Err(ScrapeError::Unsupported("export"))
    }

    async fn semantic_search(
        &self,
        _request: &ScrapeRequest,
        _query: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        Ok(Vec::new())
    }
}
