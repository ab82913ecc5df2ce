use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::ScrapeBackend;
use crate::config::ClientConfig;
use crate::error::ScrapeError;
use crate::request::{ExportFormat, ExportPayload, ScrapeRequest};
use crate::session::{ResultSession, Transition};

/// Drives a [`ResultSession`] against a scrape backend.
///
/// The session lock is only held while applying an event, never across a
/// backend call, so reads stay available while a request is in flight.
pub struct ScrapeController<B> {
    backend: B,
    session: Arc<Mutex<ResultSession>>,
}

impl<B: ScrapeBackend> ScrapeController<B> {
    pub fn new(backend: B, session: ResultSession) -> Self {
        Self {
            backend,
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Create a controller with a fresh session sized from configuration
    pub fn from_config(backend: B, config: &ClientConfig) -> Self {
        Self::new(
            backend,
            ResultSession::new(config.page_size, config.race_policy),
        )
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shared handle to the session, for readers outside the controller
    pub fn session(&self) -> Arc<Mutex<ResultSession>> {
        Arc::clone(&self.session)
    }

    /// Run a closure against the current session state
    pub async fn with_session<R>(&self, read: impl FnOnce(&ResultSession) -> R) -> R {
        let session = self.session.lock().await;
        read(&session)
    }

    /// Start a scrape and settle the session with its outcome.
    ///
    /// Returns `Superseded` when a newer scrape (or a clear) took over the
    /// session while this one was in flight.
    pub async fn scrape(&self, request: ScrapeRequest) -> Result<Transition, ScrapeError> {
        let ticket = self.session.lock().await.begin_scrape(request.clone());
        let outcome = self.backend.scrape(&request).await;
        self.session.lock().await.complete_scrape(ticket, outcome)
    }

    /// Fetch an AI summary for the displayed result and attach it.
    ///
    /// A result that arrived with its summary is left as is and the backend
    /// is not called. A failed summary leaves the displayed rows untouched.
    pub async fn summarize(&self) -> Result<Transition, ScrapeError> {
        let (ticket, request) = {
            let session = self.session.lock().await;
            let ticket = session.live_ticket().ok_or(ScrapeError::NoActiveRequest)?;
            if session.summary().is_some() {
                ::log::debug!("Summary for {:?} already attached", ticket);
                return Ok(Transition::Applied);
            }
            let request = session
                .active_request()
                .cloned()
                .ok_or(ScrapeError::NoActiveRequest)?;
            (ticket, request)
        };

        let summary = self.backend.summarize(&request).await.inspect_err(|e| {
            ::log::warn!("Summary failed: {}", e);
        })?;
        Ok(self.session.lock().await.attach_summary(ticket, summary))
    }

    /// Ask the backend to export the active request
    pub async fn export(&self, format: ExportFormat) -> Result<ExportPayload, ScrapeError> {
        let request = self.active_request().await?;
        self.backend.export(&request, format).await.inspect_err(|e| {
            ::log::warn!("{} export failed: {}", format, e);
        })
    }

    /// Semantic search over the content the backend indexed for the active request.
    ///
    /// A blank query returns nothing without calling the backend.
    pub async fn semantic_search(&self, query: &str) -> Result<Vec<String>, ScrapeError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let request = self.active_request().await?;
        self.backend.semantic_search(&request, query).await
    }

    pub async fn search(&self, term: impl Into<String>) -> Transition {
        self.session.lock().await.set_search_term(term)
    }

    pub async fn goto_page(&self, page_number: usize) -> Transition {
        self.session.lock().await.set_page(page_number)
    }

    pub async fn clear(&self) -> Transition {
        self.session.lock().await.clear()
    }

    async fn active_request(&self) -> Result<ScrapeRequest, ScrapeError> {
        self.session
            .lock()
            .await
            .active_request()
            .cloned()
            .ok_or(ScrapeError::NoActiveRequest)
    }
}
