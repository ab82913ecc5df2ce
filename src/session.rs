//! Result session: the single owner of one scrape interaction.
//!
//! The session holds the raw [`ScrapeResult`], the rows flattened from it,
//! the query state, and the bookkeeping for in-flight requests. Every change
//! goes through [`ResultSession::handle`], which re-runs the
//! flatten → filter → paginate pipeline before returning, so a reader never
//! sees a page number outside `[1, total_pages]`.

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::filter::matching_indices;
use crate::flatten::flatten;
use crate::paginate::{self, DEFAULT_PAGE_SIZE};
use crate::request::ScrapeRequest;
use crate::results::{Row, ScrapeResult};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No result and nothing in flight
    Idle,
    /// A scrape request has been issued and not yet settled
    Loading,
    /// A result is held and can be searched and paged
    Ready,
}

/// Which response settles the session when several scrapes overlap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RacePolicy {
    /// Only the most recently started request may settle the session
    #[default]
    LatestWins,
    /// Any request started since the last clear may settle the session;
    /// whichever resolves last replaces the displayed result
    LastResolvedWins,
}

/// Identifies one scrape request issued by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Search and pagination state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    /// 1-based
    pub page_number: usize,
    pub page_size: usize,
}

impl QueryState {
    fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            page_number: 1,
            page_size: page_size.max(1),
        }
    }
}

/// Inputs to the session state machine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StartScrape(ScrapeRequest),
    ScrapeCompleted {
        ticket: RequestTicket,
        outcome: Result<ScrapeResult, ScrapeError>,
    },
    SummaryReady {
        ticket: RequestTicket,
        summary: String,
    },
    SetSearchTerm(String),
    SetPage(usize),
    Clear,
}

/// What an event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A scrape was started under this ticket
    Started(RequestTicket),
    /// The event changed the session
    Applied,
    /// The event was not meaningful in the current state and changed nothing
    Ignored,
    /// The event belonged to a request that no longer owns the session
    Superseded,
}

/// Read-only snapshot of what the presentation layer shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView<'a> {
    pub state: SessionState,
    pub visible: Vec<&'a Row>,
    pub page_number: usize,
    pub total_pages: usize,
    /// Rows left after the search filter
    pub matched_rows: usize,
    /// Rows before the search filter
    pub total_rows: usize,
    pub search_term: &'a str,
    pub summary: Option<&'a str>,
    pub error: Option<&'a ScrapeError>,
}

#[derive(Debug)]
pub struct ResultSession {
    state: SessionState,
    policy: RacePolicy,

    // ticket bookkeeping
    last_issued: u64,
    pending: Vec<(RequestTicket, ScrapeRequest)>,
    displayed: Option<(RequestTicket, ScrapeRequest)>,

    result: Option<ScrapeResult>,
    rows: Vec<Row>,
    query: QueryState,
    filtered: Vec<usize>,
    total_pages: usize,
    last_error: Option<ScrapeError>,
}

impl Default for ResultSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, RacePolicy::default())
    }
}

impl ResultSession {
    pub fn new(page_size: usize, policy: RacePolicy) -> Self {
        Self {
            state: SessionState::Idle,
            policy,
            last_issued: 0,
            pending: Vec::new(),
            displayed: None,
            result: None,
            rows: Vec::new(),
            query: QueryState::new(page_size),
            filtered: Vec::new(),
            total_pages: 1,
            last_error: None,
        }
    }

    /// Apply one event. This is the only place session state changes.
    ///
    /// A scrape failure that settles the session moves it to
    /// [`SessionState::Idle`] and is returned as `Err`. Every other outcome,
    /// including ignored navigation and superseded responses, is `Ok`.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Transition, ScrapeError> {
        let transition = match event {
            SessionEvent::StartScrape(request) => self.on_start(request),
            SessionEvent::ScrapeCompleted { ticket, outcome } => {
                self.on_completed(ticket, outcome)?
            }
            SessionEvent::SummaryReady { ticket, summary } => self.on_summary(ticket, summary),
            SessionEvent::SetSearchTerm(term) => self.on_search(term),
            SessionEvent::SetPage(page_number) => self.on_page(page_number),
            SessionEvent::Clear => self.on_clear(),
        };

        ::log::trace!("Session now {:?} after {:?}", self.state, transition);
        Ok(transition)
    }

    /// Start a scrape, discarding whatever the session held before
    pub fn begin_scrape(&mut self, request: ScrapeRequest) -> RequestTicket {
        match self.handle(SessionEvent::StartScrape(request)) {
            Ok(Transition::Started(ticket)) => ticket,
            // on_start only ever yields Started; the newest ticket is the one it issued
            other => {
                ::log::error!("Starting a scrape produced {:?}", other);
                RequestTicket(self.last_issued)
            }
        }
    }

    pub fn complete_scrape(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<ScrapeResult, ScrapeError>,
    ) -> Result<Transition, ScrapeError> {
        self.handle(SessionEvent::ScrapeCompleted { ticket, outcome })
    }

    pub fn attach_summary(&mut self, ticket: RequestTicket, summary: String) -> Transition {
        self.handle_infallible(SessionEvent::SummaryReady { ticket, summary })
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) -> Transition {
        self.handle_infallible(SessionEvent::SetSearchTerm(term.into()))
    }

    pub fn set_page(&mut self, page_number: usize) -> Transition {
        self.handle_infallible(SessionEvent::SetPage(page_number))
    }

    pub fn clear(&mut self) -> Transition {
        self.handle_infallible(SessionEvent::Clear)
    }

    fn handle_infallible(&mut self, event: SessionEvent) -> Transition {
        self.handle(event).unwrap_or(Transition::Ignored)
    }

    fn on_start(&mut self, request: ScrapeRequest) -> Transition {
        self.last_issued += 1;
        let ticket = RequestTicket(self.last_issued);

        if self.policy == RacePolicy::LatestWins && !self.pending.is_empty() {
            ::log::debug!(
                "Superseding {} in-flight scrape(s) with {:?}",
                self.pending.len(),
                ticket
            );
            self.pending.clear();
        }
        ::log::info!("Starting scrape {:?} for {}", ticket, request.target_url());
        self.pending.push((ticket, request));

        self.discard_result();
        self.state = SessionState::Loading;
        self.recompute();
        Transition::Started(ticket)
    }

    fn on_completed(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<ScrapeResult, ScrapeError>,
    ) -> Result<Transition, ScrapeError> {
        let Some(slot) = self.pending.iter().position(|(t, _)| *t == ticket) else {
            ::log::warn!("Discarding response for stale scrape {:?}", ticket);
            return Ok(Transition::Superseded);
        };
        let (_, request) = self.pending.remove(slot);
        match outcome {
            Ok(result) => {
                self.discard_result();
                self.rows = flatten(Some(&result));
                self.result = Some(result);
                self.displayed = Some((ticket, request));
                self.state = SessionState::Ready;
                self.recompute();
                ::log::info!(
                    "Scrape {:?} ready with {} rows over {} pages",
                    ticket,
                    self.rows.len(),
                    self.total_pages
                );
                Ok(Transition::Applied)
            }
            Err(error) if self.state == SessionState::Loading => {
                ::log::error!("Scrape {:?} failed: {}", ticket, error);
                self.discard_result();
                if self.pending.is_empty() {
                    self.state = SessionState::Idle;
                }
                self.last_error = Some(error.clone());
                self.recompute();
                Err(error)
            }
            Err(error) => {
                ::log::warn!(
                    "Scrape {:?} failed after the session settled: {}",
                    ticket,
                    error
                );
                Ok(Transition::Superseded)
            }
        }
    }

    fn on_summary(&mut self, ticket: RequestTicket, summary: String) -> Transition {
        let owns_session = matches!(&self.displayed, Some((t, _)) if *t == ticket);
        match (&mut self.result, owns_session) {
            (Some(result), true) => {
                result.summary = Some(summary);
                Transition::Applied
            }
            _ => {
                ::log::debug!("Discarding summary for {:?}", ticket);
                Transition::Superseded
            }
        }
    }

    fn on_search(&mut self, term: String) -> Transition {
        if self.state != SessionState::Ready {
            return Transition::Ignored;
        }
        self.query.search_term = term;
        self.query.page_number = 1;
        self.recompute();
        Transition::Applied
    }

    fn on_page(&mut self, page_number: usize) -> Transition {
        if self.state != SessionState::Ready || !(1..=self.total_pages).contains(&page_number) {
            ::log::debug!(
                "Ignoring navigation to page {} of {}",
                page_number,
                self.total_pages
            );
            return Transition::Ignored;
        }
        self.query.page_number = page_number;
        Transition::Applied
    }

    fn on_clear(&mut self) -> Transition {
        // Responses for tickets no longer pending are reported as superseded
        self.pending.clear();
        self.discard_result();
        self.state = SessionState::Idle;
        self.recompute();
        Transition::Applied
    }

    /// Drop the result and everything derived from it
    fn discard_result(&mut self) {
        self.result = None;
        self.displayed = None;
        self.rows.clear();
        self.query = QueryState::new(self.query.page_size);
        self.last_error = None;
    }

    /// Bring filtered rows, page count and page number back in line
    fn recompute(&mut self) {
        self.filtered = matching_indices(&self.rows, &self.query.search_term);
        self.total_pages = paginate::total_pages(self.filtered.len(), self.query.page_size);
        self.query.page_number = self.query.page_number.clamp(1, self.total_pages);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn policy(&self) -> RacePolicy {
        self.policy
    }

    pub fn result(&self) -> Option<&ScrapeResult> {
        self.result.as_ref()
    }

    /// Every row of the current result, unfiltered
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filtered_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.filtered.iter().map(|&i| &self.rows[i])
    }

    /// Rows on the current page
    pub fn visible_rows(&self) -> Vec<&Row> {
        paginate::paginate(&self.filtered, self.query.page_number, self.query.page_size)
            .visible
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page_number(&self) -> usize {
        self.query.page_number
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn summary(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.summary.as_deref())
    }

    /// Summary split into display lines
    pub fn summary_lines(&self) -> Vec<&str> {
        self.summary()
            .map(|s| s.lines().collect())
            .unwrap_or_default()
    }

    pub fn last_error(&self) -> Option<&ScrapeError> {
        self.last_error.as_ref()
    }

    /// Ticket of the displayed result, if any
    pub fn live_ticket(&self) -> Option<RequestTicket> {
        self.displayed.as_ref().map(|(ticket, _)| *ticket)
    }

    /// Parameters to resend for export or summary: those of the displayed
    /// result, or of the newest in-flight scrape while loading
    pub fn active_request(&self) -> Option<&ScrapeRequest> {
        match self.state {
            SessionState::Ready => self.displayed.as_ref().map(|(_, r)| r),
            SessionState::Loading => self.pending.last().map(|(_, r)| r),
            SessionState::Idle => None,
        }
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            state: self.state,
            visible: self.visible_rows(),
            page_number: self.query.page_number,
            total_pages: self.total_pages,
            matched_rows: self.filtered.len(),
            total_rows: self.rows.len(),
            search_term: &self.query.search_term,
            summary: self.summary(),
            error: self.last_error.as_ref(),
        }
    }
}
