// Re-export modules
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod paginate;
pub mod request;
pub mod results;
pub mod session;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use backend::{HttpBackend, ScrapeBackend};
pub use config::ClientConfig;
pub use controller::ScrapeController;
pub use error::{ConfigError, ScrapeError};
pub use filter::filter_rows;
pub use flatten::flatten;
pub use paginate::{Page, paginate};
pub use request::{ExportFormat, ExportPayload, ScrapeRequest};
pub use results::{PageContent, Row, RowKind, ScrapeResult};
pub use session::{RacePolicy, ResultSession, SessionState, SessionView, Transition};
