use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of one scrape, in either of the two shapes the backend accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeRequest {
    /// Extract the elements matched by a CSS selector
    Selector { url: String, selector: String },

    /// Let the backend interpret a free-text extraction intent
    #[serde(rename_all = "camelCase")]
    Intent {
        target_url: String,
        user_prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_depth: Option<u32>,
        #[serde(default = "default_use_ai")]
        use_ai: bool,
    },
}

/// AI refinement is on unless explicitly disabled
fn default_use_ai() -> bool {
    true
}

impl ScrapeRequest {
    pub fn selector(url: impl Into<String>, selector: impl Into<String>) -> Self {
        ScrapeRequest::Selector {
            url: url.into(),
            selector: selector.into(),
        }
    }

    pub fn intent(target_url: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        ScrapeRequest::Intent {
            target_url: target_url.into(),
            user_prompt: user_prompt.into(),
            max_depth: None,
            use_ai: default_use_ai(),
        }
    }

    /// The page the scrape starts from
    pub fn target_url(&self) -> &str {
        match self {
            ScrapeRequest::Selector { url, .. } => url,
            ScrapeRequest::Intent { target_url, .. } => target_url,
        }
    }
}

/// File formats the backend can export a scrape to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    /// Path segment of the export endpoint
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Filename used when the backend does not suggest one
    pub fn default_filename(self) -> &'static str {
        match self {
            ExportFormat::Csv => "scrape-results.csv",
            ExportFormat::Pdf => "web_intelligence_report.pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary export payload, ready to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}
