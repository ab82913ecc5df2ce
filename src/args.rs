use clap::{Parser, ValueEnum};
use scrape_rows::{ExportFormat, ScrapeRequest};

#[derive(Parser, Debug)]
#[command(name = "scrape-rows")]
#[command(about = "Scrape a page through the extraction backend and browse the rows")]
#[command(version)]
pub struct Args {
    /// Page to scrape
    pub url: String,

    /// CSS selector to extract
    #[arg(short, long, conflicts_with = "prompt", required_unless_present = "prompt")]
    pub selector: Option<String>,

    /// Free-text description of what to extract
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Crawl depth for prompt-based scrapes
    #[arg(long, requires = "prompt")]
    pub max_depth: Option<u32>,

    /// Disable AI refinement of the prompt
    #[arg(long, requires = "prompt")]
    pub no_ai: bool,

    /// Only show rows containing this text
    #[arg(long)]
    pub search: Option<String>,

    /// Page of results to show
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (overrides the config file)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Fetch and print an AI summary
    #[arg(long)]
    pub summary: bool,

    /// Download an export of the scrape
    #[arg(long, value_enum)]
    pub export: Option<ExportArg>,

    /// Directory to write exports to (overrides the config file)
    #[arg(long)]
    pub out: Option<String>,

    /// Semantic search over the scraped content (prompt-based scrapes only)
    #[arg(long)]
    pub semantic: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Backend base URL (overrides config file and environment)
    #[arg(long)]
    pub backend_url: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportArg {
    Csv,
    Pdf,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Csv => ExportFormat::Csv,
            ExportArg::Pdf => ExportFormat::Pdf,
        }
    }
}

impl Args {
    /// Build the backend request from the command-line arguments
    pub fn scrape_request(&self) -> ScrapeRequest {
        match (&self.selector, &self.prompt) {
            (_, Some(prompt)) => ScrapeRequest::Intent {
                target_url: self.url.clone(),
                user_prompt: prompt.clone(),
                max_depth: self.max_depth,
                use_ai: !self.no_ai,
            },
            (Some(selector), None) => ScrapeRequest::selector(self.url.clone(), selector.clone()),
            (None, None) => ScrapeRequest::selector(self.url.clone(), String::new()),
        }
    }
}
