use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The kind of extracted content a row carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKind {
    Heading,
    Paragraph,
    Link,
    Image,
}

impl RowKind {
    /// All kinds, in the order they are emitted for a page
    pub const ALL: [RowKind; 4] = [
        RowKind::Heading,
        RowKind::Paragraph,
        RowKind::Link,
        RowKind::Image,
    ];

    /// Name shown in the table and matched by search
    pub fn display_name(self) -> &'static str {
        match self {
            RowKind::Heading => "Heading",
            RowKind::Paragraph => "Paragraph",
            RowKind::Link => "Link",
            RowKind::Image => "Image",
        }
    }

    /// Classify an HTML tag name returned by the selector endpoint
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => RowKind::Heading,
            "a" => RowKind::Link,
            "img" => RowKind::Image,
            _ => RowKind::Paragraph,
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One flattened unit of extracted content, tagged with its source page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// URL of the page the content came from
    pub page: String,

    /// What kind of content this is
    #[serde(rename = "type")]
    pub kind: RowKind,

    /// The literal extracted value (text, or a URL for links and images)
    pub content: String,
}

impl Row {
    pub fn new(page: impl Into<String>, kind: RowKind, content: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            kind,
            content: content.into(),
        }
    }
}

/// Extracted content of a single page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// URL of the page
    #[serde(default, deserialize_with = "lenient_text")]
    pub page_url: String,

    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Option::is_none")]
    pub headings: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    /// Position of the page in the crawl, as reported by the backend
    #[serde(default, deserialize_with = "lenient_index", skip_serializing_if = "Option::is_none")]
    pub page_index: Option<usize>,

    /// Whether the backend cut this page short
    #[serde(default, deserialize_with = "lenient_flag")]
    pub truncated: bool,

    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub truncation_reason: Option<String>,

    /// Per-page extraction error reported by the backend
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageContent {
    /// Create an empty page for the given URL
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            ..Self::default()
        }
    }

    /// Replace the items of one content kind
    pub fn with<I, S>(mut self, kind: RowKind, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = Some(items.into_iter().map(Into::into).collect());
        match kind {
            RowKind::Heading => self.headings = items,
            RowKind::Paragraph => self.paragraphs = items,
            RowKind::Link => self.links = items,
            RowKind::Image => self.images = items,
        }
        self
    }

    /// Items of one content kind; an absent sequence reads as empty
    pub fn items(&self, kind: RowKind) -> &[String] {
        let items = match kind {
            RowKind::Heading => &self.headings,
            RowKind::Paragraph => &self.paragraphs,
            RowKind::Link => &self.links,
            RowKind::Image => &self.images,
        };
        items.as_deref().unwrap_or(&[])
    }

    /// Total number of items across all four kinds
    pub fn item_count(&self) -> usize {
        RowKind::ALL.iter().map(|kind| self.items(*kind).len()).sum()
    }
}

/// Structured output of one extraction request, grouped by source page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// Extracted pages; absent when the scrape produced nothing
    #[serde(default, deserialize_with = "lenient_pages", skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<PageContent>>,

    /// AI summary text, attached as-is
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// The backend's reading of the user's extraction intent
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub interpreted_intent: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

impl ScrapeResult {
    pub fn new(pages: Vec<PageContent>) -> Self {
        Self {
            pages: Some(pages),
            ..Self::default()
        }
    }

    /// Pages of the result; absent reads as empty
    pub fn pages(&self) -> &[PageContent] {
        self.pages.as_deref().unwrap_or(&[])
    }

    pub fn total_pages(&self) -> usize {
        self.pages().len()
    }

    pub fn total_items(&self) -> usize {
        self.pages().iter().map(PageContent::item_count).sum()
    }

    /// True if any page was cut short by the backend
    pub fn is_truncated(&self) -> bool {
        self.pages().iter().any(|page| page.truncated)
    }

    /// Build a result from the flat list returned by the selector endpoint.
    ///
    /// Entries are grouped into one page per distinct page title, in the
    /// order titles are first seen. Tags are classified with [`RowKind::from_tag`].
    pub fn from_legacy(entries: Vec<LegacyEntry>) -> Self {
        let mut pages: Vec<PageContent> = Vec::new();
        let mut by_title: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            let slot = *by_title.entry(entry.page_title.clone()).or_insert_with(|| {
                pages.push(PageContent::new(entry.page_title.clone()));
                pages.len() - 1
            });

            let page = &mut pages[slot];
            let items = match RowKind::from_tag(&entry.tag) {
                RowKind::Heading => &mut page.headings,
                RowKind::Paragraph => &mut page.paragraphs,
                RowKind::Link => &mut page.links,
                RowKind::Image => &mut page.images,
            };
            items.get_or_insert_with(Vec::new).push(entry.text);
        }

        ::log::debug!("Grouped legacy entries into {} pages", pages.len());
        Self::new(pages)
    }
}

/// One element of the selector endpoint's flat response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEntry {
    #[serde(default, deserialize_with = "lenient_position")]
    pub index: usize,

    /// Tag name of the matched element (e.g. `p`, `h2`, `a`)
    #[serde(default, deserialize_with = "lenient_text")]
    pub tag: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub page_title: String,
}

/// Render a JSON scalar as text; `null` and containers have no text form
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text).unwrap_or_default())
}

/// Display-only text: anything without a scalar form reads as absent
fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .and_then(|n| usize::try_from(n).ok()))
}

fn lenient_position<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_index(deserializer)?.unwrap_or_default())
}

/// Only a literal `true` sets the flag
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

/// Content sequences degrade to absent instead of failing the whole result
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(scalar_text).collect()),
        Some(Value::Null) | None => None,
        Some(other) => {
            ::log::warn!("Ignoring malformed content sequence: {}", other);
            None
        }
    })
}

fn lenient_pages<'de, D>(deserializer: D) -> Result<Option<Vec<PageContent>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Ok(None),
        Some(other) => {
            ::log::warn!("Ignoring malformed pages field: {}", other);
            return Ok(None);
        }
    };

    let pages = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<PageContent>(item) {
            Ok(page) => Some(page),
            Err(e) => {
                ::log::warn!("Dropping malformed page entry: {}", e);
                None
            }
        })
        .collect();

    Ok(Some(pages))
}
