use crate::results::{Row, RowKind, ScrapeResult};

/// Flattens a page-grouped scrape result into an ordered row sequence.
///
/// Pages keep their input order. Within a page, headings come first, then
/// paragraphs, links and images, each in input order. An absent result or
/// absent pages yield no rows.
pub fn flatten(result: Option<&ScrapeResult>) -> Vec<Row> {
    let Some(result) = result else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(result.total_items());
    for page in result.pages() {
        for kind in RowKind::ALL {
            rows.extend(
                page.items(kind)
                    .iter()
                    .map(|item| Row::new(page.page_url.as_str(), kind, item.as_str())),
            );
        }
    }

    ::log::debug!(
        "Flattened {} pages into {} rows",
        result.total_pages(),
        rows.len()
    );
    rows
}
