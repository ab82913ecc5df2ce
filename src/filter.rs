use crate::results::Row;

/// Case-insensitive substring search over rows.
///
/// A row matches when its content, its kind's display name, or its page
/// contains the search term. The term is used literally: it is not trimmed
/// and has no pattern syntax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    needle: String,
}

impl RowQuery {
    /// Create a query from a raw search term
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    /// True when the query keeps every row
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Determine if a row should be kept
    pub fn matches(&self, row: &Row) -> bool {
        if self.is_empty() {
            return true;
        }

        row.content.to_lowercase().contains(&self.needle)
            || row.kind.display_name().to_lowercase().contains(&self.needle)
            || row.page.to_lowercase().contains(&self.needle)
    }
}

/// Rows matching `term`, in their original order
pub fn filter_rows<'a>(rows: &'a [Row], term: &str) -> Vec<&'a Row> {
    let query = RowQuery::new(term);
    rows.iter().filter(|row| query.matches(row)).collect()
}

/// Positions of the rows matching `term`, in ascending order
pub fn matching_indices(rows: &[Row], term: &str) -> Vec<usize> {
    let query = RowQuery::new(term);
    if query.is_empty() {
        return (0..rows.len()).collect();
    }

    let indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| query.matches(row))
        .map(|(i, _)| i)
        .collect();

    ::log::debug!(
        "Search '{}' matched {} of {} rows",
        term,
        indices.len(),
        rows.len()
    );
    indices
}
