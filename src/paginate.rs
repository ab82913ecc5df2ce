/// Default number of rows shown per page
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// One page worth of items plus the total page count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on the requested page; empty when the page is out of range
    pub visible: &'a [T],
    /// Number of pages, never less than 1
    pub total_pages: usize,
}

/// Number of pages needed for `len` items, with a floor of one page
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slice out the 1-based `page_number` of `items`.
///
/// No clamping happens here: a page outside `[1, total_pages]` yields an
/// empty slice. A page size of 0 is treated as 1.
pub fn paginate<T>(items: &[T], page_number: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);

    let visible = match page_number.checked_sub(1) {
        Some(offset) => {
            let start = offset.saturating_mul(page_size).min(items.len());
            let end = start.saturating_add(page_size).min(items.len());
            &items[start..end]
        }
        None => &items[..0],
    };

    Page {
        visible,
        total_pages,
    }
}
