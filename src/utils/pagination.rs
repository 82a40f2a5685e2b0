//! Page arithmetic for the event tables.
//!
//! Pages are 1-based. The server speaks in `offset`/`limit`, the tables in
//! page numbers.

/// Pages on either side of the current one shown in the bar.
const SIDE_PAGES: u32 = 1;
/// Beyond this distance from either end an ellipsis replaces skipped pages.
const SHOW_PAGES: u32 = 3;

/// Offset of the first event of `page`. Page 0 is treated as page 1.
pub fn offset_for_page(page: u32, page_size: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(page_size)
}

/// Number of pages needed for `total` events, never less than one so an empty
/// table still has a page to show.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, active: bool },
    Ellipsis,
}

/// Items of a pagination bar: first page, a window around the current page,
/// last page, with ellipses standing in for skipped runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationBar {
    pub current: u32,
    pub total_pages: u32,
    pub items: Vec<PageItem>,
}

impl PaginationBar {
    pub fn new(current: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        let current = current.clamp(1, total_pages);
        Self {
            current,
            total_pages,
            items: pagination_items(current, total_pages),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }
}

pub fn pagination_items(current: u32, total_pages: u32) -> Vec<PageItem> {
    let page = |number: u32| PageItem::Page {
        number,
        active: number == current,
    };

    let mut items = vec![page(1)];

    if current > SHOW_PAGES {
        items.push(PageItem::Ellipsis);
    }

    let start = current.saturating_sub(SIDE_PAGES).max(2);
    let end = current
        .saturating_add(SIDE_PAGES)
        .min(total_pages.saturating_sub(1));
    items.extend((start..=end).map(page));

    if current < total_pages.saturating_sub(SHOW_PAGES - 1) {
        items.push(PageItem::Ellipsis);
    }

    if total_pages > 1 {
        items.push(page(total_pages));
    }

    items
}
