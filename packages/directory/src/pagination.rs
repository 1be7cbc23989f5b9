//! Page-number window for the pagination bar.

const MAX_VISIBLE: u32 = 5;

/// One slot in the pagination bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Gap,
}

/// Page buttons to render for `current` of `total` pages.
///
/// Up to five pages are listed outright. Beyond that the first and last
/// pages stay pinned and the pages around `current` are shown, with
/// [`PageItem::Gap`] marking skipped runs:
///
/// - near the start: `1 2 3 4 … N`
/// - near the end: `1 … N-3 N-2 N-1 N`
/// - in the middle: `1 … c-1 c c+1 … N`
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total <= MAX_VISIBLE {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let mut items = Vec::with_capacity(7);
    if current <= 3 {
        items.extend((1..=4).map(PageItem::Page));
        items.push(PageItem::Gap);
        items.push(PageItem::Page(total));
    } else if current >= total - 2 {
        items.push(PageItem::Page(1));
        items.push(PageItem::Gap);
        items.extend((total - 3..=total).map(PageItem::Page));
    } else {
        items.push(PageItem::Page(1));
        items.push(PageItem::Gap);
        items.extend((current - 1..=current + 1).map(PageItem::Page));
        items.push(PageItem::Gap);
        items.push(PageItem::Page(total));
    }
    items
}
