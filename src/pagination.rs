//! Windowed page numbers for pagination controls.

use serde::Serialize;

/// Page numbers to show around `current_page`; `None` marks a gap.
///
/// Keeps `left_edge` pages at the start, `right_edge` at the end and the
/// given number of neighbours on each side of the current page.
pub fn page_window(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;
    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);
    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One entry of the pagination control.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PageLink {
    /// `None` renders as an ellipsis.
    pub number: Option<usize>,
    pub href: Option<String>,
    pub current: bool,
}

/// Builds the pagination control, asking `href_for` for each page's URL.
pub fn page_links<F>(total_pages: usize, current_page: usize, href_for: F) -> Vec<PageLink>
where
    F: Fn(usize) -> String,
{
    page_window(total_pages, current_page, 2, 2, 2, 2)
        .into_iter()
        .map(|number| PageLink {
            number,
            href: number.map(&href_for),
            current: number == Some(current_page),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pages_for_empty_result() {
        assert!(page_window(0, 1, 2, 2, 2, 2).is_empty());
    }

    #[test]
    fn short_lists_have_no_gaps() {
        assert_eq!(
            page_window(4, 2, 2, 2, 2, 2),
            vec![Some(1), Some(2), Some(3), Some(4)]
        );
    }

    #[test]
    fn long_lists_collapse_into_gaps() {
        assert_eq!(
            page_window(20, 10, 2, 2, 2, 2),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(19),
                Some(20)
            ]
        );
    }

    #[test]
    fn links_mark_current_page() {
        let links = page_links(3, 2, |n| format!("/companies?current={n}"));
        assert_eq!(links.len(), 3);
        assert!(links[1].current);
        assert_eq!(links[2].href.as_deref(), Some("/companies?current=3"));
    }
}
