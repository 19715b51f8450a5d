//! The snapshot of one navigable screen.

use crate::filter::AuthorFilter;
use crate::models::{ContentKind, ContentTarget, Item, PageResult, PaginationControl};
use crate::render;

use super::selection::{self, Remembered};

/// One screen: the target it shows, the fetched page, the composed display
/// rows and the suggested selection.
///
/// A `ViewState` is created per navigation action and replaced wholesale;
/// it is never mutated in place except to stamp the selection the user left
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub target: ContentTarget,
    pub page_result: PageResult,
    /// Content items followed by the pagination control rows.
    pub rows: Vec<Item>,
    pub selected: Option<usize>,
    pub title: String,
    pub(crate) remembered: Option<Remembered>,
}

impl ViewState {
    /// A freshly navigated view: first content row selected.
    pub(crate) fn fresh(target: ContentTarget, page_result: PageResult) -> Self {
        let rows = compose_rows(&page_result, target.kind());
        let selected = selection::first_content_row(&rows);
        let title = render::title_for(&target, &page_result);
        Self {
            target,
            page_result,
            rows,
            selected,
            title,
            remembered: None,
        }
    }

    /// A view rebuilt on the way back: selection restored from memory.
    pub(crate) fn restored(
        target: ContentTarget,
        page_result: PageResult,
        remembered: Option<&Remembered>,
    ) -> Self {
        let mut view = Self::fresh(target, page_result);
        view.selected = selection::restore(&view.rows, remembered);
        view
    }

    /// A thread-detail view under an author filter.
    pub(crate) fn filtered(
        target: ContentTarget,
        filtered_page: PageResult,
        filter: &AuthorFilter,
    ) -> Self {
        let mut view = Self::fresh(target, filtered_page);
        view.title = render::paged(
            format!(
                "{} (posts by {})",
                view.page_result
                    .title
                    .clone()
                    .unwrap_or_else(|| "Thread".to_string()),
                filter.username
            ),
            &view.page_result,
        );
        view
    }

    pub fn kind(&self) -> ContentKind {
        self.target.kind()
    }

    /// Stamp the row being activated, so returning here can land on it.
    pub(crate) fn remember(&mut self, index: usize) {
        self.selected = Some(index);
        self.remembered = Some(Remembered {
            index,
            stable_id: self.rows.get(index).and_then(Item::stable_id),
        });
    }
}

/// Compose display rows: the page's content plus inline pagination
/// controls. Message views have no pagination on this forum.
pub(crate) fn compose_rows(pr: &PageResult, kind: ContentKind) -> Vec<Item> {
    let mut rows = pr.items.clone();
    if matches!(kind, ContentKind::MessageList | ContentKind::MessageDetail) {
        return rows;
    }
    if pr.page > 1 {
        rows.push(Item::Pagination(PaginationControl::Prev { page: pr.page - 1 }));
    }
    if pr.page < pr.total_pages {
        rows.push(Item::Pagination(PaginationControl::Next { page: pr.page + 1 }));
    }
    rows.push(Item::Pagination(PaginationControl::Jump {
        page: pr.page,
        total: pr.total_pages,
    }));
    if kind == ContentKind::ThreadDetail {
        rows.push(Item::Pagination(PaginationControl::Reply));
    }
    rows
}
