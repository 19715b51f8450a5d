//! Author filter overlay for thread-detail pages.
//!
//! The filter is purely client-side: each fetched page is subset to the
//! target author's floors. Floor numbers were assigned globally when the
//! page was normalized, so the filtered view keeps the original numbering
//! instead of renumbering the subset. A filtered page with no matching
//! floors renders as zero rows; there is no auto-skip here.

use crate::models::{Item, PageResult, PostFloor};

/// The author a thread-detail view is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorFilter {
    pub uid: u64,
    pub username: String,
}

impl AuthorFilter {
    pub fn new(uid: u64, username: impl Into<String>) -> Self {
        Self {
            uid,
            username: username.into(),
        }
    }

    /// Match by uid when the post carries one, by username otherwise.
    pub fn matches(&self, post: &PostFloor) -> bool {
        if self.uid != 0 && post.author_uid != 0 {
            post.author_uid == self.uid
        } else {
            post.author == self.username
        }
    }

    /// Subset a fetched page to this author's floors, keeping the page's
    /// pagination intact.
    pub fn apply(&self, page: &PageResult) -> PageResult {
        let items = page
            .items
            .iter()
            .filter(|item| match item {
                Item::Post(post) => self.matches(post),
                _ => false,
            })
            .cloned()
            .collect();
        PageResult {
            items,
            ..page.clone()
        }
    }
}
