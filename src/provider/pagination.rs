//! Pagination resolver.
//!
//! Category-filtered section listings routinely report a large page count
//! whose leading pages are all empty, because the server counts the
//! unfiltered thread set. Rather than showing the user page after page of
//! nothing, the resolver binary-searches `[1, total_pages]` for the first
//! page that actually has content (O(log n) fetches) and then presents a
//! renumbered local page space starting there.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::wire::RawThread;

/// Outcome of a successful first-content-page search: the page number and
/// the items of that page, so the caller does not fetch it a second time.
#[derive(Debug)]
pub struct FirstContentPage {
    pub page: u32,
    pub items: Vec<RawThread>,
}

/// Binary-search `[1, total_pages]` for the earliest non-empty page.
///
/// `probe` fetches one page and returns its items. A probe that errors is
/// treated as an empty page and the search continues rightward. Returns
/// `None` when no page has content.
pub async fn find_first_content_page<F, Fut>(
    total_pages: u32,
    mut probe: F,
) -> Option<FirstContentPage>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<RawThread>, FetchError>>,
{
    let mut left = 1u32;
    let mut right = total_pages;
    let mut best: Option<FirstContentPage> = None;

    while left <= right {
        let mid = left + (right - left + 1) / 2;
        match probe(mid).await {
            Ok(items) if !items.is_empty() => {
                debug!(page = mid, count = items.len(), "probe found content");
                best = Some(FirstContentPage { page: mid, items });
                // keep looking for an even earlier page with content
                right = mid - 1;
            }
            Ok(_) => {
                debug!(page = mid, "probe empty");
                left = mid + 1;
            }
            Err(err) => {
                // an errored probe counts as empty
                warn!(page = mid, error = %err, "probe failed, treating as empty");
                left = mid + 1;
            }
        }
    }

    best
}

/// Total pages of the renumbered local space.
pub fn local_total(real_total: u32, offset: u32) -> u32 {
    real_total.saturating_sub(offset).max(1)
}

/// Map a local page number back to the remote page it stands for.
pub fn to_remote(local_page: u32, offset: u32) -> u32 {
    local_page + offset
}
