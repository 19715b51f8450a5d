//! Content provider: turns a [`ContentRequest`] into a normalized
//! [`PageResult`].
//!
//! This is the only layer that both knows the wire shapes and owns a
//! session lookup. It flattens the per-endpoint quirks (reply pairs, the
//! floor numbering of thread pages, reversed message conversations) and
//! drives the pagination resolver for category-filtered listings.

pub mod pagination;

use std::sync::Arc;

use tracing::debug;

use crate::error::{AuthError, FetchError};
use crate::models::{
    CategoryEntry, CategoryFilter, ContentRequest, ContentTarget, Item, MessageThread, PageResult,
    Pager, PostFloor, SectionInfo, ThreadSummary,
};
use crate::traits::{ForumApi, SessionHandle, SessionProvider};
use crate::wire::{page_meta, PageMeta, RawCategory, RawPost, RawReplyPair, RawThread};

use pagination::{find_first_content_page, local_total, to_remote};

/// Replies shown per thread-detail page. The API does not echo a page size,
/// so floor numbers are derived from this fixed value.
pub const POSTS_PER_PAGE: u32 = 20;

/// Fetches and normalizes content for one forum.
pub struct ContentProvider {
    api: Arc<dyn ForumApi>,
    sessions: Arc<dyn SessionProvider>,
    forum_id: String,
}

impl ContentProvider {
    pub fn new(
        api: Arc<dyn ForumApi>,
        sessions: Arc<dyn SessionProvider>,
        forum_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            sessions,
            forum_id: forum_id.into(),
        }
    }

    pub fn forum_id(&self) -> &str {
        &self.forum_id
    }

    fn session(&self) -> Result<SessionHandle, FetchError> {
        self.sessions
            .session(&self.forum_id)
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    /// Fetch a fresh request (local page space starts unshifted).
    pub async fn fetch(&self, request: &ContentRequest) -> Result<PageResult, FetchError> {
        self.fetch_page(&request.target, request.page, None).await
    }

    /// Fetch one local page of a target, carrying forward any established
    /// page-offset context.
    pub async fn fetch_page(
        &self,
        target: &ContentTarget,
        local_page: u32,
        pager: Option<Pager>,
    ) -> Result<PageResult, FetchError> {
        let session = self.session()?;
        debug!(kind = ?target.kind(), page = local_page, "fetching content");

        match target {
            ContentTarget::Section { fid, categories } => {
                self.fetch_section_page(&session, *fid, categories, local_page, pager)
                    .await
            }
            ContentTarget::Home { order } => {
                let payload = self.api.fetch_home(&session, *order, local_page).await?;
                let meta = page_meta(&payload.page_info);
                Ok(list_page(thread_items(payload.threadlist), meta, local_page))
            }
            ContentTarget::UserThreads { uid } => {
                let payload = self
                    .api
                    .fetch_user_threads(&session, *uid, local_page)
                    .await?;
                let meta = page_meta(&payload.page_info);
                Ok(list_page(thread_items(payload.threadlist), meta, local_page))
            }
            ContentTarget::UserPosts { uid } => {
                let payload = self.api.fetch_user_posts(&session, *uid, local_page).await?;
                let meta = page_meta(&payload.page_info);
                let items = payload
                    .threadlist
                    .into_iter()
                    .map(|pair| Item::Thread(flatten_reply_pair(pair)))
                    .collect();
                Ok(list_page(items, meta, local_page))
            }
            ContentTarget::Search { keyword } => {
                let payload = self.api.fetch_search(&session, keyword, local_page).await?;
                let meta = page_meta(&payload.page_info);
                Ok(list_page(thread_items(payload.threadlist), meta, local_page))
            }
            ContentTarget::ThreadDetail { tid } => {
                let payload = self
                    .api
                    .fetch_thread_detail(&session, *tid, local_page)
                    .await?;
                let meta = page_meta(&payload.page_info);
                let items = payload
                    .postlist
                    .into_iter()
                    .enumerate()
                    .map(|(i, post)| Item::Post(post_floor(post, *tid, meta.page, i)))
                    .collect();
                let mut pr = list_page(items, meta, local_page);
                pr.title = payload.thread.map(|t| t.subject);
                Ok(pr)
            }
            ContentTarget::MessageList => {
                let payload = self.api.fetch_message_list(&session).await?;
                let items = payload
                    .messagelist
                    .into_iter()
                    .map(|m| Item::Message(message_thread(m)))
                    .collect();
                Ok(single_page(items))
            }
            ContentTarget::MessageDetail { peer_uid } => {
                let payload = self.api.fetch_message_detail(&session, *peer_uid).await?;
                // the server sends newest first; conversations read oldest first
                let items = payload
                    .messagelist
                    .into_iter()
                    .rev()
                    .map(|m| Item::Message(message_thread(m)))
                    .collect();
                Ok(single_page(items))
            }
        }
    }

    async fn fetch_section_page(
        &self,
        session: &SessionHandle,
        fid: u64,
        categories: &CategoryFilter,
        local_page: u32,
        pager: Option<Pager>,
    ) -> Result<PageResult, FetchError> {
        let offset = pager.map(|p| p.offset).unwrap_or(0);
        let remote = to_remote(local_page, offset);
        let payload = self
            .api
            .fetch_section(session, fid, categories, remote)
            .await?;
        let meta = page_meta(&payload.page_info);

        let fresh_category_entry = pager.is_none() && local_page == 1 && !categories.is_empty();
        if fresh_category_entry && payload.threadlist.is_empty() && meta.total_pages > 1 {
            return Ok(self
                .resolve_leading_empty_pages(session, fid, categories, meta.total_pages)
                .await);
        }

        Ok(PageResult {
            items: thread_items(payload.threadlist),
            page: local_page,
            total_pages: local_total(meta.total_pages, offset),
            page_offset: offset,
            real_total_pages: meta.total_pages,
            title: None,
        })
    }

    /// Binary-search for the first non-empty page and renumber the page
    /// space to start there. If nothing has content, the listing stays
    /// empty with its original page count.
    async fn resolve_leading_empty_pages(
        &self,
        session: &SessionHandle,
        fid: u64,
        categories: &CategoryFilter,
        real_total: u32,
    ) -> PageResult {
        let found = find_first_content_page(real_total, |page| {
            let api = Arc::clone(&self.api);
            let session = session.clone();
            let categories = categories.clone();
            async move {
                api.fetch_section(&session, fid, &categories, page)
                    .await
                    .map(|p| p.threadlist)
            }
        })
        .await;

        match found {
            Some(first) => {
                let offset = first.page - 1;
                debug!(first_content_page = first.page, offset, "renumbered page space");
                PageResult {
                    items: thread_items(first.items),
                    page: 1,
                    total_pages: local_total(real_total, offset),
                    page_offset: offset,
                    real_total_pages: real_total,
                    title: None,
                }
            }
            None => PageResult {
                items: Vec::new(),
                page: 1,
                total_pages: real_total,
                page_offset: 0,
                real_total_pages: real_total,
                title: None,
            },
        }
    }

    /// Section list with placeholder category nodes filtered out.
    pub async fn forum_categories(&self) -> Result<Vec<SectionInfo>, FetchError> {
        let session = self.session()?;
        let payload = self.api.fetch_forum_categories(&session).await?;
        Ok(payload
            .forumlist
            .into_iter()
            .map(|forum| SectionInfo {
                fid: forum.fid,
                name: forum.name,
                typeid1: category_entries(forum.types.typeid1),
                typeid3: category_entries(forum.types.typeid3),
                typeid4: category_entries(forum.types.typeid4),
            })
            .collect())
    }

    /// Post a reply to a thread.
    pub async fn post_reply(&self, tid: u64, content: &str) -> Result<(), FetchError> {
        let session = self.session()?;
        self.api.post_reply(&session, tid, content).await
    }

    /// Send a private message.
    pub async fn send_message(
        &self,
        peer_uid: u64,
        subject: &str,
        content: &str,
    ) -> Result<(), FetchError> {
        let session = self.session()?;
        self.api
            .send_message(&session, peer_uid, subject, content)
            .await
    }
}

fn thread_items(threads: Vec<RawThread>) -> Vec<Item> {
    threads
        .into_iter()
        .map(|t| Item::Thread(thread_summary(t)))
        .collect()
}

fn thread_summary(raw: RawThread) -> ThreadSummary {
    ThreadSummary {
        tid: raw.tid,
        subject: raw.subject,
        author: raw.username,
        author_uid: raw.uid,
        board: raw.forumname,
        posted_at: raw.dateline_fmt,
        views: raw.views,
        replies: raw.posts,
        last_reply_at: raw.lastpost_fmt,
        last_reply_by: raw.lastusername,
    }
}

/// Flatten a `{thread, post}` reply pair into a thread summary that carries
/// the reply's author and time as the last-reply fields.
fn flatten_reply_pair(pair: RawReplyPair) -> ThreadSummary {
    let RawReplyPair {
        thread,
        post,
        forumname,
    } = pair;
    let board = if forumname.is_empty() {
        thread.forumname
    } else {
        forumname
    };
    let last_reply_by = if post.username.is_empty() {
        thread.lastusername
    } else {
        post.username
    };
    ThreadSummary {
        tid: thread.tid,
        subject: thread.subject,
        author: thread.username,
        author_uid: thread.uid,
        board,
        posted_at: thread.dateline_fmt,
        views: thread.views,
        replies: thread.posts,
        last_reply_at: post.dateline_fmt,
        last_reply_by,
    }
}

/// Floor numbers are global across the thread: `(page-1) * page_size +
/// local_index + 1`, using the remote page the posts came from.
fn post_floor(raw: RawPost, tid: u64, remote_page: u32, local_index: usize) -> PostFloor {
    PostFloor {
        pid: raw.pid,
        tid: if raw.tid != 0 { raw.tid } else { tid },
        floor: (remote_page - 1) * POSTS_PER_PAGE + local_index as u32 + 1,
        author: raw.username,
        author_uid: raw.uid,
        body: raw.message,
        posted_at: raw.dateline_fmt,
    }
}

fn message_thread(raw: crate::wire::RawMessage) -> MessageThread {
    MessageThread {
        peer_uid: raw.touid,
        peer_name: raw.username,
        excerpt: raw.content,
        last_time: raw.dateline_fmt,
    }
}

fn category_entries(raw: Vec<RawCategory>) -> Vec<CategoryEntry> {
    raw.into_iter()
        .filter(keep_category)
        .map(|c| CategoryEntry {
            id: c.id,
            name: c.name.clone(),
            children: category_entries(c.typeid2),
        })
        .collect()
}

/// Placeholder nodes (dropdown markers, zero ids) are navigation chrome on
/// the website, not real categories.
fn keep_category(c: &RawCategory) -> bool {
    c.id != 0 && !c.name.contains('▼')
}

fn list_page(items: Vec<Item>, meta: PageMeta, requested_page: u32) -> PageResult {
    PageResult {
        items,
        page: requested_page,
        total_pages: meta.total_pages,
        page_offset: 0,
        real_total_pages: meta.total_pages,
        title: None,
    }
}

fn single_page(items: Vec<Item>) -> PageResult {
    PageResult {
        items,
        ..PageResult::empty()
    }
}
