//! Configurable mock [`ForumApi`].
//!
//! Pages are scripted per `(content kind, page number)`; unscripted pages
//! come back empty with the kind's configured total page count, which is
//! exactly what a category-filtered listing with empty leading pages looks
//! like. Every fetch is recorded for verification.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{CategoryFilter, ContentKind, HomeOrder};
use crate::traits::{ForumApi, SessionHandle};
use crate::wire::{
    ForumListPayload, MessageListPayload, PostListPayload, RawForum, RawMessage, RawPageInfo,
    RawPost, RawReplyPair, RawThread, ReplyListPayload, ThreadListPayload,
};

#[derive(Debug, Clone)]
enum MockPage {
    Threads(Vec<RawThread>),
    Replies(Vec<RawReplyPair>),
    Posts {
        posts: Vec<RawPost>,
        thread: Option<RawThread>,
    },
    Messages(Vec<RawMessage>),
    Error(FetchError),
}

/// Scripted in-memory forum backend.
#[derive(Debug, Default)]
pub struct MockForumApi {
    pages: Mutex<HashMap<(ContentKind, u32), MockPage>>,
    totals: Mutex<HashMap<ContentKind, u32>>,
    forums: Mutex<Vec<RawForum>>,
    calls: Mutex<Vec<(ContentKind, u32)>>,
    reply_result: Mutex<Option<FetchError>>,
    send_result: Mutex<Option<FetchError>>,
    replies: Mutex<Vec<(u64, String)>>,
    sent: Mutex<Vec<(u64, String, String)>>,
}

impl MockForumApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total page count reported for a kind; defaults to 1.
    pub fn set_total(&self, kind: ContentKind, total: u32) {
        self.totals.lock().unwrap().insert(kind, total);
    }

    pub fn put_threads(&self, kind: ContentKind, page: u32, threads: Vec<RawThread>) {
        self.pages
            .lock()
            .unwrap()
            .insert((kind, page), MockPage::Threads(threads));
    }

    pub fn put_reply_pairs(&self, page: u32, pairs: Vec<RawReplyPair>) {
        self.pages
            .lock()
            .unwrap()
            .insert((ContentKind::UserPosts, page), MockPage::Replies(pairs));
    }

    pub fn put_posts(&self, page: u32, posts: Vec<RawPost>, thread: Option<RawThread>) {
        self.pages
            .lock()
            .unwrap()
            .insert((ContentKind::ThreadDetail, page), MockPage::Posts { posts, thread });
    }

    pub fn put_message_list(&self, messages: Vec<RawMessage>) {
        self.pages
            .lock()
            .unwrap()
            .insert((ContentKind::MessageList, 1), MockPage::Messages(messages));
    }

    pub fn put_conversation(&self, messages: Vec<RawMessage>) {
        self.pages
            .lock()
            .unwrap()
            .insert((ContentKind::MessageDetail, 1), MockPage::Messages(messages));
    }

    pub fn put_error(&self, kind: ContentKind, page: u32, err: FetchError) {
        self.pages
            .lock()
            .unwrap()
            .insert((kind, page), MockPage::Error(err));
    }

    /// Remove a scripted page, reverting it to empty.
    pub fn clear_page(&self, kind: ContentKind, page: u32) {
        self.pages.lock().unwrap().remove(&(kind, page));
    }

    pub fn set_forums(&self, forums: Vec<RawForum>) {
        *self.forums.lock().unwrap() = forums;
    }

    pub fn fail_replies_with(&self, err: FetchError) {
        *self.reply_result.lock().unwrap() = Some(err);
    }

    pub fn fail_messages_with(&self, err: FetchError) {
        *self.send_result.lock().unwrap() = Some(err);
    }

    /// Every `(kind, page)` fetched, in order.
    pub fn calls(&self) -> Vec<(ContentKind, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Replies accepted by `post_reply`, as `(tid, content)`.
    pub fn replies(&self) -> Vec<(u64, String)> {
        self.replies.lock().unwrap().clone()
    }

    /// Messages accepted by `send_message`, as `(touid, subject, content)`.
    pub fn sent_messages(&self) -> Vec<(u64, String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn total_for(&self, kind: ContentKind) -> u32 {
        *self.totals.lock().unwrap().get(&kind).unwrap_or(&1)
    }

    fn record(&self, kind: ContentKind, page: u32) {
        self.calls.lock().unwrap().push((kind, page));
    }

    fn thread_page(&self, kind: ContentKind, page: u32) -> Result<ThreadListPayload, FetchError> {
        self.record(kind, page);
        let total = self.total_for(kind);
        match self.pages.lock().unwrap().get(&(kind, page)) {
            Some(MockPage::Threads(threads)) => {
                Ok(ThreadListPayload::new(threads.clone(), page, total))
            }
            Some(MockPage::Error(err)) => Err(err.clone()),
            Some(_) => Err(FetchError::Decode("mock: page type mismatch".to_string())),
            None => Ok(ThreadListPayload::new(Vec::new(), page, total)),
        }
    }
}

#[async_trait]
impl ForumApi for MockForumApi {
    async fn fetch_section(
        &self,
        _session: &SessionHandle,
        _fid: u64,
        _categories: &CategoryFilter,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError> {
        self.thread_page(ContentKind::Section, page)
    }

    async fn fetch_home(
        &self,
        _session: &SessionHandle,
        _order: HomeOrder,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError> {
        self.thread_page(ContentKind::Home, page)
    }

    async fn fetch_user_threads(
        &self,
        _session: &SessionHandle,
        _uid: u64,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError> {
        self.thread_page(ContentKind::UserThreads, page)
    }

    async fn fetch_user_posts(
        &self,
        _session: &SessionHandle,
        _uid: u64,
        page: u32,
    ) -> Result<ReplyListPayload, FetchError> {
        self.record(ContentKind::UserPosts, page);
        let total = self.total_for(ContentKind::UserPosts);
        match self
            .pages
            .lock()
            .unwrap()
            .get(&(ContentKind::UserPosts, page))
        {
            Some(MockPage::Replies(pairs)) => Ok(ReplyListPayload {
                threadlist: pairs.clone(),
                page_info: RawPageInfo::of(page, total),
            }),
            Some(MockPage::Error(err)) => Err(err.clone()),
            Some(_) => Err(FetchError::Decode("mock: page type mismatch".to_string())),
            None => Ok(ReplyListPayload {
                threadlist: Vec::new(),
                page_info: RawPageInfo::of(page, total),
            }),
        }
    }

    async fn fetch_search(
        &self,
        _session: &SessionHandle,
        _keyword: &str,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError> {
        self.thread_page(ContentKind::Search, page)
    }

    async fn fetch_thread_detail(
        &self,
        _session: &SessionHandle,
        _tid: u64,
        page: u32,
    ) -> Result<PostListPayload, FetchError> {
        self.record(ContentKind::ThreadDetail, page);
        let total = self.total_for(ContentKind::ThreadDetail);
        match self
            .pages
            .lock()
            .unwrap()
            .get(&(ContentKind::ThreadDetail, page))
        {
            Some(MockPage::Posts { posts, thread }) => Ok(PostListPayload::new(
                posts.clone(),
                thread.clone(),
                page,
                total,
            )),
            Some(MockPage::Error(err)) => Err(err.clone()),
            Some(_) => Err(FetchError::Decode("mock: page type mismatch".to_string())),
            None => Ok(PostListPayload::new(Vec::new(), None, page, total)),
        }
    }

    async fn fetch_forum_categories(
        &self,
        _session: &SessionHandle,
    ) -> Result<ForumListPayload, FetchError> {
        Ok(ForumListPayload {
            forumlist: self.forums.lock().unwrap().clone(),
        })
    }

    async fn fetch_message_list(
        &self,
        _session: &SessionHandle,
    ) -> Result<MessageListPayload, FetchError> {
        self.record(ContentKind::MessageList, 1);
        match self
            .pages
            .lock()
            .unwrap()
            .get(&(ContentKind::MessageList, 1))
        {
            Some(MockPage::Messages(messages)) => Ok(MessageListPayload {
                messagelist: messages.clone(),
            }),
            Some(MockPage::Error(err)) => Err(err.clone()),
            _ => Ok(MessageListPayload::default()),
        }
    }

    async fn fetch_message_detail(
        &self,
        _session: &SessionHandle,
        _peer_uid: u64,
    ) -> Result<MessageListPayload, FetchError> {
        self.record(ContentKind::MessageDetail, 1);
        match self
            .pages
            .lock()
            .unwrap()
            .get(&(ContentKind::MessageDetail, 1))
        {
            Some(MockPage::Messages(messages)) => Ok(MessageListPayload {
                messagelist: messages.clone(),
            }),
            Some(MockPage::Error(err)) => Err(err.clone()),
            _ => Ok(MessageListPayload::default()),
        }
    }

    async fn post_reply(
        &self,
        _session: &SessionHandle,
        tid: u64,
        content: &str,
    ) -> Result<(), FetchError> {
        if let Some(err) = self.reply_result.lock().unwrap().clone() {
            return Err(err);
        }
        self.replies.lock().unwrap().push((tid, content.to_string()));
        Ok(())
    }

    async fn send_message(
        &self,
        _session: &SessionHandle,
        peer_uid: u64,
        subject: &str,
        content: &str,
    ) -> Result<(), FetchError> {
        if let Some(err) = self.send_result.lock().unwrap().clone() {
            return Err(err);
        }
        self.sent
            .lock()
            .unwrap()
            .push((peer_uid, subject.to_string(), content.to_string()));
        Ok(())
    }
}
