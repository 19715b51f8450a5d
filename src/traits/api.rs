//! Forum API client trait.
//!
//! One method per content type, each returning the raw wire payload for
//! that endpoint family. Only the content provider is allowed to interpret
//! those payloads; implementations just move bytes.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{CategoryFilter, HomeOrder};
use crate::traits::SessionHandle;
use crate::wire::{
    ForumListPayload, MessageListPayload, PostListPayload, ReplyListPayload, ThreadListPayload,
};

/// Raw per-content-type forum calls.
///
/// Implementations include the production HTTP client
/// ([`crate::adapters::HttpForumApi`]) and the scripted mock backend
/// ([`crate::adapters::mock::MockForumApi`]) used in tests.
#[async_trait]
pub trait ForumApi: Send + Sync {
    /// Thread listing of a section, optionally category-filtered.
    async fn fetch_section(
        &self,
        session: &SessionHandle,
        fid: u64,
        categories: &CategoryFilter,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError>;

    /// Home feed in the given order.
    async fn fetch_home(
        &self,
        session: &SessionHandle,
        order: HomeOrder,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError>;

    /// Threads started by a user.
    async fn fetch_user_threads(
        &self,
        session: &SessionHandle,
        uid: u64,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError>;

    /// Replies written by a user, as `{thread, post}` pairs.
    async fn fetch_user_posts(
        &self,
        session: &SessionHandle,
        uid: u64,
        page: u32,
    ) -> Result<ReplyListPayload, FetchError>;

    /// Full-text search.
    async fn fetch_search(
        &self,
        session: &SessionHandle,
        keyword: &str,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError>;

    /// One page of a thread: header plus replies.
    async fn fetch_thread_detail(
        &self,
        session: &SessionHandle,
        tid: u64,
        page: u32,
    ) -> Result<PostListPayload, FetchError>;

    /// Section list with its category taxonomy.
    async fn fetch_forum_categories(
        &self,
        session: &SessionHandle,
    ) -> Result<ForumListPayload, FetchError>;

    /// Private-message conversation partners.
    async fn fetch_message_list(
        &self,
        session: &SessionHandle,
    ) -> Result<MessageListPayload, FetchError>;

    /// One private-message conversation, newest first as the server sends it.
    async fn fetch_message_detail(
        &self,
        session: &SessionHandle,
        peer_uid: u64,
    ) -> Result<MessageListPayload, FetchError>;

    /// Post a reply to a thread. Write failures must surface to the caller.
    async fn post_reply(
        &self,
        session: &SessionHandle,
        tid: u64,
        content: &str,
    ) -> Result<(), FetchError>;

    /// Send a private message. Write failures must surface to the caller.
    async fn send_message(
        &self,
        session: &SessionHandle,
        peer_uid: u64,
        subject: &str,
        content: &str,
    ) -> Result<(), FetchError>;
}
