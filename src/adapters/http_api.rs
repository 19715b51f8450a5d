//! HTTP implementation of [`ForumApi`].
//!
//! Speaks the forum's `*.htm` endpoints with `format=json`. The session's
//! cookie jar carries authentication; deployments that issue an `auth`
//! token at login get it appended to every request.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;
use crate::models::{CategoryFilter, HomeOrder};
use crate::traits::{ForumApi, SessionHandle};
use crate::wire::{
    Envelope, ForumListPayload, MessageListPayload, PostListPayload, ReplyListPayload,
    ThreadListPayload,
};

const EP_FORUM_LIST: &str = "index-forumlist.htm";
const EP_HOME: &str = "index-index.htm";
const EP_THREAD_LIST: &str = "forum-index.htm";
const EP_THREAD_DETAIL: &str = "thread-index.htm";
const EP_USER_THREADS: &str = "user-thread.htm";
const EP_USER_POSTS: &str = "user-post.htm";
const EP_SEARCH: &str = "search-index.htm";
const EP_POST_REPLY: &str = "post-post.htm";
const EP_MESSAGE_LIST: &str = "pm";
const EP_MESSAGE_DETAIL: &str = "pm/view";
const EP_MESSAGE_SEND: &str = "pm/create";

/// Production forum client over reqwest.
pub struct HttpForumApi {
    client: Client,
}

impl HttpForumApi {
    /// Build a client with a cookie store; the login collaborator fills the
    /// jar, every request here rides it.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an externally configured client (shared jar, proxies, timeouts).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn url(session: &SessionHandle, path: &str) -> String {
        format!("{}/{}", session.base_url.trim_end_matches('/'), path)
    }

    async fn get_payload<T>(
        &self,
        session: &SessionHandle,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Default,
    {
        let url = Self::url(session, path);
        debug!(%url, "forum GET");
        let mut query = query;
        query.push(("format".to_string(), "json".to_string()));
        if let Some(auth) = &session.auth {
            query.push(("auth".to_string(), auth.clone()));
        }
        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let envelope: Envelope = response.json().await?;
        envelope.decode()
    }

    async fn post_form(
        &self,
        session: &SessionHandle,
        path: &str,
        form: Vec<(String, String)>,
    ) -> Result<(), FetchError> {
        let url = Self::url(session, path);
        debug!(%url, "forum POST");
        let mut form = form;
        form.push(("format".to_string(), "json".to_string()));
        if let Some(auth) = &session.auth {
            form.push(("auth".to_string(), auth.clone()));
        }
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        let envelope: Envelope = response.json().await?;
        envelope.decode::<serde_json::Value>().map(|_| ())
    }
}

#[async_trait]
impl ForumApi for HttpForumApi {
    async fn fetch_section(
        &self,
        session: &SessionHandle,
        fid: u64,
        categories: &CategoryFilter,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError> {
        let mut query = vec![
            ("fid".to_string(), fid.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        for (key, id) in categories.query_pairs() {
            query.push((key.to_string(), id.to_string()));
        }
        self.get_payload(session, EP_THREAD_LIST, query).await
    }

    async fn fetch_home(
        &self,
        session: &SessionHandle,
        order: HomeOrder,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError> {
        let query = vec![
            ("orderby".to_string(), order.api_value().to_string()),
            ("page".to_string(), page.to_string()),
        ];
        self.get_payload(session, EP_HOME, query).await
    }

    async fn fetch_user_threads(
        &self,
        session: &SessionHandle,
        uid: u64,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError> {
        let query = vec![
            ("uid".to_string(), uid.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        self.get_payload(session, EP_USER_THREADS, query).await
    }

    async fn fetch_user_posts(
        &self,
        session: &SessionHandle,
        uid: u64,
        page: u32,
    ) -> Result<ReplyListPayload, FetchError> {
        let query = vec![
            ("uid".to_string(), uid.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        self.get_payload(session, EP_USER_POSTS, query).await
    }

    async fn fetch_search(
        &self,
        session: &SessionHandle,
        keyword: &str,
        page: u32,
    ) -> Result<ThreadListPayload, FetchError> {
        let query = vec![
            ("keyword".to_string(), keyword.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        self.get_payload(session, EP_SEARCH, query).await
    }

    async fn fetch_thread_detail(
        &self,
        session: &SessionHandle,
        tid: u64,
        page: u32,
    ) -> Result<PostListPayload, FetchError> {
        let query = vec![
            ("tid".to_string(), tid.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        self.get_payload(session, EP_THREAD_DETAIL, query).await
    }

    async fn fetch_forum_categories(
        &self,
        session: &SessionHandle,
    ) -> Result<ForumListPayload, FetchError> {
        self.get_payload(session, EP_FORUM_LIST, Vec::new()).await
    }

    async fn fetch_message_list(
        &self,
        session: &SessionHandle,
    ) -> Result<MessageListPayload, FetchError> {
        let query = vec![("type".to_string(), "to".to_string())];
        self.get_payload(session, EP_MESSAGE_LIST, query).await
    }

    async fn fetch_message_detail(
        &self,
        session: &SessionHandle,
        peer_uid: u64,
    ) -> Result<MessageListPayload, FetchError> {
        let query = vec![("touid".to_string(), peer_uid.to_string())];
        self.get_payload(session, EP_MESSAGE_DETAIL, query).await
    }

    async fn post_reply(
        &self,
        session: &SessionHandle,
        tid: u64,
        content: &str,
    ) -> Result<(), FetchError> {
        let form = vec![
            ("tid".to_string(), tid.to_string()),
            ("message".to_string(), content.to_string()),
        ];
        self.post_form(session, EP_POST_REPLY, form).await
    }

    async fn send_message(
        &self,
        session: &SessionHandle,
        peer_uid: u64,
        subject: &str,
        content: &str,
    ) -> Result<(), FetchError> {
        let form = vec![
            ("touid".to_string(), peer_uid.to_string()),
            ("subject".to_string(), subject.to_string()),
            ("message".to_string(), content.to_string()),
        ];
        self.post_form(session, EP_MESSAGE_SEND, form).await
    }
}
