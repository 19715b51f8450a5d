//! Raw API response shapes.
//!
//! The forum speaks a JSON dialect with two envelope generations: older
//! deployments flag success with `status == 1` and put the payload under
//! `data`, newer ones use `result == 1` with the payload under `message`
//! (which doubles as the error string on failure). Pagination fields are
//! equally inconsistent: sometimes a `pagination` sub-object, sometimes
//! bare `page`/`totalpage` keys on the payload itself.
//!
//! This module is the only place those shapes are spelled out. Everything
//! downstream works with [`crate::models`] types.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;

/// Top-level response envelope, tolerant of both API generations.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    status: Option<i64>,
    #[serde(default)]
    result: Option<i64>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl Envelope {
    pub fn ok(&self) -> bool {
        self.status == Some(1) || self.result == Some(1)
    }

    /// Unwrap the payload, or turn a rejected envelope into an API error.
    pub fn decode<T>(self) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Default,
    {
        if !self.ok() {
            let message = self
                .message
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or("request rejected")
                .to_string();
            return Err(FetchError::Api { message });
        }

        let payload = match self.data.or(self.message) {
            Some(Value::Null) | None => return Ok(T::default()),
            Some(v) => v,
        };
        serde_json::from_value(payload).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Pagination sub-object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "total_page")]
    pub totalpage: Option<u32>,
}

/// Pagination fields as they appear on a payload: either a `pagination`
/// sub-object or bare keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPageInfo {
    #[serde(default)]
    pub pagination: Option<RawPagination>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "total_page")]
    pub totalpage: Option<u32>,
}

impl RawPageInfo {
    /// Construct the sub-object form; used by the mock backend and tests.
    pub fn of(page: u32, total: u32) -> Self {
        Self {
            pagination: Some(RawPagination {
                page: Some(page),
                totalpage: Some(total),
            }),
            page: None,
            totalpage: None,
        }
    }
}

/// Normalized pagination, always 1-based and at least one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u32,
    pub total_pages: u32,
}

/// Fix up whichever pagination fields the response carried.
pub fn page_meta(info: &RawPageInfo) -> PageMeta {
    let (page, total) = match &info.pagination {
        Some(p) => (p.page, p.totalpage),
        None => (info.page, info.totalpage),
    };
    PageMeta {
        page: page.unwrap_or(1).max(1),
        total_pages: total.unwrap_or(1).max(1),
    }
}

/// One thread row as the API sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawThread {
    #[serde(default)]
    pub tid: u64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub uid: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub posts: u64,
    #[serde(default)]
    pub forumname: String,
    #[serde(default)]
    pub dateline_fmt: String,
    #[serde(default)]
    pub lastpost_fmt: String,
    #[serde(default)]
    pub lastusername: String,
}

/// One reply row of a thread-detail page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub pid: u64,
    #[serde(default)]
    pub tid: u64,
    #[serde(default)]
    pub uid: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub dateline_fmt: String,
}

/// User-reply listings pair each reply with its thread.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReplyPair {
    #[serde(default)]
    pub thread: RawThread,
    #[serde(default)]
    pub post: RawPost,
    #[serde(default)]
    pub forumname: String,
}

/// One category node; `typeid2` children nest under `typeid1` entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub typeid2: Vec<RawCategory>,
}

/// Category taxonomy of a section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForumTypes {
    #[serde(default)]
    pub typeid1: Vec<RawCategory>,
    #[serde(default)]
    pub typeid3: Vec<RawCategory>,
    #[serde(default)]
    pub typeid4: Vec<RawCategory>,
}

/// One forum section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForum {
    #[serde(default)]
    pub fid: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: RawForumTypes,
}

/// One private-message row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub touid: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "message")]
    pub content: String,
    #[serde(default, alias = "datetime")]
    pub dateline_fmt: String,
}

/// Payload of every thread-listing endpoint (section, home, user threads,
/// search).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadListPayload {
    #[serde(default)]
    pub threadlist: Vec<RawThread>,
    #[serde(flatten)]
    pub page_info: RawPageInfo,
}

impl ThreadListPayload {
    pub fn new(threadlist: Vec<RawThread>, page: u32, total: u32) -> Self {
        Self {
            threadlist,
            page_info: RawPageInfo::of(page, total),
        }
    }
}

/// Payload of the user-replies endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyListPayload {
    #[serde(default)]
    pub threadlist: Vec<RawReplyPair>,
    #[serde(flatten)]
    pub page_info: RawPageInfo,
}

/// Payload of the thread-detail endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostListPayload {
    #[serde(default)]
    pub postlist: Vec<RawPost>,
    #[serde(default)]
    pub thread: Option<RawThread>,
    #[serde(flatten)]
    pub page_info: RawPageInfo,
}

impl PostListPayload {
    pub fn new(postlist: Vec<RawPost>, thread: Option<RawThread>, page: u32, total: u32) -> Self {
        Self {
            postlist,
            thread,
            page_info: RawPageInfo::of(page, total),
        }
    }
}

/// Payload of the section-list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForumListPayload {
    #[serde(default)]
    pub forumlist: Vec<RawForum>,
}

/// Payload of the private-message endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageListPayload {
    #[serde(default)]
    pub messagelist: Vec<RawMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_legacy_shape() {
        let json = r#"{
            "status": 1,
            "data": {
                "threadlist": [{"tid": 7, "subject": "hello"}],
                "pagination": {"page": 2, "totalpage": 9}
            }
        }"#;
        let env: Envelope = serde_json::from_str(json).unwrap();
        assert!(env.ok());
        let payload: ThreadListPayload = env.decode().unwrap();
        assert_eq!(payload.threadlist.len(), 1);
        assert_eq!(payload.threadlist[0].tid, 7);
        assert_eq!(
            page_meta(&payload.page_info),
            PageMeta {
                page: 2,
                total_pages: 9
            }
        );
    }

    #[test]
    fn test_envelope_message_wrapped_shape() {
        let json = r#"{
            "result": 1,
            "message": {
                "threadlist": [{"tid": 7, "subject": "hello"}],
                "page": 2,
                "totalpage": 9
            }
        }"#;
        let env: Envelope = serde_json::from_str(json).unwrap();
        let payload: ThreadListPayload = env.decode().unwrap();
        assert_eq!(payload.threadlist.len(), 1);
        // Both envelope generations normalize to the same PageMeta.
        assert_eq!(
            page_meta(&payload.page_info),
            PageMeta {
                page: 2,
                total_pages: 9
            }
        );
    }

    #[test]
    fn test_envelope_rejection_carries_message() {
        let json = r#"{"status": 0, "message": "board is closed"}"#;
        let env: Envelope = serde_json::from_str(json).unwrap();
        let err = env.decode::<ThreadListPayload>().unwrap_err();
        assert_eq!(
            err,
            FetchError::Api {
                message: "board is closed".to_string()
            }
        );
    }

    #[test]
    fn test_envelope_null_payload_is_default() {
        let json = r#"{"status": 1, "data": null}"#;
        let env: Envelope = serde_json::from_str(json).unwrap();
        let payload: ThreadListPayload = env.decode().unwrap();
        assert!(payload.threadlist.is_empty());
    }

    #[test]
    fn test_page_meta_defaults_to_single_page() {
        let meta = page_meta(&RawPageInfo::default());
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 1);

        // A zero from the server is clamped, pages are 1-based.
        let info = RawPageInfo {
            page: Some(0),
            totalpage: Some(0),
            pagination: None,
        };
        let meta = page_meta(&info);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 1);
    }

    #[test]
    fn test_reply_pair_decoding() {
        let json = r#"{
            "status": 1,
            "data": {
                "threadlist": [
                    {
                        "thread": {"tid": 3, "subject": "t", "username": "op"},
                        "post": {"pid": 11, "username": "me", "dateline_fmt": "2024-05-01"},
                        "forumname": "general"
                    }
                ],
                "pagination": {"page": 1, "totalpage": 1}
            }
        }"#;
        let env: Envelope = serde_json::from_str(json).unwrap();
        let payload: ReplyListPayload = env.decode().unwrap();
        let pair = &payload.threadlist[0];
        assert_eq!(pair.thread.tid, 3);
        assert_eq!(pair.post.username, "me");
        assert_eq!(pair.forumname, "general");
    }

    #[test]
    fn test_forum_category_nesting() {
        let json = r#"{
            "status": 1,
            "data": {
                "forumlist": [
                    {
                        "fid": 2,
                        "name": "tech",
                        "types": {
                            "typeid1": [
                                {"id": 5, "name": "software", "typeid2": [{"id": 9, "name": "editors"}]}
                            ],
                            "typeid3": [{"id": 1, "name": "solved"}]
                        }
                    }
                ]
            }
        }"#;
        let env: Envelope = serde_json::from_str(json).unwrap();
        let payload: ForumListPayload = env.decode().unwrap();
        let forum = &payload.forumlist[0];
        assert_eq!(forum.types.typeid1[0].typeid2[0].id, 9);
        assert_eq!(forum.types.typeid3[0].name, "solved");
    }
}
