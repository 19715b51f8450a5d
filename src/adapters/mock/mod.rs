//! Scripted in-memory forum backend for tests.

mod api;

pub use api::MockForumApi;

use crate::wire::{RawMessage, RawPost, RawThread};

/// Shorthand thread row for test fixtures.
pub fn raw_thread(tid: u64, subject: &str, author: &str) -> RawThread {
    RawThread {
        tid,
        subject: subject.to_string(),
        username: author.to_string(),
        uid: tid % 100,
        ..Default::default()
    }
}

/// Shorthand reply row for test fixtures.
pub fn raw_post(pid: u64, uid: u64, author: &str, body: &str) -> RawPost {
    RawPost {
        pid,
        uid,
        username: author.to_string(),
        message: body.to_string(),
        ..Default::default()
    }
}

/// Shorthand private-message row for test fixtures.
pub fn raw_message(touid: u64, username: &str, content: &str) -> RawMessage {
    RawMessage {
        touid,
        username: username.to_string(),
        content: content.to_string(),
        ..Default::default()
    }
}
