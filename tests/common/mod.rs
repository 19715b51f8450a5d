//! Shared fixtures for the integration suites.

use std::sync::Arc;

use bbsmate::adapters::mock::MockForumApi;
use bbsmate::navigator::Navigator;
use bbsmate::provider::ContentProvider;
use bbsmate::traits::{SessionHandle, StaticSessionProvider};

pub const FORUM: &str = "zd";

pub fn session_handle() -> SessionHandle {
    SessionHandle {
        forum_id: FORUM.to_string(),
        base_url: "https://forum.example".to_string(),
        uid: 1,
        username: "reader".to_string(),
        auth: None,
    }
}

pub fn navigator_with(api: Arc<MockForumApi>) -> Navigator {
    let sessions = Arc::new(StaticSessionProvider::new(session_handle()));
    Navigator::new(ContentProvider::new(api, sessions, FORUM))
}

#[allow(dead_code)]
pub fn signed_out_navigator(api: Arc<MockForumApi>) -> Navigator {
    let sessions = Arc::new(StaticSessionProvider::signed_out());
    Navigator::new(ContentProvider::new(api, sessions, FORUM))
}

#[allow(dead_code)]
pub fn provider_with(api: Arc<MockForumApi>) -> ContentProvider {
    let sessions = Arc::new(StaticSessionProvider::new(session_handle()));
    ContentProvider::new(api, sessions, FORUM)
}
