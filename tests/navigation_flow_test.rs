// Integration tests for the navigation stack: entering and leaving details,
// the two-level member-content back chain, pagination actions, failure
// retention and the write paths.

mod common;

use std::sync::Arc;

use bbsmate::adapters::mock::{raw_message, raw_post, raw_thread, MockForumApi};
use bbsmate::error::FetchError;
use bbsmate::models::{ContentKind, ContentTarget, HomeOrder, Item};
use bbsmate::navigator::{NavState, Outcome, UserAction, UserContentKind};
use bbsmate::wire::RawThread;

use common::{navigator_with, signed_out_navigator};

fn home() -> ContentTarget {
    ContentTarget::Home {
        order: HomeOrder::Latest,
    }
}

fn home_page(api: &MockForumApi) {
    api.put_threads(
        ContentKind::Home,
        1,
        vec![
            raw_thread(101, "first", "alice"),
            raw_thread(102, "second", "bob"),
            raw_thread(103, "third", "carol"),
        ],
    );
}

fn thread_page(api: &MockForumApi) {
    api.put_posts(
        1,
        vec![
            raw_post(11, 9, "bob", "opening post"),
            raw_post(12, 2, "alice", "a reply"),
        ],
        Some(RawThread {
            tid: 101,
            subject: "hello thread".to_string(),
            ..Default::default()
        }),
    );
}

#[tokio::test]
async fn test_navigation_is_idempotent() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    let mut nav = navigator_with(api);

    assert_eq!(nav.navigate_root(home()).await, Outcome::Rendered);
    let first = nav.current_view().unwrap().clone();

    assert_eq!(nav.navigate_root(home()).await, Outcome::Rendered);
    let second = nav.current_view().unwrap().clone();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_back_round_trip_restores_list() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    let mut nav = navigator_with(api);

    nav.navigate_root(home()).await;
    assert_eq!(nav.state(), NavState::RootList);
    let before = nav.current_view().unwrap().clone();

    assert_eq!(
        nav.dispatch(UserAction::ActivateRow(1)).await,
        Outcome::Rendered
    );
    assert_eq!(nav.state(), NavState::ThreadDetail);
    assert_eq!(
        nav.current_view().unwrap().target,
        ContentTarget::ThreadDetail { tid: 102 }
    );
    // fresh detail selects the first floor
    assert_eq!(nav.current_view().unwrap().selected, Some(0));

    assert_eq!(nav.dispatch(UserAction::Back).await, Outcome::Rendered);
    let restored = nav.current_view().unwrap();
    assert_eq!(restored.target, before.target);
    assert_eq!(restored.page_result.page, before.page_result.page);
    assert_eq!(restored.rows, before.rows);
    // cursor is back on the row that was activated
    assert_eq!(restored.selected, Some(1));

    // at root, back is a no-op
    assert_eq!(nav.dispatch(UserAction::Back).await, Outcome::NoOp);
}

#[tokio::test]
async fn test_back_restores_the_saved_page_not_page_one() {
    let api = Arc::new(MockForumApi::new());
    api.set_total(ContentKind::Home, 3);
    home_page(&api);
    api.put_threads(
        ContentKind::Home,
        2,
        vec![raw_thread(104, "fourth", "dan"), raw_thread(105, "fifth", "eve")],
    );
    thread_page(&api);
    let mut nav = navigator_with(api);

    nav.navigate_root(home()).await;
    assert_eq!(nav.dispatch(UserAction::NextPage).await, Outcome::Rendered);
    assert_eq!(nav.current_view().unwrap().page_result.page, 2);

    nav.dispatch(UserAction::ActivateRow(1)).await;
    nav.dispatch(UserAction::Back).await;

    let view = nav.current_view().unwrap();
    assert_eq!(view.page_result.page, 2);
    assert_eq!(view.selected, Some(1));
}

#[tokio::test]
async fn test_selection_falls_back_to_position_when_id_vanishes() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    let mut nav = navigator_with(Arc::clone(&api));

    nav.navigate_root(home()).await;
    nav.dispatch(UserAction::ActivateRow(1)).await; // tid 102

    // the thread vanishes from the refreshed list before the user returns
    api.put_threads(
        ContentKind::Home,
        1,
        vec![
            raw_thread(101, "first", "alice"),
            raw_thread(103, "third", "carol"),
        ],
    );

    assert_eq!(nav.dispatch(UserAction::Back).await, Outcome::Rendered);
    assert_eq!(nav.current_view().unwrap().selected, Some(1));
}

#[tokio::test]
async fn test_selection_prefers_stable_id_over_position() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    let mut nav = navigator_with(Arc::clone(&api));

    nav.navigate_root(home()).await;
    nav.dispatch(UserAction::ActivateRow(1)).await; // tid 102

    // a new thread pushes tid 102 down one row
    api.put_threads(
        ContentKind::Home,
        1,
        vec![
            raw_thread(100, "newest", "frank"),
            raw_thread(101, "first", "alice"),
            raw_thread(102, "second", "bob"),
        ],
    );

    nav.dispatch(UserAction::Back).await;
    assert_eq!(nav.current_view().unwrap().selected, Some(2));
}

#[tokio::test]
async fn test_two_level_back_through_member_content() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    api.put_threads(
        ContentKind::UserThreads,
        1,
        vec![raw_thread(201, "alices first", "alice"), raw_thread(202, "alices second", "alice")],
    );
    let mut nav = navigator_with(api);

    nav.navigate_root(home()).await;
    nav.dispatch(UserAction::ActivateRow(0)).await; // tid 101
    assert_eq!(nav.state(), NavState::ThreadDetail);

    // floor 2 belongs to alice; browse her threads
    let outcome = nav
        .dispatch(UserAction::ViewAuthorContent(1, UserContentKind::Threads))
        .await;
    assert_eq!(outcome, Outcome::Rendered);
    assert_eq!(nav.state(), NavState::UserContentList);
    let ctx = nav.user_content_context().unwrap();
    assert_eq!(ctx.username, "alice");
    assert_eq!(ctx.uid, 2);
    assert!(nav.current_view().unwrap().title.starts_with("Threads by alice"));

    // open one of her threads; the overlay survives
    nav.dispatch(UserAction::ActivateRow(1)).await; // tid 202
    assert_eq!(nav.state(), NavState::ThreadDetail);
    assert!(nav.user_content_context().is_some());

    // first back: the member list, at its page and selection
    assert_eq!(nav.dispatch(UserAction::Back).await, Outcome::Rendered);
    assert_eq!(nav.state(), NavState::UserContentList);
    let view = nav.current_view().unwrap();
    assert_eq!(view.page_result.page, 1);
    assert_eq!(view.selected, Some(1));
    assert!(view.title.starts_with("Threads by alice"));

    // second back: the original list, original selection; overlay gone
    assert_eq!(nav.dispatch(UserAction::Back).await, Outcome::Rendered);
    assert_eq!(nav.state(), NavState::RootList);
    assert!(nav.user_content_context().is_none());
    let view = nav.current_view().unwrap();
    assert_eq!(view.target, home());
    assert_eq!(view.selected, Some(0));
}

#[tokio::test]
async fn test_exit_user_content_jumps_straight_out() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    api.put_threads(ContentKind::UserThreads, 1, vec![raw_thread(201, "t", "alice")]);
    let mut nav = navigator_with(api);

    nav.navigate_root(home()).await;
    nav.dispatch(UserAction::ActivateRow(0)).await;
    nav.dispatch(UserAction::ViewAuthorContent(1, UserContentKind::Threads))
        .await;
    nav.dispatch(UserAction::ActivateRow(0)).await; // into a thread again

    assert_eq!(
        nav.dispatch(UserAction::ExitUserContent).await,
        Outcome::Rendered
    );
    assert_eq!(nav.state(), NavState::RootList);
    assert!(nav.user_content_context().is_none());
}

#[tokio::test]
async fn test_fetch_failure_keeps_current_view() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    api.put_error(
        ContentKind::ThreadDetail,
        1,
        FetchError::Network("connection refused".to_string()),
    );
    let mut nav = navigator_with(api);

    nav.navigate_root(home()).await;
    let before = nav.current_view().unwrap().clone();

    let outcome = nav.dispatch(UserAction::ActivateRow(0)).await;
    assert!(matches!(outcome, Outcome::Notice(_)));
    assert_eq!(nav.state(), NavState::RootList);
    assert_eq!(nav.current_view().unwrap(), &before);
}

#[tokio::test]
async fn test_signed_out_navigation_requires_auth() {
    let api = Arc::new(MockForumApi::new());
    let mut nav = signed_out_navigator(api);

    assert_eq!(nav.navigate_root(home()).await, Outcome::AuthRequired);
    assert_eq!(nav.state(), NavState::Blank);
}

#[tokio::test]
async fn test_message_list_and_conversation_flow() {
    let api = Arc::new(MockForumApi::new());
    api.put_message_list(vec![raw_message(5, "carol", "hey")]);
    // server order is newest first; the conversation shows oldest first
    api.put_conversation(vec![
        raw_message(5, "carol", "second"),
        raw_message(5, "carol", "first"),
    ]);
    let mut nav = navigator_with(api);

    nav.navigate_root(ContentTarget::MessageList).await;
    assert_eq!(nav.state(), NavState::MessageList);
    let rendered = nav.render().unwrap();
    assert_eq!(rendered.rows, vec!["carol".to_string()]);

    nav.dispatch(UserAction::ActivateRow(0)).await;
    assert_eq!(nav.state(), NavState::MessageDetail);
    let rendered = nav.render().unwrap();
    assert_eq!(
        rendered.rows,
        vec!["first".to_string(), "second".to_string()]
    );

    assert_eq!(nav.dispatch(UserAction::Back).await, Outcome::Rendered);
    assert_eq!(nav.state(), NavState::MessageList);
    assert_eq!(nav.current_view().unwrap().selected, Some(0));
}

#[tokio::test]
async fn test_pagination_monotonicity() {
    let api = Arc::new(MockForumApi::new());
    api.set_total(ContentKind::Home, 5);
    for page in 1..=5u32 {
        api.put_threads(
            ContentKind::Home,
            page,
            vec![raw_thread(100 + page as u64, "t", "a")],
        );
    }
    let mut nav = navigator_with(api);
    nav.navigate_root(home()).await;

    for expected in 2..=5u32 {
        assert_eq!(nav.dispatch(UserAction::NextPage).await, Outcome::Rendered);
        assert_eq!(nav.current_view().unwrap().page_result.page, expected);
    }
    // already on the last page
    assert_eq!(nav.dispatch(UserAction::NextPage).await, Outcome::NoOp);

    for expected in (1..=4u32).rev() {
        assert_eq!(nav.dispatch(UserAction::PrevPage).await, Outcome::Rendered);
        assert_eq!(nav.current_view().unwrap().page_result.page, expected);
    }
    assert_eq!(nav.dispatch(UserAction::PrevPage).await, Outcome::NoOp);
}

#[tokio::test]
async fn test_page_jump_validates_bounds() {
    let api = Arc::new(MockForumApi::new());
    api.set_total(ContentKind::Home, 5);
    home_page(&api);
    let mut nav = navigator_with(api);
    nav.navigate_root(home()).await;

    assert_eq!(
        nav.dispatch(UserAction::JumpToPage(4)).await,
        Outcome::Rendered
    );
    assert_eq!(nav.current_view().unwrap().page_result.page, 4);

    let outcome = nav.dispatch(UserAction::JumpToPage(9)).await;
    assert!(matches!(outcome, Outcome::Notice(_)));
    assert_eq!(nav.current_view().unwrap().page_result.page, 4);
}

#[tokio::test]
async fn test_activating_controls() {
    let api = Arc::new(MockForumApi::new());
    api.set_total(ContentKind::Home, 3);
    home_page(&api);
    thread_page(&api);
    let mut nav = navigator_with(api);
    nav.navigate_root(home()).await;

    // rows: 3 threads, Next, Jump
    let rows = &nav.current_view().unwrap().rows;
    assert_eq!(rows.len(), 5);

    assert_eq!(
        nav.dispatch(UserAction::ActivateRow(4)).await,
        Outcome::PromptPageJump { page: 1, total: 3 }
    );
    assert_eq!(
        nav.dispatch(UserAction::ActivateRow(3)).await,
        Outcome::Rendered
    );
    assert_eq!(nav.current_view().unwrap().page_result.page, 2);

    // the reply control only exists inside a thread
    nav.dispatch(UserAction::PrevPage).await;
    nav.dispatch(UserAction::ActivateRow(0)).await;
    let reply_row = nav
        .current_view()
        .unwrap()
        .rows
        .iter()
        .position(|r| matches!(r, Item::Pagination(bbsmate::models::PaginationControl::Reply)))
        .unwrap();
    assert_eq!(
        nav.dispatch(UserAction::ActivateRow(reply_row)).await,
        Outcome::PromptReply { tid: 101 }
    );
}

#[tokio::test]
async fn test_refresh_preserves_stack_position() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    let mut nav = navigator_with(api);

    nav.navigate_root(home()).await;
    nav.dispatch(UserAction::ActivateRow(0)).await;

    assert_eq!(nav.dispatch(UserAction::Refresh).await, Outcome::Rendered);
    assert_eq!(nav.state(), NavState::ThreadDetail);

    // the anchor under the refreshed detail still works
    assert_eq!(nav.dispatch(UserAction::Back).await, Outcome::Rendered);
    assert_eq!(nav.state(), NavState::RootList);
}

#[tokio::test]
async fn test_failed_reply_surfaces_and_changes_nothing() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    api.fail_replies_with(FetchError::api("flood control"));
    let mut nav = navigator_with(Arc::clone(&api));

    nav.navigate_root(home()).await;
    nav.dispatch(UserAction::ActivateRow(0)).await;
    let before = nav.current_view().unwrap().clone();

    let err = nav.post_reply("me too").await.unwrap_err();
    assert!(matches!(err, FetchError::Api { .. }));
    assert!(api.replies().is_empty());
    assert_eq!(nav.current_view().unwrap(), &before);
}

#[tokio::test]
async fn test_successful_reply_refreshes_the_thread() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    let mut nav = navigator_with(Arc::clone(&api));

    nav.navigate_root(home()).await;
    nav.dispatch(UserAction::ActivateRow(1)).await; // tid 102
    api.clear_calls();

    nav.post_reply("agreed").await.unwrap();
    assert_eq!(api.replies(), vec![(102, "agreed".to_string())]);
    assert_eq!(api.calls(), vec![(ContentKind::ThreadDetail, 1)]);
    assert_eq!(nav.state(), NavState::ThreadDetail);
}

#[tokio::test]
async fn test_send_message_derives_subject() {
    let api = Arc::new(MockForumApi::new());
    api.put_message_list(vec![raw_message(5, "carol", "hey")]);
    api.put_conversation(vec![raw_message(5, "carol", "hey")]);
    let mut nav = navigator_with(Arc::clone(&api));

    nav.navigate_root(ContentTarget::MessageList).await;
    nav.dispatch(UserAction::ActivateRow(0)).await;

    let body = "a".repeat(30);
    nav.send_message(&body).await.unwrap();

    let sent = api.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 5);
    assert_eq!(sent[0].1, format!("Re: {}...", "a".repeat(20)));
    assert_eq!(sent[0].2, body);
}

#[tokio::test]
async fn test_root_navigation_resets_overlays() {
    let api = Arc::new(MockForumApi::new());
    home_page(&api);
    thread_page(&api);
    api.put_threads(ContentKind::UserThreads, 1, vec![raw_thread(201, "t", "alice")]);
    let mut nav = navigator_with(api);

    nav.navigate_root(home()).await;
    nav.dispatch(UserAction::ActivateRow(0)).await;
    nav.dispatch(UserAction::ViewAuthorContent(1, UserContentKind::Threads))
        .await;
    assert_eq!(nav.state(), NavState::UserContentList);

    nav.navigate_root(home()).await;
    assert_eq!(nav.state(), NavState::RootList);
    assert!(nav.user_content_context().is_none());
    assert_eq!(nav.dispatch(UserAction::Back).await, Outcome::NoOp);
}
