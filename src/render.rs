//! Presentation adapter: flattens a [`ViewState`] into plain text rows.
//!
//! The shell renders these rows into whatever list widget it uses; every
//! row is a single self-describing string so a screen reader announces the
//! full context when the cursor lands on it.

use crate::models::{ContentKind, ContentTarget, HomeOrder, Item, PageResult, PaginationControl};
use crate::navigator::ViewState;

/// What the presentation layer receives for one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderView {
    pub title: String,
    pub rows: Vec<String>,
    pub selected: Option<usize>,
}

/// Conversation excerpts longer than this are cut for the list row.
const EXCERPT_LIMIT: usize = 200;

/// Render the current view into display rows.
pub fn render_view(view: &ViewState) -> RenderView {
    let kind = view.target.kind();
    RenderView {
        title: view.title.clone(),
        rows: view.rows.iter().map(|i| format_item(i, kind)).collect(),
        selected: view.selected,
    }
}

/// One display row. Message rows format differently in the partner list
/// and inside a conversation.
pub fn format_item(item: &Item, kind: ContentKind) -> String {
    match item {
        Item::Thread(t) => format!(
            "{} Author:{};Views:{};Board:{};Posted:{};Replies:{};Last reply:{};Last reply by:{}",
            t.subject,
            t.author,
            t.views,
            t.board,
            t.posted_at,
            t.replies,
            t.last_reply_at,
            t.last_reply_by
        ),
        Item::Post(p) => {
            if p.floor == 1 {
                format!("Original poster {} says\n{}\nPosted: {}", p.author, p.body, p.posted_at)
            } else {
                format!(
                    "Floor {}, {} says\n{}\nPosted: {}",
                    p.floor, p.author, p.body, p.posted_at
                )
            }
        }
        Item::Message(m) => {
            if kind == ContentKind::MessageDetail {
                truncate_excerpt(&m.excerpt)
            } else {
                m.peer_name.clone()
            }
        }
        Item::Pagination(ctrl) => format_control(*ctrl),
    }
}

fn format_control(ctrl: PaginationControl) -> String {
    match ctrl {
        PaginationControl::Prev { page } => format!("Previous page ({})", page),
        PaginationControl::Next { page } => format!("Next page ({})", page),
        PaginationControl::Jump { page, total } => {
            format!("Page {} of {} (press Enter to jump)", page, total)
        }
        PaginationControl::Reply => "Reply to thread".to_string(),
    }
}

fn truncate_excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_LIMIT {
        let cut: String = text.chars().take(EXCERPT_LIMIT).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Suggested title for a target. The shell may replace member ids with
/// display names where it knows them.
pub(crate) fn title_for(target: &ContentTarget, pr: &PageResult) -> String {
    let base = match target {
        ContentTarget::Section { fid, .. } => format!("Section {}", fid),
        ContentTarget::Home {
            order: HomeOrder::Latest,
        } => "Latest threads".to_string(),
        ContentTarget::Home {
            order: HomeOrder::LastReply,
        } => "Latest replies".to_string(),
        ContentTarget::UserThreads { uid } => format!("Threads by member {}", uid),
        ContentTarget::UserPosts { uid } => format!("Replies by member {}", uid),
        ContentTarget::Search { keyword } => format!("Search: {}", keyword),
        ContentTarget::ThreadDetail { .. } => pr
            .title
            .clone()
            .unwrap_or_else(|| "Thread".to_string()),
        ContentTarget::MessageList => "Messages".to_string(),
        ContentTarget::MessageDetail { peer_uid } => {
            format!("Conversation with member {}", peer_uid)
        }
    };
    paged(base, pr)
}

/// Append "page X of Y" when the view spans more than one page.
pub(crate) fn paged(base: impl Into<String>, pr: &PageResult) -> String {
    let base = base.into();
    if pr.total_pages > 1 {
        format!("{} (page {} of {})", base, pr.page, pr.total_pages)
    } else {
        base
    }
}
