//! Core content model: what can be browsed, and what a fetched page looks like.
//!
//! These types are the normalized output of the content provider. Raw API
//! shapes live in [`crate::wire`]; nothing outside the provider and the
//! adapters should ever see those.

use serde::{Deserialize, Serialize};

/// Sort order for the home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeOrder {
    /// Threads ordered by creation ("latest").
    Latest,
    /// Threads ordered by last reply.
    LastReply,
}

impl HomeOrder {
    /// Query value the forum API expects for this ordering.
    pub fn api_value(self) -> &'static str {
        match self {
            HomeOrder::Latest => "tid",
            HomeOrder::LastReply => "lastpost",
        }
    }
}

/// Up to four nested category ids narrowing a section listing.
///
/// Sections expose a shallow taxonomy (`typeid1`..`typeid4`); a listing may
/// be filtered by any combination the section defines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub typeid1: Option<u64>,
    pub typeid2: Option<u64>,
    pub typeid3: Option<u64>,
    pub typeid4: Option<u64>,
}

impl CategoryFilter {
    pub fn is_empty(&self) -> bool {
        self.typeid1.is_none()
            && self.typeid2.is_none()
            && self.typeid3.is_none()
            && self.typeid4.is_none()
    }

    /// Query pairs for the non-empty levels, in API parameter order.
    pub fn query_pairs(&self) -> Vec<(&'static str, u64)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.typeid1 {
            pairs.push(("typeid1", id));
        }
        if let Some(id) = self.typeid2 {
            pairs.push(("typeid2", id));
        }
        if let Some(id) = self.typeid3 {
            pairs.push(("typeid3", id));
        }
        if let Some(id) = self.typeid4 {
            pairs.push(("typeid4", id));
        }
        pairs
    }
}

/// Everything the client can display, as a closed union.
///
/// Each variant carries its own parameters; there is no string-keyed
/// dispatch anywhere downstream of this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentTarget {
    /// Thread listing of one forum section, optionally category-filtered.
    Section { fid: u64, categories: CategoryFilter },
    /// The home feed.
    Home { order: HomeOrder },
    /// Threads started by a user.
    UserThreads { uid: u64 },
    /// Replies written by a user, flattened to thread summaries.
    UserPosts { uid: u64 },
    /// Full-text search results.
    Search { keyword: String },
    /// One thread: header plus paged reply floors.
    ThreadDetail { tid: u64 },
    /// Private-message conversation partners.
    MessageList,
    /// One private-message conversation.
    MessageDetail { peer_uid: u64 },
}

/// Field-free discriminant of [`ContentTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Section,
    Home,
    UserThreads,
    UserPosts,
    Search,
    ThreadDetail,
    MessageList,
    MessageDetail,
}

impl ContentTarget {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentTarget::Section { .. } => ContentKind::Section,
            ContentTarget::Home { .. } => ContentKind::Home,
            ContentTarget::UserThreads { .. } => ContentKind::UserThreads,
            ContentTarget::UserPosts { .. } => ContentKind::UserPosts,
            ContentTarget::Search { .. } => ContentKind::Search,
            ContentTarget::ThreadDetail { .. } => ContentKind::ThreadDetail,
            ContentTarget::MessageList => ContentKind::MessageList,
            ContentTarget::MessageDetail { .. } => ContentKind::MessageDetail,
        }
    }

    /// Detail views are pushed onto the stack; list views replace the top.
    pub fn is_detail(&self) -> bool {
        matches!(
            self,
            ContentTarget::ThreadDetail { .. } | ContentTarget::MessageDetail { .. }
        )
    }

    pub fn is_list(&self) -> bool {
        !self.is_detail()
    }
}

/// A request for one page of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub target: ContentTarget,
    /// Local (renumbered) page, 1-based.
    pub page: u32,
}

impl ContentRequest {
    pub fn new(target: ContentTarget) -> Self {
        Self { target, page: 1 }
    }

    pub fn at_page(target: ContentTarget, page: u32) -> Self {
        Self { target, page }
    }
}

/// One thread in a listing.
///
/// Timestamps are the server's preformatted display strings; the API never
/// returns machine-readable dates for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub tid: u64,
    pub subject: String,
    pub author: String,
    pub author_uid: u64,
    pub board: String,
    pub posted_at: String,
    pub views: u64,
    pub replies: u64,
    pub last_reply_at: String,
    pub last_reply_by: String,
}

/// One reply within a thread, with its global floor number.
///
/// `floor` is 1-based across the whole thread and survives both pagination
/// and author filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFloor {
    pub pid: u64,
    pub tid: u64,
    pub floor: u32,
    pub author: String,
    pub author_uid: u64,
    /// Body as delivered; markup stripping is the presentation layer's job.
    pub body: String,
    pub posted_at: String,
}

/// A private-message row: a conversation partner in the list view, or a
/// single message of a conversation in the detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageThread {
    pub peer_uid: u64,
    pub peer_name: String,
    pub excerpt: String,
    pub last_time: String,
}

/// Pagination control rows, presented inline so a screen-reader user can
/// reach them with the same arrow keys as the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationControl {
    Prev { page: u32 },
    Next { page: u32 },
    Jump { page: u32, total: u32 },
    Reply,
}

/// One display row.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Thread(ThreadSummary),
    Post(PostFloor),
    Message(MessageThread),
    Pagination(PaginationControl),
}

impl Item {
    /// Content rows carry data; pagination rows are chrome.
    pub fn is_content(&self) -> bool {
        !matches!(self, Item::Pagination(_))
    }

    /// Durable identifier used for selection restore, if the row has one.
    pub fn stable_id(&self) -> Option<StableId> {
        match self {
            Item::Thread(t) => Some(StableId::Thread(t.tid)),
            Item::Post(p) => Some(StableId::Post(p.pid)),
            Item::Message(m) => Some(StableId::Peer(m.peer_uid)),
            Item::Pagination(_) => None,
        }
    }
}

/// Durable row identity, preferred over positional index when restoring
/// selection after a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StableId {
    Thread(u64),
    Post(u64),
    Peer(u64),
}

/// Offset bookkeeping for a view whose leading remote pages were skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// `first_content_page - 1`; zero for unshifted views.
    pub offset: u32,
    /// Total pages in the remote page space.
    pub real_total: u32,
}

/// One normalized page of content.
///
/// `page` and `total_pages` are in the local, renumbered page space so that
/// pagination always presents page 1 as the first page with content;
/// `page_offset` and `real_total_pages` recover the remote space.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub items: Vec<Item>,
    pub page: u32,
    pub total_pages: u32,
    pub page_offset: u32,
    pub real_total_pages: u32,
    /// Thread subject for detail pages; listings have none.
    pub title: Option<String>,
}

impl PageResult {
    /// A single empty page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            page_offset: 0,
            real_total_pages: 1,
            title: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remote page this local page maps to.
    pub fn remote_page(&self) -> u32 {
        self.page + self.page_offset
    }

    pub fn pager(&self) -> Pager {
        Pager {
            offset: self.page_offset,
            real_total: self.real_total_pages,
        }
    }
}

/// One selectable category in a section's taxonomy.
///
/// `children` is only populated for first-level entries (the second level
/// nests under them); third- and fourth-level entries hang directly off the
/// section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: u64,
    pub name: String,
    pub children: Vec<CategoryEntry>,
}

/// One forum section with its category taxonomy, as shown in the shell's
/// navigation tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub fid: u64,
    pub name: String,
    pub typeid1: Vec<CategoryEntry>,
    pub typeid3: Vec<CategoryEntry>,
    pub typeid4: Vec<CategoryEntry>,
}
