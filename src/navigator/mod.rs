//! Navigation stack and view-state owner.
//!
//! One [`Navigator`] is the single source of truth for what is on screen:
//! the current [`ViewState`], at most one author-filter overlay and at most
//! one member-content overlay, plus the anchors needed to walk back out.
//! Every fetch failure leaves the current view untouched; the screen never
//! goes blank on error.
//!
//! Re-entrancy: each navigation takes a monotonically increasing generation
//! id. A result whose generation has been superseded is discarded instead
//! of overwriting newer state, standing in for true request cancellation.

pub mod selection;
mod view;

pub use selection::Remembered;
pub use view::ViewState;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::filter::AuthorFilter;
use crate::models::{
    ContentKind, ContentRequest, ContentTarget, Item, PageResult, PaginationControl,
};
use crate::provider::ContentProvider;
use crate::render::{self, RenderView};

/// Which of a member's content to browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserContentKind {
    Threads,
    Posts,
}

/// Actions forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    ActivateRow(usize),
    NextPage,
    PrevPage,
    JumpToPage(u32),
    Back,
    Refresh,
    FilterByAuthor(usize),
    ViewAuthorContent(usize, UserContentKind),
    ExitFilter,
    ExitUserContent,
}

/// Where the navigator currently is, for the presentation layer and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Blank,
    RootList,
    ThreadDetail,
    FilteredThreadDetail,
    UserContentList,
    MessageList,
    MessageDetail,
}

/// What a dispatched action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The current view changed; render it.
    Rendered,
    /// The action failed; the previous view is still current.
    Notice(String),
    /// The user must sign in before anything can be fetched.
    AuthRequired,
    /// A newer navigation superseded this one; nothing changed.
    Superseded,
    /// The shell should ask for a page number.
    PromptPageJump { page: u32, total: u32 },
    /// The shell should open its reply editor.
    PromptReply { tid: u64 },
    /// Nothing to do.
    NoOp,
}

/// Author-filter overlay over a thread-detail view.
#[derive(Debug, Clone)]
pub struct FilterContext {
    pub filter: AuthorFilter,
    /// The unfiltered view exactly as it was when the filter was applied.
    base: Box<ViewState>,
}

/// Member-content overlay: browsing one member's threads or replies from
/// inside a thread.
#[derive(Debug, Clone)]
pub struct UserContentContext {
    pub username: String,
    pub uid: u64,
    pub kind: UserContentKind,
    /// The pre-member-content list; the second Back lands here.
    return_anchor: Box<ViewState>,
    /// The member-content list, saved while one of its threads is open.
    list_anchor: Option<Box<ViewState>>,
}

/// Owns the current view and all back-navigation state.
pub struct Navigator {
    provider: ContentProvider,
    current: Option<ViewState>,
    /// List view saved when a detail was entered at root level.
    root_anchor: Option<ViewState>,
    filter: Option<FilterContext>,
    user_content: Option<UserContentContext>,
    generation: u64,
}

impl Navigator {
    pub fn new(provider: ContentProvider) -> Self {
        Self {
            provider,
            current: None,
            root_anchor: None,
            filter: None,
            user_content: None,
            generation: 0,
        }
    }

    pub fn current_view(&self) -> Option<&ViewState> {
        self.current.as_ref()
    }

    pub fn active_filter(&self) -> Option<&AuthorFilter> {
        self.filter.as_ref().map(|ctx| &ctx.filter)
    }

    pub fn user_content_context(&self) -> Option<&UserContentContext> {
        self.user_content.as_ref()
    }

    /// Render rows for the current view, if any.
    pub fn render(&self) -> Option<RenderView> {
        self.current.as_ref().map(render::render_view)
    }

    pub fn state(&self) -> NavState {
        let Some(view) = &self.current else {
            return NavState::Blank;
        };
        match view.kind() {
            ContentKind::ThreadDetail => {
                if self.filter.is_some() {
                    NavState::FilteredThreadDetail
                } else {
                    NavState::ThreadDetail
                }
            }
            ContentKind::MessageList => NavState::MessageList,
            ContentKind::MessageDetail => NavState::MessageDetail,
            ContentKind::UserThreads | ContentKind::UserPosts
                if self.user_content.is_some() =>
            {
                NavState::UserContentList
            }
            _ => NavState::RootList,
        }
    }

    /// Invalidate any in-flight fetch; its result will be discarded.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Front door for presentation-layer actions.
    pub async fn dispatch(&mut self, action: UserAction) -> Outcome {
        debug!(?action, state = ?self.state(), "dispatch");
        match action {
            UserAction::ActivateRow(index) => self.activate_row(index).await,
            UserAction::NextPage => self.next_page().await,
            UserAction::PrevPage => self.prev_page().await,
            UserAction::JumpToPage(page) => self.jump_to_page(page).await,
            UserAction::Back => self.go_back().await,
            UserAction::Refresh => self.refresh().await,
            UserAction::FilterByAuthor(index) => self.filter_by_author(index),
            UserAction::ViewAuthorContent(index, kind) => {
                self.enter_user_content(index, kind).await
            }
            UserAction::ExitFilter => self.exit_filter(),
            UserAction::ExitUserContent => self.exit_user_content().await,
        }
    }

    /// Root-level navigation from the shell's tree or search box. Replaces
    /// the whole stack on success.
    pub async fn navigate_root(&mut self, target: ContentTarget) -> Outcome {
        self.navigate(&ContentRequest::new(target)).await
    }

    /// Navigate to an explicit request at root level.
    pub async fn navigate(&mut self, request: &ContentRequest) -> Outcome {
        let gen = self.bump();
        match self.provider.fetch(request).await {
            Ok(pr) => self.install_root(gen, request.target.clone(), pr),
            Err(err) => self.error_outcome(gen, err),
        }
    }

    fn install_root(&mut self, gen: u64, target: ContentTarget, pr: PageResult) -> Outcome {
        if gen != self.generation {
            return Outcome::Superseded;
        }
        self.filter = None;
        self.user_content = None;
        self.root_anchor = None;
        self.current = Some(ViewState::fresh(target, pr));
        Outcome::Rendered
    }

    /// Activate the row under the cursor: open content, or run the
    /// pagination control it represents.
    pub async fn activate_row(&mut self, index: usize) -> Outcome {
        let (row, target) = match self.current.as_ref() {
            Some(view) => match view.rows.get(index) {
                Some(row) => (row.clone(), view.target.clone()),
                None => return Outcome::NoOp,
            },
            None => return Outcome::NoOp,
        };

        match row {
            Item::Pagination(PaginationControl::Prev { .. }) => self.prev_page().await,
            Item::Pagination(PaginationControl::Next { .. }) => self.next_page().await,
            Item::Pagination(PaginationControl::Jump { page, total }) => {
                Outcome::PromptPageJump { page, total }
            }
            Item::Pagination(PaginationControl::Reply) => match target {
                ContentTarget::ThreadDetail { tid } => Outcome::PromptReply { tid },
                _ => Outcome::NoOp,
            },
            Item::Thread(thread) => self.open_thread(index, thread.tid).await,
            Item::Message(message) => {
                if target.kind() == ContentKind::MessageList {
                    self.open_conversation(index, message.peer_uid).await
                } else {
                    Outcome::NoOp
                }
            }
            // reading a floor in full is the shell's read-only dialog
            Item::Post(_) => Outcome::NoOp,
        }
    }

    async fn open_thread(&mut self, from_index: usize, tid: u64) -> Outcome {
        let target = ContentTarget::ThreadDetail { tid };
        let gen = self.bump();
        match self.provider.fetch_page(&target, 1, None).await {
            Ok(pr) => {
                if gen != self.generation {
                    return Outcome::Superseded;
                }
                let Some(mut leaving) = self.current.take() else {
                    return Outcome::NoOp;
                };
                leaving.remember(from_index);
                self.stash_leaving(leaving);
                self.filter = None;
                self.current = Some(ViewState::fresh(target, pr));
                Outcome::Rendered
            }
            Err(err) => self.error_outcome(gen, err),
        }
    }

    async fn open_conversation(&mut self, from_index: usize, peer_uid: u64) -> Outcome {
        let target = ContentTarget::MessageDetail { peer_uid };
        let gen = self.bump();
        match self.provider.fetch_page(&target, 1, None).await {
            Ok(pr) => {
                if gen != self.generation {
                    return Outcome::Superseded;
                }
                let Some(mut leaving) = self.current.take() else {
                    return Outcome::NoOp;
                };
                leaving.remember(from_index);
                self.stash_leaving(leaving);
                self.current = Some(ViewState::fresh(target, pr));
                Outcome::Rendered
            }
            Err(err) => self.error_outcome(gen, err),
        }
    }

    /// File the view being left under the right anchor for the way back.
    fn stash_leaving(&mut self, leaving: ViewState) {
        let in_user_content_list = self.user_content.is_some()
            && matches!(
                leaving.kind(),
                ContentKind::UserThreads | ContentKind::UserPosts
            );
        if in_user_content_list {
            if let Some(ctx) = self.user_content.as_mut() {
                ctx.list_anchor = Some(Box::new(leaving));
            }
        } else if leaving.target.is_list() {
            self.root_anchor = Some(leaving);
        }
    }

    pub async fn next_page(&mut self) -> Outcome {
        let Some((page, total)) = self.page_bounds() else {
            return Outcome::NoOp;
        };
        if page >= total {
            return Outcome::NoOp;
        }
        self.goto_local_page(page + 1).await
    }

    pub async fn prev_page(&mut self) -> Outcome {
        let Some((page, _)) = self.page_bounds() else {
            return Outcome::NoOp;
        };
        if page <= 1 {
            return Outcome::NoOp;
        }
        self.goto_local_page(page - 1).await
    }

    pub async fn jump_to_page(&mut self, page: u32) -> Outcome {
        if self.current.is_none() {
            return Outcome::NoOp;
        }
        self.goto_local_page(page).await
    }

    fn page_bounds(&self) -> Option<(u32, u32)> {
        self.current
            .as_ref()
            .map(|v| (v.page_result.page, v.page_result.total_pages))
    }

    async fn goto_local_page(&mut self, page: u32) -> Outcome {
        let Some(current) = self.current.as_ref() else {
            return Outcome::NoOp;
        };
        let total = current.page_result.total_pages;
        if page < 1 || page > total {
            return Outcome::Notice(format!("Page must be between 1 and {}.", total));
        }
        let target = current.target.clone();
        let pager = Some(current.page_result.pager());

        let gen = self.bump();
        match self.provider.fetch_page(&target, page, pager).await {
            Ok(pr) => {
                if gen != self.generation {
                    return Outcome::Superseded;
                }
                let mut view = match &self.filter {
                    // paging while filtered re-filters the real remote page
                    Some(ctx) => ViewState::filtered(target, ctx.filter.apply(&pr), &ctx.filter),
                    None => ViewState::fresh(target, pr),
                };
                self.decorate_user_content_title(&mut view);
                self.current = Some(view);
                Outcome::Rendered
            }
            Err(err) => self.error_outcome(gen, err),
        }
    }

    /// Walk back one level: filter overlay, then member-content thread,
    /// then member-content list, then root detail. At root, does nothing.
    pub async fn go_back(&mut self) -> Outcome {
        if self.filter.is_some() {
            return self.exit_filter();
        }

        if self.user_content.is_some() {
            let in_thread = self
                .current
                .as_ref()
                .map(|v| v.kind() == ContentKind::ThreadDetail)
                .unwrap_or(false);
            let list_anchor = self
                .user_content
                .as_ref()
                .and_then(|c| c.list_anchor.as_deref().cloned());

            if in_thread {
                if let Some(saved) = list_anchor {
                    let gen = self.bump();
                    return match self.rebuild_list(&saved).await {
                        Ok(mut view) => {
                            if gen != self.generation {
                                return Outcome::Superseded;
                            }
                            self.decorate_user_content_title(&mut view);
                            if let Some(ctx) = self.user_content.as_mut() {
                                ctx.list_anchor = None;
                            }
                            self.current = Some(view);
                            Outcome::Rendered
                        }
                        Err(err) => self.error_outcome(gen, err),
                    };
                }
            }

            // second level: out of the member-content list entirely
            let Some(saved) = self
                .user_content
                .as_ref()
                .map(|c| (*c.return_anchor).clone())
            else {
                return Outcome::NoOp;
            };
            let gen = self.bump();
            return match self.rebuild_list(&saved).await {
                Ok(view) => {
                    if gen != self.generation {
                        return Outcome::Superseded;
                    }
                    self.user_content = None;
                    self.current = Some(view);
                    Outcome::Rendered
                }
                Err(err) => self.error_outcome(gen, err),
            };
        }

        let is_detail = self
            .current
            .as_ref()
            .map(|v| v.target.is_detail())
            .unwrap_or(false);
        if is_detail {
            if let Some(saved) = self.root_anchor.clone() {
                let gen = self.bump();
                return match self.rebuild_list(&saved).await {
                    Ok(view) => {
                        if gen != self.generation {
                            return Outcome::Superseded;
                        }
                        self.root_anchor = None;
                        self.current = Some(view);
                        Outcome::Rendered
                    }
                    Err(err) => self.error_outcome(gen, err),
                };
            }
        }

        Outcome::NoOp
    }

    /// Re-fetch a saved list at its saved page and restore its selection.
    async fn rebuild_list(&self, saved: &ViewState) -> Result<ViewState, FetchError> {
        let pager = if saved.page_result.page_offset > 0 {
            Some(saved.page_result.pager())
        } else {
            None
        };
        let pr = self
            .provider
            .fetch_page(&saved.target, saved.page_result.page, pager)
            .await?;
        Ok(ViewState::restored(
            saved.target.clone(),
            pr,
            saved.remembered.as_ref(),
        ))
    }

    /// Re-issue the current view's request for its own page, preserving the
    /// stack position and the selection where possible.
    pub async fn refresh(&mut self) -> Outcome {
        let Some(current) = self.current.clone() else {
            return Outcome::NoOp;
        };
        let pager = Some(current.page_result.pager());
        let gen = self.bump();
        match self
            .provider
            .fetch_page(&current.target, current.page_result.page, pager)
            .await
        {
            Ok(pr) => {
                if gen != self.generation {
                    return Outcome::Superseded;
                }
                let remembered = current.selected.map(|index| Remembered {
                    index,
                    stable_id: current.rows.get(index).and_then(Item::stable_id),
                });
                let mut view = match &self.filter {
                    Some(ctx) => {
                        let mut v = ViewState::filtered(
                            current.target.clone(),
                            ctx.filter.apply(&pr),
                            &ctx.filter,
                        );
                        v.selected = selection::restore(&v.rows, remembered.as_ref());
                        v
                    }
                    None => ViewState::restored(current.target.clone(), pr, remembered.as_ref()),
                };
                self.decorate_user_content_title(&mut view);
                self.current = Some(view);
                Outcome::Rendered
            }
            Err(err) => self.error_outcome(gen, err),
        }
    }

    /// Restrict the current thread page to the author of the floor at
    /// `index`. Client-side: no fetch happens.
    pub fn filter_by_author(&mut self, index: usize) -> Outcome {
        if self.filter.is_some() {
            return Outcome::Notice("Already filtering by an author.".to_string());
        }
        let Some(current) = self.current.as_mut() else {
            return Outcome::NoOp;
        };
        if current.kind() != ContentKind::ThreadDetail {
            return Outcome::NoOp;
        }
        let Some(Item::Post(post)) = current.rows.get(index).cloned() else {
            return Outcome::NoOp;
        };

        current.remember(index);
        let filter = AuthorFilter::new(post.author_uid, post.author);
        let filtered = filter.apply(&current.page_result);
        let target = current.target.clone();
        let base = Box::new(current.clone());
        self.filter = Some(FilterContext {
            filter: filter.clone(),
            base,
        });
        self.current = Some(ViewState::filtered(target, filtered, &filter));
        Outcome::Rendered
    }

    /// Drop the author filter and restore the wrapped page exactly as it
    /// was, selection included.
    pub fn exit_filter(&mut self) -> Outcome {
        match self.filter.take() {
            Some(ctx) => {
                self.current = Some(*ctx.base);
                Outcome::Rendered
            }
            None => Outcome::NoOp,
        }
    }

    /// Browse the threads or replies of the author of the floor at `index`.
    pub async fn enter_user_content(&mut self, index: usize, kind: UserContentKind) -> Outcome {
        if self.filter.is_some() {
            return Outcome::Notice("Exit the author filter first.".to_string());
        }
        if self.user_content.is_some() {
            return Outcome::Notice("Already browsing a member's content.".to_string());
        }
        let post = match self.current.as_ref() {
            Some(view) if view.kind() == ContentKind::ThreadDetail => {
                match view.rows.get(index) {
                    Some(Item::Post(post)) => post.clone(),
                    _ => return Outcome::NoOp,
                }
            }
            _ => return Outcome::NoOp,
        };

        let target = match kind {
            UserContentKind::Threads => ContentTarget::UserThreads {
                uid: post.author_uid,
            },
            UserContentKind::Posts => ContentTarget::UserPosts {
                uid: post.author_uid,
            },
        };
        let gen = self.bump();
        match self.provider.fetch_page(&target, 1, None).await {
            Ok(pr) => {
                if gen != self.generation {
                    return Outcome::Superseded;
                }
                // the list the thread was entered from is where the second
                // Back lands; the thread itself is skipped on the way out
                let return_anchor = match self.root_anchor.take() {
                    Some(anchor) => Box::new(anchor),
                    None => match self.current.clone() {
                        Some(view) => Box::new(view),
                        None => return Outcome::NoOp,
                    },
                };
                self.user_content = Some(UserContentContext {
                    username: post.author.clone(),
                    uid: post.author_uid,
                    kind,
                    return_anchor,
                    list_anchor: None,
                });
                let mut view = ViewState::fresh(target, pr);
                self.decorate_user_content_title(&mut view);
                self.current = Some(view);
                Outcome::Rendered
            }
            Err(err) => self.error_outcome(gen, err),
        }
    }

    /// Leave the member-content overlay directly, from whatever depth.
    pub async fn exit_user_content(&mut self) -> Outcome {
        let Some(saved) = self
            .user_content
            .as_ref()
            .map(|c| (*c.return_anchor).clone())
        else {
            return Outcome::NoOp;
        };
        let gen = self.bump();
        match self.rebuild_list(&saved).await {
            Ok(view) => {
                if gen != self.generation {
                    return Outcome::Superseded;
                }
                self.filter = None;
                self.user_content = None;
                self.current = Some(view);
                Outcome::Rendered
            }
            Err(err) => self.error_outcome(gen, err),
        }
    }

    /// Post a reply to the open thread, then refresh it. Write failures
    /// surface to the caller instead of degrading into a notice.
    pub async fn post_reply(&mut self, content: &str) -> Result<(), FetchError> {
        let tid = match self.current.as_ref().map(|v| v.target.clone()) {
            Some(ContentTarget::ThreadDetail { tid }) => tid,
            _ => return Err(FetchError::api("no thread is open")),
        };
        self.provider.post_reply(tid, content).await?;
        // the reply landed; a failed refresh only logs
        if let Outcome::Notice(message) = self.refresh().await {
            warn!(%message, "refresh after reply failed");
        }
        Ok(())
    }

    /// Send a message in the open conversation, then refresh it.
    pub async fn send_message(&mut self, content: &str) -> Result<(), FetchError> {
        let peer_uid = match self.current.as_ref().map(|v| v.target.clone()) {
            Some(ContentTarget::MessageDetail { peer_uid }) => peer_uid,
            _ => return Err(FetchError::api("no conversation is open")),
        };
        let subject = reply_subject(content);
        self.provider
            .send_message(peer_uid, &subject, content)
            .await?;
        if let Outcome::Notice(message) = self.refresh().await {
            warn!(%message, "refresh after message failed");
        }
        Ok(())
    }

    fn decorate_user_content_title(&self, view: &mut ViewState) {
        let Some(ctx) = &self.user_content else {
            return;
        };
        let base = match view.kind() {
            ContentKind::UserThreads => format!("Threads by {}", ctx.username),
            ContentKind::UserPosts => format!("Replies by {}", ctx.username),
            _ => return,
        };
        view.title = render::paged(base, &view.page_result);
    }

    fn error_outcome(&self, gen: u64, err: FetchError) -> Outcome {
        if gen != self.generation {
            return Outcome::Superseded;
        }
        warn!(error = %err, "fetch failed, keeping current view");
        if err.requires_reauth() {
            Outcome::AuthRequired
        } else {
            Outcome::Notice(err.user_message())
        }
    }
}

/// Subject line derived from the body, as the forum's own UI does.
fn reply_subject(content: &str) -> String {
    const LIMIT: usize = 20;
    if content.chars().count() > LIMIT {
        let head: String = content.chars().take(LIMIT).collect();
        format!("Re: {}...", head)
    } else {
        format!("Re: {}", content)
    }
}
