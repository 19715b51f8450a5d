//! Prelude module for convenient imports.
//!
//! ```ignore
//! use bbsmate::prelude::*;
//! ```

// Navigation
pub use crate::navigator::{
    NavState, Navigator, Outcome, UserAction, UserContentKind, ViewState,
};

// Content model
pub use crate::models::{
    CategoryFilter, ContentKind, ContentRequest, ContentTarget, HomeOrder, Item, PageResult,
    PaginationControl, StableId, ThreadSummary,
};

// Fetching
pub use crate::error::{AuthError, FetchError};
pub use crate::provider::ContentProvider;
pub use crate::traits::{ForumApi, SessionHandle, SessionProvider};

// Presentation
pub use crate::render::{render_view, RenderView};
