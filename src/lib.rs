//! bbsmate - screen-reader friendly forum client core.
//!
//! This library owns the content navigation and pagination state machine of
//! an accessible forum client: what is on screen, how to page through it,
//! how to filter a thread to one author, and how to put the cursor back
//! where it was when the user backs out. Rendering, dialogs and credential
//! handling live in the embedding application, behind the traits in
//! [`traits`].

pub mod adapters;
pub mod error;
pub mod filter;
pub mod models;
pub mod navigator;
pub mod prelude;
pub mod provider;
pub mod render;
pub mod traits;
pub mod wire;
