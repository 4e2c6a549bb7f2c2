//! Arena-backed DOM substrate.
//!
//! Holds a parsed DOM tree (including shadow roots) in a single arena
//! and exposes the scope operations selector generation needs:
//! containment tests, element navigation, and scoped selector queries.
//!
//! ## Core design
//!
//! ```text
//! CDP JSON → Document (arena of DomNode) → contains / query_selector_all
//!                         ↓
//!                   NodeId (u32)
//! ```

pub mod arena;
pub mod document;
pub mod error;
pub mod query;
pub mod types;

pub use arena::DomArena;
pub use document::{Document, DocumentConfig};
pub use error::{DomError, Result};
pub use types::*;
