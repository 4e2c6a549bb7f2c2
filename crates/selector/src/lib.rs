//! Unique CSS selector generation.
//!
//! Given an element in a DOM tree, computes a selector string that,
//! queried against the element's containing document or shadow root,
//! returns exactly that element. Used to reference an element by a
//! short, stable, human-readable path instead of an internal handle.
//!
//! The algorithm is written against the capability traits in [`caps`],
//! so it runs over any tree that can answer structural questions and
//! scoped queries; [`host`] wires it to [`dom::Document`].
//!
//! ```
//! use dom::Document;
//! use selector::find_css_selector;
//!
//! let doc = Document::from_json_str(r##"{"root": {
//!     "nodeType": 9, "nodeName": "#document",
//!     "children": [{"nodeType": 1, "nodeName": "HTML", "children": [
//!         {"nodeType": 1, "nodeName": "BODY", "children": [
//!             {"nodeType": 1, "nodeName": "DIV", "attributes": ["id", "app"]}
//!         ]}
//!     ]}]
//! }}"##).unwrap();
//!
//! let div = doc.query_selector(doc.root_id(), "div").unwrap().unwrap();
//! assert_eq!(find_css_selector(&doc, div), "#app");
//! ```

pub mod caps;
pub mod escape;
pub mod host;
pub mod resolve;
pub mod synthesize;

pub use caps::{BoundAncestor, DocumentHost, ElementTree, ScopeId};
pub use resolve::{resolve_anonymous, Resolved};
pub use synthesize::find_css_selector_in;

use dom::{Document, NodeId};

/// Compute a selector uniquely identifying `node` within its resolved
/// container. Empty string when the node is not an element or cannot be
/// related to any container.
pub fn find_css_selector(doc: &Document, node: NodeId) -> String {
    synthesize::find_css_selector_in(doc, node)
}
