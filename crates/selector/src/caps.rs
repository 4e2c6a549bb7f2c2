//! Capability interfaces consumed by selector generation.
//!
//! The generator never touches a concrete tree type: everything it
//! needs from the host environment is expressed here, so it runs over
//! any representation that can answer these questions. `crate::host`
//! provides the implementations for `dom::Document`.

use dom::NodeId;

/// Anchor of a container scope: the document node or a shadow root.
/// Selector uniqueness is judged against a scope, and the returned
/// selector is only guaranteed to match when queried against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(pub NodeId);

/// Answer from the anonymous-content capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundAncestor {
    /// Host offers no anonymous-content resolution; treated the same as
    /// `NotAnonymous`.
    Unsupported,
    /// The node is ordinary, addressable content.
    NotAnonymous,
    /// The externally addressable element that generates this node.
    Bound(NodeId),
}

/// Read-only structural facts about the tree.
pub trait ElementTree {
    fn is_element(&self, node: NodeId) -> bool;

    /// Lowercase tag name, for elements only.
    fn local_name(&self, node: NodeId) -> Option<String>;

    /// The `id` attribute, if present and non-empty.
    fn element_id(&self, node: NodeId) -> Option<String>;

    /// Class tokens in attribute order.
    fn class_list(&self, node: NodeId) -> Vec<String>;

    /// Parent node of any kind.
    fn parent_node(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in document order.
    fn element_children(&self, node: NodeId) -> Vec<NodeId>;
}

/// Host document capabilities: scope resolution and scoped queries.
pub trait DocumentHost: ElementTree {
    /// Scope of the node's owning document; `None` when the node belongs
    /// to no document at all.
    fn document_scope(&self, node: NodeId) -> Option<ScopeId>;

    /// Enclosing authored shadow root, if the node lives under one.
    /// User-agent shadow roots are not externally queryable and do not
    /// qualify.
    fn containing_shadow_scope(&self, node: NodeId) -> Option<ScopeId>;

    /// Anonymous-content capability; see [`BoundAncestor`].
    fn bound_ancestor(&self, node: NodeId) -> BoundAncestor;

    /// Does `scope` contain `node`, directly or transitively?
    fn scope_contains(&self, scope: ScopeId, node: NodeId) -> bool;

    /// Matches for `selector` inside `scope`, in document order.
    fn query_selector_all(&self, scope: ScopeId, selector: &str) -> Vec<NodeId>;

    /// Identifier escaping. Defaults to the CSSOM serialization rules;
    /// hosts with a native `CSS.escape` can delegate to it instead.
    fn escape_ident(&self, raw: &str) -> String {
        crate::escape::escape_ident(raw)
    }
}
