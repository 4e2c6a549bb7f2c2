//! Selector synthesis.
//!
//! Produces the shortest reasonably-cheap selector that uniquely
//! identifies a node within its resolved scope. Candidates are probed in
//! strict priority order and the first unique one wins: a unique id, the
//! structurally unique root tags, a per-class ladder, and finally a
//! positional fallback chained up through the ancestors.

use crate::caps::{DocumentHost, ElementTree, ScopeId};
use crate::resolve::resolve_anonymous;
use dom::NodeId;
use tracing::trace;

/// Compute a selector uniquely identifying `node` within its resolved
/// scope.
///
/// The empty string is the sole failure signal: the node is not an
/// element, or it cannot be related to any container (detached, or the
/// host offers no addressable scope). Nothing panics and no error type
/// is involved.
///
/// The guarantee holds only for a tree left unmutated between this call
/// and the later query; no atomicity across the internal probes is
/// offered.
pub fn find_css_selector_in<H: DocumentHost + ?Sized>(host: &H, node: NodeId) -> String {
    if !host.is_element(node) {
        return String::new();
    }

    let resolved = resolve_anonymous(host, node);
    let Some(scope) = resolved.scope else {
        return String::new();
    };
    if !host.scope_contains(scope, resolved.node) {
        return String::new();
    }

    selector_within(host, scope, resolved.node)
}

/// One element in the scope matches the candidate. The probed node
/// matches every candidate it generates, so a count of one pins it.
fn is_unique<H: DocumentHost + ?Sized>(host: &H, scope: ScopeId, candidate: &str) -> bool {
    let count = host.query_selector_all(scope, candidate).len();
    trace!(candidate = %candidate, count, "uniqueness probe");
    count == 1
}

fn selector_within<H: DocumentHost + ?Sized>(host: &H, scope: ScopeId, node: NodeId) -> String {
    // A unique id wins outright. Duplicate ids are legal in HTML, so the
    // id is probed like any other candidate rather than assumed unique.
    if let Some(id) = host.element_id(node) {
        let candidate = format!("#{}", host.escape_ident(&id));
        if is_unique(host, scope, &candidate) {
            return candidate;
        }
    }

    let Some(tag) = host.local_name(node) else {
        return String::new();
    };

    // Root-level tags are unique by construction.
    if matches!(tag.as_str(), "html" | "head" | "body") {
        return tag;
    }

    let escaped_tag = host.escape_ident(&tag);

    // Class ladder, one token at a time: bare class, tag-qualified, then
    // tag-qualified with position. Deliberately never combines several
    // class tokens in one candidate.
    for class in host.class_list(node) {
        let mut candidate = format!(".{}", host.escape_ident(&class));
        if is_unique(host, scope, &candidate) {
            return candidate;
        }
        candidate = format!("{escaped_tag}{candidate}");
        if is_unique(host, scope, &candidate) {
            return candidate;
        }
        candidate = format!("{candidate}:nth-child({})", nth_child_ordinal(host, node));
        if is_unique(host, scope, &candidate) {
            return candidate;
        }
    }

    // Positional fallback. While ancestors remain below the scope
    // boundary, prefix the parent's selector; at the boundary the local
    // fragment stands alone.
    let local = format!("{escaped_tag}:nth-child({})", nth_child_ordinal(host, node));
    match host.parent_node(node) {
        Some(parent) if parent != scope.0 => {
            format!("{} > {}", selector_within(host, scope, parent), local)
        }
        _ => local,
    }
}

/// 0-based position of `node` in `candidates`, by identity.
fn position_in(candidates: &[NodeId], node: NodeId) -> Option<usize> {
    candidates.iter().position(|&candidate| candidate == node)
}

/// 1-based ordinal of `node` among its parent's element children.
fn nth_child_ordinal<H: ElementTree + ?Sized>(host: &H, node: NodeId) -> usize {
    host.parent_node(node)
        .map(|parent| host.element_children(parent))
        .and_then(|children| position_in(&children, node))
        .map_or(1, |index| index + 1)
}
