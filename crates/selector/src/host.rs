//! Capability implementations for `dom::Document`.

use crate::caps::{BoundAncestor, DocumentHost, ElementTree, ScopeId};
use dom::{Document, NodeId, ShadowRootKind};
use tracing::warn;

impl ElementTree for Document {
    fn is_element(&self, node: NodeId) -> bool {
        self.get(node).map(|n| n.is_element()).unwrap_or(false)
    }

    fn local_name(&self, node: NodeId) -> Option<String> {
        self.get(node).ok()?.local_name()
    }

    fn element_id(&self, node: NodeId) -> Option<String> {
        self.get(node).ok()?.element_id().map(str::to_string)
    }

    fn class_list(&self, node: NodeId) -> Vec<String> {
        self.get(node)
            .map(|n| n.class_list().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        Document::parent_node(self, node)
    }

    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        Document::element_children(self, node)
    }
}

impl DocumentHost for Document {
    fn document_scope(&self, _node: NodeId) -> Option<ScopeId> {
        Some(ScopeId(self.root_id()))
    }

    fn containing_shadow_scope(&self, node: NodeId) -> Option<ScopeId> {
        let root = self.containing_shadow_root(node)?;
        let kind = self.get(root).ok()?.shadow_kind?;
        kind.is_authored().then_some(ScopeId(root))
    }

    /// Native-widget internals live in user-agent shadow roots; the host
    /// element is their externally addressable proxy.
    fn bound_ancestor(&self, node: NodeId) -> BoundAncestor {
        let Some(root) = self.containing_shadow_root(node) else {
            return BoundAncestor::NotAnonymous;
        };
        match self.get(root).ok().and_then(|n| n.shadow_kind) {
            Some(ShadowRootKind::UserAgent) => match self.shadow_host(root) {
                Some(host) => BoundAncestor::Bound(host),
                None => BoundAncestor::NotAnonymous,
            },
            _ => BoundAncestor::NotAnonymous,
        }
    }

    fn scope_contains(&self, scope: ScopeId, node: NodeId) -> bool {
        self.contains(scope.0, node)
    }

    fn query_selector_all(&self, scope: ScopeId, selector: &str) -> Vec<NodeId> {
        match Document::query_selector_all(self, scope.0, selector) {
            Ok(matches) => matches,
            Err(err) => {
                // Generated candidates are always grammar-valid, so a
                // failure here points at a caller-supplied scope or
                // selector
                warn!(%err, selector, "scoped query failed");
                Vec::new()
            }
        }
    }
}
