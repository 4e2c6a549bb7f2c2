//! Anonymous-node resolution.
//!
//! Nodes inside encapsulated rendering content (native-widget internals,
//! shadow trees) are not reachable by ordinary document queries. This
//! step maps any node to the node/scope pair selector generation should
//! actually work with.

use crate::caps::{BoundAncestor, DocumentHost, ScopeId};
use dom::NodeId;
use tracing::trace;

/// Resolution result: the node to generate a selector for and the scope
/// uniqueness is judged against. `scope == None` means the node could
/// not be related to any container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub node: NodeId,
    pub scope: Option<ScopeId>,
}

/// Resolve a possibly-anonymous node.
///
/// A node inside an authored shadow tree keeps its identity and is
/// paired with that shadow root, which exposes its own query scope.
/// Anything else is climbed out of generated content one bound ancestor
/// at a time and paired with the owning document. Hosts without the
/// bound-ancestor capability answer `Unsupported`, which degrades to
/// treating the node as already addressable.
pub fn resolve_anonymous<H: DocumentHost + ?Sized>(host: &H, node: NodeId) -> Resolved {
    if let Some(scope) = host.containing_shadow_scope(node) {
        return Resolved {
            node,
            scope: Some(scope),
        };
    }

    let mut current = node;
    loop {
        match host.bound_ancestor(current) {
            BoundAncestor::Bound(ancestor) => {
                trace!(node = current, ancestor, "climbing to bound ancestor");
                current = ancestor;
            }
            BoundAncestor::Unsupported | BoundAncestor::NotAnonymous => break,
        }
    }

    Resolved {
        node: current,
        scope: host.document_scope(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::ElementTree;

    /// Minimal host: flat node space with scripted resolution answers.
    struct StubHost {
        bound: Vec<BoundAncestor>,
        shadow_scope: Option<(NodeId, ScopeId)>,
        document: Option<ScopeId>,
    }

    impl StubHost {
        fn new(bound: Vec<BoundAncestor>) -> Self {
            Self {
                bound,
                shadow_scope: None,
                document: Some(ScopeId(0)),
            }
        }
    }

    impl ElementTree for StubHost {
        fn is_element(&self, _node: NodeId) -> bool {
            true
        }
        fn local_name(&self, _node: NodeId) -> Option<String> {
            Some("div".to_string())
        }
        fn element_id(&self, _node: NodeId) -> Option<String> {
            None
        }
        fn class_list(&self, _node: NodeId) -> Vec<String> {
            Vec::new()
        }
        fn parent_node(&self, _node: NodeId) -> Option<NodeId> {
            None
        }
        fn element_children(&self, _node: NodeId) -> Vec<NodeId> {
            Vec::new()
        }
    }

    impl DocumentHost for StubHost {
        fn document_scope(&self, _node: NodeId) -> Option<ScopeId> {
            self.document
        }
        fn containing_shadow_scope(&self, node: NodeId) -> Option<ScopeId> {
            match self.shadow_scope {
                Some((for_node, scope)) if for_node == node => Some(scope),
                _ => None,
            }
        }
        fn bound_ancestor(&self, node: NodeId) -> BoundAncestor {
            self.bound
                .get(node as usize)
                .copied()
                .unwrap_or(BoundAncestor::NotAnonymous)
        }
        fn scope_contains(&self, _scope: ScopeId, _node: NodeId) -> bool {
            true
        }
        fn query_selector_all(&self, _scope: ScopeId, _selector: &str) -> Vec<NodeId> {
            Vec::new()
        }
    }

    #[test]
    fn shadow_scope_wins_without_climbing() {
        let mut host = StubHost::new(vec![BoundAncestor::Bound(1)]);
        host.shadow_scope = Some((5, ScopeId(42)));

        let resolved = resolve_anonymous(&host, 5);
        assert_eq!(resolved.node, 5);
        assert_eq!(resolved.scope, Some(ScopeId(42)));
    }

    #[test]
    fn climbs_bound_ancestors_to_the_top() {
        let host = StubHost::new(vec![
            BoundAncestor::NotAnonymous, // 0
            BoundAncestor::Bound(0),     // 1
            BoundAncestor::Bound(1),     // 2
            BoundAncestor::Bound(2),     // 3
        ]);

        let resolved = resolve_anonymous(&host, 3);
        assert_eq!(resolved.node, 0);
        assert_eq!(resolved.scope, Some(ScopeId(0)));
    }

    #[test]
    fn unsupported_capability_degrades_gracefully() {
        let host = StubHost::new(vec![BoundAncestor::Unsupported]);

        let resolved = resolve_anonymous(&host, 0);
        assert_eq!(resolved.node, 0);
        assert_eq!(resolved.scope, Some(ScopeId(0)));
    }

    #[test]
    fn missing_document_yields_no_scope() {
        let mut host = StubHost::new(vec![BoundAncestor::NotAnonymous]);
        host.document = None;

        let resolved = resolve_anonymous(&host, 0);
        assert_eq!(resolved.node, 0);
        assert_eq!(resolved.scope, None);
    }
}
