//! Document construction and tree navigation.
//!
//! A `Document` owns one arena and is built from CDP
//! `DOM.getDocument`-shaped JSON: `nodeType`, `nodeName`, `nodeValue`, a
//! flat `attributes` key/value array, `children`, and `shadowRoots` with
//! `shadowRootType`. Shadow subtrees are linked through
//! `shadow_root_ids`, never through `children_ids`, which keeps scope
//! encapsulation a structural property of the tree.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType, ShadowRootKind};
use serde_json::Value;
use smallvec::SmallVec;

/// Configuration for document ingestion.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Pre-allocated arena capacity.
    pub capacity: usize,
    /// Maximum nesting depth accepted from the payload.
    pub max_depth: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            max_depth: 256,
        }
    }
}

/// A parsed DOM tree rooted at a document node.
#[derive(Debug)]
pub struct Document {
    arena: DomArena,
    root: NodeId,
}

impl Document {
    /// Build a document from a CDP-shaped payload with default config.
    ///
    /// Input format matches CDP's `DOM.getDocument` response:
    /// ```json
    /// {
    ///   "root": {
    ///     "nodeType": 9,
    ///     "nodeName": "#document",
    ///     "children": [...]
    ///   }
    /// }
    /// ```
    pub fn from_json(payload: &Value) -> Result<Self> {
        Self::from_json_with_config(payload, DocumentConfig::default())
    }

    /// Build a document from a CDP-shaped payload.
    pub fn from_json_with_config(payload: &Value, config: DocumentConfig) -> Result<Self> {
        let root_value = payload
            .get("root")
            .ok_or_else(|| DomError::MalformedTree("missing 'root' in payload".to_string()))?;

        let mut doc = Self {
            arena: DomArena::with_capacity(config.capacity),
            root: 0,
        };
        let root_id = doc.parse_node(root_value, None, 0, &config)?;
        doc.arena.set_root(root_id)?;
        doc.root = root_id;
        Ok(doc)
    }

    /// Build a document from raw JSON text.
    pub fn from_json_str(payload: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_json(&value)
    }

    /// Recursively parse one payload node into the arena.
    fn parse_node(
        &mut self,
        value: &Value,
        parent_id: Option<NodeId>,
        depth: usize,
        config: &DocumentConfig,
    ) -> Result<NodeId> {
        if depth > config.max_depth {
            return Err(DomError::MaxDepthExceeded {
                current: depth,
                max: config.max_depth,
            });
        }

        let type_code = value
            .get("nodeType")
            .and_then(Value::as_u64)
            .ok_or_else(|| DomError::MalformedTree("missing nodeType".to_string()))?
            as u8;
        let node_type = NodeType::from_u8(type_code).ok_or(DomError::InvalidNodeType(type_code))?;

        let node_name = value.get("nodeName").and_then(Value::as_str).unwrap_or("");
        let mut node = DomNode::new(node_type, node_name);
        node.node_value = value
            .get("nodeValue")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        node.parent_id = parent_id;

        // Attributes arrive as a flat [key, value, key, value, ...] array
        if let Some(attrs) = value.get("attributes").and_then(Value::as_array) {
            let mut i = 0;
            while i + 1 < attrs.len() {
                if let (Some(key), Some(val)) = (attrs[i].as_str(), attrs[i + 1].as_str()) {
                    node.attributes.insert(key.to_string(), val.to_string());
                }
                i += 2;
            }
        }

        if let Some(kind) = value.get("shadowRootType").and_then(Value::as_str) {
            node.shadow_kind = ShadowRootKind::from_cdp(kind);
        }

        let current = self.arena.add_node(node);

        if let Some(children) = value.get("children").and_then(Value::as_array) {
            let mut child_ids = SmallVec::new();
            for child in children {
                child_ids.push(self.parse_node(child, Some(current), depth + 1, config)?);
            }
            self.arena.get_mut(current)?.children_ids = child_ids;
        }

        if let Some(shadow_roots) = value.get("shadowRoots").and_then(Value::as_array) {
            let mut shadow_ids = SmallVec::new();
            for shadow in shadow_roots {
                shadow_ids.push(self.parse_node(shadow, Some(current), depth + 1, config)?);
            }
            self.arena.get_mut(current)?.shadow_root_ids = shadow_ids;
        }

        Ok(current)
    }

    /// The document node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Reference to the internal arena.
    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    /// Get a node by ID.
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.arena.get(node_id)
    }

    /// Does the scope anchored at `anchor` contain `node`?
    ///
    /// Walks the parent chain; crossing any scope boundary other than the
    /// anchor (the document node or a shadow root) answers no. Detached
    /// nodes reach no anchor at all.
    pub fn contains(&self, anchor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == anchor {
                return true;
            }
            let Ok(n) = self.arena.get(id) else {
                return false;
            };
            if n.is_scope_boundary() {
                return false;
            }
            current = n.parent_id;
        }
        false
    }

    /// Parent node of any kind.
    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).ok()?.parent_id
    }

    /// Parent, only if it is an element. Scope boundaries are never
    /// elements, so ancestor walks through this method stay inside the
    /// node's own tree.
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let parent_id = self.parent_node(node)?;
        let parent = self.arena.get(parent_id).ok()?;
        parent.is_element().then_some(parent_id)
    }

    /// Element children of a node, in document order.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        let Ok(n) = self.arena.get(node) else {
            return Vec::new();
        };
        n.children_ids
            .iter()
            .copied()
            .filter(|&child| {
                self.arena
                    .get(child)
                    .map(|c| c.is_element())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// 1-based ordinal of `node` among its parent's element children.
    pub fn child_ordinal(&self, node: NodeId) -> Option<usize> {
        let parent_id = self.parent_node(node)?;
        self.element_children(parent_id)
            .iter()
            .position(|&child| child == node)
            .map(|i| i + 1)
    }

    /// Nearest ancestor shadow root of `node`, of any kind.
    pub fn containing_shadow_root(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.parent_node(node);
        while let Some(id) = current {
            let n = self.arena.get(id).ok()?;
            if n.is_shadow_root() {
                return Some(id);
            }
            if n.node_type == NodeType::Document {
                return None;
            }
            current = n.parent_id;
        }
        None
    }

    /// Host element of a shadow root.
    pub fn shadow_host(&self, shadow_root: NodeId) -> Option<NodeId> {
        let n = self.arena.get(shadow_root).ok()?;
        if !n.is_shadow_root() {
            return None;
        }
        n.parent_id
    }

    /// Unlink `node` from its parent, leaving the subtree detached in the
    /// arena. Mirrors `removeChild`: the node keeps its descendants but
    /// loses its place in the tree.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        let parent_id = self.arena.get(node)?.parent_id;
        if let Some(parent_id) = parent_id {
            let parent = self.arena.get_mut(parent_id)?;
            parent.children_ids.retain(|c| *c != node);
            parent.shadow_root_ids.retain(|c| *c != node);
        }
        self.arena.get_mut(node)?.parent_id = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_page() -> Document {
        let payload = json!({
            "root": {
                "nodeType": 9,
                "nodeName": "#document",
                "children": [{
                    "nodeType": 1,
                    "nodeName": "HTML",
                    "children": [
                        {"nodeType": 1, "nodeName": "HEAD"},
                        {"nodeType": 1, "nodeName": "BODY", "children": [
                            {"nodeType": 1, "nodeName": "DIV",
                             "attributes": ["id", "app", "class", "main wide"],
                             "children": [
                                {"nodeType": 3, "nodeName": "#text", "nodeValue": "hi"},
                                {"nodeType": 1, "nodeName": "SPAN"}
                             ]},
                            {"nodeType": 1, "nodeName": "VIDEO", "shadowRoots": [{
                                "nodeType": 11,
                                "nodeName": "#document-fragment",
                                "shadowRootType": "user-agent",
                                "children": [
                                    {"nodeType": 1, "nodeName": "BUTTON",
                                     "attributes": ["class", "play"]}
                                ]
                            }]}
                        ]}
                    ]
                }]
            }
        });
        Document::from_json(&payload).unwrap()
    }

    fn find_tag(doc: &Document, tag: &str) -> NodeId {
        doc.arena()
            .find_one(|n| n.node_name.eq_ignore_ascii_case(tag))
            .unwrap()
    }

    #[test]
    fn test_parse_simple_dom() {
        let doc = sample_page();
        assert_eq!(doc.get(doc.root_id()).unwrap().node_name, "#document");

        let div = find_tag(&doc, "DIV");
        let node = doc.get(div).unwrap();
        assert_eq!(node.element_id(), Some("app"));
        assert_eq!(node.class_list(), vec!["main", "wide"]);
    }

    #[test]
    fn test_shadow_roots_parsed_separately() {
        let doc = sample_page();
        let video = find_tag(&doc, "VIDEO");
        let node = doc.get(video).unwrap();
        assert!(node.children_ids.is_empty());
        assert_eq!(node.shadow_root_ids.len(), 1);

        let shadow = doc.get(node.shadow_root_ids[0]).unwrap();
        assert_eq!(shadow.shadow_kind, Some(ShadowRootKind::UserAgent));
        assert_eq!(doc.shadow_host(shadow.node_id), Some(video));
    }

    #[test]
    fn test_contains_respects_shadow_boundary() {
        let doc = sample_page();
        let span = find_tag(&doc, "SPAN");
        let button = find_tag(&doc, "BUTTON");
        let video = find_tag(&doc, "VIDEO");

        assert!(doc.contains(doc.root_id(), span));
        assert!(doc.contains(doc.root_id(), video));
        // Shadow content is not part of the document tree
        assert!(!doc.contains(doc.root_id(), button));

        let shadow = doc.containing_shadow_root(button).unwrap();
        assert!(doc.contains(shadow, button));
        assert!(!doc.contains(shadow, span));
    }

    #[test]
    fn test_element_children_skip_text() {
        let doc = sample_page();
        let div = find_tag(&doc, "DIV");
        let span = find_tag(&doc, "SPAN");
        assert_eq!(doc.element_children(div), vec![span]);
        assert_eq!(doc.child_ordinal(span), Some(1));
    }

    #[test]
    fn test_remove_node_detaches() {
        let mut doc = sample_page();
        let span = find_tag(&doc, "SPAN");
        let div = find_tag(&doc, "DIV");

        doc.remove_node(span).unwrap();
        assert!(!doc.contains(doc.root_id(), span));
        assert_eq!(doc.parent_node(span), None);
        assert!(!doc.element_children(div).contains(&span));
    }

    #[test]
    fn test_missing_node_type_rejected() {
        let payload = json!({"root": {"nodeName": "#document"}});
        assert!(matches!(
            Document::from_json(&payload),
            Err(DomError::MalformedTree(_))
        ));
    }

    #[test]
    fn test_invalid_node_type_rejected() {
        let payload = json!({"root": {"nodeType": 42, "nodeName": "#document"}});
        assert!(matches!(
            Document::from_json(&payload),
            Err(DomError::InvalidNodeType(42))
        ));
    }

    #[test]
    fn test_custom_depth_limit() {
        let payload = json!({"root": {
            "nodeType": 9, "nodeName": "#document", "children": [
                {"nodeType": 1, "nodeName": "HTML", "children": [
                    {"nodeType": 1, "nodeName": "BODY", "children": [
                        {"nodeType": 1, "nodeName": "DIV"}
                    ]}
                ]}
            ]
        }});
        let config = DocumentConfig {
            capacity: 16,
            max_depth: 2,
        };
        assert!(matches!(
            Document::from_json_with_config(&payload, config),
            Err(DomError::MaxDepthExceeded { current: 3, max: 2 })
        ));
        assert!(Document::from_json(&payload).is_ok());
    }

    #[test]
    fn test_max_depth_guard() {
        let mut node = json!({"nodeType": 1, "nodeName": "DIV"});
        for _ in 0..300 {
            node = json!({"nodeType": 1, "nodeName": "DIV", "children": [node]});
        }
        let payload = json!({"root": {
            "nodeType": 9, "nodeName": "#document", "children": [node]
        }});
        assert!(matches!(
            Document::from_json(&payload),
            Err(DomError::MaxDepthExceeded { .. })
        ));
    }

    #[test]
    fn test_from_json_str() {
        let doc = Document::from_json_str(
            r##"{"root": {"nodeType": 9, "nodeName": "#document",
                "children": [{"nodeType": 1, "nodeName": "HTML"}]}}"##,
        )
        .unwrap();
        assert_eq!(doc.arena().len(), 2);

        assert!(matches!(
            Document::from_json_str("not json"),
            Err(DomError::Parse(_))
        ));
    }
}
