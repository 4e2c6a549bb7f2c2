//! Core node types for the DOM substrate.
//!
//! Design notes:
//! 1. u32 indices instead of pointers; the arena owns every node
//! 2. SmallVec for child lists (most nodes have few children)
//! 3. Shadow roots are kept out of `children_ids` so ordinary child
//!    traversal never crosses a shadow boundary

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into the arena).
/// u32 allows 4 billion nodes, enough for any page.
pub type NodeId = u32;

/// Node type matching the DOM specification codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    EntityReference = 5,
    Entity = 6,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CdataSection),
            5 => Some(NodeType::EntityReference),
            6 => Some(NodeType::Entity),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            12 => Some(NodeType::Notation),
            _ => None,
        }
    }
}

/// Shadow root kind as reported by CDP.
///
/// `UserAgent` roots hold native-widget internal content and are not
/// addressable by page queries; `Open` and `Closed` roots are authored
/// by page content and expose their own query scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowRootKind {
    UserAgent,
    Open,
    Closed,
}

impl ShadowRootKind {
    /// Parse the CDP `shadowRootType` string.
    pub fn from_cdp(value: &str) -> Option<Self> {
        match value {
            "user-agent" => Some(ShadowRootKind::UserAgent),
            "open" => Some(ShadowRootKind::Open),
            "closed" => Some(ShadowRootKind::Closed),
            _ => None,
        }
    }

    /// Whether a root of this kind is queryable by page content.
    pub fn is_authored(self) -> bool {
        matches!(self, ShadowRootKind::Open | ShadowRootKind::Closed)
    }
}

/// A single DOM tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    /// Arena index, assigned on insertion.
    pub node_id: NodeId,
    pub node_type: NodeType,

    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    /// Raw node name as delivered by the host ("DIV", "#text", "#document").
    pub node_name: String,
    pub node_value: String,
    pub attributes: AHashMap<String, String>,

    /// Set when this node is a shadow root (DocumentFragment hosted by
    /// its parent element).
    pub shadow_kind: Option<ShadowRootKind>,
    /// Shadow roots hosted by this element, kept separate from
    /// `children_ids`.
    pub shadow_root_ids: SmallVec<[NodeId; 1]>,
}

impl DomNode {
    pub fn new(node_type: NodeType, node_name: impl Into<String>) -> Self {
        Self {
            node_id: 0,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: node_name.into(),
            node_value: String::new(),
            attributes: AHashMap::new(),
            shadow_kind: None,
            shadow_root_ids: SmallVec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// True for shadow roots (a DocumentFragment carrying a shadow kind).
    pub fn is_shadow_root(&self) -> bool {
        self.node_type == NodeType::DocumentFragment && self.shadow_kind.is_some()
    }

    /// Scope boundaries terminate upward containment walks: the document
    /// node and every shadow root.
    pub fn is_scope_boundary(&self) -> bool {
        self.node_type == NodeType::Document || self.is_shadow_root()
    }

    /// Tag name for element nodes, as delivered (usually uppercase).
    pub fn tag_name(&self) -> Option<&str> {
        if self.is_element() {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Lowercase tag name for element nodes.
    pub fn local_name(&self) -> Option<String> {
        self.tag_name().map(|t| t.to_ascii_lowercase())
    }

    /// Get attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// The `id` attribute, if present and non-empty.
    pub fn element_id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Class tokens in attribute order.
    pub fn class_list(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_codes_round_trip() {
        for code in 1..=12u8 {
            let ty = NodeType::from_u8(code).unwrap();
            assert_eq!(ty as u8, code);
        }
        assert_eq!(NodeType::from_u8(0), None);
        assert_eq!(NodeType::from_u8(13), None);
    }

    #[test]
    fn test_shadow_kind_from_cdp() {
        assert_eq!(
            ShadowRootKind::from_cdp("user-agent"),
            Some(ShadowRootKind::UserAgent)
        );
        assert_eq!(ShadowRootKind::from_cdp("open"), Some(ShadowRootKind::Open));
        assert_eq!(
            ShadowRootKind::from_cdp("closed"),
            Some(ShadowRootKind::Closed)
        );
        assert_eq!(ShadowRootKind::from_cdp("weird"), None);
        assert!(!ShadowRootKind::UserAgent.is_authored());
        assert!(ShadowRootKind::Closed.is_authored());
    }

    #[test]
    fn test_class_list_preserves_order() {
        let mut node = DomNode::new(NodeType::Element, "DIV");
        node.attributes
            .insert("class".to_string(), "  b a\tc ".to_string());
        assert_eq!(node.class_list(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_element_id_empty_is_none() {
        let mut node = DomNode::new(NodeType::Element, "DIV");
        node.attributes.insert("id".to_string(), String::new());
        assert_eq!(node.element_id(), None);
        node.attributes.insert("id".to_string(), "x".to_string());
        assert_eq!(node.element_id(), Some("x"));
    }

    #[test]
    fn test_scope_boundaries() {
        let doc = DomNode::new(NodeType::Document, "#document");
        assert!(doc.is_scope_boundary());

        let mut fragment = DomNode::new(NodeType::DocumentFragment, "#document-fragment");
        assert!(!fragment.is_scope_boundary());
        fragment.shadow_kind = Some(ShadowRootKind::Open);
        assert!(fragment.is_scope_boundary());
        assert!(fragment.is_shadow_root());

        let elem = DomNode::new(NodeType::Element, "DIV");
        assert!(!elem.is_scope_boundary());
    }
}
