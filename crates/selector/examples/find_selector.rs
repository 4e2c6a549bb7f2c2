//! Build a small page and print a selector for every element, verifying
//! each one round-trips through its scope.

use dom::Document;
use selector::{find_css_selector, resolve_anonymous};
use serde_json::json;

fn main() -> dom::Result<()> {
    let doc = Document::from_json(&json!({
        "root": {
            "nodeType": 9,
            "nodeName": "#document",
            "children": [{
                "nodeType": 1,
                "nodeName": "HTML",
                "children": [
                    {"nodeType": 1, "nodeName": "HEAD"},
                    {"nodeType": 1, "nodeName": "BODY", "children": [
                        {"nodeType": 1, "nodeName": "NAV",
                         "attributes": ["id", "menu"], "children": [
                            {"nodeType": 1, "nodeName": "A",
                             "attributes": ["class", "item active"]},
                            {"nodeType": 1, "nodeName": "A",
                             "attributes": ["class", "item"]}
                        ]},
                        {"nodeType": 1, "nodeName": "VIDEO",
                         "attributes": ["id", "player"],
                         "shadowRoots": [{
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
    }))?;

    for node in doc.arena().node_ids() {
        if !doc.get(node)?.is_element() {
            continue;
        }
        let selector = find_css_selector(&doc, node);
        let resolved = resolve_anonymous(&doc, node);
        let verified = match resolved.scope {
            Some(scope) => {
                doc.query_selector_all(scope.0, &selector)? == vec![resolved.node]
            }
            None => false,
        };
        println!(
            "<{}> -> {selector:?} (round-trip: {verified})",
            doc.get(node)?.local_name().unwrap_or_default()
        );
    }

    Ok(())
}
