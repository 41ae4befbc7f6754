//! Node-level helpers over the rcdom tree
//!
//! `markup5ever_rcdom` exposes the raw node structure but none of the
//! editing conveniences the sanitizer needs. This module supplies them:
//! attribute access by local name, class tokens, detaching, renaming,
//! deep cloning, document-order materialization, serialization and
//! plain-text extraction.
//!
//! All traversals are iterative so that deeply nested input cannot exhaust
//! the stack.

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};

/// Tag name reported for document nodes (the root and template fragments)
pub const DOCUMENT_TAG: &str = "#document";

/// Elements whose text content is not part of the readable text
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Elements that separate words when the text is flattened
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "ol",
    "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Returns the tag name a rule matches against
///
/// Elements report their local name, document nodes report [`DOCUMENT_TAG`],
/// and every other node kind has no tag.
pub fn tag_name(node: &Handle) -> Option<String> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(name.local.to_string()),
        NodeData::Document => Some(DOCUMENT_TAG.to_string()),
        _ => None,
    }
}

/// Returns the parent of `node`, if it is still attached
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

/// Key an attribute is whitelisted and looked up by
///
/// Namespaced attributes from foreign content keep their prefix
/// (`xlink:href`), so they never share a key with the plain attribute.
fn attribute_key(attr: &Attribute) -> String {
    match attr.name.prefix {
        Some(ref prefix) => format!("{}:{}", prefix, attr.name.local),
        None => attr.name.local.to_string(),
    }
}

fn has_key(attr: &Attribute, name: &str) -> bool {
    match attr.name.prefix {
        Some(ref prefix) => name
            .split_once(':')
            .is_some_and(|(p, local)| p == &**prefix && local == &*attr.name.local),
        None => attr.name.local.as_ref() == name,
    }
}

/// Attribute keys in insertion order
pub fn attribute_names(node: &Handle) -> Vec<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs.borrow().iter().map(attribute_key).collect(),
        _ => Vec::new(),
    }
}

/// Returns the value of the attribute with the given key
pub fn get_attribute(node: &Handle, name: &str) -> Option<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| has_key(attr, name))
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Returns true if the node carries the attribute
pub fn has_attribute(node: &Handle, name: &str) -> bool {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .any(|attr| has_key(attr, name)),
        _ => false,
    }
}

/// Overwrites the value of an existing attribute
///
/// Attributes are only ever rewritten in place, so a missing attribute is
/// left missing.
pub fn set_attribute(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        for attr in attrs.borrow_mut().iter_mut() {
            if has_key(attr, name) {
                attr.value = StrTendril::from_slice(value);
            }
        }
    }
}

/// Removes every attribute with the given key
///
/// Returns true if anything was removed.
pub fn remove_attribute(node: &Handle, name: &str) -> bool {
    match node.data {
        NodeData::Element { ref attrs, .. } => {
            let mut attrs = attrs.borrow_mut();
            let before = attrs.len();
            attrs.retain(|attr| !has_key(attr, name));
            attrs.len() != before
        }
        _ => false,
    }
}

/// Class tokens derived from the `class` attribute, deduplicated in order
pub fn class_names(node: &Handle) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    if let Some(value) = get_attribute(node, "class") {
        for token in value.split_ascii_whitespace() {
            if !names.iter().any(|name| name == token) {
                names.push(token.to_string());
            }
        }
    }
    names
}

/// Rewrites the `class` attribute from a token list
///
/// An empty list removes the attribute.
pub fn set_class_names(node: &Handle, names: &[String]) {
    if names.is_empty() {
        remove_attribute(node, "class");
    } else {
        set_attribute(node, "class", &names.join(" "));
    }
}

/// Detaches `node` from its parent
///
/// The node keeps its own children, so an already collected handle to a
/// descendant stays valid but is no longer reachable from the document.
pub fn detach(node: &Handle) {
    if let Some(weak) = node.parent.take()
        && let Some(parent) = weak.upgrade()
    {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
}

fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Renames an element, returning the handle that now occupies its place
///
/// rcdom element names are immutable, so the element is rebuilt under the
/// new name with the original attributes and children moved across and the
/// new node spliced into the parent at the same position. Non-element nodes
/// are returned unchanged.
pub fn rename(node: &Handle, tag: &str) -> Handle {
    let NodeData::Element {
        ref name,
        ref attrs,
        ref template_contents,
        mathml_annotation_xml_integration_point,
    } = node.data
    else {
        return node.clone();
    };

    let renamed = Node::new(NodeData::Element {
        name: QualName::new(name.prefix.clone(), name.ns.clone(), LocalName::from(tag)),
        attrs: RefCell::new(attrs.take()),
        template_contents: RefCell::new(template_contents.take()),
        mathml_annotation_xml_integration_point,
    });

    let children = std::mem::take(&mut *node.children.borrow_mut());
    for child in children {
        append(&renamed, child);
    }

    if let Some(weak) = node.parent.take() {
        if let Some(parent) = weak.upgrade() {
            let mut siblings = parent.children.borrow_mut();
            if let Some(slot) = siblings.iter_mut().find(|child| Rc::ptr_eq(child, node)) {
                *slot = renamed.clone();
            }
        }
        renamed.parent.set(Some(weak));
    }

    renamed
}

fn shallow_copy(node: &Handle) -> Handle {
    let data = match node.data {
        NodeData::Document => NodeData::Document,
        NodeData::Doctype {
            ref name,
            ref public_id,
            ref system_id,
        } => NodeData::Doctype {
            name: name.clone(),
            public_id: public_id.clone(),
            system_id: system_id.clone(),
        },
        NodeData::Text { ref contents } => NodeData::Text {
            contents: RefCell::new(contents.borrow().clone()),
        },
        NodeData::Comment { ref contents } => NodeData::Comment {
            contents: contents.clone(),
        },
        NodeData::Element {
            ref name,
            ref attrs,
            ref template_contents,
            mathml_annotation_xml_integration_point,
        } => NodeData::Element {
            name: name.clone(),
            attrs: RefCell::new(attrs.borrow().clone()),
            template_contents: RefCell::new(template_contents.borrow().as_ref().map(deep_clone)),
            mathml_annotation_xml_integration_point,
        },
        NodeData::ProcessingInstruction {
            ref target,
            ref contents,
        } => NodeData::ProcessingInstruction {
            target: target.clone(),
            contents: contents.clone(),
        },
    };
    Node::new(data)
}

/// Copies a subtree so it can be mutated without touching the original
pub fn deep_clone(node: &Handle) -> Handle {
    let root = shallow_copy(node);
    let mut stack = vec![(node.clone(), root.clone())];
    while let Some((source, copy)) = stack.pop() {
        for child in source.children.borrow().iter() {
            let child_copy = shallow_copy(child);
            append(&copy, child_copy.clone());
            stack.push((child.clone(), child_copy));
        }
    }
    root
}

/// A node collected by [`materialize`] together with its parent's index
pub struct Materialized {
    pub handle: Handle,
    pub parent: Option<usize>,
}

/// Collects every node under `root` (inclusive) in document order
///
/// The returned list is a snapshot: detaching or renaming nodes afterwards
/// does not change it. Template contents are visited after their element.
pub fn materialize(root: &Handle) -> Vec<Materialized> {
    let mut nodes = Vec::new();
    let mut stack = vec![(root.clone(), None)];
    while let Some((handle, parent)) = stack.pop() {
        let index = nodes.len();
        let mut pending: Vec<Handle> = handle.children.borrow().clone();
        if let NodeData::Element {
            ref template_contents,
            ..
        } = handle.data
            && let Some(fragment) = template_contents.borrow().clone()
        {
            pending.push(fragment);
        }
        for child in pending.into_iter().rev() {
            stack.push((child, Some(index)));
        }
        nodes.push(Materialized { handle, parent });
    }
    nodes
}

fn find_child_element(node: &Handle, tag: &str) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { ref name, .. } if name.local.as_ref() == tag))
        .cloned()
}

/// Returns the `body` element of a parsed document
pub fn body(document: &Handle) -> Option<Handle> {
    let html = find_child_element(document, "html")?;
    find_child_element(&html, "body")
}

/// Serializes the children of `node` back to markup
///
/// Serialization into memory cannot fail in practice; if it ever does the
/// result is empty rather than partially written markup.
pub fn inner_html(node: &Handle) -> String {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    if let Err(err) = serialize(&mut bytes, &SerializableHandle::from(node.clone()), opts) {
        tracing::warn!(error = %err, "markup serialization failed");
        return String::new();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Extracts the readable text of a subtree
///
/// Text of `script`, `style` and `template` elements is skipped, block
/// boundaries separate words, and whitespace runs collapse to single
/// spaces with the ends trimmed.
pub fn text_content(root: &Handle) -> String {
    let mut raw = String::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        match node.data {
            NodeData::Text { ref contents } => raw.push_str(&contents.borrow()),
            NodeData::Element { ref name, .. } => {
                let local = name.local.as_ref();
                if NON_TEXT_ELEMENTS.contains(&local) {
                    continue;
                }
                if BLOCK_ELEMENTS.contains(&local) {
                    raw.push(' ');
                }
                stack.extend(node.children.borrow().iter().rev().cloned());
            }
            NodeData::Document => {
                stack.extend(node.children.borrow().iter().rev().cloned());
            }
            _ => {}
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
