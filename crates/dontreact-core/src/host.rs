//! In-memory output nodes.
//!
//! A [`Node`] is a cheap, cloneable handle to either an element (tag, style
//! class, named attributes, event listeners, children) or a text node. This is
//! the whole surface the renderer and the mount controller need from a host:
//! clearing a container, creating and appending elements and text, setting
//! attributes and the style class, and registering click handlers.
//!
//! ```rust
//! use dontreact_core::host::{EventKind, Node};
//!
//! let root = Node::create_element("div")?;
//! let heading = Node::create_element("h1")?;
//! heading.set_class_name("big")?;
//! heading.append_child(&Node::text("Hello"))?;
//! root.append_child(&heading)?;
//!
//! assert_eq!(root.outer_html(), r#"<div><h1 class="big">Hello</h1></div>"#);
//! assert!(!heading.has_listener(EventKind::Click));
//! # Ok::<(), dontreact_core::Error>(())
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Event handler attached to an output node.
pub type Listener = Rc<dyn Fn() -> Result<()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
        }
    }
}

#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeInner>>);

struct NodeInner {
    kind: NodeKind,
    children: Vec<Node>,
}

impl NodeInner {
    fn element_mut(&mut self, op: &'static str) -> Result<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(Error::TextNode(op)),
        }
    }
}

enum NodeKind {
    Element(ElementData),
    Text(String),
}

struct ElementData {
    tag: String,
    class_name: Option<String>,
    attributes: Vec<(String, String)>,
    listeners: SmallVec<[(EventKind, Listener); 1]>,
}

/// Checks that `tag` can name an output node: non-empty, starts with an ASCII
/// letter, and contains only ASCII alphanumerics and `-`.
pub fn validate_tag(tag: &str) -> Result<()> {
    let mut chars = tag.chars();
    match chars.next() {
        None => Err(Error::EmptyTag),
        Some(first) if !first.is_ascii_alphabetic() => Err(Error::InvalidTag(tag.to_owned())),
        Some(_) => {
            if chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
                Ok(())
            } else {
                Err(Error::InvalidTag(tag.to_owned()))
            }
        }
    }
}

/// Checks that `name` can be written as an attribute: non-empty, without
/// whitespace, quotes, `>`, `/` or `=`. `class` is reserved for the style
/// class.
pub fn validate_attribute_name(name: &str) -> Result<()> {
    if name == "class" {
        return Err(Error::ReservedAttribute(name.to_owned()));
    }
    let bad = |c: char| {
        c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=')
    };
    if name.is_empty() || name.chars().any(bad) {
        return Err(Error::InvalidAttributeName(name.to_owned()));
    }
    Ok(())
}

impl Node {
    pub fn create_element(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        validate_tag(&tag)?;
        Ok(Self::from_kind(NodeKind::Element(ElementData {
            tag,
            class_name: None,
            attributes: Vec::new(),
            listeners: SmallVec::new(),
        })))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Text(content.into()))
    }

    fn from_kind(kind: NodeKind) -> Self {
        Node(Rc::new(RefCell::new(NodeInner {
            kind,
            children: Vec::new(),
        })))
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Text(_))
    }

    /// Tag of an element node, `None` for text.
    pub fn tag(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => Some(el.tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn class_name(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el.class_name.clone(),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el.attributes.clone(),
            NodeKind::Text(_) => Vec::new(),
        }
    }

    /// Sets (or overwrites) a named attribute.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        let value = value.into();
        validate_attribute_name(&name)?;
        let mut inner = self.0.borrow_mut();
        let el = inner.element_mut("set_attribute")?;
        match el.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => el.attributes.push((name, value)),
        }
        Ok(())
    }

    pub fn set_class_name(&self, class_name: impl Into<String>) -> Result<()> {
        let mut inner = self.0.borrow_mut();
        inner.element_mut("set_class_name")?.class_name = Some(class_name.into());
        Ok(())
    }

    pub fn add_event_listener(&self, kind: EventKind, listener: Listener) -> Result<()> {
        let mut inner = self.0.borrow_mut();
        inner.element_mut("add_event_listener")?.listeners.push((kind, listener));
        Ok(())
    }

    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.listener_count(kind) > 0
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el.listeners.iter().filter(|(k, _)| *k == kind).count(),
            NodeKind::Text(_) => 0,
        }
    }

    /// Runs every `kind` listener of this node in registration order. The
    /// first failing listener stops dispatch and its error is returned.
    pub fn dispatch(&self, kind: EventKind) -> Result<()> {
        // Listeners may replace this node's subtree, so no borrow is held
        // while they run.
        let listeners: SmallVec<[Listener; 1]> = match &self.0.borrow().kind {
            NodeKind::Element(el) => el
                .listeners
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, l)| l.clone())
                .collect(),
            NodeKind::Text(_) => SmallVec::new(),
        };
        for listener in listeners {
            listener()?;
        }
        Ok(())
    }

    pub fn click(&self) -> Result<()> {
        self.dispatch(EventKind::Click)
    }

    pub fn append_child(&self, child: &Node) -> Result<()> {
        if self.ptr_eq(child) {
            return Err(Error::AppendToSelf);
        }
        let mut inner = self.0.borrow_mut();
        inner.element_mut("append_child")?;
        inner.children.push(child.clone());
        Ok(())
    }

    /// Drops every child of this node.
    pub fn clear_children(&self) {
        self.0.borrow_mut().children.clear();
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn first_child(&self) -> Option<Node> {
        self.0.borrow().children.first().cloned()
    }

    /// Concatenated text of this node and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let inner = self.0.borrow();
        if let NodeKind::Text(t) = &inner.kind {
            out.push_str(t);
        }
        for child in &inner.children {
            child.collect_text(out);
        }
    }

    /// First descendant element (depth-first, document order) with `tag`.
    pub fn find_by_tag(&self, tag: &str) -> Option<Node> {
        for child in self.0.borrow().children.iter() {
            if child.tag().as_deref() == Some(tag) {
                return Some(child.clone());
            }
            if let Some(found) = child.find_by_tag(tag) {
                return Some(found);
            }
        }
        None
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.0.borrow().children.iter() {
            child.write_html(&mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        let inner = self.0.borrow();
        match &inner.kind {
            NodeKind::Text(t) => escape_into(out, t, false),
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                if let Some(class) = &el.class_name {
                    out.push_str(" class=\"");
                    escape_into(out, class, true);
                    out.push('"');
                }
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(out, value, true);
                    out.push('"');
                }
                out.push('>');
                for child in &inner.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }

    /// Structural copy of the subtree, without listener identities.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.0.borrow();
        match &inner.kind {
            NodeKind::Text(t) => Snapshot::Text { content: t.clone() },
            NodeKind::Element(el) => Snapshot::Element {
                tag: el.tag.clone(),
                class_name: el.class_name.clone(),
                attributes: el.attributes.clone(),
                listeners: el.listeners.iter().map(|(k, _)| *k).collect(),
                children: inner.children.iter().map(Node::snapshot).collect(),
            },
        }
    }
}

fn escape_into(out: &mut String, s: &str, attr: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outer_html())
    }
}

/// Serializable, comparable view of an output-node tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Snapshot {
    Element {
        tag: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attributes: Vec<(String, String)>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        listeners: Vec<EventKind>,
        children: Vec<Snapshot>,
    },
    Text {
        content: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn listener(f: impl Fn() -> Result<()> + 'static) -> Listener {
        Rc::new(f)
    }

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("div").is_ok());
        assert!(validate_tag("my-widget2").is_ok());
        assert!(matches!(validate_tag(""), Err(Error::EmptyTag)));
        assert!(matches!(validate_tag("2col"), Err(Error::InvalidTag(_))));
        assert!(matches!(validate_tag("a b"), Err(Error::InvalidTag(_))));
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let n = Node::create_element("a").unwrap();
        n.set_attribute("href", "/x").unwrap();
        n.set_attribute("title", "t").unwrap();
        n.set_attribute("href", "/y").unwrap();
        assert_eq!(
            n.attributes(),
            vec![
                ("href".to_string(), "/y".to_string()),
                ("title".to_string(), "t".to_string())
            ]
        );
    }

    #[test]
    fn test_html_escaping() {
        let n = Node::create_element("p").unwrap();
        n.set_attribute("data-q", "\"<&>\"").unwrap();
        n.append_child(&Node::text("a < b & c")).unwrap();
        assert_eq!(
            n.outer_html(),
            r#"<p data-q="&quot;&lt;&amp;&gt;&quot;">a &lt; b &amp; c</p>"#
        );
    }

    #[test]
    fn test_click_runs_listeners_in_order() {
        let n = Node::create_element("button").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let seen = seen.clone();
            n.add_event_listener(
                EventKind::Click,
                listener(move || {
                    seen.borrow_mut().push(i);
                    Ok(())
                }),
            )
            .unwrap();
        }
        n.click().unwrap();
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_click_stops_on_error() {
        let n = Node::create_element("button").unwrap();
        let later = Rc::new(Cell::new(false));
        n.add_event_listener(EventKind::Click, listener(|| Err(Error::Stopped)))
            .unwrap();
        let l = later.clone();
        n.add_event_listener(
            EventKind::Click,
            listener(move || {
                l.set(true);
                Ok(())
            }),
        )
        .unwrap();
        assert!(matches!(n.click(), Err(Error::Stopped)));
        assert!(!later.get());
    }

    #[test]
    fn test_find_by_tag_and_text_content() {
        let root = Node::create_element("div").unwrap();
        let section = Node::create_element("section").unwrap();
        let h2 = Node::create_element("h2").unwrap();
        h2.append_child(&Node::text("Sub")).unwrap();
        section.append_child(&h2).unwrap();
        root.append_child(&Node::text("Top ")).unwrap();
        root.append_child(&section).unwrap();

        assert!(root.find_by_tag("h2").unwrap().ptr_eq(&h2));
        assert!(root.find_by_tag("h1").is_none());
        assert_eq!(root.text_content(), "Top Sub");
    }

    #[test]
    fn test_text_nodes_reject_element_operations() {
        let t = Node::text("x");
        assert!(matches!(t.set_attribute("id", "y"), Err(Error::TextNode("set_attribute"))));
        assert!(matches!(t.set_class_name("c"), Err(Error::TextNode("set_class_name"))));
        assert!(matches!(
            t.add_event_listener(EventKind::Click, listener(|| Ok(()))),
            Err(Error::TextNode("add_event_listener"))
        ));
        assert!(matches!(t.append_child(&Node::text("z")), Err(Error::TextNode("append_child"))));
        assert!(t.attributes().is_empty());
        assert_eq!(t.child_count(), 0);
        assert_eq!(t.tag(), None);
        assert!(!t.has_listener(EventKind::Click));
    }

    #[test]
    fn test_append_to_self_fails() {
        let n = Node::create_element("div").unwrap();
        assert!(matches!(n.append_child(&n), Err(Error::AppendToSelf)));
        assert_eq!(n.child_count(), 0);
    }

    #[test]
    fn test_validate_attribute_name() {
        assert!(validate_attribute_name("id").is_ok());
        assert!(validate_attribute_name("data-x").is_ok());
        assert!(validate_attribute_name("aria-label").is_ok());
        for bad in ["", "a b", "x\" onload=\"evil()", "a'b", "a>b", "a/b", "a=b", "\tid"] {
            assert!(
                matches!(validate_attribute_name(bad), Err(Error::InvalidAttributeName(ref n)) if n == bad),
                "{bad:?} was accepted"
            );
        }
        assert!(matches!(validate_attribute_name("class"), Err(Error::ReservedAttribute(_))));

        let n = Node::create_element("p").unwrap();
        assert!(n.set_attribute("a b", "1").is_err());
        assert!(n.attributes().is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let n = Node::create_element("h1").unwrap();
        n.set_class_name("title").unwrap();
        n.add_event_listener(EventKind::Click, listener(|| Ok(()))).unwrap();
        n.append_child(&Node::text("Hi")).unwrap();
        let json = serde_json::to_string(&n.snapshot()).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"element","tag":"h1","class_name":"title","listeners":["click"],"children":[{"kind":"text","content":"Hi"}]}"#
        );
    }
}
