use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::component::Factory;
use crate::context::Context;
use crate::error::Result;
use crate::host::{EventKind, Listener};

/// Literal attribute key reserved for [`Attribute::ClassName`].
pub const CLASS_NAME: &str = "className";
/// Literal attribute key reserved for click [`Attribute::Event`] bindings.
pub const ON_CLICK: &str = "onClick";

/// One entry of an element's attribute set.
#[derive(Clone)]
pub enum Attribute {
    /// Applied to the output node as a named attribute.
    Literal { name: String, value: Value },
    /// The node's style class.
    ClassName(String),
    /// An event handler; never applied as a literal attribute.
    Event { kind: EventKind, listener: Listener },
}

impl Attribute {
    /// Key this entry occupies in the attribute set. Two entries with the same
    /// key replace each other.
    pub fn key(&self) -> &str {
        match self {
            Attribute::Literal { name, .. } => name,
            Attribute::ClassName(_) => CLASS_NAME,
            Attribute::Event {
                kind: EventKind::Click,
                ..
            } => ON_CLICK,
        }
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Literal { name, value } => f
                .debug_struct("Literal")
                .field("name", name)
                .field("value", value)
                .finish(),
            Attribute::ClassName(c) => f.debug_tuple("ClassName").field(c).finish(),
            Attribute::Event { kind, .. } => f
                .debug_struct("Event")
                .field("kind", kind)
                .field("listener", &"<callback>")
                .finish(),
        }
    }
}

/// What an element contains.
#[derive(Clone, Debug)]
pub enum Children<S> {
    Empty,
    Text(String),
    /// A component bound to its props, rendered with the parent's state and
    /// context.
    Nested(Factory<S>),
    Element(Box<Element<S>>),
    Sequence(Vec<Child<S>>),
}

/// One item of a [`Children::Sequence`].
#[derive(Clone, Debug)]
pub enum Child<S> {
    Text(String),
    Nested(Factory<S>),
    Element(Element<S>),
}

impl<S> Children<S> {
    /// `true` only for [`Children::Empty`]; an empty sequence is present.
    pub fn is_absent(&self) -> bool {
        matches!(self, Children::Empty)
    }

    fn push(&mut self, child: Child<S>) {
        let existing = std::mem::replace(self, Children::Empty);
        *self = match existing {
            Children::Empty => Children::Sequence(vec![child]),
            Children::Text(t) => Children::Sequence(vec![Child::Text(t), child]),
            Children::Nested(f) => Children::Sequence(vec![Child::Nested(f), child]),
            Children::Element(e) => Children::Sequence(vec![Child::Element(*e), child]),
            Children::Sequence(mut items) => {
                items.push(child);
                Children::Sequence(items)
            }
        };
    }
}

impl<S> Default for Children<S> {
    fn default() -> Self {
        Children::Empty
    }
}

impl<S> From<&str> for Children<S> {
    fn from(s: &str) -> Self {
        Children::Text(s.to_owned())
    }
}

impl<S> From<String> for Children<S> {
    fn from(s: String) -> Self {
        Children::Text(s)
    }
}

impl<S> From<Factory<S>> for Children<S> {
    fn from(f: Factory<S>) -> Self {
        Children::Nested(f)
    }
}

impl<S> From<Element<S>> for Children<S> {
    fn from(e: Element<S>) -> Self {
        Children::Element(Box::new(e))
    }
}

impl<S> From<Vec<Child<S>>> for Children<S> {
    fn from(items: Vec<Child<S>>) -> Self {
        Children::Sequence(items)
    }
}

impl<S> From<&str> for Child<S> {
    fn from(s: &str) -> Self {
        Child::Text(s.to_owned())
    }
}

impl<S> From<String> for Child<S> {
    fn from(s: String) -> Self {
        Child::Text(s)
    }
}

impl<S> From<Factory<S>> for Child<S> {
    fn from(f: Factory<S>) -> Self {
        Child::Nested(f)
    }
}

impl<S> From<Element<S>> for Child<S> {
    fn from(e: Element<S>) -> Self {
        Child::Element(e)
    }
}

/// Opaque key/value mapping handed down by a parent. Its `children` act as a
/// fallback when the element itself carries none.
#[derive(Clone, Debug)]
pub struct Props<S> {
    values: Map<String, Value>,
    children: Children<S>,
}

impl<S> Default for Props<S> {
    fn default() -> Self {
        Self {
            values: Map::new(),
            children: Children::Empty,
        }
    }
}

impl<S> Props<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: impl Into<Children<S>>) -> Self {
        self.children = children.into();
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn children(&self) -> &Children<S> {
        &self.children
    }
}

impl<S> From<Map<String, Value>> for Props<S> {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
            children: Children::Empty,
        }
    }
}

/// Element descriptor: an immutable description of one output node and its
/// subtree, produced by a component and consumed by [`crate::render`].
#[derive(Clone, Debug)]
pub struct Element<S> {
    pub tag: String,
    pub props: Props<S>,
    pub children: Children<S>,
    pub attributes: Vec<Attribute>,
    /// State in effect when this element was produced. Nested components
    /// under this element are invoked with it.
    pub state: Option<S>,
    pub context: Option<Context<S>>,
}

impl<S> Element<S> {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::default(),
            children: Children::Empty,
            attributes: Vec::new(),
            state: None,
            context: None,
        }
    }

    pub fn props(mut self, props: Props<S>) -> Self {
        self.props = props;
        self
    }

    pub fn children(mut self, children: impl Into<Children<S>>) -> Self {
        self.children = children.into();
        self
    }

    /// Appends one child, turning the current children into a sequence.
    pub fn child(mut self, child: impl Into<Child<S>>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attribute(Attribute::Literal {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn class_name(self, class_name: impl Into<String>) -> Self {
        self.attribute(Attribute::ClassName(class_name.into()))
    }

    pub fn on_click(self, handler: impl Fn() -> Result<()> + 'static) -> Self {
        self.attribute(Attribute::Event {
            kind: EventKind::Click,
            listener: Rc::new(handler),
        })
    }

    /// Adds an attribute entry, replacing any entry with the same key.
    pub fn attribute(mut self, attr: Attribute) -> Self {
        match self.attributes.iter_mut().find(|a| a.key() == attr.key()) {
            Some(slot) => *slot = attr,
            None => self.attributes.push(attr),
        }
        self
    }

    pub fn with_state(mut self, state: impl Into<Option<S>>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_context(mut self, cx: &Context<S>) -> Self {
        self.context = Some(cx.clone());
        self
    }

    /// `children` when present, otherwise `props.children`.
    pub fn effective_children(&self) -> &Children<S> {
        if self.children.is_absent() {
            &self.props.children
        } else {
            &self.children
        }
    }
}
