use serde_json::Value;

use crate::component::Factory;
use crate::context::Context;
use crate::element::{Attribute, CLASS_NAME, Child, Children, Element, ON_CLICK};
use crate::error::{Error, Result};
use crate::host::{Node, validate_attribute_name};

/// Builds a brand-new output subtree for `element`.
///
/// Nothing is reused: every call creates fresh nodes and binds fresh
/// listeners. `cx` is forwarded unchanged to every nested component and every
/// nested element.
pub fn render<S: Clone + 'static>(element: &Element<S>, cx: &Context<S>) -> Result<Node> {
    let node = Node::create_element(element.tag.as_str())?;

    for attr in &element.attributes {
        apply_attribute(&node, attr)?;
    }

    match element.effective_children() {
        Children::Empty => {}
        Children::Text(text) => node.append_child(&Node::text(text.as_str()))?,
        Children::Nested(f) => node.append_child(&render_nested(f, element, cx)?)?,
        Children::Element(child) => node.append_child(&render(child, cx)?)?,
        Children::Sequence(items) => {
            for item in items {
                let child = match item {
                    Child::Text(text) => Node::text(text.as_str()),
                    Child::Nested(f) => render_nested(f, element, cx)?,
                    Child::Element(child) => render(child, cx)?,
                };
                node.append_child(&child)?;
            }
        }
    }

    Ok(node)
}

/// Nested components inherit the state their parent was rendered with.
fn render_nested<S: Clone + 'static>(
    f: &Factory<S>,
    parent: &Element<S>,
    cx: &Context<S>,
) -> Result<Node> {
    let child = f.with_state(parent.state.clone()).with_context(cx)?;
    render(&child, cx)
}

fn apply_attribute(node: &Node, attr: &Attribute) -> Result<()> {
    match attr {
        Attribute::Event { kind, listener } => node.add_event_listener(*kind, listener.clone()),
        Attribute::ClassName(class) => node.set_class_name(class.as_str()),
        Attribute::Literal { name, .. } if name == ON_CLICK || name == CLASS_NAME => {
            Err(Error::ReservedAttribute(name.clone()))
        }
        Attribute::Literal { name, value } => {
            validate_attribute_name(name)?;
            node.set_attribute(name.as_str(), attribute_text(name, value)?)
        }
    }
}

fn attribute_text(name: &str, value: &Value) -> Result<String> {
    let unsupported = |kind| Error::UnsupportedAttributeValue {
        name: name.to_owned(),
        kind,
    };
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(unsupported("null")),
        Value::Array(_) => Err(unsupported("array")),
        Value::Object(_) => Err(unsupported("object")),
    }
}
