use thiserror::Error;

/// Boxed error a component body may return; wrapped into [`Error::Component`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("element descriptor has an empty tag")]
    EmptyTag,

    #[error("element descriptor has an invalid tag `{0}`")]
    InvalidTag(String),

    /// `onClick` and `className` have dedicated attribute variants and may not
    /// be set as literal attributes.
    #[error("attribute `{0}` is reserved and cannot be set as a literal attribute")]
    ReservedAttribute(String),

    #[error("invalid attribute name `{0}`")]
    InvalidAttributeName(String),

    #[error("attribute `{name}` has an unsupported value of kind {kind}")]
    UnsupportedAttributeValue { name: String, kind: &'static str },

    #[error("`{0}` is not supported on a text node")]
    TextNode(&'static str),

    #[error("a node cannot be appended to itself")]
    AppendToSelf,

    #[error("component `{component}` failed")]
    Component {
        component: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("no context hook named `{0}`")]
    UnknownHook(String),

    #[error("mount has been stopped")]
    Stopped,

    #[error("mount is no longer alive")]
    Detached,

    #[error("state update requested while a render pass is in progress")]
    ReentrantUpdate,
}

impl Error {
    pub(crate) fn component(component: &'static str, source: BoxError) -> Self {
        // engine errors raised inside a body (e.g. an unknown hook) stay as-is
        match source.downcast::<Error>() {
            Ok(inner) => *inner,
            Err(source) => Error::Component { component, source },
        }
    }
}
