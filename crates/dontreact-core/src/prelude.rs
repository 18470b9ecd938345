pub use crate::component::{Component, ComponentResult, Factory, factory};
pub use crate::context::{Callback, Context, ContextExtras};
pub use crate::element::{Attribute, Child, Children, Element, Props};
pub use crate::error::{BoxError, Error, Result};
pub use crate::host::{EventKind, Node, Snapshot};
pub use crate::mount::{MountHandle, Phase, RenderStats, mount};
pub use crate::render::render;
