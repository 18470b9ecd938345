//! # Components, elements, and mounts
//!
//! dontreact is a deliberately small component engine. There are four pieces:
//!
//! - [`Component`]: a pure function `(props, state, context) -> Element`.
//! - [`Element`]: an immutable descriptor of one output node: tag,
//!   attributes, children, plus the state and context it was produced with.
//! - [`render`] turns an element tree into fresh [`Node`]s.
//! - [`mount`] binds a root component to a container node and owns the
//!   single state cell of that mount.
//!
//! ## Full re-render
//!
//! There is no diffing. Every `set_state` re-runs the root component with the
//! new state, renders a brand-new subtree, and replaces the container's
//! contents with it:
//!
//! ```rust
//! use dontreact_core::prelude::*;
//!
//! #[derive(Clone, Default)]
//! struct Toggle {
//!     on: bool,
//! }
//!
//! let switch = Component::with_default("Switch", Toggle::default(), |_: &(), state, cx| {
//!     let cx2 = cx.clone();
//!     let next = Toggle { on: !state.on };
//!     Ok(Element::new("button")
//!         .on_click(move || cx2.set_state(next.clone()))
//!         .children(if state.on { "On" } else { "Off" })
//!         .with_state(state)
//!         .with_context(cx))
//! });
//!
//! let root = Node::create_element("div").unwrap();
//! let _app = mount(&root, &switch, (), ContextExtras::new()).unwrap();
//! assert_eq!(root.text_content(), "Off");
//!
//! root.find_by_tag("button").unwrap().click().unwrap();
//! assert_eq!(root.text_content(), "On");
//! ```
//!
//! ## Shared state
//!
//! One mount has exactly one state cell. Nested components
//! ([`Children::Nested`], built with [`factory`]) are invoked with the state
//! of the element that contains them, and every component of a pass receives
//! the same [`Context`].
//!
//! ## Lifecycle
//!
//! - `cx.on_mount(cb)` callbacks registered during the initial render run
//!   once, right after the first subtree is attached.
//! - `cx.on_unmount(cb)` callbacks run when [`MountHandle::stop`] is called,
//!   before the container is cleared.

pub mod component;
pub mod context;
pub mod element;
pub mod error;
pub mod host;
pub mod mount;
pub mod prelude;
pub mod render;

pub use component::*;
pub use context::{Callback, Context, ContextExtras};
pub use element::*;
pub use error::*;
pub use host::{EventKind, Listener, Node, Snapshot};
pub use mount::*;
pub use render::render;
