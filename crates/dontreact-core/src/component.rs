//! Components and the curried factory that binds them to props.

use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::element::Element;
use crate::error::{BoxError, Error, Result};

/// What a component body returns.
pub type ComponentResult<S> = std::result::Result<Element<S>, BoxError>;

type Body<P, S> = dyn Fn(&P, Option<S>, &Context<S>) -> ComponentResult<S>;

/// A named, pure function from `(props, state, context)` to an [`Element`].
pub struct Component<P, S> {
    name: &'static str,
    body: Rc<Body<P, S>>,
}

impl<P: 'static, S: Clone + 'static> Component<P, S> {
    /// A component that sees the raw state, `None` when nothing was supplied.
    pub fn new(
        name: &'static str,
        body: impl Fn(&P, Option<S>, &Context<S>) -> ComponentResult<S> + 'static,
    ) -> Self {
        Self {
            name,
            body: Rc::new(body),
        }
    }

    /// A component with a declared default state, used whenever it is invoked
    /// without one.
    pub fn with_default(
        name: &'static str,
        default: S,
        body: impl Fn(&P, S, &Context<S>) -> ComponentResult<S> + 'static,
    ) -> Self {
        Self::new(name, move |props, state, cx| {
            body(props, state.unwrap_or_else(|| default.clone()), cx)
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, props: &P, state: Option<S>, cx: &Context<S>) -> Result<Element<S>> {
        (self.body)(props, state, cx).map_err(|e| Error::component(self.name, e))
    }
}

impl<P, S> Clone for Component<P, S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            body: self.body.clone(),
        }
    }
}

impl<P, S> fmt::Debug for Component<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("name", &self.name).finish()
    }
}

/// Binds `component` to `props`. The result is first given a state, then a
/// context:
///
/// ```rust
/// use dontreact_core::prelude::*;
///
/// let greet = Component::new("Greet", |name: &String, _state: Option<()>, cx| {
///     Ok(Element::new("p").children(format!("Hi {name}")).with_context(cx))
/// });
/// let cx = Context::detached(ContextExtras::new());
/// let el = factory(&greet, "Ana".to_string())
///     .with_state(None)
///     .with_context(&cx)
///     .unwrap();
/// assert!(matches!(&el.children, Children::Text(t) if t == "Hi Ana"));
/// ```
pub fn factory<P: 'static, S: Clone + 'static>(component: &Component<P, S>, props: P) -> Factory<S> {
    let component = component.clone();
    Factory {
        name: component.name,
        invoke: Rc::new(move |state: Option<S>, cx: &Context<S>| {
            component.call(&props, state, cx)
        }),
    }
}

/// A component already bound to its props, waiting for state and context.
pub struct Factory<S> {
    name: &'static str,
    invoke: Rc<dyn Fn(Option<S>, &Context<S>) -> Result<Element<S>>>,
}

impl<S> Factory<S> {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<S: Clone> Factory<S> {
    pub fn with_state(&self, state: Option<S>) -> StateStage<S> {
        StateStage {
            factory: self.clone(),
            state,
        }
    }
}

impl<S> Clone for Factory<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            invoke: self.invoke.clone(),
        }
    }
}

impl<S> fmt::Debug for Factory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").field("component", &self.name).finish()
    }
}

/// Second stage of a [`Factory`]: state is fixed, context is not.
pub struct StateStage<S> {
    factory: Factory<S>,
    state: Option<S>,
}

impl<S: Clone> StateStage<S> {
    pub fn with_context(&self, cx: &Context<S>) -> Result<Element<S>> {
        (self.factory.invoke)(self.state.clone(), cx)
    }
}
