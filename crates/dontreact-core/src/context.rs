//! # Context
//!
//! Every render pass hands one [`Context`] to every component it invokes. The
//! context is the only way a component reaches the mount it lives in:
//!
//! - `set_state` replaces the mount's state and re-renders synchronously.
//! - `on_mount` / `on_unmount` register lifecycle callbacks.
//! - caller-supplied extras: named hooks (`run_hook`) and typed values (`get`).
//!
//! A fresh context is built for each pass; components never keep one across
//! passes except inside event handlers, which only ever talk to the mount
//! through it.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Lifecycle callback or caller-supplied hook.
pub type Callback = Rc<dyn Fn()>;

/// Operations a context forwards to the mount that built it.
pub(crate) trait MountLink<S> {
    fn set_state(&self, state: S) -> Result<()>;
    fn on_mount(&self, cb: Callback);
    fn on_unmount(&self, cb: Callback);
}

/// Values merged into every context of a mount.
///
/// ```rust
/// use dontreact_core::context::{Context, ContextExtras};
///
/// #[derive(Debug, PartialEq)]
/// struct ApiBase(&'static str);
///
/// let extras = ContextExtras::new()
///     .hook("run_side_effect", || println!("effect!"))
///     .provide(ApiBase("/api"));
/// let cx: Context<()> = Context::detached(extras);
///
/// assert_eq!(cx.get::<ApiBase>(), Some(&ApiBase("/api")));
/// assert!(cx.run_hook("run_side_effect").is_ok());
/// assert!(cx.run_hook("missing").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ContextExtras {
    hooks: BTreeMap<String, Callback>,
    values: HashMap<TypeId, Rc<dyn Any>>,
}

impl ContextExtras {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named hook. A later hook with the same name replaces it.
    pub fn hook(mut self, name: impl Into<String>, f: impl Fn() + 'static) -> Self {
        self.hooks.insert(name.into(), Rc::new(f));
        self
    }

    /// Provides a value looked up by its type. One value per type.
    pub fn provide<T: 'static>(mut self, value: T) -> Self {
        self.values.insert(TypeId::of::<T>(), Rc::new(value));
        self
    }

    pub fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }
}

impl fmt::Debug for ContextExtras {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextExtras")
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .field("values", &self.values.len())
            .finish()
    }
}

/// Per-pass bundle of capabilities threaded through every component.
pub struct Context<S> {
    inner: Rc<ContextInner<S>>,
}

struct ContextInner<S> {
    mount: Option<Weak<dyn MountLink<S>>>,
    extras: Rc<ContextExtras>,
    pass: u64,
}

impl<S: 'static> Context<S> {
    pub(crate) fn for_mount(
        mount: Weak<dyn MountLink<S>>,
        extras: Rc<ContextExtras>,
        pass: u64,
    ) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                mount: Some(mount),
                extras,
                pass,
            }),
        }
    }

    /// A context that belongs to no mount, for rendering or testing
    /// components in isolation. `set_state` on it fails with
    /// [`Error::Detached`]; lifecycle registrations are dropped.
    pub fn detached(extras: ContextExtras) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                mount: None,
                extras: Rc::new(extras),
                pass: 0,
            }),
        }
    }

    fn mount(&self) -> Option<Rc<dyn MountLink<S>>> {
        self.inner.mount.as_ref().and_then(Weak::upgrade)
    }

    /// Replaces the mount's state and re-renders it before returning.
    pub fn set_state(&self, state: S) -> Result<()> {
        match self.mount() {
            Some(mount) => mount.set_state(state),
            None => Err(Error::Detached),
        }
    }

    /// Registers a callback to run once after the first render is attached.
    /// Registering the same `Rc` twice has no extra effect.
    pub fn on_mount(&self, cb: Callback) {
        match self.mount() {
            Some(mount) => mount.on_mount(cb),
            None => log::debug!("on_mount on a detached context dropped"),
        }
    }

    /// Registers a callback run by [`crate::MountHandle::stop`].
    pub fn on_unmount(&self, cb: Callback) {
        match self.mount() {
            Some(mount) => mount.on_unmount(cb),
            None => log::debug!("on_unmount on a detached context dropped"),
        }
    }

    pub fn run_hook(&self, name: &str) -> Result<()> {
        let hook = self
            .inner
            .extras
            .hooks
            .get(name)
            .ok_or_else(|| Error::UnknownHook(name.to_owned()))?;
        hook();
        Ok(())
    }

    pub fn has_hook(&self, name: &str) -> bool {
        self.inner.extras.hooks.contains_key(name)
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.inner
            .extras
            .values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Number of the render pass this context was built for, `1` for the
    /// initial render. Detached contexts report `0`.
    pub fn pass(&self) -> u64 {
        self.inner.pass
    }

    /// `true` when both handles belong to the same render pass.
    pub fn ptr_eq(&self, other: &Context<S>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S> Clone for Context<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> fmt::Debug for Context<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("pass", &self.inner.pass)
            .field("mounted", &self.inner.mount.is_some())
            .field("extras", &self.inner.extras)
            .finish()
    }
}

/// Insertion-ordered set of callbacks, keyed by `Rc` identity.
#[derive(Default)]
pub(crate) struct CallbackSet {
    items: SmallVec<[Callback; 4]>,
}

impl CallbackSet {
    /// Returns `false` when `cb` was already registered.
    pub fn insert(&mut self, cb: Callback) -> bool {
        if self.items.iter().any(|c| Rc::ptr_eq(c, &cb)) {
            return false;
        }
        self.items.push(cb);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn snapshot(&self) -> SmallVec<[Callback; 4]> {
        self.items.clone()
    }

    pub fn take(&mut self) -> SmallVec<[Callback; 4]> {
        std::mem::take(&mut self.items)
    }
}
