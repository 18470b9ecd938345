//! Mount controller: one root component, one container, one state cell.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use web_time::{Duration, Instant};

use crate::component::{Component, Factory, factory};
use crate::context::{Callback, CallbackSet, Context, ContextExtras, MountLink};
use crate::error::{Error, Result};
use crate::host::Node;
use crate::render::render;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Initial render in progress; `on_mount` registrations are collected.
    Mounting,
    Mounted,
    Stopped,
}

/// Counters for the render passes of one mount.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStats {
    /// Committed passes, the initial render included.
    pub passes: u64,
    pub last_duration: Duration,
}

struct MountState<S> {
    phase: Phase,
    state: Option<S>,
    context: Option<Context<S>>,
    mounts: CallbackSet,
    unmounts: CallbackSet,
    stats: RenderStats,
}

struct MountShared<S> {
    this: Weak<MountShared<S>>,
    container: Node,
    factory: Factory<S>,
    extras: Rc<ContextExtras>,
    rendering: Cell<bool>,
    cell: RefCell<MountState<S>>,
    /// Self-reference that keeps a running mount alive without its handle.
    /// Released by `stop`.
    pinned: RefCell<Option<Rc<MountShared<S>>>>,
}

/// Clears the `rendering` flag however the pass ends.
struct RenderingGuard<'a>(&'a Cell<bool>);

impl Drop for RenderingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<S: Clone + 'static> MountShared<S> {
    /// Renders `state` into a fresh subtree and swaps it into the container.
    /// The container and the state cell are only touched once the whole pass
    /// succeeded.
    fn render_pass(&self, state: Option<S>) -> Result<()> {
        if self.rendering.get() {
            return Err(Error::ReentrantUpdate);
        }
        self.rendering.set(true);
        let _guard = RenderingGuard(&self.rendering);

        let started = Instant::now();
        let pass = self.cell.borrow().stats.passes + 1;
        let link: Weak<dyn MountLink<S>> = self.this.clone();
        let cx = Context::for_mount(link, self.extras.clone(), pass);

        let element = self.factory.with_state(state).with_context(&cx)?;
        let node = render(&element, &cx)?;

        self.container.clear_children();
        self.container.append_child(&node)?;

        let elapsed = started.elapsed();
        let mut cell = self.cell.borrow_mut();
        cell.state = element.state;
        cell.context = Some(cx);
        cell.stats = RenderStats {
            passes: pass,
            last_duration: elapsed,
        };
        log::trace!(
            "render pass {pass} of `{}` committed in {:.3} ms",
            self.factory.name(),
            elapsed.as_secs_f64() * 1000.0
        );
        Ok(())
    }

    fn run_mount_callbacks(&self) {
        let callbacks = {
            let mut cell = self.cell.borrow_mut();
            cell.phase = Phase::Mounted;
            cell.mounts.snapshot()
        };
        log::debug!(
            "`{}` mounted, running {} mount callback(s)",
            self.factory.name(),
            callbacks.len()
        );
        for cb in callbacks {
            cb();
        }
    }

    fn stop(&self) -> Result<()> {
        if self.rendering.get() {
            return Err(Error::ReentrantUpdate);
        }
        let callbacks = {
            let mut cell = self.cell.borrow_mut();
            if cell.phase == Phase::Stopped {
                return Ok(());
            }
            cell.phase = Phase::Stopped;
            cell.context = None;
            cell.unmounts.take()
        };
        log::debug!(
            "stopping `{}`, running {} unmount callback(s)",
            self.factory.name(),
            callbacks.len()
        );
        for cb in callbacks {
            cb();
        }
        self.container.clear_children();
        self.pinned.replace(None);
        Ok(())
    }
}

impl<S: Clone + 'static> MountLink<S> for MountShared<S> {
    fn set_state(&self, state: S) -> Result<()> {
        if self.cell.borrow().phase == Phase::Stopped {
            return Err(Error::Stopped);
        }
        self.render_pass(Some(state))
    }

    fn on_mount(&self, cb: Callback) {
        let mut cell = self.cell.borrow_mut();
        if cell.phase != Phase::Mounting {
            log::debug!("on_mount after the initial render ignored");
            return;
        }
        if !cell.mounts.insert(cb) {
            log::trace!("on_mount callback already registered");
        }
    }

    fn on_unmount(&self, cb: Callback) {
        let mut cell = self.cell.borrow_mut();
        if cell.phase == Phase::Stopped {
            log::debug!("on_unmount after stop ignored");
            return;
        }
        if cell.unmounts.insert(cb) {
            log::trace!("{} unmount callback(s) registered", cell.unmounts.len());
        } else {
            log::trace!("on_unmount callback already registered");
        }
    }
}

/// Mounts `component` with `props` into `container`.
///
/// The container is cleared, the component is rendered once without a state
/// (components fall back to their declared default), the result is appended,
/// and every `on_mount` callback registered during that render runs once, in
/// registration order.
///
/// The mount stays live until [`MountHandle::stop`], even if the handle is
/// dropped.
///
/// ```rust
/// use dontreact_core::prelude::*;
///
/// let hello = Component::new("Hello", |name: &String, _: Option<()>, cx| {
///     Ok(Element::new("p").children(format!("Hello {name}")).with_context(cx))
/// });
/// let root = Node::create_element("div").unwrap();
/// let app = mount(&root, &hello, "World".to_string(), ContextExtras::new()).unwrap();
/// assert_eq!(root.inner_html(), "<p>Hello World</p>");
/// app.stop().unwrap();
/// assert_eq!(root.child_count(), 0);
/// ```
pub fn mount<P: 'static, S: Clone + 'static>(
    container: &Node,
    component: &Component<P, S>,
    props: P,
    extras: ContextExtras,
) -> Result<MountHandle<S>> {
    if container.is_text() {
        return Err(Error::TextNode("mount"));
    }
    container.clear_children();

    let shared = Rc::new_cyclic(|this| MountShared {
        this: this.clone(),
        container: container.clone(),
        factory: factory(component, props),
        extras: Rc::new(extras),
        rendering: Cell::new(false),
        cell: RefCell::new(MountState {
            phase: Phase::Mounting,
            state: None,
            context: None,
            mounts: CallbackSet::default(),
            unmounts: CallbackSet::default(),
            stats: RenderStats::default(),
        }),
        pinned: RefCell::new(None),
    });

    log::debug!("mounting `{}`", component.name());
    shared.render_pass(None)?;
    *shared.pinned.borrow_mut() = Some(shared.clone());
    shared.run_mount_callbacks();

    Ok(MountHandle { shared })
}

/// Handle to a live mount.
///
/// A running mount keeps itself alive, so listeners keep re-rendering after
/// the handle is dropped. Only [`MountHandle::stop`] tears it down; once a
/// stopped mount's handle is gone too, stale listeners fail with
/// [`Error::Detached`].
#[must_use = "without the handle the mount can never be stopped"]
pub struct MountHandle<S> {
    shared: Rc<MountShared<S>>,
}

impl<S: Clone + 'static> MountHandle<S> {
    /// Same as [`Context::set_state`].
    pub fn set_state(&self, state: S) -> Result<()> {
        self.shared.set_state(state)
    }

    /// State of the last committed pass, as resolved by the root component.
    pub fn state(&self) -> Option<S> {
        self.shared.cell.borrow().state.clone()
    }

    /// Context of the last committed pass; `None` once stopped.
    pub fn context(&self) -> Option<Context<S>> {
        self.shared.cell.borrow().context.clone()
    }

    pub fn container(&self) -> &Node {
        &self.shared.container
    }

    pub fn phase(&self) -> Phase {
        self.shared.cell.borrow().phase
    }

    pub fn is_stopped(&self) -> bool {
        self.phase() == Phase::Stopped
    }

    pub fn stats(&self) -> RenderStats {
        self.shared.cell.borrow().stats
    }

    /// Runs every unmount callback once, in registration order, then clears
    /// the container. Later `set_state` calls fail with [`Error::Stopped`].
    /// Stopping twice is a no-op.
    pub fn stop(&self) -> Result<()> {
        self.shared.stop()
    }
}

impl<S> std::fmt::Debug for MountHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = self.shared.cell.borrow();
        f.debug_struct("MountHandle")
            .field("component", &self.shared.factory.name())
            .field("phase", &cell.phase)
            .field("stats", &cell.stats)
            .finish()
    }
}
