#![forbid(unsafe_code)]

//! A minimal view host.
//!
//! [`ViewTree`] owns mounted views, their hook state and a render queue.
//! Views render once when mounted and again on [`ViewTree::flush`] after
//! something called [`ViewHandle::request_render`].
//!
//! # Invariants
//!
//! 1. Render requests for one view coalesce until the next flush.
//! 2. Flush renders views in the order they were first requested.
//! 3. Hook state is addressed by call order within a render and survives
//!    across renders until the view is unmounted.
//! 4. Unmounting drops all hook state synchronously. Render requests made
//!    afterwards are ignored.
//!
//! # Failure Modes
//!
//! - **Render panics during flush**: remaining views still render. The first
//!   panic is re-raised once the queue has been processed.
//! - **Render loops**: a view that requests itself on every render is cut
//!   off after [`MAX_FLUSH_PASSES`] passes with a warning.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use lingobind_core::Subscription;
use tracing::{debug, info_span, trace, warn};
use web_time::Instant;

use crate::context::ContextCell;
use crate::provider::{Provider, current_provider};
use crate::scheduler::{RenderQueue, ViewId};

/// Upper bound on drain passes in one [`ViewTree::flush`].
pub const MAX_FLUSH_PASSES: usize = 32;

/// Per-view hook storage addressed by call order.
#[derive(Default)]
pub(crate) struct HookSlots {
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
}

impl HookSlots {
    fn begin(&mut self) {
        self.cursor = 0;
    }

    fn slot<T: 'static>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        let index = self.cursor;
        self.cursor += 1;
        if index == self.slots.len() {
            self.slots.push(Box::new(init()));
        } else if !self.slots[index].is::<T>() {
            debug!(index, "hook order changed between renders; slot reset");
            self.slots[index] = Box::new(init());
        }
        match self.slots[index].downcast_mut::<T>() {
            Some(state) => state,
            None => unreachable!("hook slot {index} holds the requested type"),
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Handle a view keeps to ask for re-renders.
#[derive(Clone)]
pub struct ViewHandle {
    id: ViewId,
    mounted: Rc<Cell<bool>>,
    queue: RenderQueue,
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("id", &self.id)
            .field("mounted", &self.mounted.get())
            .finish()
    }
}

impl ViewHandle {
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Queue a re-render for the next flush. Returns `true` if the view was
    /// newly queued, `false` if it was already queued or is unmounted.
    pub fn request_render(&self) -> bool {
        if !self.mounted.get() {
            trace!(view = self.id, "render request for unmounted view ignored");
            return false;
        }
        self.queue.enqueue(self.id)
    }
}

/// What a render function sees.
pub struct RenderCx<'a> {
    handle: &'a ViewHandle,
    provider: Option<&'a Provider>,
    context: &'a ContextCell,
    hooks: &'a mut HookSlots,
}

impl RenderCx<'_> {
    #[must_use]
    pub fn handle(&self) -> &ViewHandle {
        self.handle
    }

    /// The provider this view was mounted under.
    #[must_use]
    pub fn provider(&self) -> Option<&Provider> {
        self.provider
    }

    #[must_use]
    pub fn context(&self) -> &ContextCell {
        self.context
    }

    /// State for the next hook call of this render, created with `init` on
    /// the first render. Hooks must be called in the same order each render.
    pub fn use_slot<T: 'static>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        self.hooks.slot(init)
    }
}

type RenderFn<R> = Box<dyn FnMut(&mut RenderCx<'_>) -> R>;

struct ViewNode<R> {
    handle: ViewHandle,
    provider: Option<Provider>,
    provider_sub: RefCell<Option<Subscription>>,
    hooks: RefCell<HookSlots>,
    render_fn: RefCell<RenderFn<R>>,
    latest: RefCell<Option<R>>,
    renders: Cell<u64>,
}

/// Type-erased side of a view, as stored in the tree.
trait MountedNode {
    fn render(&self, context: &ContextCell) -> bool;
    fn unmount(&self);
}

impl<R> MountedNode for ViewNode<R> {
    fn render(&self, context: &ContextCell) -> bool {
        if !self.handle.is_mounted() {
            return false;
        }
        let output = {
            let mut hooks = self.hooks.borrow_mut();
            hooks.begin();
            let mut cx = RenderCx {
                handle: &self.handle,
                provider: self.provider.as_ref(),
                context,
                hooks: &mut *hooks,
            };
            let mut render_fn = self.render_fn.borrow_mut();
            (*render_fn)(&mut cx)
        };
        *self.latest.borrow_mut() = Some(output);
        self.renders.set(self.renders.get() + 1);
        trace!(view = self.handle.id, renders = self.renders.get(), "view rendered");
        true
    }

    fn unmount(&self) {
        if !self.handle.mounted.replace(false) {
            return;
        }
        self.handle.queue.remove(self.handle.id);
        drop(self.provider_sub.borrow_mut().take());
        // Hook state is dropped outside the borrow; its destructors may
        // emit or unsubscribe.
        let hooks = match self.hooks.try_borrow_mut() {
            Ok(mut hooks) => std::mem::take(&mut *hooks),
            Err(_) => HookSlots::default(),
        };
        let slots = hooks.len();
        drop(hooks);
        debug!(view = self.handle.id, slots, "view unmounted");
    }
}

struct TreeInner {
    context: ContextCell,
    queue: RenderQueue,
    views: RefCell<BTreeMap<ViewId, Rc<dyn MountedNode>>>,
    next_id: Cell<ViewId>,
}

/// Owner of mounted views and their render queue.
#[derive(Clone)]
pub struct ViewTree {
    inner: Rc<TreeInner>,
}

impl fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewTree")
            .field("mounted", &self.mounted_count())
            .field("pending", &self.pending_renders())
            .finish()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    /// A tree whose views fall back to this thread's global context cell.
    #[must_use]
    pub fn new() -> Self {
        Self::with_context(ContextCell::global())
    }

    /// A tree whose views fall back to `context`.
    #[must_use]
    pub fn with_context(context: ContextCell) -> Self {
        Self {
            inner: Rc::new(TreeInner {
                context,
                queue: RenderQueue::default(),
                views: RefCell::new(BTreeMap::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    #[must_use]
    pub fn context(&self) -> &ContextCell {
        &self.inner.context
    }

    /// Mount under the innermost [`Provider::scope`], if any, and render once.
    pub fn mount<R, F>(&self, render: F) -> MountedView<R>
    where
        R: 'static,
        F: FnMut(&mut RenderCx<'_>) -> R + 'static,
    {
        self.mount_with(current_provider(), Box::new(render))
    }

    /// Mount under `provider` and render once.
    pub fn mount_in<R, F>(&self, provider: &Provider, render: F) -> MountedView<R>
    where
        R: 'static,
        F: FnMut(&mut RenderCx<'_>) -> R + 'static,
    {
        self.mount_with(Some(provider.clone()), Box::new(render))
    }

    fn mount_with<R: 'static>(
        &self,
        provider: Option<Provider>,
        render_fn: RenderFn<R>,
    ) -> MountedView<R> {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let handle = ViewHandle {
            id,
            mounted: Rc::new(Cell::new(true)),
            queue: self.inner.queue.clone(),
        };
        let provider_sub = provider.as_ref().map(|provider| {
            let handle = handle.clone();
            provider.observe(move || {
                handle.request_render();
            })
        });
        let node = Rc::new(ViewNode {
            handle,
            provider,
            provider_sub: RefCell::new(provider_sub),
            hooks: RefCell::new(HookSlots::default()),
            render_fn: RefCell::new(render_fn),
            latest: RefCell::new(None),
            renders: Cell::new(0),
        });
        let erased: Rc<dyn MountedNode> = node.clone();
        self.inner.views.borrow_mut().insert(id, erased);
        debug!(view = id, under_provider = node.provider.is_some(), "view mounted");
        node.render(&self.inner.context);
        MountedView {
            node,
            tree: self.clone(),
        }
    }

    /// Render every queued view. Views queued while flushing are rendered in
    /// the same call. Returns the number of renders performed.
    pub fn flush(&self) -> usize {
        if self.inner.queue.is_empty() {
            return 0;
        }
        let started = Instant::now();
        let _span = info_span!(
            "lingobind.flush",
            renders = tracing::field::Empty,
            duration_us = tracing::field::Empty
        )
        .entered();

        let mut renders = 0usize;
        let mut first_panic: Option<Box<dyn Any + Send>> = None;
        for _ in 0..MAX_FLUSH_PASSES {
            let batch = self.inner.queue.drain();
            if batch.is_empty() {
                break;
            }
            for id in batch {
                let node = self.inner.views.borrow().get(&id).cloned();
                let Some(node) = node else {
                    continue;
                };
                let context = &self.inner.context;
                let result =
                    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| node.render(context)));
                match result {
                    Ok(true) => renders += 1,
                    Ok(false) => {}
                    Err(payload) => {
                        if first_panic.is_none() {
                            first_panic = Some(payload);
                        }
                    }
                }
            }
        }
        if !self.inner.queue.is_empty() {
            warn!(
                pending = self.inner.queue.len(),
                passes = MAX_FLUSH_PASSES,
                "render queue did not settle; remaining views wait for the next flush"
            );
        }

        let duration_us = started.elapsed().as_micros() as u64;
        let span = tracing::Span::current();
        span.record("renders", renders as u64);
        span.record("duration_us", duration_us);

        if let Some(payload) = first_panic {
            std::panic::resume_unwind(payload);
        }
        renders
    }

    /// Views waiting for the next flush.
    #[must_use]
    pub fn pending_renders(&self) -> usize {
        self.inner.queue.len()
    }

    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.inner.views.borrow().len()
    }

    fn forget(&self, id: ViewId) {
        let removed = self.inner.views.borrow_mut().remove(&id);
        drop(removed);
    }
}

/// A mounted view. Dropping it unmounts the view.
pub struct MountedView<R: 'static> {
    node: Rc<ViewNode<R>>,
    tree: ViewTree,
}

impl<R: 'static> fmt::Debug for MountedView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedView")
            .field("id", &self.node.handle.id)
            .field("mounted", &self.is_mounted())
            .field("renders", &self.render_count())
            .finish()
    }
}

impl<R: 'static> MountedView<R> {
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.node.handle.id
    }

    #[must_use]
    pub fn handle(&self) -> ViewHandle {
        self.node.handle.clone()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.node.handle.is_mounted()
    }

    /// Renders so far, including the one at mount.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.node.renders.get()
    }

    /// Borrow the output of the most recent render.
    pub fn with_latest<T>(&self, f: impl FnOnce(&R) -> T) -> Option<T> {
        self.node.latest.borrow().as_ref().map(f)
    }

    /// Render again right away, outside the queue. Returns `false` once
    /// unmounted.
    pub fn rerender(&self) -> bool {
        self.node.handle.queue.remove(self.node.handle.id);
        self.node.render(&self.tree.inner.context)
    }

    /// Tear the view down. Idempotent.
    pub fn unmount(&self) {
        self.node.unmount();
        self.tree.forget(self.node.handle.id);
    }
}

impl<R: Clone + 'static> MountedView<R> {
    /// Output of the most recent render.
    #[must_use]
    pub fn latest(&self) -> Option<R> {
        self.node.latest.borrow().clone()
    }
}

impl<R: 'static> Drop for MountedView<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}
