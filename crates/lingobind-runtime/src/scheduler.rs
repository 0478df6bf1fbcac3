#![forbid(unsafe_code)]

//! Coalescing render queue.
//!
//! # Invariants
//!
//! 1. A view id is queued at most once until the next drain.
//! 2. Drain yields ids in the order they were first enqueued.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// Stable identifier of a mounted view within its tree.
pub type ViewId = u64;

#[derive(Clone, Default, Debug)]
pub(crate) struct RenderQueue {
    queued: Rc<RefCell<Vec<ViewId>>>,
}

impl RenderQueue {
    /// Queue `id`. Returns `false` if it was already queued.
    pub(crate) fn enqueue(&self, id: ViewId) -> bool {
        let mut queued = self.queued.borrow_mut();
        if queued.contains(&id) {
            trace!(view = id, "render request coalesced");
            return false;
        }
        queued.push(id);
        true
    }

    pub(crate) fn drain(&self) -> Vec<ViewId> {
        std::mem::take(&mut *self.queued.borrow_mut())
    }

    pub(crate) fn remove(&self, id: ViewId) {
        self.queued.borrow_mut().retain(|queued| *queued != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.queued.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queued.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_requests_keep_first_position() {
        let queue = RenderQueue::default();
        assert!(queue.enqueue(3));
        assert!(queue.enqueue(1));
        assert!(!queue.enqueue(3));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![3, 1]);
        assert!(queue.is_empty());
    }

    #[test]
    fn removed_ids_are_not_drained() {
        let queue = RenderQueue::default();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.remove(1);
        assert_eq!(queue.drain(), vec![2]);
    }
}
