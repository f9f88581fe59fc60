//! Listener registry with explicit subscription handles.
//!
//! `on` returns a [`SubscriptionId`] and `off` takes it back, so nothing has
//! to be stamped onto closures to find them again later.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Opaque handle returned by [`Evented::on`] and required by [`Evented::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<P> = Rc<RefCell<dyn FnMut(&P)>>;

struct Entry<K, P> {
    id: SubscriptionId,
    kind: K,
    once: bool,
    listener: Listener<P>,
}

/// Single-threaded registry of listeners keyed by event kind `K`, called with
/// a payload of type `P`.
pub struct Evented<K, P> {
    entries: RefCell<Vec<Entry<K, P>>>,
    next_id: Cell<u64>,
}

impl<K, P> Default for Evented<K, P> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }
}

impl<K, P> std::fmt::Debug for Evented<K, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evented")
            .field("listeners", &self.entries.borrow().len())
            .finish()
    }
}

impl<K: Copy + PartialEq, P> Evented<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for every `kind` event until [`Evented::off`].
    pub fn on(&self, kind: K, listener: impl FnMut(&P) + 'static) -> SubscriptionId {
        self.register(kind, false, Rc::new(RefCell::new(listener)))
    }

    /// Registers `listener` for the next `kind` event only.
    pub fn once(&self, kind: K, listener: impl FnMut(&P) + 'static) -> SubscriptionId {
        self.register(kind, true, Rc::new(RefCell::new(listener)))
    }

    fn register(&self, kind: K, once: bool, listener: Listener<P>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push(Entry {
            id,
            kind,
            once,
            listener,
        });
        id
    }

    /// Removes a listener. Returns false if `id` was not registered.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    pub fn listener_count(&self, kind: K) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Calls every listener registered for `kind`.
    ///
    /// Listeners are snapshotted first, so they may subscribe or unsubscribe
    /// (themselves included) while the dispatch runs. A listener removed by an
    /// earlier listener in the same dispatch is not called.
    pub fn emit(&self, kind: K, payload: &P) {
        let snapshot: Vec<(SubscriptionId, bool, Listener<P>)> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.id, e.once, Rc::clone(&e.listener)))
            .collect();

        for (id, once, listener) in snapshot {
            let live = if once {
                self.off(id)
            } else {
                self.is_subscribed(id)
            };
            if !live {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut call) => (&mut *call)(payload),
                Err(_) => log::warn!("Skipping re-entrant call to listener {:?}", id),
            }
        }
    }
}
