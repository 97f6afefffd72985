use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::input::InputEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

pub type Listener<C> = Box<dyn FnMut(&mut C, &InputEvent) -> Propagation>;

type SharedListener<C> = Rc<RefCell<Listener<C>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ListenerId(u64);

struct Registry<C> {
    next_id: u64,
    entries: Vec<(ListenerId, SharedListener<C>)>,
}

trait Deregister {
    fn remove(&mut self, ids: &[ListenerId]);
}

impl<C> Deregister for Registry<C> {
    fn remove(&mut self, ids: &[ListenerId]) {
        self.entries.retain(|(id, _)| !ids.contains(id));
    }
}

/// Ordered set of input listeners that run before the built-in gestures.
///
/// Listeners are installed in groups; each group is owned by one
/// [`ListenerGuard`] and lives exactly as long as it.
pub struct InputDispatcher<C> {
    registry: Rc<RefCell<Registry<C>>>,
}

impl<C: 'static> InputDispatcher<C> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn register(&self, listeners: Vec<Listener<C>>) -> ListenerGuard {
        let mut registry = self.registry.borrow_mut();
        let mut ids = Vec::with_capacity(listeners.len());
        for listener in listeners {
            let id = ListenerId(registry.next_id);
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(RefCell::new(listener))));
            ids.push(id);
        }
        drop(registry);

        let registry: Rc<RefCell<dyn Deregister>> = self.registry.clone();
        ListenerGuard {
            registry: Rc::downgrade(&registry),
            ids,
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs listeners in registration order until one returns [`Propagation::Stop`].
    ///
    /// Works on a snapshot, so a listener may release its own guard (or
    /// register new listeners) while running. Listeners removed mid-dispatch
    /// are skipped.
    pub fn dispatch(&self, ctx: &mut C, event: &InputEvent) -> Propagation {
        let snapshot: Vec<(ListenerId, SharedListener<C>)> = self.registry.borrow().entries.clone();

        for (id, listener) in snapshot {
            let still_registered = self
                .registry
                .borrow()
                .entries
                .iter()
                .any(|(live, _)| *live == id);
            if !still_registered {
                continue;
            }

            let Ok(mut listener) = listener.try_borrow_mut() else {
                log::warn!("listener re-entered during dispatch, skipping");
                continue;
            };
            if (&mut *listener)(ctx, event) == Propagation::Stop {
                return Propagation::Stop;
            }
        }

        Propagation::Continue
    }
}

impl<C: 'static> Default for InputDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for InputDispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDispatcher")
            .field("listeners", &self.registry.borrow().entries.len())
            .finish()
    }
}

/// Disposable handle for one listener group. Dropping it deregisters the whole group.
#[must_use = "dropping the guard immediately removes its listeners"]
pub struct ListenerGuard {
    registry: Weak<RefCell<dyn Deregister>>,
    ids: Vec<ListenerId>,
}

impl ListenerGuard {
    pub fn release(self) {}
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(&self.ids);
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("listeners", &self.ids.len())
            .finish()
    }
}
