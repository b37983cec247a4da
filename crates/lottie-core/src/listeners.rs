use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Handle returned by [`Listeners::add`], used to unregister a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Zero-argument change callbacks, invoked synchronously in registration order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn FnMut()>)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Box<dyn FnMut()>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self) {
        for (_, listener) in self.entries.iter_mut() {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// A flag raised by change notifications and consumed by the node that owns it.
///
/// Listener closures only hold a weak reference, so registering one never
/// keeps the observing node alive.
#[derive(Debug, Clone)]
pub struct DirtyFlag(Rc<Cell<bool>>);

impl DirtyFlag {
    /// Starts dirty so the first read always computes.
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn mark(&self) {
        self.0.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.0.get()
    }

    /// Returns whether the flag was raised and lowers it.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }

    pub fn listener(&self) -> Box<dyn FnMut()> {
        let weak: Weak<Cell<bool>> = Rc::downgrade(&self.0);
        Box::new(move || {
            if let Some(flag) = weak.upgrade() {
                flag.set(true);
            }
        })
    }
}

impl Default for DirtyFlag {
    fn default() -> Self {
        Self::new()
    }
}
