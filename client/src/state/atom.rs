//! Observable state cells.
//!
//! DESIGN
//! ======
//! An `Atom` holds one value and a list of listeners. Every `set` notifies
//! every listener synchronously, in registration order, even when the value
//! did not change. Listeners may set other atoms, or unsubscribe themselves
//! or each other, while a notification is in flight; a listener removed
//! mid-notification is not called.

#[cfg(test)]
#[path = "atom_test.rs"]
mod atom_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::host::Subscription;

type Listener<T> = Rc<dyn Fn(&T)>;

struct AtomInner<T> {
    value: RefCell<T>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
}

/// Shared observable cell. Clones share the same value and listeners.
pub struct Atom<T> {
    inner: Rc<AtomInner<T>>,
}

impl<T> Clone for Atom<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T: Clone + 'static> Atom<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(AtomInner { value: RefCell::new(value), next_id: Cell::new(0), listeners: RefCell::new(Vec::new()) }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Store `value` and notify every listener.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Re-deliver the current value to every listener.
    pub fn notify(&self) {
        let value = self.get();
        let snapshot: Vec<(u64, Listener<T>)> = self.inner.listeners.borrow().clone();
        for (id, listener) in snapshot {
            if self.is_live(id) {
                listener(&value);
            }
        }
    }

    /// Register `listener` for future changes only.
    pub fn listen(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));

        let weak: Weak<AtomInner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Call `listener` with the current value now, then on every change.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        listener(&self.get());
        self.listen(listener)
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn is_live(&self, id: u64) -> bool {
        self.inner.listeners.borrow().iter().any(|(entry, _)| *entry == id)
    }
}

impl<T: Clone + Default + 'static> Default for Atom<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
