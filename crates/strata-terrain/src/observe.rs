//! Change notification for settings values.
//!
//! An [`Observable`] owns a plain settings value plus an explicit list of
//! listeners. Settings types stay plain data; notification is a separate
//! capability wrapped around them.

use std::sync::Arc;

/// A change listener. Identity is the `Arc` allocation.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Observable::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A settings value that notifies its listeners after every change.
pub struct Observable<T> {
    value: T,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u64,
}

impl<T> Observable<T> {
    /// Wrap a value with no listeners.
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Register a listener.
    ///
    /// Subscribing the same `Arc` again returns the existing id and does not
    /// add a second notification.
    pub fn subscribe(&mut self, listener: Listener<T>) -> ListenerId {
        if let Some((id, _)) = self
            .listeners
            .iter()
            .find(|(_, existing)| Arc::ptr_eq(existing, &listener))
        {
            return *id;
        }
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Mutate the value in place, then notify every listener once.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.notify();
    }

    /// Replace the value, then notify every listener once.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    /// Notify every listener with the current value.
    pub fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.value);
        }
    }

    /// Unwrap the value, dropping all listeners.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
