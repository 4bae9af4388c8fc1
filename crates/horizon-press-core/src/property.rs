//! Property system for Horizon Press.
//!
//! This module provides reactive properties with change notification. A
//! [`Property<T>`] pairs a value with a change [`Signal`], so the button models
//! can subscribe to an externally owned enabled flag or toggle value and
//! mirror changes the moment they happen.
//!
//! Models publish their own outputs, such as the current interaction state,
//! as a [`ReadOnlyProperty`] so renderers can link without writing.
//!
//! # Example
//!
//! ```
//! use horizon_press_core::Property;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//!
//! let value = Property::new(1);
//! let last_seen = Arc::new(AtomicI32::new(0));
//!
//! let last_seen_clone = last_seen.clone();
//! let id = value.link(move |&v| last_seen_clone.store(v, Ordering::SeqCst));
//! assert_eq!(last_seen.load(Ordering::SeqCst), 1);
//!
//! value.set(5);
//! assert_eq!(last_seen.load(Ordering::SeqCst), 5);
//!
//! value.unlink(id);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::logging::targets;
use crate::signal::{ConnectionId, Signal};

/// A value plus the listeners that want to hear when it changes.
///
/// Only a `set()` that stores a value unequal (by `PartialEq`) to the current
/// one notifies. The value lock is released before listeners run, so a
/// listener may read the property or set it again.
///
/// ```
/// use horizon_press_core::Property;
///
/// let enabled = Property::new(true);
/// assert!(!enabled.set(true));
/// assert!(enabled.set(false));
/// assert!(!enabled.get());
/// ```
pub struct Property<T> {
    value: RwLock<T>,
    changed: Signal<T>,
}

impl<T> Property<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            changed: Signal::new(),
        }
    }

    /// Create a new shared property.
    pub fn shared(value: T) -> Arc<Self> {
        Arc::new(Self::new(value))
    }

    /// A clone of the current value. See [`with`](Self::with) to borrow it.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` runs under the read lock and must not call [`set`](Self::set).
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Store `value` and notify listeners if it differs from the current one.
    ///
    /// Returns whether it differed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.write();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        tracing::trace!(target: targets::PROPERTY, "property changed");
        self.changed.emit(value);
        true
    }

    /// Store `value` without notifying anyone.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }

    /// Invoke `listener` with the current value now, and again on every change.
    pub fn link<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let current = self.get();
        listener(&current);
        self.changed.connect(listener)
    }

    /// Invoke `listener` on every future change only.
    pub fn lazy_link<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.changed.connect(listener)
    }

    /// Remove a listener added with [`link`](Self::link) or
    /// [`lazy_link`](Self::lazy_link).
    ///
    /// Returns `true` if the listener was still linked.
    pub fn unlink(&self, id: ConnectionId) -> bool {
        self.changed.disconnect(id)
    }

    /// Number of linked listeners.
    pub fn listener_count(&self) -> usize {
        self.changed.connection_count()
    }
}

impl<T> Default for Property<T>
where
    T: Clone + Default + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.value.read())
            .field("listeners", &self.changed)
            .finish()
    }
}

/// A read-only view of a shared property.
///
/// Models hand these out for state they own, so consumers can observe but not
/// write it.
pub struct ReadOnlyProperty<T> {
    inner: Arc<Property<T>>,
}

impl<T> ReadOnlyProperty<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a read-only view of a property.
    pub fn new(property: Arc<Property<T>>) -> Self {
        Self { inner: property }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }

    /// See [`Property::link`].
    pub fn link<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.link(listener)
    }

    /// See [`Property::lazy_link`].
    pub fn lazy_link<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.lazy_link(listener)
    }

    /// See [`Property::unlink`].
    pub fn unlink(&self, id: ConnectionId) -> bool {
        self.inner.unlink(id)
    }
}

impl<T> Clone for ReadOnlyProperty<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadOnlyProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnlyProperty").field(&self.inner).finish()
    }
}
