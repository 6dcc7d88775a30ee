#![forbid(unsafe_code)]

//! Shared values with change notification.
//!
//! A [`SharedValue<T>`] is the coordination channel between sibling drag
//! controllers: position mappings, the moving-item descriptor, and scroll
//! targets all live in one. Reads are wait-free (the value sits behind an
//! [`arc_swap::ArcSwap`]), writes replace the whole value atomically, and every
//! value-changing write notifies live subscribers in registration order.
//!
//! # Invariants
//!
//! 1. `version()` increments by exactly 1 on each value-changing write.
//! 2. `set(v)` where `v == current` is a no-op and notifies nobody.
//! 3. Subscribers are notified in registration order, each with the value
//!    current at the moment it is called (not a copy taken before the loop).
//! 4. Dropping a [`Subscription`] stops further callbacks. Dead entries are
//!    pruned on the next notification.
//!
//! # Re-entrancy
//!
//! A subscriber may write back into the value it observes. The subscriber
//! lock is released before callbacks run, so the nested write notifies
//! recursively. Recursion stops as soon as a write does not change the value,
//! which is what keeps "hover target" feedback loops finite.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use arc_swap::ArcSwap;

type CallbackArc<T> = Arc<dyn Fn(&T) + Send + Sync>;
type CallbackWeak<T> = Weak<dyn Fn(&T) + Send + Sync>;

struct SharedInner<T> {
    value: ArcSwap<T>,
    version: AtomicU64,
    subscribers: Mutex<Vec<CallbackWeak<T>>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning a `SharedValue` creates a new handle to the **same** state: both
/// handles see the same value and share subscribers.
pub struct SharedValue<T> {
    inner: Arc<SharedInner<T>>,
}

impl<T> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValue")
            .field("value", &**self.inner.value.load())
            .field("version", &self.inner.version.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl<T: Default + Clone + PartialEq + Send + Sync + 'static> Default for SharedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> SharedValue<T> {
    /// Create a new shared value. The initial version is 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                value: ArcSwap::from_pointee(value),
                version: AtomicU64::new(0),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Clone the current value out.
    #[must_use]
    pub fn get(&self) -> T {
        T::clone(&self.inner.value.load())
    }

    /// Current value as a shared pointer, without cloning `T`.
    #[must_use]
    pub fn load(&self) -> Arc<T> {
        self.inner.value.load_full()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.load())
    }

    /// Replace the value. Returns `true` if it changed (and subscribers ran).
    pub fn set(&self, value: T) -> bool {
        if **self.inner.value.load() == value {
            return false;
        }
        self.inner.value.store(Arc::new(value));
        self.inner.version.fetch_add(1, Ordering::AcqRel);
        self.notify();
        true
    }

    /// Modify a copy of the value and write it back.
    ///
    /// Returns `true` if the closure changed the value.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Register a callback invoked with the new value after every change.
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let strong: CallbackArc<T> = Arc::new(callback);
        self.lock_subscribers().push(Arc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<CallbackWeak<T>>> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        let callbacks: Vec<CallbackArc<T>> = {
            let mut subscribers = self.lock_subscribers();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for callback in callbacks {
            let latest = self.inner.value.load_full();
            callback(&latest);
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard drops the only strong reference to the callback, so the
/// weak entry held by the [`SharedValue`] can no longer be upgraded.
pub struct Subscription {
    _guard: Box<dyn Any + Send + Sync>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// An immutable, reference-counted value compared by identity.
///
/// Two snapshots are equal only if they point at the same allocation. Storing
/// a `Snapshot` in a [`SharedValue`] therefore notifies whenever a *new*
/// collection is published, even if its contents happen to match.
pub struct Snapshot<T: ?Sized>(Arc<T>);

impl<T> Snapshot<T> {
    /// Wrap a value in a fresh allocation.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T: ?Sized> Snapshot<T> {
    /// Whether both snapshots share one allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> From<T> for Snapshot<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: ?Sized> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> PartialEq for Snapshot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Snapshot").field(&&*self.0).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn get_returns_initial_value() {
        let value = SharedValue::new(42u64);
        assert_eq!(value.get(), 42);
        assert_eq!(value.version(), 0);
    }

    #[test]
    fn set_bumps_version_and_notifies() {
        let value = SharedValue::new(0u64);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = value.subscribe(move |v| sink.lock().unwrap().push(*v));

        assert!(value.set(5));
        assert!(value.set(7));
        assert_eq!(value.version(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![5, 7]);
    }

    #[test]
    fn equal_set_is_noop() {
        let value = SharedValue::new(3u64);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = value.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!value.set(3));
        assert_eq!(value.version(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn update_only_notifies_on_change() {
        let value = SharedValue::new(vec![1, 2, 3]);
        assert!(!value.update(|v| v.sort()));
        assert!(value.update(|v| v.reverse()));
        assert_eq!(value.get(), vec![3, 2, 1]);
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let value = SharedValue::new(0u8);
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&order);
        let second = Arc::clone(&order);
        let _a = value.subscribe(move |_| first.lock().unwrap().push("a"));
        let _b = value.subscribe(move |_| second.lock().unwrap().push("b"));

        value.set(1);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn dropped_subscription_stops_callbacks() {
        let value = SharedValue::new(0u8);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = value.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        value.set(1);
        drop(sub);
        value.set(2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(value.subscriber_count(), 0);
    }

    #[test]
    fn reentrant_write_converges() {
        // Subscriber clamps the value into range by writing it back.
        let value = SharedValue::new(0i32);
        let handle = value.clone();
        let _sub = value.subscribe(move |v| {
            if *v > 10 {
                handle.set(10);
            }
        });

        value.set(25);
        assert_eq!(value.get(), 10);
        assert_eq!(value.version(), 2);
    }

    #[test]
    fn later_subscribers_see_latest_value() {
        let value = SharedValue::new(0i32);
        let handle = value.clone();
        let _clamp = value.subscribe(move |v| {
            if *v > 10 {
                handle.set(10);
            }
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _observer = value.subscribe(move |v| sink.lock().unwrap().push(*v));

        value.set(25);
        // The nested write notifies first; the outer loop then hands the
        // observer the current value rather than the stale 25.
        assert_eq!(*seen.lock().unwrap(), vec![10, 10]);
    }

    #[test]
    fn concurrent_reads_during_writes() {
        let value = SharedValue::new(0u64);
        let barrier = Arc::new(Barrier::new(5));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let v = value.clone();
                let b = Arc::clone(&barrier);
                thread::spawn(move || {
                    b.wait();
                    let mut last = 0;
                    for _ in 0..5_000 {
                        let now = v.get();
                        assert!(now >= last, "stale read: {now} < {last}");
                        last = now;
                    }
                })
            })
            .collect();

        let writer = {
            let v = value.clone();
            let b = Arc::clone(&barrier);
            thread::spawn(move || {
                b.wait();
                for i in 1..=5_000u64 {
                    v.set(i);
                }
            })
        };

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(value.get(), 5_000);
    }

    #[test]
    fn snapshot_equality_is_identity() {
        let a = Snapshot::new(vec![1, 2, 3]);
        let b = Snapshot::new(vec![1, 2, 3]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(*a, *b);
    }

    #[test]
    fn republishing_equal_snapshot_notifies() {
        let value = SharedValue::new(Snapshot::new(vec![1]));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = value.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        value.set(Snapshot::new(vec![1]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
