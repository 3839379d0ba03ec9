use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::rc::Rc;
use std::sync::Arc;

use dashmap::DashMap;

use crate::Fingerprint;

/// Mapping from [`Fingerprint`] to a previously computed value.
///
/// Every method takes `&self`: stores use interior mutability so that one
/// store can be shared by reference (or through `Rc`/`Arc`) between several
/// memoizers. A store never evicts, expires or clears entries on its own.
///
/// # Implementations
///
/// * [`LocalStore`] - `RefCell<HashMap>`, single-threaded (the default store)
/// * [`SharedStore`] - `DashMap`, safe to use from many threads at once
/// * `&S`, `Rc<S>`, `Arc<S>` - forward to the shared store `S`
///
/// # Examples
///
/// ```
/// use memoprint_core::{CacheStore, Fingerprint, LocalStore};
///
/// let store = LocalStore::new();
/// let fp = Fingerprint::from("[1]");
/// assert!(!store.contains(&fp));
///
/// store.insert(fp.clone(), "one".to_string());
/// assert_eq!(store.get(&fp), Some("one".to_string()));
/// assert_eq!(store.len(), 1);
/// ```
pub trait CacheStore<R> {
    /// Returns `true` if a value is stored under `fingerprint`.
    fn contains(&self, fingerprint: &Fingerprint) -> bool;

    /// Returns a copy of the value stored under `fingerprint`.
    fn get(&self, fingerprint: &Fingerprint) -> Option<R>;

    /// Stores `value` under `fingerprint`, replacing any previous value.
    fn insert(&self, fingerprint: Fingerprint, value: R);

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-threaded store backed by a `RefCell<HashMap>`.
///
/// Borrows of the inner map are held only for the duration of a single
/// `get`/`insert`, never across a computation, so a memoized function may
/// recurse through the memoizer that owns this store.
///
/// `LocalStore` is not `Sync`; use [`SharedStore`] to share cached results
/// between threads.
pub struct LocalStore<R> {
    entries: RefCell<HashMap<Fingerprint, R>>,
}

impl<R> LocalStore<R> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Snapshot of the stored fingerprints, in no particular order.
    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl<R> Default for LocalStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Debug> Debug for LocalStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStore")
            .field("entries", &self.entries.borrow())
            .finish()
    }
}

impl<R: Clone> CacheStore<R> for LocalStore<R> {
    fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.borrow().contains_key(fingerprint)
    }

    fn get(&self, fingerprint: &Fingerprint) -> Option<R> {
        self.entries.borrow().get(fingerprint).cloned()
    }

    fn insert(&self, fingerprint: Fingerprint, value: R) {
        self.entries.borrow_mut().insert(fingerprint, value);
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Thread-safe store backed by a [`DashMap`].
///
/// Reads and writes only lock the shard holding the fingerprint, and no
/// shard lock is held while a value is being computed. Two threads missing
/// on the same fingerprint at the same time may therefore both compute it;
/// the later insert wins.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use memoprint_core::{CacheStore, Fingerprint, SharedStore};
///
/// let store = Arc::new(SharedStore::new());
/// let handles: Vec<_> = (0..4)
///     .map(|i| {
///         let store = Arc::clone(&store);
///         thread::spawn(move || store.insert(Fingerprint::from(format!("[{i}]")), i))
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(store.len(), 4);
/// ```
pub struct SharedStore<R> {
    entries: DashMap<Fingerprint, R>,
}

impl<R> SharedStore<R> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Snapshot of the stored fingerprints, in no particular order.
    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl<R> Default for SharedStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Debug> Debug for SharedStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStore")
            .field("entries", &self.entries)
            .finish()
    }
}

impl<R: Clone> CacheStore<R> for SharedStore<R> {
    fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    fn get(&self, fingerprint: &Fingerprint) -> Option<R> {
        self.entries
            .get(fingerprint)
            .map(|entry| entry.value().clone())
    }

    fn insert(&self, fingerprint: Fingerprint, value: R) {
        self.entries.insert(fingerprint, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

macro_rules! forward_cache_store {
    ($($wrapper:ty),+) => {
        $(
            impl<R, S: CacheStore<R> + ?Sized> CacheStore<R> for $wrapper {
                fn contains(&self, fingerprint: &Fingerprint) -> bool {
                    (**self).contains(fingerprint)
                }

                fn get(&self, fingerprint: &Fingerprint) -> Option<R> {
                    (**self).get(fingerprint)
                }

                fn insert(&self, fingerprint: Fingerprint, value: R) {
                    (**self).insert(fingerprint, value)
                }

                fn len(&self) -> usize {
                    (**self).len()
                }
            }
        )+
    };
}

forward_cache_store!(&S, Rc<S>, Arc<S>);
