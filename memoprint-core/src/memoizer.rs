use std::convert::Infallible;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
#[cfg(feature = "stats")]
use std::sync::Arc;

use log::{debug, trace};

#[cfg(feature = "stats")]
use crate::{stats_registry, CacheStats};
use crate::{CacheStore, CallArgs, Fingerprint, KeyStrategy, LocalStore, MemoError};

/// Construction options for a [`Memoizer`].
///
/// The store is not part of the record: [`build`](Self::build) creates a fresh
/// [`LocalStore`], [`build_with_store`](Self::build_with_store) takes the
/// store to use (possibly one shared with other memoizers).
///
/// # Examples
///
/// ```
/// use memoprint_core::{KeyStrategy, MemoizerConfig, SharedStore};
///
/// let local = MemoizerConfig::new().build::<u64>();
/// assert_eq!(local.strategy(), KeyStrategy::Raw);
///
/// let shared = MemoizerConfig::new()
///     .strategy_name("single-hash")
///     .unwrap()
///     .build_with_store::<u64, _>(SharedStore::new());
/// assert_eq!(shared.strategy(), KeyStrategy::SingleHash);
///
/// assert!(MemoizerConfig::new().strategy_name("md5").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoizerConfig {
    pub strategy: KeyStrategy,
    /// Statistics registry name. Ignored without the `stats` feature.
    pub name: Option<String>,
}

impl MemoizerConfig {
    /// Raw strategy, no registry name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key strategy.
    pub fn strategy(mut self, strategy: KeyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Selects the strategy by name.
    ///
    /// # Errors
    ///
    /// [`MemoError::UnknownStrategy`] if `name` is not a known strategy.
    pub fn strategy_name(mut self, name: &str) -> Result<Self, MemoError> {
        self.strategy = name.parse()?;
        Ok(self)
    }

    /// Publishes the memoizer's statistics in the
    /// [`stats_registry`](crate::stats_registry) under `name`.
    ///
    /// Memoizers built with the same name share one set of counters.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds a memoizer with its own empty store.
    pub fn build<R: Clone>(self) -> Memoizer<R> {
        self.build_with_store(LocalStore::new())
    }

    /// Builds a memoizer over `store`.
    pub fn build_with_store<R: Clone, S: CacheStore<R>>(self, store: S) -> Memoizer<R, S> {
        #[cfg(feature = "stats")]
        let stats = match &self.name {
            Some(name) => stats_registry::handle(name),
            None => Arc::new(CacheStats::new()),
        };

        Memoizer {
            strategy: self.strategy,
            store,
            name: self.name,
            #[cfg(feature = "stats")]
            stats,
            _value: PhantomData,
        }
    }
}

/// Memoizing front of a [`CacheStore`].
///
/// A `Memoizer` fingerprints call arguments with its [`KeyStrategy`] and serves
/// repeated calls from its store. The computation itself is supplied per call
/// as a closure, so methods keep their receiver exactly as they would without
/// memoization, and a function may recurse through the memoizer it is cached by.
///
/// # Type Parameters
///
/// * `R` - The cached value type. Values are cloned out of the store on a hit.
/// * `S` - The store. Defaults to a private [`LocalStore`]; pass `&S`, `Rc<S>` or
///   `Arc<S>` to [`with_store`](Self::with_store) to share one store between
///   several memoizers.
///
/// # Call paths
///
/// Every call takes exactly one of two paths:
///
/// - **Hit**: the fingerprint is in the store; the stored value is returned and
///   the computation is not run (its side effects do not happen).
/// - **Miss**: the computation runs; a successful value is inserted and
///   returned, a failure is returned unchanged and nothing is inserted.
///
/// Entries are never removed.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use memoprint_core::{KeyStrategy, Memoizer};
///
/// let calls = Cell::new(0);
/// let memo = Memoizer::with_strategy(KeyStrategy::MultiHash);
///
/// let square = |n: u64| {
///     memo.invoke(&(n,), || {
///         calls.set(calls.get() + 1);
///         n * n
///     })
/// };
///
/// assert_eq!(square(12).unwrap(), 144);
/// assert_eq!(square(12).unwrap(), 144);
/// assert_eq!(calls.get(), 1);
/// ```
pub struct Memoizer<R, S = LocalStore<R>> {
    strategy: KeyStrategy,
    store: S,
    name: Option<String>,
    #[cfg(feature = "stats")]
    stats: Arc<CacheStats>,
    _value: PhantomData<fn() -> R>,
}

impl<R: Clone> Memoizer<R> {
    /// Raw strategy, fresh store.
    pub fn new() -> Self {
        MemoizerConfig::new().build()
    }

    /// Memoizer with `strategy` and a fresh store.
    pub fn with_strategy(strategy: KeyStrategy) -> Self {
        MemoizerConfig::new().strategy(strategy).build()
    }

    /// Memoizer with the strategy called `name` and a fresh store.
    ///
    /// # Errors
    ///
    /// [`MemoError::UnknownStrategy`] if `name` is not a known strategy.
    pub fn from_name(name: &str) -> Result<Self, MemoError> {
        Ok(MemoizerConfig::new().strategy_name(name)?.build())
    }
}

impl<R: Clone> Default for Memoizer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone, S: CacheStore<R>> Memoizer<R, S> {
    /// Memoizer over a caller-supplied store.
    ///
    /// Passing `&S`, `Rc<S>` or `Arc<S>` shares the store: every memoizer over
    /// it sees the others' entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use memoprint_core::{KeyStrategy, Memoizer, SharedStore};
    ///
    /// let store = Arc::new(SharedStore::new());
    /// let first = Memoizer::with_store(KeyStrategy::Raw, Arc::clone(&store));
    /// let second = Memoizer::with_store(KeyStrategy::Raw, Arc::clone(&store));
    ///
    /// first.invoke(&("eur",), || 1.08).unwrap();
    /// assert_eq!(second.invoke(&("eur",), || 0.0).unwrap(), 1.08);
    /// assert_eq!(first.len(), 1);
    /// ```
    pub fn with_store(strategy: KeyStrategy, store: S) -> Self {
        MemoizerConfig::new()
            .strategy(strategy)
            .build_with_store(store)
    }

    /// Strategy used to fingerprint arguments, fixed at construction.
    pub fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registry name given at construction, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Hit, miss and failure counters of this memoizer.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached values.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Fingerprint of `args` under this memoizer's strategy.
    pub fn fingerprint<A: CallArgs + ?Sized>(&self, args: &A) -> Result<Fingerprint, MemoError> {
        self.strategy.fingerprint(args)
    }

    /// Returns `true` if a value is cached for `args`.
    pub fn contains<A: CallArgs + ?Sized>(&self, args: &A) -> Result<bool, MemoError> {
        Ok(self.store.contains(&self.fingerprint(args)?))
    }

    /// Returns the cached value for `fingerprint`, counting a hit or a miss.
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<R> {
        let cached = self.store.get(fingerprint);

        #[cfg(feature = "stats")]
        {
            if cached.is_some() {
                self.stats.record_hit();
            } else {
                self.stats.record_miss();
            }
        }

        if cached.is_some() {
            trace!("{}: hit {}", self.label(), fingerprint);
        } else {
            trace!("{}: miss {}", self.label(), fingerprint);
        }
        cached
    }

    /// Stores `value` under `fingerprint`.
    pub fn record(&self, fingerprint: Fingerprint, value: R) {
        trace!("{}: storing {}", self.label(), fingerprint);
        self.store.insert(fingerprint, value);
    }

    /// Stores the `Ok` value of a finished computation. An `Err` is only counted.
    pub fn record_outcome<E>(&self, fingerprint: Fingerprint, outcome: &Result<R, E>) {
        match outcome {
            Ok(value) => self.record(fingerprint, value.clone()),
            Err(_) => {
                #[cfg(feature = "stats")]
                self.stats.record_failure();
                debug!(
                    "{}: computation for {} failed, not cached",
                    self.label(),
                    fingerprint
                );
            }
        }
    }

    /// Returns the cached value for `args`, or runs `compute` and caches its result.
    ///
    /// # Errors
    ///
    /// [`MemoError::Serialization`] if `args` cannot be fingerprinted; `compute`
    /// is not run and the store is not touched.
    pub fn invoke<A, F>(&self, args: &A, compute: F) -> Result<R, MemoError>
    where
        A: CallArgs + ?Sized,
        F: FnOnce() -> R,
    {
        self.try_invoke(args, || Ok::<R, Infallible>(compute()))
    }

    /// Fallible form of [`invoke`](Self::invoke).
    ///
    /// Only `Ok` values are cached. An `Err` from `compute` is returned as
    /// [`MemoError::Underlying`] and the next call with the same arguments runs
    /// `compute` again.
    pub fn try_invoke<A, E, F>(&self, args: &A, compute: F) -> Result<R, MemoError<E>>
    where
        A: CallArgs + ?Sized,
        F: FnOnce() -> Result<R, E>,
    {
        let fingerprint = self.strategy.derive(args)?;
        if let Some(cached) = self.lookup(&fingerprint) {
            return Ok(cached);
        }

        let outcome = compute();
        self.record_outcome(fingerprint, &outcome);
        outcome.map_err(MemoError::Underlying)
    }

    /// Wraps `func` so that it is called through this memoizer.
    pub fn wrap<F>(self, func: F) -> Memoized<F, R, S> {
        Memoized {
            func,
            memoizer: self,
        }
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.strategy.as_str())
    }
}

impl<R, S: Debug> Debug for Memoizer<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoizer")
            .field("strategy", &self.strategy)
            .field("name", &self.name)
            .field("store", &self.store)
            .finish()
    }
}

/// A function bundled with the [`Memoizer`] that caches it.
///
/// The function takes its arguments as one tuple (or slice-like value), which is
/// also what gets fingerprinted.
///
/// # Examples
///
/// ```
/// use memoprint_core::{wrap, KeyStrategy};
///
/// let area = wrap(KeyStrategy::SingleHash, |(w, h): (u32, u32)| w * h);
/// assert_eq!(area.call((3, 4)).unwrap(), 12);
/// assert_eq!(area.memoizer().len(), 1);
/// ```
pub struct Memoized<F, R, S = LocalStore<R>> {
    func: F,
    memoizer: Memoizer<R, S>,
}

impl<F, R: Clone, S: CacheStore<R>> Memoized<F, R, S> {
    /// Calls the wrapped function, or returns the value cached for `args`.
    pub fn call<A>(&self, args: A) -> Result<R, MemoError>
    where
        A: CallArgs,
        F: Fn(A) -> R,
    {
        let fingerprint = self.memoizer.fingerprint(&args)?;
        if let Some(cached) = self.memoizer.lookup(&fingerprint) {
            return Ok(cached);
        }

        let value = (self.func)(args);
        self.memoizer.record(fingerprint, value.clone());
        Ok(value)
    }

    /// Calls a fallible wrapped function. Errors are returned as
    /// [`MemoError::Underlying`] and never cached.
    pub fn try_call<A, E>(&self, args: A) -> Result<R, MemoError<E>>
    where
        A: CallArgs,
        F: Fn(A) -> Result<R, E>,
    {
        let fingerprint = self.memoizer.strategy.derive(&args)?;
        if let Some(cached) = self.memoizer.lookup(&fingerprint) {
            return Ok(cached);
        }

        let outcome = (self.func)(args);
        self.memoizer.record_outcome(fingerprint, &outcome);
        outcome.map_err(MemoError::Underlying)
    }

    /// The memoizer in front of the wrapped function.
    pub fn memoizer(&self) -> &Memoizer<R, S> {
        &self.memoizer
    }

    /// Splits into the bare function and its memoizer.
    pub fn into_parts(self) -> (F, Memoizer<R, S>) {
        (self.func, self.memoizer)
    }
}

/// Wraps `func` with a fresh memoizer using `strategy`.
pub fn wrap<F, R: Clone>(strategy: KeyStrategy, func: F) -> Memoized<F, R> {
    Memoizer::with_strategy(strategy).wrap(func)
}
