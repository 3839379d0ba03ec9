//! # Memoprint Core
//!
//! Core types for the memoprint memoization library.
//!
//! A memoized call goes through two steps: its arguments are turned into a
//! [`Fingerprint`] by a [`KeyStrategy`], then the fingerprint is looked up in a
//! [`CacheStore`]. On a miss the computation runs and its result is stored.
//!
//! ## Module Organization
//!
//! - [`args`] - [`CallArgs`], the serializable argument lists that get fingerprinted
//! - [`strategy`] - the `raw`, `multi-hash` and `single-hash` key strategies
//! - [`store`] - the [`CacheStore`] contract with single-threaded and concurrent stores
//! - [`memoizer`] - [`Memoizer`] and [`Memoized`], the memoizing wrappers
//! - [`stats_registry`] - process-wide hit/miss statistics by name (`stats` feature)
//!
//! ## Example
//!
//! ```
//! use memoprint_core::{KeyStrategy, Memoizer};
//!
//! fn fib(memo: &Memoizer<u64>, n: u64) -> u64 {
//!     memo.invoke(&(n,), || {
//!         if n < 2 {
//!             1
//!         } else {
//!             fib(memo, n - 2) + fib(memo, n - 1)
//!         }
//!     })
//!     .unwrap()
//! }
//!
//! let memo = Memoizer::with_strategy(KeyStrategy::Raw);
//! assert_eq!(fib(&memo, 5), 8);
//! assert_eq!(memo.len(), 6);
//! ```
pub mod args;
mod error;
mod fingerprint;
pub mod memoizer;
pub mod store;
pub mod strategy;

#[cfg(feature = "stats")]
mod stats;

#[cfg(feature = "stats")]
pub mod stats_registry;

pub use args::CallArgs;
pub use error::MemoError;
pub use fingerprint::Fingerprint;
pub use memoizer::{wrap, Memoized, Memoizer, MemoizerConfig};
pub use store::{CacheStore, LocalStore, SharedStore};
pub use strategy::{KeyStrategy, MULTI_HASH_SEPARATOR};

#[cfg(feature = "stats")]
pub use stats::CacheStats;
