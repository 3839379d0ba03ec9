//! # Memoprint
//!
//! Memoization keyed by a fingerprint of the call's arguments.
//!
//! ## Features
//!
//! - **Three key strategies**: `raw` canonical JSON, `multi-hash` (SHA-256 per
//!   argument) and `single-hash` (SHA-256 of the whole argument list)
//! - **Canonical keys**: structured arguments are keyed by content, not by
//!   field or insertion order
//! - **Explicit stores**: every memoizer owns its store unless you hand it a
//!   shared one
//! - **Result-aware**: failed computations are never cached
//! - **Attribute macro**: `#[memoize]` for functions and methods, with one
//!   process-wide store per function (or one per thread with `scope = "thread"`)
//!
//! ## Quick Start
//!
//! ```rust
//! use memoprint::memoize;
//!
//! #[memoize]
//! fn fibonacci(n: u64) -> u64 {
//!     if n < 2 {
//!         return 1;
//!     }
//!     fibonacci(n - 2) + fibonacci(n - 1)
//! }
//!
//! assert_eq!(fibonacci(5), 8);
//! assert_eq!(fibonacci(80), 37_889_062_373_143_906);
//! ```
//!
//! ## Choosing a Strategy
//!
//! ```rust
//! use memoprint::memoize;
//!
//! #[memoize(strategy = "multi-hash")]
//! fn word_count(text: String, separator: char) -> usize {
//!     text.split(separator).count()
//! }
//!
//! assert_eq!(word_count("a b c".to_string(), ' '), 3);
//! ```
//!
//! ## Methods
//!
//! The receiver is not part of the key: one store serves the method for every
//! instance, and the body still runs against its own `self`.
//!
//! ```rust
//! use memoprint::memoize;
//!
//! struct Catalog {
//!     currency: &'static str,
//! }
//!
//! impl Catalog {
//!     #[memoize]
//!     fn label(&self, sku: u32) -> String {
//!         format!("SKU-{sku} ({})", self.currency)
//!     }
//! }
//!
//! let catalog = Catalog { currency: "EUR" };
//! assert_eq!(catalog.label(7), "SKU-7 (EUR)");
//! ```
//!
//! ## Error Handling
//!
//! Functions returning `Result<T, E>` only cache `Ok` values:
//!
//! ```rust
//! use memoprint::memoize;
//!
//! #[memoize]
//! fn divide(a: i32, b: i32) -> Result<i32, String> {
//!     if b == 0 {
//!         Err("division by zero".to_string())
//!     } else {
//!         Ok(a / b)
//!     }
//! }
//!
//! assert_eq!(divide(10, 2), Ok(5));
//! assert!(divide(10, 0).is_err());
//! ```
//!
//! ## Without the Macro
//!
//! [`Memoizer`] gives the same behavior with fingerprinting errors reported as
//! [`MemoError`] instead of a panic, and lets several memoizers share one store:
//!
//! ```rust
//! use std::rc::Rc;
//! use memoprint::{KeyStrategy, LocalStore, Memoizer};
//!
//! let store = Rc::new(LocalStore::new());
//! let a = Memoizer::with_store(KeyStrategy::SingleHash, Rc::clone(&store));
//! let b = Memoizer::with_store(KeyStrategy::SingleHash, Rc::clone(&store));
//!
//! assert_eq!(a.invoke(&("key",), || 1).unwrap(), 1);
//! assert_eq!(b.invoke(&("key",), || 2).unwrap(), 1);
//! ```

pub use memoprint_core::*;
pub use memoprint_macros::memoize;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
