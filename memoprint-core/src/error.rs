use std::convert::Infallible;

use thiserror::Error;

/// Errors surfaced by fingerprinting and memoized invocation.
///
/// The type parameter `E` is the error type of the wrapped computation. For
/// infallible computations it defaults to [`Infallible`], so
/// `MemoError` alone means "fingerprinting or configuration failed".
///
/// # Variants
///
/// * `Serialization` - An argument could not be rendered to canonical text.
///   Nothing was computed and the store was left untouched.
/// * `UnknownStrategy` - A strategy name was not recognized at construction time.
/// * `Underlying` - The wrapped computation failed on a cache miss. The error is
///   carried unchanged and the fingerprint stays absent from the store.
///
/// # Examples
///
/// ```
/// use memoprint_core::{KeyStrategy, MemoError};
///
/// let err = "md5".parse::<KeyStrategy>().unwrap_err();
/// assert!(matches!(err, MemoError::UnknownStrategy(ref name) if name == "md5"));
/// ```
#[derive(Debug, Error)]
pub enum MemoError<E = Infallible> {
    #[error("failed to serialize call arguments: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown key strategy `{0}` (expected raw, multi-hash or single-hash)")]
    UnknownStrategy(String),

    #[error("{0}")]
    Underlying(E),
}

impl<E> MemoError<E> {
    /// Returns the wrapped computation's error, if that is what failed.
    pub fn into_underlying(self) -> Option<E> {
        match self {
            MemoError::Underlying(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if the arguments could not be fingerprinted.
    pub fn is_serialization(&self) -> bool {
        matches!(self, MemoError::Serialization(_))
    }

    /// Returns `true` if the computation itself failed.
    pub fn is_underlying(&self) -> bool {
        matches!(self, MemoError::Underlying(_))
    }
}

impl MemoError {
    /// Re-types an error that cannot carry an underlying failure.
    pub fn widen<E>(self) -> MemoError<E> {
        match self {
            MemoError::Serialization(err) => MemoError::Serialization(err),
            MemoError::UnknownStrategy(name) => MemoError::UnknownStrategy(name),
            MemoError::Underlying(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underlying_is_displayed_unchanged() {
        let err: MemoError<String> = MemoError::Underlying("division by zero".to_string());
        assert_eq!(err.to_string(), "division by zero");
        assert!(err.is_underlying());
        assert_eq!(err.into_underlying(), Some("division by zero".to_string()));
    }

    #[test]
    fn test_unknown_strategy_message() {
        let err: MemoError = MemoError::UnknownStrategy("md5".to_string());
        assert!(err.to_string().contains("`md5`"));
        assert!(!err.is_serialization());
    }

    #[test]
    fn test_widen_keeps_variant() {
        let err: MemoError = MemoError::UnknownStrategy("crc".to_string());
        let widened: MemoError<std::io::Error> = err.widen();
        assert!(matches!(widened, MemoError::UnknownStrategy(ref name) if name == "crc"));
        assert!(widened.into_underlying().is_none());
    }
}
