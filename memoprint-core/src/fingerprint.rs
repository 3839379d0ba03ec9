use std::borrow::Borrow;
use std::fmt;

/// Opaque cache key derived from one call's arguments.
///
/// A fingerprint is produced by a [`KeyStrategy`](crate::KeyStrategy) and is
/// only ever used to index a [`CacheStore`](crate::CacheStore). Its shape depends
/// on the strategy (canonical JSON text, dash-joined digests or a single digest)
/// but callers should treat it as an opaque string.
///
/// # Examples
///
/// ```
/// use memoprint_core::{Fingerprint, KeyStrategy};
///
/// let fp = KeyStrategy::Raw.fingerprint(&(1, "two")).unwrap();
/// assert_eq!(fp.as_str(), r#"[1,"two"]"#);
/// assert_eq!(fp, Fingerprint::from(r#"[1,"two"]"#));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Returns the fingerprint text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fingerprint and returns its text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length of the fingerprint text in bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use memoprint_core::KeyStrategy;
    ///
    /// // one 64-character digest whatever the arity
    /// let fp = KeyStrategy::SingleHash.fingerprint(&(1, 2, 3)).unwrap();
    /// assert_eq!(fp.len(), 64);
    /// ```
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty fingerprint, which only
    /// [`KeyStrategy::MultiHash`](crate::KeyStrategy::MultiHash) produces (for a
    /// call with no arguments).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Fingerprint {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_display_matches_inner_text() {
        let fp = Fingerprint::from("[5]");
        assert_eq!(fp.to_string(), "[5]");
        assert_eq!(fp.len(), 3);
        assert!(!fp.is_empty());
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Fingerprint::from("abc"), 1);
        assert_eq!(map.get("abc"), Some(&1));
    }
}
