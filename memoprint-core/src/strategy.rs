use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::{CallArgs, Fingerprint, MemoError};

/// Separator placed between per-argument digests by [`KeyStrategy::MultiHash`].
pub const MULTI_HASH_SEPARATOR: &str = "-";

/// Policy that turns an argument list into a [`Fingerprint`].
///
/// All three strategies induce the same equivalence classes over well-behaved
/// arguments; they differ only in fingerprint shape and cost.
///
/// # Variants
///
/// * `Raw` - Canonical JSON of the whole argument list, used verbatim (default).
///   Cheapest to compute, but the key grows with the arguments.
/// * `MultiHash` - SHA-256 of each argument's canonical JSON, lowercase hex,
///   joined with `-` in argument order. One digest per argument; digest
///   boundaries line up with argument boundaries.
/// * `SingleHash` - SHA-256 of the canonical JSON of the whole argument list.
///   Constant size (64 hex characters) whatever the arity.
///
/// # Examples
///
/// ```
/// use memoprint_core::KeyStrategy;
///
/// let raw = KeyStrategy::Raw.fingerprint(&(5,)).unwrap();
/// assert_eq!(raw.as_str(), "[5]");
///
/// let single = KeyStrategy::SingleHash.fingerprint(&(5,)).unwrap();
/// assert_eq!(single.len(), 64);
///
/// let multi = KeyStrategy::MultiHash.fingerprint(&(1, 2)).unwrap();
/// assert_eq!(multi.as_str().split('-').count(), 2);
///
/// let parsed: KeyStrategy = "multi-hash".parse().unwrap();
/// assert_eq!(parsed, KeyStrategy::MultiHash);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyStrategy {
    #[default]
    Raw,
    MultiHash,
    SingleHash,
}

impl KeyStrategy {
    pub const ALL: [KeyStrategy; 3] = [
        KeyStrategy::Raw,
        KeyStrategy::MultiHash,
        KeyStrategy::SingleHash,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStrategy::Raw => "raw",
            KeyStrategy::MultiHash => "multi-hash",
            KeyStrategy::SingleHash => "single-hash",
        }
    }

    /// Derives the fingerprint of `args` under this strategy.
    ///
    /// Pure and deterministic: the same strategy and argument list always
    /// produce the same fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Serialization`] when an argument cannot be converted
    /// to canonical JSON (for example a map whose keys are not strings).
    pub fn fingerprint<A: CallArgs + ?Sized>(&self, args: &A) -> Result<Fingerprint, MemoError> {
        Ok(self.derive(args)?)
    }

    pub(crate) fn derive<A: CallArgs + ?Sized>(
        &self,
        args: &A,
    ) -> Result<Fingerprint, serde_json::Error> {
        let values = args.to_arg_values()?;
        let key = match self {
            KeyStrategy::Raw => canonical_text(&values)?,
            KeyStrategy::MultiHash => values
                .iter()
                .map(|value| canonical_text(value).map(|text| sha256_hex(&text)))
                .collect::<Result<Vec<_>, _>>()?
                .join(MULTI_HASH_SEPARATOR),
            KeyStrategy::SingleHash => sha256_hex(&canonical_text(&values)?),
        };
        Ok(Fingerprint::from(key))
    }
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyStrategy {
    type Err = MemoError;

    /// Parses a strategy name. The `*-sha256` spellings are accepted as aliases
    /// of the hash strategies. Names are matched exactly, as in `#[memoize]`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "raw" => Ok(KeyStrategy::Raw),
            "multi-hash" | "multi-sha256" => Ok(KeyStrategy::MultiHash),
            "single-hash" | "single-sha256" => Ok(KeyStrategy::SingleHash),
            other => Err(MemoError::UnknownStrategy(other.to_string())),
        }
    }
}

// Argument values arrive canonicalized (object keys sorted), so this text is canonical.
fn canonical_text<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
