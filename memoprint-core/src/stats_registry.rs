use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::CacheStats;

/// Process-wide registry of named memoizer statistics.
///
/// A memoizer built with a name (see [`MemoizerConfig::name`](crate::MemoizerConfig::name))
/// and every `#[memoize]` function obtain their counters from here. All
/// memoizers registered under one name share the same [`CacheStats`], so
/// thread-local memoizers of one function report aggregated numbers.
///
/// # Examples
///
/// ```
/// use memoprint_core::stats_registry;
///
/// let stats = stats_registry::handle("doc_example");
/// stats.record_miss();
///
/// let same = stats_registry::get("doc_example").unwrap();
/// assert_eq!(same.misses(), stats.misses());
/// assert!(stats_registry::list().contains(&"doc_example".to_string()));
/// ```
static STATS_REGISTRY: Lazy<RwLock<HashMap<String, Arc<CacheStats>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the statistics registered under `name`, registering fresh ones
/// on first use.
pub fn handle(name: &str) -> Arc<CacheStats> {
    if let Some(stats) = STATS_REGISTRY.read().get(name) {
        return Arc::clone(stats);
    }
    let mut registry = STATS_REGISTRY.write();
    Arc::clone(
        registry
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(CacheStats::new())),
    )
}

/// Registers `stats` under `name`, replacing whatever was registered before.
pub fn register(name: &str, stats: Arc<CacheStats>) {
    STATS_REGISTRY.write().insert(name.to_string(), stats);
}

/// Live handle to the statistics registered under `name`.
pub fn get(name: &str) -> Option<Arc<CacheStats>> {
    STATS_REGISTRY.read().get(name).cloned()
}

/// Registered names, sorted.
pub fn list() -> Vec<String> {
    let mut names: Vec<String> = STATS_REGISTRY.read().keys().cloned().collect();
    names.sort();
    names
}

/// Zeroes the counters registered under `name`. Returns `false` if the name is unknown.
pub fn reset(name: &str) -> bool {
    match STATS_REGISTRY.read().get(name) {
        Some(stats) => {
            stats.reset();
            true
        }
        None => false,
    }
}

/// Forgets every registration. Memoizers keep their own handles and keep counting.
pub fn clear() {
    STATS_REGISTRY.write().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_handle_is_shared_per_name() {
        let first = handle("registry_shared");
        let second = handle("registry_shared");
        first.record_hit();
        assert_eq!(second.hits(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    #[serial]
    fn test_register_replaces() {
        let original = handle("registry_replace");
        original.record_miss();

        register("registry_replace", Arc::new(CacheStats::new()));
        assert_eq!(get("registry_replace").unwrap().misses(), 0);
    }

    #[test]
    #[serial]
    fn test_get_unknown() {
        assert!(get("registry_never_registered").is_none());
    }

    #[test]
    #[serial]
    fn test_reset() {
        let stats = handle("registry_reset");
        stats.record_hit();
        stats.record_hit();

        assert!(reset("registry_reset"));
        assert_eq!(stats.hits(), 0);
        assert!(!reset("registry_missing"));
    }

    #[test]
    #[serial]
    fn test_list_and_clear() {
        handle("registry_b");
        handle("registry_a");

        let names = list();
        let a = names.iter().position(|n| n == "registry_a").unwrap();
        let b = names.iter().position(|n| n == "registry_b").unwrap();
        assert!(a < b);

        let kept = handle("registry_kept");
        clear();
        assert!(list().is_empty());

        // handles stay usable after the registry forgets them
        kept.record_hit();
        assert_eq!(kept.hits(), 1);
    }
}
