// Integration tests for the #[memoize] attribute on free functions
//
// Each test owns its functions and counters so the thread-local and global
// stores never leak between tests.

use memoprint::memoize;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

#[test]
fn test_recursive_fibonacci_raw() {
    static BODIES: AtomicU32 = AtomicU32::new(0);

    #[memoize]
    fn fib(n: u64) -> u64 {
        BODIES.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            return 1;
        }
        fib(n - 2) + fib(n - 1)
    }

    assert_eq!(fib(5), 8);
    // one body per distinct n in 0..=5
    assert_eq!(BODIES.load(Ordering::SeqCst), 6);

    assert_eq!(fib(5), 8);
    assert_eq!(BODIES.load(Ordering::SeqCst), 6);
}

#[test]
fn test_recursive_fibonacci_hash_strategies() {
    static MULTI: AtomicU32 = AtomicU32::new(0);
    static SINGLE: AtomicU32 = AtomicU32::new(0);

    #[memoize(strategy = "multi-hash")]
    fn fib_multi(n: u64) -> u64 {
        MULTI.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            return 1;
        }
        fib_multi(n - 2) + fib_multi(n - 1)
    }

    #[memoize(strategy = "single-sha256")]
    fn fib_single(n: u64) -> u64 {
        SINGLE.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            return 1;
        }
        fib_single(n - 2) + fib_single(n - 1)
    }

    assert_eq!(fib_multi(40), 165_580_141);
    assert_eq!(fib_single(40), 165_580_141);
    assert_eq!(MULTI.load(Ordering::SeqCst), 41);
    assert_eq!(SINGLE.load(Ordering::SeqCst), 41);
}

#[test]
fn test_side_effect_runs_once_per_argument_list() {
    static EFFECTS: AtomicU32 = AtomicU32::new(0);

    #[memoize]
    fn greet(name: String, excited: bool) -> String {
        EFFECTS.fetch_add(1, Ordering::SeqCst);
        if excited {
            format!("Hello, {name}!")
        } else {
            format!("Hello, {name}.")
        }
    }

    for _ in 0..5 {
        assert_eq!(greet("Ada".to_string(), true), "Hello, Ada!");
    }
    assert_eq!(EFFECTS.load(Ordering::SeqCst), 1);

    assert_eq!(greet("Ada".to_string(), false), "Hello, Ada.");
    assert_eq!(greet("Grace".to_string(), true), "Hello, Grace!");
    assert_eq!(EFFECTS.load(Ordering::SeqCst), 3);
}

#[test]
fn test_zero_argument_function() {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    #[memoize(strategy = "single-hash")]
    fn config_version() -> u32 {
        CALLS.fetch_add(1, Ordering::SeqCst) + 100
    }

    assert_eq!(config_version(), 100);
    assert_eq!(config_version(), 100);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_structured_arguments_keyed_by_content() {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    #[derive(Serialize)]
    struct Query {
        table: String,
        filters: HashMap<String, i64>,
    }

    #[memoize(strategy = "multi-hash")]
    fn plan(query: Query, limit: usize) -> String {
        CALLS.fetch_add(1, Ordering::SeqCst);
        format!("{} x{} limit {}", query.table, query.filters.len(), limit)
    }

    let mut first = HashMap::new();
    first.insert("age".to_string(), 30);
    first.insert("score".to_string(), 7);
    first.insert("zip".to_string(), 1000);

    let mut second = HashMap::new();
    second.insert("zip".to_string(), 1000);
    second.insert("score".to_string(), 7);
    second.insert("age".to_string(), 30);

    let a = plan(
        Query {
            table: "users".to_string(),
            filters: first,
        },
        10,
    );
    let b = plan(
        Query {
            table: "users".to_string(),
            filters: second,
        },
        10,
    );

    assert_eq!(a, b);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_mutable_argument_binding() {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    #[memoize]
    fn normalized(mut words: Vec<String>) -> Vec<String> {
        CALLS.fetch_add(1, Ordering::SeqCst);
        words.sort();
        words.dedup();
        words
    }

    let input = vec!["b".to_string(), "a".to_string(), "b".to_string()];
    assert_eq!(normalized(input.clone()), vec!["a", "b"]);
    assert_eq!(normalized(input), vec!["a", "b"]);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_thread_scope_is_per_thread() {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    #[memoize(scope = "thread")]
    fn square(x: i64) -> i64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        x * x
    }

    assert_eq!(square(9), 81);
    std::thread::spawn(|| assert_eq!(square(9), 81))
        .join()
        .unwrap();
    assert_eq!(square(9), 81);

    // computed once on this thread and once on the spawned one
    assert_eq!(CALLS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_default_scope_is_shared_between_threads() {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    #[memoize]
    fn cube(x: i64) -> i64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        x * x * x
    }

    assert_eq!(cube(3), 27);
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| cube(3)))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 27);
    }
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_explicit_global_scope_matches_default() {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    #[memoize(scope = "global", strategy = "single-hash")]
    fn halve(x: i64) -> i64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        x / 2
    }

    std::thread::spawn(|| assert_eq!(halve(10), 5))
        .join()
        .unwrap();
    assert_eq!(halve(10), 5);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
#[should_panic(expected = "could not fingerprint the arguments of `by_pair`")]
fn test_unserializable_arguments_panic() {
    #[memoize]
    fn by_pair(table: HashMap<(u8, u8), u8>) -> usize {
        table.len()
    }

    let mut table = HashMap::new();
    table.insert((1, 2), 3);
    by_pair(table);
}
