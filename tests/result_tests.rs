// Result-returning functions: Ok values are cached, errors never are.

use memoprint::memoize;
use std::sync::atomic::{AtomicU32, Ordering};

#[test]
fn test_err_is_not_cached_and_retried() {
    static ATTEMPTS: AtomicU32 = AtomicU32::new(0);

    // fails on the first attempt for any input, succeeds afterwards
    #[memoize]
    fn flaky_lookup(id: u32) -> Result<String, String> {
        let attempt = ATTEMPTS.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            Err(format!("backend unavailable for {id}"))
        } else {
            Ok(format!("record-{id}"))
        }
    }

    assert_eq!(
        flaky_lookup(7),
        Err("backend unavailable for 7".to_string())
    );
    assert_eq!(flaky_lookup(7), Ok("record-7".to_string()));
    assert_eq!(flaky_lookup(7), Ok("record-7".to_string()));

    assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_question_mark_inside_body() {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    #[memoize(strategy = "single-hash")]
    fn parse_sum(a: String, b: String) -> Result<i64, std::num::ParseIntError> {
        CALLS.fetch_add(1, Ordering::SeqCst);
        let a: i64 = a.trim().parse()?;
        let b: i64 = b.trim().parse()?;
        Ok(a + b)
    }

    assert_eq!(parse_sum("1".into(), " 2".into()), Ok(3));
    assert_eq!(parse_sum("1".into(), " 2".into()), Ok(3));
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);

    assert!(parse_sum("x".into(), "2".into()).is_err());
    assert!(parse_sum("x".into(), "2".into()).is_err());
    assert_eq!(CALLS.load(Ordering::SeqCst), 3);
}

#[test]
fn test_global_result_function() {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    #[memoize(scope = "global", strategy = "multi-hash")]
    fn checked_div(a: i32, b: i32) -> std::result::Result<i32, String> {
        CALLS.fetch_add(1, Ordering::SeqCst);
        if b == 0 {
            Err("division by zero".to_string())
        } else {
            Ok(a / b)
        }
    }

    assert_eq!(checked_div(10, 2), Ok(5));
    assert_eq!(checked_div(10, 2), Ok(5));
    assert!(checked_div(1, 0).is_err());
    assert!(checked_div(1, 0).is_err());

    assert_eq!(CALLS.load(Ordering::SeqCst), 3);
}

#[test]
fn test_early_return_inside_body() {
    #[memoize]
    fn classify(n: i32) -> &'static str {
        if n < 0 {
            return "negative";
        }
        if n == 0 {
            return "zero";
        }
        "positive"
    }

    assert_eq!(classify(-3), "negative");
    assert_eq!(classify(0), "zero");
    assert_eq!(classify(4), "positive");
    assert_eq!(classify(-3), "negative");
}
