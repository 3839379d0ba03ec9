// Timing comparison of memoized and plain recursive Fibonacci.
//
// Usage: cargo run --release --example fibonacci -- [n]
// Set RUST_LOG=memoprint_core=trace to watch hits and misses.

use log::info;
use memoprint::{memoize, stats_registry};
use std::time::Instant;

struct Fibonacci;

impl Fibonacci {
    #[memoize]
    fn cached(&self, n: u64) -> u64 {
        if n < 2 {
            return 1;
        }
        self.cached(n - 2) + self.cached(n - 1)
    }

    #[memoize(strategy = "multi-hash")]
    fn cached_multi_sha256(&self, n: u64) -> u64 {
        if n < 2 {
            return 1;
        }
        self.cached_multi_sha256(n - 2) + self.cached_multi_sha256(n - 1)
    }

    #[memoize(strategy = "single-hash")]
    fn cached_single_sha256(&self, n: u64) -> u64 {
        if n < 2 {
            return 1;
        }
        self.cached_single_sha256(n - 2) + self.cached_single_sha256(n - 1)
    }

    fn uncached(&self, n: u64) -> u64 {
        if n < 2 {
            return 1;
        }
        self.uncached(n - 2) + self.uncached(n - 1)
    }
}

fn time(label: &str, func: impl FnOnce() -> u64) {
    let start = Instant::now();
    let result = func();
    println!("{label:>14}: result {result}, time {:?}", start.elapsed());
}

fn main() {
    env_logger::init();

    let n: u64 = match std::env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(err) => {
                eprintln!("invalid n `{arg}`: {err}");
                std::process::exit(2);
            }
        },
        None => 40,
    };
    info!("computing fibonacci({n})");

    let fib = Fibonacci;
    println!("=== Fibonacci({n}) ===\n");
    time("raw", || fib.cached(n));
    time("multi-hash", || fib.cached_multi_sha256(n));
    time("single-hash", || fib.cached_single_sha256(n));
    time("uncached", || fib.uncached(n));

    println!("\n=== Statistics ===");
    for name in stats_registry::list() {
        if let Some(stats) = stats_registry::get(&name) {
            println!(
                "{name:>22}: {} hits, {} misses ({:.1}% hit rate)",
                stats.hits(),
                stats.misses(),
                stats.hit_rate() * 100.0
            );
        }
    }
}
