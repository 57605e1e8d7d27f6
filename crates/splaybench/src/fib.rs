//! Fibonacci sweep: memoized recursion through an unbounded LRU cache and
//! through a splay tree
//!
//! Values are `u128` with wrapping addition, i.e. Fibonacci modulo 2^128.
//! Exact terms stop fitting after F(186); both backends see the same
//! arithmetic so their answers stay comparable.

use serde::Serialize;
use splaycache::{CacheStats, LruCache, Memo, MemoCache, SplayTree};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::report::timed;

/// Largest sweep bound; `fibonacci` recursion depth grows linearly with `n`
pub const MAX_N: u64 = 2_000;

/// Sweep parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FibConfig {
    /// Exclusive upper bound of the sweep
    pub max: u64,
    /// Distance between sampled `n`
    pub step: u64,
    /// Empty both memo tables before every sample
    pub cold: bool,
}

impl Default for FibConfig {
    fn default() -> Self {
        Self {
            max: 1_000,
            step: 50,
            cold: false,
        }
    }
}

impl FibConfig {
    /// Check the sweep bounds
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(Error::Zero("step"));
        }
        if usize::try_from(self.step).is_err() {
            return Err(Error::LimitExceeded {
                what: "step",
                value: self.step,
                max: usize::MAX as u64,
            });
        }
        if self.max > MAX_N {
            return Err(Error::LimitExceeded {
                what: "max",
                value: self.max,
                max: MAX_N,
            });
        }
        Ok(())
    }

    /// Sampled values of `n`.
    ///
    /// Panics on a zero step; call [`FibConfig::validate`] first.
    pub fn points(&self) -> impl Iterator<Item = u64> {
        let step = usize::try_from(self.step).unwrap_or(usize::MAX);
        (0..self.max).step_by(step)
    }
}

/// One sample of the sweep
#[derive(Debug, Clone, Serialize)]
pub struct FibRow {
    /// Argument
    pub n: u64,
    /// F(n) mod 2^128
    pub value: u128,
    /// Seconds spent through the LRU memo
    pub lru_secs: f64,
    /// Seconds spent through the splay memo
    pub splay_secs: f64,
}

/// Full sweep result
#[derive(Debug, Clone, Serialize)]
pub struct FibReport {
    /// Exclusive upper bound used
    pub max: u64,
    /// Step used
    pub step: u64,
    /// Whether tables were emptied between samples
    pub cold: bool,
    /// Samples in sweep order
    pub rows: Vec<FibRow>,
    /// LRU memo statistics over the whole sweep
    pub lru: CacheStats,
    /// Splay memo statistics over the whole sweep
    pub splay: CacheStats,
    /// Splay tree height when the sweep finished
    pub splay_height: usize,
}

/// F(n) mod 2^128, memoized through `memo`.
///
/// The table is consulted before the base cases, and only `n >= 2` is stored.
pub fn fibonacci<C>(n: u64, memo: &mut Memo<C>) -> u128
where
    C: MemoCache<Key = u64, Value = u128>,
{
    if let Some(value) = memo.get(&n) {
        return value;
    }
    if n <= 1 {
        return n as u128;
    }

    let value = fibonacci(n - 1, memo).wrapping_add(fibonacci(n - 2, memo));
    memo.put(n, value);
    value
}

/// Run the sweep, timing one evaluation per backend for every sampled `n`
pub fn run(config: &FibConfig) -> Result<FibReport> {
    config.validate()?;
    info!(max = config.max, step = config.step, cold = config.cold, "Starting Fibonacci sweep");

    let mut lru = Memo::new(LruCache::unbounded());
    let mut splay = Memo::new(SplayTree::new());
    let mut rows = Vec::new();

    for n in config.points() {
        if config.cold {
            lru.invalidate();
            splay.invalidate();
        }

        let (lru_value, lru_secs) = timed(|| fibonacci(n, &mut lru));
        let (splay_value, splay_secs) = timed(|| fibonacci(n, &mut splay));

        if lru_value != splay_value {
            return Err(Error::Mismatch {
                what: format!("F({})", n),
                expected: lru_value.to_string(),
                actual: splay_value.to_string(),
            });
        }

        debug!(n, lru_secs, splay_secs, "Sample done");
        rows.push(FibRow {
            n,
            value: lru_value,
            lru_secs,
            splay_secs,
        });
    }

    let splay_height = splay.cache().height();
    info!(samples = rows.len(), splay_height, "Fibonacci sweep finished");

    Ok(FibReport {
        max: config.max,
        step: config.step,
        cold: config.cold,
        rows,
        lru: *lru.stats(),
        splay: *splay.stats(),
        splay_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibonacci_small_values() {
        let mut memo = Memo::new(SplayTree::new());
        let expected = [0u128, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        for (n, value) in expected.iter().enumerate() {
            assert_eq!(fibonacci(n as u64, &mut memo), *value);
        }
    }

    #[test]
    fn test_fibonacci_largest_exact_term() {
        let mut memo = Memo::new(LruCache::unbounded());
        assert_eq!(
            fibonacci(186, &mut memo),
            332_825_110_087_067_562_321_196_029_789_634_457_848
        );
    }

    #[test]
    fn test_fibonacci_base_cases_not_stored() {
        let mut memo = Memo::new(SplayTree::new());
        fibonacci(10, &mut memo);

        assert_eq!(memo.len(), 9);
        assert_eq!(memo.cache().peek(&1), None);
        assert_eq!(memo.cache().peek(&2), Some(&1));
    }

    #[test]
    fn test_fibonacci_wraps_past_u128() {
        let mut splay = Memo::new(SplayTree::new());
        let mut lru = Memo::new(LruCache::unbounded());

        assert_eq!(fibonacci(500, &mut splay), fibonacci(500, &mut lru));
        assert_eq!(
            fibonacci(187, &mut splay),
            fibonacci(186, &mut splay).wrapping_add(fibonacci(185, &mut splay))
        );
    }

    #[test]
    fn test_points() {
        let config = FibConfig { max: 200, step: 50, cold: false };
        assert_eq!(config.points().collect::<Vec<_>>(), vec![0, 50, 100, 150]);
        assert_eq!(FibConfig::default().points().count(), 20);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_points_with_huge_step() {
        let config = FibConfig { max: 1_000, step: u64::MAX, cold: false };
        assert!(config.validate().is_ok());
        assert_eq!(config.points().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_validate() {
        let config = FibConfig { max: 100, step: 0, cold: false };
        assert!(matches!(config.validate(), Err(Error::Zero("step"))));

        let config = FibConfig { max: MAX_N + 1, step: 10, cold: false };
        assert!(matches!(config.validate(), Err(Error::LimitExceeded { what: "max", .. })));
    }

    #[test]
    fn test_run_warm_sweep() {
        let config = FibConfig { max: 300, step: 100, cold: false };
        let report = run(&config).unwrap();

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].value, 0);
        // Only n in 2..=200 are ever stored
        assert_eq!(report.splay.inserts(), 199);
        assert_eq!(report.lru.inserts(), 199);
        assert_eq!(report.splay.misses(), report.lru.misses());
        assert!(report.splay_height > 0);
    }

    #[test]
    fn test_run_cold_sweep_recomputes() {
        let warm = run(&FibConfig { max: 300, step: 100, cold: false }).unwrap();
        let cold = run(&FibConfig { max: 300, step: 100, cold: true }).unwrap();

        // 2..=100, then 2..=200 again
        assert_eq!(cold.splay.inserts(), 99 + 199);
        assert_eq!(cold.splay.invalidations(), 3);
        assert!(cold.splay.inserts() > warm.splay.inserts());
        assert_eq!(cold.rows[2].value, warm.rows[2].value);
    }
}
