//! Range-sum workload: random range queries interleaved with point updates
//!
//! Range answers are memoized by `(l, r)`. Any update makes every memoized
//! sum stale, so it invalidates the whole table.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::Serialize;
use splaycache::{CacheStats, LruCache, Memo, MemoCache, SplayTree};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::report::timed;

/// Largest accepted array length and query count
pub const MAX_SIZE: usize = 10_000_000;

/// Largest accepted array value; a sum over `MAX_SIZE` of them fits in `u64`
pub const MAX_VALUE: u64 = u64::MAX / MAX_SIZE as u64;

/// Workload parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSumConfig {
    /// Array length
    pub len: usize,
    /// Number of queries
    pub queries: usize,
    /// LRU capacity
    pub capacity: usize,
    /// Probability that a query is a range sum rather than an update
    pub range_ratio: f64,
    /// Array values are drawn from `1..=max_value`
    pub max_value: u64,
    /// PRNG seed, random when absent
    pub seed: Option<u64>,
}

impl Default for RangeSumConfig {
    fn default() -> Self {
        Self {
            len: 100_000,
            queries: 50_000,
            capacity: 1_000,
            range_ratio: 0.7,
            max_value: 1_000,
            seed: None,
        }
    }
}

impl RangeSumConfig {
    /// Check workload parameters
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Zero("capacity"));
        }
        if self.max_value == 0 {
            return Err(Error::Zero("max_value"));
        }
        if self.max_value > MAX_VALUE {
            return Err(Error::LimitExceeded {
                what: "max_value",
                value: self.max_value,
                max: MAX_VALUE,
            });
        }
        if self.len < 2 {
            return Err(Error::ArrayTooShort(self.len));
        }
        for (what, value) in [("len", self.len), ("queries", self.queries)] {
            if value > MAX_SIZE {
                return Err(Error::LimitExceeded {
                    what,
                    value: value as u64,
                    max: MAX_SIZE as u64,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.range_ratio) {
            return Err(Error::InvalidRatio(self.range_ratio));
        }
        Ok(())
    }
}

/// Single workload query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    /// Sum of `array[l..=r]`
    Range { l: usize, r: usize },
    /// `array[index] = value`
    Update { index: usize, value: u64 },
}

/// Generated array and query stream
#[derive(Debug, Clone)]
pub struct Workload {
    /// Initial array contents
    pub array: Vec<u64>,
    /// Queries in execution order
    pub queries: Vec<Query>,
}

impl Workload {
    /// Draw a workload from `rng`. `config` must already be validated.
    pub fn generate<R: Rng>(config: &RangeSumConfig, rng: &mut R) -> Self {
        let array = (0..config.len)
            .map(|_| rng.gen_range(1..=config.max_value))
            .collect();

        let queries = (0..config.queries)
            .map(|_| {
                if rng.gen_bool(config.range_ratio) {
                    let picked = index::sample(&mut *rng, config.len, 2);
                    let (a, b) = (picked.index(0), picked.index(1));
                    Query::Range { l: a.min(b), r: a.max(b) }
                } else {
                    Query::Update {
                        index: rng.gen_range(0..config.len),
                        value: rng.gen_range(1..=config.max_value),
                    }
                }
            })
            .collect();

        Self { array, queries }
    }

    /// Number of range queries
    pub fn ranges(&self) -> usize {
        self.queries
            .iter()
            .filter(|q| matches!(q, Query::Range { .. }))
            .count()
    }
}

/// Result of running the workload with one strategy
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Strategy name (`none`, `lru`, `splay`)
    pub strategy: &'static str,
    /// Wall time in seconds
    pub secs: f64,
    /// Wrapping sum of every range answer
    pub checksum: u64,
    /// Baseline time divided by this time
    pub speedup: f64,
    /// Memo statistics, absent for the uncached baseline
    pub stats: Option<CacheStats>,
}

/// Comparison of all strategies on one workload
#[derive(Debug, Clone, Serialize)]
pub struct RangeSumReport {
    /// Array length
    pub len: usize,
    /// Total queries
    pub queries: usize,
    /// Range queries
    pub ranges: usize,
    /// Update queries
    pub updates: usize,
    /// LRU capacity
    pub capacity: usize,
    /// Seed that reproduces the workload
    pub seed: u64,
    /// Baseline first
    pub outcomes: Vec<Outcome>,
}

fn check_range(l: usize, r: usize, len: usize) -> Result<()> {
    if l > r || r >= len {
        return Err(Error::InvalidRange { l, r, len });
    }
    Ok(())
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::IndexOutOfBounds { index, len });
    }
    Ok(())
}

/// Sum of `array[l..=r]`
pub fn range_sum(array: &[u64], l: usize, r: usize) -> Result<u64> {
    check_range(l, r, array.len())?;
    Ok(array[l..=r].iter().sum())
}

/// Run the queries recomputing every sum. Returns the checksum.
pub fn run_uncached(workload: &Workload) -> Result<u64> {
    let mut array = workload.array.clone();
    let mut checksum = 0u64;

    for query in &workload.queries {
        match *query {
            Query::Range { l, r } => {
                checksum = checksum.wrapping_add(range_sum(&array, l, r)?);
            }
            Query::Update { index, value } => {
                check_index(index, array.len())?;
                array[index] = value;
            }
        }
    }

    Ok(checksum)
}

/// Run the queries with range answers memoized in `memo`. Returns the checksum.
pub fn run_memoized<C>(workload: &Workload, memo: &mut Memo<C>) -> Result<u64>
where
    C: MemoCache<Key = (usize, usize), Value = u64>,
{
    let mut array = workload.array.clone();
    let mut checksum = 0u64;

    for query in &workload.queries {
        match *query {
            Query::Range { l, r } => {
                check_range(l, r, array.len())?;
                let sum = memo.get_or_insert_with((l, r), |_| array[l..=r].iter().sum());
                checksum = checksum.wrapping_add(sum);
            }
            Query::Update { index, value } => {
                check_index(index, array.len())?;
                array[index] = value;
                memo.invalidate();
            }
        }
    }

    Ok(checksum)
}

fn verify(strategy: &str, expected: u64, actual: u64) -> Result<()> {
    if expected != actual {
        return Err(Error::Mismatch {
            what: format!("{} checksum", strategy),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

fn memoized_outcome<C>(workload: &Workload, mut memo: Memo<C>, baseline: (u64, f64)) -> Result<Outcome>
where
    C: MemoCache<Key = (usize, usize), Value = u64>,
{
    let strategy = memo.name();
    let (checksum, secs) = timed(|| run_memoized(workload, &mut memo));
    let checksum = checksum?;
    verify(strategy, baseline.0, checksum)?;

    let speedup = if secs > 0.0 { baseline.1 / secs } else { f64::INFINITY };
    if speedup < 1.0 {
        warn!(strategy, speedup, "Cache did not beat the uncached baseline");
    }

    Ok(Outcome {
        strategy,
        secs,
        checksum,
        speedup,
        stats: Some(*memo.stats()),
    })
}

/// Generate a workload and run it with no cache, an LRU memo and a splay memo
pub fn run(config: &RangeSumConfig) -> Result<RangeSumReport> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let workload = Workload::generate(config, &mut rng);
    let ranges = workload.ranges();
    info!(
        len = config.len,
        queries = config.queries,
        ranges,
        capacity = config.capacity,
        seed,
        "Starting range-sum workload"
    );

    let (checksum, secs) = timed(|| run_uncached(&workload));
    let baseline = (checksum?, secs);

    let mut outcomes = vec![Outcome {
        strategy: "none",
        secs,
        checksum: baseline.0,
        speedup: 1.0,
        stats: None,
    }];
    outcomes.push(memoized_outcome(&workload, Memo::new(LruCache::new(config.capacity)), baseline)?);
    outcomes.push(memoized_outcome(&workload, Memo::new(SplayTree::new()), baseline)?);

    info!(checksum = baseline.0, "Range-sum workload finished");

    Ok(RangeSumReport {
        len: config.len,
        queries: config.queries,
        ranges,
        updates: config.queries - ranges,
        capacity: config.capacity,
        seed,
        outcomes,
    })
}
