//! # splaycache
//!
//! Memoization tables backed by a splay tree, with an LRU cache to compare
//! against.
//!
//! ## Architecture
//! - **SplayTree**: self-adjusting BST, recently used keys rise to the root
//!   (amortized O(log n))
//! - **LruCache**: AHash map + index-linked recency list (O(1), bounded)
//! - **Memo**: wraps either backend and tracks hit/miss statistics
//!
//! ```
//! use splaycache::{Memo, SplayTree};
//!
//! fn fib(n: u64, memo: &mut Memo<SplayTree<u64, u64>>) -> u64 {
//!     if n <= 1 {
//!         return n;
//!     }
//!     memo.get_or_insert_with(n, |m| fib(n - 1, m) + fib(n - 2, m))
//! }
//!
//! let mut memo = Memo::new(SplayTree::new());
//! assert_eq!(fib(50, &mut memo), 12_586_269_025);
//! ```

#![warn(missing_docs)]

mod lru;
mod memo;
mod splay;
mod stats;

pub use lru::LruCache;
pub use memo::{Memo, MemoCache};
pub use splay::{Iter, SplayTree};
pub use stats::CacheStats;
