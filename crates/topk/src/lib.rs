//! # Wordrank Top-K
//!
//! A key-ordered set that keeps at most `capacity` entries by evicting the
//! smallest key after every insert.
//!
//! ## Example
//!
//! ```
//! use wordrank_topk::{Direction, InsertOutcome, OrderedTopK};
//!
//! let mut top = OrderedTopK::bounded(2);
//! top.insert(1000, "the");
//! top.insert(50, "cat");
//! assert!(matches!(top.insert(50, "dog"), InsertOutcome::Collided("dog")));
//! assert_eq!(top.into_sorted_vec(Direction::Descending), vec!["the", "cat"]);
//! ```

mod ordered;

pub use ordered::{Direction, InsertOutcome, OrderedTopK};
