//! Binary and Binomial Heaps for Rust
//!
//! This crate provides two families of comparator-ordered priority queues,
//! each in a plain and a "mutable" flavor that supports changing the
//! priority of an element that is already enqueued.
//!
//! # Features
//!
//! - **Binary Heap**: complete binary tree in a contiguous sequence; O(log n) push and pop, O(1) top
//! - **Mutable Binary Heap**: binary heap plus a value → slot index; O(log n) update / increase / decrease
//! - **Binomial Heap**: forest of binomial trees; O(log n) push, pop and merge (ripple-carry addition)
//! - **Mutable Binomial Heap**: binomial heap plus a value → node index; in-place adjustment along tree edges
//!
//! The comparator decides what "top" means: [`compare::MaxComparator`] (the
//! default) gives a max-heap, [`compare::MinComparator`] a min-heap, and any
//! `Fn(&T, &T) -> Ordering` works as well.
//!
//! # Example
//!
//! ```rust
//! use priority_heaps::binary::BinaryHeap;
//! use priority_heaps::binomial::BinomialHeap;
//!
//! let mut heap = BinaryHeap::new();
//! for v in [5, 3, 8, 1] {
//!     heap.push(v);
//! }
//! assert_eq!(heap.top(), Ok(&8));
//!
//! let mut forest = BinomialHeap::new_min();
//! forest.extend(1..=5);
//! assert_eq!(forest.pop(), Ok(1));
//! ```

pub mod binary;
pub mod binomial;
mod binomial_tree;
pub mod compare;
pub mod mutable_binary;
pub mod mutable_binomial;
pub mod order;
pub mod sequence;
pub mod traits;

// Re-export the main traits for convenience
pub use traits::{HeapError, MergeableHeap, MutablePriorityQueue, PriorityQueue};
