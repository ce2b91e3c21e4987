//! Common traits for heap data structures
//!
//! This module provides a small trait hierarchy shared by the four heaps in
//! this crate:
//!
//! - [`PriorityQueue`]: push / pop / top on any heap
//! - [`MutablePriorityQueue`]: in-place priority adjustment of an enqueued value
//! - [`MergeableHeap`]: destructive merge of two heaps of the same type
//!
//! Every heap is ordered by a comparator (see [`crate::compare`]) rather than by
//! a separate priority field: the value that no other value compares greater
//! than sits at the top.

use thiserror::Error;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `top`, `pop` or `displace` was called on a heap holding no elements
    #[error("heap is empty")]
    EmptyHeap,
    /// The value is not present in the heap's index
    #[error("value is not present in the heap")]
    NotFound,
    /// `increase` or `decrease` was called but the value moved the other way
    #[error("priority moved in the opposite direction of the requested adjustment")]
    MisdirectedAdjustment,
    /// A mutable heap was asked to index a value it already holds
    #[error("value is already present in the heap")]
    DuplicateValue,
}

/// Base trait for priority queues
///
/// `push` is fallible only for the mutable heaps, which reject values that
/// are already indexed. The plain heaps always return `Ok(())`.
///
/// # Example
///
/// ```rust
/// use priority_heaps::PriorityQueue;
/// use priority_heaps::binary::BinaryHeap;
///
/// let mut heap = BinaryHeap::new();
/// PriorityQueue::push(&mut heap, 3).unwrap();
/// PriorityQueue::push(&mut heap, 7).unwrap();
///
/// assert_eq!(heap.top(), Ok(&7));
/// assert_eq!(PriorityQueue::pop(&mut heap), Ok(7));
/// ```
pub trait PriorityQueue<T> {
    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a value
    fn push(&mut self, value: T) -> Result<(), HeapError>;

    /// Returns the top value without removing it
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    fn top(&self) -> Result<&T, HeapError>;

    /// Removes and returns the top value
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    fn pop(&mut self) -> Result<T, HeapError>;

    /// Removes every element
    fn clear(&mut self);
}

/// Priority queue whose elements can be re-prioritized in place
///
/// The priority of a value is whatever the comparator observes. When that
/// changes (typically because the comparator reads external state, such as a
/// distance table), the caller reports it with one of the adjustment methods.
///
/// # Example
///
/// ```rust
/// use priority_heaps::{MutablePriorityQueue, PriorityQueue};
/// use priority_heaps::compare::KeyComparator;
/// use priority_heaps::mutable_binary::MutableBinaryHeap;
/// use std::cell::RefCell;
/// use std::collections::HashMap;
/// use std::rc::Rc;
///
/// let dist = Rc::new(RefCell::new(HashMap::from([('a', 5), ('b', 3)])));
/// let lookup = Rc::clone(&dist);
/// let mut heap = MutableBinaryHeap::with_comparator(KeyComparator(move |v: &char| {
///     std::cmp::Reverse(lookup.borrow()[v])
/// }));
/// heap.push('a').unwrap();
/// heap.push('b').unwrap();
/// assert_eq!(heap.top(), Ok(&'b'));
///
/// dist.borrow_mut().insert('a', 1);
/// heap.update(&'a').unwrap();
/// assert_eq!(heap.top(), Ok(&'a'));
/// ```
pub trait MutablePriorityQueue<T>: PriorityQueue<T> {
    /// Returns true if the value is currently enqueued
    fn contains(&self, value: &T) -> bool;

    /// Restores heap order after the value's priority changed in either direction
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued.
    fn update(&mut self, value: &T) -> Result<(), HeapError>;

    /// Restores heap order after the value moved toward the top
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued,
    /// [`HeapError::MisdirectedAdjustment`] if it actually moved away from the top.
    /// The heap is repaired before the error is returned.
    fn increase(&mut self, value: &T) -> Result<(), HeapError>;

    /// Restores heap order after the value moved away from the top
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued,
    /// [`HeapError::MisdirectedAdjustment`] if it actually moved toward the top.
    /// The heap is repaired before the error is returned.
    fn decrease(&mut self, value: &T) -> Result<(), HeapError>;
}

/// Heaps that can absorb another heap of the same type
pub trait MergeableHeap<T>: PriorityQueue<T> {
    /// Moves every element of `other` into `self`, leaving `other` empty
    ///
    /// # Time Complexity
    /// O(log n) forest combination for the binomial heaps, plus relocating
    /// the nodes of the smaller heap.
    fn merge(&mut self, other: &mut Self) -> Result<(), HeapError>;
}
