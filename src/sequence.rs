//! Pluggable backing sequences for the binary heap family
//!
//! The binary heaps store their complete tree in a contiguous, resizable,
//! random-access sequence. This module abstracts over that sequence so the
//! heaps can use different storage strategies:
//!
//! - `Vec<T>`: Default, heap-allocated storage
//! - `SmallVec<[T; N]>`: Inline storage for the first `N` elements, useful for
//!   short-lived queues that rarely grow
//!
//! # Example
//!
//! ```rust
//! use priority_heaps::binary::BinaryHeap;
//! use priority_heaps::compare::MinComparator;
//! use smallvec::SmallVec;
//!
//! let storage: SmallVec<[u32; 8]> = SmallVec::new();
//! let mut heap = BinaryHeap::from_sequence(storage, MinComparator);
//! heap.push(4);
//! heap.push(2);
//! assert_eq!(heap.top(), Ok(&2));
//! ```

use smallvec::{Array, SmallVec};

/// Trait for backing sequences
///
/// A sequence is random-access (`as_slice`/`as_mut_slice`), back-insertable
/// (`push`) and shrinkable from the back (`pop`). Slot exchanges go through
/// the slice, so implementors only have to provide the growth operations.
pub trait Sequence<T> {
    /// Creates an empty sequence
    fn new_sequence() -> Self;

    /// Creates an empty sequence that can hold `capacity` elements without reallocating
    fn with_capacity(capacity: usize) -> Self;

    /// Number of live elements
    fn len(&self) -> usize;

    /// Returns true if there are no live elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends an element at the back
    fn push(&mut self, value: T);

    /// Removes the last element
    fn pop(&mut self) -> Option<T>;

    /// Removes every element
    fn clear(&mut self);

    /// The live elements, in storage order
    fn as_slice(&self) -> &[T];

    /// The live elements, in storage order
    fn as_mut_slice(&mut self) -> &mut [T];

    /// Moves the elements out into a `Vec`
    fn into_vec(self) -> Vec<T>;
}

impl<T> Sequence<T> for Vec<T> {
    fn new_sequence() -> Self {
        Vec::new()
    }

    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn push(&mut self, value: T) {
        Vec::push(self, value)
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        Vec::pop(self)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    fn into_vec(self) -> Vec<T> {
        self
    }
}

impl<A: Array> Sequence<A::Item> for SmallVec<A> {
    fn new_sequence() -> Self {
        SmallVec::new()
    }

    fn with_capacity(capacity: usize) -> Self {
        SmallVec::with_capacity(capacity)
    }

    #[inline]
    fn len(&self) -> usize {
        SmallVec::len(self)
    }

    #[inline]
    fn push(&mut self, value: A::Item) {
        SmallVec::push(self, value)
    }

    #[inline]
    fn pop(&mut self) -> Option<A::Item> {
        SmallVec::pop(self)
    }

    fn clear(&mut self) {
        SmallVec::clear(self)
    }

    #[inline]
    fn as_slice(&self) -> &[A::Item] {
        self
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [A::Item] {
        self
    }

    fn into_vec(self) -> Vec<A::Item> {
        SmallVec::into_vec(self)
    }
}
