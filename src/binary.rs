//! Binary Heap implementation
//!
//! A complete binary tree stored in a contiguous sequence, ordered by a
//! comparator. The children of slot `i` live at `2i + 1` and `2i + 2`, its
//! parent at `(i - 1) / 2`, so no pointers are needed.
//!
//! This heap does not support priority adjustment of enqueued values. For
//! that, use [`MutableBinaryHeap`](crate::mutable_binary::MutableBinaryHeap).
//!
//! # Time Complexity
//!
//! | Operation       | Complexity |
//! |-----------------|------------|
//! | `push`          | O(log n)   |
//! | `pop`           | O(log n)   |
//! | `top`           | O(1)       |
//! | `from_sequence` | O(n)       |
//!
//! # Example
//!
//! ```rust
//! use priority_heaps::binary::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new();
//! heap.push(5);
//! heap.push(3);
//! heap.push(8);
//! heap.push(1);
//!
//! assert_eq!(heap.top(), Ok(&8));
//! assert_eq!(heap.into_sorted_vec(), vec![8, 5, 3, 1]);
//! ```

use crate::compare::{precedes, Compare, MaxComparator, MinComparator};
use crate::sequence::Sequence;
use crate::traits::{HeapError, PriorityQueue};
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

#[inline]
pub(crate) fn parent(index: usize) -> usize {
    (index - 1) / 2
}

#[inline]
pub(crate) fn left(index: usize) -> usize {
    2 * index + 1
}

#[inline]
pub(crate) fn right(index: usize) -> usize {
    2 * index + 2
}

/// Returns true when every parent/child pair in `slots` satisfies the heap property
pub(crate) fn slots_are_heap_ordered<T, C: Compare<T>>(slots: &[T], cmp: &C) -> bool {
    (1..slots.len()).all(|i| !precedes(cmp, &slots[i], &slots[parent(i)]))
}

/// A binary heap over a pluggable [`Sequence`]
///
/// - `T`: the stored value
/// - `C`: the comparator, [`MaxComparator`] by default (greatest value on top)
/// - `S`: the backing sequence, `Vec<T>` by default
#[derive(Clone)]
pub struct BinaryHeap<T, C = MaxComparator, S = Vec<T>> {
    data: S,
    cmp: C,
    _marker: PhantomData<T>,
}

impl<T: Ord> BinaryHeap<T> {
    /// Creates an empty max-heap
    pub fn new() -> Self {
        Self::from_sequence(Vec::new(), MaxComparator)
    }

    /// Creates an empty max-heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_sequence(Vec::with_capacity(capacity), MaxComparator)
    }
}

impl<T: Ord> BinaryHeap<T, MinComparator> {
    /// Creates an empty min-heap
    pub fn new_min() -> Self {
        Self::from_sequence(Vec::new(), MinComparator)
    }
}

impl<T, C: Compare<T>> BinaryHeap<T, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self::from_sequence(Vec::new(), cmp)
    }
}

impl<T, C: Compare<T>, S: Sequence<T>> BinaryHeap<T, C, S> {
    /// Builds a heap from an arbitrary sequence in O(n)
    ///
    /// Sifts down every internal slot, last one first (Floyd's construction).
    pub fn from_sequence(data: S, cmp: C) -> Self {
        let mut heap = Self {
            data,
            cmp,
            _marker: PhantomData,
        };
        heap.rebuild();
        heap
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The comparator ordering this heap
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Inserts a value
    ///
    /// **Time Complexity**: O(log n)
    pub fn push(&mut self, value: T) {
        self.data.push(value);
        let last = self.data.len() - 1;
        self.sift_up(last);
    }

    /// Returns the top value
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn top(&self) -> Result<&T, HeapError> {
        self.data.as_slice().first().ok_or(HeapError::EmptyHeap)
    }

    /// Removes and returns the top value
    ///
    /// **Time Complexity**: O(log n)
    ///
    /// **Algorithm**:
    /// 1. Exchange the root with the last live slot
    /// 2. Shrink the sequence by one, which yields the old root
    /// 3. Sift the new root down
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyHeap);
        }

        let last = self.data.len() - 1;
        self.data.as_mut_slice().swap(0, last);
        let value = self.data.pop().ok_or(HeapError::EmptyHeap)?;

        if !self.data.is_empty() {
            self.sift_down(0);
        }

        Ok(value)
    }

    /// Begins a two-phase extraction of the top value
    ///
    /// The returned guard dereferences to the root. [`Displaced::pop`] moves
    /// the root out and restores the heap in one step. Mutating the root
    /// through the guard and then dropping it re-sifts the root instead.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    ///
    /// # Example
    ///
    /// ```rust
    /// use priority_heaps::binary::{BinaryHeap, Displaced};
    ///
    /// let mut heap: BinaryHeap<String> = ["b", "c", "a"].iter().map(|s| s.to_string()).collect();
    /// let root = heap.displace().unwrap();
    /// assert_eq!(root.as_str(), "c");
    /// assert_eq!(Displaced::pop(root), "c");
    /// assert_eq!(heap.top().map(String::as_str), Ok("b"));
    /// ```
    pub fn displace(&mut self) -> Result<Displaced<'_, T, C, S>, HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyHeap);
        }
        Ok(Displaced {
            heap: self,
            sift: false,
        })
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterates over the elements in storage order (not sorted)
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.as_slice().iter()
    }

    /// Consumes the heap, returning the elements in storage order
    pub fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }

    /// Consumes the heap, returning the elements in pop order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Ok(value) = self.pop() {
            sorted.push(value);
        }
        sorted
    }

    /// Checks the heap property over every parent/child pair
    pub fn verify_heap_property(&self) -> bool {
        slots_are_heap_ordered(self.data.as_slice(), &self.cmp)
    }

    fn rebuild(&mut self) {
        let len = self.data.len();
        for index in (0..len / 2).rev() {
            self.sift_down(index);
        }
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        let slots = self.data.as_mut_slice();
        while index > 0 {
            let up = parent(index);
            if precedes(&self.cmp, &slots[index], &slots[up]) {
                slots.swap(index, up);
                index = up;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let slots = self.data.as_mut_slice();
        let len = slots.len();
        loop {
            let (l, r) = (left(index), right(index));
            let mut best = index;

            if l < len && precedes(&self.cmp, &slots[l], &slots[best]) {
                best = l;
            }
            if r < len && precedes(&self.cmp, &slots[r], &slots[best]) {
                best = r;
            }

            if best == index {
                break;
            }
            slots.swap(index, best);
            index = best;
        }
    }
}

/// Guard over the root of a [`BinaryHeap`], returned by [`BinaryHeap::displace`]
pub struct Displaced<'a, T, C: Compare<T>, S: Sequence<T>> {
    heap: &'a mut BinaryHeap<T, C, S>,
    sift: bool,
}

impl<'a, T, C: Compare<T>, S: Sequence<T>> Displaced<'a, T, C, S> {
    /// Moves the root out of the heap and restores the heap property
    pub fn pop(mut this: Self) -> T {
        this.sift = false;
        this.heap
            .pop()
            .expect("displaced heap holds at least its root")
    }
}

impl<'a, T, C: Compare<T>, S: Sequence<T>> Deref for Displaced<'a, T, C, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.heap.data.as_slice()[0]
    }
}

impl<'a, T, C: Compare<T>, S: Sequence<T>> DerefMut for Displaced<'a, T, C, S> {
    fn deref_mut(&mut self) -> &mut T {
        self.sift = true;
        &mut self.heap.data.as_mut_slice()[0]
    }
}

impl<'a, T, C: Compare<T>, S: Sequence<T>> Drop for Displaced<'a, T, C, S> {
    fn drop(&mut self) {
        if self.sift {
            self.heap.sift_down(0);
        }
    }
}

impl<'a, T: fmt::Debug, C: Compare<T>, S: Sequence<T>> fmt::Debug for Displaced<'a, T, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Displaced").field(&**self).finish()
    }
}

impl<T, C: Compare<T>, S: Sequence<T>> PriorityQueue<T> for BinaryHeap<T, C, S> {
    fn len(&self) -> usize {
        self.len()
    }

    fn push(&mut self, value: T) -> Result<(), HeapError> {
        BinaryHeap::push(self, value);
        Ok(())
    }

    fn top(&self) -> Result<&T, HeapError> {
        BinaryHeap::top(self)
    }

    fn pop(&mut self) -> Result<T, HeapError> {
        BinaryHeap::pop(self)
    }

    fn clear(&mut self) {
        BinaryHeap::clear(self)
    }
}

impl<T, C: Compare<T> + Default, S: Sequence<T>> Default for BinaryHeap<T, C, S> {
    fn default() -> Self {
        Self::from_sequence(S::new_sequence(), C::default())
    }
}

impl<T: fmt::Debug, C, S: Sequence<T>> fmt::Debug for BinaryHeap<T, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.as_slice()).finish()
    }
}

impl<T, C: Compare<T>, S: Sequence<T>> Extend<T> for BinaryHeap<T, C, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T, C: Compare<T> + Default, S: Sequence<T>> FromIterator<T> for BinaryHeap<T, C, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut data = S::new_sequence();
        for value in iter {
            data.push(value);
        }
        Self::from_sequence(data, C::default())
    }
}
