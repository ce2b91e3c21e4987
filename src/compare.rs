//! Comparators that decide what sits at the top of a heap
//!
//! Every heap in this crate is parameterized by a [`Compare`] implementation
//! that must be a strict weak order. The heap keeps the element that no other
//! element compares greater than at the top, so the natural order
//! ([`MaxComparator`]) yields a max-heap, just like
//! `std::collections::BinaryHeap`, and [`MinComparator`] yields a min-heap.
//!
//! Plain closures `Fn(&T, &T) -> Ordering` implement [`Compare`] through the
//! `compare` crate; [`FnComparator`] and [`KeyComparator`] exist so that a
//! comparator can be named in a type signature.

use std::cmp::Ordering;

pub use compare::Compare;

/// Natural ordering; the greatest element is on top
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct MaxComparator;

impl<T: Ord> Compare<T> for MaxComparator {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Reversed natural ordering; the least element is on top
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct MinComparator;

impl<T: Ord> Compare<T> for MinComparator {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}

/// Wraps an `Fn(&T, &T) -> Ordering`
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct FnComparator<F>(pub F);

impl<T, F> Compare<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

/// Orders elements by a derived key; the greatest key is on top
///
/// Wrap the key in `std::cmp::Reverse` for least-key-first behavior.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct KeyComparator<F>(pub F);

impl<K: Ord, T, F> Compare<T> for KeyComparator<F>
where
    F: Fn(&T) -> K,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}

/// Returns true when `a` must sit strictly above `b`
///
/// This is `comp(b, a)`: `b` orders before `a`, so `a` wins.
#[inline]
pub fn precedes<T, C: Compare<T> + ?Sized>(cmp: &C, a: &T, b: &T) -> bool {
    cmp.compare(b, a) == Ordering::Less
}
