//! Order type for binomial trees.
//!
//! A binomial tree of order `k` holds exactly `2ᵏ` nodes, so the largest
//! order a heap of `n` elements can ever reach is `⌊log₂(n)⌋`. A `u8` covers
//! every order a heap that fits in memory could produce, and keeps the arena
//! nodes one word smaller than a `usize` would.

/// Order of a binomial tree (the number of children of its root).
pub type Order = u8;

/// Largest representable order.
pub const MAX_ORDER: Order = u8::MAX;

/// Order of the tree produced by linking two trees of order `order`.
///
/// # Panics
///
/// Panics if `order == MAX_ORDER`. Reaching it would require a heap of
/// 2²⁵⁵ elements, so a panic here means the forest was corrupted.
///
/// # Example
///
/// ```rust
/// use priority_heaps::order::{checked_increment, Order};
///
/// let order: Order = 5;
/// assert_eq!(checked_increment(order), 6);
/// ```
#[inline]
pub fn checked_increment(order: Order) -> Order {
    order
        .checked_add(1)
        .expect("binomial tree order overflow: forest is corrupted")
}

/// Number of nodes in a binomial tree of the given order.
///
/// Returns `None` when `2^order` does not fit in a `usize`.
#[inline]
pub fn tree_size(order: Order) -> Option<usize> {
    1usize.checked_shl(u32::from(order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_increment() {
        assert_eq!(checked_increment(0), 1);
        assert_eq!(checked_increment(63), 64);
        assert_eq!(checked_increment(254), 255);
    }

    #[test]
    #[should_panic(expected = "order overflow")]
    fn test_checked_increment_overflow() {
        checked_increment(MAX_ORDER);
    }

    #[test]
    fn test_tree_size() {
        assert_eq!(tree_size(0), Some(1));
        assert_eq!(tree_size(3), Some(8));
        assert_eq!(tree_size(200), None);
        assert_eq!(std::mem::size_of::<Order>(), 1);
    }
}
