//! Does any value appear at least twice?

use std::{collections::HashSet, hash::Hash};

/// Compares every pair. O(n²) time, O(1) space.
pub fn brute_force<T: PartialEq>(nums: &[T]) -> bool {
    nums.iter()
        .enumerate()
        .any(|(i, a)| nums[i + 1..].iter().any(|b| a == b))
}

/// Remembers every value seen so far. O(n) time, O(n) space.
pub fn hashed<T: Eq + Hash>(nums: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(nums.len());
    // insert returns false once the value is already present
    !nums.iter().all(|n| seen.insert(n))
}
