//! Find two positions whose values add up to a target.

use std::collections::HashMap;

/// Tries every ordered pair of distinct positions and returns the first hit. O(n²) time.
pub fn brute_force(nums: &[i64], target: i64) -> Option<(usize, usize)> {
    (0..nums.len())
        .flat_map(|i| (0..nums.len()).map(move |j| (i, j)))
        .find(|&(i, j)| i != j && nums[i].checked_add(nums[j]) == Some(target))
}

/// Scans once, looking up each value's complement among the values already passed. Returns the
/// current position first and the earlier one second. O(n) time, O(n) space.
pub fn hashed(nums: &[i64], target: i64) -> Option<(usize, usize)> {
    let mut seen: HashMap<i64, usize> = HashMap::with_capacity(nums.len());
    for (i, &n) in nums.iter().enumerate() {
        if let Some(&j) = target.checked_sub(n).and_then(|diff| seen.get(&diff)) {
            return Some((i, j));
        }
        seen.insert(n, i);
    }
    None
}
