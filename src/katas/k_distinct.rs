//! Longest substring with at most `k` distinct characters.

use std::collections::HashMap;

/// Returns the longest substring of `s` (measured in characters) that contains at most `k`
/// distinct characters. The leftmost one wins a tie. `k == 0` yields the empty string.
///
/// ```
/// use digit_network::katas::k_distinct::longest_substring;
///
/// assert_eq!(longest_substring("eceba", 2), "ece");
/// ```
pub fn longest_substring(s: &str, k: usize) -> &str {
    if k == 0 {
        return "";
    }

    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut left = 0;
    let mut best_len = 0;
    let mut best = 0..0;

    for (right, &(offset, c)) in chars.iter().enumerate() {
        *counts.entry(c).or_insert(0) += 1;

        // Shrink from the left until the window is valid again.
        while counts.len() > k {
            let dropped = chars[left].1;
            if let Some(count) = counts.get_mut(&dropped) {
                *count -= 1;
                if *count == 0 {
                    counts.remove(&dropped);
                }
            }
            left += 1;
        }

        let window_len = right - left + 1;
        if window_len > best_len {
            best_len = window_len;
            best = chars[left].0..offset + c.len_utf8();
        }
    }

    &s[best]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn distinct(s: &str) -> usize {
        s.chars().collect::<HashSet<_>>().len()
    }

    #[test]
    fn known_answers() {
        assert_eq!(longest_substring("eceba", 2), "ece");
        assert_eq!(longest_substring("aa", 1), "aa");
        assert_eq!(longest_substring("ecebbdabrheee", 3), "ecebb");
        assert_eq!(longest_substring("ecebbdabrheee", 4), "ecebbd");
        assert_eq!(longest_substring("abc", 5), "abc");
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(longest_substring("", 3), "");
        assert_eq!(longest_substring("abc", 0), "");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(longest_substring("ééab", 1), "éé");
        assert_eq!(longest_substring("aéébc", 2), "aéé");
    }

    proptest! {
        #[test]
        fn matches_exhaustive_search(s in "[a-d]{0,12}", k in 0usize..5) {
            let result = longest_substring(&s, k);
            prop_assert!(s.contains(result));
            prop_assert!(distinct(result) <= k);

            let longest = (0..=s.len())
                .flat_map(|start| (start..=s.len()).map(move |end| (start, end)))
                .map(|(start, end)| &s[start..end])
                .filter(|candidate| distinct(candidate) <= k)
                .map(str::len)
                .max()
                .unwrap_or(0);
            prop_assert_eq!(result.len(), longest);
        }
    }
}
