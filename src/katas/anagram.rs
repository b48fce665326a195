//! Is `t` a rearrangement of the characters of `s`?
//!
//! Every approach treats an empty string as never being an anagram, and compares lengths in
//! characters before doing any other work.

use std::collections::HashMap;

/// Sort both strings and compare. O(n log n) time.
pub fn sorted(s: &str, t: &str) -> bool {
    if !comparable(s, t) {
        return false;
    }
    let mut s: Vec<char> = s.chars().collect();
    let mut t: Vec<char> = t.chars().collect();
    s.sort_unstable();
    t.sort_unstable();
    s == t
}

/// Count the characters of `s`, then use them up with the characters of `t`. O(n) time, space
/// bounded by the alphabet.
pub fn counted(s: &str, t: &str) -> bool {
    if !comparable(s, t) {
        return false;
    }
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    for c in t.chars() {
        match counts.get_mut(&c) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    counts.values().all(|&count| count == 0)
}

/// Walk both strings together in one map, counting up for `s` and down for `t`.
pub fn single_pass(s: &str, t: &str) -> bool {
    if !comparable(s, t) {
        return false;
    }
    let mut balance: HashMap<char, i64> = HashMap::new();
    for (a, b) in s.chars().zip(t.chars()) {
        *balance.entry(a).or_insert(0) += 1;
        *balance.entry(b).or_insert(0) -= 1;
    }
    balance.values().all(|&count| count == 0)
}

fn comparable(s: &str, t: &str) -> bool {
    !s.is_empty() && !t.is_empty() && s.chars().count() == t.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const APPROACHES: [fn(&str, &str) -> bool; 3] = [sorted, counted, single_pass];

    #[test]
    fn recognises_anagrams() {
        for approach in APPROACHES {
            assert!(approach("anagram", "gnarama"));
            assert!(approach("listen", "silent"));
            assert!(approach("çava", "avaç"));
        }
    }

    #[test]
    fn rejects_non_anagrams() {
        for approach in APPROACHES {
            assert!(!approach("car", "tac"));
            assert!(!approach("aab", "abb"));
            assert!(!approach("ab", "abc"));
        }
    }

    #[test]
    fn empty_strings_are_never_anagrams() {
        for approach in APPROACHES {
            assert!(!approach("", ""));
            assert!(!approach("a", ""));
        }
    }

    proptest! {
        #[test]
        fn approaches_agree(s in "[a-d]{0,8}", t in "[a-d]{0,8}") {
            let expected = sorted(&s, &t);
            prop_assert_eq!(counted(&s, &t), expected);
            prop_assert_eq!(single_pass(&s, &t), expected);
        }

        #[test]
        fn reversal_is_an_anagram(s in "[a-z]{1,12}") {
            let reversed: String = s.chars().rev().collect();
            for approach in APPROACHES {
                prop_assert!(approach(&s, &reversed));
            }
        }
    }
}
