//! Small single-function exercises, each solved more than one way.

pub mod anagram;
pub mod contains_duplicate;
pub mod k_distinct;
pub mod two_sum;
