//! The ordered list of test-case inputs.

use crate::consts::{MAX_TEST_CASES, MIN_TEST_CASES};

/// Between [`MIN_TEST_CASES`] and [`MAX_TEST_CASES`] input strings.
/// Edits that would leave the range are refused and return `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCases {
    inputs: Vec<String>,
}

impl TestCases {
    /// One empty test case.
    pub fn new() -> Self {
        Self {
            inputs: vec![String::new()],
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.inputs
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.inputs.get(index).map(String::as_str)
    }

    pub fn add(&mut self) -> bool {
        if self.inputs.len() >= MAX_TEST_CASES {
            return false;
        }
        self.inputs.push(String::new());
        true
    }

    pub fn remove(&mut self, index: usize) -> bool {
        if self.inputs.len() <= MIN_TEST_CASES || index >= self.inputs.len() {
            return false;
        }
        self.inputs.remove(index);
        true
    }

    pub fn set(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.inputs.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }
}

impl Default for TestCases {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_empty_case() {
        let cases = TestCases::new();
        assert_eq!(cases.as_slice(), [""]);
    }

    #[test]
    fn cannot_remove_last_case() {
        let mut cases = TestCases::new();
        assert!(!cases.remove(0));
        assert_eq!(cases.len(), 1);
    }

    #[test]
    fn cannot_exceed_max() {
        let mut cases = TestCases::new();
        for _ in 1..MAX_TEST_CASES {
            assert!(cases.add());
        }
        assert_eq!(cases.len(), MAX_TEST_CASES);
        assert!(!cases.add());
        assert_eq!(cases.len(), MAX_TEST_CASES);
    }

    #[test]
    fn remove_keeps_order() {
        let mut cases = TestCases::new();
        cases.add();
        cases.add();
        cases.set(0, "a");
        cases.set(1, "b");
        cases.set(2, "c");
        assert!(cases.remove(1));
        assert_eq!(cases.as_slice(), ["a", "c"]);
    }

    #[test]
    fn remove_out_of_range_is_refused() {
        let mut cases = TestCases::new();
        cases.add();
        assert!(!cases.remove(5));
        assert_eq!(cases.len(), 2);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut cases = TestCases::new();
        assert!(cases.set(0, "1 2"));
        assert!(cases.set(0, "3 4"));
        assert_eq!(cases.get(0), Some("3 4"));
        assert!(!cases.set(1, "nope"));
    }
}
