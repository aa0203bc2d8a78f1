#![allow(dead_code)]

use nodex::{Match, Regex};

/// A simple trait for testing a String against an expectation.
pub trait StringTestHelpers {
    /// "Fluent" style test.
    fn test_eq(&self, s: &str);
}

impl StringTestHelpers for String {
    fn test_eq(&self, rhs: &str) {
        assert_eq!(self.as_str(), rhs)
    }
}

/// Check that the given pattern fails to parse.
pub fn test_parse_fails(pattern: &str) {
    let res = Regex::new(pattern);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// The error kind the given pattern fails to compile with.
pub fn parse_error_kind(pattern: &str) -> nodex::ErrorKind {
    match Regex::new(pattern) {
        Ok(_) => panic!("Pattern should not have parsed: {}", pattern),
        Err(err) => err.kind,
    }
}

/// Format a Match by joining the total match and each capture group with
/// commas. Groups which did not participate format as empty.
pub fn format_match(mat: &Match, input: &str) -> String {
    let mut result = input[mat.range()].to_string();
    for group in 1..=mat.captures.len() {
        result.push(',');
        result.push_str(&input[mat.group(group)]);
    }
    result
}

/// Find the first match of \p pattern in \p input and format it; panics
/// if the pattern does not compile or does not match.
pub fn find_fmt(pattern: &str, input: &str) -> String {
    let re = Regex::new(pattern).expect("Pattern should have parsed");
    let mat = re.find(input).expect("Pattern should have matched");
    format_match(&mat, input)
}

/// \return whether \p pattern matches \p input anywhere.
pub fn matches(pattern: &str, input: &str) -> bool {
    let re = Regex::new(pattern).expect("Pattern should have parsed");
    re.find(input).is_some()
}
