//! This is the main public API.

use crate::backtrack;
use crate::node::CompiledPattern;
use crate::parse;
use core::fmt;
use core::str::FromStr;

pub use crate::parse::{Error, ErrorKind};

/// Range is used to express the extent of a match, as indexes into the
/// input string.
pub type Range = core::ops::Range<usize>;

/// A Match represents a portion of a string which was found to match a
/// Regex.
#[derive(Debug, Clone)]
pub struct Match {
    /// The total range of the match. Note this may be empty, if the regex
    /// matched an empty string.
    pub range: Range,
    /// The capture groups. Groups which did not participate in the match
    /// report the empty range `0..0`.
    pub captures: Vec<Range>,
}

impl Match {
    /// Access a group by index. Index 0 is the total match, index 1 the
    /// first capture group.
    ///
    /// Panics if the index exceeds the pattern's capture count.
    pub fn group(&self, idx: usize) -> Range {
        if idx == 0 {
            self.range.clone()
        } else {
            self.captures[idx - 1].clone()
        }
    }

    /// Returns an iterator over the match's groups, starting with the
    /// total match.
    pub fn groups(&self) -> Groups {
        Groups::new(self)
    }

    /// Returns the range of the total match.
    pub fn range(&self) -> Range {
        self.range.clone()
    }

    /// Returns the starting index of the total match.
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// Returns the ending index of the total match.
    pub fn end(&self) -> usize {
        self.range.end
    }

    fn from_spans(spans: &[backtrack::Span]) -> Match {
        let to_range = |span: &backtrack::Span| span.start..span.start + span.len;
        Match {
            range: to_range(&spans[0]),
            captures: spans[1..].iter().map(to_range).collect(),
        }
    }
}

/// An iterator over the groups of a `Match`, starting with the total match.
#[derive(Debug, Clone)]
pub struct Groups<'m> {
    mat: &'m Match,
    idx: usize,
    max: usize,
}

impl<'m> Groups<'m> {
    fn new(mat: &'m Match) -> Self {
        Groups {
            mat,
            idx: 0,
            max: mat.captures.len() + 1,
        }
    }
}

impl<'m> Iterator for Groups<'m> {
    type Item = Range;
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.max {
            let idx = self.idx;
            self.idx += 1;
            Some(self.mat.group(idx))
        } else {
            None
        }
    }
}

/// The error returned by [`Regex::find_budgeted`] when the step budget ran
/// out before the search finished.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BudgetExceeded;

impl fmt::Display for BudgetExceeded {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("match step budget exceeded")
    }
}

impl std::error::Error for BudgetExceeded {}

/// A Regex is the compiled version of a pattern.
#[derive(Debug, Clone)]
pub struct Regex {
    cp: CompiledPattern,
}

impl Regex {
    /// Construct a regex by parsing \p pattern.
    ///
    /// An Error may be returned if the syntax is invalid.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        let cp = parse::try_parse(pattern)?;
        Ok(Regex { cp })
    }

    /// The number of capture slots, including slot 0 for the whole match.
    /// Always at least 1.
    pub fn capture_count(&self) -> usize {
        self.cp.capture_count
    }

    /// Search for the leftmost match of the regex in \p text.
    pub fn find(&self, text: &str) -> Option<Match> {
        self.find_range(text, 0, text.len())
    }

    /// Search for the leftmost match within the region of \p text between
    /// the byte offsets \p start and \p end. Anchors bind to the region:
    /// `^` matches at \p start and `$` at \p end.
    ///
    /// Panics if the offsets exceed the text length or do not fall on
    /// character boundaries. An empty region never matches.
    pub fn find_range(&self, text: &str, start: usize, end: usize) -> Option<Match> {
        backtrack::search(&self.cp, text, start, end).map(|spans| Match::from_spans(&spans))
    }

    /// As [`Regex::find`], but give up with [`BudgetExceeded`] once more
    /// than \p budget node tests have run without an answer.
    pub fn find_budgeted(&self, text: &str, budget: usize) -> Result<Option<Match>, BudgetExceeded> {
        let spans = backtrack::search_budgeted(&self.cp, text, 0, text.len(), Some(budget))?;
        Ok(spans.map(|spans| Match::from_spans(&spans)))
    }

    /// Returns an iterator over the non-overlapping matches of the regex
    /// in \p text.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        self.find_from(text, 0)
    }

    /// As find_iter, but starts at the given byte offset.
    pub fn find_from<'r, 't>(&'r self, text: &'t str, start: usize) -> Matches<'r, 't> {
        Matches {
            re: self,
            text,
            next_start: Some(start),
        }
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to parse a string into a regular expression
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// An iterator over the non-overlapping matches of a regex in a string.
#[derive(Debug, Clone)]
pub struct Matches<'r, 't> {
    re: &'r Regex,
    text: &'t str,
    next_start: Option<usize>,
}

impl<'r, 't> Iterator for Matches<'r, 't> {
    type Item = Match;
    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start?;
        let mat = self.re.find_range(self.text, start, self.text.len())?;
        // An empty match must not pin the iterator in place.
        self.next_start = if mat.range.is_empty() {
            self.text[mat.range.end..]
                .chars()
                .next()
                .map(|c| mat.range.end + c.len_utf8())
        } else {
            Some(mat.range.end)
        };
        Some(mat)
    }
}
