//! The backtracking tree-walking matcher.
//!
//! Matching walks the node tree with an explicit continuation: each node
//! tests itself at a position and, on success, hands the advanced position
//! to the rest of its sequence. When a sequence runs out, the chain of
//! enclosing `Cont` frames takes over, closing capture slots and resuming
//! the enclosing sequences. The outcome of every test is threaded back as
//! a tri-state `Outcome` so an inner node can finish the whole match (for
//! example a greedy quantifier whose continuation reached the end of the
//! pattern) without unwinding through every frame.

use crate::api::BudgetExceeded;
use crate::charclasses;
use crate::node::{CompiledPattern, GroupKind, Node, Quantifier};
use crate::startpredicate::StartPredicate;

/// A capture slot value: start offset and length, in bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub const EMPTY: Span = Span { start: 0, len: 0 };
}

/// The result of testing a node or sequence at a position.
#[derive(Debug, Copy, Clone)]
enum Outcome {
    /// No match here; the caller should try its next candidate.
    Fail,
    /// The tested sequence matched up to this position; the continuation
    /// has not run yet.
    Partial(usize),
    /// The entire remaining pattern matched, ending at this position.
    Complete(usize),
}

/// One frame of the continuation: what remains to be matched after the
/// sequence currently being tested.
struct Cont<'a> {
    /// Capture slot to close when this frame is reached, for group frames.
    close_slot: Option<u16>,
    /// The rest of the enclosing sequence.
    rest: &'a [Node],
    /// The frame after that.
    up: Option<&'a Cont<'a>>,
}

/// Search \p text between \p start and \p end for the leftmost match of
/// \p re. On success the capture buffer is returned; slot 0 is the whole
/// match.
pub fn search(re: &CompiledPattern, text: &str, start: usize, end: usize) -> Option<Vec<Span>> {
    // A search without a budget cannot exhaust one.
    match search_budgeted(re, text, start, end, None) {
        Ok(found) => found,
        Err(BudgetExceeded) => None,
    }
}

/// As `search`, but give up with `BudgetExceeded` once more than `budget`
/// node tests have run.
pub fn search_budgeted(
    re: &CompiledPattern,
    text: &str,
    start: usize,
    end: usize,
    budget: Option<usize>,
) -> Result<Option<Vec<Span>>, BudgetExceeded> {
    let mut attempter = MatchAttempter {
        text,
        start,
        end,
        captures: vec![Span::EMPTY; re.capture_count],
        budget,
        exhausted: false,
    };
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < end {
        if let StartPredicate::Literal(byte) = re.start_pred {
            match memchr::memchr(byte, &bytes[pos..end]) {
                Some(offset) => pos += offset,
                None => break,
            }
        }
        for slot in attempter.captures.iter_mut() {
            *slot = Span::EMPTY;
        }
        let found = attempter.try_at(re, pos);
        if attempter.exhausted {
            return Err(BudgetExceeded);
        }
        if found {
            return Ok(Some(attempter.captures));
        }
        match text[pos..end].chars().next() {
            Some(c) => pos += c.len_utf8(),
            None => break,
        }
    }
    Ok(None)
}

/// A single search over a region of text, holding the capture buffer and
/// the remaining step budget.
struct MatchAttempter<'t> {
    text: &'t str,
    /// Region bounds. `^` and `$` anchor to these, not to the whole text.
    start: usize,
    end: usize,
    captures: Vec<Span>,
    budget: Option<usize>,
    exhausted: bool,
}

impl<'t> MatchAttempter<'t> {
    /// Attempt the root group at \p pos.
    fn try_at(&mut self, re: &CompiledPattern, pos: usize) -> bool {
        self.captures[0].start = pos;
        for alt in &re.root {
            match self.test_seq(alt, pos, None) {
                Outcome::Fail => {}
                // The root is not a continuation frame, so slot 0 closes
                // here for both outcomes.
                Outcome::Partial(p) | Outcome::Complete(p) => {
                    self.captures[0].len = p - pos;
                    return true;
                }
            }
        }
        false
    }

    fn test_seq(&mut self, nodes: &[Node], pos: usize, cont: Option<&Cont>) -> Outcome {
        match nodes.split_first() {
            None => Outcome::Partial(pos),
            Some((node, rest)) => self.test_node(node, rest, pos, cont),
        }
    }

    fn test_node(&mut self, node: &Node, rest: &[Node], pos: usize, cont: Option<&Cont>) -> Outcome {
        if !self.take_step() {
            return Outcome::Fail;
        }
        match node {
            Node::Char(expected) => match self.char_at(pos) {
                Some(c) if c == *expected => self.test_seq(rest, pos + c.len_utf8(), cont),
                _ => Outcome::Fail,
            },
            Node::Shorthand(sh) => match self.char_at(pos) {
                Some(c) if sh.matches(c) => self.test_seq(rest, pos + c.len_utf8(), cont),
                _ => Outcome::Fail,
            },
            Node::Class { negated, items } => match self.char_at(pos) {
                Some(c) if items.iter().any(|item| item.matches(c)) != *negated => {
                    self.test_seq(rest, pos + c.len_utf8(), cont)
                }
                _ => Outcome::Fail,
            },
            Node::Anchor { end } => {
                let here = if *end { pos == self.end } else { pos == self.start };
                if here {
                    self.test_seq(rest, pos, cont)
                } else {
                    Outcome::Fail
                }
            }
            Node::WordBoundary { negated } => {
                let before = self
                    .char_before(pos)
                    .map_or(false, charclasses::is_word_char);
                let after = self.char_at(pos).map_or(false, charclasses::is_word_char);
                if (before != after) != *negated {
                    self.test_seq(rest, pos, cont)
                } else {
                    Outcome::Fail
                }
            }
            Node::BackRef(slot) => {
                let captured = self.captures[*slot as usize];
                if pos + captured.len > self.end {
                    return Outcome::Fail;
                }
                let bytes = self.text.as_bytes();
                if bytes[pos..pos + captured.len]
                    != bytes[captured.start..captured.start + captured.len]
                {
                    return Outcome::Fail;
                }
                self.test_seq(rest, pos + captured.len, cont)
            }
            Node::Group { kind, alternatives } => {
                self.test_group(*kind, alternatives, rest, pos, cont)
            }
            Node::Quantifier { quant, child } => self.test_quantifier(*quant, child, rest, pos, cont),
        }
    }

    fn test_group(
        &mut self,
        kind: GroupKind,
        alternatives: &[Vec<Node>],
        rest: &[Node],
        pos: usize,
        cont: Option<&Cont>,
    ) -> Outcome {
        if let GroupKind::Lookahead { negated } = kind {
            // The contents run as an isolated sub-match: a quantifier
            // inside the assertion cannot complete past its boundary.
            let saved = self.captures.clone();
            let mut matched = false;
            for alt in alternatives {
                if !matches!(self.test_seq(alt, pos, None), Outcome::Fail) {
                    matched = true;
                    break;
                }
            }
            // Captures written inside survive a positive assertion only.
            if !matched || negated {
                self.captures = saved;
            }
            if matched == negated {
                return Outcome::Fail;
            }
            return self.test_seq(rest, pos, cont);
        }
        let slot = match kind {
            GroupKind::Capture(slot) => Some(slot),
            _ => None,
        };
        if let Some(slot) = slot {
            self.captures[slot as usize].start = pos;
        }
        let inner = Cont {
            close_slot: slot,
            rest,
            up: cont,
        };
        for alt in alternatives {
            match self.test_seq(alt, pos, Some(&inner)) {
                Outcome::Fail => {}
                Outcome::Complete(p) => return Outcome::Complete(p),
                // The first locally matching alternative commits: if the
                // rest of the pattern now fails, later alternatives are
                // not tried.
                Outcome::Partial(p) => {
                    if let Some(slot) = slot {
                        self.captures[slot as usize].len = p - pos;
                    }
                    return self.test_seq(rest, p, cont);
                }
            }
        }
        Outcome::Fail
    }

    fn test_quantifier(
        &mut self,
        quant: Quantifier,
        child: &Node,
        rest: &[Node],
        pos: usize,
        cont: Option<&Cont>,
    ) -> Outcome {
        // The child sees the rest of the sequence (and everything above it)
        // as its continuation, so a completion inside the child finishes
        // the whole match.
        let child_cont = Cont {
            close_slot: None,
            rest,
            up: cont,
        };
        // End positions of achieved repetitions; the base entry is the
        // entry position, so reps == ends.len() - 1.
        let mut ends: Vec<usize> = vec![pos];
        loop {
            let reps = ends.len() - 1;
            let here = ends[reps];
            if quant.lazy && reps >= quant.min {
                if let Outcome::Complete(p) = self.try_continuation(rest, here, cont) {
                    return Outcome::Complete(p);
                }
            }
            if quant.max.map_or(false, |max| reps >= max) {
                break;
            }
            match self.test_node(child, &[], here, Some(&child_cont)) {
                Outcome::Complete(p) => return Outcome::Complete(p),
                Outcome::Partial(p) if p > here => ends.push(p),
                // Failure, or a zero-width repetition which would never
                // terminate.
                _ => break,
            }
        }
        if !quant.lazy {
            // Unwind from the longest extent, dropping one repetition at a
            // time down to the minimum.
            while ends.len() > quant.min {
                let here = ends[ends.len() - 1];
                if let Outcome::Complete(p) = self.try_continuation(rest, here, cont) {
                    return Outcome::Complete(p);
                }
                ends.pop();
            }
        }
        Outcome::Fail
    }

    /// Test the rest of the sequence and, if it runs out, the continuation
    /// frames above it. Anything short of a full match is a failure for
    /// the caller's purposes.
    fn try_continuation(&mut self, rest: &[Node], pos: usize, cont: Option<&Cont>) -> Outcome {
        match self.test_seq(rest, pos, cont) {
            Outcome::Fail => Outcome::Fail,
            Outcome::Complete(p) => Outcome::Complete(p),
            Outcome::Partial(p) => self.run_cont(cont, p),
        }
    }

    /// Run the continuation frames at \p pos: close each frame's capture
    /// slot and test its remaining sequence. Running out of frames means
    /// the whole pattern has matched.
    fn run_cont<'a>(&mut self, mut cont: Option<&'a Cont<'a>>, mut pos: usize) -> Outcome {
        while let Some(frame) = cont {
            if let Some(slot) = frame.close_slot {
                let span = &mut self.captures[slot as usize];
                span.len = pos - span.start;
            }
            match self.test_seq(frame.rest, pos, frame.up) {
                Outcome::Fail => return Outcome::Fail,
                Outcome::Complete(p) => return Outcome::Complete(p),
                Outcome::Partial(p) => {
                    pos = p;
                    cont = frame.up;
                }
            }
        }
        Outcome::Complete(pos)
    }

    /// Spend one budget step. \return false once the budget is exhausted,
    /// which makes every pending test fail fast.
    fn take_step(&mut self) -> bool {
        match self.budget {
            None => true,
            Some(0) => {
                self.exhausted = true;
                false
            }
            Some(ref mut remaining) => {
                *remaining -= 1;
                true
            }
        }
    }

    /// The character at \p pos, or None at the region end.
    fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.end {
            None
        } else {
            self.text[pos..self.end].chars().next()
        }
    }

    /// The character ending at \p pos, or None at the region start.
    fn char_before(&self, pos: usize) -> Option<char> {
        if pos <= self.start {
            None
        } else {
            self.text[self.start..pos].chars().next_back()
        }
    }
}
