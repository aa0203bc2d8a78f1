//! The pattern compiler: a recursive-descent parser producing a node tree.

use crate::charclasses;
use crate::node::{
    CaptureSlot, ClassItem, CompiledPattern, GroupKind, Node, Quantifier, Shorthand,
    MAX_CAPTURE_GROUPS,
};
use crate::startpredicate;
use core::fmt;
use core::iter::Peekable;
use core::str::Chars;

/// The reason a pattern failed to compile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A `)` with no matching `(`.
    UnexpectedCloseParen,
    /// `(?` followed by anything other than `:`, `=` or `!`.
    UnrecognisedGroupQualifier,
    /// A `[` with no closing `]`.
    UnclosedCharacterClass,
    /// A `{` bound with no closing `}`.
    UnclosedQuantifierRange,
    /// A `{...}` bound containing something other than digits and a comma.
    InvalidQuantifierRangeSyntax,
    /// A quantifier with no preceding element, or one applied to an anchor,
    /// an assertion, or another quantifier.
    ElementNotQuantifiable,
    /// A `\` escape not in the escape table.
    UnrecognisedEscape,
    /// A backreference to a capture group that does not exist yet.
    UndefinedBackreference,
    /// More than `MAX_CAPTURE_GROUPS` capturing groups.
    CaptureLimitExceeded,
}

impl ErrorKind {
    fn text(self) -> &'static str {
        match self {
            ErrorKind::UnexpectedCloseParen => "unexpected ')'",
            ErrorKind::UnrecognisedGroupQualifier => "unrecognised qualifier for parenthesis",
            ErrorKind::UnclosedCharacterClass => "unclosed character class '[]'",
            ErrorKind::UnclosedQuantifierRange => "unclosed range quantifier '{}'",
            ErrorKind::InvalidQuantifierRangeSyntax => "expected numeric digits, ',' or '}'",
            ErrorKind::ElementNotQuantifiable => "element not quantifiable",
            ErrorKind::UnrecognisedEscape => "escape token not recognised",
            ErrorKind::UndefinedBackreference => "backreference to non-existent capture",
            ErrorKind::CaptureLimitExceeded => "capture group count limit exceeded",
        }
    }
}

/// A pattern compilation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.kind.text())
    }
}

impl std::error::Error for Error {}

/// Helper to return an error of the given kind.
fn error<T>(kind: ErrorKind) -> Result<T, Error> {
    Err(Error { kind })
}

/// Compile \p pattern to its node tree.
pub fn try_parse(pattern: &str) -> Result<CompiledPattern, Error> {
    let mut parser = Parser {
        input: pattern.chars().peekable(),
        group_count: 0,
    };
    let root = parser.consume_alternatives()?;
    // consume_alternatives stops only at ')' or the end of the pattern.
    if parser.peek().is_some() {
        return error(ErrorKind::UnexpectedCloseParen);
    }
    let start_pred = startpredicate::predicate_for(&root);
    Ok(CompiledPattern {
        root,
        capture_count: parser.group_count as usize + 1,
        start_pred,
    })
}

struct Parser<'p> {
    /// The remaining pattern.
    input: Peekable<Chars<'p>>,
    /// Number of capturing groups opened so far. The whole match is slot 0,
    /// so group N writes slot N.
    group_count: CaptureSlot,
}

impl<'p> Parser<'p> {
    fn peek(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn next(&mut self) -> Option<char> {
        self.input.next()
    }

    /// Consume the given character.
    /// It is an error if it is not present.
    fn consume(&mut self, c: char) -> char {
        let nc = self.input.next();
        debug_assert!(nc == Some(c), "char was not next");
        c
    }

    /// If the given character is present, consume it and return true.
    fn try_consume(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.input.next();
            true
        } else {
            false
        }
    }

    /// A disjunction of terms, which ends at `)` or the end of the pattern.
    /// Empty alternatives are not materialized.
    fn consume_alternatives(&mut self) -> Result<Vec<Vec<Node>>, Error> {
        let mut alternatives = Vec::new();
        loop {
            let seq = self.consume_term()?;
            if !seq.is_empty() {
                alternatives.push(seq);
            }
            if !self.try_consume('|') {
                return Ok(alternatives);
            }
        }
    }

    /// One alternative: a sequence of elements, which ends at `|`, `)` or
    /// the end of the pattern.
    fn consume_term(&mut self) -> Result<Vec<Node>, Error> {
        let mut seq: Vec<Node> = Vec::new();
        loop {
            let c = match self.peek() {
                Some(c) => c,
                None => return Ok(seq),
            };
            match c {
                ')' | '|' => return Ok(seq),
                '(' => {
                    let group = self.consume_group()?;
                    seq.push(group);
                }
                '[' => {
                    let class = self.consume_class()?;
                    seq.push(class);
                }
                '^' => {
                    self.consume('^');
                    seq.push(Node::Anchor { end: false });
                }
                '$' => {
                    self.consume('$');
                    seq.push(Node::Anchor { end: true });
                }
                '.' => {
                    self.consume('.');
                    seq.push(Node::Shorthand(Shorthand::Any));
                }
                '\\' => {
                    self.consume('\\');
                    let escaped = self.consume_escape()?;
                    seq.push(escaped);
                }
                '?' | '*' | '+' | '{' => {
                    // The quantifiable check happens before the `{...}`
                    // bounds are parsed.
                    let child = match seq.pop() {
                        Some(node) if node.quantifiable() => node,
                        _ => return error(ErrorKind::ElementNotQuantifiable),
                    };
                    self.consume(c);
                    let (min, max) = match c {
                        '?' => (0, Some(1)),
                        '*' => (0, None),
                        '+' => (1, None),
                        _ => self.consume_brace_bounds()?,
                    };
                    let lazy = self.try_consume('?');
                    seq.push(Node::Quantifier {
                        quant: Quantifier { min, max, lazy },
                        child: Box::new(child),
                    });
                }
                _ => {
                    self.consume(c);
                    seq.push(Node::Char(c));
                }
            }
        }
    }

    /// A group, after its `(` has been peeked. A missing `)` is tolerated:
    /// the group then runs to the end of the pattern.
    fn consume_group(&mut self) -> Result<Node, Error> {
        self.consume('(');
        let kind = if self.try_consume('?') {
            if self.try_consume(':') {
                GroupKind::NonCapture
            } else if self.try_consume('=') {
                GroupKind::Lookahead { negated: false }
            } else if self.try_consume('!') {
                GroupKind::Lookahead { negated: true }
            } else {
                return error(ErrorKind::UnrecognisedGroupQualifier);
            }
        } else {
            if self.group_count as usize >= MAX_CAPTURE_GROUPS {
                return error(ErrorKind::CaptureLimitExceeded);
            }
            self.group_count += 1;
            GroupKind::Capture(self.group_count)
        };
        let alternatives = self.consume_alternatives()?;
        self.try_consume(')');
        Ok(Node::Group { kind, alternatives })
    }

    /// A bracket class, after its `[` has been peeked.
    fn consume_class(&mut self) -> Result<Node, Error> {
        self.consume('[');
        let negated = self.try_consume('^');
        let mut items: Vec<ClassItem> = Vec::new();
        loop {
            let c = match self.next() {
                Some(c) => c,
                None => return error(ErrorKind::UnclosedCharacterClass),
            };
            match c {
                ']' => break,
                '\\' => {
                    let e = match self.peek() {
                        Some(e) => e,
                        None => return error(ErrorKind::UnrecognisedEscape),
                    };
                    if let Some(lit) = charclasses::unescape_literal(e) {
                        self.consume(e);
                        items.push(ClassItem::Literal(lit));
                    } else if let Some(sh) = charclasses::shorthand(e) {
                        self.consume(e);
                        items.push(ClassItem::Shorthand(sh));
                    } else {
                        return error(ErrorKind::UnrecognisedEscape);
                    }
                }
                first => {
                    // A range forms only between unescaped endpoints of the
                    // same category; anything else stays literal.
                    let mut lookahead = self.input.clone();
                    if lookahead.next() == Some('-') {
                        if let Some(last) = lookahead.next() {
                            if range_endpoints(first, last) {
                                self.input = lookahead;
                                items.push(ClassItem::Range(first, last));
                                continue;
                            }
                        }
                    }
                    items.push(ClassItem::Literal(first));
                }
            }
        }
        Ok(Node::Class { negated, items })
    }

    /// The bounds of a `{...}` quantifier, after the `{` has been consumed.
    fn consume_brace_bounds(&mut self) -> Result<(usize, Option<usize>), Error> {
        let mut min: usize = 0;
        let mut max: Option<usize> = None;
        let mut max_set = false;
        loop {
            let c = match self.next() {
                Some(c) => c,
                None => return error(ErrorKind::UnclosedQuantifierRange),
            };
            match c {
                '}' => break,
                ',' => max_set = true,
                '0'..='9' => {
                    let digit = c as usize - '0' as usize;
                    if max_set {
                        max = Some(max.map_or(digit, |m| m.saturating_mul(10).saturating_add(digit)));
                    } else {
                        min = min.saturating_mul(10).saturating_add(digit);
                    }
                }
                _ => return error(ErrorKind::InvalidQuantifierRangeSyntax),
            }
        }
        if !max_set {
            max = Some(min);
        }
        Ok((min, max))
    }

    /// An escaped element outside a class, after the `\` has been consumed.
    fn consume_escape(&mut self) -> Result<Node, Error> {
        let c = match self.peek() {
            Some(c) => c,
            None => return error(ErrorKind::UnrecognisedEscape),
        };
        if let Some(lit) = charclasses::unescape_literal(c) {
            self.consume(c);
            return Ok(Node::Char(lit));
        }
        if let Some(sh) = charclasses::shorthand(c) {
            self.consume(c);
            return Ok(Node::Shorthand(sh));
        }
        match c {
            'b' => {
                self.consume('b');
                Ok(Node::WordBoundary { negated: false })
            }
            'B' => {
                self.consume('B');
                Ok(Node::WordBoundary { negated: true })
            }
            '1'..='9' => {
                self.consume(c);
                let mut slot = c as u32 - '0' as u32;
                // Two digits maximum, taken greedily.
                if let Some(d @ '0'..='9') = self.peek() {
                    self.consume(d);
                    slot = slot * 10 + (d as u32 - '0' as u32);
                }
                if slot > self.group_count as u32 {
                    return error(ErrorKind::UndefinedBackreference);
                }
                Ok(Node::BackRef(slot as CaptureSlot))
            }
            _ => error(ErrorKind::UnrecognisedEscape),
        }
    }
}

/// \return whether \p first and \p last may form a class range: both ASCII
/// uppercase, both lowercase, or both digits, in order.
fn range_endpoints(first: char, last: char) -> bool {
    if first > last {
        return false;
    }
    (first.is_ascii_uppercase() && last.is_ascii_uppercase())
        || (first.is_ascii_lowercase() && last.is_ascii_lowercase())
        || (first.is_ascii_digit() && last.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(pattern: &str) -> ErrorKind {
        try_parse(pattern).unwrap_err().kind
    }

    #[test]
    fn capture_numbering() {
        assert_eq!(try_parse("abc").unwrap().capture_count, 1);
        assert_eq!(try_parse("(a)(b)").unwrap().capture_count, 3);
        assert_eq!(try_parse("((a)(b))(c)").unwrap().capture_count, 5);
        assert_eq!(try_parse("(?:a)(b)").unwrap().capture_count, 2);
    }

    #[test]
    fn backreference_scope() {
        // A group may refer to itself once opened.
        assert!(try_parse(r"(a\1)").is_ok());
        assert_eq!(kind(r"\1"), ErrorKind::UndefinedBackreference);
        assert_eq!(kind(r"(a)\2"), ErrorKind::UndefinedBackreference);
        // Two digits parse as one reference.
        assert_eq!(kind(r"(a)\10"), ErrorKind::UndefinedBackreference);
    }

    #[test]
    fn unclosed_group_tolerated() {
        assert!(try_parse("(ab").is_ok());
        assert!(try_parse("(a(b").is_ok());
        assert_eq!(kind("a)"), ErrorKind::UnexpectedCloseParen);
        assert_eq!(kind("(a))"), ErrorKind::UnexpectedCloseParen);
    }

    #[test]
    fn brace_bounds() {
        let tree = try_parse("a{2,3}").unwrap();
        match &tree.root[0][0] {
            Node::Quantifier { quant, .. } => {
                assert_eq!(*quant, Quantifier { min: 2, max: Some(3), lazy: false });
            }
            other => panic!("unexpected node {:?}", other),
        }
        assert!(try_parse("a{2}").is_ok());
        assert!(try_parse("a{2,}").is_ok());
        assert!(try_parse("a{,2}").is_ok());
        assert_eq!(kind("a{2"), ErrorKind::UnclosedQuantifierRange);
        assert_eq!(kind("a{x}"), ErrorKind::InvalidQuantifierRangeSyntax);
    }

    #[test]
    fn quantifiable_elements() {
        assert_eq!(kind("*a"), ErrorKind::ElementNotQuantifiable);
        assert_eq!(kind("a**"), ErrorKind::ElementNotQuantifiable);
        assert_eq!(kind("^*"), ErrorKind::ElementNotQuantifiable);
        assert_eq!(kind(r"\b+"), ErrorKind::ElementNotQuantifiable);
        assert_eq!(kind("(?=a)*"), ErrorKind::ElementNotQuantifiable);
        // The check fires before the bounds are read.
        assert_eq!(kind("^{"), ErrorKind::ElementNotQuantifiable);
        assert!(try_parse("(a|b)*").is_ok());
        assert!(try_parse(r"(a)\1*").is_ok());
    }

    #[test]
    fn class_ranges() {
        let tree = try_parse("[a-c]").unwrap();
        match &tree.root[0][0] {
            Node::Class { negated, items } => {
                assert!(!negated);
                assert_eq!(items.len(), 1);
            }
            other => panic!("unexpected node {:?}", other),
        }
        // Cross-category and reversed pairs fall back to literals.
        match &try_parse("[a-Z]").unwrap().root[0][0] {
            Node::Class { items, .. } => assert_eq!(items.len(), 3),
            other => panic!("unexpected node {:?}", other),
        }
        match &try_parse("[c-a]").unwrap().root[0][0] {
            Node::Class { items, .. } => assert_eq!(items.len(), 3),
            other => panic!("unexpected node {:?}", other),
        }
        // An escaped endpoint never forms a range.
        match &try_parse(r"[\a-c]").unwrap().root[0][0] {
            Node::Class { items, .. } => assert_eq!(items.len(), 3),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn class_errors() {
        assert_eq!(kind("[abc"), ErrorKind::UnclosedCharacterClass);
        assert_eq!(kind("[^"), ErrorKind::UnclosedCharacterClass);
        assert_eq!(kind(r"[\q]"), ErrorKind::UnrecognisedEscape);
        assert_eq!(kind(r"[\b]"), ErrorKind::UnrecognisedEscape);
    }

    #[test]
    fn group_qualifiers() {
        assert!(try_parse("(?:ab)").is_ok());
        assert!(try_parse("(?=ab)").is_ok());
        assert!(try_parse("(?!ab)").is_ok());
        assert_eq!(kind("(?<=ab)"), ErrorKind::UnrecognisedGroupQualifier);
        assert_eq!(kind("(?*)"), ErrorKind::UnrecognisedGroupQualifier);
        assert_eq!(kind("(?"), ErrorKind::UnrecognisedGroupQualifier);
    }

    #[test]
    fn escapes() {
        assert!(try_parse(r"\.\*\(\)").is_ok());
        assert!(try_parse(r"\n\t\w\S").is_ok());
        assert_eq!(kind(r"\q"), ErrorKind::UnrecognisedEscape);
        assert_eq!(kind("\\"), ErrorKind::UnrecognisedEscape);
    }
}
