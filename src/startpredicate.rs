//! Deciding how to quickly find potential match start locations.

use crate::node::{GroupKind, Node};

/// A predicate on where a match can begin, decided at compile time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StartPredicate {
    /// Every match starts with this ASCII byte.
    Literal(u8),
    /// No information: try every position.
    Arbitrary,
}

/// \return the start predicate for the root alternatives \p root.
pub fn predicate_for(root: &[Vec<Node>]) -> StartPredicate {
    if root.len() != 1 {
        return StartPredicate::Arbitrary;
    }
    match first_required_char(&root[0]) {
        Some(c) if c.is_ascii() => StartPredicate::Literal(c as u8),
        _ => StartPredicate::Arbitrary,
    }
}

/// \return a character which every match of the sequence \p seq must start
/// with, if one can be deduced.
fn first_required_char(seq: &[Node]) -> Option<char> {
    match seq.first()? {
        Node::Char(c) => Some(*c),
        Node::Quantifier { quant, child } if quant.min >= 1 => match child.as_ref() {
            Node::Char(c) => Some(*c),
            _ => None,
        },
        Node::Group {
            kind: GroupKind::Capture(..),
            alternatives,
        }
        | Node::Group {
            kind: GroupKind::NonCapture,
            alternatives,
        } if alternatives.len() == 1 => first_required_char(&alternatives[0]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn pred(pattern: &str) -> StartPredicate {
        parse::try_parse(pattern).unwrap().start_pred
    }

    #[test]
    fn literal_prefixes() {
        assert_eq!(pred("hello"), StartPredicate::Literal(b'h'));
        assert_eq!(pred("a+b"), StartPredicate::Literal(b'a'));
        assert_eq!(pred("(foo)bar"), StartPredicate::Literal(b'f'));
        assert_eq!(pred("(?:xy)z"), StartPredicate::Literal(b'x'));
    }

    #[test]
    fn arbitrary_starts() {
        assert_eq!(pred("a|b"), StartPredicate::Arbitrary);
        assert_eq!(pred("a*b"), StartPredicate::Arbitrary);
        assert_eq!(pred(".x"), StartPredicate::Arbitrary);
        assert_eq!(pred("[ab]c"), StartPredicate::Arbitrary);
        assert_eq!(pred("^a"), StartPredicate::Arbitrary);
        assert_eq!(pred("°x"), StartPredicate::Arbitrary);
    }
}
