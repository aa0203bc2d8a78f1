//! The compiled representation of a pattern: a tree of match nodes.

use crate::charclasses;
use crate::startpredicate::StartPredicate;

/// A capture slot index. Slot 0 always holds the whole match.
pub type CaptureSlot = u16;

/// The maximum number of capture groups supported.
pub const MAX_CAPTURE_GROUPS: usize = 65535;

/// Built-in single-character predicates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shorthand {
    /// `.` matches any character, including newlines.
    Any,
    /// `\w` / `\W`: alphanumeric or underscore.
    Word { negated: bool },
    /// `\d` / `\D`: ASCII digit.
    Digit { negated: bool },
    /// `\s` / `\S`: whitespace.
    Space { negated: bool },
}

impl Shorthand {
    pub fn matches(self, c: char) -> bool {
        match self {
            Shorthand::Any => true,
            Shorthand::Word { negated } => charclasses::is_word_char(c) != negated,
            Shorthand::Digit { negated } => charclasses::is_digit_char(c) != negated,
            Shorthand::Space { negated } => charclasses::is_space_char(c) != negated,
        }
    }
}

/// One member of a bracket character class.
#[derive(Debug, Copy, Clone)]
pub enum ClassItem {
    Literal(char),
    /// An inclusive range. Endpoints are unescaped, same-category, and
    /// ordered by construction.
    Range(char, char),
    Shorthand(Shorthand),
}

impl ClassItem {
    pub fn matches(self, c: char) -> bool {
        match self {
            ClassItem::Literal(lit) => c == lit,
            ClassItem::Range(first, last) => first <= c && c <= last,
            ClassItem::Shorthand(sh) => sh.matches(c),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// A capturing group writing to the given slot.
    Capture(CaptureSlot),
    /// A shy group `(?:...)`.
    NonCapture,
    /// A zero-width assertion `(?=...)` or `(?!...)`.
    Lookahead { negated: bool },
}

/// Repetition bounds for a quantifier. A `max` of None is unbounded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quantifier {
    pub min: usize,
    pub max: Option<usize>,
    pub lazy: bool,
}

/// A node in the compiled pattern tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// A literal character.
    Char(char),
    /// A bracket class `[...]`. A negated class matches the complement of
    /// its members; an empty class never matches, an empty negated class
    /// matches any character.
    Class { negated: bool, items: Vec<ClassItem> },
    /// A shorthand predicate outside a class, such as `.` or `\d`.
    Shorthand(Shorthand),
    /// A group holding one sequence per alternative. Empty alternatives are
    /// dropped by the compiler, so a group with no alternatives never
    /// matches.
    Group {
        kind: GroupKind,
        alternatives: Vec<Vec<Node>>,
    },
    /// A quantified child node.
    Quantifier { quant: Quantifier, child: Box<Node> },
    /// `^` or `$`, relative to the searched region.
    Anchor { end: bool },
    /// `\b` or `\B`.
    WordBoundary { negated: bool },
    /// `\1` through `\99`.
    BackRef(CaptureSlot),
}

impl Node {
    /// \return whether a quantifier may apply to this node.
    pub fn quantifiable(&self) -> bool {
        match self {
            Node::Char(..) | Node::Class { .. } | Node::Shorthand(..) | Node::BackRef(..) => true,
            Node::Group {
                kind: GroupKind::Lookahead { .. },
                ..
            } => false,
            Node::Group { .. } => true,
            Node::Quantifier { .. } | Node::Anchor { .. } | Node::WordBoundary { .. } => false,
        }
    }
}

/// A pattern compiled to its node tree.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Alternatives of the implicit root group, which is capture slot 0.
    pub root: Vec<Vec<Node>>,
    /// Number of capture slots, including slot 0. Always at least 1.
    pub capture_count: usize,
    /// Prefilter used by the leftmost search loop.
    pub start_pred: StartPredicate,
}
