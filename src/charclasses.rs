//! Character predicates and the escape table shared by the compiler and the
//! matcher.

use crate::node::Shorthand;

/// \return the literal character for an escapable punctuation or control
/// escape, or None if \p c is not in the table.
pub fn unescape_literal(c: char) -> Option<char> {
    match c {
        '^' | '$' | '(' | ')' | '\\' | '.' | '+' | '*' | '?' | '-' => Some(c),
        'a' => Some('\x07'),
        'e' => Some('\x1b'),
        'f' => Some('\x0c'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\x0b'),
        _ => None,
    }
}

/// \return the shorthand class for an escape character like 'd' or 'W',
/// or None if \p c is not a shorthand escape.
pub fn shorthand(c: char) -> Option<Shorthand> {
    match c {
        'w' => Some(Shorthand::Word { negated: false }),
        'W' => Some(Shorthand::Word { negated: true }),
        'd' => Some(Shorthand::Digit { negated: false }),
        'D' => Some(Shorthand::Digit { negated: true }),
        's' => Some(Shorthand::Space { negated: false }),
        'S' => Some(Shorthand::Space { negated: true }),
        _ => None,
    }
}

/// \return whether \p c is a word character: alphanumeric or underscore.
pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

pub fn is_digit_char(c: char) -> bool {
    c.is_ascii_digit()
}

/// \return whether \p c is whitespace. Matches space, tab, and the newline
/// family only.
pub fn is_space_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c')
}
