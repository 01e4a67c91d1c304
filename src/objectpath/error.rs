//! Error types for object path parsing and path algebra.

use std::fmt;

/// Errors that can occur while parsing a path string.
///
/// Every variant carries the 0-based character index where the problem was
/// detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character that is not allowed in the current position.
    UnexpectedCharacter {
        position: usize,
        found: char,
        expected: String,
    },
    /// Two consecutive slashes, i.e. an unquoted empty element.
    EmptyElement { position: usize },
    /// A dot segment other than `.` or `..`.
    InvalidElement { position: usize, element: String },
    /// Input ended while an element was still open.
    UnexpectedEnd { position: usize, expected: String },
}

impl ParseError {
    /// Returns the character index the error was detected at.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedCharacter { position, .. }
            | ParseError::EmptyElement { position }
            | ParseError::InvalidElement { position, .. }
            | ParseError::UnexpectedEnd { position, .. } => *position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedCharacter {
                position,
                found,
                expected,
            } => write!(
                f,
                "unexpected character '{}' at index {}: {}",
                found, position, expected
            ),
            ParseError::EmptyElement { position } => write!(
                f,
                "empty path element at index {}: empty elements must be enclosed in quotes, e.g. /\"\"/data",
                position
            ),
            ParseError::InvalidElement { position, element } => write!(
                f,
                "invalid path element '{}' at index {}: only '.' or '..' allowed",
                element, position
            ),
            ParseError::UnexpectedEnd { position, expected } => write!(
                f,
                "unexpected end of string after {} characters, expected {}",
                position, expected
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors produced by the path algebra (normalize, anchor, push/pop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// `normalize` was called on a relative path.
    RelativeNormalize,
    /// A `..` would leave the document root.
    EscapesRoot { index: usize },
    /// `to_absolute` was given a relative reference path.
    RelativeReference,
    /// A root marker found inside the element list.
    UnexpectedRoot { index: usize },
    /// A delete range outside the path.
    InvalidRange {
        index: usize,
        count: usize,
        len: usize,
    },
    /// `pop` on a path without elements.
    Empty,
    /// `join` was given an absolute path to append.
    AbsoluteJoin,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::RelativeNormalize => write!(f, "cannot normalize a relative path"),
            PathError::EscapesRoot { index } => {
                write!(f, "path escaping root at element index {}", index)
            }
            PathError::RelativeReference => {
                write!(f, "the given reference path must be absolute")
            }
            PathError::UnexpectedRoot { index } => {
                write!(f, "unexpected root element at index {}", index)
            }
            PathError::InvalidRange { index, count, len } => write!(
                f,
                "invalid range of {} element(s) at index {} for path of length {}",
                count, index, len
            ),
            PathError::Empty => write!(f, "cannot pop from empty path"),
            PathError::AbsoluteJoin => write!(f, "cannot join an absolute path"),
        }
    }
}

impl std::error::Error for PathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_for_every_variant() {
        let errors = [
            ParseError::UnexpectedCharacter {
                position: 2,
                found: '#',
                expected: String::new(),
            },
            ParseError::EmptyElement { position: 2 },
            ParseError::InvalidElement {
                position: 2,
                element: "...".to_string(),
            },
            ParseError::UnexpectedEnd {
                position: 2,
                expected: "'\"'".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(err.position(), 2);
        }
    }

    #[test]
    fn test_escape_root_message() {
        let msg = PathError::EscapesRoot { index: 0 }.to_string();
        assert!(msg.contains("path escaping root"));
    }
}
