//! Single segments of an [`ObjectPath`](super::ObjectPath).

use std::fmt;

/// The role an [`Element`] plays inside a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A named key or field (`foo`, `"foo bar"`, `""`).
    Identifier,
    /// `.` - refers to the current node, no effect on navigation.
    SelfReference,
    /// `..` - refers to the parent node.
    ParentReference,
    /// The document root. Only used transiently while parsing.
    Root,
}

/// One path segment: a name plus its kind.
///
/// Elements are immutable values; two elements are equal when both the name
/// and the kind are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    name: String,
    kind: ElementKind,
}

impl Element {
    /// Creates an identifier element. The name may be empty.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Identifier,
        }
    }

    /// The `.` element.
    pub fn self_reference() -> Self {
        Self {
            name: ".".to_string(),
            kind: ElementKind::SelfReference,
        }
    }

    /// The `..` element.
    pub fn parent_reference() -> Self {
        Self {
            name: "..".to_string(),
            kind: ElementKind::ParentReference,
        }
    }

    /// The root marker.
    pub fn root() -> Self {
        Self {
            name: String::new(),
            kind: ElementKind::Root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == ElementKind::Identifier
    }

    pub fn is_self_reference(&self) -> bool {
        self.kind == ElementKind::SelfReference
    }

    pub fn is_parent_reference(&self) -> bool {
        self.kind == ElementKind::ParentReference
    }

    pub fn is_root(&self) -> bool {
        self.kind == ElementKind::Root
    }
}

impl fmt::Display for Element {
    /// Renders the element the way the parser accepts it back.
    ///
    /// Identifiers are always quoted, with `"` and `\` escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ElementKind::Identifier => {
                f.write_str("\"")?;
                for ch in self.name.chars() {
                    if ch == '"' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                f.write_str("\"")
            }
            ElementKind::SelfReference | ElementKind::ParentReference => {
                f.write_str(&self.name)
            }
            ElementKind::Root => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_display_is_quoted() {
        assert_eq!(Element::identifier("foo").to_string(), "\"foo\"");
        assert_eq!(Element::identifier("").to_string(), "\"\"");
    }

    #[test]
    fn test_identifier_display_escapes_quotes() {
        assert_eq!(Element::identifier("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(Element::identifier("a\\b").to_string(), r#""a\\b""#);
    }

    #[test]
    fn test_reference_display() {
        assert_eq!(Element::self_reference().to_string(), ".");
        assert_eq!(Element::parent_reference().to_string(), "..");
    }

    #[test]
    fn test_equality_includes_kind() {
        assert_ne!(Element::identifier(".."), Element::parent_reference());
        assert_eq!(Element::identifier("a"), Element::identifier("a"));
    }
}
