//! The [`ObjectPath`] value type and its algebra.

use std::fmt;
use std::str::FromStr;

use super::element::{Element, ElementKind};
use super::error::{ParseError, PathError};
use super::parser::Parser;

/// An ordered list of [`Element`]s, either absolute (anchored at the document
/// root) or relative.
///
/// An absolute path never stores the root marker itself; it is folded into the
/// `absolute` flag. All fallible operations leave the path untouched on error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ObjectPath {
    elements: Vec<Element>,
    absolute: bool,
}

impl ObjectPath {
    /// Parses a path string. See the [module docs](super) for the grammar.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Parser::parse(input)
    }

    pub(crate) fn from_elements(elements: Vec<Element>, absolute: bool) -> Self {
        Self { elements, absolute }
    }

    /// The absolute path with no elements, i.e. the document root.
    pub fn root() -> Self {
        Self::from_elements(Vec::new(), true)
    }

    /// A relative path consisting of a single `.` element.
    pub fn self_reference() -> Self {
        Self::from_elements(vec![Element::self_reference()], false)
    }

    /// Builds a path of identifier elements.
    ///
    /// ```
    /// use polydecode::objectpath::ObjectPath;
    ///
    /// let path = ObjectPath::from_names(["payload", "type"], true);
    /// assert_eq!(path.to_string(), r#"/"payload"/"type""#);
    /// ```
    pub fn from_names<I, S>(names: I, absolute: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_elements(names.into_iter().map(Element::identifier).collect(), absolute)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_relative(&self) -> bool {
        !self.absolute
    }

    /// Returns true when only identifier elements remain.
    pub fn is_normalized(&self) -> bool {
        self.elements.iter().all(Element::is_identifier)
    }

    /// Resolves `.` and `..` elements of an absolute path in place.
    ///
    /// A `..` removes itself and the element before it; with nothing before
    /// it the path would escape the root and the call fails. Error indices
    /// refer to the path as it was before the call.
    pub fn normalize(&mut self) -> Result<(), PathError> {
        if self.is_relative() {
            return Err(PathError::RelativeNormalize);
        }

        let mut kept: Vec<Element> = Vec::with_capacity(self.len());
        for (index, element) in self.elements.iter().enumerate() {
            match element.kind() {
                ElementKind::Identifier => kept.push(element.clone()),
                ElementKind::SelfReference => {}
                ElementKind::ParentReference => {
                    if kept.pop().is_none() {
                        return Err(PathError::EscapesRoot { index });
                    }
                }
                ElementKind::Root => return Err(PathError::UnexpectedRoot { index }),
            }
        }

        self.elements = kept;
        Ok(())
    }

    /// Returns a normalized copy of this path.
    pub fn normalized(&self) -> Result<Self, PathError> {
        let mut path = self.clone();
        path.normalize()?;
        Ok(path)
    }

    /// Anchors a relative path at `reference` and normalizes the result.
    ///
    /// Absolute paths are left as they are.
    pub fn to_absolute(&mut self, reference: &ObjectPath) -> Result<(), PathError> {
        if self.is_absolute() {
            return Ok(());
        }
        if reference.is_relative() {
            return Err(PathError::RelativeReference);
        }

        let mut elements = reference.elements.clone();
        elements.extend(self.elements.iter().cloned());
        let mut anchored = ObjectPath::from_elements(elements, true);
        anchored.normalize()?;

        *self = anchored;
        Ok(())
    }

    /// Non-mutating variant of [`to_absolute`](Self::to_absolute).
    pub fn anchored_at(&self, reference: &ObjectPath) -> Result<Self, PathError> {
        let mut path = self.clone();
        path.to_absolute(reference)?;
        Ok(path)
    }

    /// Appends an element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Result<Element, PathError> {
        self.elements.pop().ok_or(PathError::Empty)
    }

    pub fn last(&self) -> Option<&Element> {
        self.elements.last()
    }

    /// Removes `count` elements starting at `index`.
    pub fn delete_range(&mut self, index: usize, count: usize) -> Result<(), PathError> {
        let len = self.elements.len();
        match index.checked_add(count) {
            Some(end) if end <= len => {
                self.elements.drain(index..end);
                Ok(())
            }
            _ => Err(PathError::InvalidRange { index, count, len }),
        }
    }

    /// Returns a new path with `other` appended to this one.
    ///
    /// `other` must be relative; its elements are taken as they are.
    pub fn join(&self, other: &ObjectPath) -> Result<Self, PathError> {
        if other.is_absolute() {
            return Err(PathError::AbsoluteJoin);
        }
        let mut elements = self.elements.clone();
        elements.extend(other.elements.iter().cloned());
        Ok(Self::from_elements(elements, self.absolute))
    }
}

impl fmt::Display for ObjectPath {
    /// Canonical rendering; parsing it yields an equal path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        }
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

impl FromStr for ObjectPath {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectPath::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> ObjectPath {
        ObjectPath::parse(s).unwrap()
    }

    #[test]
    fn test_relative_is_complement_of_absolute() {
        assert!(path("/a").is_absolute());
        assert!(!path("/a").is_relative());
        assert!(path("a").is_relative());
    }

    #[test]
    fn test_normalize_parent() {
        let mut p = path("/a/b/..");
        p.normalize().unwrap();
        assert_eq!(p, path("/a"));
    }

    #[test]
    fn test_normalize_self_references() {
        let mut p = path("/./a/./b/.");
        p.normalize().unwrap();
        assert_eq!(p, path("/a/b"));
    }

    #[test]
    fn test_normalize_cascading_parents() {
        let mut p = path("/a/b/../../c");
        p.normalize().unwrap();
        assert_eq!(p, path("/c"));
    }

    #[test]
    fn test_normalize_relative_fails() {
        let mut p = path("a/..");
        assert_eq!(p.normalize(), Err(PathError::RelativeNormalize));
        assert_eq!(p, path("a/.."));
    }

    #[test]
    fn test_normalize_escaping_root_fails() {
        let mut p = path("/..");
        assert_eq!(p.normalize(), Err(PathError::EscapesRoot { index: 0 }));

        let mut p = path("/a/./b/../../../c");
        assert_eq!(p.normalize(), Err(PathError::EscapesRoot { index: 5 }));

        let mut p = path("/a/../..");
        let err = p.normalize().unwrap_err();
        assert_eq!(err, PathError::EscapesRoot { index: 2 });
        assert!(err.to_string().contains("path escaping root at element index 2"));
        // unchanged on error
        assert_eq!(p, path("/a/../.."));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["/a/./b/../c", "/", "/x/y/z/../../w", "/\"\"/./.."] {
            let once = path(s).normalized().unwrap();
            let twice = once.normalized().unwrap();
            assert_eq!(once, twice, "{}", s);
        }
    }

    #[test]
    fn test_to_absolute() {
        let mut p = path("../type");
        p.to_absolute(&path("/payload/body")).unwrap();
        assert_eq!(p, path("/payload/type"));
    }

    #[test]
    fn test_to_absolute_keeps_absolute_paths() {
        let mut p = path("/specifics/type");
        p.to_absolute(&path("/other")).unwrap();
        assert_eq!(p, path("/specifics/type"));
    }

    #[test]
    fn test_to_absolute_requires_absolute_reference() {
        let mut p = path("type");
        assert_eq!(
            p.to_absolute(&path("payload")),
            Err(PathError::RelativeReference)
        );
        assert_eq!(p, path("type"));
    }

    #[test]
    fn test_to_absolute_escaping_root_fails() {
        let mut p = path("../../type");
        assert!(p.to_absolute(&path("/payload")).is_err());
        assert!(p.is_relative());
    }

    #[test]
    fn test_render() {
        assert_eq!(path("/foo/bar").to_string(), r#"/"foo"/"bar""#);
        assert_eq!(path("./foo/..").to_string(), r#"./"foo"/.."#);
        assert_eq!(path("").to_string(), "");
        assert_eq!(path("/").to_string(), "/");
    }

    #[test]
    fn test_render_round_trip() {
        for s in [
            r#"/"foo"/"bar""#,
            r#""foo"/""/./.."#,
            r#"/"a\"b"/"c\\d""#,
            "..",
            "/",
        ] {
            let p = path(s);
            assert_eq!(p.to_string(), s);
            assert_eq!(path(&p.to_string()), p);
        }
    }

    #[test]
    fn test_equality_includes_absolute_flag() {
        assert_ne!(path("/a"), path("a"));
        assert_eq!(path("/a/b"), path(r#"/"a"/"b""#));
    }

    #[test]
    fn test_push_pop_last() {
        let mut p = ObjectPath::root();
        p.push(Element::identifier("a"));
        p.push(Element::identifier("b"));
        assert_eq!(p.last(), Some(&Element::identifier("b")));
        assert_eq!(p.pop().unwrap(), Element::identifier("b"));
        assert_eq!(p.pop().unwrap(), Element::identifier("a"));
        assert_eq!(p.pop(), Err(PathError::Empty));
    }

    #[test]
    fn test_delete_range_bounds() {
        let mut p = path("a/b/c");
        assert!(p.delete_range(2, 2).is_err());
        assert!(p.delete_range(usize::MAX, 2).is_err());
        p.delete_range(0, 2).unwrap();
        assert_eq!(p, path("c"));
    }

    #[test]
    fn test_join() {
        let joined = path("/a").join(&path("b/c")).unwrap();
        assert_eq!(joined, path("/a/b/c"));
        assert_eq!(path("a").join(&path("../b")).unwrap(), path("a/../b"));
    }

    #[test]
    fn test_join_absolute_fails() {
        assert_eq!(path("/a").join(&path("/b")), Err(PathError::AbsoluteJoin));
        assert_eq!(path("a").join(&path("/b")), Err(PathError::AbsoluteJoin));
    }
}
