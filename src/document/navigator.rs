//! Path-based navigation over document trees.
//!
//! Reading a value and assigning a type share one traversal, so both agree on
//! what a valid path through a document is. At every step the current node is
//! unwrapped from any `Indirect` layer, then entered by name: mappings by exact
//! key, records by case-insensitive field name.

use std::fmt;
use std::sync::Arc;

use super::node::Node;
use crate::objectpath::{Element, ElementKind, ObjectPath};
use crate::types::descriptor::TypeDescriptor;

/// Why a traversal stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationErrorKind {
    /// The node to enter is null.
    NilValue,
    /// A mapping has no such key.
    KeyNotFound,
    /// A record has no such field.
    FieldNotFound,
    /// The node to enter is a scalar or sequence.
    NotContainer,
    /// The path still contains `..` or a root marker.
    UnnormalizedPath,
}

/// A traversal failure, with the rendered path and the failing element index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError {
    path: String,
    index: usize,
    element: String,
    kind: NavigationErrorKind,
}

impl NavigationError {
    fn new(path: &ObjectPath, index: usize, element: &Element, kind: NavigationErrorKind) -> Self {
        Self {
            path: path.to_string(),
            index,
            element: element.name().to_string(),
            kind,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn kind(&self) -> NavigationErrorKind {
        self.kind
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NavigationErrorKind::NilValue => write!(
                f,
                "cannot enter element \"{}\" of path {} at index {}: value is nil",
                self.element, self.path, self.index
            ),
            NavigationErrorKind::KeyNotFound => write!(
                f,
                "cannot get value at path {}: key \"{}\" not found in map at path index {}",
                self.path, self.element, self.index
            ),
            NavigationErrorKind::FieldNotFound => write!(
                f,
                "cannot get value at path {}: field \"{}\" not found in record at path index {}",
                self.path, self.element, self.index
            ),
            NavigationErrorKind::NotContainer => write!(
                f,
                "cannot get value at path {}: value at path index {} is neither a map nor struct",
                self.path, self.index
            ),
            NavigationErrorKind::UnnormalizedPath => write!(
                f,
                "cannot get value at path {}: element \"{}\" at index {} must be normalized away before navigation",
                self.path, self.element, self.index
            ),
        }
    }
}

impl std::error::Error for NavigationError {}

/// A position in a tree that can be moved one named child down.
///
/// Implemented for shared and exclusive references so reads and writes walk
/// the tree with the same code.
trait Cursor: Sized {
    fn unwrapped(self) -> Self;
    fn node(&self) -> &Node;
    fn enter(self, name: &str) -> Option<Self>;
}

impl<'a> Cursor for &'a Node {
    fn unwrapped(self) -> Self {
        self.unwrap_indirection()
    }

    fn node(&self) -> &Node {
        self
    }

    fn enter(self, name: &str) -> Option<Self> {
        match self {
            Node::Mapping(map) => map.get(name),
            Node::Record(record) => record.field(name),
            _ => None,
        }
    }
}

impl<'a> Cursor for &'a mut Node {
    fn unwrapped(self) -> Self {
        self.unwrap_indirection_mut()
    }

    fn node(&self) -> &Node {
        self
    }

    fn enter(self, name: &str) -> Option<Self> {
        match self {
            Node::Mapping(map) => map.get_mut(name),
            Node::Record(record) => record.field_mut(name),
            _ => None,
        }
    }
}

fn walk<C: Cursor>(root: C, path: &ObjectPath) -> Result<C, NavigationError> {
    let mut current = root;
    for (index, element) in path.elements().iter().enumerate() {
        match element.kind() {
            ElementKind::Identifier => {}
            ElementKind::SelfReference => continue,
            ElementKind::ParentReference | ElementKind::Root => {
                return Err(NavigationError::new(
                    path,
                    index,
                    element,
                    NavigationErrorKind::UnnormalizedPath,
                ));
            }
        }

        current = current.unwrapped();
        let missing = match current.node() {
            Node::Mapping(_) => NavigationErrorKind::KeyNotFound,
            Node::Record(_) => NavigationErrorKind::FieldNotFound,
            Node::Null => {
                return Err(NavigationError::new(
                    path,
                    index,
                    element,
                    NavigationErrorKind::NilValue,
                ))
            }
            _ => {
                return Err(NavigationError::new(
                    path,
                    index,
                    element,
                    NavigationErrorKind::NotContainer,
                ))
            }
        };

        current = current
            .enter(element.name())
            .ok_or_else(|| NavigationError::new(path, index, element, missing))?;
    }
    Ok(current)
}

/// Returns the node at `path` below `root`.
///
/// # Example
///
/// ```
/// use polydecode::document::navigator::get_value_at;
/// use polydecode::document::parser::parse_json;
/// use polydecode::objectpath::ObjectPath;
///
/// let doc = parse_json(r#"{"foo": {"bar": {"test": 123}}}"#).unwrap();
/// let path = ObjectPath::parse("foo/bar/test").unwrap();
/// assert_eq!(get_value_at(&doc, &path).unwrap().as_i64(), Some(123));
/// ```
pub fn get_value_at<'a>(root: &'a Node, path: &ObjectPath) -> Result<&'a Node, NavigationError> {
    walk(root, path)
}

/// Returns the slot at `path` below `root` for writing.
pub fn get_value_at_mut<'a>(
    root: &'a mut Node,
    path: &ObjectPath,
) -> Result<&'a mut Node, NavigationError> {
    walk(root, path)
}

/// Replaces the slot at `path` with a zero-valued instance of `descriptor`.
///
/// Whatever the slot held before, typically a generic mapping, is discarded.
pub fn assign_type_at(
    root: &mut Node,
    path: &ObjectPath,
    descriptor: &Arc<TypeDescriptor>,
) -> Result<(), NavigationError> {
    let slot = get_value_at_mut(root, path)?;
    tracing::debug!(path = %path, type_name = descriptor.name(), "assigning type");
    *slot = descriptor.zero_value();
    Ok(())
}
