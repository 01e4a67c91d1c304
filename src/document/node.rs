//! Document node representation.
//!
//! A document is a tree of [`Node`]s. Mappings are string-keyed and ordered,
//! records are instances of a [`TypeDescriptor`] whose fields are looked up
//! case-insensitively, and `Indirect` wraps a value behind an optional layer.
//!
//! # Example
//!
//! ```
//! use polydecode::document::node::{Node, Scalar};
//! use indexmap::IndexMap;
//!
//! let mut map = IndexMap::new();
//! map.insert("type".to_string(), Node::from("horse"));
//! map.insert("shoes".to_string(), Node::from(4));
//! let node = Node::Mapping(map);
//!
//! assert_eq!(node.get("type").and_then(Node::as_scalar), Some(&Scalar::from("horse")));
//! assert!(node.get("Type").is_none()); // mapping keys are exact
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::types::descriptor::TypeDescriptor;

/// A leaf value.
///
/// Scalars are hashable so they can key a [`TypeMap`](crate::types::TypeMap).
/// Floats compare by bit pattern, and an `Integer` never equals a `Float`.
#[derive(Debug, Clone)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a.to_bits() == b.to_bits(),
            (Scalar::String(a), Scalar::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Bool(b) => b.hash(state),
            Scalar::Integer(i) => i.hash(state),
            Scalar::Float(f) => f.to_bits().hash(state),
            Scalar::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(fl) => write!(f, "{}", fl),
            Scalar::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

/// A node of a document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Absent / unset value.
    Null,
    Scalar(Scalar),
    Sequence(Vec<Node>),
    /// String-keyed mapping with exact key lookup.
    Mapping(IndexMap<String, Node>),
    /// Typed record with case-insensitive field lookup.
    Record(Record),
    /// An optional or boxed value, transparently unwrapped by navigation.
    Indirect(Box<Node>),
}

impl Node {
    /// Wraps `node` in an indirection layer.
    pub fn indirect(node: Node) -> Self {
        Node::Indirect(Box::new(node))
    }

    /// A short name of the node's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Scalar(scalar) => scalar.kind_name(),
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "map",
            Node::Record(_) => "record",
            Node::Indirect(inner) => inner.kind_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.unwrap_indirection(), Node::Null)
    }

    /// Follows `Indirect` layers down to the wrapped node.
    pub fn unwrap_indirection(&self) -> &Node {
        let mut node = self;
        while let Node::Indirect(inner) = node {
            node = inner.as_ref();
        }
        node
    }

    /// Mutable variant of [`unwrap_indirection`](Self::unwrap_indirection).
    pub fn unwrap_indirection_mut(&mut self) -> &mut Node {
        match self {
            Node::Indirect(inner) => inner.unwrap_indirection_mut(),
            other => other,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self.unwrap_indirection() {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.as_scalar() {
            Some(Scalar::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.as_scalar() {
            Some(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self.unwrap_indirection() {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self.unwrap_indirection() {
            Node::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self.unwrap_indirection_mut() {
            Node::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Looks up a child by name: exact key for mappings, case-insensitive
    /// field name for records. Other nodes have no named children.
    pub fn get(&self, name: &str) -> Option<&Node> {
        match self.unwrap_indirection() {
            Node::Mapping(map) => map.get(name),
            Node::Record(record) => record.field(name),
            _ => None,
        }
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(Scalar::from(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(Scalar::from(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::from(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Scalar(Scalar::from(value))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(Scalar::from(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::from(value))
    }
}

impl From<Record> for Node {
    fn from(value: Record) -> Self {
        Node::Record(value)
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(value: IndexMap<String, Node>) -> Self {
        Node::Mapping(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Sequence(value)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Node::Record(record) => {
                let mut out = serializer.serialize_map(Some(record.len()))?;
                for (key, value) in record.fields() {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Node::Indirect(inner) => inner.serialize(serializer),
        }
    }
}

/// An instance of a [`TypeDescriptor`].
///
/// Records are created with every declared field set to its zero value, so a
/// field slot always exists for navigation and decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    descriptor: Arc<TypeDescriptor>,
    fields: IndexMap<String, Node>,
}

impl Record {
    /// Creates a zero-valued record of the given type.
    pub fn new(descriptor: Arc<TypeDescriptor>) -> Self {
        let fields = descriptor
            .fields()
            .iter()
            .map(|field| (field.name().to_string(), field.kind().zero_value()))
            .collect();
        Self { descriptor, fields }
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.fields.iter()
    }

    /// Returns the field whose name matches `name` case-insensitively.
    ///
    /// An exact match wins over a case-insensitive one.
    pub fn field(&self, name: &str) -> Option<&Node> {
        self.field_index(name)
            .and_then(|index| self.fields.get_index(index))
            .map(|(_, node)| node)
    }

    /// Mutable variant of [`field`](Self::field).
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        let index = self.field_index(name)?;
        self.fields.get_index_mut(index).map(|(_, node)| node)
    }

    /// Returns the slot of a declared field, recreating it if missing.
    pub(crate) fn slot_mut(&mut self, declared_name: &str) -> &mut Node {
        let kind = self
            .descriptor
            .field(declared_name)
            .map(|field| field.kind().clone());
        self.fields
            .entry(declared_name.to_string())
            .or_insert_with(|| kind.map_or(Node::Null, |kind| kind.zero_value()))
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.fields.get_index_of(name) {
            return Some(index);
        }
        let wanted = name.to_lowercase();
        self.fields
            .keys()
            .position(|key| key.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::descriptor::{FieldKind, TypeDescriptor};

    fn horse() -> Arc<TypeDescriptor> {
        TypeDescriptor::builder("Horse")
            .field("Shoes", FieldKind::Integer)
            .field("Name", FieldKind::String)
            .build()
    }

    #[test]
    fn test_record_starts_zero_valued() {
        let record = Record::new(horse());
        assert_eq!(record.type_name(), "Horse");
        assert_eq!(record.field("Shoes"), Some(&Node::from(0)));
        assert_eq!(record.field("Name"), Some(&Node::from("")));
    }

    #[test]
    fn test_record_field_lookup_is_case_insensitive() {
        let mut record = Record::new(horse());
        *record.field_mut("shoes").unwrap() = Node::from(4);
        assert_eq!(record.field("SHOES"), Some(&Node::from(4)));
        assert!(record.field("hooves").is_none());
    }

    #[test]
    fn test_scalar_equality_does_not_mix_numbers() {
        assert_ne!(Scalar::Integer(1), Scalar::Float(1.0));
        assert_eq!(Scalar::Float(1.5), Scalar::Float(1.5));
        assert_eq!(Scalar::from("a"), Scalar::String("a".to_string()));
    }

    #[test]
    fn test_unwrap_indirection() {
        let node = Node::indirect(Node::indirect(Node::from(true)));
        assert_eq!(node.as_bool(), Some(true));
        assert_eq!(node.kind_name(), "bool");
        assert!(Node::indirect(Node::Null).is_null());
    }

    #[test]
    fn test_serialize_record_as_object() {
        let mut record = Record::new(horse());
        *record.field_mut("name").unwrap() = Node::from("Bucephalus");
        let json = serde_json::to_string(&Node::Record(record)).unwrap();
        assert_eq!(json, r#"{"Shoes":0,"Name":"Bucephalus"}"#);
    }
}
