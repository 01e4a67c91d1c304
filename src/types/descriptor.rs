//! Runtime type descriptors.
//!
//! A [`TypeDescriptor`] names a record type and lists its fields. Resolvers
//! assign descriptors to document slots, the structural decoder reads the
//! field kinds to fill them.

use std::fmt;
use std::sync::Arc;

use crate::document::node::{Node, Record, Scalar};

/// The declared kind of a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Bool,
    Integer,
    Float,
    String,
    /// A polymorphic slot; holds whatever the document or a resolver puts there.
    Any,
    Mapping,
    Sequence(Box<FieldKind>),
    Optional(Box<FieldKind>),
    Record(Arc<TypeDescriptor>),
}

impl FieldKind {
    /// Returns the value a fresh field of this kind holds.
    pub fn zero_value(&self) -> Node {
        match self {
            FieldKind::Bool => Node::Scalar(Scalar::Bool(false)),
            FieldKind::Integer => Node::Scalar(Scalar::Integer(0)),
            FieldKind::Float => Node::Scalar(Scalar::Float(0.0)),
            FieldKind::String => Node::Scalar(Scalar::String(String::new())),
            FieldKind::Any | FieldKind::Optional(_) => Node::Null,
            FieldKind::Mapping => Node::Mapping(Default::default()),
            FieldKind::Sequence(_) => Node::Sequence(Vec::new()),
            FieldKind::Record(descriptor) => descriptor.zero_value(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::String => write!(f, "string"),
            FieldKind::Any => write!(f, "any"),
            FieldKind::Mapping => write!(f, "map"),
            FieldKind::Sequence(inner) => write!(f, "[{}]", inner),
            FieldKind::Optional(inner) => write!(f, "{}?", inner),
            FieldKind::Record(descriptor) => write!(f, "{}", descriptor.name()),
        }
    }
}

/// A named field of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// Describes a concrete record type that a polymorphic slot can take.
///
/// # Example
///
/// ```
/// use polydecode::types::{FieldKind, TypeDescriptor};
///
/// let horse = TypeDescriptor::builder("Horse")
///     .field("Shoes", FieldKind::Integer)
///     .build();
///
/// let value = horse.zero_value();
/// assert_eq!(value.as_record().unwrap().type_name(), "Horse");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            descriptor: TypeDescriptor::new(name, Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Finds a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// A fresh zero-valued instance of this type.
    pub fn zero_value(self: &Arc<Self>) -> Node {
        Node::Record(Record::new(Arc::clone(self)))
    }
}

/// Fluent construction of a shared [`TypeDescriptor`].
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    descriptor: TypeDescriptor,
}

impl TypeDescriptorBuilder {
    /// Adds a field. A later field with the same name replaces the earlier one.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let field = FieldDescriptor::new(name, kind);
        match self
            .descriptor
            .fields
            .iter_mut()
            .find(|existing| existing.name == field.name)
        {
            Some(existing) => *existing = field,
            None => self.descriptor.fields.push(field),
        }
        self
    }

    pub fn build(self) -> Arc<TypeDescriptor> {
        Arc::new(self.descriptor)
    }
}
