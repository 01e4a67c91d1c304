//! Discriminator value to type mapping.

use std::sync::Arc;

use indexmap::IndexMap;

use super::descriptor::TypeDescriptor;
use crate::document::node::Scalar;

/// Maps discriminator scalars to the type a slot should take.
///
/// Keys are unique; lookup is by equality.
///
/// ```
/// use polydecode::types::{FieldKind, TypeDescriptor, TypeMap};
///
/// let horse = TypeDescriptor::builder("Horse").field("shoes", FieldKind::Integer).build();
/// let duck = TypeDescriptor::builder("Duck").field("feathers", FieldKind::Integer).build();
/// let map = TypeMap::new().with("horse", horse).with("duck", duck);
///
/// assert_eq!(map.get(&"duck".into()).unwrap().name(), "Duck");
/// assert!(map.get(&"goose".into()).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMap {
    entries: IndexMap<Scalar, Arc<TypeDescriptor>>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping, returning the descriptor previously stored for the key.
    pub fn insert(
        &mut self,
        key: impl Into<Scalar>,
        descriptor: Arc<TypeDescriptor>,
    ) -> Option<Arc<TypeDescriptor>> {
        self.entries.insert(key.into(), descriptor)
    }

    /// Chaining variant of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<Scalar>, descriptor: Arc<TypeDescriptor>) -> Self {
        self.insert(key, descriptor);
        self
    }

    pub fn get(&self, key: &Scalar) -> Option<&Arc<TypeDescriptor>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Arc<TypeDescriptor>)> {
        self.entries.iter()
    }
}

impl<K: Into<Scalar>> FromIterator<(K, Arc<TypeDescriptor>)> for TypeMap {
    fn from_iter<I: IntoIterator<Item = (K, Arc<TypeDescriptor>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, descriptor)| (key.into(), descriptor))
                .collect(),
        }
    }
}
