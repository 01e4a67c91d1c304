//! Type descriptors and discriminator type maps.

pub mod descriptor;
pub mod type_map;

pub use descriptor::{FieldDescriptor, FieldKind, TypeDescriptor, TypeDescriptorBuilder};
pub use type_map::TypeMap;
