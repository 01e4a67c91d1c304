//! Polymorphic decoding of JSON and YAML documents.
//!
//! A generic document says, somewhere inside it, which concrete type one of
//! its parts should be decoded into. This crate locates that information with
//! object paths, decides the type with a resolver, assigns a zero value of
//! that type into the target tree and then decodes the document into it.
//!
//! - [`objectpath`] - the path language: parsing, normalization, anchoring
//! - [`document`] - document trees and path navigation
//! - [`types`] - runtime type descriptors and discriminator type maps
//! - [`resolver`] - rule and type-map resolvers, and their builders
//! - [`decode`] - resolve-then-decode entry points
//! - [`config`] - user configuration and TOML schemas
//! - [`file`] - loading documents from disk or stdin

pub mod config;
pub mod decode;
pub mod document;
pub mod error;
pub mod file;
pub mod objectpath;
pub mod resolver;
pub mod types;

pub use decode::{decode, decode_into, unmarshal_json, DecodeError};
pub use document::{Node, Record, Scalar};
pub use error::{Error, Operation};
pub use objectpath::ObjectPath;
pub use resolver::{Policy, PolymorphismBuilder, Resolver, RuleBuilder, TypeResolver};
pub use types::{FieldKind, TypeDescriptor, TypeMap};
