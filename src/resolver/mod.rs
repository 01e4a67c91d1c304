//! Type resolution: deciding which concrete type a document slot should hold.
//!
//! Two strategies are available, both behind [`TypeResolver`]:
//!
//! - [`RuleResolver`] - ordered rules, first match wins
//! - [`TypeMapResolver`] - a discriminator value looked up in a [`TypeMap`]
//!
//! Resolvers are built once through [`PolymorphismBuilder`] and are read-only
//! afterwards, so one instance can serve many threads. Only the caller's
//! target tree is mutated.
//!
//! [`TypeMap`]: crate::types::TypeMap
//!
//! # Example
//!
//! ```
//! use polydecode::document::parser::parse_json;
//! use polydecode::resolver::{PolymorphismBuilder, TypeResolver};
//! use polydecode::types::{FieldKind, TypeDescriptor, TypeMap};
//!
//! let horse = TypeDescriptor::builder("Horse").field("Shoes", FieldKind::Integer).build();
//! let duck = TypeDescriptor::builder("Duck").field("Feathers", FieldKind::Integer).build();
//! let animal = TypeDescriptor::builder("Animal")
//!     .field("Name", FieldKind::String)
//!     .field("Specifics", FieldKind::Any)
//!     .build();
//!
//! let resolver = PolymorphismBuilder::new()
//!     .define_type_at("specifics")
//!     .using_type_map(TypeMap::new().with("horse", horse).with("duck", duck))
//!     .with_discriminator_at("type")
//!     .build()
//!     .unwrap();
//!
//! let source = parse_json(r#"{"name": "horsey", "specifics": {"type": "horse", "shoes": 4}}"#).unwrap();
//! let mut target = animal.zero_value();
//! assert!(resolver.assign_target_type(&source, &mut target).unwrap());
//! assert_eq!(target.get("specifics").unwrap().as_record().unwrap().type_name(), "Horse");
//! ```

pub mod builder;
pub mod discriminator;
pub mod error;
pub mod rule;
pub mod rules;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::node::Node;
use crate::error::Error;
use crate::objectpath::ObjectPath;

pub use builder::{PolymorphismBuilder, RuleBuilder};
pub use discriminator::TypeMapResolver;
pub use error::{BuildError, ConstructionError, PathRole, UnresolvedTypeError};
pub use rule::{Predicate, Rule};
pub use rules::RuleResolver;

/// What a resolver does when no rule matches or the discriminator value is
/// not in the type map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Fail with [`UnresolvedTypeError`].
    #[default]
    Strict,
    /// Report "not applied" and leave the target untouched.
    Soft,
}

impl Policy {
    pub(crate) fn unresolved(
        self,
        target_path: &ObjectPath,
        reason: impl Into<String>,
    ) -> Result<bool, Error> {
        match self {
            Policy::Strict => Err(Error::UnresolvedType(UnresolvedTypeError::new(
                target_path.to_string(),
                reason,
            ))),
            Policy::Soft => {
                tracing::debug!(target_path = %target_path, "no type resolved, leaving target unchanged");
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Strict => write!(f, "strict"),
            Policy::Soft => write!(f, "soft"),
        }
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Policy::Strict),
            "soft" => Ok(Policy::Soft),
            other => Err(format!(
                "unknown policy '{}', expected 'strict' or 'soft'",
                other
            )),
        }
    }
}

/// Decides the concrete type of one slot of a target tree.
pub trait TypeResolver: fmt::Debug + Send + Sync {
    /// Inspects `source` and overwrites the slot at [`target_path`] in
    /// `target` with a zero value of the resolved type.
    ///
    /// Returns `Ok(true)` when a type was assigned and `Ok(false)` when none
    /// applied under [`Policy::Soft`].
    ///
    /// [`target_path`]: TypeResolver::target_path
    fn assign_target_type(&self, source: &Node, target: &mut Node) -> Result<bool, Error>;

    /// The absolute path of the slot this resolver assigns.
    fn target_path(&self) -> &ObjectPath;

    fn policy(&self) -> Policy;
}

/// A built resolver of either strategy.
#[derive(Debug, Clone)]
pub enum Resolver {
    Rules(RuleResolver),
    TypeMap(TypeMapResolver),
}

impl TypeResolver for Resolver {
    fn assign_target_type(&self, source: &Node, target: &mut Node) -> Result<bool, Error> {
        match self {
            Resolver::Rules(resolver) => resolver.assign_target_type(source, target),
            Resolver::TypeMap(resolver) => resolver.assign_target_type(source, target),
        }
    }

    fn target_path(&self) -> &ObjectPath {
        match self {
            Resolver::Rules(resolver) => resolver.target_path(),
            Resolver::TypeMap(resolver) => resolver.target_path(),
        }
    }

    fn policy(&self) -> Policy {
        match self {
            Resolver::Rules(resolver) => resolver.policy(),
            Resolver::TypeMap(resolver) => resolver.policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("strict".parse::<Policy>(), Ok(Policy::Strict));
        assert_eq!("SOFT".parse::<Policy>(), Ok(Policy::Soft));
        assert!("lenient".parse::<Policy>().is_err());
    }

    #[test]
    fn test_policy_default_is_strict() {
        assert_eq!(Policy::default(), Policy::Strict);
    }

    #[test]
    fn test_resolvers_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver>();
        assert_send_sync::<Rule>();
    }
}
