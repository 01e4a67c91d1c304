//! Staged builders for resolvers and rules.
//!
//! Each stage only exposes the calls that are valid next, so an incomplete
//! resolver cannot be built. Path problems do not stop the chain; they are
//! collected and reported together by `build()`.
//!
//! ```
//! use polydecode::resolver::{Policy, PolymorphismBuilder, RuleBuilder};
//! use polydecode::types::TypeDescriptor;
//!
//! let alert = TypeDescriptor::builder("Alert").build();
//! let rule = RuleBuilder::new()
//!     .when_value_at("payload/type")
//!     .is_equal_to("alert")
//!     .then_assign_type(alert)
//!     .build()
//!     .unwrap();
//!
//! let resolver = PolymorphismBuilder::new()
//!     .with_policy(Policy::Soft)
//!     .define_type_at("payload")
//!     .using_rule(rule)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

use super::discriminator::TypeMapResolver;
use super::error::{BuildError, ConstructionError, PathRole};
use super::rule::{Predicate, Rule};
use super::rules::RuleResolver;
use super::{Policy, Resolver};
use crate::document::node::Node;
use crate::objectpath::ObjectPath;
use crate::types::descriptor::TypeDescriptor;
use crate::types::type_map::TypeMap;

/// Parses `input` and anchors it at `reference`, recording any failure.
fn anchor_str(
    input: &str,
    reference: &ObjectPath,
    role: PathRole,
    errors: &mut Vec<ConstructionError>,
) -> Option<ObjectPath> {
    match ObjectPath::parse(input) {
        Ok(path) => anchor_path(path, input, reference, role, errors),
        Err(source) => {
            errors.push(ConstructionError::InvalidPath {
                role,
                input: input.to_string(),
                source,
            });
            None
        }
    }
}

fn anchor_path(
    mut path: ObjectPath,
    input: &str,
    reference: &ObjectPath,
    role: PathRole,
    errors: &mut Vec<ConstructionError>,
) -> Option<ObjectPath> {
    let anchored = path.to_absolute(reference).and_then(|_| path.normalize());
    match anchored {
        Ok(()) => Some(path),
        Err(source) => {
            errors.push(ConstructionError::InvalidAnchor {
                role,
                input: input.to_string(),
                source,
            });
            None
        }
    }
}

fn finish<T>(errors: Vec<ConstructionError>, value: Option<T>) -> Result<T, BuildError> {
    match value {
        Some(value) if errors.is_empty() => Ok(value),
        _ => Err(BuildError::new(errors)),
    }
}

#[derive(Debug)]
struct Shared {
    target_path: Option<ObjectPath>,
    errors: Vec<ConstructionError>,
    policy: Policy,
}

/// Entry point for building a [`Resolver`].
///
/// The target path is relative to the document root; a discriminator path is
/// relative to the target path.
#[derive(Debug, Default)]
pub struct PolymorphismBuilder {
    policy: Policy,
}

impl PolymorphismBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the no-match policy (default [`Policy::Strict`]).
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the slot whose type gets decided.
    pub fn define_type_at(self, target: &str) -> TargetStage {
        let mut errors = Vec::new();
        let target_path = anchor_str(target, &ObjectPath::root(), PathRole::Target, &mut errors);
        self.target_stage(target_path, errors)
    }

    /// Like [`define_type_at`](Self::define_type_at) for an already parsed path.
    pub fn define_type_at_path(self, target: ObjectPath) -> TargetStage {
        let mut errors = Vec::new();
        let input = target.to_string();
        let target_path = anchor_path(target, &input, &ObjectPath::root(), PathRole::Target, &mut errors);
        self.target_stage(target_path, errors)
    }

    fn target_stage(self, target_path: Option<ObjectPath>, errors: Vec<ConstructionError>) -> TargetStage {
        TargetStage {
            shared: Shared {
                target_path,
                errors,
                policy: self.policy,
            },
        }
    }
}

/// Target defined; choose a strategy.
#[derive(Debug)]
pub struct TargetStage {
    shared: Shared,
}

impl TargetStage {
    /// Resolves by rules. Further rules are added with [`RuleStage::using_rule`].
    pub fn using_rule(self, rule: Rule) -> RuleStage {
        RuleStage {
            shared: self.shared,
            rules: vec![rule],
        }
    }

    /// Resolves by a discriminator value looked up in `type_map`.
    pub fn using_type_map(self, type_map: TypeMap) -> TypeMapStage {
        TypeMapStage {
            shared: self.shared,
            type_map,
        }
    }
}

/// Rule strategy; rules are tried in the order they were added.
#[derive(Debug)]
pub struct RuleStage {
    shared: Shared,
    rules: Vec<Rule>,
}

impl RuleStage {
    pub fn using_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.shared.policy = policy;
        self
    }

    pub fn build(self) -> Result<Resolver, BuildError> {
        let Shared {
            target_path,
            errors,
            policy,
        } = self.shared;
        let rules = self.rules;
        let resolver =
            target_path.map(|target| Resolver::Rules(RuleResolver::new(target, rules, policy)));
        finish(errors, resolver)
    }
}

/// Type map strategy; waiting for the discriminator path.
#[derive(Debug)]
pub struct TypeMapStage {
    shared: Shared,
    type_map: TypeMap,
}

impl TypeMapStage {
    /// Sets the discriminator path, relative to the target path unless absolute.
    pub fn with_discriminator_at(mut self, discriminator: &str) -> DiscriminatorStage {
        let discriminator_path = match ObjectPath::parse(discriminator) {
            Ok(path) => self.anchor_discriminator(path, discriminator),
            Err(source) => {
                self.shared.errors.push(ConstructionError::InvalidPath {
                    role: PathRole::Discriminator,
                    input: discriminator.to_string(),
                    source,
                });
                None
            }
        };
        self.discriminator_stage(discriminator_path)
    }

    /// Like [`with_discriminator_at`](Self::with_discriminator_at) for an
    /// already parsed path.
    pub fn with_discriminator_at_path(mut self, discriminator: ObjectPath) -> DiscriminatorStage {
        let input = discriminator.to_string();
        let discriminator_path = self.anchor_discriminator(discriminator, &input);
        self.discriminator_stage(discriminator_path)
    }

    fn anchor_discriminator(&mut self, path: ObjectPath, input: &str) -> Option<ObjectPath> {
        // Without a valid target a relative discriminator cannot be checked.
        let reference = match (&self.shared.target_path, path.is_absolute()) {
            (Some(target), _) => target.clone(),
            (None, true) => ObjectPath::root(),
            (None, false) => return None,
        };
        anchor_path(
            path,
            input,
            &reference,
            PathRole::Discriminator,
            &mut self.shared.errors,
        )
    }

    fn discriminator_stage(self, discriminator_path: Option<ObjectPath>) -> DiscriminatorStage {
        DiscriminatorStage {
            shared: self.shared,
            type_map: self.type_map,
            discriminator_path,
        }
    }
}

/// Type map strategy, complete.
#[derive(Debug)]
pub struct DiscriminatorStage {
    shared: Shared,
    type_map: TypeMap,
    discriminator_path: Option<ObjectPath>,
}

impl DiscriminatorStage {
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.shared.policy = policy;
        self
    }

    pub fn build(self) -> Result<Resolver, BuildError> {
        let Shared {
            target_path,
            errors,
            policy,
        } = self.shared;
        let type_map = self.type_map;
        let resolver = target_path
            .zip(self.discriminator_path)
            .map(|(target, discriminator)| {
                Resolver::TypeMap(TypeMapResolver::new(target, discriminator, type_map, policy))
            });
        finish(errors, resolver)
    }
}

/// Entry point for building a [`Rule`].
///
/// The value path is relative to the document root.
#[derive(Debug, Default)]
pub struct RuleBuilder;

impl RuleBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn when_value_at(self, value_path: &str) -> RuleCondition {
        let mut errors = Vec::new();
        let value_path = anchor_str(value_path, &ObjectPath::root(), PathRole::RuleValue, &mut errors);
        RuleCondition { errors, value_path }
    }

    pub fn when_value_at_path(self, value_path: ObjectPath) -> RuleCondition {
        let mut errors = Vec::new();
        let input = value_path.to_string();
        let value_path = anchor_path(
            value_path,
            &input,
            &ObjectPath::root(),
            PathRole::RuleValue,
            &mut errors,
        );
        RuleCondition { errors, value_path }
    }
}

/// Value path set; choose the condition.
#[derive(Debug)]
pub struct RuleCondition {
    errors: Vec<ConstructionError>,
    value_path: Option<ObjectPath>,
}

impl RuleCondition {
    /// Matches when the value equals `value`.
    pub fn is_equal_to(self, value: impl Into<Node>) -> RuleTarget {
        self.with_predicate(Predicate::equals(value.into()))
    }

    /// Matches when `predicate` returns true for the value.
    pub fn matches<F>(self, predicate: F) -> RuleTarget
    where
        F: Fn(&Node) -> bool + Send + Sync + 'static,
    {
        self.with_predicate(Predicate::new(predicate))
    }

    fn with_predicate(self, predicate: Predicate) -> RuleTarget {
        RuleTarget {
            errors: self.errors,
            value_path: self.value_path,
            predicate,
        }
    }
}

/// Condition set; choose the type.
#[derive(Debug)]
pub struct RuleTarget {
    errors: Vec<ConstructionError>,
    value_path: Option<ObjectPath>,
    predicate: Predicate,
}

impl RuleTarget {
    pub fn then_assign_type(self, target_type: Arc<TypeDescriptor>) -> RuleFinalizer {
        RuleFinalizer {
            errors: self.errors,
            value_path: self.value_path,
            predicate: self.predicate,
            target_type,
        }
    }
}

/// Rule complete.
#[derive(Debug)]
pub struct RuleFinalizer {
    errors: Vec<ConstructionError>,
    value_path: Option<ObjectPath>,
    predicate: Predicate,
    target_type: Arc<TypeDescriptor>,
}

impl RuleFinalizer {
    pub fn build(self) -> Result<Rule, BuildError> {
        let predicate = self.predicate;
        let target_type = self.target_type;
        let rule = self
            .value_path
            .map(|path| Rule::new(path, predicate, target_type));
        finish(self.errors, rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objectpath::{ParseError, PathError};
    use crate::resolver::TypeResolver;

    fn int64() -> Arc<TypeDescriptor> {
        TypeDescriptor::builder("Int64").build()
    }

    fn rule() -> Rule {
        RuleBuilder::new()
            .when_value_at("foo/bar")
            .is_equal_to("test")
            .then_assign_type(int64())
            .build()
            .unwrap()
    }

    #[test]
    fn test_rule_builder() {
        let rule = rule();
        assert_eq!(rule.value_path(), &ObjectPath::parse("/foo/bar").unwrap());
        assert_eq!(rule.target_type().name(), "Int64");
    }

    #[test]
    fn test_rule_builder_invalid_path() {
        let err = RuleBuilder::new()
            .when_value_at("fo#")
            .matches(|_| true)
            .then_assign_type(int64())
            .build()
            .unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert!(matches!(
            err.errors()[0],
            ConstructionError::InvalidPath {
                role: PathRole::RuleValue,
                source: ParseError::UnexpectedCharacter { position: 2, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_using_rules() {
        let resolver = PolymorphismBuilder::new()
            .define_type_at("foo/bar")
            .using_rule(rule())
            .using_rule(rule())
            .build()
            .unwrap();
        match &resolver {
            Resolver::Rules(rules) => assert_eq!(rules.rules().len(), 2),
            other => panic!("expected rule resolver, got {:?}", other),
        }
        assert_eq!(resolver.target_path(), &ObjectPath::parse("/foo/bar").unwrap());
        assert_eq!(resolver.policy(), Policy::Strict);
    }

    #[test]
    fn test_using_type_map_anchors_discriminator() {
        let resolver = PolymorphismBuilder::new()
            .define_type_at("foo/bar")
            .using_type_map(TypeMap::new().with("test", int64()))
            .with_discriminator_at("discriminator")
            .with_policy(Policy::Soft)
            .build()
            .unwrap();
        match resolver {
            Resolver::TypeMap(resolver) => {
                assert_eq!(
                    resolver.discriminator_path(),
                    &ObjectPath::parse("/foo/bar/discriminator").unwrap()
                );
                assert_eq!(resolver.policy(), Policy::Soft);
            }
            other => panic!("expected type map resolver, got {:?}", other),
        }
    }

    #[test]
    fn test_sibling_discriminator() {
        let resolver = PolymorphismBuilder::new()
            .define_type_at("payload")
            .using_type_map(TypeMap::new())
            .with_discriminator_at("../type")
            .build()
            .unwrap();
        if let Resolver::TypeMap(resolver) = resolver {
            assert_eq!(resolver.discriminator_path(), &ObjectPath::parse("/type").unwrap());
        } else {
            panic!("expected type map resolver");
        }
    }

    #[test]
    fn test_discriminator_escaping_root_fails() {
        let err = PolymorphismBuilder::new()
            .define_type_at("payload")
            .using_type_map(TypeMap::new())
            .with_discriminator_at("../../type")
            .build()
            .unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert!(matches!(
            err.errors()[0],
            ConstructionError::InvalidAnchor {
                role: PathRole::Discriminator,
                source: PathError::EscapesRoot { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_errors_accumulate() {
        let err = PolymorphismBuilder::new()
            .define_type_at("a//b")
            .using_type_map(TypeMap::new())
            .with_discriminator_at("/x/\"open")
            .build()
            .unwrap_err();
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn test_absolute_target_with_parent_is_normalized() {
        let resolver = PolymorphismBuilder::new()
            .define_type_at("/a/../payload")
            .using_rule(rule())
            .build()
            .unwrap();
        assert_eq!(resolver.target_path(), &ObjectPath::parse("/payload").unwrap());
    }

    #[test]
    fn test_target_escaping_root_fails() {
        let err = PolymorphismBuilder::new()
            .define_type_at("..")
            .using_rule(rule())
            .build()
            .unwrap_err();
        assert!(matches!(
            err.errors()[0],
            ConstructionError::InvalidAnchor {
                role: PathRole::Target,
                ..
            }
        ));
    }
}
