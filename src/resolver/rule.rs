//! Rules: a value path, a predicate over the value found there, and the type
//! to assign when the predicate holds.

use std::fmt;
use std::sync::Arc;

use crate::document::navigator::{get_value_at, NavigationError};
use crate::document::node::Node;
use crate::objectpath::ObjectPath;
use crate::types::descriptor::TypeDescriptor;

/// A pure test over a located document value.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Node) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Node) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Matches values equal to `expected`, looking through indirection layers.
    pub fn equals(expected: Node) -> Self {
        Self::new(move |value| value.unwrap_indirection() == &expected)
    }

    pub fn test(&self, value: &Node) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A single `(value path, predicate, target type)` triple.
#[derive(Debug, Clone)]
pub struct Rule {
    value_path: ObjectPath,
    predicate: Predicate,
    target_type: Arc<TypeDescriptor>,
}

impl Rule {
    /// Creates a rule. `value_path` is evaluated from the document root and
    /// must not contain `..` elements.
    ///
    /// Prefer [`RuleBuilder`](super::builder::RuleBuilder), which parses and
    /// validates the path.
    pub fn new(value_path: ObjectPath, predicate: Predicate, target_type: Arc<TypeDescriptor>) -> Self {
        Self {
            value_path,
            predicate,
            target_type,
        }
    }

    pub fn value_path(&self) -> &ObjectPath {
        &self.value_path
    }

    pub fn target_type(&self) -> &Arc<TypeDescriptor> {
        &self.target_type
    }

    /// Evaluates the predicate against the value at the rule's path.
    ///
    /// A path that cannot be followed is an error, not a non-match.
    pub fn matches(&self, document: &Node) -> Result<bool, NavigationError> {
        let value = get_value_at(document, &self.value_path)?;
        let matched = self.predicate.test(value);
        tracing::trace!(
            path = %self.value_path,
            target_type = self.target_type.name(),
            matched,
            "evaluated rule"
        );
        Ok(matched)
    }
}
