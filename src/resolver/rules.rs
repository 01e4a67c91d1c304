//! Rule-based resolution: the first matching rule decides the type.

use super::rule::Rule;
use super::{Policy, TypeResolver};
use crate::document::navigator::assign_type_at;
use crate::document::node::Node;
use crate::error::{Error, Operation};
use crate::objectpath::ObjectPath;

/// Assigns the target type of the first rule, in declaration order, whose
/// predicate holds for the source document.
#[derive(Debug, Clone)]
pub struct RuleResolver {
    target_path: ObjectPath,
    rules: Vec<Rule>,
    policy: Policy,
}

impl RuleResolver {
    pub(crate) fn new(target_path: ObjectPath, rules: Vec<Rule>, policy: Policy) -> Self {
        Self {
            target_path,
            rules,
            policy,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl TypeResolver for RuleResolver {
    fn assign_target_type(&self, source: &Node, target: &mut Node) -> Result<bool, Error> {
        for (index, rule) in self.rules.iter().enumerate() {
            let matched = rule
                .matches(source)
                .map_err(Error::navigation(Operation::EvaluateRule { index }))?;
            if matched {
                assign_type_at(target, &self.target_path, rule.target_type())
                    .map_err(Error::navigation(Operation::AssignType))?;
                return Ok(true);
            }
        }
        self.policy.unresolved(&self.target_path, "no rule matched")
    }

    fn target_path(&self) -> &ObjectPath {
        &self.target_path
    }

    fn policy(&self) -> Policy {
        self.policy
    }
}
