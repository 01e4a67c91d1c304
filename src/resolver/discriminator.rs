//! Discriminator-based resolution: a value elsewhere in the document selects
//! the type through a [`TypeMap`].

use super::{Policy, TypeResolver};
use crate::document::navigator::{assign_type_at, get_value_at};
use crate::document::node::Node;
use crate::error::{Error, Operation};
use crate::objectpath::ObjectPath;
use crate::types::type_map::TypeMap;

#[derive(Debug, Clone)]
pub struct TypeMapResolver {
    target_path: ObjectPath,
    discriminator_path: ObjectPath,
    type_map: TypeMap,
    policy: Policy,
}

impl TypeMapResolver {
    pub(crate) fn new(
        target_path: ObjectPath,
        discriminator_path: ObjectPath,
        type_map: TypeMap,
        policy: Policy,
    ) -> Self {
        Self {
            target_path,
            discriminator_path,
            type_map,
            policy,
        }
    }

    /// The absolute, normalized path of the discriminator value.
    pub fn discriminator_path(&self) -> &ObjectPath {
        &self.discriminator_path
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }
}

impl TypeResolver for TypeMapResolver {
    fn assign_target_type(&self, source: &Node, target: &mut Node) -> Result<bool, Error> {
        let value = get_value_at(source, &self.discriminator_path)
            .map_err(Error::navigation(Operation::ReadDiscriminator))?;
        tracing::debug!(path = %self.discriminator_path, value = ?value, "read discriminator");

        let Some(descriptor) = value.as_scalar().and_then(|key| self.type_map.get(key)) else {
            let shown = match value.as_scalar() {
                Some(scalar) => scalar.to_string(),
                None => value.kind_name().to_string(),
            };
            return self.policy.unresolved(
                &self.target_path,
                format!("no type mapped for discriminator value {}", shown),
            );
        };

        assign_type_at(target, &self.target_path, descriptor)
            .map_err(Error::navigation(Operation::AssignType))?;
        Ok(true)
    }

    fn target_path(&self) -> &ObjectPath {
        &self.target_path
    }

    fn policy(&self) -> Policy {
        self.policy
    }
}
