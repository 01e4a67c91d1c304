//! TOML schemas: named record types plus one resolver.
//!
//! ```toml
//! root = "Animal"
//! policy = "soft"            # optional
//!
//! [types.Animal]
//! Name = "string"
//! Specifics = "any"
//!
//! [types.Horse]
//! Shoes = "integer"
//!
//! [resolver]
//! target = "specifics"
//! discriminator = "type"
//!
//! [resolver.type_map]
//! horse = "Horse"
//! ```
//!
//! Table keys are always strings. Discriminators holding integers, floats or
//! booleans are mapped with entries instead:
//!
//! ```toml
//! [[resolver.type_map]]
//! value = 1
//! type = "Horse"
//! ```
//!
//! Instead of `discriminator` and `type_map`, a resolver may list ordered
//! rules:
//!
//! ```toml
//! [[resolver.rules]]
//! path = "specifics/type"
//! equals = "horse"
//! type = "Horse"
//! ```
//!
//! Field kinds are `bool`, `integer`, `float`, `string`, `any`, `map`, the
//! name of another type, `[kind]` for sequences and `kind?` for optionals.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::document::node::{Node, Scalar};
use crate::resolver::{Policy, PolymorphismBuilder, Resolver, RuleBuilder};
use crate::types::descriptor::{FieldKind, TypeDescriptor};
use crate::types::type_map::TypeMap;

/// A schema as written in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// The type of the document root.
    pub root: String,
    /// Overrides the configured no-match policy.
    #[serde(default)]
    pub policy: Option<Policy>,
    /// Type name to `field name = kind` table.
    pub types: IndexMap<String, IndexMap<String, String>>,
    pub resolver: ResolverSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSpec {
    pub target: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub type_map: TypeMapSpec,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// Discriminator values and the types they select.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeMapSpec {
    /// `value = "Type"` pairs; the values are strings.
    Table(IndexMap<String, String>),
    /// `[[resolver.type_map]]` entries with a value of any scalar type.
    Entries(Vec<TypeMapEntry>),
}

impl Default for TypeMapSpec {
    fn default() -> Self {
        TypeMapSpec::Table(IndexMap::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeMapEntry {
    pub value: toml::Value,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl TypeMapSpec {
    /// The pairs in declaration order, with values converted to scalars.
    fn pairs(&self) -> Result<Vec<(Scalar, &str)>> {
        match self {
            TypeMapSpec::Table(table) => Ok(table
                .iter()
                .map(|(value, type_name)| (Scalar::from(value.as_str()), type_name.as_str()))
                .collect()),
            TypeMapSpec::Entries(entries) => entries
                .iter()
                .map(|entry| match toml_to_node(&entry.value) {
                    Node::Scalar(scalar) => Ok((scalar, entry.type_name.as_str())),
                    _ => bail!(
                        "type map value for '{}' must be a scalar, got {}",
                        entry.type_name,
                        entry.value
                    ),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub path: String,
    pub equals: toml::Value,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A schema with every type reference resolved and the resolver built.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub root: Arc<TypeDescriptor>,
    pub types: IndexMap<String, Arc<TypeDescriptor>>,
    pub resolver: Resolver,
}

impl CompiledSchema {
    /// A fresh decoding target: the zero value of the root type.
    pub fn target(&self) -> Node {
        self.root.zero_value()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum KindSpec {
    Bool,
    Integer,
    Float,
    String,
    Any,
    Mapping,
    Sequence(Box<KindSpec>),
    Optional(Box<KindSpec>),
    Named(String),
}

fn parse_kind(text: &str) -> Result<KindSpec> {
    let text = text.trim();
    if let Some(inner) = text.strip_suffix('?') {
        return Ok(KindSpec::Optional(Box::new(parse_kind(inner)?)));
    }
    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return Ok(KindSpec::Sequence(Box::new(parse_kind(inner)?)));
    }
    Ok(match text {
        "" => bail!("empty field kind"),
        "bool" => KindSpec::Bool,
        "integer" => KindSpec::Integer,
        "float" => KindSpec::Float,
        "string" => KindSpec::String,
        "any" => KindSpec::Any,
        "map" => KindSpec::Mapping,
        name => KindSpec::Named(name.to_string()),
    })
}

/// Converts a TOML value into a document node, for rule comparisons.
fn toml_to_node(value: &toml::Value) -> Node {
    match value {
        toml::Value::String(s) => Node::from(s.as_str()),
        toml::Value::Integer(i) => Node::from(*i),
        toml::Value::Float(f) => Node::from(*f),
        toml::Value::Boolean(b) => Node::from(*b),
        toml::Value::Datetime(dt) => Node::Scalar(Scalar::String(dt.to_string())),
        toml::Value::Array(items) => Node::Sequence(items.iter().map(toml_to_node).collect()),
        toml::Value::Table(table) => Node::Mapping(
            table
                .iter()
                .map(|(key, value)| (key.clone(), toml_to_node(value)))
                .collect(),
        ),
    }
}

struct Compiler<'a> {
    specs: &'a IndexMap<String, IndexMap<String, String>>,
    built: IndexMap<String, Arc<TypeDescriptor>>,
    visiting: Vec<String>,
}

impl Compiler<'_> {
    fn type_named(&mut self, name: &str) -> Result<Arc<TypeDescriptor>> {
        if let Some(descriptor) = self.built.get(name) {
            return Ok(descriptor.clone());
        }
        if let Some(start) = self.visiting.iter().position(|n| n == name) {
            let mut cycle = self.visiting[start..].to_vec();
            cycle.push(name.to_string());
            bail!("type cycle: {}", cycle.join(" -> "));
        }
        let specs = self.specs;
        let fields = specs
            .get(name)
            .ok_or_else(|| anyhow!("unknown type '{}'", name))?;

        self.visiting.push(name.to_string());
        let mut builder = TypeDescriptor::builder(name);
        for (field, kind) in fields {
            let spec = parse_kind(kind)
                .with_context(|| format!("invalid kind of field {}.{}", name, field))?;
            let kind = self
                .field_kind(&spec)
                .with_context(|| format!("in field {}.{}", name, field))?;
            builder = builder.field(field.as_str(), kind);
        }
        self.visiting.pop();

        let descriptor = builder.build();
        self.built.insert(name.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    fn field_kind(&mut self, spec: &KindSpec) -> Result<FieldKind> {
        Ok(match spec {
            KindSpec::Bool => FieldKind::Bool,
            KindSpec::Integer => FieldKind::Integer,
            KindSpec::Float => FieldKind::Float,
            KindSpec::String => FieldKind::String,
            KindSpec::Any => FieldKind::Any,
            KindSpec::Mapping => FieldKind::Mapping,
            KindSpec::Sequence(inner) => FieldKind::Sequence(Box::new(self.field_kind(inner)?)),
            KindSpec::Optional(inner) => FieldKind::Optional(Box::new(self.field_kind(inner)?)),
            KindSpec::Named(name) => FieldKind::Record(self.type_named(name)?),
        })
    }
}

impl Schema {
    /// Parses a schema from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse schema")
    }

    /// Reads and parses a schema file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema {}", path.display()))?;
        Self::parse(&text)
    }

    /// Resolves all type references and builds the resolver.
    ///
    /// `default_policy` applies when the schema itself sets none.
    pub fn compile(&self, default_policy: Policy) -> Result<CompiledSchema> {
        let mut compiler = Compiler {
            specs: &self.types,
            built: IndexMap::new(),
            visiting: Vec::new(),
        };
        // every declared type is checked, not only the reachable ones
        for name in self.types.keys() {
            compiler.type_named(name)?;
        }
        let root = compiler.type_named(&self.root).context("invalid root type")?;
        let types = compiler.built;
        let lookup = |name: &str| {
            types
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow!("unknown type '{}'", name))
        };

        let policy = self.policy.unwrap_or(default_policy);
        let spec = &self.resolver;
        let target = PolymorphismBuilder::new()
            .with_policy(policy)
            .define_type_at(&spec.target);

        let resolver = match (&spec.discriminator, spec.rules.as_slice()) {
            (Some(_), [_, ..]) => bail!("resolver must use either a discriminator or rules, not both"),
            (None, []) => bail!("resolver needs a discriminator or at least one rule"),
            (Some(discriminator), []) => {
                let mut type_map = TypeMap::new();
                for (value, type_name) in spec.type_map.pairs()? {
                    type_map.insert(value, lookup(type_name)?);
                }
                target
                    .using_type_map(type_map)
                    .with_discriminator_at(discriminator)
                    .build()?
            }
            (None, [first, rest @ ..]) => {
                let mut stage = target.using_rule(compile_rule(first, &lookup)?);
                for rule in rest {
                    stage = stage.using_rule(compile_rule(rule, &lookup)?);
                }
                stage.build()?
            }
        };

        tracing::debug!(root = root.name(), types = types.len(), "compiled schema");
        Ok(CompiledSchema {
            root,
            types,
            resolver,
        })
    }
}

fn compile_rule(
    spec: &RuleSpec,
    lookup: &impl Fn(&str) -> Result<Arc<TypeDescriptor>>,
) -> Result<crate::resolver::Rule> {
    let rule = RuleBuilder::new()
        .when_value_at(&spec.path)
        .is_equal_to(toml_to_node(&spec.equals))
        .then_assign_type(lookup(&spec.type_name)?)
        .build()?;
    Ok(rule)
}
