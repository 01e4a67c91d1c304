//! Structural decoding of generic documents into typed records.
//!
//! A resolver only decides which type a slot holds; the decoder then fills
//! the record tree from the source document, field by field, guided by each
//! record's descriptor. Source keys match field names case-insensitively and
//! unknown keys are ignored.
//!
//! # Example
//!
//! ```
//! use polydecode::decode::unmarshal_json;
//! use polydecode::resolver::{PolymorphismBuilder, RuleBuilder};
//! use polydecode::types::{FieldKind, TypeDescriptor};
//!
//! let ping = TypeDescriptor::builder("Ping").field("Seq", FieldKind::Integer).build();
//! let message = TypeDescriptor::builder("Message")
//!     .field("Kind", FieldKind::String)
//!     .field("Body", FieldKind::Any)
//!     .build();
//! let rule = RuleBuilder::new()
//!     .when_value_at("kind")
//!     .is_equal_to("ping")
//!     .then_assign_type(ping)
//!     .build()
//!     .unwrap();
//! let resolver = PolymorphismBuilder::new()
//!     .define_type_at("body")
//!     .using_rule(rule)
//!     .build()
//!     .unwrap();
//!
//! let mut target = message.zero_value();
//! unmarshal_json(&resolver, r#"{"kind": "ping", "body": {"seq": 7}}"#, &mut target).unwrap();
//! assert_eq!(target.get("body").and_then(|b| b.get("seq")).and_then(|s| s.as_i64()), Some(7));
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::document::node::{Node, Record, Scalar};
use crate::document::parser::parse_json;
use crate::error::Error;
use crate::resolver::TypeResolver;
use crate::types::descriptor::FieldKind;

/// A source value that does not fit the declared kind of its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    field: String,
    expected: String,
    found: String,
}

impl DecodeError {
    fn new(field: &str, expected: impl fmt::Display, found: &Node) -> Self {
        Self {
            field: if field.is_empty() {
                "<root>".to_string()
            } else {
                field.to_string()
            },
            expected: expected.to_string(),
            found: found.kind_name().to_string(),
        }
    }

    /// Dotted field path from the decoded root, e.g. `Specifics.Shoes`.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn found(&self) -> &str {
        &self.found
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field {}: expected {}, found {}",
            self.field, self.expected, self.found
        )
    }
}

impl std::error::Error for DecodeError {}

/// Decodes `source` into `target`.
///
/// Record targets are filled field by field. Mapping targets are merged key
/// by key, so records a resolver placed inside them are decoded in place.
/// Any other target is replaced by a copy of `source`. A null source leaves
/// `target` unchanged.
pub fn decode_into(source: &Node, target: &mut Node) -> Result<(), DecodeError> {
    let source = source.unwrap_indirection();
    if source.is_null() {
        return Ok(());
    }
    decode_slot(source, target, "")
}

/// Resolves the polymorphic slot of `target`, then decodes `source` into it.
///
/// Returns whether the resolver assigned a type. Under a soft policy the
/// document is decoded even when it did not.
pub fn decode<R>(resolver: &R, source: &Node, target: &mut Node) -> Result<bool, Error>
where
    R: TypeResolver + ?Sized,
{
    let applied = resolver.assign_target_type(source, target)?;
    decode_into(source, target)?;
    Ok(applied)
}

/// Parses `text` as JSON and hands it to [`decode`].
pub fn unmarshal_json<R>(resolver: &R, text: &str, target: &mut Node) -> Result<bool, Error>
where
    R: TypeResolver + ?Sized,
{
    let source = parse_json(text)?;
    decode(resolver, &source, target)
}

fn lookup<'a>(source: &'a Node, name: &str) -> Option<&'a Node> {
    match source {
        Node::Mapping(map) => map.get(name).or_else(|| {
            let wanted = name.to_lowercase();
            map.iter()
                .find(|(key, _)| key.to_lowercase() == wanted)
                .map(|(_, value)| value)
        }),
        Node::Record(record) => record.field(name),
        _ => None,
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn decode_record(source: &Node, record: &mut Record, prefix: &str) -> Result<(), DecodeError> {
    if !matches!(source, Node::Mapping(_) | Node::Record(_)) {
        return Err(DecodeError::new(prefix, record.type_name(), source));
    }

    let descriptor = record.descriptor().clone();
    for field in descriptor.fields() {
        let Some(value) = lookup(source, field.name()) else {
            continue;
        };
        let path = join(prefix, field.name());
        decode_value(field.kind(), value, record.slot_mut(field.name()), &path)?;
    }
    Ok(())
}

/// Decodes into a slot of no declared kind.
fn decode_slot(source: &Node, slot: &mut Node, field: &str) -> Result<(), DecodeError> {
    let source = source.unwrap_indirection();
    let slot = slot.unwrap_indirection_mut();
    match &mut *slot {
        // a resolver already picked the type
        Node::Record(_) if source.is_null() => return Ok(()),
        Node::Record(record) => return decode_record(source, record, field),
        Node::Mapping(entries) => {
            if let Node::Mapping(values) = source {
                return decode_mapping(values, entries, field);
            }
        }
        _ => {}
    }
    *slot = source.clone();
    Ok(())
}

fn decode_mapping(
    source: &IndexMap<String, Node>,
    target: &mut IndexMap<String, Node>,
    prefix: &str,
) -> Result<(), DecodeError> {
    for (key, value) in source {
        match target.get_mut(key) {
            Some(slot) => decode_slot(value, slot, &join(prefix, key))?,
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(())
}

fn decode_value(kind: &FieldKind, source: &Node, slot: &mut Node, field: &str) -> Result<(), DecodeError> {
    let source = source.unwrap_indirection();
    if source.is_null() {
        return Ok(());
    }

    let mismatch = || DecodeError::new(field, kind, source);
    match kind {
        FieldKind::Bool => match source.as_scalar() {
            Some(Scalar::Bool(b)) => *slot = Node::from(*b),
            _ => return Err(mismatch()),
        },
        FieldKind::Integer => match source.as_scalar() {
            Some(Scalar::Integer(i)) => *slot = Node::from(*i),
            Some(Scalar::Float(f)) if is_integral(*f) => *slot = Node::from(*f as i64),
            _ => return Err(mismatch()),
        },
        FieldKind::Float => match source.as_scalar() {
            Some(Scalar::Float(f)) => *slot = Node::from(*f),
            Some(Scalar::Integer(i)) => *slot = Node::from(*i as f64),
            _ => return Err(mismatch()),
        },
        FieldKind::String => match source.as_scalar() {
            Some(Scalar::String(s)) => *slot = Node::from(s.as_str()),
            _ => return Err(mismatch()),
        },
        FieldKind::Mapping => match source {
            Node::Mapping(_) => *slot = source.clone(),
            _ => return Err(mismatch()),
        },
        FieldKind::Sequence(inner) => {
            let Node::Sequence(items) = source else {
                return Err(mismatch());
            };
            let mut decoded = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let mut value = inner.zero_value();
                decode_value(inner, item, &mut value, &format!("{}[{}]", field, index))?;
                decoded.push(value);
            }
            *slot = Node::Sequence(decoded);
        }
        FieldKind::Optional(inner) => {
            let mut value = inner.zero_value();
            decode_value(inner, source, &mut value, field)?;
            *slot = Node::indirect(value);
        }
        FieldKind::Record(descriptor) => {
            let fresh = !matches!(
                slot.as_record(),
                Some(record) if record.type_name() == descriptor.name()
            );
            if fresh {
                *slot = descriptor.zero_value();
            }
            if let Some(record) = slot.as_record_mut() {
                decode_record(source, record, field)?;
            }
        }
        FieldKind::Any => decode_slot(source, slot, field)?,
    }
    Ok(())
}

fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}
