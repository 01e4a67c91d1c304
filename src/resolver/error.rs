//! Errors raised while building resolvers or when no type can be resolved.

use std::fmt;

use crate::objectpath::{ParseError, PathError};

/// Which path of a resolver configuration an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Target,
    Discriminator,
    RuleValue,
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathRole::Target => write!(f, "target path"),
            PathRole::Discriminator => write!(f, "discriminator path"),
            PathRole::RuleValue => write!(f, "rule value path"),
        }
    }
}

/// A single problem found while assembling a resolver or rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The path string does not parse.
    InvalidPath {
        role: PathRole,
        input: String,
        source: ParseError,
    },
    /// The path parses but cannot be anchored at its reference path.
    InvalidAnchor {
        role: PathRole,
        input: String,
        source: PathError,
    },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::InvalidPath {
                role,
                input,
                source,
            } => write!(f, "invalid {} \"{}\": {}", role, input, source),
            ConstructionError::InvalidAnchor {
                role,
                input,
                source,
            } => write!(f, "cannot anchor {} \"{}\": {}", role, input, source),
        }
    }
}

impl std::error::Error for ConstructionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConstructionError::InvalidPath { source, .. } => Some(source),
            ConstructionError::InvalidAnchor { source, .. } => Some(source),
        }
    }
}

/// Every construction problem collected by a builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    errors: Vec<ConstructionError>,
}

impl BuildError {
    pub(crate) fn new(errors: Vec<ConstructionError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ConstructionError] {
        &self.errors
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to build resolver ({} error(s))", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for BuildError {}

/// No rule matched, or the discriminator value is not in the type map.
///
/// Only returned by resolvers using [`Policy::Strict`](super::Policy::Strict).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTypeError {
    target_path: String,
    reason: String,
}

impl UnresolvedTypeError {
    pub fn new(target_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
            reason: reason.into(),
        }
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for UnresolvedTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unresolved type error at [{}]: {}",
            self.target_path, self.reason
        )
    }
}

impl std::error::Error for UnresolvedTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_lists_every_problem() {
        let err = BuildError::new(vec![
            ConstructionError::InvalidPath {
                role: PathRole::Target,
                input: "fo#".to_string(),
                source: ParseError::EmptyElement { position: 0 },
            },
            ConstructionError::InvalidAnchor {
                role: PathRole::Discriminator,
                input: "../..".to_string(),
                source: PathError::EscapesRoot { index: 0 },
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("2 error(s)"));
        assert!(msg.contains("invalid target path \"fo#\""));
        assert!(msg.contains("cannot anchor discriminator path"));
    }

    #[test]
    fn test_unresolved_type_message() {
        let err = UnresolvedTypeError::new("/\"payload\"", "no rule matched");
        assert_eq!(
            err.to_string(),
            "unresolved type error at [/\"payload\"]: no rule matched"
        );
    }
}
