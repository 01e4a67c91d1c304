//! Crate-level error type.
//!
//! Navigation failures are wrapped together with the resolver operation that
//! hit them, so callers see both what failed and where in the document.

use std::fmt;

use crate::decode::DecodeError;
use crate::document::navigator::NavigationError;
use crate::resolver::error::{BuildError, UnresolvedTypeError};

/// The resolver step a navigation failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadDiscriminator,
    EvaluateRule { index: usize },
    AssignType,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ReadDiscriminator => write!(f, "error getting discriminator value"),
            Operation::EvaluateRule { index } => write!(f, "error applying rule {}", index),
            Operation::AssignType => write!(f, "error assigning type to target"),
        }
    }
}

/// Errors returned by resolvers and the decoding entry points.
#[derive(Debug)]
pub enum Error {
    Navigation {
        operation: Operation,
        source: NavigationError,
    },
    UnresolvedType(UnresolvedTypeError),
    Construction(BuildError),
    Decode(DecodeError),
    Json(serde_json::Error),
}

impl Error {
    pub(crate) fn navigation(operation: Operation) -> impl FnOnce(NavigationError) -> Error {
        move |source| Error::Navigation { operation, source }
    }

    /// Returns true when resolution finished without finding a type.
    ///
    /// Callers use this to decide whether a missing polymorphic type is
    /// acceptable.
    pub fn is_unresolved_type(&self) -> bool {
        matches!(self, Error::UnresolvedType(_))
    }

    pub fn as_unresolved_type(&self) -> Option<&UnresolvedTypeError> {
        match self {
            Error::UnresolvedType(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Navigation { operation, source } => write!(f, "{}: {}", operation, source),
            Error::UnresolvedType(err) => write!(f, "{}", err),
            Error::Construction(err) => write!(f, "{}", err),
            Error::Decode(err) => write!(f, "error decoding document: {}", err),
            Error::Json(err) => write!(f, "error parsing JSON: {}", err),
        }
    }
}

// Display already renders the wrapped error, so no source is exposed.
impl std::error::Error for Error {}

impl From<UnresolvedTypeError> for Error {
    fn from(err: UnresolvedTypeError) -> Self {
        Error::UnresolvedType(err)
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Self {
        Error::Construction(err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::navigator::get_value_at;
    use crate::document::parser::parse_json;
    use crate::objectpath::ObjectPath;

    #[test]
    fn test_navigation_error_names_operation() {
        let doc = parse_json(r#"{"a": 1}"#).unwrap();
        let source = get_value_at(&doc, &ObjectPath::parse("b").unwrap()).unwrap_err();
        let err = Error::navigation(Operation::EvaluateRule { index: 2 })(source);
        assert!(err.to_string().starts_with("error applying rule 2: "));
        assert!(!err.is_unresolved_type());
    }

    #[test]
    fn test_unresolved_type_is_recognised() {
        let err = Error::from(UnresolvedTypeError::new("/\"payload\"", "no rule matched"));
        assert!(err.is_unresolved_type());
        assert_eq!(
            err.as_unresolved_type().map(|e| e.reason()),
            Some("no rule matched")
        );
    }
}
