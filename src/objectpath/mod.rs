//! Object paths: a small addressing language for locations inside a document.
//!
//! # Syntax
//!
//! - `/` at the start - the path is absolute (anchored at the document root)
//! - `name` - unquoted identifier: a letter followed by letters and digits
//! - `"any text"` - quoted identifier, may be empty; `\` escapes the next character
//! - `.` - the current node
//! - `..` - the parent node
//!
//! Elements are separated by `/`. A trailing `/` is ignored, two consecutive
//! slashes are an error (write `""` for an empty name).
//!
//! # Examples
//!
//! ```
//! use polydecode::objectpath::ObjectPath;
//!
//! let mut path = ObjectPath::parse("../type").unwrap();
//! let target = ObjectPath::parse("/payload/body").unwrap();
//! path.to_absolute(&target).unwrap();
//! assert_eq!(path.to_string(), r#"/"payload"/"type""#);
//! ```

pub mod element;
pub mod error;
pub mod parser;
pub mod path;

pub use element::{Element, ElementKind};
pub use error::{ParseError, PathError};
pub use parser::Parser;
pub use path::ObjectPath;
