//! Document trees and navigation.
//!
//! - [`node`] - the [`Node`] tree that paths are evaluated against
//! - [`navigator`] - reading values and assigning types at a path
//! - [`parser`] - JSON / YAML text to [`Node`]

pub mod navigator;
pub mod node;
pub mod parser;

pub use navigator::{assign_type_at, get_value_at, get_value_at_mut, NavigationError, NavigationErrorKind};
pub use node::{Node, Record, Scalar};
