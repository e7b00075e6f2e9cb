//! Read-modify-write edits of the shared project documents
//!
//! Each manipulator owns one document (application routing, bundle services,
//! bundle extension class) and applies an idempotent edit to it. Documents are
//! read whole, edited in memory and written back whole.

pub mod extension;
pub mod routing;
pub mod services;

pub use extension::ExtensionManipulator;
pub use routing::{AnnotationImport, RoutingManipulator};
pub use services::{ServiceDefinition, ServiceManipulator};
