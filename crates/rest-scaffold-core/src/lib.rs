//! REST scaffolding for Doctrine entities
//!
//! Given an entity of a Symfony bundle, this library generates the REST layer
//! around it: a FOSRest controller, a persistence handler, a form type, optional
//! functional tests, and the wiring that makes them reachable (routing import,
//! handler service declaration, services loader in the bundle extension).
//!
//! # Architecture
//!
//! - **Naming** ([`naming`], [`actions`], [`entity`]): pure derivations such as
//!   route prefixes, roles, service ids and routing keys
//! - **Lookups** ([`bundle`], [`metadata`]): traits for resolving bundles and entity
//!   metadata, with implementations reading a project's `src/` tree and Doctrine
//!   YAML mappings
//! - **Writing** ([`templates`], [`manipulator`], [`generator`]): skeleton rendering,
//!   idempotent document edits and the orchestrating generator
//! - **Front ends** ([`command`], `tui`): the generate command, with optional
//!   cliclack prompts
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use rest_scaffold_core::{DoctrineRestGenerator, SkeletonRenderer};
//!
//! let generator = DoctrineRestGenerator::new(SkeletonRenderer::new(), project_dir);
//! let report = generator.generate(&request)?;
//! for step in &report.manual_steps {
//!     println!("{}", step);
//! }
//! ```

pub mod actions;
pub mod bundle;
pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod format;
pub mod fs_utils;
pub mod generator;
pub mod manipulator;
pub mod metadata;
pub mod naming;
pub mod product;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use command::{execute, GenerateArgs};
pub use error::{Result, ScaffoldError};
pub use format::{FormatOptions, RouteFormat, ServiceFormat, TestMode};
pub use generator::{DoctrineRestGenerator, GenerationPlan, GenerationReport, GenerationRequest};
pub use product::ProductConfig;
pub use templates::{SkeletonRenderer, TemplateRenderer};

#[cfg(feature = "tui")]
pub use tui::run;
