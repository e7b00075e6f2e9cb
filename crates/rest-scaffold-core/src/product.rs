//! Product configuration trait for CLI binaries
//!
//! A binary built on this library implements [`ProductConfig`] to set its
//! identity, the prefix of generated route names and where users may put
//! skeleton overrides.

use crate::format::TestMode;
use crate::generator::{GenerationReport, DEFAULT_ORG_PREFIX};

/// Configuration trait for scaffolding products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Environment variable pointing at an extra skeleton override directory
    fn skeleton_dir_env(&self) -> &'static str;

    /// Directory under a bundle's or the app's `Resources/` holding skeleton overrides
    fn skeleton_namespace(&self) -> &'static str {
        "RestScaffold"
    }

    /// Prefix of every generated route name
    fn org_prefix(&self) -> &'static str {
        DEFAULT_ORG_PREFIX
    }

    /// Follow-up instructions printed after a successful generation
    fn next_steps(&self, report: &GenerationReport, test_mode: TestMode) -> Vec<String>;
}
