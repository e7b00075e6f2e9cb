//! Skeleton rendering
//!
//! Skeletons are minijinja templates. Every skeleton ships with the crate and can
//! be overridden by dropping a file with the same relative name (for example
//! `rest/controller.php.twig`) into one of the override directories. Directories
//! are searched in the order they were added, built-ins last.

pub mod skeleton;

use crate::error::{Result, ScaffoldError};
use crate::fs_utils;
use minijinja::{AutoEscape, Environment, Value};
use std::path::{Path, PathBuf};

/// Renders named skeletons with a context
pub trait TemplateRenderer {
    fn render(&self, name: &str, context: &Value) -> Result<String>;

    /// Render `name` and write the result to `target`
    fn render_file(&self, name: &str, target: &Path, context: &Value) -> Result<()> {
        let content = self.render(name, context)?;
        fs_utils::write_file(target, &content)?;
        tracing::debug!(template = name, target = %target.display(), "rendered skeleton");
        Ok(())
    }
}

/// minijinja-backed renderer over the built-in skeletons and override directories
pub struct SkeletonRenderer {
    env: Environment<'static>,
}

impl SkeletonRenderer {
    /// Renderer using only the built-in skeletons
    pub fn new() -> Self {
        Self::with_overrides(Vec::new())
    }

    pub fn with_overrides(override_dirs: Vec<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        // generated PHP and YAML, never HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("lcfirst", lcfirst);

        env.set_loader(move |name| {
            for dir in override_dirs.iter() {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return std::fs::read_to_string(&candidate).map(Some).map_err(|e| {
                        minijinja::Error::new(
                            minijinja::ErrorKind::InvalidOperation,
                            format!("could not read {}", candidate.display()),
                        )
                        .with_source(e)
                    });
                }
            }
            Ok(skeleton::builtin(name).map(str::to_string))
        });

        Self { env }
    }

    fn template_error(name: &str, source: minijinja::Error) -> ScaffoldError {
        ScaffoldError::Template {
            name: name.to_string(),
            source,
        }
    }
}

impl Default for SkeletonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for SkeletonRenderer {
    fn render(&self, name: &str, context: &Value) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| Self::template_error(name, e))?;
        template
            .render(context)
            .map_err(|e| Self::template_error(name, e))
    }
}

/// `PostRESTHandler` -> `postRESTHandler`
fn lcfirst(value: String) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => value,
    }
}
