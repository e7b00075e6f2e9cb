//! Bundle extension class (`DependencyInjection/<Bundle>Extension.php`)
//!
//! The loader statement is inserted by a literal text search: the closing brace
//! of `load()` must be the first line consisting of four spaces and `}` after
//! `function load(`. This is the shape of the extension skeleton and of the
//! classes generated by the framework; anything else is reported as
//! [`ScaffoldError::ExtensionLayout`] instead of being guessed at.

use crate::bundle::Bundle;
use crate::error::{Result, ScaffoldError};
use crate::format::ServiceFormat;
use crate::fs_utils;
use crate::templates::{skeleton, TemplateRenderer};
use minijinja::context;
use regex::Regex;
use std::path::{Path, PathBuf};

const LOAD_METHOD: &str = "function load(";
const METHOD_CLOSE: &str = "\n    }";

/// Registers the bundle services document with the extension's `load()` method
#[derive(Debug, Clone)]
pub struct ExtensionManipulator {
    path: PathBuf,
}

impl ExtensionManipulator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_bundle(bundle: &Bundle) -> Self {
        Self::new(bundle.extension_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure `load()` loads `services.<format>`, rendering the extension
    /// class first if the bundle has none. Returns whether the file changed.
    pub fn ensure_loader<R: TemplateRenderer + ?Sized>(
        &self,
        renderer: &R,
        bundle: &Bundle,
        format: ServiceFormat,
    ) -> Result<bool> {
        let mut created = false;
        if !self.path.exists() {
            renderer.render_file(
                skeleton::EXTENSION,
                &self.path,
                &context! {
                    namespace => &bundle.namespace,
                    bundle => &bundle.name,
                    extension_class => bundle.extension_class(),
                },
            )?;
            created = true;
        }

        let content = fs_utils::read_to_string(&self.path)?;
        let file_name = format.file_name();
        let existing = Regex::new(&format!(r#"->load\(\s*["']{}["']"#, regex::escape(&file_name)))
            .map_err(|e| self.layout_error(&e.to_string()))?;
        if existing.is_match(&content) {
            return Ok(created);
        }

        let method = content
            .find(LOAD_METHOD)
            .ok_or_else(|| self.layout_error("no load() method found"))?;
        let close = content[method..]
            .find(METHOD_CLOSE)
            .map(|offset| method + offset)
            .ok_or_else(|| self.layout_error("the closing brace of load() was not found"))?;

        let statement = format!(
            "\n        $loader = new \\Symfony\\Component\\DependencyInjection\\Loader\\{}($container, new \\Symfony\\Component\\Config\\FileLocator(__DIR__.'/../Resources/config'));\n        $loader->load('{}');",
            format.loader_class(),
            file_name
        );

        let mut patched = String::with_capacity(content.len() + statement.len());
        patched.push_str(&content[..close]);
        patched.push_str(&statement);
        patched.push_str(&content[close..]);
        fs_utils::write_file(&self.path, &patched)?;
        tracing::info!(path = %self.path.display(), file = %file_name, "registered services loader");
        Ok(true)
    }

    fn layout_error(&self, reason: &str) -> ScaffoldError {
        ScaffoldError::ExtensionLayout {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
