//! Symfony bundle lookup
//!
//! A bundle is identified by its short name (`AcmeBlogBundle`). Its namespace and
//! location are found by scanning the project's `src/` tree for the bundle class
//! file, the same way the kernel's autoloader would find it.

use crate::error::{Result, ScaffoldError};
use crate::naming;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A resolved bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Short name, e.g. `AcmeBlogBundle`
    pub name: String,
    /// PHP namespace, e.g. `Acme\BlogBundle`
    pub namespace: String,
    /// Directory holding the bundle class
    pub path: PathBuf,
}

impl Bundle {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// `AcmeBlogBundle` -> `AcmeBlog`
    pub fn base_name(&self) -> &str {
        naming::strip_bundle_suffix(&self.name)
    }

    /// `AcmeBlogExtension`
    pub fn extension_class(&self) -> String {
        format!("{}Extension", self.base_name())
    }

    pub fn extension_path(&self) -> PathBuf {
        self.path
            .join("DependencyInjection")
            .join(format!("{}.php", self.extension_class()))
    }

    pub fn config_dir(&self) -> PathBuf {
        self.path.join("Resources").join("config")
    }
}

/// Resolve bundle names to bundles
pub trait BundleResolver {
    fn resolve(&self, name: &str) -> Result<Bundle>;
}

/// Finds bundles by walking a PSR-4 source directory
#[derive(Debug, Clone)]
pub struct SourceTree {
    src_dir: PathBuf,
}

impl SourceTree {
    pub fn new(src_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
        }
    }
}

impl BundleResolver for SourceTree {
    fn resolve(&self, name: &str) -> Result<Bundle> {
        let file_name = format!("{}.php", name);

        for entry in WalkDir::new(&self.src_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() || entry.file_name().to_string_lossy() != file_name {
                continue;
            }

            let Some(dir) = entry.path().parent() else {
                continue;
            };
            let Ok(relative) = dir.strip_prefix(&self.src_dir) else {
                continue;
            };

            let segments: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();

            // The bundle name is its namespace with the separators removed
            if segments.concat() == name {
                tracing::debug!(bundle = name, path = %dir.display(), "resolved bundle");
                return Ok(Bundle::new(name, segments.join("\\"), dir));
            }
        }

        Err(ScaffoldError::BundleNotFound {
            name: name.to_string(),
            search_root: self.src_dir.clone(),
        })
    }
}

/// Split `AcmeBlogBundle:Blog/Post` into (`AcmeBlogBundle`, `Blog\Post`)
pub fn parse_shortcut_notation(shortcut: &str) -> Result<(String, String)> {
    let shortcut = shortcut.trim();
    match shortcut.split_once(':') {
        Some((bundle, entity)) if !bundle.is_empty() && !entity.is_empty() => {
            Ok((bundle.to_string(), entity.replace('/', "\\")))
        }
        _ => Err(ScaffoldError::config(format!(
            "The entity name must contain a : (\"{}\" given, expecting something like AcmeBlogBundle:Blog/Post)",
            shortcut
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_shortcut_notation() {
        let (bundle, entity) = parse_shortcut_notation("AcmeBlogBundle:Blog/Post").unwrap();
        assert_eq!(bundle, "AcmeBlogBundle");
        assert_eq!(entity, "Blog\\Post");
    }

    #[test]
    fn test_parse_shortcut_requires_colon() {
        assert!(matches!(
            parse_shortcut_notation("AcmeBlogBundle"),
            Err(ScaffoldError::Configuration(_))
        ));
        assert!(parse_shortcut_notation("AcmeBlogBundle:").is_err());
    }

    #[test]
    fn test_bundle_naming() {
        let bundle = Bundle::new("AcmeBlogBundle", "Acme\\BlogBundle", "/src/Acme/BlogBundle");
        assert_eq!(bundle.base_name(), "AcmeBlog");
        assert_eq!(bundle.extension_class(), "AcmeBlogExtension");
        assert!(bundle
            .extension_path()
            .ends_with("DependencyInjection/AcmeBlogExtension.php"));
    }

    #[test]
    fn test_source_tree_resolves_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let bundle_dir = dir.path().join("src/Acme/BlogBundle");
        fs::create_dir_all(&bundle_dir).unwrap();
        fs::write(bundle_dir.join("AcmeBlogBundle.php"), "<?php\n").unwrap();

        let tree = SourceTree::new(dir.path().join("src"));
        let bundle = tree.resolve("AcmeBlogBundle").unwrap();
        assert_eq!(bundle.namespace, "Acme\\BlogBundle");
        assert_eq!(bundle.path, bundle_dir);
    }

    #[test]
    fn test_source_tree_missing_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let tree = SourceTree::new(dir.path());
        assert!(matches!(
            tree.resolve("NopeBundle"),
            Err(ScaffoldError::BundleNotFound { .. })
        ));
    }
}
