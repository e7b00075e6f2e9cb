//! Application routing document (`app/config/routing.yml`)

use crate::error::{Result, ScaffoldError};
use crate::fs_utils;
use crate::naming;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Imports generated controllers as `rest` resources.
///
/// New groups are prepended so the most recently generated entity comes first.
/// A group key that is already present is never touched: the caller gets
/// [`ScaffoldError::DuplicateRoute`] and is expected to turn it into manual
/// import instructions.
#[derive(Debug, Clone)]
pub struct RoutingManipulator {
    path: PathBuf,
}

impl RoutingManipulator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Import `controller` (bundle-relative, e.g. `Controller/Post/PostRESTController.php`)
    /// of `bundle` under the group derived from `bundle`, `prefix` and `entity`
    pub fn add_resource(
        &self,
        bundle: &str,
        prefix: &str,
        entity: &str,
        controller: &str,
    ) -> Result<bool> {
        let key = naming::routing_group_key(bundle, prefix, entity);
        let current = fs_utils::read_or_empty(&self.path)?;

        if current.lines().any(|line| line.trim_end() == format!("{}:", key)) {
            return Err(ScaffoldError::DuplicateRoute {
                bundle: bundle.to_string(),
                key,
                path: self.path.clone(),
            });
        }

        let entry = format!(
            "{}:\n    resource: \"@{}/{}\"\n    type:   rest\n    prefix:   {}\n\n",
            key, bundle, controller, prefix
        );
        fs_utils::write_file(&self.path, &format!("{}{}", entry, current))?;
        tracing::info!(key = %key, path = %self.path.display(), "imported routing resource");
        Ok(true)
    }
}

/// Imports a bundle's whole `Controller/` directory as an `annotation` resource
#[derive(Debug, Clone)]
pub struct AnnotationImport {
    path: PathBuf,
}

impl AnnotationImport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the bundle's annotation import. Returns `false` when the document
    /// already holds the same entry.
    pub fn update(&self, bundle: &str) -> Result<bool> {
        let content = fs_utils::read_or_empty(&self.path)?;
        let mut document = if content.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml::from_str::<Value>(&content)
                .map_err(|e| ScaffoldError::yaml(&self.path, &content, &e))?
            {
                Value::Mapping(mapping) => mapping,
                Value::Null => Mapping::new(),
                _ => {
                    return Err(ScaffoldError::Parse {
                        path: self.path.clone(),
                        message: "the routing document is not a mapping".to_string(),
                        line: None,
                        snippet: None,
                    })
                }
            }
        };

        let key = Value::from(naming::annotation_route_key(bundle));
        let resource = format!("@{}/Controller/", bundle);

        if let Some(Value::Mapping(existing)) = document.get(&key) {
            let same_type = existing.get("type").and_then(Value::as_str) == Some("annotation");
            let same_resource = existing.get("resource").and_then(Value::as_str) == Some(resource.as_str());
            if same_type && same_resource {
                return Ok(false);
            }
        }

        let mut entry = Mapping::new();
        entry.insert("resource".into(), resource.into());
        entry.insert("type".into(), "annotation".into());
        document.insert(key, Value::Mapping(entry));

        let serialized = serde_yaml::to_string(&document).map_err(|e| ScaffoldError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
            line: None,
            snippet: None,
        })?;
        fs_utils::write_file(&self.path, &serialized)?;
        tracing::info!(bundle, path = %self.path.display(), "updated annotation routing import");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROLLER: &str = "Controller/Post/PostRESTController.php";

    #[test]
    fn test_add_resource_creates_document() {
        let dir = tempfile::tempdir().unwrap();
        let routing = RoutingManipulator::new(dir.path().join("app/config/routing.yml"));

        assert!(routing.add_resource("BlogBundle", "/posts", "Post", CONTROLLER).unwrap());

        let content = std::fs::read_to_string(routing.path()).unwrap();
        assert_eq!(
            content,
            "blog_post_posts:\n    resource: \"@BlogBundle/Controller/Post/PostRESTController.php\"\n    type:   rest\n    prefix:   /posts\n\n"
        );
    }

    #[test]
    fn test_add_resource_prepends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.yml");
        std::fs::write(&path, "app:\n    resource: \"@AppBundle/Controller/\"\n    type: annotation\n").unwrap();

        let routing = RoutingManipulator::new(&path);
        routing.add_resource("BlogBundle", "/", "Post", CONTROLLER).unwrap();
        routing
            .add_resource("BlogBundle", "/", "Comment", "Controller/Comment/CommentRESTController.php")
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let keys: Vec<&str> = content
            .lines()
            .filter(|l| !l.starts_with(' ') && l.ends_with(':'))
            .collect();
        assert_eq!(keys, vec!["blog_comment:", "blog_post:", "app:"]);
    }

    #[test]
    fn test_add_resource_twice_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let routing = RoutingManipulator::new(dir.path().join("routing.yml"));
        routing.add_resource("BlogBundle", "/posts", "Post", CONTROLLER).unwrap();

        let err = routing
            .add_resource("BlogBundle", "/posts", "Post", CONTROLLER)
            .unwrap_err();
        match err {
            ScaffoldError::DuplicateRoute { key, .. } => assert_eq!(key, "blog_post_posts"),
            other => panic!("unexpected error: {other:?}"),
        }

        let content = std::fs::read_to_string(routing.path()).unwrap();
        assert_eq!(content.matches("blog_post_posts:").count(), 1);
    }

    #[test]
    fn test_annotation_import_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let import = AnnotationImport::new(dir.path().join("routing.yml"));

        assert!(import.update("AcmeBlogBundle").unwrap());
        let first = std::fs::read_to_string(import.path()).unwrap();
        assert!(!import.update("AcmeBlogBundle").unwrap());
        let second = std::fs::read_to_string(import.path()).unwrap();
        assert_eq!(first, second);

        let doc: Value = serde_yaml::from_str(&second).unwrap();
        assert_eq!(doc["acmeblog"]["resource"].as_str(), Some("@AcmeBlogBundle/Controller/"));
        assert_eq!(doc["acmeblog"]["type"].as_str(), Some("annotation"));
    }

    #[test]
    fn test_annotation_import_replaces_stale_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.yml");
        std::fs::write(&path, "acmeblog:\n    resource: \"@Old/Controller/\"\n    type: annotation\nother:\n    resource: x\n").unwrap();

        assert!(AnnotationImport::new(&path).update("AcmeBlogBundle").unwrap());
        let doc: Value = serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["acmeblog"]["resource"].as_str(), Some("@AcmeBlogBundle/Controller/"));
        assert_eq!(doc["other"]["resource"].as_str(), Some("x"));
    }

    #[test]
    fn test_annotation_import_reports_parse_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.yml");
        std::fs::write(&path, "app:\n  resource: [unclosed\n").unwrap();

        let err = AnnotationImport::new(&path).update("AcmeBlogBundle").unwrap_err();
        assert!(matches!(err, ScaffoldError::Parse { line: Some(_), .. }));
    }
}
