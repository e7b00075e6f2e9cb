//! Entity class metadata
//!
//! The generator only needs the identifier, the mapped fields and the
//! associations of an entity. They are read from the Doctrine YAML mapping
//! shipped with the bundle (`Resources/config/doctrine/<Entity>.orm.yml`).

use crate::bundle::Bundle;
use crate::error::{Result, ScaffoldError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;

/// A mapped scalar field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub name: String,
    pub field_type: String,
    pub nullable: bool,
}

/// Cardinality of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    ManyToOne,
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl AssociationKind {
    /// Whether the owning side holds a single related entity
    pub fn is_to_one(&self) -> bool {
        matches!(self, AssociationKind::ManyToOne | AssociationKind::OneToOne)
    }
}

/// A mapped association to another entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationMapping {
    pub name: String,
    /// Fully-qualified class of the related entity
    pub target_entity: String,
    pub kind: AssociationKind,
}

/// What the generator knows about an entity class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    /// Fully-qualified class name
    pub name: String,
    /// Identifier field names, in mapping order
    pub identifier: Vec<String>,
    pub fields: Vec<FieldMapping>,
    pub associations: Vec<AssociationMapping>,
}

/// Source of entity metadata
pub trait MetadataProvider {
    /// Metadata of `entity` (bundle-relative, `\`-delimited) living in `bundle`
    fn class_metadata(&self, bundle: &Bundle, entity: &str) -> Result<ClassMetadata>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityMapping {
    #[serde(default)]
    id: IndexMap<String, Option<serde_yaml::Value>>,
    #[serde(default)]
    fields: IndexMap<String, Option<FieldSpec>>,
    #[serde(default)]
    many_to_one: IndexMap<String, AssociationSpec>,
    #[serde(default)]
    one_to_one: IndexMap<String, AssociationSpec>,
    #[serde(default)]
    one_to_many: IndexMap<String, AssociationSpec>,
    #[serde(default)]
    many_to_many: IndexMap<String, AssociationSpec>,
}

#[derive(Debug, Deserialize)]
struct FieldSpec {
    #[serde(rename = "type", default = "default_field_type")]
    field_type: String,
    #[serde(default)]
    nullable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssociationSpec {
    target_entity: String,
}

fn default_field_type() -> String {
    "string".to_string()
}

/// Reads `<bundle>/Resources/config/doctrine/<Entity>.orm.yml`
#[derive(Debug, Clone, Default)]
pub struct DoctrineYamlMetadata;

impl DoctrineYamlMetadata {
    pub fn mapping_path(bundle: &Bundle, entity: &str) -> PathBuf {
        bundle
            .config_dir()
            .join("doctrine")
            .join(format!("{}.orm.yml", entity.replace('\\', ".")))
    }

    /// Parse a mapping document. Exposed for callers that already hold the text.
    pub fn parse(path: &std::path::Path, content: &str) -> Result<ClassMetadata> {
        let document: IndexMap<String, EntityMapping> = serde_yaml::from_str(content)
            .map_err(|e| ScaffoldError::yaml(path, content, &e))?;

        let (class_name, mapping) = document.into_iter().next().ok_or_else(|| ScaffoldError::Parse {
            path: path.to_path_buf(),
            message: "mapping document does not declare an entity".to_string(),
            line: None,
            snippet: None,
        })?;

        let entity_namespace = class_name
            .rsplit_once('\\')
            .map(|(ns, _)| ns.to_string())
            .unwrap_or_default();
        let qualify = |target: &str| {
            if target.contains('\\') || entity_namespace.is_empty() {
                target.trim_start_matches('\\').to_string()
            } else {
                format!("{}\\{}", entity_namespace, target)
            }
        };

        let fields = mapping
            .fields
            .into_iter()
            .map(|(name, spec)| {
                let (field_type, nullable) = spec
                    .map(|s| (s.field_type, s.nullable))
                    .unwrap_or_else(|| (default_field_type(), false));
                FieldMapping {
                    name,
                    field_type,
                    nullable,
                }
            })
            .collect();

        let mut associations = Vec::new();
        for (kind, group) in [
            (AssociationKind::ManyToOne, mapping.many_to_one),
            (AssociationKind::OneToOne, mapping.one_to_one),
            (AssociationKind::OneToMany, mapping.one_to_many),
            (AssociationKind::ManyToMany, mapping.many_to_many),
        ] {
            for (name, spec) in group {
                associations.push(AssociationMapping {
                    name,
                    target_entity: qualify(&spec.target_entity),
                    kind,
                });
            }
        }

        Ok(ClassMetadata {
            name: class_name,
            identifier: mapping.id.into_keys().collect(),
            fields,
            associations,
        })
    }
}

impl MetadataProvider for DoctrineYamlMetadata {
    fn class_metadata(&self, bundle: &Bundle, entity: &str) -> Result<ClassMetadata> {
        let path = Self::mapping_path(bundle, entity);
        if !path.exists() {
            return Err(ScaffoldError::MetadataNotFound {
                entity: format!("{}:{}", bundle.name, entity),
                path,
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ScaffoldError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "read doctrine mapping");
        Self::parse(&path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const POST_MAPPING: &str = r#"
Acme\BlogBundle\Entity\Post:
    type: entity
    table: post
    id:
        id:
            type: integer
            generator:
                strategy: AUTO
    fields:
        title:
            type: string
            length: 255
        body:
            type: text
            nullable: true
        slug: ~
    manyToOne:
        author:
            targetEntity: User
    oneToMany:
        comments:
            targetEntity: Acme\BlogBundle\Entity\Comment
            mappedBy: post
"#;

    #[test]
    fn test_parse_mapping() {
        let meta = DoctrineYamlMetadata::parse(Path::new("Post.orm.yml"), POST_MAPPING).unwrap();
        assert_eq!(meta.name, "Acme\\BlogBundle\\Entity\\Post");
        assert_eq!(meta.identifier, vec!["id"]);
        let names: Vec<&str> = meta.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "body", "slug"]);
        assert!(meta.fields[1].nullable);
        assert_eq!(meta.fields[2].field_type, "string");

        assert_eq!(meta.associations.len(), 2);
        assert_eq!(meta.associations[0].target_entity, "Acme\\BlogBundle\\Entity\\User");
        assert!(meta.associations[0].kind.is_to_one());
        assert_eq!(meta.associations[1].kind, AssociationKind::OneToMany);
    }

    #[test]
    fn test_composite_identifier_is_kept() {
        let mapping = "Acme\\Entity\\Link:\n    id:\n        left: { type: integer }\n        right: { type: integer }\n";
        let meta = DoctrineYamlMetadata::parse(Path::new("Link.orm.yml"), mapping).unwrap();
        assert_eq!(meta.identifier, vec!["left", "right"]);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = DoctrineYamlMetadata::parse(Path::new("Bad.orm.yml"), "foo: [").unwrap_err();
        assert!(matches!(err, ScaffoldError::Parse { .. }));
    }

    #[test]
    fn test_missing_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = Bundle::new("AcmeBlogBundle", "Acme\\BlogBundle", dir.path());
        let err = DoctrineYamlMetadata
            .class_metadata(&bundle, "Blog\\Post")
            .unwrap_err();
        match err {
            ScaffoldError::MetadataNotFound { path, .. } => {
                assert!(path.ends_with("Resources/config/doctrine/Blog.Post.orm.yml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
