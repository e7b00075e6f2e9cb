//! Entity descriptor and parent chain

use crate::error::{Result, ScaffoldError};
use crate::metadata::{AssociationMapping, ClassMetadata, FieldMapping};
use crate::naming;
use indexmap::IndexMap;
use serde::Serialize;

/// The entity a REST api is generated for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Bundle-relative name, `\`-delimited (`Blog\Post`)
    pub name: String,
    /// Fully-qualified class name (`Acme\BlogBundle\Entity\Blog\Post`)
    pub qualified_name: String,
    /// Last segment of the name (`Post`)
    pub simple_name: String,
    /// Remaining relative segments joined by `\` (`Blog`), empty for top-level entities
    pub namespace: String,
    pub identifier: Vec<String>,
    pub fields: Vec<FieldMapping>,
    pub associations: Vec<AssociationMapping>,
}

impl EntityDescriptor {
    pub fn new(name: &str, metadata: ClassMetadata) -> Self {
        let name = name.replace('/', "\\");
        let (namespace, simple_name) = match name.rsplit_once('\\') {
            Some((ns, class)) => (ns.to_string(), class.to_string()),
            None => (String::new(), name.clone()),
        };
        Self {
            name,
            qualified_name: metadata.name,
            simple_name,
            namespace,
            identifier: metadata.identifier,
            fields: metadata.fields,
            associations: metadata.associations,
        }
    }

    /// Require exactly one identifier field named `id`
    pub fn validate_identifier(&self) -> Result<()> {
        if self.identifier.len() > 1 {
            return Err(ScaffoldError::config(
                "The REST api generator does not support entity classes with multiple primary keys.",
            ));
        }
        if self.identifier.first().map(String::as_str) != Some("id") {
            return Err(ScaffoldError::config(
                "The REST api generator expects the entity object has a primary key field named \"id\" with a getId() method.",
            ));
        }
        Ok(())
    }

    /// Directory (and namespace suffix) the entity's artifacts are grouped under:
    /// the relative namespace when there is one, the class name otherwise
    pub fn artifact_dir(&self) -> String {
        if self.namespace.is_empty() {
            self.simple_name.clone()
        } else {
            self.namespace.replace('\\', "/")
        }
    }

    /// Namespace form of [`Self::artifact_dir`]
    pub fn artifact_namespace(&self) -> String {
        self.artifact_dir().replace('/', "\\")
    }

    /// Fields editable through the form: everything but the identifier
    pub fn form_fields(&self) -> impl Iterator<Item = &FieldMapping> {
        self.fields
            .iter()
            .filter(|f| !self.identifier.contains(&f.name))
    }
}

/// One ancestor of a nested resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentRoute {
    /// Entity name, e.g. `Post` or `Blog\Post`
    pub name: String,
    /// Last segment of the name
    pub class_name: String,
    /// Pluralized path segment, e.g. `posts`
    pub route: String,
    /// Route parameter holding the parent id, e.g. `postId`
    pub param: String,
    /// Property on the child pointing to the parent, e.g. `post`
    pub property: String,
}

/// Ordered ancestors of an entity, each mapped to its path segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentChain(IndexMap<String, String>);

impl ParentChain {
    pub fn new<S: AsRef<str>>(parents: &[S]) -> Self {
        let mut chain = IndexMap::new();
        for parent in parents {
            let parent = parent.as_ref().trim();
            if parent.is_empty() {
                continue;
            }
            chain
                .entry(parent.to_string())
                .or_insert_with(|| naming::pluralize(&parent.to_lowercase()));
        }
        Self(chain)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Path segment for `parent`, if it is part of the chain
    pub fn path_of(&self, parent: &str) -> Option<&str> {
        self.0.get(parent).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn routes(&self) -> Vec<ParentRoute> {
        self.iter()
            .map(|(name, route)| {
                let simple = name.rsplit('\\').next().unwrap_or(name);
                let mut chars = simple.chars();
                let property = match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                };
                ParentRoute {
                    name: name.to_string(),
                    class_name: simple.to_string(),
                    route: route.to_string(),
                    param: format!("{}Id", property),
                    property,
                }
            })
            .collect()
    }
}
