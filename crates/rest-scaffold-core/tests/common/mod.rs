//! Throwaway Symfony project trees for integration tests

#![allow(dead_code)]

use rest_scaffold_core::bundle::{BundleResolver, SourceTree};
use rest_scaffold_core::entity::{EntityDescriptor, ParentChain};
use rest_scaffold_core::metadata::{DoctrineYamlMetadata, MetadataProvider};
use rest_scaffold_core::{FormatOptions, GenerationRequest};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const POST_MAPPING: &str = r#"BlogBundle\Entity\Post:
    type: entity
    id:
        id:
            type: integer
            generator: { strategy: AUTO }
    fields:
        title:
            type: string
        body:
            type: text
        publishedAt:
            type: datetime
            nullable: true
    manyToOne:
        author:
            targetEntity: User
"#;

pub const COMMENT_MAPPING: &str = r#"BlogBundle\Entity\Comment:
    type: entity
    id:
        id:
            type: integer
    fields:
        body:
            type: text
    manyToOne:
        post:
            targetEntity: Post
"#;

pub const TAG_MAPPING: &str = r#"BlogBundle\Entity\Tag:
    type: entity
    id:
        uuid:
            type: guid
    fields:
        label: ~
"#;

pub struct Project {
    pub dir: TempDir,
}

impl Project {
    /// A project with `BlogBundle` under `src/` and mappings for Post, Comment and Tag
    pub fn blog() -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        project.write("src/BlogBundle/BlogBundle.php", "<?php\nnamespace BlogBundle;\n");
        project.write(
            "src/BlogBundle/Resources/config/doctrine/Post.orm.yml",
            POST_MAPPING,
        );
        project.write(
            "src/BlogBundle/Resources/config/doctrine/Comment.orm.yml",
            COMMENT_MAPPING,
        );
        project.write(
            "src/BlogBundle/Resources/config/doctrine/Tag.orm.yml",
            TAG_MAPPING,
        );
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.root().join("src/BlogBundle")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn bundle_file(&self, relative: &str) -> String {
        fs::read_to_string(self.bundle_dir().join(relative)).unwrap()
    }

    pub fn request(&self, entity: &str, options: FormatOptions) -> GenerationRequest {
        let bundle = SourceTree::new(self.root().join("src"))
            .resolve("BlogBundle")
            .unwrap();
        let metadata = DoctrineYamlMetadata.class_metadata(&bundle, entity).unwrap();
        GenerationRequest {
            data_bundle: bundle.clone(),
            target_bundle: bundle,
            entity: EntityDescriptor::new(entity, metadata),
            parents: ParentChain::default(),
            exclusions: Vec::new(),
            options,
        }
    }
}
