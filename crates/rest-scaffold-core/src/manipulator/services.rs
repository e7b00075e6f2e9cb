//! Bundle services document (`Resources/config/services.{yml,xml}`)

use crate::error::{Result, ScaffoldError};
use crate::format::ServiceFormat;
use crate::fs_utils;
use crate::templates::{skeleton, TemplateRenderer};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

pub const ENTITY_MANAGER_SERVICE: &str = "doctrine.orm.entity_manager";
pub const FORM_FACTORY_SERVICE: &str = "form.factory";

/// A generated handler service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// e.g. `blog.post.handler`
    pub id: String,
    /// Handler FQCN
    pub class: String,
    /// Entity FQCN, passed as the second constructor argument
    pub entity_class: String,
}

/// Declares handler services, once per id
#[derive(Debug, Clone)]
pub struct ServiceManipulator {
    path: PathBuf,
    format: ServiceFormat,
}

impl ServiceManipulator {
    pub fn new(path: impl Into<PathBuf>, format: ServiceFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add `service` unless an entry with its id exists. A missing document is
    /// first rendered from the empty skeleton of the format.
    pub fn declare<R: TemplateRenderer + ?Sized>(
        &self,
        renderer: &R,
        service: &ServiceDefinition,
    ) -> Result<bool> {
        if !self.path.exists() {
            renderer.render_file(
                &skeleton::services(self.format.as_str()),
                &self.path,
                &minijinja::context! {},
            )?;
        }

        let content = fs_utils::read_to_string(&self.path)?;
        let updated = match self.format {
            ServiceFormat::Yml => self.declare_yml(&content, service)?,
            ServiceFormat::Xml => self.declare_xml(&content, service)?,
        };

        match updated {
            Some(document) => {
                fs_utils::write_file(&self.path, &document)?;
                tracing::info!(id = %service.id, path = %self.path.display(), "declared handler service");
                Ok(true)
            }
            None => {
                tracing::debug!(id = %service.id, "handler service already declared");
                Ok(false)
            }
        }
    }

    fn parse_error(&self, message: &str) -> ScaffoldError {
        ScaffoldError::Parse {
            path: self.path.clone(),
            message: message.to_string(),
            line: None,
            snippet: None,
        }
    }

    fn declare_yml(&self, content: &str, service: &ServiceDefinition) -> Result<Option<String>> {
        let mut document = match serde_yaml::from_str::<Value>(content)
            .map_err(|e| ScaffoldError::yaml(&self.path, content, &e))?
        {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => return Err(self.parse_error("the services document is not a mapping")),
        };

        let services = document
            .entry(Value::from("services"))
            .or_insert(Value::Null);
        if services.is_null() {
            *services = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(services) = services else {
            return Err(self.parse_error("`services` is not a mapping"));
        };

        if services.contains_key(service.id.as_str()) {
            return Ok(None);
        }

        let mut entry = Mapping::new();
        entry.insert("class".into(), service.class.clone().into());
        entry.insert(
            "arguments".into(),
            Value::Sequence(vec![
                format!("@{}", ENTITY_MANAGER_SERVICE).into(),
                service.entity_class.clone().into(),
                format!("@{}", FORM_FACTORY_SERVICE).into(),
            ]),
        );
        services.insert(service.id.clone().into(), Value::Mapping(entry));

        serde_yaml::to_string(&document)
            .map(Some)
            .map_err(|e| self.parse_error(&e.to_string()))
    }

    fn declare_xml(&self, content: &str, service: &ServiceDefinition) -> Result<Option<String>> {
        let id = regex::escape(&xml_escape(&service.id));
        let lookup = Regex::new(&format!(
            r#"<service\s[^>]*\bid\s*=\s*(?:"{id}"|'{id}')"#
        ))
        .map_err(|e| self.parse_error(&e.to_string()))?;
        if lookup.is_match(content) {
            return Ok(None);
        }

        let entry = format!(
            concat!(
                "        <service id=\"{id}\" class=\"{class}\">\n",
                "            <argument type=\"service\" id=\"{em}\" />\n",
                "            <argument>{entity}</argument>\n",
                "            <argument type=\"service\" id=\"{forms}\" />\n",
                "        </service>\n",
            ),
            id = xml_escape(&service.id),
            class = xml_escape(&service.class),
            em = ENTITY_MANAGER_SERVICE,
            entity = xml_escape(&service.entity_class),
            forms = FORM_FACTORY_SERVICE,
        );

        if let Some(pos) = content.rfind("</services>") {
            let line_start = content[..pos].rfind('\n').map_or(0, |i| i + 1);
            let insert_at = if content[line_start..pos].trim().is_empty() {
                line_start
            } else {
                pos
            };
            let mut out = String::with_capacity(content.len() + entry.len());
            out.push_str(&content[..insert_at]);
            if insert_at == pos {
                out.push('\n');
            }
            out.push_str(&entry);
            out.push_str(&content[insert_at..]);
            return Ok(Some(out));
        }

        let empty_services = Regex::new(r"<services\s*/>").map_err(|e| self.parse_error(&e.to_string()))?;
        if let Some(m) = empty_services.find(content) {
            let replacement = format!("<services>\n{}    </services>", entry);
            return Ok(Some(format!(
                "{}{}{}",
                &content[..m.start()],
                replacement,
                &content[m.end()..]
            )));
        }

        if let Some(pos) = content.rfind("</container>") {
            return Ok(Some(format!(
                "{}    <services>\n{}    </services>\n{}",
                &content[..pos],
                entry,
                &content[pos..]
            )));
        }

        Err(self.parse_error("no <services> or <container> element to declare the service in"))
    }
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
