//! Output formats and per-run generation options

use crate::error::{Result, ScaffoldError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How routes of the generated controllers are imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteFormat {
    #[default]
    Yml,
    Xml,
    Php,
    Annotation,
}

impl RouteFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteFormat::Yml => "yml",
            RouteFormat::Xml => "xml",
            RouteFormat::Php => "php",
            RouteFormat::Annotation => "annotation",
        }
    }
}

/// Encoding of the bundle's services document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceFormat {
    #[default]
    Yml,
    Xml,
}

impl ServiceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceFormat::Yml => "yml",
            ServiceFormat::Xml => "xml",
        }
    }

    /// `services.yml` / `services.xml`
    pub fn file_name(&self) -> String {
        format!("services.{}", self.as_str())
    }

    /// Symfony loader class able to read this format
    pub fn loader_class(&self) -> &'static str {
        match self {
            ServiceFormat::Yml => "YamlFileLoader",
            ServiceFormat::Xml => "XmlFileLoader",
        }
    }
}

/// Kind of functional tests to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestMode {
    #[default]
    None,
    NoAuthentication,
    #[value(alias = "oauth")]
    #[serde(alias = "oauth")]
    Oauth2,
    Csrf,
}

impl TestMode {
    pub const SUPPORTED: [&'static str; 4] = ["none", "oauth2", "no-authentication", "csrf"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestMode::None => "none",
            TestMode::NoAuthentication => "no-authentication",
            TestMode::Oauth2 => "oauth2",
            TestMode::Csrf => "csrf",
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != TestMode::None
    }

    /// Class name of the base test case for this mode, e.g. `NoAuthenticationTestCase`
    pub fn test_case_class(&self) -> String {
        format!("{}TestCase", crate::naming::studly(self.as_str()))
    }
}

impl FromStr for TestMode {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "" | "none" => Ok(TestMode::None),
            "no-authentication" => Ok(TestMode::NoAuthentication),
            "oauth" | "oauth2" => Ok(TestMode::Oauth2),
            "csrf" => Ok(TestMode::Csrf),
            other => Err(ScaffoldError::config(format!(
                "Test format \"{}\" is not supported, only {} are supported.",
                other,
                TestMode::SUPPORTED.join(",")
            ))),
        }
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options that shape one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Mount prefix of the routing entry (`/` or `/something`)
    pub mount_prefix: String,
    pub route_format: RouteFormat,
    pub service_format: ServiceFormat,
    pub test_mode: TestMode,
    /// Overwrite per-entity files that already exist
    pub overwrite: bool,
    /// Wrap single-entity responses under the resource name
    pub resource: bool,
    /// Emit NelmioApiDoc annotations
    pub document: bool,
    /// Touch the application routing document at all
    pub update_routing: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            mount_prefix: "/".to_string(),
            route_format: RouteFormat::default(),
            service_format: ServiceFormat::default(),
            test_mode: TestMode::default(),
            overwrite: false,
            resource: false,
            document: false,
            update_routing: true,
        }
    }
}
