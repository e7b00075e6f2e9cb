//! REST scaffolding generator
//!
//! [`DoctrineRestGenerator::generate`] plans the run ([`GenerationPlan`]), checks
//! that nothing it owns would be clobbered, then writes, in order:
//!
//! 1. the entity controller, handler and form type
//! 2. the shared base classes, exception and association field type (once per bundle)
//! 3. the functional tests, when a test mode is selected
//! 4. the routing import
//! 5. the handler service declaration
//! 6. the services loader in the bundle extension
//!
//! Nothing is rolled back when a later step fails. Every step is idempotent so a
//! rerun picks up where the previous one stopped.

pub mod plan;

pub use plan::{EntityContext, GenerationPlan, GenerationRequest};

use crate::error::{Result, ScaffoldError};
use crate::format::RouteFormat;
use crate::manipulator::{AnnotationImport, ExtensionManipulator, RoutingManipulator, ServiceManipulator};
use crate::templates::{skeleton, TemplateRenderer};
use std::path::{Path, PathBuf};

/// Prefix of generated route names when the product does not set one
pub const DEFAULT_ORG_PREFIX: &str = "noinc";

/// What a generation run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files rendered from a skeleton
    pub written: Vec<PathBuf>,
    /// Shared files left alone because they already exist
    pub skipped: Vec<PathBuf>,
    /// Existing documents that were edited
    pub updated: Vec<PathBuf>,
    /// Instructions for steps that could not be done automatically
    pub manual_steps: Vec<String>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.manual_steps.is_empty()
    }
}

/// Generates the REST layer of a Doctrine entity
pub struct DoctrineRestGenerator<R: TemplateRenderer> {
    renderer: R,
    project_dir: PathBuf,
    org_prefix: String,
}

impl<R: TemplateRenderer> DoctrineRestGenerator<R> {
    pub fn new(renderer: R, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            project_dir: project_dir.into(),
            org_prefix: DEFAULT_ORG_PREFIX.to_string(),
        }
    }

    pub fn with_org_prefix(mut self, org_prefix: impl Into<String>) -> Self {
        self.org_prefix = org_prefix.into();
        self
    }

    /// `app/config/routing.yml` of the project
    pub fn routing_path(&self) -> PathBuf {
        self.project_dir.join("app").join("config").join("routing.yml")
    }

    /// Validate `request` and derive its plan without touching the filesystem
    pub fn plan(&self, request: &GenerationRequest) -> Result<GenerationPlan> {
        GenerationPlan::new(request, &self.org_prefix)
    }

    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationReport> {
        let plan = self.plan(request)?;
        let options = &request.options;

        if !options.overwrite {
            for (kind, path) in plan.entity_artifacts.all() {
                if path.exists() {
                    return Err(ScaffoldError::AlreadyExists {
                        kind,
                        path: path.clone(),
                    });
                }
            }
        }

        tracing::info!(
            entity = %request.entity.name,
            bundle = %request.target_bundle.name,
            actions = ?plan.actions.names(),
            "generating REST api"
        );

        let context = plan.template_context();
        let mut report = GenerationReport::default();

        let entity = &plan.entity_artifacts;
        self.write(skeleton::CONTROLLER, &entity.controller, &context, &mut report)?;
        self.write(skeleton::HANDLER, &entity.handler, &context, &mut report)?;
        self.write(skeleton::FORM, &entity.form, &context, &mut report)?;

        let shared = &plan.shared_artifacts;
        self.write_once(skeleton::BASE_CONTROLLER, &shared.base_controller, &context, &mut report)?;
        self.write_once(skeleton::BASE_HANDLER, &shared.base_handler, &context, &mut report)?;
        self.write_once(skeleton::EXCEPTION, &shared.exception, &context, &mut report)?;
        self.write_once(skeleton::ENTITY_TYPE, &shared.entity_type, &context, &mut report)?;
        self.write_once(
            skeleton::ARRAY_TO_ID_TRANSFORMER,
            &shared.array_to_id_transformer,
            &context,
            &mut report,
        )?;

        if let (Some(test), Some(base_test), Some(test_case)) = (
            &entity.test,
            &shared.base_controller_test,
            &shared.test_case,
        ) {
            let test_case_skeleton = skeleton::test_case(options.test_mode.as_str());
            self.write_once(&test_case_skeleton, test_case, &context, &mut report)?;
            self.write_once(skeleton::BASE_CONTROLLER_TEST, base_test, &context, &mut report)?;
            self.write(skeleton::TEST, test, &context, &mut report)?;
        }

        if options.update_routing {
            match self.update_routing(request, &plan) {
                Ok(true) => report.updated.push(self.routing_path()),
                Ok(false) => {}
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(error = %e, "routing was not updated");
                    report.manual_steps.extend(self.routing_instructions(request, &plan, Some(&e)));
                }
                Err(e) => return Err(e),
            }
        } else {
            report.manual_steps.extend(self.routing_instructions(request, &plan, None));
        }

        let services = ServiceManipulator::new(
            request
                .target_bundle
                .config_dir()
                .join(options.service_format.file_name()),
            options.service_format,
        );
        if services.declare(&self.renderer, &plan.service)? {
            report.updated.push(services.path().to_path_buf());
        }

        let extension = ExtensionManipulator::for_bundle(&request.target_bundle);
        if extension.ensure_loader(&self.renderer, &request.target_bundle, options.service_format)? {
            report.updated.push(extension.path().to_path_buf());
        }

        Ok(report)
    }

    fn write(
        &self,
        template: &str,
        target: &Path,
        context: &minijinja::Value,
        report: &mut GenerationReport,
    ) -> Result<()> {
        self.renderer.render_file(template, target, context)?;
        report.written.push(target.to_path_buf());
        Ok(())
    }

    fn write_once(
        &self,
        template: &str,
        target: &Path,
        context: &minijinja::Value,
        report: &mut GenerationReport,
    ) -> Result<()> {
        if target.exists() {
            report.skipped.push(target.to_path_buf());
            return Ok(());
        }
        self.write(template, target, context, report)
    }

    fn update_routing(&self, request: &GenerationRequest, plan: &GenerationPlan) -> Result<bool> {
        let bundle = &request.target_bundle.name;
        match request.options.route_format {
            RouteFormat::Annotation => AnnotationImport::new(self.routing_path()).update(bundle),
            RouteFormat::Yml | RouteFormat::Xml | RouteFormat::Php => {
                RoutingManipulator::new(self.routing_path()).add_resource(
                    bundle,
                    &plan.mount_prefix,
                    &request.entity.name,
                    &plan.controller_resource,
                )
            }
        }
    }

    /// How to import the routes by hand, prefixed with what went wrong
    fn routing_instructions(
        &self,
        request: &GenerationRequest,
        plan: &GenerationPlan,
        error: Option<&ScaffoldError>,
    ) -> Vec<String> {
        let routing = self.routing_path();
        let bundle = &request.target_bundle.name;
        let mut lines = Vec::new();

        match error {
            Some(ScaffoldError::Parse {
                message,
                line,
                snippet,
                ..
            }) => {
                lines.push(format!("Could not read yaml file {}", routing.display()));
                if let Some(line) = line {
                    lines.push(format!("On line {}", line));
                }
                if let Some(snippet) = snippet {
                    lines.push(format!("With snippet {}", snippet));
                }
                lines.push(message.clone());
            }
            Some(ScaffoldError::DuplicateRoute { key, .. }) => {
                lines.push(format!(
                    "Bundle {} is already imported as \"{}\" in {}.",
                    bundle,
                    key,
                    routing.display()
                ));
            }
            Some(other) => lines.push(other.to_string()),
            None => {}
        }

        lines.push(format!(
            "Import the REST routes of {} in {}:",
            bundle,
            routing.display()
        ));
        lines.push(String::new());
        match request.options.route_format {
            RouteFormat::Annotation => {
                lines.push(format!("    {}:", crate::naming::annotation_route_key(bundle)));
                lines.push(format!("        resource: \"@{}/Controller/\"", bundle));
                lines.push("        type:     annotation".to_string());
            }
            _ => {
                lines.push(format!("    {}:", plan.routing_group_key));
                lines.push(format!(
                    "        resource: \"@{}/{}\"",
                    bundle, plan.controller_resource
                ));
                lines.push("        type:   rest".to_string());
                lines.push(format!("        prefix:   {}", plan.mount_prefix));
            }
        }
        lines
    }
}
