//! Everything derived from a generation request, computed once up front

use crate::actions::{Action, ActionSet, RoleSet};
use crate::bundle::Bundle;
use crate::entity::{EntityDescriptor, ParentChain, ParentRoute};
use crate::error::Result;
use crate::format::{FormatOptions, TestMode};
use crate::manipulator::ServiceDefinition;
use crate::metadata::AssociationKind;
use crate::naming;
use serde::Serialize;
use std::path::PathBuf;

const FORM_TYPES_NS: &str = "Symfony\\Component\\Form\\Extension\\Core\\Type";
/// Entity field type generated once per target bundle
const ENTITY_TYPE: &str = "RESTEntityType";

/// Input of one generation run
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Bundle holding the entity
    pub data_bundle: Bundle,
    /// Bundle receiving the generated code
    pub target_bundle: Bundle,
    pub entity: EntityDescriptor,
    pub parents: ParentChain,
    pub exclusions: Vec<Action>,
    pub options: FormatOptions,
}

/// A parent route together with the parent's class
#[derive(Debug, Clone, Serialize)]
pub struct ParentContext {
    #[serde(flatten)]
    pub route: ParentRoute,
    pub fqcn: String,
}

/// A field of the generated form type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    /// Short class name of the form type, `None` to let the framework guess
    pub form_type: Option<String>,
    /// PHP array literal of field options
    pub form_options: Option<String>,
}

/// A field of the sample payload used by the generated tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestField {
    pub name: String,
    /// PHP literal
    pub sample: String,
}

/// Variables available to every skeleton
#[derive(Debug, Clone, Serialize)]
pub struct EntityContext {
    pub namespace: String,
    pub bundle: String,
    pub extension_class: String,
    pub entity: String,
    pub entity_class: String,
    pub entity_var: String,
    pub entity_fqcn: String,
    pub controller_namespace: String,
    pub controller_class: String,
    pub handler_namespace: String,
    pub handler_class: String,
    pub handler_fqcn: String,
    pub form_namespace: String,
    pub form_class: String,
    pub form_fqcn: String,
    pub form_type_name: String,
    pub form_fields: Vec<FormField>,
    pub form_uses: Vec<String>,
    pub test_namespace: String,
    pub test_case_class: String,
    pub test_mode: TestMode,
    pub test_fields: Vec<TestField>,
    pub service_id: String,
    pub route_prefix: String,
    pub route_name_prefix: String,
    pub mount_prefix: String,
    pub base_uri: String,
    pub actions: ActionSet,
    pub parent_actions: Vec<&'static str>,
    pub parents: Vec<ParentContext>,
    pub roles: RoleSet,
    pub resource: bool,
    pub document: bool,
    /// PHP expression returned by single-entity actions
    pub payload: String,
}

/// Files owned by one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityArtifacts {
    pub controller: PathBuf,
    pub handler: PathBuf,
    pub form: PathBuf,
    pub test: Option<PathBuf>,
}

impl EntityArtifacts {
    /// `(kind, path)` pairs, in generation order
    pub fn all(&self) -> Vec<(&'static str, &PathBuf)> {
        let mut all = vec![
            ("controller", &self.controller),
            ("handler", &self.handler),
            ("form type", &self.form),
        ];
        if let Some(test) = &self.test {
            all.push(("test", test));
        }
        all
    }
}

/// Files shared by every entity of the target bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedArtifacts {
    pub base_controller: PathBuf,
    pub base_handler: PathBuf,
    pub exception: PathBuf,
    /// Association field type accepting an id or an `{"id": ...}` object
    pub entity_type: PathBuf,
    pub array_to_id_transformer: PathBuf,
    pub base_controller_test: Option<PathBuf>,
    pub test_case: Option<PathBuf>,
}

/// The immutable result of planning a request
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub route_prefix: String,
    pub route_name_prefix: String,
    pub mount_prefix: String,
    pub actions: ActionSet,
    pub roles: RoleSet,
    pub parent_paths: ParentChain,
    pub routing_group_key: String,
    /// Controller path relative to the target bundle, as imported by the routing document
    pub controller_resource: String,
    pub service: ServiceDefinition,
    pub entity_artifacts: EntityArtifacts,
    pub shared_artifacts: SharedArtifacts,
    pub context: EntityContext,
}

impl GenerationPlan {
    /// Validate the entity and derive every name and path of the run
    pub fn new(request: &GenerationRequest, org_prefix: &str) -> Result<Self> {
        let entity = &request.entity;
        entity.validate_identifier()?;

        let options = &request.options;
        let target = &request.target_bundle;
        let class = entity.simple_name.as_str();
        let dir = entity.artifact_dir();
        let sub_ns = entity.artifact_namespace();
        let ns = target.namespace.as_str();

        let route_prefix = naming::route_prefix(class);
        let route_name_prefix = naming::route_name_prefix(org_prefix, &route_prefix);
        let mount_prefix = naming::mount_prefix(&options.mount_prefix);
        let actions = ActionSet::excluding(&request.exclusions);
        let roles = RoleSet::for_entity(class);

        let controller_class = format!("{}RESTController", class);
        let handler_class = format!("{}RESTHandler", class);
        let form_class = format!("{}Type", class);
        let handler_namespace = format!("{}\\Handler\\{}", ns, sub_ns);
        let form_namespace = format!("{}\\Form\\{}", ns, sub_ns);
        let handler_fqcn = format!("{}\\{}", handler_namespace, handler_class);

        let service = ServiceDefinition {
            id: naming::service_id(&target.name, &entity.name),
            class: handler_fqcn.clone(),
            entity_class: entity.qualified_name.clone(),
        };

        let controller_resource = format!("Controller/{}/{}.php", dir, controller_class);
        let tests_enabled = options.test_mode.is_enabled();
        let test_case_class = options.test_mode.test_case_class();

        let entity_artifacts = EntityArtifacts {
            controller: target.path.join(&controller_resource),
            handler: target
                .path
                .join("Handler")
                .join(&dir)
                .join(format!("{}.php", handler_class)),
            form: target
                .path
                .join("Form")
                .join(&dir)
                .join(format!("{}.php", form_class)),
            test: tests_enabled.then(|| {
                target
                    .path
                    .join("Tests/Controller")
                    .join(&dir)
                    .join(format!("{}Test.php", controller_class))
            }),
        };

        let shared_artifacts = SharedArtifacts {
            base_controller: target.path.join("Controller/BaseRESTController.php"),
            base_handler: target.path.join("Handler/BaseRESTHandler.php"),
            exception: target.path.join("Exception/InvalidFormException.php"),
            entity_type: target.path.join(format!("Form/Type/{}.php", ENTITY_TYPE)),
            array_to_id_transformer: target
                .path
                .join("Form/DataTransformer/ArrayToIdTransformer.php"),
            base_controller_test: tests_enabled
                .then(|| target.path.join("Tests/Controller/BaseRESTControllerTest.php")),
            test_case: tests_enabled
                .then(|| target.path.join("Tests").join(format!("{}.php", test_case_class))),
        };

        let parents = request
            .parents
            .routes()
            .into_iter()
            .map(|route| ParentContext {
                fqcn: format!("{}\\Entity\\{}", request.data_bundle.namespace, route.name),
                route,
            })
            .collect();

        let (form_fields, form_uses) = form_fields(entity, ns);
        let entity_var = lcfirst(class);
        let payload = if options.resource {
            format!("['{}' => ${}]", entity_var, entity_var)
        } else {
            format!("${}", entity_var)
        };
        let base_uri = match mount_prefix.as_str() {
            "/" => format!("/{}", route_prefix),
            mount => format!("{}/{}", mount, route_prefix),
        };

        let context = EntityContext {
            namespace: ns.to_string(),
            bundle: target.name.clone(),
            extension_class: target.extension_class(),
            entity: entity.name.clone(),
            entity_class: class.to_string(),
            entity_var,
            entity_fqcn: entity.qualified_name.clone(),
            controller_namespace: format!("{}\\Controller\\{}", ns, sub_ns),
            controller_class,
            handler_namespace,
            handler_class,
            handler_fqcn,
            form_fqcn: format!("{}\\{}", form_namespace, form_class),
            form_namespace,
            form_class,
            form_type_name: naming::form_type_name(ns, &entity.name),
            form_fields,
            form_uses,
            test_namespace: format!("{}\\Tests\\Controller\\{}", ns, sub_ns),
            test_case_class,
            test_mode: options.test_mode,
            test_fields: test_fields(entity),
            service_id: service.id.clone(),
            route_prefix: route_prefix.clone(),
            route_name_prefix: route_name_prefix.clone(),
            mount_prefix: mount_prefix.clone(),
            base_uri,
            parent_actions: if request.parents.is_empty() {
                Vec::new()
            } else {
                actions.parent_actions()
            },
            actions: actions.clone(),
            parents,
            roles: roles.clone(),
            resource: options.resource,
            document: options.document,
            payload,
        };

        Ok(Self {
            routing_group_key: naming::routing_group_key(&target.name, &mount_prefix, &entity.name),
            route_prefix,
            route_name_prefix,
            mount_prefix,
            actions,
            roles,
            parent_paths: request.parents.clone(),
            controller_resource,
            service,
            entity_artifacts,
            shared_artifacts,
            context,
        })
    }

    /// Skeleton context as a template value
    pub fn template_context(&self) -> minijinja::Value {
        minijinja::Value::from_serialize(&self.context)
    }
}

fn lcfirst(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Form fields for the mapped fields and the owning-side associations, plus the
/// form type classes they need imported
fn form_fields(entity: &EntityDescriptor, bundle_namespace: &str) -> (Vec<FormField>, Vec<String>) {
    let mut uses: Vec<String> = Vec::new();
    let mut add_use = |class: String| {
        if !uses.contains(&class) {
            uses.push(class);
        }
    };

    let mut fields = Vec::new();
    for field in entity.form_fields() {
        let form_type = match field.field_type.as_str() {
            "datetime" | "datetimetz" | "datetime_immutable" => Some("DateTimeType"),
            "date" | "date_immutable" => Some("DateType"),
            "time" => Some("TimeType"),
            "boolean" => Some("CheckboxType"),
            _ => None,
        };
        let mut options = Vec::new();
        if matches!(form_type, Some("DateTimeType" | "DateType" | "TimeType")) {
            options.push("'widget' => 'single_text'");
        }
        // an unchecked box submits nothing
        if field.nullable || form_type == Some("CheckboxType") {
            options.push("'required' => false");
        }
        let form_options = (!options.is_empty()).then(|| format!("[{}]", options.join(", ")));
        if let Some(form_type) = form_type {
            add_use(format!("{}\\{}", FORM_TYPES_NS, form_type));
        }
        fields.push(FormField {
            name: field.name.clone(),
            form_type: form_type.map(str::to_string),
            form_options,
        });
    }

    for association in &entity.associations {
        let options = if association.kind.is_to_one() {
            format!("['class' => '{}']", association.target_entity)
        } else if association.kind == AssociationKind::ManyToMany {
            format!(
                "['class' => '{}', 'multiple' => true]",
                association.target_entity
            )
        } else {
            // inverse side, managed by the owning entity
            continue;
        };
        add_use(format!("{}\\Form\\Type\\{}", bundle_namespace, ENTITY_TYPE));
        fields.push(FormField {
            name: association.name.clone(),
            form_type: Some(ENTITY_TYPE.to_string()),
            form_options: Some(options),
        });
    }

    (fields, uses)
}

fn test_fields(entity: &EntityDescriptor) -> Vec<TestField> {
    entity
        .form_fields()
        .map(|field| {
            let sample = match field.field_type.as_str() {
                "integer" | "smallint" | "bigint" => "1".to_string(),
                "float" | "decimal" => "1.5".to_string(),
                "boolean" => "true".to_string(),
                "date" | "date_immutable" => "'2016-01-01'".to_string(),
                "time" => "'12:00:00'".to_string(),
                "datetime" | "datetimetz" | "datetime_immutable" => {
                    "'2016-01-01T12:00:00+00:00'".to_string()
                }
                "array" | "simple_array" | "json" | "json_array" => "[]".to_string(),
                _ => format!("'{} {}'", entity.simple_name, field.name),
            };
            TestField {
                name: field.name.clone(),
                sample,
            }
        })
        .collect()
}
