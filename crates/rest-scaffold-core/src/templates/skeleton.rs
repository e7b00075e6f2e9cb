//! Built-in skeletons shipped with the crate

macro_rules! skeleton {
    ($name:literal) => {
        (
            $name,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/skeleton/", $name)),
        )
    };
}

pub const CONTROLLER: &str = "rest/controller.php.twig";
pub const HANDLER: &str = "rest/handler.php.twig";
pub const FORM: &str = "rest/form.php.twig";
pub const BASE_CONTROLLER: &str = "rest/base_controller.php.twig";
pub const BASE_HANDLER: &str = "rest/base_handler.php.twig";
pub const EXCEPTION: &str = "rest/exception.php.twig";
pub const ENTITY_TYPE: &str = "rest/form/entity_type.php.twig";
pub const ARRAY_TO_ID_TRANSFORMER: &str = "rest/form/array_to_id_transformer.php.twig";
pub const EXTENSION: &str = "rest/extension.php.twig";
pub const SERVICES_YML: &str = "rest/config/services.yml.twig";
pub const SERVICES_XML: &str = "rest/config/services.xml.twig";
pub const TEST: &str = "rest/tests/test.php.twig";
pub const BASE_CONTROLLER_TEST: &str = "rest/tests/base_controller_test.php.twig";

static BUILTIN: &[(&str, &str)] = &[
    skeleton!("rest/controller.php.twig"),
    skeleton!("rest/handler.php.twig"),
    skeleton!("rest/form.php.twig"),
    skeleton!("rest/base_controller.php.twig"),
    skeleton!("rest/base_handler.php.twig"),
    skeleton!("rest/exception.php.twig"),
    skeleton!("rest/form/entity_type.php.twig"),
    skeleton!("rest/form/array_to_id_transformer.php.twig"),
    skeleton!("rest/extension.php.twig"),
    skeleton!("rest/config/services.yml.twig"),
    skeleton!("rest/config/services.xml.twig"),
    skeleton!("rest/tests/test.php.twig"),
    skeleton!("rest/tests/base_controller_test.php.twig"),
    skeleton!("rest/tests/no-authentication.php.twig"),
    skeleton!("rest/tests/oauth2.php.twig"),
    skeleton!("rest/tests/csrf.php.twig"),
];

/// Source of a built-in skeleton
pub fn builtin(name: &str) -> Option<&'static str> {
    BUILTIN
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, source)| *source)
}

/// Names of every built-in skeleton
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}

/// Skeleton of the base test case for a test mode, e.g. `rest/tests/oauth2.php.twig`
pub fn test_case(mode: &str) -> String {
    format!("rest/tests/{}.php.twig", mode)
}

/// Empty services document for a format, e.g. `rest/config/services.xml.twig`
pub fn services(format: &str) -> String {
    format!("rest/config/services.{}.twig", format)
}
