mod common;

use common::Project;
use rest_scaffold_core::actions::Action;
use rest_scaffold_core::entity::ParentChain;
use rest_scaffold_core::{
    DoctrineRestGenerator, FormatOptions, RouteFormat, ScaffoldError, ServiceFormat, SkeletonRenderer, TestMode,
};
use serde_yaml::Value;

fn generator(project: &Project) -> DoctrineRestGenerator<SkeletonRenderer> {
    DoctrineRestGenerator::new(SkeletonRenderer::new(), project.root())
}

fn posts_options() -> FormatOptions {
    FormatOptions {
        mount_prefix: "/posts".into(),
        ..FormatOptions::default()
    }
}

#[test]
fn test_post_end_to_end() {
    let project = Project::blog();
    let report = generator(&project)
        .generate(&project.request("Post", posts_options()))
        .unwrap();

    assert!(report.is_complete(), "{:?}", report.manual_steps);
    for file in [
        "Controller/Post/PostRESTController.php",
        "Handler/Post/PostRESTHandler.php",
        "Form/Post/PostType.php",
        "Controller/BaseRESTController.php",
        "Handler/BaseRESTHandler.php",
        "Exception/InvalidFormException.php",
        "Form/Type/RESTEntityType.php",
        "Form/DataTransformer/ArrayToIdTransformer.php",
    ] {
        assert!(project.bundle_dir().join(file).is_file(), "{file}");
    }
    assert!(!project.bundle_dir().join("Tests").exists());

    let controller = project.bundle_file("Controller/Post/PostRESTController.php");
    assert!(controller.contains("namespace BlogBundle\\Controller\\Post;"));
    assert!(controller.contains("class PostRESTController extends BaseRESTController"));
    assert!(controller.contains("@Rest\\Get(\"/posts/{id}\", name=\"noinc_posts_get\""));
    assert!(controller.contains("name=\"noinc_posts_get_all\""));
    assert!(controller.contains("public function deleteAction($id)"));
    for role in ["ROLE_POST_ALL", "ROLE_POST_CREATE", "ROLE_POST_READ", "ROLE_POST_UPDATE", "ROLE_POST_DELETE"] {
        assert!(controller.contains(role), "{role}");
    }
    assert!(controller.contains("return 'blog.post.handler';"));
    assert!(!controller.contains("ByParent"));
    assert!(!controller.contains("ApiDoc"));

    let handler = project.bundle_file("Handler/Post/PostRESTHandler.php");
    assert!(handler.contains("use BlogBundle\\Form\\Post\\PostType;"));

    let form = project.bundle_file("Form/Post/PostType.php");
    assert!(form.contains("->add('title')"));
    assert!(form.contains(
        "->add('publishedAt', DateTimeType::class, ['widget' => 'single_text', 'required' => false])"
    ));
    assert!(form.contains("use BlogBundle\\Form\\Type\\RESTEntityType;"));
    assert!(form.contains("->add('author', RESTEntityType::class, ['class' => 'BlogBundle\\Entity\\User'])"));

    let entity_type = project.bundle_file("Form/Type/RESTEntityType.php");
    assert!(entity_type.contains("namespace BlogBundle\\Form\\Type;"));
    assert!(entity_type.contains("use BlogBundle\\Form\\DataTransformer\\ArrayToIdTransformer;"));
    assert!(entity_type.contains("$builder->addViewTransformer(new ArrayToIdTransformer());"));
    assert!(entity_type.contains("return EntityType::class;"));
    let transformer = project.bundle_file("Form/DataTransformer/ArrayToIdTransformer.php");
    assert!(transformer.contains("if (is_array($data) && isset($data['id'])) {"));
    assert!(!form.contains("->add('id'"));

    let routing = project.read("app/config/routing.yml");
    assert!(routing.starts_with(
        "blog_post_posts:\n    resource: \"@BlogBundle/Controller/Post/PostRESTController.php\"\n    type:   rest\n    prefix:   /posts\n"
    ));

    let services: Value =
        serde_yaml::from_str(&project.bundle_file("Resources/config/services.yml")).unwrap();
    assert_eq!(
        services["services"]["blog.post.handler"]["class"].as_str(),
        Some("BlogBundle\\Handler\\Post\\PostRESTHandler")
    );

    let extension = project.bundle_file("DependencyInjection/BlogExtension.php");
    assert!(extension.contains("$loader->load('services.yml');"));
}

#[test]
fn test_comment_nested_under_post() {
    let project = Project::blog();
    let mut request = project.request("Comment", FormatOptions::default());
    request.parents = ParentChain::new(&["Post"]);
    request.exclusions = vec![Action::Delete];

    generator(&project).generate(&request).unwrap();

    let controller = project.bundle_file("Controller/Comment/CommentRESTController.php");
    assert!(controller.contains("public function getAllByPostAction(ParamFetcherInterface $paramFetcher, $postId)"));
    assert!(controller.contains("public function postByPostAction(Request $request, $postId)"));
    assert!(controller.contains("@Rest\\Get(\"/posts/{postId}/comments\", name=\"noinc_comments_get_all_by_post\""));
    assert!(controller.contains("'BlogBundle\\Entity\\Post',"));
    assert!(controller.contains("public function patchAction("));
    assert!(!controller.contains("deleteAction"));
    assert!(!controller.contains("ROLE_COMMENT_DELETE"));

    let routing = project.read("app/config/routing.yml");
    assert!(routing.starts_with("blog_comment:\n"));
    assert!(routing.contains("prefix:   /\n"));
}

#[test]
fn test_invalid_identifier_writes_nothing() {
    let project = Project::blog();
    let err = generator(&project)
        .generate(&project.request("Tag", FormatOptions::default()))
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::Configuration(_)));
    assert!(!project.bundle_dir().join("Controller").exists());
    assert!(!project.path("app/config/routing.yml").exists());
    assert!(!project.bundle_dir().join("Resources/config/services.yml").exists());
}

#[test]
fn test_existing_controller_requires_overwrite() {
    let project = Project::blog();
    let generator = generator(&project);
    generator
        .generate(&project.request("Post", posts_options()))
        .unwrap();

    let err = generator
        .generate(&project.request("Post", posts_options()))
        .unwrap_err();
    assert!(matches!(err, ScaffoldError::AlreadyExists { kind: "controller", .. }));
}

#[test]
fn test_rerun_with_overwrite_degrades_routing_to_manual_steps() {
    let project = Project::blog();
    let generator = generator(&project);
    generator
        .generate(&project.request("Post", posts_options()))
        .unwrap();

    let options = FormatOptions {
        overwrite: true,
        ..posts_options()
    };
    let report = generator.generate(&project.request("Post", options)).unwrap();

    assert!(!report.is_complete());
    assert!(report.manual_steps.iter().any(|l| l.contains("blog_post_posts")));
    assert!(report.skipped.iter().any(|p| p.ends_with("Controller/BaseRESTController.php")));

    let routing = project.read("app/config/routing.yml");
    assert_eq!(routing.matches("blog_post_posts:").count(), 1);

    let services: Value =
        serde_yaml::from_str(&project.bundle_file("Resources/config/services.yml")).unwrap();
    assert_eq!(services["services"].as_mapping().unwrap().len(), 1);

    let extension = project.bundle_file("DependencyInjection/BlogExtension.php");
    assert_eq!(extension.matches("'services.yml'").count(), 1);
}

#[test]
fn test_annotation_routing_is_idempotent() {
    let project = Project::blog();
    project.write("app/config/routing.yml", "app:\n    resource: \"@AppBundle/Controller/\"\n    type: annotation\n");
    let generator = generator(&project);
    let options = FormatOptions {
        route_format: RouteFormat::Annotation,
        overwrite: true,
        ..FormatOptions::default()
    };

    let first = generator.generate(&project.request("Post", options.clone())).unwrap();
    let routing = project.read("app/config/routing.yml");
    let second = generator.generate(&project.request("Post", options)).unwrap();

    assert!(first.updated.iter().any(|p| p.ends_with("routing.yml")));
    assert!(!second.updated.iter().any(|p| p.ends_with("routing.yml")));
    assert!(second.is_complete());
    assert_eq!(project.read("app/config/routing.yml"), routing);

    let doc: Value = serde_yaml::from_str(&routing).unwrap();
    assert_eq!(doc["blog"]["resource"].as_str(), Some("@BlogBundle/Controller/"));
    assert_eq!(doc["app"]["type"].as_str(), Some("annotation"));
}

#[test]
fn test_broken_routing_document_becomes_manual_step() {
    let project = Project::blog();
    project.write("app/config/routing.yml", "app:\n  resource: [unclosed\n");
    let options = FormatOptions {
        route_format: RouteFormat::Annotation,
        ..FormatOptions::default()
    };

    let report = generator(&project)
        .generate(&project.request("Post", options))
        .unwrap();
    assert!(report.manual_steps[0].starts_with("Could not read yaml file"));
    assert!(project.bundle_dir().join("Resources/config/services.yml").exists());
}

#[test]
fn test_xml_services_and_tests() {
    let project = Project::blog();
    let options = FormatOptions {
        service_format: ServiceFormat::Xml,
        test_mode: TestMode::Oauth2,
        resource: true,
        document: true,
        ..posts_options()
    };
    let generator = generator(&project);
    generator.generate(&project.request("Post", options.clone())).unwrap();
    generator
        .generate(&project.request("Comment", options))
        .unwrap();

    let services = project.bundle_file("Resources/config/services.xml");
    assert_eq!(services.matches("<service id=\"blog.post.handler\"").count(), 1);
    assert_eq!(services.matches("<service id=\"blog.comment.handler\"").count(), 1);

    let extension = project.bundle_file("DependencyInjection/BlogExtension.php");
    assert!(extension.contains("Loader\\XmlFileLoader($container"));
    assert_eq!(extension.matches("'services.xml'").count(), 1);

    let test = project.bundle_file("Tests/Controller/Post/PostRESTControllerTest.php");
    assert!(test.contains("namespace BlogBundle\\Tests\\Controller\\Post;"));
    assert!(test.contains("const BASE_URI = '/posts/posts';"));
    assert!(test.contains("'title' => 'Post title',"));
    assert!(project.bundle_dir().join("Tests/Oauth2TestCase.php").is_file());
    assert!(project
        .bundle_dir()
        .join("Tests/Controller/BaseRESTControllerTest.php")
        .is_file());

    let controller = project.bundle_file("Controller/Post/PostRESTController.php");
    assert!(controller.contains("use Nelmio\\ApiDocBundle\\Annotation\\ApiDoc;"));
    assert!(controller.contains("View::create(['post' => $post], Response::HTTP_CREATED)"));
}

#[test]
fn test_skeleton_override_from_bundle() {
    let project = Project::blog();
    project.write(
        "src/BlogBundle/Resources/RestScaffold/skeleton/rest/handler.php.twig",
        "<?php // custom handler for {{ entity_class }}\n",
    );
    let renderer = SkeletonRenderer::with_overrides(vec![project
        .bundle_dir()
        .join("Resources/RestScaffold/skeleton")]);

    DoctrineRestGenerator::new(renderer, project.root())
        .generate(&project.request("Post", FormatOptions::default()))
        .unwrap();

    assert_eq!(
        project.bundle_file("Handler/Post/PostRESTHandler.php"),
        "<?php // custom handler for Post\n"
    );
}
