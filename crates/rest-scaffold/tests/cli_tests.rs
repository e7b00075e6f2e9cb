use std::fs;
use std::path::Path;
use std::process::Command;

const POST_MAPPING: &str = "BlogBundle\\Entity\\Post:\n    id:\n        id: { type: integer }\n    fields:\n        title: { type: string }\n";

fn blog_project(root: &Path) {
    let bundle = root.join("src/BlogBundle");
    fs::create_dir_all(bundle.join("Resources/config/doctrine")).unwrap();
    fs::write(bundle.join("BlogBundle.php"), "<?php\n").unwrap();
    fs::write(
        bundle.join("Resources/config/doctrine/Post.orm.yml"),
        POST_MAPPING,
    )
    .unwrap();
}

fn rest_scaffold(root: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rest-scaffold"));
    command
        .arg("generate")
        .arg("--project-dir")
        .arg(root)
        .env_remove("RUST_LOG");
    command
}

#[test]
fn test_cli_generates_entity() {
    let dir = tempfile::tempdir().unwrap();
    blog_project(dir.path());

    let output = rest_scaffold(dir.path())
        .args(["--entity", "BlogBundle:Post", "--route-prefix", "posts", "--test", "oauth"])
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bundle = dir.path().join("src/BlogBundle");
    assert!(bundle.join("Controller/Post/PostRESTController.php").is_file());
    assert!(bundle.join("Tests/Oauth2TestCase.php").is_file());
    let routing = fs::read_to_string(dir.path().join("app/config/routing.yml")).unwrap();
    assert!(routing.starts_with("blog_post_posts:\n"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Everything is OK"));
    assert!(stdout.contains("Oauth2TestCase.php"));
}

#[test]
fn test_cli_batch_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    blog_project(dir.path());
    let config = dir.path().join("rest.yml");
    fs::write(
        &config,
        "dataBundle: BlogBundle\nentities:\n  Post: ~\n  Missing: ~\n",
    )
    .unwrap();

    let output = rest_scaffold(dir.path())
        .arg("--config")
        .arg(&config)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(dir
        .path()
        .join("src/BlogBundle/Controller/Post/PostRESTController.php")
        .is_file());
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 2 entities"));
}

#[test]
fn test_cli_rejects_unknown_test_mode() {
    let dir = tempfile::tempdir().unwrap();
    let output = rest_scaffold(dir.path())
        .args(["--entity", "BlogBundle:Post", "--test", "basic"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}

#[test]
fn test_cli_format_values_ignore_case() {
    let dir = tempfile::tempdir().unwrap();
    blog_project(dir.path());

    let output = rest_scaffold(dir.path())
        .args([
            "--entity",
            "BlogBundle:Post",
            "--route-format",
            "YML",
            "--service-format",
            "Xml",
            "--test",
            "CSRF",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bundle = dir.path().join("src/BlogBundle");
    assert!(bundle.join("Tests/CsrfTestCase.php").is_file());
    assert!(bundle.join("Resources/config/services.xml").is_file());
}
