//! Interactive generate flow using cliclack

use crate::bundle::parse_shortcut_notation;
use crate::command::{self, GenerateArgs};
use crate::format::{RouteFormat, ServiceFormat, TestMode};
use crate::product::ProductConfig;
use anyhow::Result;
use std::path::PathBuf;

/// Ask for whatever the arguments leave open, then generate
pub fn run<C: ProductConfig>(product: &C, mut args: GenerateArgs) -> Result<()> {
    cliclack::intro(format!("{} - {}", product.display_name(), product.cli_description()))?;

    if args.config.is_none() && args.entity.is_none() {
        args.entity = Some(select_entity()?);
    }
    if args.route_format.is_none() {
        args.route_format = Some(select_route_format(&args)?);
    }
    if args.route_prefix.is_none() && args.config.is_none() {
        args.route_prefix = Some(select_route_prefix(&args)?);
    }
    if args.service_format.is_none() {
        args.service_format = Some(select_service_format(&args)?);
    }
    if args.test.is_none() {
        args.test = Some(select_test_mode(&args)?);
    }
    if !args.no_routing && !args.yes {
        let auto: bool = cliclack::confirm("Confirm automatic update of the Routing?")
            .initial_value(true)
            .interact()?;
        args.no_routing = !auto;
    }

    if !args.yes {
        cliclack::note("Summary before generation", generation_summary(&args))?;
        let confirm: bool = cliclack::confirm("Do you confirm generation?")
            .initial_value(true)
            .interact()?;
        if !confirm {
            cliclack::outro_cancel("Command aborted")?;
            anyhow::bail!("Command aborted");
        }
    }

    generate(product, &args)
}

/// What is about to be generated, one setting per line
fn generation_summary(args: &GenerateArgs) -> String {
    let target = match (&args.config, &args.entity) {
        (Some(config), _) => format!("entities listed in {}", config.display()),
        (None, Some(entity)) => entity.clone(),
        (None, None) => "-".to_string(),
    };
    let mut lines = vec![format!("You are going to generate a REST api for {}", target)];
    if !args.parents.is_empty() {
        lines.push(format!("nested under {}", args.parents.join(", ")));
    }
    lines.push(format!(
        "routing: {}, prefix: {}",
        args.route_format.unwrap_or_default().as_str(),
        args.route_prefix.as_deref().unwrap_or("(derived from the entity)")
    ));
    lines.push(format!(
        "services: {}, tests: {}",
        args.service_format.unwrap_or_default().as_str(),
        args.test.unwrap_or_default()
    ));
    if args.no_routing {
        lines.push("the routing import will be printed, not written".to_string());
    }
    lines.join("\n")
}

fn select_entity() -> Result<String> {
    cliclack::log::info(
        "Give the entity to generate a REST api for, using the shortcut notation like AcmeBlogBundle:Post.",
    )?;
    let entity: String = cliclack::input("The Entity shortcut name")
        .placeholder("AcmeBlogBundle:Post")
        .validate(|input: &String| {
            parse_shortcut_notation(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact()?;
    Ok(entity)
}

fn select_route_format(args: &GenerateArgs) -> Result<RouteFormat> {
    if args.yes {
        return Ok(RouteFormat::default());
    }
    let format = cliclack::select("Routing format")
        .item(RouteFormat::Yml, "yml", "import each controller in app/config/routing.yml")
        .item(RouteFormat::Xml, "xml", "")
        .item(RouteFormat::Php, "php", "")
        .item(RouteFormat::Annotation, "annotation", "import the bundle's Controller/ directory once")
        .initial_value(RouteFormat::default())
        .interact()?;
    Ok(format)
}

fn select_route_prefix(args: &GenerateArgs) -> Result<String> {
    if args.yes {
        return Ok("/api".to_string());
    }
    cliclack::log::info(
        "All the API routes will be mounted under this prefix: /prefix/, /prefix/posts, ...",
    )?;
    let prefix: String = cliclack::input("Routes prefix")
        .placeholder("/api")
        .default_input("/api")
        .interact()?;
    Ok(prefix)
}

fn select_service_format(args: &GenerateArgs) -> Result<ServiceFormat> {
    if args.yes {
        return Ok(ServiceFormat::default());
    }
    let format = cliclack::select("Service format")
        .item(ServiceFormat::Yml, "yml", "")
        .item(ServiceFormat::Xml, "xml", "")
        .initial_value(ServiceFormat::default())
        .interact()?;
    Ok(format)
}

fn select_test_mode(args: &GenerateArgs) -> Result<TestMode> {
    if args.yes {
        return Ok(TestMode::default());
    }
    let mode = cliclack::select("What type of tests do you want to generate?")
        .item(TestMode::None, "none", "no tests")
        .item(TestMode::NoAuthentication, "no-authentication", "")
        .item(TestMode::Oauth2, "oauth2", "password grant, fill in the credentials afterwards")
        .item(TestMode::Csrf, "csrf", "submit a CSRF token with every payload")
        .initial_value(TestMode::default())
        .interact()?;
    Ok(mode)
}

fn generate<C: ProductConfig>(product: &C, args: &GenerateArgs) -> Result<()> {
    let project_dir = match &args.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let (jobs, settings) = command::plan_jobs(args)?;

    let mut reports = Vec::new();
    let mut failures = 0;
    for job in &jobs {
        let spinner = cliclack::spinner();
        spinner.start(format!("Generating the REST api for {}...", job.label()));
        match command::generate_job(product, args, &project_dir, job, &settings) {
            Ok(report) => {
                spinner.stop(format!(
                    "{}: {} files written, {} documents updated",
                    job.label(),
                    report.written.len(),
                    report.updated.len()
                ));
                reports.push(report);
            }
            Err(e) => {
                spinner.error(format!("{}: {:#}", job.label(), e));
                failures += 1;
            }
        }
    }

    command::print_summary(product, &reports, settings.test);

    if failures > 0 {
        cliclack::outro_cancel(format!("{} of {} entities failed", failures, jobs.len()))?;
        anyhow::bail!("{} of {} entities could not be generated", failures, jobs.len());
    }

    cliclack::outro("Happy coding!")?;
    Ok(())
}
