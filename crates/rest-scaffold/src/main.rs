//! rest-scaffold CLI - REST api scaffolding for Doctrine entities

use anyhow::Result;
use clap::{Parser, Subcommand};
use rest_scaffold_core::{GenerateArgs, GenerationReport, ProductConfig, RouteFormat, ServiceFormat, TestMode};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// rest-scaffold product configuration
#[derive(Clone)]
pub struct RestScaffoldConfig;

impl ProductConfig for RestScaffoldConfig {
    fn display_name(&self) -> &'static str {
        "rest-scaffold"
    }

    fn cli_description(&self) -> &'static str {
        "Generates a REST api based on a Doctrine entity"
    }

    fn skeleton_dir_env(&self) -> &'static str {
        "REST_SCAFFOLD_SKELETON_DIR"
    }

    fn next_steps(&self, _report: &GenerationReport, test_mode: TestMode) -> Vec<String> {
        let mut steps = Vec::new();
        if test_mode == TestMode::Oauth2 {
            steps.push(
                "Fill in the client and user credentials in Tests/Oauth2TestCase.php before running the tests"
                    .to_string(),
            );
        }
        if test_mode.is_enabled() {
            steps.push("Run the generated tests with phpunit".to_string());
        }
        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "rest-scaffold")]
#[command(about = "Generates a REST api based on a Doctrine entity")]
#[command(version)]
pub struct Args {
    /// Print debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the REST controller, handler, form, tests and wiring of an entity
    Generate(CliGenerateArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliGenerateArgs {
    /// The entity class name to initialize (shortcut notation, e.g. AcmeBlogBundle:Post)
    #[arg(long)]
    pub entity: Option<String>,

    /// Parent entities the resource is nested under (comma-separated)
    #[arg(long = "parents", alias = "parent", value_delimiter = ',')]
    pub parents: Vec<String>,

    /// The route prefix
    #[arg(long = "route-prefix")]
    pub route_prefix: Option<String>,

    /// The format used for generation of routing
    #[arg(long = "route-format", value_enum, ignore_case = true)]
    pub route_format: Option<RouteFormat>,

    /// The format used for generation of services
    #[arg(long = "service-format", value_enum, ignore_case = true)]
    pub service_format: Option<ServiceFormat>,

    /// Generate a test for the given authentication mode
    #[arg(long, value_enum, ignore_case = true)]
    pub test: Option<TestMode>,

    /// Do not stop the generation if the REST api controller already exists, overwriting all generated files
    #[arg(long)]
    pub overwrite: bool,

    /// Return single objects under their resource name
    #[arg(long)]
    pub resource: bool,

    /// Use NelmioApiDocBundle to document the controller
    #[arg(long)]
    pub document: bool,

    /// YAML file listing the entities to generate
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bundle holding the entities
    #[arg(long = "data-bundle")]
    pub data_bundle: Option<String>,

    /// Bundle receiving the generated code (defaults to the data bundle)
    #[arg(long = "api-bundle")]
    pub api_bundle: Option<String>,

    /// Actions not to generate (comma-separated, e.g. delete,patch)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Symfony project root (defaults to the current directory)
    #[arg(long = "project-dir")]
    pub project_dir: Option<PathBuf>,

    /// Directory with skeleton overrides
    #[arg(long = "skeleton-dir")]
    pub skeleton_dir: Option<PathBuf>,

    /// Do not touch app/config/routing.yml, print the import instead
    #[arg(long = "no-routing")]
    pub no_routing: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliGenerateArgs> for GenerateArgs {
    fn from(args: CliGenerateArgs) -> Self {
        GenerateArgs {
            entity: args.entity,
            parents: args.parents,
            route_prefix: args.route_prefix,
            route_format: args.route_format,
            service_format: args.service_format,
            test: args.test,
            overwrite: args.overwrite,
            resource: args.resource,
            document: args.document,
            config: args.config,
            data_bundle: args.data_bundle,
            api_bundle: args.api_bundle,
            exclude: args.exclude,
            project_dir: args.project_dir,
            skeleton_dir: args.skeleton_dir,
            no_routing: args.no_routing,
            yes: args.yes,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "rest_scaffold_core=debug,info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);
    let config = RestScaffoldConfig;

    let result = match args.command {
        // Everything needed is on the command line: no prompts
        Some(Command::Generate(generate_args))
            if generate_args.yes
                || generate_args.config.is_some()
                || generate_args.entity.is_some() =>
        {
            tracing::debug!(entity = ?generate_args.entity, config = ?generate_args.config, "running non-interactively");
            rest_scaffold_core::execute(&config, &generate_args.into())
        }
        Some(Command::Generate(generate_args)) => {
            tracing::debug!("prompting for missing options");
            rest_scaffold_core::run(&config, generate_args.into())
        }
        // No subcommand provided, default to interactive generation
        None => {
            tracing::debug!("no subcommand, starting interactive generation");
            rest_scaffold_core::run(&config, CliGenerateArgs::default().into())
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
