//! The `generate` command, shared by the interactive and non-interactive front ends

use crate::actions::parse_exclusions;
use crate::bundle::{parse_shortcut_notation, Bundle, BundleResolver, SourceTree};
use crate::config::BatchConfig;
use crate::entity::{EntityDescriptor, ParentChain};
use crate::format::{FormatOptions, RouteFormat, ServiceFormat, TestMode};
use crate::generator::{DoctrineRestGenerator, GenerationReport, GenerationRequest};
use crate::metadata::{DoctrineYamlMetadata, MetadataProvider};
use crate::naming;
use crate::product::ProductConfig;
use crate::templates::SkeletonRenderer;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Arguments of the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Entity in shortcut notation (`AcmeBlogBundle:Post`), or a bare name with `data_bundle`
    pub entity: Option<String>,
    pub parents: Vec<String>,
    pub route_prefix: Option<String>,
    pub route_format: Option<RouteFormat>,
    pub service_format: Option<ServiceFormat>,
    pub test: Option<TestMode>,
    pub overwrite: bool,
    pub resource: bool,
    pub document: bool,
    /// Batch configuration file
    pub config: Option<PathBuf>,
    pub data_bundle: Option<String>,
    pub api_bundle: Option<String>,
    pub exclude: Vec<String>,
    /// Symfony project root, the current directory when unset
    pub project_dir: Option<PathBuf>,
    pub skeleton_dir: Option<PathBuf>,
    pub no_routing: bool,
    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// One entity to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub data_bundle: String,
    pub api_bundle: String,
    pub entity: String,
    pub parents: Vec<String>,
    pub exclude: Vec<String>,
}

impl GenerationJob {
    pub fn label(&self) -> String {
        format!("{}:{}", self.data_bundle, self.entity)
    }
}

/// Settings shared by every job of a run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub route_prefix: Option<String>,
    pub route_format: RouteFormat,
    pub service_format: ServiceFormat,
    pub test: TestMode,
}

/// Expand the arguments (and the batch file, if any) into jobs and shared settings
pub fn plan_jobs(args: &GenerateArgs) -> Result<(Vec<GenerationJob>, RunSettings)> {
    if let Some(path) = &args.config {
        let config = BatchConfig::load(path)?;
        let data_bundle = args.data_bundle.clone().unwrap_or_else(|| config.data_bundle.clone());
        let api_bundle = args
            .api_bundle
            .clone()
            .unwrap_or_else(|| config.api_bundle().to_string());

        let jobs = config
            .entities()
            .map(|(name, entity)| GenerationJob {
                data_bundle: data_bundle.clone(),
                api_bundle: api_bundle.clone(),
                entity: name.replace('/', "\\"),
                parents: entity.parents,
                exclude: entity.exclude,
            })
            .collect();

        let settings = RunSettings {
            route_prefix: args.route_prefix.clone().or(config.route_prefix.clone()),
            route_format: args.route_format.or(config.route_format).unwrap_or_default(),
            service_format: args.service_format.or(config.service_format).unwrap_or_default(),
            test: args.test.or(config.test).unwrap_or_default(),
        };
        return Ok((jobs, settings));
    }

    let entity = args
        .entity
        .as_deref()
        .context("The --entity option is required unless --config is given")?;
    let (data_bundle, entity) = match (&args.data_bundle, entity.contains(':')) {
        (Some(bundle), false) => (bundle.clone(), entity.replace('/', "\\")),
        _ => parse_shortcut_notation(entity)?,
    };
    let api_bundle = args.api_bundle.clone().unwrap_or_else(|| data_bundle.clone());

    let job = GenerationJob {
        data_bundle,
        api_bundle,
        entity,
        parents: args.parents.clone(),
        exclude: args.exclude.clone(),
    };
    let settings = RunSettings {
        route_prefix: args.route_prefix.clone(),
        route_format: args.route_format.unwrap_or_default(),
        service_format: args.service_format.unwrap_or_default(),
        test: args.test.unwrap_or_default(),
    };
    Ok((vec![job], settings))
}

/// Skeleton override directories, most specific first
pub fn skeleton_dirs<C: ProductConfig>(
    product: &C,
    project_dir: &Path,
    target: &Bundle,
    explicit: Option<&Path>,
) -> Vec<PathBuf> {
    let namespace = product.skeleton_namespace();
    let mut dirs = vec![
        target.path.join("Resources").join(namespace).join("skeleton"),
        project_dir
            .join("app")
            .join("Resources")
            .join(namespace)
            .join("skeleton"),
    ];
    if let Some(dir) = explicit {
        dirs.push(dir.to_path_buf());
    }
    if let Ok(dir) = std::env::var(product.skeleton_dir_env()) {
        if !dir.is_empty() {
            dirs.push(PathBuf::from(dir));
        }
    }
    dirs
}

/// Resolve, plan and generate a single job
pub fn generate_job<C: ProductConfig>(
    product: &C,
    args: &GenerateArgs,
    project_dir: &Path,
    job: &GenerationJob,
    settings: &RunSettings,
) -> Result<GenerationReport> {
    let resolver = SourceTree::new(project_dir.join("src"));
    let data_bundle = resolver.resolve(&job.data_bundle)?;
    let target_bundle = if job.api_bundle == job.data_bundle {
        data_bundle.clone()
    } else {
        resolver.resolve(&job.api_bundle)?
    };

    let metadata = DoctrineYamlMetadata.class_metadata(&data_bundle, &job.entity)?;
    let entity = EntityDescriptor::new(&job.entity, metadata);

    let prefix = settings
        .route_prefix
        .clone()
        .unwrap_or_else(|| naming::default_route_prefix(&job.entity));

    let request = GenerationRequest {
        data_bundle,
        exclusions: parse_exclusions(&job.exclude)?,
        parents: ParentChain::new(&job.parents),
        entity,
        options: FormatOptions {
            mount_prefix: naming::mount_prefix(&prefix),
            route_format: settings.route_format,
            service_format: settings.service_format,
            test_mode: settings.test,
            overwrite: args.overwrite,
            resource: args.resource,
            document: args.document,
            update_routing: !args.no_routing,
        },
        target_bundle,
    };

    let renderer = SkeletonRenderer::with_overrides(skeleton_dirs(
        product,
        project_dir,
        &request.target_bundle,
        args.skeleton_dir.as_deref(),
    ));
    let generator =
        DoctrineRestGenerator::new(renderer, project_dir).with_org_prefix(product.org_prefix());

    Ok(generator.generate(&request)?)
}

/// Run the generate command without prompts
pub fn execute<C: ProductConfig>(product: &C, args: &GenerateArgs) -> Result<()> {
    let project_dir = match &args.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let (jobs, settings) = plan_jobs(args)?;

    println!(
        "{}",
        format!("{}: generating {} REST api(s)", product.display_name(), jobs.len())
            .cyan()
            .bold()
    );
    println!();

    let mut reports = Vec::new();
    let mut failures = 0;
    for job in &jobs {
        print!("  {} {}...", "->".blue(), job.label());
        match generate_job(product, args, &project_dir, job, &settings) {
            Ok(report) => {
                println!(" {} ({} files)", "done".green(), report.written.len());
                reports.push(report);
            }
            Err(e) => {
                println!(" {}", "failed".red());
                eprintln!("    Error: {:#}", e);
                failures += 1;
            }
        }
    }

    print_summary(product, &reports, settings.test);

    if failures > 0 {
        anyhow::bail!("{} of {} entities could not be generated", failures, jobs.len());
    }
    Ok(())
}

/// Manual steps left by the reports, or the all-clear, then the product's next steps
pub fn print_summary<C: ProductConfig>(product: &C, reports: &[GenerationReport], test: TestMode) {
    let manual: Vec<&String> = reports.iter().flat_map(|r| &r.manual_steps).collect();

    println!();
    if manual.is_empty() {
        if !reports.is_empty() {
            println!("  {}", "Everything is OK! Now get to work :).".green().bold());
        }
    } else {
        println!(
            "  {}",
            "The command was not able to configure everything automatically.".yellow()
        );
        println!("  {}", "You'll need to make the following changes manually.".yellow());
        println!();
        for line in manual {
            println!("  {}", line);
        }
    }

    if let Some(report) = reports.first() {
        let steps = product.next_steps(report, test);
        if !steps.is_empty() {
            println!();
            println!("  Next steps");
            println!();
            for (i, step) in steps.iter().enumerate() {
                println!("  {}.  {}", i + 1, step);
            }
        }
    }
}
