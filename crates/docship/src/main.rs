//! Docship CLI - documentation site build-and-publish pipeline.
//!
//! Resolves the requested target stage's dependency closure and executes it
//! in order: clean, download packages, generate the doc-generator config,
//! extract metadata, rewrite tocs and disclaimers, build the site, and
//! (when requested) publish it with verified delivery.

mod error;
mod output;
mod stages;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docship_config::{CliSettings, Config};
use docship_core::{CommandGenerator, CommandInstaller, StagingArea};
use docship_pipeline::{Engine, RunContext};
use docship_publish::HttpTransfer;

use error::CliError;
use output::Output;
use stages::{PipelineDeps, TransferFactory};

/// Docship - ship your API docs.
#[derive(Parser)]
#[command(name = "docship", version, about)]
struct Cli {
    /// Target stage to complete.
    #[arg(default_value = stages::DEFAULT_TARGET)]
    target: String,

    /// Path to configuration file (default: docship.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Staging-area root directory (overrides config).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Package manifest path (overrides config).
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Generator config template path (overrides config).
    #[arg(long)]
    template: Option<PathBuf>,

    /// Doc generator program (overrides config).
    #[arg(long)]
    generator: Option<String>,

    /// Package installer program (overrides config).
    #[arg(long)]
    installer: Option<String>,

    /// Remote server address for publishing.
    #[arg(long, env = "DOCSHIP_SERVER")]
    server: Option<String>,

    /// Remote username for publishing.
    #[arg(long, env = "DOCSHIP_USERNAME")]
    username: Option<String>,

    /// Remote password for publishing.
    #[arg(long, env = "DOCSHIP_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let output = Output::new();

    if let Err(err) = run(cli, &output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli, output: &Output) -> Result<(), CliError> {
    let settings = CliSettings {
        root: cli.root,
        manifest: cli.manifest,
        template: cli.template,
        generator: cli.generator,
        installer: cli.installer,
        server: cli.server,
        username: cli.username,
        password: cli.password,
    };
    let config = Config::load(cli.config.as_deref(), Some(&settings))?;

    let transfer_factory: TransferFactory = Arc::new(|server, username, password| {
        Box::new(HttpTransfer::new(server, username, password))
    });
    let deps = PipelineDeps {
        staging: StagingArea::new(&config.root),
        manifest_path: config.manifest.clone(),
        template_path: config.template.clone(),
        generator: Arc::new(CommandGenerator::new(&config.generator)),
        installer: Arc::new(CommandInstaller::new(&config.installer)),
        transfer_factory,
    };
    let pipeline = stages::build_pipeline(&deps)?;

    output.highlight(&format!("docship: target '{}'", cli.target));
    let mut ctx = RunContext::with_values(cli.target.as_str(), config.run_values());
    Engine::new(&pipeline).run(&mut ctx)?;

    output.success(&format!(
        "Completed '{}' ({} stages)",
        cli.target,
        ctx.completed_stages().count()
    ));
    Ok(())
}
