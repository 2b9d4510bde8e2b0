//! Stage definitions and pipeline wiring.
//!
//! Reproduces the build's target graph: clean, download the packages from
//! the manifest, generate the doc-generator config, extract metadata,
//! rewrite tocs and disclaimers, build the site, publish. Each stage closure
//! captures its collaborators; the publish stage constructs its transport
//! from the run context's gated credentials, so no connection is attempted
//! when they are missing.

use std::path::PathBuf;
use std::sync::Arc;

use docship_config::Manifest;
use docship_core::{
    DocGenerator, LogLevel, PackageInstaller, StagingArea, write_custom_tocs, write_disclaimers,
    write_generator_config, xrefmap_files,
};
use docship_pipeline::{ActionError, GraphError, Pipeline, PipelineBuilder, RunContext, StageSpec};
use docship_publish::{FileTransfer, Publisher};

/// Stage names.
pub mod names {
    pub const CLEAN: &str = "clean";
    pub const DOWNLOAD: &str = "download-packages";
    pub const TOOL_CONFIG: &str = "tool-config";
    pub const METADATA: &str = "metadata";
    pub const TOC: &str = "toc";
    pub const DISCLAIMER: &str = "disclaimer";
    pub const BUILD_SITE: &str = "build-site";
    pub const PUBLISH: &str = "publish";
}

/// Target completed when none is requested.
pub const DEFAULT_TARGET: &str = names::BUILD_SITE;

/// Builds the publish transport from the gated credentials
/// (server, username, password).
pub type TransferFactory =
    Arc<dyn Fn(&str, &str, &str) -> Box<dyn FileTransfer + Send + Sync> + Send + Sync>;

/// Collaborators captured by the stage closures.
pub struct PipelineDeps {
    pub staging: StagingArea,
    pub manifest_path: PathBuf,
    pub template_path: PathBuf,
    pub generator: Arc<dyn DocGenerator + Send + Sync>,
    pub installer: Arc<dyn PackageInstaller + Send + Sync>,
    pub transfer_factory: TransferFactory,
}

/// Register the stage graph.
pub fn build_pipeline(deps: &PipelineDeps) -> Result<Pipeline, GraphError> {
    let clean = {
        let staging = deps.staging.clone();
        StageSpec::new(names::CLEAN, move |_: &RunContext| -> Result<(), ActionError> {
            staging.clean()?;
            Ok(())
        })
    };

    let download = {
        let staging = deps.staging.clone();
        let manifest_path = deps.manifest_path.clone();
        let installer = Arc::clone(&deps.installer);
        StageSpec::new(names::DOWNLOAD, move |_: &RunContext| -> Result<(), ActionError> {
            let manifest = Manifest::load(&manifest_path)?;
            installer.install(&manifest.package_ids(), &staging.packages_dir())?;
            Ok(())
        })
        .depends_on(names::CLEAN)
    };

    let tool_config = {
        let staging = deps.staging.clone();
        let manifest_path = deps.manifest_path.clone();
        let template_path = deps.template_path.clone();
        StageSpec::new(names::TOOL_CONFIG, move |_: &RunContext| -> Result<(), ActionError> {
            let manifest = Manifest::load(&manifest_path)?;
            write_generator_config(&template_path, &staging, &manifest.package_ids())?;
            Ok(())
        })
        .depends_on(names::DOWNLOAD)
    };

    let metadata = {
        let staging = deps.staging.clone();
        let generator = Arc::clone(&deps.generator);
        StageSpec::new(names::METADATA, move |_: &RunContext| -> Result<(), ActionError> {
            generator.extract_metadata(&staging.generator_config(), LogLevel::Verbose)?;
            Ok(())
        })
        .depends_on(names::DOWNLOAD)
        .depends_on(names::TOOL_CONFIG)
    };

    let toc = {
        let staging = deps.staging.clone();
        let manifest_path = deps.manifest_path.clone();
        StageSpec::new(names::TOC, move |_: &RunContext| -> Result<(), ActionError> {
            let manifest = Manifest::load(&manifest_path)?;
            write_custom_tocs(&staging, &manifest.package_ids())?;
            Ok(())
        })
        .depends_on(names::DOWNLOAD)
        .depends_on(names::METADATA)
    };

    let disclaimer = {
        let staging = deps.staging.clone();
        let manifest_path = deps.manifest_path.clone();
        StageSpec::new(names::DISCLAIMER, move |_: &RunContext| -> Result<(), ActionError> {
            let manifest = Manifest::load(&manifest_path)?;
            write_disclaimers(manifest.packages(), &staging)?;
            Ok(())
        })
        .depends_on(names::DOWNLOAD)
    };

    let build_site = {
        let staging = deps.staging.clone();
        let generator = Arc::clone(&deps.generator);
        StageSpec::new(names::BUILD_SITE, move |_: &RunContext| -> Result<(), ActionError> {
            let xref_maps = xrefmap_files(&staging)?;
            generator.build_site(
                &staging.generator_config(),
                &xref_maps,
                LogLevel::Warning,
            )?;
            Ok(())
        })
        .depends_on(names::METADATA)
        .depends_on(names::TOC)
        .depends_on(names::DISCLAIMER)
    };

    let publish = {
        let staging = deps.staging.clone();
        let transfer_factory = Arc::clone(&deps.transfer_factory);
        StageSpec::new(names::PUBLISH, move |ctx: &RunContext| -> Result<(), ActionError> {
            let server = ctx.require("server")?;
            let username = ctx.require("username")?;
            let password = ctx.require("password")?;
            let transfer = transfer_factory(server, username, password);
            Publisher::new(transfer).publish(&staging.site_dir())?;
            Ok(())
        })
        .depends_on(names::BUILD_SITE)
        .requires_config("server")
        .requires_config("username")
        .requires_config("password")
    };

    PipelineBuilder::new()
        .stage(clean)
        .stage(download)
        .stage(tool_config)
        .stage(metadata)
        .stage(toc)
        .stage(disclaimer)
        .stage(build_site)
        .stage(publish)
        .build()
}
