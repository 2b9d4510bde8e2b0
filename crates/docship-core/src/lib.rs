//! Staging area, generated content, and external tool interfaces for
//! Docship.
//!
//! Stages of the documentation pipeline read and write a working directory
//! tree managed by [`StagingArea`]. This crate holds that layout plus the
//! simple transforms the pipeline performs over it: table-of-contents
//! rewriting, disclaimer generation for externally maintained packages, and
//! doc-generator config generation. The doc generator and package installer
//! themselves are external programs behind the narrow [`DocGenerator`] and
//! [`PackageInstaller`] capabilities.

mod disclaimer;
mod error;
mod genconfig;
mod staging;
mod toc;
mod tools;

pub use disclaimer::{disclaimer_markdown, write_disclaimers};
pub use error::CoreError;
pub use genconfig::{write_generator_config, xrefmap_files};
pub use staging::{ARTIFACT_GLOB, StagingArea};
pub use toc::{package_toc_yaml, root_toc_yaml, write_custom_tocs};
pub use tools::{
    CommandGenerator, CommandInstaller, DocGenerator, LogLevel, PackageInstaller, ToolError,
};
