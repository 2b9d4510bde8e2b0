//! Artifact staging area layout.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CoreError;

/// Glob, relative to a package directory, matching its compiled artifacts.
pub const ARTIFACT_GLOB: &str = "lib/*/*.dll";

/// Working directory tree for one pipeline run.
///
/// All intermediate and final artifacts live under a single root:
/// `packages/` for downloaded package contents, `api/` for extracted API
/// metadata (plus generated tocs and disclaimers), and `output/site/` for
/// the built site. A run owns the tree exclusively; concurrent runs against
/// the same root are the caller's problem to prevent.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Downloaded-package area.
    #[must_use]
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("packages")
    }

    /// One package's directory under the download area.
    #[must_use]
    pub fn package_dir(&self, package_id: &str) -> PathBuf {
        self.packages_dir().join(package_id)
    }

    /// Extracted API metadata area.
    #[must_use]
    pub fn api_dir(&self) -> PathBuf {
        self.root.join("api")
    }

    /// Final output root.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// Built site tree, under the output root.
    #[must_use]
    pub fn site_dir(&self) -> PathBuf {
        self.output_dir().join("site")
    }

    /// Location of the generated doc-generator config file.
    #[must_use]
    pub fn generator_config(&self) -> PathBuf {
        self.root.join("docgen.json")
    }

    /// Reset the staging area for a from-scratch build: remove the API and
    /// package areas, then recreate the output directory empty.
    pub fn clean(&self) -> Result<(), CoreError> {
        info!(root = %self.root.display(), "cleaning staging area");
        remove_dir_all_if_exists(&self.api_dir())?;
        remove_dir_all_if_exists(&self.packages_dir())?;
        let output = self.output_dir();
        remove_dir_all_if_exists(&output)?;
        std::fs::create_dir_all(&output).map_err(|source| CoreError::io(&output, source))?;
        Ok(())
    }

    /// Compiled artifact files of one downloaded package, sorted.
    pub fn package_artifacts(&self, package_id: &str) -> Result<Vec<PathBuf>, CoreError> {
        let pattern = self.package_dir(package_id).join(ARTIFACT_GLOB);
        sorted_glob(&pattern)
    }
}

/// Run a glob pattern and return matches sorted for determinism.
pub(crate) fn sorted_glob(pattern: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let mut paths = glob::glob(&pattern.to_string_lossy())?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

fn remove_dir_all_if_exists(dir: &Path) -> Result<(), CoreError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CoreError::io(dir, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_resets_the_tree() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path());

        std::fs::create_dir_all(staging.package_dir("Pkg")).unwrap();
        std::fs::create_dir_all(staging.api_dir()).unwrap();
        std::fs::write(staging.api_dir().join("toc.yml"), "- name: x").unwrap();
        std::fs::create_dir_all(staging.site_dir()).unwrap();
        std::fs::write(staging.site_dir().join("index.html"), "old").unwrap();

        staging.clean().unwrap();

        assert!(!staging.api_dir().exists());
        assert!(!staging.packages_dir().exists());
        assert!(staging.output_dir().exists());
        assert_eq!(
            std::fs::read_dir(staging.output_dir()).unwrap().count(),
            0,
            "output directory must be empty"
        );
    }

    #[test]
    fn clean_tolerates_a_fresh_root() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path().join("work"));

        staging.clean().unwrap();

        assert!(staging.output_dir().exists());
    }

    #[test]
    fn package_artifacts_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path());
        let lib = staging.package_dir("Pkg").join("lib/net8.0");
        std::fs::create_dir_all(&lib).unwrap();
        std::fs::write(lib.join("Zeta.dll"), []).unwrap();
        std::fs::write(lib.join("Alpha.dll"), []).unwrap();
        std::fs::write(lib.join("readme.txt"), []).unwrap();

        let artifacts = staging.package_artifacts("Pkg").unwrap();
        let names: Vec<_> = artifacts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, ["Alpha.dll", "Zeta.dll"]);
    }
}
