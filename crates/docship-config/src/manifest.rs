//! Package manifest loading.
//!
//! The manifest (`packages.yml`) is a YAML list of package descriptors. It
//! is read once per run by stages that need the package list and is
//! read-only afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Manifest error.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// One documented package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageDescriptor {
    /// Package identifier, also the directory name under the download area.
    pub package_id: String,
    /// Whether the package is maintained in an external repository. External
    /// packages get a generated disclaimer file.
    #[serde(default)]
    pub is_external_repository: bool,
}

/// The list of packages to document.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    packages: Vec<PackageDescriptor>,
}

impl Manifest {
    /// Load the manifest from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let packages = serde_yaml::from_str(&text).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { packages })
    }

    /// All packages, in manifest order.
    #[must_use]
    pub fn packages(&self) -> &[PackageDescriptor] {
        &self.packages
    }

    /// All package identifiers, in manifest order.
    #[must_use]
    pub fn package_ids(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.package_id.clone()).collect()
    }

    /// Packages flagged as externally maintained.
    pub fn external_packages(&self) -> impl Iterator<Item = &PackageDescriptor> {
        self.packages.iter().filter(|p| p.is_external_repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_external_flag_with_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packages.yml");
        std::fs::write(
            &path,
            "- package_id: GlobExpressions\n  is_external_repository: true\n- package_id: Docship.Common\n",
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();

        assert_eq!(manifest.package_ids(), ["GlobExpressions", "Docship.Common"]);
        assert_eq!(
            manifest
                .external_packages()
                .map(|p| p.package_id.as_str())
                .collect::<Vec<_>>(),
            ["GlobExpressions"]
        );
    }

    #[test]
    fn missing_manifest_is_an_io_error() {
        let err = Manifest::load(Path::new("/nonexistent/packages.yml")).unwrap_err();

        assert!(matches!(err, ManifestError::Io { .. }));
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packages.yml");
        std::fs::write(&path, "package_id: not-a-list").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }
}
