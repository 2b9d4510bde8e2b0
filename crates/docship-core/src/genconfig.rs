//! Doc-generator config generation.
//!
//! The generator's config file is produced per run from a checked-in JSON
//! template: the static sections (site content, theming, build options) come
//! from the template, and the `metadata` section is generated with one entry
//! per downloaded package.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tracing::info;

use crate::error::CoreError;
use crate::staging::{ARTIFACT_GLOB, StagingArea, sorted_glob};

/// Generate the doc-generator config from `template`, injecting one
/// metadata entry per package, and write it to the staging area.
pub fn write_generator_config(
    template: &Path,
    staging: &StagingArea,
    packages: &[String],
) -> Result<(), CoreError> {
    let text =
        std::fs::read_to_string(template).map_err(|source| CoreError::io(template, source))?;
    let mut config: Value = serde_json::from_str(&text).map_err(|source| CoreError::Json {
        path: template.to_path_buf(),
        source,
    })?;

    let api_dir = staging.api_dir();
    let metadata: Vec<Value> = packages
        .iter()
        .map(|package| {
            json!({
                "src": [{
                    "files": [ARTIFACT_GLOB],
                    "cwd": staging.package_dir(package).to_string_lossy(),
                }],
                "dest": api_dir.join(package).to_string_lossy(),
            })
        })
        .collect();
    config["metadata"] = Value::Array(metadata);
    config["build"]["dest"] = Value::String(staging.site_dir().to_string_lossy().into_owned());

    let out = staging.generator_config();
    info!(config = %out.display(), packages = packages.len(), "writing generator config");
    let rendered = serde_json::to_string_pretty(&config).map_err(|source| CoreError::Json {
        path: out.clone(),
        source,
    })?;
    std::fs::write(&out, rendered).map_err(|source| CoreError::io(&out, source))
}

/// Cross-reference maps consumed by the site build: bundled framework maps
/// shipped inside packages (`content/*.zip`) plus per-package
/// `specs/xrefmap.yml` files. Sorted for deterministic tool invocations.
pub fn xrefmap_files(staging: &StagingArea) -> Result<Vec<PathBuf>, CoreError> {
    let packages = staging.packages_dir();
    let mut maps = sorted_glob(&packages.join("*/content/*.zip"))?;
    maps.extend(sorted_glob(&packages.join("*/specs/xrefmap.yml"))?);
    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn metadata_entries_are_injected_per_package() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path());
        std::fs::create_dir_all(staging.root()).unwrap();
        let template = dir.path().join("docgen.template.json");
        std::fs::write(
            &template,
            r#"{"metadata": [], "build": {"dest": "placeholder", "template": "default"}}"#,
        )
        .unwrap();

        write_generator_config(&template, &staging, &["A".to_owned(), "B".to_owned()]).unwrap();

        let config: Value =
            serde_json::from_str(&std::fs::read_to_string(staging.generator_config()).unwrap())
                .unwrap();
        let metadata = config["metadata"].as_array().unwrap();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata[0]["src"][0]["files"][0], ARTIFACT_GLOB);
        assert_eq!(
            metadata[1]["dest"],
            staging.api_dir().join("B").to_string_lossy().into_owned()
        );
        // Template sections other than metadata/build.dest survive.
        assert_eq!(config["build"]["template"], "default");
        assert_eq!(
            config["build"]["dest"],
            staging.site_dir().to_string_lossy().into_owned()
        );
    }

    #[test]
    fn xrefmaps_are_discovered_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path());
        for (pkg, file) in [
            ("ZPkg", "specs/xrefmap.yml"),
            ("APkg", "specs/xrefmap.yml"),
            ("Framework", "content/xrefs.zip"),
        ] {
            let path = staging.package_dir(pkg).join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, []).unwrap();
        }

        let maps = xrefmap_files(&staging).unwrap();
        let names: Vec<_> = maps
            .iter()
            .map(|p| {
                p.strip_prefix(staging.packages_dir())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert_eq!(
            names,
            [
                "Framework/content/xrefs.zip",
                "APkg/specs/xrefmap.yml",
                "ZPkg/specs/xrefmap.yml",
            ]
        );
    }
}
