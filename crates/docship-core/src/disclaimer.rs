//! Legal-disclaimer generation for externally maintained packages.

use docship_config::PackageDescriptor;
use tracing::info;

use crate::error::CoreError;
use crate::staging::StagingArea;

/// Render the disclaimer markdown for one package.
#[must_use]
pub fn disclaimer_markdown(package_id: &str, artifacts: &[String]) -> String {
    let mut md = format!(
        "# {package_id} Disclaimer\n\n\
         The package **{package_id}** is maintained in an external repository. This\n\
         API reference was generated from the following published artifacts and may\n\
         not reflect the latest state of that repository:\n\n"
    );
    for artifact in artifacts {
        md.push_str(&format!("- `{artifact}`\n"));
    }
    md
}

/// Write `<id>.disclaimer.md` under the API area for every package flagged
/// as an external repository. Non-external packages get no file. Returns
/// the number of disclaimers written.
pub fn write_disclaimers(
    packages: &[PackageDescriptor],
    staging: &StagingArea,
) -> Result<usize, CoreError> {
    let api_dir = staging.api_dir();
    std::fs::create_dir_all(&api_dir).map_err(|source| CoreError::io(&api_dir, source))?;

    let mut written = 0;
    for package in packages.iter().filter(|p| p.is_external_repository) {
        info!(package = %package.package_id, "writing disclaimer");

        let artifacts: Vec<String> = staging
            .package_artifacts(&package.package_id)?
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();

        let path = api_dir.join(format!("{}.disclaimer.md", package.package_id));
        let md = disclaimer_markdown(&package.package_id, &artifacts);
        std::fs::write(&path, md).map_err(|source| CoreError::io(&path, source))?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn descriptor(id: &str, external: bool) -> PackageDescriptor {
        PackageDescriptor {
            package_id: id.to_owned(),
            is_external_repository: external,
        }
    }

    #[test]
    fn markdown_names_the_package_and_artifacts() {
        let md = disclaimer_markdown("GlobExpressions", &["GlobExpressions.dll".to_owned()]);

        assert!(md.starts_with("# GlobExpressions Disclaimer\n"));
        assert!(md.contains("- `GlobExpressions.dll`\n"));
    }

    #[test]
    fn only_external_packages_get_a_disclaimer() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path());
        for id in ["External", "Internal"] {
            let lib = staging.package_dir(id).join("lib/net8.0");
            std::fs::create_dir_all(&lib).unwrap();
            std::fs::write(lib.join(format!("{id}.dll")), []).unwrap();
        }

        let packages = [descriptor("External", true), descriptor("Internal", false)];
        let written = write_disclaimers(&packages, &staging).unwrap();

        assert_eq!(written, 1);
        assert!(staging.api_dir().join("External.disclaimer.md").exists());
        assert!(!staging.api_dir().join("Internal.disclaimer.md").exists());
    }
}
