//! Table-of-contents rewriting.
//!
//! The doc generator emits its own `toc.yml` files, which organize entries
//! poorly for a multi-package site. This module deletes them and writes
//! custom tocs instead: one root toc listing the packages, and one per
//! package listing its assemblies. The YAML emitters are pure functions over
//! name lists.

use std::path::Path;

use tracing::info;

use crate::error::CoreError;
use crate::staging::{StagingArea, sorted_glob};

/// Render the root toc: one entry per package, linking into its subtree.
#[must_use]
pub fn root_toc_yaml(packages: &[String]) -> String {
    let mut yaml = String::new();
    for package in packages {
        yaml.push_str(&format!("- name: {package}\n  href: {package}/\n"));
    }
    yaml
}

/// Render a package toc: one entry per assembly.
#[must_use]
pub fn package_toc_yaml(assemblies: &[String]) -> String {
    let mut yaml = String::new();
    for assembly in assemblies {
        yaml.push_str(&format!("- uid: {assembly}\n  name: {assembly}\n"));
    }
    yaml
}

/// Delete every generated `toc.yml` under the API area and write custom
/// tocs for the given packages. Returns the number of toc files written.
pub fn write_custom_tocs(staging: &StagingArea, packages: &[String]) -> Result<usize, CoreError> {
    let api_dir = staging.api_dir();
    for toc in sorted_glob(&api_dir.join("**/toc.yml"))? {
        std::fs::remove_file(&toc).map_err(|source| CoreError::io(&toc, source))?;
    }

    write_file(&api_dir.join("toc.yml"), &root_toc_yaml(packages))?;
    let mut written = 1;

    for package in packages {
        let assemblies: Vec<String> = staging
            .package_artifacts(package)?
            .iter()
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        info!(package = %package, assemblies = assemblies.len(), "writing custom toc");

        write_file(
            &api_dir.join(package).join("toc.yml"),
            &package_toc_yaml(&assemblies),
        )?;
        written += 1;
    }

    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CoreError::io(parent, source))?;
    }
    std::fs::write(path, contents).map_err(|source| CoreError::io(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_toc_lists_packages_in_order() {
        let yaml = root_toc_yaml(&["Docship.Common".to_owned(), "GlobExpressions".to_owned()]);

        assert_eq!(
            yaml,
            "- name: Docship.Common\n  href: Docship.Common/\n\
             - name: GlobExpressions\n  href: GlobExpressions/\n"
        );
    }

    #[test]
    fn package_toc_lists_assemblies() {
        let yaml = package_toc_yaml(&["Alpha".to_owned(), "Zeta".to_owned()]);

        assert_eq!(yaml, "- uid: Alpha\n  name: Alpha\n- uid: Zeta\n  name: Zeta\n");
    }

    #[test]
    fn generated_tocs_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path());

        // Generated tocs left behind by the metadata stage.
        let nested = staging.api_dir().join("Pkg");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(staging.api_dir().join("toc.yml"), "generated").unwrap();
        std::fs::write(nested.join("toc.yml"), "generated").unwrap();

        let lib = staging.package_dir("Pkg").join("lib/net8.0");
        std::fs::create_dir_all(&lib).unwrap();
        std::fs::write(lib.join("Pkg.dll"), []).unwrap();

        let written = write_custom_tocs(&staging, &["Pkg".to_owned()]).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            std::fs::read_to_string(staging.api_dir().join("toc.yml")).unwrap(),
            "- name: Pkg\n  href: Pkg/\n"
        );
        assert_eq!(
            std::fs::read_to_string(nested.join("toc.yml")).unwrap(),
            "- uid: Pkg\n  name: Pkg\n"
        );
    }
}
