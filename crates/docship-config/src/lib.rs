//! Configuration management for Docship.
//!
//! Parses `docship.toml` with serde and resolves relative paths against the
//! config file's directory. CLI overrides can be applied during load via
//! [`CliSettings`]. Publish credentials (server, username, password) are
//! optional here; the publish stage gates on their presence at run time.

mod manifest;

pub use manifest::{Manifest, ManifestError, PackageDescriptor};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "docship.toml";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Clone, Default)]
pub struct CliSettings {
    /// Override the staging-area root directory.
    pub root: Option<PathBuf>,
    /// Override the package manifest path.
    pub manifest: Option<PathBuf>,
    /// Override the generator config template path.
    pub template: Option<PathBuf>,
    /// Override the doc generator program.
    pub generator: Option<String>,
    /// Override the package installer program.
    pub installer: Option<String>,
    /// Override the remote server address.
    pub server: Option<String>,
    /// Override the remote username.
    pub username: Option<String>,
    /// Override the remote password.
    pub password: Option<String>,
}

/// Raw configuration as parsed from TOML (paths as strings).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct ConfigRaw {
    paths: PathsRaw,
    tools: ToolsRaw,
    publish: PublishRaw,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct PathsRaw {
    root: Option<String>,
    manifest: Option<String>,
    template: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct ToolsRaw {
    generator: Option<String>,
    installer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct PublishRaw {
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Staging-area root directory.
    pub root: PathBuf,
    /// Package manifest path.
    pub manifest: PathBuf,
    /// Generator config template path.
    pub template: PathBuf,
    /// Doc generator program name.
    pub generator: String,
    /// Package installer program name.
    pub installer: String,
    /// Remote server address for publishing.
    pub server: Option<String>,
    /// Remote username for publishing.
    pub username: Option<String>,
    /// Remote password for publishing.
    pub password: Option<String>,
    /// Path to the config file, if one was loaded.
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist. Otherwise
    /// `docship.toml` in the current directory is used when present, and
    /// built-in defaults apply when it is not. CLI settings override file
    /// values either way.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named config file is missing,
    /// unreadable, or not valid TOML.
    pub fn load(path: Option<&Path>, cli: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let (raw, config_path) = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                (Self::read_raw(path)?, Some(path.to_path_buf()))
            }
            None => {
                let default = Path::new(CONFIG_FILENAME);
                if default.is_file() {
                    (Self::read_raw(default)?, Some(default.to_path_buf()))
                } else {
                    (ConfigRaw::default(), None)
                }
            }
        };

        let base = config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let mut config = Self {
            root: resolve(&base, raw.paths.root.as_deref().unwrap_or("work")),
            manifest: resolve(
                &base,
                raw.paths.manifest.as_deref().unwrap_or("packages.yml"),
            ),
            template: resolve(
                &base,
                raw.paths
                    .template
                    .as_deref()
                    .unwrap_or("docgen.template.json"),
            ),
            generator: raw.tools.generator.unwrap_or_else(|| "docgen".to_owned()),
            installer: raw.tools.installer.unwrap_or_else(|| "pkgfetch".to_owned()),
            server: raw.publish.server,
            username: raw.publish.username,
            password: raw.publish.password,
            config_path,
        };

        if let Some(cli) = cli {
            config.apply_cli(cli);
        }
        Ok(config)
    }

    /// Configuration values for the run context, keyed the way the publish
    /// stage gate expects them. Unset values are omitted, not emptied.
    #[must_use]
    pub fn run_values(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        let entries = [
            ("server", self.server.as_ref()),
            ("username", self.username.as_ref()),
            ("password", self.password.as_ref()),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                values.insert(key.to_owned(), value.clone());
            }
        }
        values
    }

    fn apply_cli(&mut self, cli: &CliSettings) {
        if let Some(root) = &cli.root {
            self.root.clone_from(root);
        }
        if let Some(manifest) = &cli.manifest {
            self.manifest.clone_from(manifest);
        }
        if let Some(template) = &cli.template {
            self.template.clone_from(template);
        }
        if let Some(generator) = &cli.generator {
            self.generator.clone_from(generator);
        }
        if let Some(installer) = &cli.installer {
            self.installer.clone_from(installer);
        }
        if let Some(server) = &cli.server {
            self.server = Some(server.clone());
        }
        if let Some(username) = &cli.username {
            self.username = Some(username.clone());
        }
        if let Some(password) = &cli.password {
            self.password = Some(password.clone());
        }
    }

    fn read_raw(path: &Path) -> Result<ConfigRaw, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn resolve(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn loads_values_and_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[paths]
root = "staging"
manifest = "projects.yml"

[tools]
generator = "apidoc"

[publish]
server = "ftp.example.org"
username = "deploy"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.root, dir.path().join("staging"));
        assert_eq!(config.manifest, dir.path().join("projects.yml"));
        assert_eq!(config.generator, "apidoc");
        assert_eq!(config.installer, "pkgfetch");
        assert_eq!(config.server.as_deref(), Some("ftp.example.org"));
        assert_eq!(config.password, None);
    }

    #[test]
    fn cli_settings_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[publish]\nserver = \"old.example.org\"\n");

        let cli = CliSettings {
            server: Some("new.example.org".to_owned()),
            password: Some("hunter2".to_owned()),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&cli)).unwrap();

        assert_eq!(config.server.as_deref(), Some("new.example.org"));
        assert_eq!(config.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn run_values_omit_unset_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[publish]\nserver = \"files.example.org\"\n");

        let config = Config::load(Some(&path), None).unwrap();
        let values = config.run_values();

        assert_eq!(values.get("server").map(String::as_str), Some("files.example.org"));
        assert!(!values.contains_key("username"));
        assert!(!values.contains_key("password"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/docship.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[paths\nroot = 3");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
