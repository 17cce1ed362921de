//! # Generator Configuration
//!
//! `tfpgen.yaml` describes the provider being generated and where its
//! inputs and outputs live:
//!
//! ```yaml
//! name: crd
//! address: registry.terraform.io/prc/crd
//! moduleName: github.com/prc/terraform-provider-crd
//! schemasDir: schemas
//! outputDir: internal/provider
//! onError: skip      # optional, default abort
//! maxDepth: 16       # optional, default 32
//! ```
//!
//! `schemasDir` and `outputDir` are relative to the directory holding the
//! config file, not to the working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tfpgen_schema::DEFAULT_MAX_DEPTH;

/// What `generate` does when a schema file fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OnErrorPolicy {
    /// Stop at the first failing file.
    #[default]
    Abort,
    /// Log the failure, keep going, report at the end.
    Skip,
}

/// Parsed and path-resolved generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Provider name.
    #[serde(default)]
    pub name: String,
    /// Provider registry address.
    #[serde(default)]
    pub address: String,
    /// Module the generated code belongs to.
    #[serde(default)]
    pub module_name: String,
    /// Directory walked for CRD files.
    #[serde(default)]
    pub schemas_dir: PathBuf,
    /// Directory receiving generated documents.
    #[serde(default)]
    pub output_dir: PathBuf,
    /// Failure policy.
    #[serde(default)]
    pub on_error: OnErrorPolicy,
    /// Struct nesting ceiling passed to the compiler.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file holds no YAML document.
    #[error("config '{}' is empty", .path.display())]
    Empty {
        /// Config file path.
        path: PathBuf,
    },

    /// The first YAML document is not a valid config.
    #[error("failed to parse config '{}': {source}", .path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// The working directory could not be determined.
    #[error("cannot resolve config directory: {0}")]
    BaseDir(std::io::Error),

    /// A field holds a value the generator cannot use.
    #[error("invalid config '{}': {reason}", .path.display())]
    Invalid {
        /// Config file path.
        path: PathBuf,
        /// Which field is wrong and why.
        reason: String,
    },
}

impl Config {
    /// Load the first YAML document of `path` and resolve its directories
    /// against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// `moduleName` is empty or `maxDepth` is zero.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let document = serde_yaml::Deserializer::from_str(&content)
            .next()
            .ok_or_else(|| ConfigError::Empty {
                path: path.to_path_buf(),
            })?;
        let mut config = Config::deserialize(document).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = base_dir(path)?;
        config.schemas_dir = base_dir.join(&config.schemas_dir);
        config.output_dir = base_dir.join(&config.output_dir);

        config.validate(path)?;
        Ok(config)
    }

    /// Replace file settings with command-line values where given.
    pub fn apply_overrides(
        &mut self,
        schemas_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        on_error: Option<OnErrorPolicy>,
    ) {
        if let Some(dir) = schemas_dir {
            self.schemas_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(policy) = on_error {
            self.on_error = policy;
        }
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        if self.module_name.trim().is_empty() {
            return Err(invalid("moduleName must not be empty"));
        }
        if self.max_depth == 0 {
            return Err(invalid("maxDepth must be at least 1"));
        }
        Ok(())
    }
}

/// Absolute directory containing `path`.
fn base_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    if parent.is_absolute() {
        return Ok(parent.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::BaseDir)?;
    Ok(cwd.join(parent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("tfpgen.yaml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn load_resolves_dirs_against_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "name: crd\naddress: registry.terraform.io/prc/crd\nmoduleName: github.com/prc/provider\nschemasDir: schemas\noutputDir: out\n",
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.name, "crd");
        assert_eq!(config.schemas_dir, tmp.path().join("schemas"));
        assert_eq!(config.output_dir, tmp.path().join("out"));
        assert_eq!(config.on_error, OnErrorPolicy::Abort);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn absolute_dirs_are_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let elsewhere = tmp.path().join("elsewhere");
        let body = format!(
            "moduleName: m\nschemasDir: {}\noutputDir: out\n",
            elsewhere.display()
        );
        let config = Config::load(&write(tmp.path(), &body)).unwrap();
        assert_eq!(config.schemas_dir, elsewhere);
    }

    #[test]
    fn policy_and_depth_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "moduleName: m\nonError: skip\nmaxDepth: 4\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.on_error, OnErrorPolicy::Skip);
        assert_eq!(config.max_depth, 4);
    }

    #[test]
    fn empty_module_name_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(&write(tmp.path(), "name: crd\n")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("moduleName"));
    }

    #[test]
    fn zero_depth_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(&write(tmp.path(), "moduleName: m\nmaxDepth: 0\n")).unwrap_err();
        assert!(err.to_string().contains("maxDepth"));
    }

    #[test]
    fn unknown_policy_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(&write(tmp.path(), "moduleName: m\nonError: retry\n")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Config::load(Path::new("/nonexistent/tfpgen/tfpgen.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn overrides_replace_file_values() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::load(&write(tmp.path(), "moduleName: m\n")).unwrap();
        config.apply_overrides(
            Some(PathBuf::from("crds")),
            None,
            Some(OnErrorPolicy::Skip),
        );
        assert_eq!(config.schemas_dir, PathBuf::from("crds"));
        assert_eq!(config.output_dir, tmp.path().to_path_buf());
        assert_eq!(config.on_error, OnErrorPolicy::Skip);
    }
}
