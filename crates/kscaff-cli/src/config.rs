//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.  Project state lives
//! in the PROJECT file instead and is handled by the adapters.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `KSCAFF__*` environment variables, e.g. `KSCAFF__DEFAULTS__DOMAIN`
//! 3. The file given with `--config`
//! 4. The user config file
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Defaults for `kscaff init`.
    pub defaults: Defaults,
    /// Defaults for `kscaff create`.
    pub scaffold: ScaffoldConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub domain: String,
    pub license: String,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Run `make generate` after `create api` unless `--make` says otherwise.
    pub run_make: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults {
                domain: "my.domain".into(),
                license: "apache2".into(),
                owner: None,
            },
            scaffold: ScaffoldConfig { run_make: true },
            output: OutputConfig { no_color: false },
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// The user config file is optional.  `config_file` is the path passed
    /// via `--config`; it must exist and is layered over the user file.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default()).context("invalid built-in defaults")?)
            .add_source(
                File::from(Self::config_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        if let Some(path) = config_file {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }
        builder
            .add_source(
                Environment::with_prefix("KSCAFF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kscaff.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("io", "kscaff", "kscaff")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kscaff.toml"))
    }

    /// Serialize to the TOML layout read by [`AppConfig::load`].
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Write `self` to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let contents = self.to_toml().context("failed to serialize configuration")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_init_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.domain, "my.domain");
        assert_eq!(cfg.defaults.license, "apache2");
        assert!(cfg.scaffold.run_make);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kscaff.toml");
        std::fs::write(
            &path,
            "[defaults]\ndomain = \"example.org\"\nowner = \"The Authors\"\n\n[scaffold]\nrun_make = false\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.domain, "example.org");
        assert_eq!(cfg.defaults.owner.as_deref(), Some("The Authors"));
        assert_eq!(cfg.defaults.license, "apache2");
        assert!(!cfg.scaffold.run_make);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn written_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.defaults.domain = "example.com".into();
        cfg.write_to(&path).unwrap();

        assert_eq!(AppConfig::load(Some(&path)).unwrap(), cfg);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
