//! CLI configuration: a `rastion.toml` in the user config directory layered
//! under `RASTION_*` environment variables.

use std::io;
use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment, FileFormat};
use rastion_catalog::HubClientConfig;
use serde::{Deserialize, Serialize};

pub const RASTION_CONFIG_FILE: &str = "rastion.toml";
const ENV_PREFIX: &str = "RASTION";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Base URL override for the catalog service
    /// (`RASTION_CATALOG_URL`).
    pub catalog_url: Option<String>,

    /// Target a locally running backend (`RASTION_DEV`).
    #[serde(default)]
    pub dev: bool,

    /// Access token for the hub, written by `rastion auth login`.
    pub hub_token: Option<String>,
}

impl Config {
    /// Load configuration from the user config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_with(config_file_path().as_deref())
    }

    fn load_with(file: Option<&Path>) -> Result<Self> {
        let mut builder = HierarchicalConfig::builder();
        if let Some(file) = file {
            builder = builder.add_source(
                config::File::from(file)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let raw = builder
            .build()
            .context("Could not read rastion configuration")?;
        raw.try_deserialize()
            .context("Invalid rastion configuration")
    }

    /// Client configuration derived from this CLI configuration.
    pub fn client_config(&self) -> HubClientConfig {
        HubClientConfig {
            catalog_url: self.catalog_url.clone(),
            dev_mode: self.dev,
            access_token: self.hub_token.clone(),
            ..Default::default()
        }
    }
}

/// `<user config dir>/rastion/rastion.toml`; `RASTION_CONFIG_DIR` overrides
/// the directory.
pub fn config_file_path() -> Option<PathBuf> {
    let dir = match env::var_os("RASTION_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()?.join("rastion"),
    };
    Some(dir.join(RASTION_CONFIG_FILE))
}

/// Store or remove the hub token in the config file, leaving every other
/// key untouched.
pub fn persist_token(token: Option<&str>) -> Result<PathBuf> {
    let path = config_file_path().context("Could not determine the user config directory")?;
    persist_token_at(&path, token)?;
    Ok(path)
}

fn persist_token_at(path: &Path, token: Option<&str>) -> Result<()> {
    let mut on_disk: toml::Table = match fs::read_to_string(path) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("Could not parse {}", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => toml::Table::new(),
        Err(err) => {
            return Err(err).with_context(|| format!("Could not read {}", path.display()));
        },
    };

    match token {
        Some(token) => {
            on_disk.insert(
                "hub_token".to_string(),
                toml::Value::String(token.to_string()),
            );
        },
        None => {
            on_disk.remove("hub_token");
        },
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create config directory {}", parent.display()))?;
    }
    fs::write(path, toml::to_string_pretty(&on_disk)?)
        .with_context(|| format!("Could not write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn file_values_are_overridden_by_the_environment() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(RASTION_CONFIG_FILE);
        fs::write(
            &file,
            "catalog_url = \"https://from-file.example\"\nhub_token = \"tok\"\n",
        )
        .unwrap();

        let config = temp_env::with_var(
            "RASTION_CATALOG_URL",
            Some("https://from-env.example"),
            || Config::load_with(Some(&file)).unwrap(),
        );

        assert_eq!(
            config.catalog_url.as_deref(),
            Some("https://from-env.example")
        );
        assert_eq!(config.hub_token.as_deref(), Some("tok"));
        assert!(!config.dev);
    }

    #[test]
    fn dev_flag_parses_from_the_environment() {
        let config = temp_env::with_var("RASTION_DEV", Some("true"), || {
            Config::load_with(None).unwrap()
        });
        assert!(config.dev);
    }

    #[test]
    fn persist_token_round_trips_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(RASTION_CONFIG_FILE);
        fs::write(&file, "dev = true\n").unwrap();

        persist_token_at(&file, Some("fresh-token")).unwrap();
        let config = Config::load_with(Some(&file)).unwrap();
        assert_eq!(config.hub_token.as_deref(), Some("fresh-token"));
        assert!(config.dev, "unrelated keys must survive");

        persist_token_at(&file, None).unwrap();
        let config = Config::load_with(Some(&file)).unwrap();
        assert_eq!(config.hub_token, None);
        assert!(config.dev);
    }

    #[test]
    fn persist_token_creates_the_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join(RASTION_CONFIG_FILE);

        persist_token_at(&file, Some("tok")).unwrap();
        let config = Config::load_with(Some(&file)).unwrap();
        assert_eq!(config.hub_token.as_deref(), Some("tok"));
    }
}
