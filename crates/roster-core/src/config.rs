//! Configuration loading.
//!
//! The config file lives in the platform-specific config folder:
//! - macOS: ~/Library/Application Support/org.roster.Roster/
//! - Windows: %APPDATA%/roster/Roster/config/
//! - Linux: ~/.config/roster/

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use roster_analysis::AnalysisSettings;
use roster_ingest::IngestLimits;
use roster_model::FieldSchema;

use crate::error::ConfigError;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "roster";
const APP_NAME: &str = "Roster";
pub const CONFIG_FILENAME: &str = "roster.toml";

/// Settings for an import: the canonical fields, upload limits, and where
/// the analysis endpoint lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub fields: FieldSchema,
    pub limits: IngestLimits,
    pub analysis: AnalysisSettings,
}

/// Path of the default config file, if the platform has a config folder.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load configuration from `explicit`, else the default config file, else
/// built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<RosterConfig, ConfigError> {
    resolve_config(explicit, config_path().as_deref())
}

/// Like [`load_config`] with the default file location supplied.
///
/// An explicit file must exist and parse. The default file is optional; if it
/// is missing or unreadable the built-in defaults apply.
pub fn resolve_config(
    explicit: Option<&Path>,
    default_path: Option<&Path>,
) -> Result<RosterConfig, ConfigError> {
    if let Some(path) = explicit {
        let config = read_config(path)?;
        info!(path = %path.display(), "loaded config");
        return Ok(config);
    }

    let Some(path) = default_path else {
        warn!("could not determine config path, using defaults");
        return Ok(RosterConfig::default());
    };
    match read_config(path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        Err(ConfigError::Read { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            info!(path = %path.display(), "no config file found, using defaults");
            Ok(RosterConfig::default())
        }
        Err(error) => {
            warn!(%error, "failed to load config file, using defaults");
            Ok(RosterConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<RosterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
