//! Locating and layering Tessera config files.
//!
//! Two layers are read, the second overriding the first section by section:
//! the user file `config.toml` in [`config_dir`], then `tessera.toml` in the
//! working directory. Command-line flags are applied by the caller on top.

use std::path::{Path, PathBuf};

use crate::{ConfigError, Result, TesseraConfig};

/// Environment variable that relocates the user config directory.
pub const CONFIG_DIR_ENV: &str = "TESSERA_CONFIG_DIR";

/// File name of the user layer inside [`config_dir`].
const USER_FILE: &str = "config.toml";

/// File name of the project layer.
const PROJECT_FILE: &str = "tessera.toml";

/// What happened when a layer was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerStatus {
    /// No file at the path.
    Missing,
    /// Parsed and merged.
    Loaded,
    /// Present but unreadable or not valid TOML; skipped.
    Malformed(String),
}

/// One config file and whether it contributed to the result.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub path: PathBuf,
    pub status: LayerStatus,
}

impl ConfigLayer {
    pub fn is_loaded(&self) -> bool {
        self.status == LayerStatus::Loaded
    }
}

/// The merged, validated configuration and the layers behind it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TesseraConfig,
    /// Lowest precedence first.
    pub layers: Vec<ConfigLayer>,
}

impl LoadedConfig {
    /// Paths of the layers that were merged.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.layers
            .iter()
            .filter(|layer| layer.is_loaded())
            .map(|layer| layer.path.as_path())
            .collect()
    }

    /// One message per skipped, malformed layer.
    pub fn warnings(&self) -> Vec<String> {
        self.layers
            .iter()
            .filter_map(|layer| match &layer.status {
                LayerStatus::Malformed(reason) => {
                    Some(format!("ignoring {}: {}", layer.path.display(), reason))
                }
                _ => None,
            })
            .collect()
    }
}

/// Where the layers are looked for.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// User layer; absent when no config directory can be determined.
    pub user: Option<PathBuf>,
    pub project: PathBuf,
}

impl ConfigPaths {
    /// The standard locations: [`user_config_file`] and `./tessera.toml`.
    pub fn discover() -> Self {
        Self {
            user: user_config_file(),
            project: PathBuf::from(PROJECT_FILE),
        }
    }

    /// Layers inside explicit directories.
    pub fn in_dirs(user_dir: Option<&Path>, project_dir: &Path) -> Self {
        Self {
            user: user_dir.map(|dir| dir.join(USER_FILE)),
            project: project_dir.join(PROJECT_FILE),
        }
    }

    /// Read every layer, merge those that parse, and validate the result.
    ///
    /// Malformed layers are skipped and reported through
    /// [`LoadedConfig::warnings`]; values that parse but cannot be used are
    /// an error.
    pub fn load(&self) -> Result<LoadedConfig> {
        let mut config = TesseraConfig::new();
        let mut layers = Vec::with_capacity(2);

        for path in self.user.iter().chain(std::iter::once(&self.project)) {
            let (layer, parsed) = read_layer(path);
            if let Some(parsed) = parsed {
                config.merge(parsed);
            }
            layers.push(layer);
        }

        config.validate()?;
        Ok(LoadedConfig { config, layers })
    }
}

/// Load from the standard locations.
pub fn load_config() -> Result<LoadedConfig> {
    ConfigPaths::discover().load()
}

/// Parse a single file, bypassing layering.
pub fn read_config_file(path: &Path) -> Result<TesseraConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    TesseraConfig::from_toml(&contents)
}

/// Tessera's directory for the user config file and logs.
///
/// `TESSERA_CONFIG_DIR` when set and non-empty, else `tessera` under the
/// platform config directory.
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|dir| dir.join("tessera")),
    }
}

/// Path of the user layer.
pub fn user_config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(USER_FILE))
}

fn read_layer(path: &Path) -> (ConfigLayer, Option<TesseraConfig>) {
    let (status, parsed) = if !path.is_file() {
        (LayerStatus::Missing, None)
    } else {
        match read_config_file(path) {
            Ok(parsed) => (LayerStatus::Loaded, Some(parsed)),
            Err(e) => (LayerStatus::Malformed(e.to_string()), None),
        }
    };
    let layer = ConfigLayer {
        path: path.to_path_buf(),
        status,
    };
    (layer, parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// A user directory and a project directory, both empty.
    fn temp_dirs() -> (TempDir, TempDir) {
        (TempDir::new().unwrap(), TempDir::new().unwrap())
    }

    #[test]
    fn test_read_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[session]\ncookie_name = \"sid\"\n").unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.session().cookie_name, "sid");
    }

    #[test]
    fn test_read_config_file_missing() {
        let err = read_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let (user, project) = temp_dirs();
        let loaded = ConfigPaths::in_dirs(Some(user.path()), project.path())
            .load()
            .unwrap();

        assert!(loaded.config.session.is_none());
        assert!(loaded.loaded_from().is_empty());
        assert_eq!(loaded.layers.len(), 2);
        assert!(loaded.layers.iter().all(|l| l.status == LayerStatus::Missing));
    }

    #[test]
    fn test_without_user_dir_only_project_is_read() {
        let (_, project) = temp_dirs();
        let loaded = ConfigPaths::in_dirs(None, project.path()).load().unwrap();
        assert_eq!(loaded.layers.len(), 1);
        assert!(loaded.layers[0].path.ends_with("tessera.toml"));
    }

    #[test]
    fn test_project_layer_overrides_user_layer() {
        let (user, project) = temp_dirs();
        fs::write(
            user.path().join("config.toml"),
            "[server]\nport = 8080\n\n[session]\nmax_lifetime_secs = 60\n",
        )
        .unwrap();
        fs::write(project.path().join("tessera.toml"), "[server]\nport = 3000\n").unwrap();

        let loaded = ConfigPaths::in_dirs(Some(user.path()), project.path())
            .load()
            .unwrap();

        // Sections the project layer leaves out survive from the user layer.
        assert_eq!(loaded.config.server().port, 3000);
        assert_eq!(loaded.config.session().max_lifetime, Duration::from_secs(60));
        assert_eq!(loaded.loaded_from().len(), 2);
    }

    #[test]
    fn test_malformed_layer_is_skipped_with_warning() {
        let (user, project) = temp_dirs();
        fs::write(user.path().join("config.toml"), "[session]\ncookie_name = \"sid\"\n").unwrap();
        fs::write(project.path().join("tessera.toml"), "not valid toml {{{{").unwrap();

        let loaded = ConfigPaths::in_dirs(Some(user.path()), project.path())
            .load()
            .unwrap();

        assert_eq!(loaded.config.session().cookie_name, "sid");
        assert!(matches!(loaded.layers[1].status, LayerStatus::Malformed(_)));
        let warnings = loaded.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("tessera.toml"));
    }

    #[test]
    fn test_unusable_values_fail_loading() {
        let (user, project) = temp_dirs();
        fs::write(
            project.path().join("tessera.toml"),
            "[session]\nmax_lifetime_secs = 0\n",
        )
        .unwrap();

        let err = ConfigPaths::in_dirs(Some(user.path()), project.path())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { section: "session", .. }));
    }
}
