use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::Coordinate;

/// How often the store is polled for area/team changes
pub const POLL_INTERVAL_SECS: u64 = 5;

fn default_dataset() -> PathBuf {
    PathBuf::from("areas.json")
}
fn default_poll_interval() -> u64 {
    POLL_INTERVAL_SECS
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Path to the static area dataset
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,
    #[serde(default)]
    pub team: Option<String>,
    /// Fixed location to claim from, as `[lat, lng]`
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            team: None,
            location: None,
            poll_interval_secs: default_poll_interval(),
            verbose: default_verbose(),
            store: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    2
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Base URL of the realtime database, e.g. `https://<project>.firebaseio.com`
    pub database_url: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl FileConfig {
    /// Load the first config file found in the standard search paths
    ///
    /// Returns the path it was read from, so relative paths inside it can be
    /// resolved against its directory.
    pub fn load() -> Option<(PathBuf, Self)> {
        Self::load_first(get_config_paths())
    }

    fn load_first(paths: impl IntoIterator<Item = PathBuf>) -> Option<(PathBuf, Self)> {
        paths
            .into_iter()
            .find_map(|path| Self::try_load(&path).map(|config| (path, config)))
    }

    fn try_load(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
                None
            }
        }
    }

    /// Dataset path, resolved against `base` when relative
    pub fn dataset_path(&self, base: Option<&Path>) -> PathBuf {
        match base {
            Some(dir) if self.dataset.is_relative() => dir.join(&self.dataset),
            _ => self.dataset.clone(),
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("areaclaim.toml"));
    paths.push(PathBuf::from(".areaclaim.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("areaclaim").join("config.toml"));
        paths.push(config_dir.join("areaclaim.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".areaclaim.toml"));
        paths.push(home.join(".config").join("areaclaim").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert_eq!(config.dataset, PathBuf::from("areas.json"));
        assert_eq!(config.poll_interval_secs, 5);
        assert!(config.team.is_none());
        assert!(config.store.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            dataset = "data/areas.json"
            team = "Red"
            location = [58.585, 16.19]
            verbose = true

            [store]
            database_url = "https://game.example.com"
            max_retries = 5
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.team.as_deref(), Some("Red"));
        assert_eq!(config.location, Some(Coordinate::new(58.585, 16.19)));
        let store = config.store.unwrap();
        assert_eq!(store.database_url, "https://game.example.com");
        assert_eq!(store.max_retries, 5);
        assert_eq!(store.timeout_secs, 30);
        assert!(store.auth_token.is_none());
    }

    #[test]
    fn test_store_requires_url() {
        let result: Result<FileConfig, _> = toml::from_str("[store]\nmax_retries = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_try_load_skips_bad_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"team = [not toml").unwrap();
        assert!(FileConfig::try_load(file.path()).is_none());

        let mut good = NamedTempFile::new().unwrap();
        good.write_all(b"team = \"Blue\"\n").unwrap();
        let config = FileConfig::try_load(good.path()).unwrap();
        assert_eq!(config.team.as_deref(), Some("Blue"));
    }

    #[test]
    fn test_demo_config_parses() {
        let config: FileConfig = toml::from_str(include_str!("../../demos/areaclaim.toml")).unwrap();
        assert_eq!(config.team.as_deref(), Some("Red"));
        assert!(config.store.is_some());
    }

    #[test]
    fn test_load_first_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "team = [not toml").unwrap();
        let nested = dir.path().join("areaclaim");
        std::fs::create_dir(&nested).unwrap();
        let good = nested.join("config.toml");
        std::fs::write(&good, "dataset = \"areas.json\"\n").unwrap();

        let (path, config) = FileConfig::load_first(vec![
            dir.path().join("missing.toml"),
            bad,
            good.clone(),
        ])
        .unwrap();

        assert_eq!(path, good);
        assert_eq!(
            config.dataset_path(path.parent()),
            nested.join("areas.json")
        );
        assert!(FileConfig::load_first(vec![dir.path().join("missing.toml")]).is_none());
    }

    #[test]
    fn test_dataset_path_resolution() {
        let config = FileConfig::default();
        assert_eq!(
            config.dataset_path(Some(Path::new("/srv/game"))),
            PathBuf::from("/srv/game/areas.json")
        );
        assert_eq!(config.dataset_path(None), PathBuf::from("areas.json"));
    }
}
