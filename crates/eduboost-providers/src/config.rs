//! Configuration loading and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use eduboost_core::traits::{FeedbackProvider, RecordProvider};

use crate::file::FileStore;
use crate::http::{HttpStore, DEFAULT_TIMEOUT_SECS};

/// Remote records API settings.
///
/// Note: Custom Debug impl masks the API token to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level eduboost configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EduboostConfig {
    /// Directory of `<student>.json` / `<student>.csv` record files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Fetch students from an HTTP API instead of the data directory.
    #[serde(default)]
    pub api: Option<ApiConfig>,
    /// TOML resource catalog; the built-in catalog when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// TOML rule book; the built-in rule book when unset.
    #[serde(default)]
    pub rules: Option<PathBuf>,
    /// Max students processed at once in a cohort run.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Seed for schedule subject selection. Random when unset.
    #[serde(default)]
    pub plan_seed: Option<u64>,
    /// Output directory for saved reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./eduboost-reports")
}

impl Default for EduboostConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api: None,
            catalog: None,
            rules: None,
            parallelism: default_parallelism(),
            plan_seed: None,
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `eduboost.toml` in the current directory
/// 2. `~/.config/eduboost/config.toml`
///
/// Environment variable overrides: `EDUBOOST_API_URL`, `EDUBOOST_API_TOKEN`,
/// `EDUBOOST_DATA_DIR`.
pub fn load_config() -> Result<EduboostConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<EduboostConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("eduboost.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            toml::from_str::<EduboostConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => EduboostConfig::default(),
    };

    if let Ok(dir) = std::env::var("EDUBOOST_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(url) = std::env::var("EDUBOOST_API_URL") {
        match &mut config.api {
            Some(api) => api.base_url = url,
            None => {
                config.api = Some(ApiConfig {
                    base_url: url,
                    api_token: None,
                    timeout_secs: DEFAULT_TIMEOUT_SECS,
                })
            }
        }
    }
    if let Ok(token) = std::env::var("EDUBOOST_API_TOKEN") {
        if let Some(api) = &mut config.api {
            api.api_token = Some(token);
        }
    }

    config.data_dir = resolve_path(&config.data_dir);
    config.output_dir = resolve_path(&config.output_dir);
    config.catalog = config.catalog.as_deref().map(resolve_path);
    config.rules = config.rules.as_deref().map(resolve_path);
    if let Some(api) = &mut config.api {
        api.base_url = resolve_env_vars(&api.base_url);
        api.api_token = api.api_token.as_deref().map(resolve_env_vars);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("eduboost"))
}

/// A record store and a feedback store backed by the same source.
pub struct Stores {
    pub records: Arc<dyn RecordProvider>,
    pub feedback: Arc<dyn FeedbackProvider>,
}

/// Build the stores the configuration selects: the HTTP API when one is
/// configured, otherwise the data directory.
pub fn create_stores(config: &EduboostConfig) -> Result<Stores> {
    match &config.api {
        Some(api) => {
            let store = Arc::new(HttpStore::with_timeout(
                &api.base_url,
                api.api_token.clone(),
                api.timeout_secs,
            )?);
            Ok(Stores {
                records: store.clone(),
                feedback: store,
            })
        }
        None => {
            let store = Arc::new(FileStore::new(&config.data_dir));
            Ok(Stores {
                records: store.clone(),
                feedback: store,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EDUBOOST_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_EDUBOOST_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_EDUBOOST_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_EDUBOOST_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = EduboostConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.parallelism, 4);
        assert!(config.api.is_none());
        assert!(config.plan_seed.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
data_dir = "/srv/eduboost/students"
catalog = "catalog.toml"
rules = "rules.toml"
parallelism = 8
plan_seed = 42

[api]
base_url = "https://records.example.edu"
api_token = "tok-123"
"#;
        let config: EduboostConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.parallelism, 8);
        assert_eq!(config.plan_seed, Some(42));
        let api = config.api.as_ref().unwrap();
        assert_eq!(api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(api.api_token.as_deref(), Some("tok-123"));
    }

    #[test]
    fn debug_masks_token() {
        let api = ApiConfig {
            base_url: "https://records.example.edu".into(),
            api_token: Some("super-secret".into()),
            timeout_secs: 5,
        };
        let debug = format!("{api:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/eduboost.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_from_explicit_file_resolves_env() {
        std::env::set_var("_EDUBOOST_TEST_ROOT", "/tmp/eduboost-test");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eduboost.toml");
        std::fs::write(&path, "output_dir = \"${_EDUBOOST_TEST_ROOT}/reports\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/eduboost-test/reports"));
        std::env::remove_var("_EDUBOOST_TEST_ROOT");
    }

    #[test]
    fn file_store_selected_without_api() {
        let dir = tempfile::tempdir().unwrap();
        let config = EduboostConfig {
            data_dir: dir.path().to_path_buf(),
            ..EduboostConfig::default()
        };
        let stores = create_stores(&config).unwrap();
        assert_eq!(stores.records.name(), "file");
    }
}
