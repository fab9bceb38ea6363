use crate::diagnostics::Diagnostics;
use crate::error::{LrulesError, Result};
use crate::report::BoundDelimiter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

const DATA_HOME_ENV: &str = "LRULES_DATA_HOME";
const DEFAULT_DATA_HOME: &str = "../data";
const SETTINGS_FILE: &str = "lrules.toml";

/// Datasets whose target column is fixed regardless of what the user asks.
const TARGET_OVERRIDES: &[(&str, &str)] = &[
    ("climate-model-simulation-crashes", "int3"),
    ("uci-20070111-liver-disorders", "int2"),
];

pub const DEFAULT_TARGET: &str = "class";

pub struct Config {
    pub data_home: PathBuf,
    pub settings_path: Option<PathBuf>,
}

impl Config {
    pub fn new(data_home_override: Option<PathBuf>) -> Result<Self> {
        let data_home = if let Some(path) = data_home_override {
            path
        } else if let Ok(env_path) = std::env::var(DATA_HOME_ENV) {
            PathBuf::from(env_path)
        } else {
            PathBuf::from(DEFAULT_DATA_HOME)
        };

        let settings_path = BaseDirectories::with_prefix("lrules")
            .ok()
            .and_then(|xdg| xdg.find_config_file(SETTINGS_FILE));

        Ok(Self {
            data_home,
            settings_path,
        })
    }

    /// Settings from `explicit` if given, else from the XDG settings file,
    /// else defaults.
    pub fn load_settings(&self, explicit: Option<&Path>) -> Result<ExperimentSettings> {
        match explicit.or(self.settings_path.as_deref()) {
            Some(path) => ExperimentSettings::from_file(path),
            None => Ok(ExperimentSettings::default()),
        }
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_home.join(name)
    }

    pub fn ensure_data_home(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_home)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentSettings {
    pub seed: u64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub min_clusters: usize,
    pub max_clusters: Option<usize>,
    pub delimiter: BoundDelimiter,
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
            min_clusters: 2,
            max_clusters: None,
            delimiter: BoundDelimiter::Le,
        }
    }
}

impl ExperimentSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| LrulesError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| LrulesError::Config(format!("Failed to parse settings: {}", e)))?;
        if settings.min_clusters == 0 {
            return Err(LrulesError::Config("min_clusters must be at least 1".to_string()));
        }
        if settings.max_iterations == 0 {
            return Err(LrulesError::Config("max_iterations must be at least 1".to_string()));
        }
        Ok(settings)
    }
}

/// Target column to use for `dataset`. Some datasets pin their target; a
/// different request is overridden with a warning.
pub fn target_name(dataset: &str, requested: Option<&str>, diagnostics: &dyn Diagnostics) -> String {
    let pinned = TARGET_OVERRIDES
        .iter()
        .find(|(name, _)| *name == dataset)
        .map(|&(_, target)| target);

    match (pinned, requested) {
        (Some(target), Some(asked)) if asked != target => {
            diagnostics.warn(&format!(
                "dataset {} uses target {}, ignoring {}",
                dataset, target, asked
            ));
            target.to_string()
        }
        (Some(target), _) => target.to_string(),
        (None, Some(asked)) => asked.to_string(),
        (None, None) => DEFAULT_TARGET.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;

    #[test]
    fn test_config_with_override() {
        let custom = PathBuf::from("/tmp/lrules-data");
        let config = Config::new(Some(custom.clone())).unwrap();
        assert_eq!(config.data_home, custom);
        assert_eq!(config.data_file("iris-train.tab"), custom.join("iris-train.tab"));
    }

    #[test]
    fn test_ensure_data_home() {
        let temp_dir = tempfile::tempdir().unwrap();
        let home = temp_dir.path().join("nested/data");
        let config = Config::new(Some(home.clone())).unwrap();
        config.ensure_data_home().unwrap();
        assert!(home.is_dir());
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = ExperimentSettings::from_toml("seed = 7\nmax_clusters = 5\ndelimiter = \"<\"\n").unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.max_clusters, Some(5));
        assert_eq!(settings.delimiter, BoundDelimiter::Lt);
        assert_eq!(settings.min_clusters, 2);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(ExperimentSettings::from_toml("min_clusters = 0").is_err());
        assert!(ExperimentSettings::from_toml("seed = \"abc\"").is_err());
    }

    #[test]
    fn test_settings_from_explicit_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "tolerance = 0.01\n").unwrap();

        let config = Config::new(Some(temp_dir.path().to_path_buf())).unwrap();
        let settings = config.load_settings(Some(&path)).unwrap();
        assert_eq!(settings.tolerance, 0.01);
        assert_eq!(settings.seed, 42);
    }

    #[test]
    fn test_target_overrides() {
        let sink = MemoryDiagnostics::new();
        assert_eq!(target_name("climate-model-simulation-crashes", None, &sink), "int3");
        assert_eq!(target_name("uci-20070111-liver-disorders", Some("int2"), &sink), "int2");
        assert!(sink.warnings().is_empty());

        assert_eq!(target_name("uci-20070111-liver-disorders", Some("drinks"), &sink), "int2");
        assert_eq!(sink.warnings().len(), 1);

        assert_eq!(target_name("iris", Some("species"), &sink), "species");
        assert_eq!(target_name("iris", None, &sink), DEFAULT_TARGET);
    }
}
