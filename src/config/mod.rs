use crate::models::AppSettings;
use ::config::{Config, Environment, File, FileFormat};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the settings file inside the config directory
pub const SETTINGS_FILE: &str = "makemyqrcode.yaml";

/// Prefix of environment variables overriding settings, e.g. `MAKEMYQR_API_BASE_URL`
pub const ENV_PREFIX: &str = "MAKEMYQR";

/// Loads and saves [`AppSettings`].
///
/// Settings are layered: built-in defaults, then `makemyqrcode.yaml` in the
/// config directory if present, then `MAKEMYQR_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
    env_prefix: Option<String>,
}

impl ConfigManager {
    /// Create a ConfigManager for `config_dir`, creating the directory if needed
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
            env_prefix: Some(ENV_PREFIX.to_string()),
        })
    }

    /// Read environment overrides from a different prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Ignore environment overrides entirely
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Load the layered settings.
    ///
    /// A missing settings file is not an error; defaults are used.
    pub fn load_settings(&self) -> Result<AppSettings> {
        let defaults =
            Config::try_from(&AppSettings::default()).context("Failed to encode default settings")?;

        let mut builder = Config::builder().add_source(defaults);

        if self.settings_path.exists() {
            builder = builder.add_source(
                File::from(self.settings_path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            );
        } else {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(Environment::with_prefix(prefix).try_parsing(true));
        }

        let settings: AppSettings = builder
            .build()
            .with_context(|| format!("Failed to load settings: {}", self.settings_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!(
            "Loaded settings: api={}, output_dir={}, timeout={:?}",
            settings.api_base_url,
            settings.output_dir,
            settings.request_timeout_secs
        );
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap().without_env();
        (manager, temp_dir)
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = Utf8PathBuf::try_from(temp_dir.path().join("a/b")).unwrap();
        let manager = ConfigManager::new(&nested).unwrap();
        assert!(manager.config_dir().exists());
    }

    #[test]
    fn test_defaults_without_file() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = manager.load_settings().unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(
            manager.settings_path(),
            "api_base_url: https://qr.example.net\ncopy_reset_ms: 500\n",
        )
        .unwrap();

        let settings = manager.load_settings().unwrap();
        assert_eq!(settings.api_base_url, "https://qr.example.net");
        assert_eq!(settings.copy_reset_ms, 500);
        assert_eq!(settings.export_delay_ms, 100);
    }

    #[test]
    fn test_save_then_load() {
        let (manager, _temp_dir) = create_test_config_manager();

        let settings = AppSettings {
            request_timeout_secs: Some(15),
            viewport_width: 600,
            ..AppSettings::default()
        };
        manager.save_settings(&settings).unwrap();

        assert_eq!(manager.load_settings().unwrap(), settings);
    }
}
