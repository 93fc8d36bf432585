use crate::generate::RetryPolicy;
use crate::notes::GenerationMode;
use crate::render::ColorChoice;
use crate::render::terminal::DEFAULT_MAX_WIDTH;
use crate::store::NoteStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    /// How notes are generated from transcripts
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Notes file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn notes_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(NoteStore::default_path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Shell command that reads a prompt on stdin and prints the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default)]
    pub mode: GenerationMode,

    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            command: None,
            mode: GenerationMode::default(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl GenerationConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_millis(self.retry_delay_ms))
    }
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// "auto", "always" or "never"
    #[serde(default)]
    pub color_mode: ColorChoice,

    /// Tables wider than this are shrunk, truncating cells
    #[serde(default = "default_max_table_width")]
    pub max_table_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorChoice::default(),
            max_table_width: default_max_table_width(),
        }
    }
}

fn default_max_table_width() -> usize {
    DEFAULT_MAX_WIDTH
}

impl Config {
    /// Get the XDG-style config file path (~/.config/lecturescribe/config.toml)
    #[cfg(target_os = "macos")]
    fn xdg_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| {
            p.join(".config")
                .join("lecturescribe")
                .join("config.toml")
        })
    }

    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/lecturescribe/config.toml
    /// - Linux: ~/.config/lecturescribe/config.toml
    /// - Windows: %APPDATA%/lecturescribe/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lecturescribe").join("config.toml"))
    }

    /// Load config from file, or return default if file doesn't exist
    /// On macOS, checks ~/.config/lecturescribe first
    pub fn load() -> Self {
        #[cfg(target_os = "macos")]
        {
            if let Some(config) = Self::xdg_config_path().and_then(|p| Self::read(&p)) {
                return config;
            }
        }

        Self::config_path()
            .and_then(|path| Self::read(&path))
            .unwrap_or_default()
    }

    /// Load config from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        Self::read(path).unwrap_or_default()
    }

    fn read(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        match toml::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    /// Save config to the platform config path
    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("Could not determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.generation.retries, 3);
        assert_eq!(config.generation.retry_delay_ms, 2000);
        assert_eq!(config.generation.mode, GenerationMode::Full);
        assert_eq!(config.display.color_mode, ColorChoice::Auto);
        assert_eq!(config.display.max_table_width, 100);
        assert_eq!(
            config.generation.retry_policy(),
            RetryPolicy::new(3, Duration::from_secs(2))
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [generation]
            command = "llm -m mini"
            mode = "key-concepts"

            [display]
            color_mode = "never"
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.command.as_deref(), Some("llm -m mini"));
        assert_eq!(config.generation.mode, GenerationMode::KeyConcepts);
        assert_eq!(config.generation.retries, 3);
        assert_eq!(config.display.color_mode, ColorChoice::Never);
        assert_eq!(config.display.max_table_width, 100);
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_save_and_load_from() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = Config::default();
        config.store.path = Some(PathBuf::from("/tmp/notes.json"));
        config.display.max_table_width = 72;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display]\nmax_table_width = \"wide\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_store_path_override() {
        let store = StoreConfig {
            path: Some(PathBuf::from("notes.json")),
        };
        assert_eq!(store.notes_path(), PathBuf::from("notes.json"));
        assert!(StoreConfig::default().notes_path().ends_with("lecturescribe/notes.json"));
    }
}
