//! Configuration for the extraction engine.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (EXTRACTA_YOUTUBE_API_KEY or YOUTUBE_API_KEY,
//!    EXTRACTA_LOOKUP_TIMEOUT)
//! 2. Config file (.extracta/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .extracta/config.yaml
//! - Falls back to ~/.extracta/config.yaml
//!
//! Nothing here is cached globally. Callers load a [`ResolvedConfig`] and
//! hand the engine what it needs.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::{OEmbedClient, YouTubeDataApi};
use crate::core::classify::DEFAULT_WORDS_PER_MINUTE;
use crate::core::steps::DEFAULT_SECTION_MAX_CHARS;
use crate::core::transcript::DEFAULT_MAX_CHARS;
use crate::core::{EngineSettings, ExtractionEngine};

const CONFIG_DIR: &str = ".extracta";
const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
const DEFAULT_OEMBED_FALLBACK: &str = "https://noembed.com/embed";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub lookups: LookupsConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupsConfig {
    pub timeout_seconds: Option<u64>,
    pub youtube_api_key: Option<String>,
    /// oEmbed endpoint for non-platform URLs; empty string disables it
    pub oembed_fallback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionConfig {
    pub transcript_max_chars: Option<usize>,
    pub section_text_max_chars: Option<usize>,
    pub reading_words_per_minute: Option<u32>,
}

/// Resolved configuration with every default applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub timeout_seconds: u64,
    #[serde(skip_serializing)]
    pub youtube_api_key: Option<String>,
    pub oembed_fallback: Option<String>,
    pub transcript_max_chars: usize,
    pub section_text_max_chars: usize,
    pub reading_words_per_minute: u32,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            youtube_api_key: None,
            oembed_fallback: Some(DEFAULT_OEMBED_FALLBACK.to_string()),
            transcript_max_chars: DEFAULT_MAX_CHARS,
            section_text_max_chars: DEFAULT_SECTION_MAX_CHARS,
            reading_words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

impl ResolvedConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn has_youtube_api_key(&self) -> bool {
        self.youtube_api_key.is_some()
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            transcript_max_chars: self.transcript_max_chars,
            section_max_chars: self.section_text_max_chars,
            words_per_minute: self.reading_words_per_minute,
            lookup_timeout: self.lookup_timeout(),
        }
    }

    /// Engine wired to the HTTP providers this configuration describes
    pub fn build_engine(&self) -> ExtractionEngine {
        let timeout = self.lookup_timeout();
        ExtractionEngine::with_providers(
            self.engine_settings(),
            Arc::new(YouTubeDataApi::from_key(self.youtube_api_key.clone(), timeout)),
            Arc::new(OEmbedClient::new(self.oembed_fallback.clone(), timeout)),
        )
    }
}

/// Find config file by searching `start` and its parents, then the home
/// directory
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let home_config = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge file values, env values and defaults
fn resolve(
    file: ConfigFile,
    config_file: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let non_empty = |v: String| {
        let v = v.trim().to_string();
        (!v.is_empty()).then_some(v)
    };

    let youtube_api_key = env("EXTRACTA_YOUTUBE_API_KEY")
        .and_then(non_empty)
        .or_else(|| env("YOUTUBE_API_KEY").and_then(non_empty))
        .or_else(|| file.lookups.youtube_api_key.and_then(non_empty));

    let timeout_seconds = match env("EXTRACTA_LOOKUP_TIMEOUT") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("EXTRACTA_LOOKUP_TIMEOUT is not a number: {}", raw))?,
        None => file.lookups.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
    };

    let oembed_fallback = match file.lookups.oembed_fallback {
        Some(endpoint) => non_empty(endpoint),
        None => Some(DEFAULT_OEMBED_FALLBACK.to_string()),
    };

    let extraction = file.extraction;

    Ok(ResolvedConfig {
        config_file,
        timeout_seconds,
        youtube_api_key,
        oembed_fallback,
        transcript_max_chars: extraction.transcript_max_chars.unwrap_or(DEFAULT_MAX_CHARS),
        section_text_max_chars: extraction
            .section_text_max_chars
            .unwrap_or(DEFAULT_SECTION_MAX_CHARS),
        reading_words_per_minute: extraction
            .reading_words_per_minute
            .filter(|wpm| *wpm > 0)
            .unwrap_or(DEFAULT_WORDS_PER_MINUTE),
    })
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Load configuration from all sources, discovering the file from the
/// current directory
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config_file = find_config_file(&cwd);
    load_config_with(config_file)
}

/// Load configuration from an explicit file
pub fn load_config_at(path: &Path) -> Result<ResolvedConfig> {
    load_config_with(Some(path.to_path_buf()))
}

fn load_config_with(config_file: Option<PathBuf>) -> Result<ResolvedConfig> {
    let file = match config_file {
        Some(ref path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let resolved = resolve(file, config_file, process_env)?;
    tracing::debug!(
        config_file = ?resolved.config_file,
        youtube_api = resolved.has_youtube_api_key(),
        "Configuration loaded"
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        let config_path = config_dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(ConfigFile::default(), None, env_from(&[])).unwrap();
        assert_eq!(config, ResolvedConfig::default());
        assert_eq!(config.engine_settings(), EngineSettings::default());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
lookups:
  timeout_seconds: 2
  youtube_api_key: "from-file"
  oembed_fallback: ""
extraction:
  transcript_max_chars: 1000
  section_text_max_chars: 200
  reading_words_per_minute: 250
"#,
        );

        let file = load_config_file(&config_path).unwrap();
        assert_eq!(file.version.as_deref(), Some("1.0"));

        let config = resolve(file, Some(config_path), env_from(&[])).unwrap();
        assert_eq!(config.timeout_seconds, 2);
        assert_eq!(config.youtube_api_key.as_deref(), Some("from-file"));
        assert_eq!(config.oembed_fallback, None);
        assert_eq!(config.transcript_max_chars, 1000);
        assert_eq!(config.section_text_max_chars, 200);
        assert_eq!(config.reading_words_per_minute, 250);
    }

    #[test]
    fn test_env_overrides_file() {
        let file: ConfigFile = serde_yaml::from_str(
            "lookups:\n  youtube_api_key: from-file\n  timeout_seconds: 9\n",
        )
        .unwrap();

        let config = resolve(
            file.clone(),
            None,
            env_from(&[("YOUTUBE_API_KEY", "generic"), ("EXTRACTA_LOOKUP_TIMEOUT", "1")]),
        )
        .unwrap();
        assert_eq!(config.youtube_api_key.as_deref(), Some("generic"));
        assert_eq!(config.timeout_seconds, 1);

        let config = resolve(
            file,
            None,
            env_from(&[("EXTRACTA_YOUTUBE_API_KEY", "specific"), ("YOUTUBE_API_KEY", "generic")]),
        )
        .unwrap();
        assert_eq!(config.youtube_api_key.as_deref(), Some("specific"));
    }

    #[test]
    fn test_bad_timeout_env_is_an_error() {
        let result = resolve(
            ConfigFile::default(),
            None,
            env_from(&[("EXTRACTA_LOOKUP_TIMEOUT", "soon")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_discovery_walks_parents() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "version: \"1.0\"");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested), Some(config_path));
    }

    #[test]
    fn test_load_config_at_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "lookups: [not, a, map]");
        let err = load_config_at(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
