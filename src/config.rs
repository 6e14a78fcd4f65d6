use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::delivery::DeliveryPolicy;
use crate::locale::Locale;
use crate::reply::TemplateOverrides;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub delivery: DeliveryPolicy,
    #[serde(default)]
    pub reply: ReplyConfig,
    /// Per-locale replacements for the built-in reply fragments
    #[serde(default)]
    pub templates: HashMap<Locale, TemplateOverrides>,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// Tesseract executable
    #[serde(default = "default_ocr_command")]
    pub command: String,
    /// Tesseract language packs, joined with `+`
    #[serde(default = "default_ocr_languages")]
    pub languages: String,
    /// Recognized text shorter than this is treated as no text at all
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
    #[serde(default = "default_true")]
    pub preprocess: bool,
    /// Contrast boost applied after greyscale conversion
    #[serde(default = "default_contrast")]
    pub contrast: f32,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: default_ocr_command(),
            languages: default_ocr_languages(),
            min_text_chars: default_min_text_chars(),
            preprocess: true,
            contrast: default_contrast(),
            temp_dir: default_temp_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplyConfig {
    /// Locale of the generic fallback reply
    #[serde(default)]
    pub default_locale: Locale,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Six-field cron expression for the uptime heartbeat
    #[serde(default = "default_heartbeat_cron")]
    pub heartbeat_cron: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            heartbeat_cron: default_heartbeat_cron(),
        }
    }
}

fn default_ocr_command() -> String {
    "tesseract".to_string()
}

fn default_ocr_languages() -> String {
    "ind+eng".to_string()
}

fn default_min_text_chars() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_contrast() -> f32 {
    30.0
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_heartbeat_cron() -> String {
    "0 0 * * * *".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)?;

        if !config.ocr.temp_dir.exists() {
            std::fs::create_dir_all(&config.ocr.temp_dir).with_context(|| {
                format!(
                    "Failed to create OCR temp directory: {}",
                    config.ocr.temp_dir.display()
                )
            })?;
        }

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse("[telegram]\nbot_token = \"123:abc\"\n").unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.ocr.languages, "ind+eng");
        assert_eq!(config.ocr.min_text_chars, 20);
        assert!(config.ocr.preprocess);
        assert_eq!(config.delivery.initial_delay_secs, 15);
        assert_eq!(config.delivery.max_delay_secs, 120);
        assert_eq!(config.reply.default_locale, Locale::Indonesian);
        assert!(config.templates.is_empty());
        assert_eq!(config.general.heartbeat_cron, "0 0 * * * *");
    }

    #[test]
    fn test_full_config() {
        let content = r#"
[telegram]
bot_token = "123:abc"

[ocr]
languages = "ind"
min_text_chars = 10
preprocess = false

[delivery]
initial_delay_secs = 5
max_attempts = 3

[reply]
default_locale = "javanese"

[templates.javanese]
sign_off = "Nuwun."

[general]
heartbeat_cron = "0 */30 * * * *"
"#;
        let config = Config::parse(content).unwrap();
        assert_eq!(config.ocr.languages, "ind");
        assert_eq!(config.ocr.command, "tesseract");
        assert!(!config.ocr.preprocess);
        assert_eq!(config.delivery.initial_delay_secs, 5);
        assert_eq!(config.delivery.max_delay_secs, 120);
        assert_eq!(config.delivery.max_attempts, 3);
        assert_eq!(config.reply.default_locale, Locale::Javanese);
        assert_eq!(
            config.templates[&Locale::Javanese].sign_off.as_deref(),
            Some("Nuwun.")
        );
        assert_eq!(config.general.heartbeat_cron, "0 */30 * * * *");
    }

    #[test]
    fn test_missing_bot_token_is_an_error() {
        assert!(Config::parse("[ocr]\nlanguages = \"ind\"\n").is_err());
    }

    #[test]
    fn test_load_creates_temp_dir() {
        let root = tempfile::tempdir().unwrap();
        let temp_dir = root.path().join("ocr-scratch");
        let path = root.path().join("config.toml");
        std::fs::write(
            &path,
            format!(
                "[telegram]\nbot_token = \"t\"\n[ocr]\ntemp_dir = {:?}\n",
                temp_dir.display().to_string()
            ),
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.ocr.temp_dir, temp_dir);
        assert!(temp_dir.is_dir());
    }
}
