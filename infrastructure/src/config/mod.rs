//! Configuration loading with multi-source merging
//!
//! Sources, lowest to highest priority:
//!
//! 1. Built-in defaults
//! 2. Global config: `~/.config/confab/config.toml`
//! 3. Project config: `./confab.toml`
//! 4. Environment: `OPENAI_API_KEY`, `BASE_URL`, `MODEL`, `MAX_TOKENS`,
//!    `TEMPERATURE`, `SYSTEM_PROMPT`, `PLUGIN_DIR`
//!
//! Loaded once before the chat loop starts; immutable for the session.
//! Validation failures are fatal at startup and carry remediation steps.

use confab_application::config::GenerationParams;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Expected shape of an OpenAI-style API key
const KEY_PATTERN: &str = r"^sk-[A-Za-z0-9_-]{20,}$";

/// Configuration errors, fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("max_tokens must be between 1 and 32768 (got {0})")]
    InvalidMaxTokens(u32),

    #[error("temperature must be between 0.0 and 2.0 (got {0})")]
    InvalidTemperature(f32),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl ConfigError {
    /// Remediation steps printed alongside the error before exiting
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingApiKey => Some(
                "Please set up your API key:\n\
                 1. Export it in your shell: export OPENAI_API_KEY=sk-...\n\
                 2. Or add `api_key = \"sk-...\"` to ~/.config/confab/config.toml\n\
                 3. Run confab again",
            ),
            _ => None,
        }
    }
}

/// Chat client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// API credential, sent as a bearer token
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Maximum output tokens per response
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// System instruction, always first in the conversation
    pub system_prompt: String,
    /// Plugin manifest directory; defaults to `<config dir>/confab/tools`
    pub plugin_dir: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            system_prompt: "You are a helpful assistant with access to tools.".to_string(),
            plugin_dir: None,
        }
    }
}

impl ChatConfig {
    /// Check the loaded values, failing on anything the session cannot
    /// start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if !(1..=32768).contains(&self.max_tokens) {
            return Err(ConfigError::InvalidMaxTokens(self.max_tokens));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }

        // Key shape is a warning only: compatible providers use keys that
        // do not follow the OpenAI format.
        if let Ok(re) = Regex::new(KEY_PATTERN) {
            if !re.is_match(self.api_key.trim()) {
                warn!("API key does not look like an OpenAI key (expected sk-...)");
            }
        }

        Ok(())
    }

    /// The generation parameters the loop sends with every request
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams::new(self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }

    /// The plugin directory to scan: configured value, or the default
    /// under the user config dir.
    pub fn resolved_plugin_dir(&self) -> Option<PathBuf> {
        self.plugin_dir
            .clone()
            .or_else(|| dirs::config_dir().map(|d| d.join("confab").join("tools")))
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&PathBuf>) -> Result<ChatConfig, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ChatConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        let project_path = PathBuf::from("confab.toml");
        if project_path.exists() {
            figment = figment.merge(Toml::file(&project_path));
        }

        // Explicit config path (highest priority for files)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(
            Env::raw()
                .only(&[
                    "OPENAI_API_KEY",
                    "BASE_URL",
                    "MODEL",
                    "MAX_TOKENS",
                    "TEMPERATURE",
                    "SYSTEM_PROMPT",
                    "PLUGIN_DIR",
                ])
                .map(|key| {
                    if key.as_str().eq_ignore_ascii_case("OPENAI_API_KEY") {
                        "api_key".into()
                    } else {
                        key.as_str().to_lowercase().into()
                    }
                }),
        );

        figment.extract().map_err(Box::new).map_err(Into::into)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> ChatConfig {
        ChatConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("confab").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ChatConfig {
        ChatConfig {
            api_key: "sk-abcdefghijklmnopqrstuvwxyz123456".to_string(),
            ..ChatConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 1000);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_missing_api_key_is_fatal_with_remediation() {
        let config = ChatConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.remediation().unwrap().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_numeric_ranges_are_fatal() {
        let config = ChatConfig {
            max_tokens: 0,
            ..valid_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMaxTokens(0))
        ));

        let config = ChatConfig {
            temperature: 2.5,
            ..valid_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_generation_params_mirror_config() {
        let config = ChatConfig {
            model: "gpt-4o".to_string(),
            max_tokens: 512,
            temperature: 0.2,
            ..valid_config()
        };
        let params = config.generation_params();
        assert_eq!(params.model, "gpt-4o");
        assert_eq!(params.max_tokens, 512);
        assert!((params.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "confab.toml",
                r#"
                    model = "from-file"
                    max_tokens = 256
                "#,
            )?;
            jail.set_env("MODEL", "from-env");
            jail.set_env("OPENAI_API_KEY", "sk-testkey_abcdefghijklmnop");

            let config = ConfigLoader::load(None).expect("config loads");
            assert_eq!(config.model, "from-env");
            assert_eq!(config.max_tokens, 256);
            assert_eq!(config.api_key, "sk-testkey_abcdefghijklmnop");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_config_path() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", r#"system_prompt = "Talk like a pirate.""#)?;

            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).expect("config loads");
            assert_eq!(config.system_prompt, "Talk like a pirate.");
            Ok(())
        });
    }
}
