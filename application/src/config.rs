//! Generation parameters
//!
//! The configured request parameters the loop sends with every model call.
//! Loaded once before the loop starts; immutable for the session.

use serde::{Deserialize, Serialize};

/// Model request parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,
    /// Maximum output tokens per response
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationParams {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}
