//! Configuration for FlintKV
//!
//! Centralized configuration with sensible defaults. The binary fills it
//! from command-line flags; embedders use [`Config::builder`].

/// Default number of keys above which KEYS logs a warning.
pub const DEFAULT_KEYS_WARN_THRESHOLD: usize = 10_000;

/// Default shell prompt.
pub const DEFAULT_PROMPT: &str = "flintkv> ";

/// Main configuration for a FlintKV instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Engine Configuration
    // -------------------------------------------------------------------------
    /// KEYS walks the whole index; above this many keys it logs a warning.
    pub keys_warn_threshold: usize,

    // -------------------------------------------------------------------------
    // Shell Configuration
    // -------------------------------------------------------------------------
    /// Prompt written before each line is read. `None` disables it.
    pub prompt: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keys_warn_threshold: DEFAULT_KEYS_WARN_THRESHOLD,
            prompt: Some(DEFAULT_PROMPT.to_string()),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the KEYS warning threshold
    pub fn keys_warn_threshold(mut self, count: usize) -> Self {
        self.config.keys_warn_threshold = count;
        self
    }

    /// Set the shell prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    /// Disable the shell prompt (useful when input is piped)
    pub fn no_prompt(mut self) -> Self {
        self.config.prompt = None;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = Config::builder()
            .keys_warn_threshold(5)
            .no_prompt()
            .build();
        assert_eq!(config.keys_warn_threshold, 5);
        assert_eq!(config.prompt, None);

        let config = Config::builder().prompt("> ").build();
        assert_eq!(config.prompt.as_deref(), Some("> "));
        assert_eq!(config.keys_warn_threshold, DEFAULT_KEYS_WARN_THRESHOLD);
    }
}
