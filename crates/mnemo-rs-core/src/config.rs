//! Planner configuration.

use crate::error::RetrievalError;
use mnemo_rs_store::{StoreError, validate_top_k};
use serde::{Deserialize, Serialize};

/// Smallest accepted recall `top_k` for prior-session lookups.
const RECALL_TOP_K_MIN: usize = 3;
/// Largest accepted recall `top_k` for prior-session lookups.
const RECALL_TOP_K_MAX: usize = 5;

/// Tunable retrieval policy knobs, with conservative defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of most-recent sessions hydrated with full content.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    /// Result cap for category-scoped semantic queries.
    #[serde(default = "default_semantic_top_k")]
    pub semantic_top_k: usize,
    /// Result cap for prior-session recall queries.
    #[serde(default = "default_recall_top_k")]
    pub recall_top_k: usize,
}

fn default_recent_window() -> usize {
    2
}

fn default_semantic_top_k() -> usize {
    4
}

fn default_recall_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            recent_window: default_recent_window(),
            semantic_top_k: default_semantic_top_k(),
            recall_top_k: default_recall_top_k(),
        }
    }
}

impl RetrievalConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::new()
    }

    /// Reject out-of-range caps before any plan is built.
    pub fn validate(&self) -> Result<(), RetrievalError> {
        validate_top_k(self.semantic_top_k)?;
        validate_top_k(self.recall_top_k)?;
        if !(RECALL_TOP_K_MIN..=RECALL_TOP_K_MAX).contains(&self.recall_top_k) {
            return Err(RetrievalError::Store(StoreError::InvalidQuery(format!(
                "recall_top_k must be in [{RECALL_TOP_K_MIN}, {RECALL_TOP_K_MAX}], got {}",
                self.recall_top_k
            ))));
        }
        Ok(())
    }
}

/// Builder for assembling a `RetrievalConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: RetrievalConfig::default(),
        }
    }

    /// Set the recent-window size.
    pub fn recent_window(mut self, recent_window: usize) -> Self {
        self.config.recent_window = recent_window;
        self
    }

    /// Set the scoped semantic query cap.
    pub fn semantic_top_k(mut self, semantic_top_k: usize) -> Self {
        self.config.semantic_top_k = semantic_top_k;
        self
    }

    /// Set the prior-session recall cap.
    pub fn recall_top_k(mut self, recall_top_k: usize) -> Self {
        self.config.recall_top_k = recall_top_k;
        self
    }

    /// Validate and produce the config.
    pub fn build(self) -> Result<RetrievalConfig, RetrievalError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::RetrievalConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_validate_and_round_trip() {
        let config = RetrievalConfig::default();
        config.validate().expect("defaults valid");
        assert_eq!(config.recent_window, 2);
        let json = serde_json::to_string(&config).expect("serialize");
        let back: RetrievalConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }

    #[test]
    fn builder_rejects_out_of_range_caps() {
        assert!(
            RetrievalConfig::builder()
                .semantic_top_k(21)
                .build()
                .is_err()
        );
        assert!(RetrievalConfig::builder().recall_top_k(6).build().is_err());
        assert!(RetrievalConfig::builder().recall_top_k(2).build().is_err());
        let config = RetrievalConfig::builder()
            .recent_window(3)
            .recall_top_k(5)
            .build()
            .expect("valid");
        assert_eq!(config.recent_window, 3);
        assert_eq!(config.recall_top_k, 5);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: RetrievalConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, RetrievalConfig::default());
    }
}
