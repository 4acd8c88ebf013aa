// src/utils/progress_bars/progress_config.rs

use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::time::Duration;

use crate::utils::constants::PROGRESS_INTERVAL;

/// Configuration for progress reporting during the two passes
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show the spinner at all
    pub enabled: bool,
    /// Refresh rate for the spinner in milliseconds
    pub refresh_rate_ms: u64,
    /// Whether to show memory usage in progress log lines
    pub show_memory: bool,
    /// Records between progress log lines
    pub interval: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_rate_ms: 100,
            show_memory: true,
            interval: PROGRESS_INTERVAL,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("PROGRESS_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            refresh_rate_ms: env::var("PROGRESS_REFRESH_RATE_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            show_memory: env::var("PROGRESS_SHOW_MEMORY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            interval: env::var("PROGRESS_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u64| *v > 0)
                .unwrap_or(PROGRESS_INTERVAL),
        }
    }

    /// Spinner for a pass of unknown length, None when progress is disabled
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(self.refresh_rate_ms.max(10)));
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Whether a progress line is due after `count` records
    pub fn is_milestone(&self, count: u64) -> bool {
        count > 0 && count % self.interval == 0
    }

    /// Check if memory usage should be shown
    pub fn should_show_memory(&self) -> bool {
        self.enabled && self.show_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = ProgressConfig::default();
        assert!(config.enabled);
        assert_eq!(config.refresh_rate_ms, 100);
        assert!(config.show_memory);
        assert_eq!(config.interval, 10_000);
    }

    #[test]
    fn test_env_config() {
        // Set test environment variables
        env::set_var("PROGRESS_ENABLED", "false");
        env::set_var("PROGRESS_REFRESH_RATE_MS", "50");
        env::set_var("PROGRESS_SHOW_MEMORY", "false");
        env::set_var("PROGRESS_INTERVAL", "250");

        let config = ProgressConfig::from_env();
        assert!(!config.enabled);
        assert_eq!(config.refresh_rate_ms, 50);
        assert!(!config.show_memory);
        assert_eq!(config.interval, 250);

        // Clean up
        env::remove_var("PROGRESS_ENABLED");
        env::remove_var("PROGRESS_REFRESH_RATE_MS");
        env::remove_var("PROGRESS_SHOW_MEMORY");
        env::remove_var("PROGRESS_INTERVAL");
    }

    #[test]
    fn test_spinner_creation() {
        let mut config = ProgressConfig::default();

        config.enabled = false;
        assert!(config.create_spinner("mapping").is_none());

        config.enabled = true;
        let pb = config.create_spinner("mapping");
        assert!(pb.is_some());
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    }

    #[test]
    fn test_milestones() {
        let config = ProgressConfig {
            interval: 3,
            ..Default::default()
        };
        assert!(!config.is_milestone(0));
        assert!(!config.is_milestone(2));
        assert!(config.is_milestone(3));
        assert!(config.is_milestone(9));
    }
}
