use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// What `flush` does when a frame violates the proposal invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationPolicy {
    /// Destroy the queue, log, and hand the error back to the host.
    #[default]
    Error,
    /// Destroy the queue and panic.
    Panic,
}

impl FromStr for ViolationPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "panic" => Ok(Self::Panic),
            other => bail!("unknown violation policy: {other} (expected `error` or `panic`)"),
        }
    }
}

/// Engine configuration.
///
/// Precedence, lowest first: defaults, the `[engine]` table of a TOML file,
/// then `REWIND_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub violation_policy: ViolationPolicy,
    /// Warn every time History grows by this many bundles.
    #[serde(default)]
    pub history_warn_len: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    engine: EngineConfig,
}

impl EngineConfig {
    /// Load configuration from an optional TOML file and the environment.
    /// A `.env` file in the working directory is honored.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let base = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                Self::from_toml_str(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => Self::default(),
        };

        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.log_summary();
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)?;
        Ok(file.engine)
    }

    /// Apply `REWIND_VIOLATION_POLICY` and `REWIND_HISTORY_WARN_LEN` from `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(policy) = lookup("REWIND_VIOLATION_POLICY") {
            self.violation_policy = policy.parse()?;
        }
        if let Some(len) = lookup("REWIND_HISTORY_WARN_LEN") {
            let len: usize = len
                .trim()
                .parse()
                .with_context(|| format!("REWIND_HISTORY_WARN_LEN must be a number, got {len:?}"))?;
            self.history_warn_len = (len > 0).then_some(len);
        }
        Ok(self)
    }

    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  violation_policy: {:?}", self.violation_policy);
        match self.history_warn_len {
            Some(len) => tracing::info!("  history_warn_len: {len}"),
            None => tracing::info!("  history_warn_len: <not set>"),
        }
    }
}
