use serde::{Deserialize, Serialize};
use web_time::Duration;

const DEFAULT_PACING_PER_CANDIDATE_MS: u64 = 800;
const DEFAULT_MAX_PACING_MS: u64 = 8_000;
const DEFAULT_AUTOMATED_PREFIX: &str = "AI";

/// Engine-wide settings. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pacing added per candidate move the automated opponent considered.
    pub pacing_per_candidate_ms: u64,
    /// Upper bound on the whole pacing delay.
    pub max_pacing_ms: u64,
    /// Automated players are named `<prefix>_<n>`.
    pub automated_name_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing_per_candidate_ms: DEFAULT_PACING_PER_CANDIDATE_MS,
            max_pacing_ms: DEFAULT_MAX_PACING_MS,
            automated_name_prefix: DEFAULT_AUTOMATED_PREFIX.to_string(),
        }
    }
}

impl EngineConfig {
    /// Config without any pacing, for tests and headless play.
    pub fn instant() -> Self {
        Self {
            pacing_per_candidate_ms: 0,
            max_pacing_ms: 0,
            ..Self::default()
        }
    }

    /// Delay for an automated decision that considered `candidates` moves.
    pub fn pacing_for(&self, candidates: usize) -> Duration {
        let millis = self
            .pacing_per_candidate_ms
            .saturating_mul(candidates as u64)
            .min(self.max_pacing_ms);
        Duration::from_millis(millis)
    }

    pub fn automated_name(&self, serial: u64) -> String {
        format!("{}_{serial}", self.automated_name_prefix)
    }
}
