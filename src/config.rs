//! Tunable engine parameters: ranker weights, priority multipliers and
//! the "low accessibility" / "expiring soon" / fragmentation
//! thresholds the spec otherwise hard-codes as bare numbers.
//!
//! Loaded from TOML the way
//! `examples/freddiehaddad-oxidized/crates/core-config` loads editor
//! settings: a `serde`-derived struct with a `Default` impl matching
//! the documented defaults, optionally overridden by a config file on
//! disk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StowageError};

/// Weights in the ranker's weighted sum `S = mu * (wa*A + wf*F + wz*Z)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankerWeights {
    pub accessibility: f64,
    pub fragmentation: f64,
    pub zone_affinity: f64,
}

impl Default for RankerWeights {
    fn default() -> Self {
        Self { accessibility: 0.5, fragmentation: 0.3, zone_affinity: 0.2 }
    }
}

/// Priority-tier multipliers plus the near-expiry bonus, from spec 4.7.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriorityMultipliers {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
    pub expiry_bonus: f64,
    pub expiry_bonus_window_days: u32,
}

impl Default for PriorityMultipliers {
    fn default() -> Self {
        Self {
            high: 1.5,
            medium: 1.0,
            low: 0.8,
            expiry_bonus: 0.5,
            expiry_bonus_window_days: 30,
        }
    }
}

/// Whole-engine configuration. `#[serde(deny_unknown_fields)]` makes
/// an unrecognized TOML key a load error rather than a silently
/// ignored typo, matching Design Notes' "closed configuration record"
/// guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub ranker_weights: RankerWeights,
    pub priority_multipliers: PriorityMultipliers,
    /// Accessibility score below which an item counts as "low
    /// accessibility" (spec 4.5).
    pub low_accessibility_threshold: f64,
    /// Window used by `recommendations()`'s and `expiring_within`'s
    /// expiry-risk checks.
    pub expiring_soon_days: u32,
    /// Fragmentation index below which, combined with low
    /// utilization, `recommendations()` flags fragmentation (spec 4.9).
    pub fragmentation_warning_threshold: f64,
    /// Utilization fraction below which a low fragmentation index is
    /// still worth flagging (spec 4.9: "fragmentation index < 0.5 and
    /// utilization < 80%"). A nearly-full container is expected to look
    /// fragmented; this keeps that case out of the `Fragmented` tag.
    pub fragmentation_max_utilization: f64,
    /// Utilization fraction above which `recommendations()` flags the
    /// container as nearly full (spec 4.9).
    pub utilization_warning_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ranker_weights: RankerWeights::default(),
            priority_multipliers: PriorityMultipliers::default(),
            low_accessibility_threshold: 40.0,
            expiring_soon_days: 30,
            fragmentation_warning_threshold: 0.5,
            fragmentation_max_utilization: 0.8,
            utilization_warning_threshold: 0.9,
        }
    }
}

impl EngineConfig {
    /// Loads a config from a TOML file, falling back to `Default` if
    /// the file is absent. A malformed file or an unknown key is an
    /// error, not a silent fallback.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|e| StowageError::InvalidArgument(format!("invalid engine config at {}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StowageError::InvalidArgument(format!("cannot read engine config at {}: {e}", path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.ranker_weights.accessibility, 0.5);
        assert_eq!(config.ranker_weights.fragmentation, 0.3);
        assert_eq!(config.ranker_weights.zone_affinity, 0.2);
        assert_eq!(config.priority_multipliers.high, 1.5);
        assert_eq!(config.priority_multipliers.medium, 1.0);
        assert_eq!(config.priority_multipliers.low, 0.8);
        assert_eq!(config.low_accessibility_threshold, 40.0);
        assert_eq!(config.fragmentation_warning_threshold, 0.5);
        assert_eq!(config.fragmentation_max_utilization, 0.8);
        assert_eq!(config.utilization_warning_threshold, 0.9);
    }

    #[test]
    fn missing_config_file_falls_back_to_default() {
        let config = EngineConfig::load_from_file(Path::new("/nonexistent/engine.toml")).unwrap();
        assert_eq!(config.low_accessibility_threshold, 40.0);
    }

    #[test]
    fn unknown_key_is_a_load_error() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("stowage-config-test-{}.toml", std::process::id()));
        std::fs::write(&path, "low_accessibility_threshold = 40.0\nunknown_field = 1\n").unwrap();
        let result = EngineConfig::load_from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
