// Engine configuration loading and validation.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseStrError(#[from] toml::de::Error),

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Candidate scoring tunables.
///
/// The value weight and the confidence threshold are product decisions, not
/// derived quantities, so they live in configuration rather than code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight applied to a candidate's current value when scoring:
    /// `score = season_score + bonus_score - current_value * value_weight`.
    pub value_weight: f64,
    /// Incoming players whose play-time confidence falls below this draw an
    /// advisory warning on the solution.
    pub low_confidence_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            value_weight: 0.05,
            low_confidence_threshold: 0.5,
        }
    }
}

/// Roster-composition rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Maximum players owned from one real club.
    pub club_cap: usize,
    /// Base number of outgoing slots; each departed squad player adds one.
    pub base_outgoing_allowance: usize,
    /// Distinct solutions the automatic mode aims for.
    pub max_solutions: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            club_cap: 3,
            base_outgoing_allowance: 5,
            max_solutions: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub rules: RulesConfig,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

impl EngineConfig {
    /// Parse a TOML string and validate it. Missing sections and fields fall
    /// back to the defaults.
    pub fn from_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let config: EngineConfig =
            toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.scoring.value_weight.is_finite() || self.scoring.value_weight < 0.0 {
            return Err(ConfigError::ValidationError {
                field: "scoring.value_weight".into(),
                message: format!("must be finite and >= 0, got {}", self.scoring.value_weight),
            });
        }

        let threshold = self.scoring.low_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ValidationError {
                field: "scoring.low_confidence_threshold".into(),
                message: format!("must be between 0.0 and 1.0 inclusive, got {threshold}"),
            });
        }

        let counts: &[(&str, usize)] = &[
            ("rules.club_cap", self.rules.club_cap),
            (
                "rules.base_outgoing_allowance",
                self.rules.base_outgoing_allowance,
            ),
            ("rules.max_solutions", self.rules.max_solutions),
        ];
        for (name, val) in counts {
            if *val == 0 {
                return Err(ConfigError::ValidationError {
                    field: name.to_string(),
                    message: "must be > 0".into(),
                });
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
