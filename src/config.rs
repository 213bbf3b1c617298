//! Analysis and generator configuration
//!
//! Every domain heuristic (xG zones, speed and pitch thresholds) lives here as
//! a named, overridable value. Configuration can be loaded from JSON; omitted
//! fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::types::Team;

/// Default number of shape clusters
pub const DEFAULT_CLUSTERS: usize = 4;

/// Default seed shared by generation, clustering and xG assignment
pub const DEFAULT_SEED: u64 = 42;

/// Default bound on k-means iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// Default size of the player activity leaderboard
pub const DEFAULT_TOP_PLAYERS: usize = 5;

/// Length of a regulation match in minutes
pub const MATCH_MINUTES: u8 = 90;

/// Largest roster a generated team may field
pub const MAX_PLAYERS_PER_TEAM: usize = 99;

/// Default snapshot location
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/simulated_match_data.csv";

/// Inclusive value range used for proxy xG draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XgRange {
    pub min: f64,
    pub max: f64,
}

impl XgRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> Result<(), AnalysisError> {
        if !(0.0..=1.0).contains(&self.min) || !(0.0..=1.0).contains(&self.max) {
            return Err(AnalysisError::Configuration(format!(
                "{} must lie within [0, 1], got [{}, {}]",
                name, self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(AnalysisError::Configuration(format!(
                "{} is inverted: min {} > max {}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Heuristic thresholds used by the derived metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Shots beyond this x are treated as attacking-third shots
    pub xg_attacking_x: f64,
    pub xg_attacking_range: XgRange,
    pub xg_default_range: XgRange,
    /// Carries faster than this count as transitions
    pub transition_speed: f64,
    /// Opponent actions below this x are in its weak zone
    pub weak_zone_x: f64,
    /// Shots with y below this are wide set-piece proxies
    pub set_piece_low_y: f64,
    /// Shots with y above this are wide set-piece proxies
    pub set_piece_high_y: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            xg_attacking_x: 70.0,
            xg_attacking_range: XgRange::new(0.30, 0.60),
            xg_default_range: XgRange::new(0.05, 0.25),
            transition_speed: 5.0,
            weak_zone_x: 30.0,
            set_piece_low_y: 20.0,
            set_piece_high_y: 80.0,
        }
    }
}

/// Configuration for a match analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Team whose shape, zones and compactness are analysed
    pub focus_team: Team,
    pub clusters: usize,
    pub seed: u64,
    pub max_iterations: usize,
    pub top_players: usize,
    pub thresholds: Thresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            focus_team: Team::A,
            clusters: DEFAULT_CLUSTERS,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            top_players: DEFAULT_TOP_PLAYERS,
            thresholds: Thresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings no analysis can run with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.clusters == 0 {
            return Err(AnalysisError::Configuration(
                "cluster count must be at least 1".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(AnalysisError::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        let t = &self.thresholds;
        t.xg_attacking_range.validate("xg_attacking_range")?;
        t.xg_default_range.validate("xg_default_range")?;

        if t.set_piece_low_y > t.set_piece_high_y {
            return Err(AnalysisError::Configuration(format!(
                "set-piece band is inverted: low {} > high {}",
                t.set_piece_low_y, t.set_piece_high_y
            )));
        }
        if t.transition_speed < 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "transition_speed must be non-negative, got {}",
                t.transition_speed
            )));
        }
        Ok(())
    }
}

/// Configuration for synthetic match generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub minutes: u8,
    pub players_per_team: usize,
    /// Relative event weights, in `EventKind::ALL` order
    pub event_weights: [f64; 5],
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            minutes: MATCH_MINUTES,
            players_per_team: 11,
            event_weights: [0.35, 0.08, 0.20, 0.25, 0.12],
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.minutes == 0 || self.minutes > MATCH_MINUTES {
            return Err(AnalysisError::Configuration(format!(
                "minutes must be within 1..={}, got {}",
                MATCH_MINUTES, self.minutes
            )));
        }
        if self.players_per_team == 0 || self.players_per_team > MAX_PLAYERS_PER_TEAM {
            return Err(AnalysisError::Configuration(format!(
                "players_per_team must be within 1..={}, got {}",
                MAX_PLAYERS_PER_TEAM, self.players_per_team
            )));
        }
        self.record_count().ok_or_else(|| {
            AnalysisError::Configuration(format!(
                "{} players per team over {} minutes overflows the record count",
                self.players_per_team, self.minutes
            ))
        })?;
        if self.event_weights.iter().any(|w| !w.is_finite() || *w < 0.0)
            || self.event_weights.iter().sum::<f64>() <= 0.0
        {
            return Err(AnalysisError::Configuration(format!(
                "event weights must be non-negative with a positive sum, got {:?}",
                self.event_weights
            )));
        }
        Ok(())
    }

    /// Records a generated match holds, `None` on overflow
    pub fn record_count(&self) -> Option<usize> {
        self.players_per_team
            .checked_mul(2)?
            .checked_mul(self.minutes as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AnalysisConfig::from_json(
            r#"{"clusters": 6, "thresholds": {"weak_zone_x": 25.0}}"#,
        )
        .unwrap();

        assert_eq!(config.clusters, 6);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.thresholds.weak_zone_x, 25.0);
        assert_eq!(config.thresholds.xg_attacking_x, 70.0);
        assert_eq!(config.focus_team, Team::A);
    }

    #[test]
    fn test_json_round_trip() {
        let config = AnalysisConfig {
            focus_team: Team::B,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(AnalysisConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_zero_clusters_rejected() {
        let config = AnalysisConfig {
            clusters: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::Configuration(_))
        ));
    }

    #[test]
    fn test_inverted_xg_range_rejected() {
        let mut config = AnalysisConfig::default();
        config.thresholds.xg_default_range = XgRange::new(0.4, 0.1);
        assert!(config.validate().is_err());

        config.thresholds.xg_default_range = XgRange::new(0.1, 1.4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generator_weights() {
        let bad = GeneratorConfig {
            event_weights: [0.0; 5],
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_generator_roster_bounds() {
        assert_eq!(GeneratorConfig::default().record_count(), Some(1980));

        for players_per_team in [0, MAX_PLAYERS_PER_TEAM + 1, usize::MAX / 2 + 1] {
            let config = GeneratorConfig {
                minutes: 1,
                players_per_team,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(AnalysisError::Configuration(_))
            ));
        }

        let largest = GeneratorConfig {
            players_per_team: MAX_PLAYERS_PER_TEAM,
            ..Default::default()
        };
        assert!(largest.validate().is_ok());
    }
}
