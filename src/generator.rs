//! Synthetic match generation
//!
//! Produces one record per (player, minute) with a uniformly random position
//! and speed and an event drawn from a fixed distribution. The generator owns
//! its seeded RNG, so two generators built from the same config produce the
//! same match.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::AnalysisError;
use crate::store::MatchTable;
use crate::types::{EventKind, EventRecord, Team};
use crate::zones::{PITCH_MAX, PITCH_MIN};

/// Upper bound of generated speeds
pub const MAX_SPEED: f64 = 8.0;

/// Seeded generator of synthetic tracking data
pub struct MatchGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    events: WeightedIndex<f64>,
}

impl MatchGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let events = WeightedIndex::new(config.event_weights)
            .map_err(|e| AnalysisError::Configuration(format!("invalid event weights: {}", e)))?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            events,
        })
    }

    /// Player identifier for a 1-based roster slot
    pub fn player_id(slot: usize) -> String {
        format!("P{}", slot)
    }

    /// Generate a full match, minute by minute, every player once per minute
    pub fn generate(&mut self) -> MatchTable {
        let roster = self.config.players_per_team * 2;
        let mut records = Vec::with_capacity(self.config.record_count().unwrap_or_default());

        for minute in 1..=self.config.minutes {
            for slot in 1..=roster {
                records.push(self.record(minute, slot));
            }
        }

        debug!(
            records = records.len(),
            seed = self.config.seed,
            "generated synthetic match"
        );
        MatchTable::new(records)
    }

    fn record(&mut self, minute: u8, slot: usize) -> EventRecord {
        let x = self.rng.gen_range(PITCH_MIN..PITCH_MAX);
        let y = self.rng.gen_range(PITCH_MIN..PITCH_MAX);
        let speed = self.rng.gen_range(0.0..MAX_SPEED);
        let event = EventKind::ALL[self.events.sample(&mut self.rng)];

        EventRecord {
            minute,
            player: Self::player_id(slot),
            team: Team::for_roster_slot(slot, self.config.players_per_team),
            x,
            y,
            speed,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn default_match() -> MatchTable {
        MatchGenerator::new(GeneratorConfig::default())
            .unwrap()
            .generate()
    }

    #[test]
    fn test_full_match_shape() {
        let table = default_match();
        assert_eq!(table.len(), 22 * 90);

        let keys: HashSet<_> = table.records().iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), 1980);

        let integrity = table.check_integrity(11);
        assert!(integrity.is_valid(), "{:?}", integrity);
    }

    #[test]
    fn test_values_within_bounds() {
        for r in default_match().records() {
            assert!((1..=90).contains(&r.minute));
            assert!((0.0..=100.0).contains(&r.x));
            assert!((0.0..=100.0).contains(&r.y));
            assert!((0.0..=8.0).contains(&r.speed));
        }
    }

    #[test]
    fn test_roster_split() {
        let table = default_match();
        for r in table.records() {
            let slot: usize = r.player[1..].parse().unwrap();
            let expected = if slot <= 11 { Team::A } else { Team::B };
            assert_eq!(r.team, expected);
        }
    }

    #[test]
    fn test_same_seed_same_match() {
        assert_eq!(default_match().records(), default_match().records());

        let other = MatchGenerator::new(GeneratorConfig {
            seed: 7,
            ..Default::default()
        })
        .unwrap()
        .generate();
        assert_ne!(default_match().records(), other.records());
    }

    #[test]
    fn test_event_mix_follows_weights() {
        let table = default_match();
        let n = table.len() as f64;
        let share = |kind: EventKind| {
            table.records().iter().filter(|r| r.event == kind).count() as f64 / n
        };
        // Loose bounds: 1980 draws keep each share well within 5 points
        assert!((share(EventKind::Pass) - 0.35).abs() < 0.05);
        assert!((share(EventKind::Shot) - 0.08).abs() < 0.05);
        assert!((share(EventKind::Pressure) - 0.20).abs() < 0.05);
        assert!((share(EventKind::Carry) - 0.25).abs() < 0.05);
        assert!((share(EventKind::None) - 0.12).abs() < 0.05);
    }

    #[test]
    fn test_zero_weight_event_never_drawn() {
        let mut config = GeneratorConfig {
            minutes: 10,
            ..Default::default()
        };
        config.event_weights = [1.0, 0.0, 1.0, 1.0, 1.0];
        let table = MatchGenerator::new(config).unwrap().generate();
        assert_eq!(table.len(), 220);
        assert!(table.records().iter().all(|r| r.event != EventKind::Shot));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeneratorConfig {
            players_per_team: 0,
            ..Default::default()
        };
        assert!(MatchGenerator::new(config).is_err());

        let oversized = GeneratorConfig {
            minutes: 1,
            players_per_team: usize::MAX / 2 + 1,
            ..Default::default()
        };
        assert!(matches!(
            MatchGenerator::new(oversized),
            Err(AnalysisError::Configuration(_))
        ));
    }
}
