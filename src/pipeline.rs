//! Pipeline orchestration
//!
//! This module provides the public API for Tactix. It runs every report over
//! one immutable match table:
//!
//! 1. Team shape (k-means clustering)
//! 2. Pressing intensity
//! 3. Space occupation
//! 4. Proxy xG
//! 5. Transitions
//! 6. Narrative
//! 7. Player activity
//! 8. Opponent weak zone
//! 9. Compactness
//! 10. Set-piece proxies
//!
//! Each stage reads the table and returns its own report; nothing is written
//! back to the table.

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{AnalysisConfig, GeneratorConfig};
use crate::error::AnalysisError;
use crate::features::compactness_report;
use crate::generator::MatchGenerator;
use crate::reporters;
use crate::shape::{team_shape_report, ZoneClusterer};
use crate::store::MatchTable;
use crate::types::{MatchReport, ReportProducer};
use crate::xg::ProxyXgModel;
use crate::{PRODUCER_NAME, TACTIX_VERSION};

/// Generate a synthetic match and persist it as a CSV snapshot.
///
/// # Example
/// ```ignore
/// let table = generate_snapshot(
///     Path::new("data/simulated_match_data.csv"),
///     &GeneratorConfig::default(),
/// )?;
/// ```
pub fn generate_snapshot(
    path: &Path,
    config: &GeneratorConfig,
) -> Result<MatchTable, AnalysisError> {
    let table = MatchGenerator::new(config.clone())?.generate();
    table.write_csv(path)?;
    Ok(table)
}

/// Load a CSV snapshot and run the full analysis over it.
pub fn analyze_snapshot(path: &Path, config: AnalysisConfig) -> Result<MatchReport, AnalysisError> {
    let table = MatchTable::read_csv(path)?;
    MatchAnalyzer::new(config)?.analyze(&table)
}

/// Runs every tactical report over a match table
pub struct MatchAnalyzer {
    config: AnalysisConfig,
    instance_id: String,
}

impl MatchAnalyzer {
    /// Create an analyzer, rejecting invalid configuration up front
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            config,
            instance_id: Uuid::new_v4().to_string(),
        })
    }

    /// Create an analyzer with a specific instance ID
    pub fn with_instance_id(
        config: AnalysisConfig,
        instance_id: String,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config, instance_id })
    }

    /// Run all reports over `table`
    pub fn analyze(&self, table: &MatchTable) -> Result<MatchReport, AnalysisError> {
        if table.is_empty() {
            return Err(AnalysisError::EmptyInput(
                "match snapshot contains no records".to_string(),
            ));
        }

        let config = &self.config;
        let thresholds = &config.thresholds;
        let focus = config.focus_team;
        let opponent = focus.opponent();

        info!(
            records = table.len(),
            focus = %focus,
            clusters = config.clusters,
            seed = config.seed,
            "analysing match"
        );

        let clusterer = ZoneClusterer::new(config.clusters, config.seed)
            .with_max_iterations(config.max_iterations);
        let team_shape = team_shape_report(table, focus, &clusterer)?;
        debug!(iterations = team_shape.iterations, "team shape done");

        let pressing = reporters::pressing_intensity(table);
        let space_occupation = reporters::zone_usage(table, focus)?;

        // xG draws get their own generator so they do not depend on any other stage
        let mut xg_rng = ChaCha8Rng::seed_from_u64(config.seed);
        let xg = ProxyXgModel::from_thresholds(thresholds).report(table.records(), &mut xg_rng);
        debug!(shots = xg.shots, "proxy xG assigned");

        let transitions = reporters::transitions(table, thresholds.transition_speed);
        let narrative = reporters::narrative(table);
        let player_activity = reporters::player_activity(table, config.top_players);
        let opponent_weakness = reporters::weak_zone(table, opponent, thresholds.weak_zone_x);
        let compactness = compactness_report(table, focus)?;
        let set_pieces =
            reporters::set_pieces(table, thresholds.set_piece_low_y, thresholds.set_piece_high_y);

        info!("analysis complete");

        Ok(MatchReport {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: TACTIX_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at: Utc::now(),
            focus_team: focus,
            snapshot: table.summary(),
            team_shape,
            pressing,
            space_occupation,
            xg,
            transitions,
            narrative,
            player_activity,
            opponent_weakness,
            compactness,
            set_pieces,
        })
    }
}
