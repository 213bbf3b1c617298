//! Match snapshot store
//!
//! Holds the flat event table every analysis reads from, and moves it to and
//! from the CSV snapshot (`minute,player,team,x,y,speed,event`). The table is
//! immutable once built; analyses borrow records and return their own results.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::config::MATCH_MINUTES;
use crate::error::AnalysisError;
use crate::generator::MAX_SPEED;
use crate::types::{EventKind, EventRecord, Point, RecordKey, SnapshotSummary, Team};
use crate::zones::{PITCH_MAX, PITCH_MIN};

/// Columns every snapshot must carry
pub const COLUMNS: [&str; 7] = ["minute", "player", "team", "x", "y", "speed", "event"];

/// In-memory event table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTable {
    records: Vec<EventRecord>,
}

impl MatchTable {
    pub fn new(records: Vec<EventRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records belonging to one team, in table order
    pub fn team_records(&self, team: Team) -> Vec<&EventRecord> {
        self.records.iter().filter(|r| r.team == team).collect()
    }

    /// Records carrying a given event, in table order
    pub fn records_with(&self, kind: EventKind) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(move |r| r.event == kind)
    }

    /// Positions of one team's records, in table order
    pub fn points_for(&self, team: Team) -> Vec<Point> {
        self.records
            .iter()
            .filter(|r| r.team == team)
            .map(|r| r.position())
            .collect()
    }

    pub fn summary(&self) -> SnapshotSummary {
        let minutes: HashSet<u8> = self.records.iter().map(|r| r.minute).collect();
        let players: HashSet<&str> = self.records.iter().map(|r| r.player.as_str()).collect();
        SnapshotSummary {
            records: self.records.len(),
            minutes: minutes.len(),
            players: players.len(),
        }
    }

    /// Write the table to a CSV snapshot, creating parent directories
    pub fn write_csv(&self, path: &Path) -> Result<(), AnalysisError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.write_to(file)?;
        info!(path = %path.display(), records = self.records.len(), "wrote match snapshot");
        Ok(())
    }

    /// Write the table as CSV to any writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), AnalysisError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Load a CSV snapshot
    pub fn read_csv(path: &Path) -> Result<Self, AnalysisError> {
        let file = File::open(path)?;
        let table = Self::read_from(file)?;
        info!(path = %path.display(), records = table.len(), "loaded match snapshot");
        Ok(table)
    }

    /// Read CSV from any reader, checking columns and value bounds
    pub fn read_from<R: Read>(reader: R) -> Result<Self, AnalysisError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(AnalysisError::Configuration(format!(
                    "snapshot is missing required column '{}'",
                    column
                )));
            }
        }

        let mut records = Vec::new();
        for row in rdr.deserialize::<SnapshotRow>() {
            records.push(row?.into_record()?);
        }

        debug!(records = records.len(), "parsed snapshot rows");
        Ok(Self::new(records))
    }

    /// Check the structural invariants of a generated match
    pub fn check_integrity(&self, players_per_team: usize) -> IntegrityReport {
        let summary = self.summary();
        let mut seen: HashSet<RecordKey> = HashSet::with_capacity(self.records.len());
        let mut duplicate_keys = BTreeSet::new();
        let mut roster_mismatches = BTreeSet::new();
        let mut slot_cache: HashMap<&str, Option<Team>> = HashMap::new();

        for record in &self.records {
            let key = record.key();
            if !seen.insert(key.clone()) {
                duplicate_keys.insert(key.clone());
            }

            let expected = *slot_cache
                .entry(record.player.as_str())
                .or_insert_with(|| {
                    roster_slot(&record.player)
                        .map(|slot| Team::for_roster_slot(slot, players_per_team))
                });
            if expected != Some(record.team) {
                roster_mismatches.insert(key);
            }
        }

        let expected_observations = summary.minutes * summary.players;
        let missing_observations = expected_observations.saturating_sub(seen.len());

        IntegrityReport {
            records: summary.records,
            minutes: summary.minutes,
            players: summary.players,
            duplicate_keys: duplicate_keys.into_iter().collect(),
            roster_mismatches: roster_mismatches.into_iter().collect(),
            missing_observations,
        }
    }
}

/// Outcome of `MatchTable::check_integrity`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrityReport {
    pub records: usize,
    pub minutes: usize,
    pub players: usize,
    /// (minute, player) pairs seen more than once
    pub duplicate_keys: Vec<RecordKey>,
    /// Records whose team does not match the player's roster slot
    pub roster_mismatches: Vec<RecordKey>,
    /// Player-minutes with no observation
    pub missing_observations: usize,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.duplicate_keys.is_empty()
            && self.roster_mismatches.is_empty()
            && self.missing_observations == 0
    }

    pub fn violations(&self) -> usize {
        self.duplicate_keys.len() + self.roster_mismatches.len() + self.missing_observations
    }
}

/// 1-based roster slot of a `P<n>` player id
fn roster_slot(player: &str) -> Option<usize> {
    player
        .strip_prefix('P')
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// One snapshot row as read from disk. The minute is wider than
/// `EventRecord::minute` so oversized values reach the bound check.
#[derive(Debug, Deserialize)]
struct SnapshotRow {
    minute: i64,
    player: String,
    team: Team,
    x: f64,
    y: f64,
    speed: f64,
    event: EventKind,
}

impl SnapshotRow {
    fn into_record(self) -> Result<EventRecord, AnalysisError> {
        let minute = u8::try_from(self.minute)
            .ok()
            .filter(|m| (1..=MATCH_MINUTES).contains(m))
            .ok_or_else(|| {
                AnalysisError::out_of_range(
                    "minute",
                    self.minute as f64,
                    1.0,
                    MATCH_MINUTES as f64,
                )
            })?;
        for (field, value) in [("x", self.x), ("y", self.y)] {
            if !(PITCH_MIN..=PITCH_MAX).contains(&value) {
                return Err(AnalysisError::out_of_range(field, value, PITCH_MIN, PITCH_MAX));
            }
        }
        if !(0.0..=MAX_SPEED).contains(&self.speed) {
            return Err(AnalysisError::out_of_range("speed", self.speed, 0.0, MAX_SPEED));
        }

        Ok(EventRecord {
            minute,
            player: self.player,
            team: self.team,
            x: self.x,
            y: self.y,
            speed: self.speed,
            event: self.event,
        })
    }
}
