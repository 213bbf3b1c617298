//! Core types for the Tactix pipeline
//!
//! This module defines the event records read from a match snapshot and the
//! report structures produced by each analysis stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::zones::PitchZone;

/// Team label as written in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "Team_A")]
    A,
    #[serde(rename = "Team_B")]
    B,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::A => "Team_A",
            Team::B => "Team_B",
        }
    }

    /// The other side of the match
    pub fn opponent(&self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Team owning a 1-based roster slot: the first `players_per_team` slots
    /// belong to team A, the rest to team B.
    pub fn for_roster_slot(slot: usize, players_per_team: usize) -> Team {
        if slot <= players_per_team {
            Team::A
        } else {
            Team::B
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical event observed for a player in a given minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Pass,
    Shot,
    Pressure,
    Carry,
    None,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Pass,
        EventKind::Shot,
        EventKind::Pressure,
        EventKind::Carry,
        EventKind::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Pass => "pass",
            EventKind::Shot => "shot",
            EventKind::Pressure => "pressure",
            EventKind::Carry => "carry",
            EventKind::None => "none",
        }
    }

    /// Whether the record describes an actual on-field action
    pub fn is_action(&self) -> bool {
        !matches!(self, EventKind::None)
    }
}

/// A 2D pitch position in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// One observation of one player at one minute.
///
/// Field order matches the snapshot column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Match minute (1-90)
    pub minute: u8,
    /// Player identifier (P1-P22)
    pub player: String,
    /// Team derived from the player's roster slot
    pub team: Team,
    /// Length-wise coordinate (0-100)
    pub x: f64,
    /// Width-wise coordinate (0-100)
    pub y: f64,
    /// Instantaneous speed (0-8)
    pub speed: f64,
    /// Observed event
    pub event: EventKind,
}

impl EventRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            minute: self.minute,
            player: self.player.clone(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Identity of a record within a match: a player at a minute
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub minute: u8,
    pub player: String,
}

// Report types

/// Producer metadata embedded in every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Shape of the analysed snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub records: usize,
    pub minutes: usize,
    pub players: usize,
}

/// Full output of a match analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub producer: ReportProducer,
    pub generated_at: DateTime<Utc>,
    pub focus_team: Team,
    pub snapshot: SnapshotSummary,
    pub team_shape: TeamShapeReport,
    pub pressing: PressingReport,
    pub space_occupation: ZoneUsageReport,
    pub xg: XgReport,
    pub transitions: TransitionReport,
    pub narrative: NarrativeReport,
    pub player_activity: PlayerActivityReport,
    pub opponent_weakness: WeakZoneReport,
    pub compactness: CompactnessReport,
    pub set_pieces: SetPieceReport,
}

/// Cluster id assigned to a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    #[serde(flatten)]
    pub key: RecordKey,
    pub cluster: usize,
}

/// One detected shape zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterZone {
    pub cluster: usize,
    pub size: usize,
    pub centroid: Point,
}

/// Team shape detected by positional clustering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamShapeReport {
    pub team: Team,
    pub clusters: usize,
    pub iterations: usize,
    pub converged: bool,
    pub inertia: f64,
    /// Zones ordered by size, largest first
    pub zones: Vec<ClusterZone>,
    pub assignments: Vec<ClusterAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinuteCount {
    pub minute: u8,
    pub count: usize,
}

/// Pressing actions per minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressingReport {
    pub total_actions: usize,
    /// Minutes with at least one pressing action
    pub active_minutes: usize,
    /// Mean pressing actions over the active minutes (0 when there are none)
    pub mean_per_minute: f64,
    pub peak_minute: Option<u8>,
    pub peak_actions: usize,
    pub per_minute: Vec<MinuteCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCount {
    pub zone: PitchZone,
    pub count: usize,
}

/// Pitch-zone occupation of one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneUsageReport {
    pub team: Team,
    /// All five zones, busiest first
    pub zones: Vec<ZoneCount>,
}

/// Proxy xG value assigned to one shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotXg {
    #[serde(flatten)]
    pub key: RecordKey,
    pub team: Team,
    pub x: f64,
    pub y: f64,
    pub xg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamXg {
    pub team: Team,
    pub shots: usize,
    pub total_xg: f64,
}

/// Proxy expected-goals summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XgReport {
    pub shots: usize,
    pub total_xg: f64,
    pub mean_xg: Option<f64>,
    pub by_team: Vec<TeamXg>,
    pub caveat: String,
    pub shot_values: Vec<ShotXg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCount {
    pub team: Team,
    pub count: usize,
}

/// High-speed carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionReport {
    pub speed_threshold: f64,
    pub total: usize,
    pub by_team: Vec<TeamCount>,
}

/// Narrative summary built from event totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeReport {
    pub passes: usize,
    pub pressures: usize,
    pub shots: usize,
    pub carries: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerActivity {
    pub rank: usize,
    pub player: String,
    pub team: Team,
    /// Every record logged for the player; the ranking key
    pub events: usize,
    /// Records whose event is not `none`
    pub actions: usize,
}

/// Most active players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerActivityReport {
    pub players: usize,
    pub top: Vec<PlayerActivity>,
}

/// Opponent actions in its defensive zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakZoneReport {
    pub team: Team,
    pub x_threshold: f64,
    pub actions: usize,
}

/// Distance of a single record from its team centroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidDistance {
    #[serde(flatten)]
    pub key: RecordKey,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCompactness {
    pub team: Team,
    pub index: f64,
}

/// Team compactness as mean distance from centroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactnessReport {
    pub team: Team,
    pub index: f64,
    pub centroid: Point,
    pub records: usize,
    pub by_team: Vec<TeamCompactness>,
    pub distances: Vec<CentroidDistance>,
}

/// Shots from wide areas, used as a set-piece proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPieceReport {
    pub low_y: f64,
    pub high_y: f64,
    pub shots: usize,
    pub by_team: Vec<TeamCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_roster_slots() {
        assert_eq!(Team::for_roster_slot(1, 11), Team::A);
        assert_eq!(Team::for_roster_slot(11, 11), Team::A);
        assert_eq!(Team::for_roster_slot(12, 11), Team::B);
        assert_eq!(Team::for_roster_slot(22, 11), Team::B);
        assert_eq!(Team::A.opponent(), Team::B);
    }

    #[test]
    fn test_team_wire_labels() {
        let json = serde_json::to_string(&Team::B).unwrap();
        assert_eq!(json, "\"Team_B\"");
        let team: Team = serde_json::from_str("\"Team_A\"").unwrap();
        assert_eq!(team, Team::A);
    }

    #[test]
    fn test_event_kind_labels() {
        for kind in EventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert!(!EventKind::None.is_action());
        assert!(EventKind::Carry.is_action());
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.distance_squared(&b) - 25.0).abs() < 1e-12);
    }
}
