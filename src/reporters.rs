//! Aggregate reporters
//!
//! Independent filter-and-count passes over the match table. None of them
//! fail on an empty selection: no matching rows means a zero or empty report.

use std::collections::{BTreeMap, HashMap};

use crate::error::AnalysisError;
use crate::store::MatchTable;
use crate::types::{
    EventKind, EventRecord, MinuteCount, NarrativeReport, PlayerActivity, PlayerActivityReport,
    PressingReport, SetPieceReport, Team, TeamCount, TransitionReport, WeakZoneReport, ZoneCount,
    ZoneUsageReport,
};
use crate::zones::PitchZone;

/// Pressing actions grouped by minute.
///
/// The mean is taken over minutes with at least one pressing action; the peak
/// is the earliest minute with the highest count.
pub fn pressing_intensity(table: &MatchTable) -> PressingReport {
    let mut by_minute: BTreeMap<u8, usize> = BTreeMap::new();
    for record in table.records_with(EventKind::Pressure) {
        *by_minute.entry(record.minute).or_insert(0) += 1;
    }

    let total_actions: usize = by_minute.values().sum();
    let active_minutes = by_minute.len();
    let mean_per_minute = if active_minutes > 0 {
        total_actions as f64 / active_minutes as f64
    } else {
        0.0
    };

    let mut peak: Option<(u8, usize)> = None;
    for (&minute, &count) in &by_minute {
        if peak.map_or(true, |(_, best)| count > best) {
            peak = Some((minute, count));
        }
    }

    PressingReport {
        total_actions,
        active_minutes,
        mean_per_minute,
        peak_minute: peak.map(|(minute, _)| minute),
        peak_actions: peak.map_or(0, |(_, count)| count),
        per_minute: by_minute
            .into_iter()
            .map(|(minute, count)| MinuteCount { minute, count })
            .collect(),
    }
}

/// How often a team's records fall in each pitch zone, busiest zone first
pub fn zone_usage(table: &MatchTable, team: Team) -> Result<ZoneUsageReport, AnalysisError> {
    let mut counts = [0usize; 5];
    for record in table.team_records(team) {
        counts[PitchZone::from_x(record.x)?.index()] += 1;
    }

    let mut zones: Vec<ZoneCount> = PitchZone::ALL
        .iter()
        .map(|&zone| ZoneCount {
            zone,
            count: counts[zone.index()],
        })
        .collect();
    zones.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(ZoneUsageReport { team, zones })
}

/// Carries faster than `speed_threshold`
pub fn transitions(table: &MatchTable, speed_threshold: f64) -> TransitionReport {
    let fast: Vec<&EventRecord> = table
        .records_with(EventKind::Carry)
        .filter(|r| r.speed > speed_threshold)
        .collect();

    TransitionReport {
        speed_threshold,
        total: fast.len(),
        by_team: count_by_team(&fast),
    }
}

/// Event totals rendered into a short match narrative
pub fn narrative(table: &MatchTable) -> NarrativeReport {
    let count = |kind| table.records_with(kind).count();
    let passes = count(EventKind::Pass);
    let pressures = count(EventKind::Pressure);
    let shots = count(EventKind::Shot);
    let carries = count(EventKind::Carry);

    let text = format!(
        "The sides completed {} passes, pointing to structured possession.\n\
         {} pressing actions show how aggressively the ball was hunted.\n\
         {} shots reflect the attacking intent, and {} carries fed the\n\
         transitions that created those chances.",
        passes, pressures, shots, carries
    );

    NarrativeReport {
        passes,
        pressures,
        shots,
        carries,
        text,
    }
}

/// Players ranked by how many records they logged.
///
/// Ties keep the order in which players first appear in the table. The
/// on-ball count (events other than `none`) is carried alongside.
pub fn player_activity(table: &MatchTable, top_n: usize) -> PlayerActivityReport {
    let mut order: Vec<(&str, Team, usize, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in table.records() {
        let slot = *index.entry(record.player.as_str()).or_insert_with(|| {
            order.push((record.player.as_str(), record.team, 0, 0));
            order.len() - 1
        });
        order[slot].2 += 1;
        if record.event.is_action() {
            order[slot].3 += 1;
        }
    }

    let players = order.len();
    // sort_by is stable, so equal counts stay in encounter order
    order.sort_by(|a, b| b.2.cmp(&a.2));

    let top = order
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, (player, team, events, actions))| PlayerActivity {
            rank: i + 1,
            player: player.to_string(),
            team,
            events,
            actions,
        })
        .collect();

    PlayerActivityReport { players, top }
}

/// Records of `team` deeper than `x_threshold`
pub fn weak_zone(table: &MatchTable, team: Team, x_threshold: f64) -> WeakZoneReport {
    let actions = table
        .records()
        .iter()
        .filter(|r| r.team == team && r.x < x_threshold)
        .count();

    WeakZoneReport {
        team,
        x_threshold,
        actions,
    }
}

/// Shots taken outside the `[low_y, high_y]` band
pub fn set_pieces(table: &MatchTable, low_y: f64, high_y: f64) -> SetPieceReport {
    let wide: Vec<&EventRecord> = table
        .records_with(EventKind::Shot)
        .filter(|r| r.y < low_y || r.y > high_y)
        .collect();

    SetPieceReport {
        low_y,
        high_y,
        shots: wide.len(),
        by_team: count_by_team(&wide),
    }
}

fn count_by_team(records: &[&EventRecord]) -> Vec<TeamCount> {
    Team::ALL
        .iter()
        .map(|&team| TeamCount {
            team,
            count: records.iter().filter(|r| r.team == team).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(
        minute: u8,
        player: &str,
        team: Team,
        x: f64,
        y: f64,
        speed: f64,
        event: EventKind,
    ) -> EventRecord {
        EventRecord {
            minute,
            player: player.to_string(),
            team,
            x,
            y,
            speed,
            event,
        }
    }

    fn table(records: Vec<EventRecord>) -> MatchTable {
        MatchTable::new(records)
    }

    #[test]
    fn test_pressing_without_pressure_events() {
        let t = table(vec![
            record(1, "P1", Team::A, 50.0, 50.0, 2.0, EventKind::Pass),
            record(2, "P1", Team::A, 50.0, 50.0, 2.0, EventKind::Carry),
        ]);
        let report = pressing_intensity(&t);

        assert_eq!(report.total_actions, 0);
        assert_eq!(report.mean_per_minute, 0.0);
        assert_eq!(report.peak_minute, None);
        assert_eq!(report.peak_actions, 0);
        assert!(report.per_minute.is_empty());
    }

    #[test]
    fn test_pressing_mean_and_peak() {
        let t = table(vec![
            record(3, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::Pressure),
            record(3, "P2", Team::A, 1.0, 1.0, 1.0, EventKind::Pressure),
            record(5, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::Pressure),
            record(7, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::Pressure),
            record(7, "P13", Team::B, 1.0, 1.0, 1.0, EventKind::Pressure),
            record(8, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::Pass),
        ]);
        let report = pressing_intensity(&t);

        assert_eq!(report.total_actions, 5);
        assert_eq!(report.active_minutes, 3);
        assert!((report.mean_per_minute - 5.0 / 3.0).abs() < 1e-12);
        // Minutes 3 and 7 tie; the earlier one wins
        assert_eq!(report.peak_minute, Some(3));
        assert_eq!(report.peak_actions, 2);
        let per_minute: Vec<(u8, usize)> = report
            .per_minute
            .iter()
            .map(|m| (m.minute, m.count))
            .collect();
        assert_eq!(per_minute, vec![(3, 2), (5, 1), (7, 2)]);
    }

    #[test]
    fn test_zone_usage_counts_focus_team_only() {
        let t = table(vec![
            record(1, "P1", Team::A, 5.0, 1.0, 1.0, EventKind::Pass),
            record(1, "P2", Team::A, 45.0, 1.0, 1.0, EventKind::Pass),
            record(2, "P1", Team::A, 50.0, 1.0, 1.0, EventKind::Pass),
            record(2, "P2", Team::A, 100.0, 1.0, 1.0, EventKind::Pass),
            record(2, "P12", Team::B, 45.0, 1.0, 1.0, EventKind::Pass),
        ]);
        let report = zone_usage(&t, Team::A).unwrap();

        assert_eq!(report.zones.len(), 5);
        let counts: Vec<(PitchZone, usize)> =
            report.zones.iter().map(|z| (z.zone, z.count)).collect();
        // Empty zones keep pitch order at the tail
        assert_eq!(
            counts,
            vec![
                (PitchZone::Center, 2),
                (PitchZone::FarLeft, 1),
                (PitchZone::FarRight, 1),
                (PitchZone::Left, 0),
                (PitchZone::Right, 0),
            ]
        );
    }

    #[test]
    fn test_zone_usage_empty_team() {
        let report = zone_usage(&MatchTable::default(), Team::A).unwrap();
        assert!(report.zones.iter().all(|z| z.count == 0));
    }

    #[test]
    fn test_transitions_threshold_is_strict() {
        let t = table(vec![
            record(1, "P1", Team::A, 1.0, 1.0, 5.0, EventKind::Carry),
            record(1, "P2", Team::A, 1.0, 1.0, 5.01, EventKind::Carry),
            record(1, "P12", Team::B, 1.0, 1.0, 7.9, EventKind::Carry),
            record(1, "P13", Team::B, 1.0, 1.0, 7.9, EventKind::Pass),
        ]);
        let report = transitions(&t, 5.0);

        assert_eq!(report.total, 2);
        let by_team: Vec<(Team, usize)> =
            report.by_team.iter().map(|t| (t.team, t.count)).collect();
        assert_eq!(by_team, vec![(Team::A, 1), (Team::B, 1)]);
        assert_eq!(transitions(&MatchTable::default(), 5.0).total, 0);
    }

    #[test]
    fn test_narrative_counts() {
        let t = table(vec![
            record(1, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::Pass),
            record(1, "P2", Team::A, 1.0, 1.0, 1.0, EventKind::Pass),
            record(1, "P3", Team::A, 1.0, 1.0, 1.0, EventKind::Shot),
            record(1, "P4", Team::A, 1.0, 1.0, 1.0, EventKind::None),
        ]);
        let report = narrative(&t);

        assert_eq!(
            (report.passes, report.pressures, report.shots, report.carries),
            (2, 0, 1, 0)
        );
        assert!(report.text.contains("2 passes"));
        assert!(report.text.contains("1 shots"));
    }

    #[test]
    fn test_player_activity_ranking_and_ties() {
        let t = table(vec![
            record(1, "P3", Team::A, 1.0, 1.0, 1.0, EventKind::Pass),
            record(1, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::Pass),
            record(1, "P2", Team::A, 1.0, 1.0, 1.0, EventKind::None),
            record(2, "P3", Team::A, 1.0, 1.0, 1.0, EventKind::None),
            record(2, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::Shot),
            record(3, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::Carry),
            record(2, "P2", Team::A, 1.0, 1.0, 1.0, EventKind::Pass),
            record(3, "P12", Team::B, 1.0, 1.0, 1.0, EventKind::Carry),
        ]);
        let report = player_activity(&t, 3);

        assert_eq!(report.players, 4);
        let ranked: Vec<(usize, &str, usize, usize)> = report
            .top
            .iter()
            .map(|p| (p.rank, p.player.as_str(), p.events, p.actions))
            .collect();
        // P3 and P2 both logged two records; P3 was seen first
        assert_eq!(ranked, vec![(1, "P1", 3, 3), (2, "P3", 2, 1), (3, "P2", 2, 1)]);
    }

    #[test]
    fn test_player_activity_counts_idle_records() {
        let t = table(vec![
            record(1, "P2", Team::A, 1.0, 1.0, 1.0, EventKind::Pass),
            record(1, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::None),
            record(2, "P1", Team::A, 1.0, 1.0, 1.0, EventKind::None),
        ]);
        let report = player_activity(&t, 2);

        let ranked: Vec<(&str, usize, usize)> = report
            .top
            .iter()
            .map(|p| (p.player.as_str(), p.events, p.actions))
            .collect();
        assert_eq!(ranked, vec![("P1", 2, 0), ("P2", 1, 1)]);
    }

    #[test]
    fn test_player_activity_full_match_ties_in_roster_order() {
        let t = table(
            (1..=3)
                .flat_map(|minute| {
                    ["P1", "P2", "P3"].map(|p| {
                        let event = if p == "P3" { EventKind::Shot } else { EventKind::None };
                        record(minute, p, Team::A, 1.0, 1.0, 1.0, event)
                    })
                })
                .collect(),
        );
        let report = player_activity(&t, 3);

        let players: Vec<&str> = report.top.iter().map(|p| p.player.as_str()).collect();
        assert_eq!(players, vec!["P1", "P2", "P3"]);
        assert!(report.top.iter().all(|p| p.events == 3));
        assert_eq!(report.top[2].actions, 3);
    }

    #[test]
    fn test_player_activity_empty_table() {
        let report = player_activity(&MatchTable::default(), 5);
        assert_eq!(report.players, 0);
        assert!(report.top.is_empty());
    }

    #[test]
    fn test_weak_zone_all_beyond_threshold() {
        let t = table(vec![
            record(1, "P12", Team::B, 30.0, 1.0, 1.0, EventKind::Pass),
            record(1, "P13", Team::B, 75.0, 1.0, 1.0, EventKind::Carry),
            record(1, "P1", Team::A, 5.0, 1.0, 1.0, EventKind::Pass),
        ]);
        assert_eq!(weak_zone(&t, Team::B, 30.0).actions, 0);
    }

    #[test]
    fn test_weak_zone_counts_opponent_only() {
        let t = table(vec![
            record(1, "P12", Team::B, 29.9, 1.0, 1.0, EventKind::Pass),
            record(2, "P12", Team::B, 0.0, 1.0, 1.0, EventKind::None),
            record(1, "P1", Team::A, 5.0, 1.0, 1.0, EventKind::Pass),
        ]);
        let report = weak_zone(&t, Team::B, 30.0);
        assert_eq!(report.actions, 2);
        assert_eq!(report.team, Team::B);
    }

    #[test]
    fn test_set_pieces_wide_shots() {
        let t = table(vec![
            record(1, "P1", Team::A, 90.0, 19.9, 1.0, EventKind::Shot),
            record(1, "P2", Team::A, 90.0, 20.0, 1.0, EventKind::Shot),
            record(1, "P3", Team::A, 90.0, 80.0, 1.0, EventKind::Shot),
            record(1, "P12", Team::B, 90.0, 80.1, 1.0, EventKind::Shot),
            record(1, "P13", Team::B, 90.0, 95.0, 1.0, EventKind::Pass),
        ]);
        let report = set_pieces(&t, 20.0, 80.0);

        assert_eq!(report.shots, 2);
        assert_eq!(report.by_team[0].count, 1);
        assert_eq!(report.by_team[1].count, 1);
        assert_eq!(set_pieces(&MatchTable::default(), 20.0, 80.0).shots, 0);
    }
}
