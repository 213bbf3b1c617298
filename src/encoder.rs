//! Report encoding
//!
//! Renders a `MatchReport` either as a human-readable console report or as
//! JSON for downstream tooling.

use std::fmt::Write as _;

use crate::error::AnalysisError;
use crate::types::MatchReport;

/// Output format for an encoded report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    JsonPretty,
}

/// Encoder for match reports
pub struct ReportEncoder;

impl ReportEncoder {
    pub fn encode(report: &MatchReport, format: ReportFormat) -> Result<String, AnalysisError> {
        match format {
            ReportFormat::Text => Ok(Self::encode_text(report)),
            ReportFormat::Json => Self::encode_json(report),
            ReportFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)? + "\n"),
        }
    }

    /// Encode to compact JSON, newline terminated
    pub fn encode_json(report: &MatchReport) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string(report)? + "\n")
    }

    /// Render every section as text
    pub fn encode_text(report: &MatchReport) -> String {
        let mut out = String::new();
        // fmt::Write on String cannot fail
        let _ = write_text(&mut out, report);
        out
    }
}

fn heading(out: &mut String, number: usize, title: &str) -> std::fmt::Result {
    let line = format!("{}. {}", number, title);
    writeln!(out)?;
    writeln!(out, "{}", line)?;
    writeln!(out, "{}", "=".repeat(line.chars().count()))
}

fn write_text(out: &mut String, r: &MatchReport) -> std::fmt::Result {
    writeln!(
        out,
        "Tactix {} | {} records, {} minutes, {} players | focus {}",
        r.producer.version, r.snapshot.records, r.snapshot.minutes, r.snapshot.players, r.focus_team
    )?;

    let shape = &r.team_shape;
    heading(out, 1, "Team Shape Detection")?;
    writeln!(
        out,
        "{} clusters for {} ({} iterations{})",
        shape.clusters,
        shape.team,
        shape.iterations,
        if shape.converged { "" } else { ", not converged" }
    )?;
    for zone in &shape.zones {
        writeln!(
            out,
            "  cluster {}: {:>4} events  centroid ({:.1}, {:.1})",
            zone.cluster, zone.size, zone.centroid.x, zone.centroid.y
        )?;
    }

    let pressing = &r.pressing;
    heading(out, 2, "Pressing Intensity")?;
    writeln!(out, "Average pressing actions per minute: {:.2}", pressing.mean_per_minute)?;
    match pressing.peak_minute {
        Some(minute) => writeln!(
            out,
            "Peak pressing minute: {} ({} actions)",
            minute, pressing.peak_actions
        )?,
        None => writeln!(out, "Peak pressing minute: none (no pressing actions)")?,
    }

    heading(out, 3, "Space Occupation")?;
    for zone in &r.space_occupation.zones {
        writeln!(out, "  {:<10} {:>4}", zone.zone.label(), zone.count)?;
    }

    let xg = &r.xg;
    heading(out, 4, "Tactical xG Proxy")?;
    match xg.mean_xg {
        Some(mean) => writeln!(out, "Average xG per shot: {:.3} over {} shots", mean, xg.shots)?,
        None => writeln!(out, "Average xG per shot: n/a (no shots)")?,
    }
    for team in &xg.by_team {
        writeln!(out, "  {}: {} shots, {:.2} xG", team.team, team.shots, team.total_xg)?;
    }
    writeln!(out, "Note: {}", xg.caveat)?;

    let transitions = &r.transitions;
    heading(out, 5, "Transition Play")?;
    writeln!(
        out,
        "High-speed transition actions (carries above speed {}): {}",
        transitions.speed_threshold, transitions.total
    )?;

    heading(out, 6, "Match Narrative")?;
    writeln!(out, "{}", r.narrative.text)?;

    heading(out, 7, "Player Activity")?;
    if r.player_activity.top.is_empty() {
        writeln!(out, "  no players")?;
    }
    for player in &r.player_activity.top {
        writeln!(
            out,
            "  {}. {:<4} {} {:>3} events ({} on the ball)",
            player.rank, player.player, player.team, player.events, player.actions
        )?;
    }

    let weak = &r.opponent_weakness;
    heading(out, 8, "Opponent Weakness")?;
    writeln!(
        out,
        "{} actions below x = {}: {}",
        weak.team, weak.x_threshold, weak.actions
    )?;

    let compactness = &r.compactness;
    heading(out, 9, "Team Compactness")?;
    writeln!(out, "Compactness index ({}): {:.2}", compactness.team, compactness.index)?;
    for team in &compactness.by_team {
        writeln!(out, "  {}: {:.2}", team.team, team.index)?;
    }

    let set_pieces = &r.set_pieces;
    heading(out, 10, "Set-Piece Impact")?;
    writeln!(
        out,
        "Set-piece related shots (proxy, y < {} or y > {}): {}",
        set_pieces.low_y, set_pieces.high_y, set_pieces.shots
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, GeneratorConfig};
    use crate::generator::MatchGenerator;
    use crate::pipeline::MatchAnalyzer;

    fn report() -> MatchReport {
        let table = MatchGenerator::new(GeneratorConfig::default())
            .unwrap()
            .generate();
        MatchAnalyzer::with_instance_id(AnalysisConfig::default(), "test-instance".to_string())
            .unwrap()
            .analyze(&table)
            .unwrap()
    }

    #[test]
    fn test_text_has_every_section() {
        let text = ReportEncoder::encode_text(&report());
        for title in [
            "1. Team Shape Detection",
            "2. Pressing Intensity",
            "3. Space Occupation",
            "4. Tactical xG Proxy",
            "5. Transition Play",
            "6. Match Narrative",
            "7. Player Activity",
            "8. Opponent Weakness",
            "9. Team Compactness",
            "10. Set-Piece Impact",
        ] {
            assert!(text.contains(title), "missing section {}", title);
        }
        assert!(text.contains("not a calibrated expected-goals model"));
        assert!(text.contains("Far Left"));
    }

    #[test]
    fn test_json_is_parseable() {
        let json = ReportEncoder::encode(&report(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["producer"]["name"], "tactix");
        assert_eq!(value["producer"]["instance_id"], "test-instance");
        assert_eq!(value["focus_team"], "Team_A");
        assert_eq!(value["snapshot"]["records"], 1980);
        assert_eq!(value["team_shape"]["clusters"], 4);
        assert!(value["team_shape"]["assignments"][0]["minute"].is_u64());
        assert!(value["space_occupation"]["zones"][0]["zone"].is_string());
    }

    #[test]
    fn test_json_round_trips_into_report() {
        let original = report();
        let json = ReportEncoder::encode(&original, ReportFormat::JsonPretty).unwrap();
        let parsed: MatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.pressing.per_minute, original.pressing.per_minute);
        assert_eq!(parsed.pressing.peak_minute, original.pressing.peak_minute);
        assert_eq!(parsed.set_pieces, original.set_pieces);
        assert_eq!(parsed.space_occupation, original.space_occupation);
    }
}
