//! Geometric feature derivation
//!
//! This module derives shape features from a set of positions:
//! - Team centroid
//! - Per-record distance from the centroid
//! - Compactness index (mean distance from the centroid)

use crate::error::AnalysisError;
use crate::store::MatchTable;
use crate::types::{CentroidDistance, CompactnessReport, EventRecord, Point, Team, TeamCompactness};

/// Arithmetic mean of x and of y, computed independently
pub fn centroid(points: &[Point]) -> Result<Point, AnalysisError> {
    if points.is_empty() {
        return Err(AnalysisError::EmptyInput(
            "cannot compute the centroid of zero positions".to_string(),
        ));
    }
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Ok(Point::new(sum_x / n, sum_y / n))
}

/// Mean Euclidean distance of every point from the centroid.
///
/// Lower values mean a more compact shape. Zero only when all points coincide.
pub fn compactness_index(points: &[Point]) -> Result<f64, AnalysisError> {
    let center = centroid(points)?;
    let total: f64 = points.iter().map(|p| p.distance(&center)).sum();
    Ok(total / points.len() as f64)
}

/// Distance of each record from the centroid of the given records
pub fn distances_from_centroid(
    records: &[&EventRecord],
) -> Result<(Point, Vec<CentroidDistance>), AnalysisError> {
    let points: Vec<Point> = records.iter().map(|r| r.position()).collect();
    let center = centroid(&points)?;
    let distances = records
        .iter()
        .zip(&points)
        .map(|(record, p)| CentroidDistance {
            key: record.key(),
            distance: p.distance(&center),
        })
        .collect();
    Ok((center, distances))
}

/// Compactness of `team`, with every team's index alongside for comparison.
///
/// A team with no records is skipped in `by_team`; the focus team must have
/// at least one.
pub fn compactness_report(
    table: &MatchTable,
    team: Team,
) -> Result<CompactnessReport, AnalysisError> {
    let records = table.team_records(team);
    let (center, distances) = distances_from_centroid(&records)?;
    let index = distances.iter().map(|d| d.distance).sum::<f64>() / distances.len() as f64;

    let mut by_team = Vec::with_capacity(Team::ALL.len());
    for other in Team::ALL {
        let points = table.points_for(other);
        if points.is_empty() {
            continue;
        }
        by_team.push(TeamCompactness {
            team: other,
            index: compactness_index(&points)?,
        });
    }

    Ok(CompactnessReport {
        team,
        index,
        centroid: center,
        records: records.len(),
        by_team,
        distances,
    })
}
