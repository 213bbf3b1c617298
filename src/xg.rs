//! Proxy expected goals
//!
//! Assigns a synthetic xG value to each shot based only on where it was taken.
//! These are placeholder values drawn from fixed ranges, not the output of a
//! calibrated model, and every report that shows them says so.

use rand::Rng;

use crate::config::{Thresholds, XgRange};
use crate::types::{EventKind, EventRecord, ShotXg, Team, TeamXg, XgReport};

/// Caveat attached to every proxy xG report
pub const XG_CAVEAT: &str =
    "proxy values drawn by shot location; not a calibrated expected-goals model";

/// Location-based xG proxy
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyXgModel {
    /// Shots with x strictly above this use `attacking_range`
    pub attacking_x: f64,
    pub attacking_range: XgRange,
    pub default_range: XgRange,
}

impl Default for ProxyXgModel {
    fn default() -> Self {
        Self::from_thresholds(&Thresholds::default())
    }
}

impl ProxyXgModel {
    pub fn from_thresholds(thresholds: &Thresholds) -> Self {
        Self {
            attacking_x: thresholds.xg_attacking_x,
            attacking_range: thresholds.xg_attacking_range,
            default_range: thresholds.xg_default_range,
        }
    }

    /// Range a shot at `x` is drawn from
    pub fn range_for(&self, x: f64) -> XgRange {
        if x > self.attacking_x {
            self.attacking_range
        } else {
            self.default_range
        }
    }

    /// Draw an xG value for a shot at `x`
    pub fn sample<R: Rng + ?Sized>(&self, x: f64, rng: &mut R) -> f64 {
        let range = self.range_for(x);
        if range.min >= range.max {
            return range.min;
        }
        rng.gen_range(range.min..=range.max)
    }

    /// Assign an xG value to every shot, in record order
    pub fn assign<'a, R, I>(&self, records: I, rng: &mut R) -> Vec<ShotXg>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a EventRecord>,
    {
        records
            .into_iter()
            .filter(|r| r.event == EventKind::Shot)
            .map(|r| ShotXg {
                key: r.key(),
                team: r.team,
                x: r.x,
                y: r.y,
                xg: self.sample(r.x, rng),
            })
            .collect()
    }

    /// Assign values to every shot and summarise them
    pub fn report<'a, R, I>(&self, records: I, rng: &mut R) -> XgReport
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a EventRecord>,
    {
        let shot_values = self.assign(records, rng);
        summarize(shot_values)
    }
}

fn summarize(shot_values: Vec<ShotXg>) -> XgReport {
    let shots = shot_values.len();
    let total_xg: f64 = shot_values.iter().map(|s| s.xg).sum();
    let mean_xg = (shots > 0).then(|| total_xg / shots as f64);

    let by_team = Team::ALL
        .iter()
        .map(|&team| {
            let (count, total) = shot_values
                .iter()
                .filter(|s| s.team == team)
                .fold((0usize, 0.0), |(n, t), s| (n + 1, t + s.xg));
            TeamXg {
                team,
                shots: count,
                total_xg: total,
            }
        })
        .collect();

    XgReport {
        shots,
        total_xg,
        mean_xg,
        by_team,
        caveat: XG_CAVEAT.to_string(),
        shot_values,
    }
}
