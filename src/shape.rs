//! Team shape detection
//!
//! Partitions a team's (x, y) positions into `k` spatial clusters with
//! Lloyd's k-means. Centroids are seeded with k-means++ from an explicit seed,
//! so a given input, `k` and seed always produce the same assignment.
//!
//! Cluster ids are arbitrary labels: they carry no positional meaning and are
//! only stable within a run.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::{DEFAULT_CLUSTERS, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED};
use crate::error::AnalysisError;
use crate::store::MatchTable;
use crate::types::{ClusterAssignment, ClusterZone, Point, Team, TeamShapeReport};

/// Result of clustering a point cloud
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeClusters {
    /// Cluster id per input point, in input order
    pub labels: Vec<usize>,
    /// Mean position of each cluster
    pub centroids: Vec<Point>,
    /// Number of points per cluster
    pub sizes: Vec<usize>,
    /// Lloyd iterations performed
    pub iterations: usize,
    /// Whether assignments stabilised before the iteration bound
    pub converged: bool,
    /// Sum of squared distances from each point to its centroid
    pub inertia: f64,
}

impl ShapeClusters {
    /// Number of clusters
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Clusters ordered by size, largest first; equal sizes keep id order
    pub fn ranked_zones(&self) -> Vec<ClusterZone> {
        let mut zones: Vec<ClusterZone> = self
            .centroids
            .iter()
            .zip(&self.sizes)
            .enumerate()
            .map(|(cluster, (centroid, size))| ClusterZone {
                cluster,
                size: *size,
                centroid: *centroid,
            })
            .collect();
        zones.sort_by(|a, b| b.size.cmp(&a.size));
        zones
    }
}

/// K-means clusterer for team positions
#[derive(Debug, Clone)]
pub struct ZoneClusterer {
    k: usize,
    seed: u64,
    max_iterations: usize,
}

impl Default for ZoneClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTERS, DEFAULT_SEED)
    }
}

impl ZoneClusterer {
    /// Create a clusterer for `k` clusters with a fixed seed
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Override the iteration bound
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Partition `points` into `k` clusters
    pub fn fit(&self, points: &[Point]) -> Result<ShapeClusters, AnalysisError> {
        if points.is_empty() {
            return Err(AnalysisError::EmptyInput(
                "cannot cluster an empty set of positions".to_string(),
            ));
        }
        if self.k == 0 {
            return Err(AnalysisError::Configuration(
                "cluster count must be at least 1".to_string(),
            ));
        }
        for p in points {
            if !p.x.is_finite() {
                return Err(AnalysisError::out_of_range("x", p.x, f64::MIN, f64::MAX));
            }
            if !p.y.is_finite() {
                return Err(AnalysisError::out_of_range("y", p.y, f64::MIN, f64::MAX));
            }
        }

        let distinct = count_distinct(points);
        if self.k > distinct {
            return Err(AnalysisError::Configuration(format!(
                "requested {} clusters but only {} distinct positions are available",
                self.k, distinct
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut centroids = seed_centroids(points, self.k, &mut rng)?;

        // usize::MAX marks "unassigned" so the first pass always counts as a change
        let mut labels = vec![usize::MAX; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;
            if !assign_points(points, &centroids, &mut labels) {
                converged = true;
                break;
            }
            centroids = recompute_centroids(points, &labels, &centroids);
        }

        if converged {
            debug!(k = self.k, iterations, "k-means converged");
        } else {
            // Labels still point at the centroids before the last recompute
            assign_points(points, &centroids, &mut labels);
            warn!(
                k = self.k,
                iterations, "k-means stopped at the iteration bound before converging"
            );
        }

        let mut sizes = vec![0; self.k];
        for &label in &labels {
            sizes[label] += 1;
        }
        let inertia: f64 = points
            .iter()
            .zip(&labels)
            .map(|(p, &label)| p.distance_squared(&centroids[label]))
            .sum();

        Ok(ShapeClusters {
            labels,
            centroids,
            sizes,
            iterations,
            converged,
            inertia,
        })
    }
}

/// Cluster one team's positions and key each assignment by record
pub fn team_shape_report(
    table: &MatchTable,
    team: Team,
    clusterer: &ZoneClusterer,
) -> Result<TeamShapeReport, AnalysisError> {
    let records = table.team_records(team);
    let points: Vec<Point> = records.iter().map(|r| r.position()).collect();
    let clusters = clusterer.fit(&points)?;

    let assignments = records
        .iter()
        .zip(&clusters.labels)
        .map(|(record, &cluster)| ClusterAssignment {
            key: record.key(),
            cluster,
        })
        .collect();

    Ok(TeamShapeReport {
        team,
        clusters: clusters.k(),
        iterations: clusters.iterations,
        converged: clusters.converged,
        inertia: clusters.inertia,
        zones: clusters.ranked_zones(),
        assignments,
    })
}

fn count_distinct(points: &[Point]) -> usize {
    // + 0.0 folds -0.0 into 0.0 so both hash alike
    points
        .iter()
        .map(|p| ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

/// k-means++ seeding: the first centroid is uniform, each following one is
/// drawn with probability proportional to its squared distance from the
/// nearest centroid chosen so far.
fn seed_centroids(
    points: &[Point],
    k: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Point>, AnalysisError> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| p.distance_squared(&centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        if total <= 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "cannot seed {} clusters from the available positions",
                k
            )));
        }

        let target = rng.gen::<f64>() * total;
        let mut acc = 0.0;
        let mut chosen = None;
        for (i, &d) in nearest.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            acc += d;
            if acc > target {
                chosen = Some(i);
                break;
            }
        }
        // Rounding can leave `acc` just short of `target`
        let idx = chosen
            .or_else(|| nearest.iter().rposition(|&d| d > 0.0))
            .ok_or_else(|| {
                AnalysisError::Configuration("no candidate left for centroid seeding".to_string())
            })?;

        let centroid = points[idx];
        centroids.push(centroid);
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(p.distance_squared(&centroid));
        }
    }

    Ok(centroids)
}

/// Assign each point to its nearest centroid (ties go to the lower id).
/// Returns whether any label changed.
fn assign_points(points: &[Point], centroids: &[Point], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (p, label) in points.iter().zip(labels.iter_mut()) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (j, c) in centroids.iter().enumerate() {
            let d = p.distance_squared(c);
            if d < best_dist {
                best = j;
                best_dist = d;
            }
        }
        if *label != best {
            *label = best;
            changed = true;
        }
    }
    changed
}

/// Move each centroid to the mean of its members. A cluster that lost all of
/// its members is re-seeded at the point farthest from its own centroid.
fn recompute_centroids(points: &[Point], labels: &[usize], previous: &[Point]) -> Vec<Point> {
    let k = previous.len();
    let mut sums = vec![(0.0, 0.0); k];
    let mut counts = vec![0usize; k];
    for (p, &label) in points.iter().zip(labels) {
        sums[label].0 += p.x;
        sums[label].1 += p.y;
        counts[label] += 1;
    }

    let mut centroids: Vec<Point> = (0..k)
        .map(|j| {
            if counts[j] > 0 {
                let n = counts[j] as f64;
                Point::new(sums[j].0 / n, sums[j].1 / n)
            } else {
                previous[j]
            }
        })
        .collect();

    let mut taken: Vec<usize> = Vec::new();
    for j in 0..k {
        if counts[j] > 0 {
            continue;
        }
        let farthest = points
            .iter()
            .enumerate()
            .filter(|(i, _)| !taken.contains(i))
            .map(|(i, p)| (i, p.distance_squared(&centroids[labels[i]])))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if bd >= d => best,
                _ => Some((i, d)),
            });
        if let Some((i, _)) = farthest {
            debug!(cluster = j, point = i, "re-seeding empty cluster");
            centroids[j] = points[i];
            taken.push(i);
        }
    }

    centroids
}
