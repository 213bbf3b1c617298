//! Tactix - Tactical metrics engine for synthetic football match tracking data
//!
//! Tactix loads a flat table of per-minute player observations and runs a set
//! of independent analyses over it: shape clustering → pitch-zone occupation →
//! proxy xG → pressing, transition and activity aggregates → compactness.
//!
//! ## Modules
//!
//! - **Generation & storage**: seeded synthetic matches and the CSV snapshot
//! - **Core metrics**: k-means shape zones, pitch zones, compactness, proxy xG
//! - **Reporting**: aggregate reporters, text and JSON encoding

pub mod config;
pub mod encoder;
pub mod error;
pub mod features;
pub mod generator;
pub mod pipeline;
pub mod reporters;
pub mod shape;
pub mod store;
pub mod types;
pub mod xg;
pub mod zones;

pub use config::{AnalysisConfig, GeneratorConfig, Thresholds};
pub use encoder::{ReportEncoder, ReportFormat};
pub use error::AnalysisError;
pub use pipeline::{analyze_snapshot, generate_snapshot, MatchAnalyzer};
pub use shape::{ShapeClusters, ZoneClusterer};
pub use store::{IntegrityReport, MatchTable};
pub use types::{EventKind, EventRecord, MatchReport, Point, Team};
pub use zones::PitchZone;

/// Tactix version embedded in every report
pub const TACTIX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "tactix";
