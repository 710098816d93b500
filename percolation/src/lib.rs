//! Percolation - structure extraction from thresholded 3-D scalar fields.
//!
//! For every threshold the field is reduced to an occupancy grid, occupied
//! cells are grouped into maximal 26-connected structures, and per-threshold
//! statistics are reported:
//! - largest structure volume (percolation indicator)
//! - total occupied volume
//! - optional per-structure bounding boxes
//!
//! Plain 26-connectivity can join two features through a single diagonal
//! bridge that a marching-cubes surface would keep apart. The optional
//! ambiguity resolver vetoes those links using a static case table.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use percolation::{AxisOrder, Config, ScalarField, StructureExtractor};
//!
//! let field = ScalarField::new([200, 328, 234], AxisOrder::ZFastest, values)?;
//! let extractor = StructureExtractor::new(Config::default());
//! let summary = extractor.run(&field, &[47.0]);
//!
//! for report in &summary.reports {
//!     println!("{}", report.percolation);
//! }
//! ```

pub mod ambiguity;
pub mod box_count;
mod config;
mod error;
mod extractor;
mod field;
pub mod labeling;
pub mod statistics;
mod threshold;

pub use common::{AxisOrder, Buffer3};

pub use config::Config;
pub use error::{ExtractError, ExtractResult};
pub use extractor::{PassFailure, PassOutput, PassReport, RunSummary, StructureExtractor};
pub use field::ScalarField;
pub use threshold::{is_occupied, parse_threshold, threshold_field, OccupancyGrid};

pub use ambiguity::AmbiguityResolver;
pub use box_count::{BoxCount, FractalEstimate};
pub use labeling::{BoundingBox, ComponentLabeler, LabelGrid, Labeling};
pub use statistics::{
    BoundingBoxRecord, PercolationRecord, RecordSink, StructureVolumes, TextRecordWriter,
};
