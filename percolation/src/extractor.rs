//! Threshold passes over one scalar field.
//!
//! A pass owns every grid it builds and either completes or fails as a whole.
//! Failed passes are collected and never stop the remaining thresholds.

use std::convert::Infallible;
use std::io;

use common::buffer3::cell_count;
use rayon::prelude::*;

use crate::box_count::{box_count, BoxCount, FractalEstimate};
use crate::config::Config;
use crate::error::{ExtractError, ExtractResult};
use crate::field::ScalarField;
use crate::labeling::{ComponentLabeler, LabelGrid};
use crate::statistics::{BoundingBoxRecord, PercolationRecord, RecordSink, StructureVolumes};
use crate::threshold::{threshold_field, OccupancyGrid};

/// Statistics of one completed pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub threshold: f64,
    pub num_structures: u32,
    pub percolation: PercolationRecord,
    /// Empty unless bounding-box export is enabled.
    pub bounding_boxes: Vec<BoundingBoxRecord>,
    pub ambiguous_cases: u64,
    pub retracted_links: u64,
    /// Present when box counting is enabled.
    pub box_count: Option<BoxCount>,
    pub fractal_dimension: Option<FractalEstimate>,
}

/// A completed pass together with its label grid, cropped to the field.
#[derive(Debug, Clone)]
pub struct PassOutput {
    pub report: PassReport,
    pub labels: LabelGrid,
}

#[derive(Debug, Clone)]
pub struct PassFailure {
    /// Position in the threshold list.
    pub index: usize,
    /// NaN when the entry never parsed to a number.
    pub threshold: f64,
    pub error: ExtractError,
}

// Thresholds compare bitwise so that a NaN entry equals itself.
impl PartialEq for PassFailure {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.threshold.to_bits() == other.threshold.to_bits()
            && self.error == other.error
    }
}

/// Outcome of a run, in threshold-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub reports: Vec<PassReport>,
    pub failures: Vec<PassFailure>,
}

impl RunSummary {
    #[inline]
    pub fn passes_completed(&self) -> usize {
        self.reports.len()
    }

    #[inline]
    pub fn passes_failed(&self) -> usize {
        self.failures.len()
    }

    /// Pass with the largest structure; the earliest one wins ties.
    pub fn largest_structure(&self) -> Option<&PassReport> {
        self.reports
            .iter()
            .rev()
            .max_by_key(|report| report.percolation.max_structure_volume)
    }
}

/// Runs threshold passes with a fixed configuration.
#[derive(Debug, Clone)]
pub struct StructureExtractor {
    config: Config,
    labeler: ComponentLabeler,
}

impl StructureExtractor {
    /// # Panics
    ///
    /// Panics if `config` fails [`Config::validate`].
    pub fn new(config: Config) -> Self {
        config.validate();
        let labeler = ComponentLabeler::new(config.ambiguity_resolution);
        Self { config, labeler }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a single pass and keeps its label grid.
    pub fn run_pass(&self, field: &ScalarField, threshold: f64) -> ExtractResult<PassOutput> {
        let dims = field.dims();
        self.check_cell_limit(dims)?;

        let occupancy = threshold_field(field, threshold)?;
        let box_counts = self
            .config
            .box_counting
            .then(|| box_count(&occupancy))
            .transpose()?;
        let fractal_dimension = box_counts.as_ref().and_then(BoxCount::fractal_dimension);

        let padded = OccupancyGrid::pad(&occupancy)?;
        drop(occupancy);
        let labeling = self.labeler.label(&padded)?;
        drop(padded);

        let labels = labeling.grid.crop(dims)?;
        let volumes = StructureVolumes::from_labels(&labels);
        let percolation = volumes.percolation_record(threshold);

        let bounding_boxes = if self.config.export_bounding_boxes {
            BoundingBoxRecord::from_boxes(&labeling.bounding_boxes).collect()
        } else {
            Vec::new()
        };

        log::info!(
            "threshold {}: {} structures, largest {}, total volume {}",
            threshold,
            labels.num_structures(),
            percolation.max_structure_volume,
            percolation.total_volume
        );
        log::debug!(
            "threshold {}: {} ambiguous cases, {} retracted links",
            threshold,
            labeling.ambiguous_cases,
            labeling.retracted_links
        );
        if let Some(estimate) = &fractal_dimension {
            log::info!(
                "threshold {}: box-counting dimension {:.4} +/- {:.4}",
                threshold,
                estimate.mean,
                estimate.std_dev
            );
        }

        Ok(PassOutput {
            report: PassReport {
                threshold,
                num_structures: labels.num_structures(),
                percolation,
                bounding_boxes,
                ambiguous_cases: labeling.ambiguous_cases,
                retracted_links: labeling.retracted_links,
                box_count: box_counts,
                fractal_dimension,
            },
            labels,
        })
    }

    /// Runs every threshold without emitting records.
    pub fn run(&self, field: &ScalarField, thresholds: &[f64]) -> RunSummary {
        match self.process(field, thresholds, |_| Ok::<(), Infallible>(())) {
            Ok(summary) => summary,
            Err(never) => match never {},
        }
    }

    /// Runs every threshold, handing each finalized pass to `sink` in
    /// threshold-list order.
    ///
    /// Only sink errors abort the run.
    pub fn run_into<S: RecordSink>(
        &self,
        field: &ScalarField,
        thresholds: &[f64],
        sink: &mut S,
    ) -> io::Result<RunSummary> {
        self.process(field, thresholds, |report| self.emit(report, sink))
    }

    fn process<E>(
        &self,
        field: &ScalarField,
        thresholds: &[f64],
        mut finalize: impl FnMut(&PassReport) -> Result<(), E>,
    ) -> Result<RunSummary, E> {
        let jobs = self.config.max_concurrent_passes;
        let entries: Vec<(usize, f64)> = thresholds.iter().copied().enumerate().collect();
        let mut summary = RunSummary::default();

        log::info!(
            "processing {} thresholds over a {:?} field, {} at a time",
            thresholds.len(),
            field.dims(),
            jobs
        );

        let pass = |&(index, threshold): &(usize, f64)| {
            let outcome = self.run_pass(field, threshold).map(|output| output.report);
            (index, threshold, outcome)
        };

        // at most `jobs` passes, and so `jobs` sets of grids, are alive at once
        for batch in entries.chunks(jobs) {
            let outcomes: Vec<_> = if jobs == 1 {
                batch.iter().map(&pass).collect()
            } else {
                batch.par_iter().map(&pass).collect()
            };

            for (index, threshold, outcome) in outcomes {
                match outcome {
                    Ok(report) => {
                        finalize(&report)?;
                        summary.reports.push(report);
                    }
                    Err(error) => {
                        log::warn!("skipping threshold #{index} ({threshold}): {error}");
                        summary.failures.push(PassFailure {
                            index,
                            threshold,
                            error,
                        });
                    }
                }
            }
        }

        Ok(summary)
    }

    fn emit<S: RecordSink>(&self, report: &PassReport, sink: &mut S) -> io::Result<()> {
        if self.config.export_percolation_records {
            sink.percolation(&report.percolation)?;
        }
        for record in &report.bounding_boxes {
            sink.bounding_box(record)?;
        }
        sink.flush()
    }

    fn check_cell_limit(&self, dims: [usize; 3]) -> ExtractResult<()> {
        let padded = OccupancyGrid::padded_dims(dims)?;
        if let Some(limit) = self.config.max_cells {
            let cells = cell_count(padded).unwrap_or(usize::MAX);
            if cells > limit {
                return Err(ExtractError::ResourceExhaustion {
                    dims: padded,
                    reason: format!("{cells} cells exceed the configured limit of {limit}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::TextRecordWriter;
    use common::AxisOrder;
    use rand::prelude::*;

    /// 4x4x4 field of 0.0 with a 2x2x2 block of 10.0 at the origin, 5.0 at
    /// (3,0,3) and -10.0 at (3,3,3).
    fn sample_field() -> ScalarField {
        let dims = [4, 4, 4];
        let mut values = vec![0.0; 64];
        let order = AxisOrder::ZFastest;
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    values[order.flat_index(dims, [x, y, z])] = 10.0;
                }
            }
        }
        values[order.flat_index(dims, [3, 3, 3])] = -10.0;
        values[order.flat_index(dims, [3, 0, 3])] = 5.0;
        ScalarField::new(dims, order, values).unwrap()
    }

    fn random_field(dims: [usize; 3], seed: u64) -> ScalarField {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..dims[0] * dims[1] * dims[2])
            .map(|_| rng.random_range(-1.0..1.0))
            .collect();
        ScalarField::new(dims, AxisOrder::XFastest, values).unwrap()
    }

    #[test]
    fn single_pass_statistics() {
        let extractor = StructureExtractor::new(Config::default());
        let output = extractor.run_pass(&sample_field(), 1.0).unwrap();

        assert_eq!(output.labels.dims(), [4, 4, 4]);
        assert_eq!(output.report.num_structures, 2);
        assert_eq!(
            output.report.percolation,
            PercolationRecord {
                threshold: 1.0,
                max_structure_volume: 8,
                total_volume: 9,
            }
        );
        assert!(output.report.bounding_boxes.is_empty());
        assert!(output.report.box_count.is_none());
    }

    #[test]
    fn negative_threshold_selects_lower_tail() {
        let extractor = StructureExtractor::new(Config::default());
        let report = extractor.run_pass(&sample_field(), -1.0).unwrap().report;

        assert_eq!(report.num_structures, 1);
        assert_eq!(report.percolation.total_volume, 1);
    }

    #[test]
    fn empty_pass_reports_zeros() {
        let extractor = StructureExtractor::new(Config::default());
        let report = extractor.run_pass(&sample_field(), 100.0).unwrap().report;

        assert_eq!(report.num_structures, 0);
        assert_eq!(report.percolation.to_string(), "100 0 0");
    }

    #[test]
    fn failures_do_not_stop_the_run() {
        let extractor = StructureExtractor::new(Config::default());
        let summary = extractor.run(&sample_field(), &[1.0, f64::NAN, -1.0, 100.0]);

        assert_eq!(summary.passes_completed(), 3);
        assert_eq!(summary.passes_failed(), 1);
        assert_eq!(summary.failures[0].index, 1);
        assert!(matches!(
            summary.failures[0].error,
            ExtractError::InvalidThreshold(_)
        ));

        let thresholds: Vec<f64> = summary.reports.iter().map(|r| r.threshold).collect();
        assert_eq!(thresholds, vec![1.0, -1.0, 100.0]);
        assert_eq!(summary.largest_structure().unwrap().threshold, 1.0);
    }

    #[test]
    fn cell_limit_fails_only_that_pass() {
        let config = Config {
            max_cells: Some(100),
            ..Config::default()
        };
        let extractor = StructureExtractor::new(config);
        let summary = extractor.run(&sample_field(), &[1.0]);

        assert_eq!(summary.passes_completed(), 0);
        assert!(matches!(
            summary.failures[0].error,
            ExtractError::ResourceExhaustion { dims: [5, 5, 5], .. }
        ));

        let roomy = StructureExtractor::new(Config {
            max_cells: Some(125),
            ..Config::default()
        });
        assert_eq!(roomy.run(&sample_field(), &[1.0]).passes_completed(), 1);
    }

    #[test]
    fn resolution_toggle_changes_structure_count() {
        let order = AxisOrder::ZFastest;
        let dims = [2, 2, 2];
        let mut values = vec![0.0; 8];
        values[order.flat_index(dims, [0, 0, 0])] = 1.0;
        values[order.flat_index(dims, [1, 1, 1])] = 1.0;
        let field = ScalarField::new(dims, order, values).unwrap();

        let resolved = StructureExtractor::new(Config::default())
            .run_pass(&field, 0.5)
            .unwrap();
        let plain = StructureExtractor::new(Config::plain())
            .run_pass(&field, 0.5)
            .unwrap();

        assert_eq!(resolved.report.num_structures, 2);
        assert_eq!(resolved.report.ambiguous_cases, 1);
        assert_eq!(plain.report.num_structures, 1);
        assert_eq!(plain.report.percolation.max_structure_volume, 2);
    }

    #[test]
    fn concurrent_passes_match_sequential() {
        let field = random_field([12, 9, 7], 11);
        let thresholds = [0.9, -0.9, 0.5, f64::NAN, -0.2, 0.1, 0.7];

        let sequential = StructureExtractor::new(Config {
            export_bounding_boxes: true,
            ..Config::default()
        })
        .run(&field, &thresholds);
        let concurrent = StructureExtractor::new(Config {
            export_bounding_boxes: true,
            max_concurrent_passes: 3,
            ..Config::default()
        })
        .run(&field, &thresholds);

        assert_eq!(sequential.passes_completed(), 6);
        assert_eq!(sequential.reports, concurrent.reports);
        assert_eq!(sequential.failures, concurrent.failures);
        assert_eq!(sequential, concurrent);
        assert_eq!(sequential.failures[0].index, 3);
    }

    #[test]
    fn failure_with_nan_threshold_equals_itself() {
        let failure = PassFailure {
            index: 2,
            threshold: f64::NAN,
            error: ExtractError::InvalidThreshold("NaN".to_string()),
        };
        assert_eq!(failure, failure.clone());
        assert_ne!(
            failure,
            PassFailure {
                index: 3,
                ..failure.clone()
            }
        );
        assert_ne!(
            failure,
            PassFailure {
                threshold: 0.5,
                ..failure.clone()
            }
        );
    }

    #[test]
    fn every_batch_size_gives_the_same_run() {
        let field = random_field([6, 5, 4], 3);
        let thresholds = [0.3, f64::INFINITY, -0.4, 0.0, 0.8];
        let expected = StructureExtractor::new(Config::default()).run(&field, &thresholds);

        for jobs in 2..=6 {
            let summary = StructureExtractor::new(Config {
                max_concurrent_passes: jobs,
                ..Config::default()
            })
            .run(&field, &thresholds);
            assert_eq!(summary, expected, "jobs = {jobs}");
        }
    }

    #[test]
    fn records_are_written_per_pass_in_order() {
        let extractor = StructureExtractor::new(Config {
            export_bounding_boxes: true,
            ..Config::default()
        });
        let mut sink = TextRecordWriter::new(Some(Vec::new()), Some(Vec::new()));
        let summary = extractor
            .run_into(&sample_field(), &[1.0, f64::NAN, 100.0, -1.0], &mut sink)
            .unwrap();
        assert_eq!(summary.passes_completed(), 3);

        let (percolation, boxes) = sink.into_inner();
        let percolation = String::from_utf8(percolation.unwrap()).unwrap();
        let boxes = String::from_utf8(boxes.unwrap()).unwrap();

        assert_eq!(percolation, "1 8 9\n100 0 0\n-1 1 1\n");
        // structure ids restart with every pass
        assert_eq!(boxes, "1 0 1 0 1 0 1\n2 3 3 0 0 3 3\n1 3 3 3 3 3 3\n");
    }

    #[test]
    fn box_counting_is_reported_when_enabled() {
        let extractor = StructureExtractor::new(Config {
            box_counting: true,
            ..Config::default()
        });
        let report = extractor.run_pass(&sample_field(), 1.0).unwrap().report;

        let counts = report.box_count.unwrap();
        assert_eq!(counts.sizes, vec![1, 2, 4]);
        assert_eq!(counts.counts, vec![9, 2, 1]);
        assert!(report.fractal_dimension.is_none());
    }
}
