//! # extract-structures
//!
//! Labels the structures of a raw 3-D scalar field at each requested
//! threshold and appends percolation and bounding-box records to text files.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use percolation::{
    parse_threshold, AxisOrder, Config, PassFailure, RunSummary, ScalarField,
    StructureExtractor, TextRecordWriter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Precision {
    F32,
    F64,
}

#[derive(Parser, Debug)]
#[command(name = "extract-structures")]
#[command(about = "Connected structures and percolation statistics of a thresholded 3-D field")]
struct Cli {
    /// Raw binary field, native byte order
    #[arg(value_name = "FIELD")]
    input: PathBuf,

    /// Field dimensions
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], required = true)]
    dims: Vec<usize>,

    /// Data is stored x fastest (column-major); default is z fastest
    #[arg(long)]
    x_fastest: bool,

    /// Element type of the raw field
    #[arg(long, value_enum, default_value_t = Precision::F32)]
    precision: Precision,

    /// Threshold to process; repeat for several passes
    #[arg(short, long = "threshold", required = true, allow_hyphen_values = true)]
    thresholds: Vec<String>,

    /// YAML configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Plain 26-connectivity
    #[arg(long)]
    no_ambiguity_resolution: bool,

    /// Write one bounding box per structure
    #[arg(long)]
    bounding_boxes: bool,

    /// Do not write percolation records
    #[arg(long)]
    no_percolation_records: bool,

    /// Estimate the box-counting dimension of every pass
    #[arg(long)]
    box_count: bool,

    /// Threshold passes to run at once
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    #[arg(long, default_value = "Percolation_threshold.txt")]
    percolation_out: PathBuf,

    #[arg(long, default_value = "NeighborInformation.txt")]
    bbox_out: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if self.no_ambiguity_resolution {
            config.ambiguity_resolution = false;
        }
        if self.bounding_boxes {
            config.export_bounding_boxes = true;
        }
        if self.no_percolation_records {
            config.export_percolation_records = false;
        }
        if self.box_count {
            config.box_counting = true;
        }
        if let Some(jobs) = self.jobs {
            config.max_concurrent_passes = jobs.get();
        }
        if config.max_concurrent_passes == 0 {
            bail!("max_concurrent_passes must be > 0");
        }
        if config.max_cells == Some(0) {
            bail!("max_cells must be > 0 when set");
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = common::log_setup::setup_logging(&cli.log_level)?;

    let config = cli.resolve_config()?;
    log::debug!("configuration: {config:?}");

    let dims: [usize; 3] = cli
        .dims
        .as_slice()
        .try_into()
        .context("--dims takes exactly three values")?;
    let order = if cli.x_fastest {
        AxisOrder::XFastest
    } else {
        AxisOrder::ZFastest
    };
    let field = read_field(&cli.input, dims, order, cli.precision)?;

    let (thresholds, positions, rejected) = parse_thresholds(&cli.thresholds);

    let mut sink = TextRecordWriter::new(
        config
            .export_percolation_records
            .then(|| open_append(&cli.percolation_out))
            .transpose()?,
        config
            .export_bounding_boxes
            .then(|| open_append(&cli.bbox_out))
            .transpose()?,
    );

    let extractor = StructureExtractor::new(config);
    let mut summary = extractor
        .run_into(&field, &thresholds, &mut sink)
        .context("failed to write records")?;

    merge_failures(&mut summary, &positions, rejected);

    report(&summary);
    Ok(())
}

fn read_field(
    path: &Path,
    dims: [usize; 3],
    order: AxisOrder,
    precision: Precision,
) -> anyhow::Result<ScalarField> {
    let field = match precision {
        Precision::F32 => ScalarField::from_f32(dims, order, &read_raw::<f32>(path)?),
        Precision::F64 => ScalarField::new(dims, order, read_raw::<f64>(path)?),
    }
    .with_context(|| format!("in {}", path.display()))?;

    log::info!(
        "loaded {} ({:?}, {:?}, {:?})",
        path.display(),
        dims,
        order,
        precision
    );
    Ok(field)
}

fn read_raw<T: bytemuck::Pod>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let len = usize::try_from(file.metadata()?.len())
        .with_context(|| format!("{} does not fit in memory", path.display()))?;
    let element = std::mem::size_of::<T>();
    if len % element != 0 {
        bail!(
            "{} holds {} bytes, not a whole number of {}-byte values",
            path.display(),
            len,
            element
        );
    }

    let mut values = vec![T::zeroed(); len / element];
    file.read_exact(bytemuck::cast_slice_mut(&mut values))
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(values)
}

/// Splits the raw entries into usable thresholds, their entry positions, and
/// rejected entries.
fn parse_thresholds(raw: &[String]) -> (Vec<f64>, Vec<usize>, Vec<PassFailure>) {
    let mut thresholds = Vec::with_capacity(raw.len());
    let mut positions = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();
    for (index, entry) in raw.iter().enumerate() {
        match parse_threshold(entry) {
            Ok(value) => {
                thresholds.push(value);
                positions.push(index);
            }
            Err(error) => {
                log::warn!("skipping threshold entry #{index}: {error}");
                rejected.push(PassFailure {
                    index,
                    threshold: f64::NAN,
                    error,
                });
            }
        }
    }
    (thresholds, positions, rejected)
}

/// Rewrites failure indices from the parsed list to raw entry positions and
/// folds in the rejected entries, keeping entry order.
fn merge_failures(summary: &mut RunSummary, positions: &[usize], rejected: Vec<PassFailure>) {
    for failure in &mut summary.failures {
        failure.index = positions[failure.index];
    }
    summary.failures.extend(rejected);
    summary.failures.sort_by_key(|failure| failure.index);
}

fn open_append(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn report(summary: &RunSummary) {
    for pass in &summary.reports {
        log::info!(
            "threshold {}: {} structures",
            pass.threshold,
            pass.num_structures
        );
    }
    log::info!(
        "passes completed: {}, failed: {}",
        summary.passes_completed(),
        summary.passes_failed()
    );
    match summary.largest_structure() {
        Some(pass) => log::info!(
            "largest structure: {} cells at threshold {}",
            pass.percolation.max_structure_volume,
            pass.threshold
        ),
        None => log::info!("no pass completed"),
    }
}
