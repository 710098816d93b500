//! Run configuration.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Options for a structure extraction run.
///
/// Passed at call time; a YAML file can supply any subset of the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Veto diagonal links that marching-cubes topology keeps apart.
    /// Disabling gives plain 26-connectivity.
    pub ambiguity_resolution: bool,
    /// Emit one bounding-box record per structure.
    pub export_bounding_boxes: bool,
    /// Emit one percolation record per threshold.
    pub export_percolation_records: bool,
    /// Estimate the box-counting dimension of every pass.
    pub box_counting: bool,
    /// Threshold passes in flight at once. 1 runs them on the calling thread.
    pub max_concurrent_passes: usize,
    /// Upper bound on padded grid cells per pass.
    pub max_cells: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ambiguity_resolution: true,
            export_bounding_boxes: false,
            export_percolation_records: true,
            box_counting: false,
            max_concurrent_passes: 1,
            max_cells: None,
        }
    }
}

impl Config {
    /// Plain 26-connectivity, no record export.
    pub fn plain() -> Self {
        Self {
            ambiguity_resolution: false,
            export_percolation_records: false,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) {
        assert!(
            self.max_concurrent_passes > 0,
            "max_concurrent_passes must be > 0, got {}",
            self.max_concurrent_passes
        );
        if let Some(max_cells) = self.max_cells {
            assert!(max_cells > 0, "max_cells must be > 0 when set");
        }
    }

    pub fn from_yaml(input: &str) -> anyhow::Result<Self> {
        serde_yml::from_str(input).context("invalid configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&input).with_context(|| format!("in {}", path.display()))
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yml::to_string(self).context("failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        config.validate();
        assert!(config.ambiguity_resolution);
        assert!(config.export_percolation_records);
        assert!(!config.export_bounding_boxes);
        assert_eq!(config.max_concurrent_passes, 1);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("export_bounding_boxes: true\nmax_concurrent_passes: 4\n")
            .unwrap();
        assert!(config.export_bounding_boxes);
        assert_eq!(config.max_concurrent_passes, 4);
        assert!(config.ambiguity_resolution);
        assert_eq!(config.max_cells, None);
    }

    #[test]
    fn yaml_roundtrip() {
        let config = Config {
            box_counting: true,
            max_cells: Some(1 << 20),
            ..Config::plain()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(Config::from_yaml("max_concurrent_passes: many").is_err());
    }

    #[test]
    #[should_panic(expected = "max_concurrent_passes must be > 0")]
    fn zero_concurrency_panics() {
        Config {
            max_concurrent_passes: 0,
            ..Config::default()
        }
        .validate();
    }
}
