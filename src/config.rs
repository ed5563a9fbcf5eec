// src/config.rs
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProcessError, Result};
use crate::process::images::parse_base_url;
use crate::process::pipeline::{default_steps, Pipeline, StepToggle};

/// Everything a run needs; nothing is read from process-wide state.
///
/// Loaded from YAML, every field optional:
///
/// ```yaml
/// data_dir: /srv/catalog/data5
/// input: import.csv
/// output: out-test
/// rows_per_chunk: 500
/// images_base_url: https://photos.example.com/photos
/// steps:
///   - step: description_msrp_token
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base directory for relative `input` / `output` paths.
    pub data_dir: Option<PathBuf>,
    pub input: PathBuf,
    /// Name of the chunk directory; units land in `<output>/<i>.csv`.
    pub output: PathBuf,
    pub rows_per_chunk: usize,
    pub marker_text: String,
    /// Class of the stock / dye-lot table.
    pub table_css_class: String,
    /// Class of the table built from the marked description segment.
    pub details_css_class: String,
    /// Class of the `div` wrapped around each rendered block.
    pub container_class: String,
    pub images_base_url: String,
    pub steps: Vec<StepToggle>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            input: PathBuf::from("import.csv"),
            output: PathBuf::from("out"),
            rows_per_chunk: 1000,
            marker_text: "MSRP:".to_string(),
            table_css_class: "product-table-pieces".to_string(),
            details_css_class: "product-table-details".to_string(),
            container_class: "product-description".to_string(),
            images_base_url: "https://localhost/photos".to_string(),
            steps: default_steps(),
        }
    }
}

impl Config {
    /// Load from a YAML file, or defaults when no path is given. Not
    /// validated here: callers apply their overrides first, then `validate`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                Ok(serde_yaml::from_str(&text)?)
            }
            None => Ok(Config::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows_per_chunk == 0 {
            return Err(ProcessError::InvalidChunkSize);
        }
        if self.marker_text.is_empty() {
            return Err(ProcessError::Config("marker_text must not be empty".into()));
        }
        parse_base_url(&self.images_base_url)?;
        Ok(())
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.steps.clone())
    }

    pub fn input_path(&self) -> PathBuf {
        self.resolve(&self.input)
    }

    /// Root the chunk directory is created under.
    pub fn output_root(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_default()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
