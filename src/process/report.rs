use std::fmt;
use std::path::PathBuf;

use crate::process::pipeline::StepKind;

/// A recoverable condition met while running a step. Collected in the
/// [`RunReport`] and logged as it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    MissingColumn { step: StepKind, column: String },
    MissingMarker { sku: String },
    DirectoryNotFound { sku: String, path: PathBuf },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingColumn { step, column } => {
                write!(f, "{}: data has no column '{}'", step, column)
            }
            Warning::MissingMarker { sku } => write!(f, "SKU '{}' is missing MSRP", sku),
            Warning::DirectoryNotFound { sku, path } => {
                write!(f, "SKU '{}': {} does not exist", sku, path.display())
            }
        }
    }
}

/// What a pipeline run did: which steps ran, which were skipped, and every
/// warning raised along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub steps_run: Vec<StepKind>,
    pub steps_skipped: Vec<StepKind>,
    pub warnings: Vec<Warning>,
    pub records: usize,
}

impl RunReport {
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn missing_marker_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, Warning::MissingMarker { .. }))
            .count()
    }
}
