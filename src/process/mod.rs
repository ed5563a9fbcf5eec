// src/process/mod.rs
pub mod chunk;
pub mod csv_io;
pub mod images;
pub mod pipeline;
pub mod report;
pub mod steps;

pub use chunk::{chunk_records, write_chunks, Chunk, CsvDirSink, RecordSink};
pub use images::{FsImageSource, ImageSource};
pub use pipeline::{default_steps, Pipeline, StepKind, StepToggle};
pub use report::{RunReport, Warning};
pub use steps::RecordProcessor;

/// Columns that trigger processing; everything else passes through.
pub const COL_SKU: &str = "SKU";
pub const COL_NAME: &str = "Name";
pub const COL_PIECE: &str = "Piece";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_REGULAR_PRICE: &str = "Regular price";
pub const COL_IMAGES: &str = "Images";
