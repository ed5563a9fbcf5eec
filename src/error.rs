use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("column '{column}' on record '{sku}' is not a number: {raw:?}")]
    NumericParse {
        column: String,
        sku: String,
        raw: String,
    },

    #[error("rows per chunk must be a positive integer")]
    InvalidChunkSize,

    #[error("unit '{unit}': record has column '{column}' which is not in the unit header")]
    UnknownColumn { unit: String, column: String },

    #[error("image path '{0}' climbs above its first component")]
    ImagePath(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid images base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, ProcessError>;
