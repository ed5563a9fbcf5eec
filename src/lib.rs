pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod markup;
pub mod process;
pub mod record;
pub mod text;

pub use config::Config;
pub use error::{ProcessError, Result};
pub use record::{Record, RecordSet, Value};
