// src/process/steps.rs
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{ProcessError, Result};
use crate::markup::{build_product_table, build_stock_dye_lot_table, wrap_container};
use crate::process::images::{image_url, parse_base_url, FsImageSource, ImageSource};
use crate::process::pipeline::StepKind;
use crate::process::report::{RunReport, Warning};
use crate::process::{COL_DESCRIPTION, COL_IMAGES, COL_NAME, COL_PIECE, COL_REGULAR_PRICE, COL_SKU};
use crate::record::{Record, RecordSet, Value};
use crate::text::{
    capitalize_words, format_msrp_price, normalize_msrp_token, remove_substring, split_at_marker,
};

/// Words stripped from a Piece block before it is parsed.
const PIECE_LABELS: [&str; 2] = ["stock", "dye lot"];

/// Applies the individual record steps. Every step takes the record set by
/// value and hands back the rewritten set.
pub struct RecordProcessor<S = FsImageSource> {
    marker: String,
    details_class: String,
    pieces_class: String,
    container_class: String,
    images_base: Url,
    images: S,
}

impl RecordProcessor<FsImageSource> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_image_source(config, FsImageSource)
    }
}

impl<S: ImageSource> RecordProcessor<S> {
    pub fn with_image_source(config: &Config, images: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            marker: config.marker_text.clone(),
            details_class: config.details_css_class.clone(),
            pieces_class: config.table_css_class.clone(),
            container_class: config.container_class.clone(),
            images_base: parse_base_url(&config.images_base_url)?,
            images,
        })
    }

    /// Run one step. The flag is false when the step was skipped because
    /// a required column is missing (or there is nothing to process).
    pub fn apply(
        &self,
        step: StepKind,
        records: RecordSet,
        report: &mut RunReport,
    ) -> Result<(RecordSet, bool)> {
        let required: &[&str] = match step {
            StepKind::SkuTrim => &[COL_SKU],
            StepKind::NameNormalize => &[COL_NAME],
            StepKind::DescriptionTable | StepKind::DescriptionMsrpToken => &[COL_DESCRIPTION],
            StepKind::PiecesTable | StepKind::PiecesRaw => &[COL_PIECE, COL_DESCRIPTION],
            StepKind::PriceRound => &[COL_REGULAR_PRICE],
            StepKind::ImagesResolve => &[COL_IMAGES],
        };
        if !has_columns(step, &records, required, report) {
            return Ok((records, false));
        }

        let out = match step {
            StepKind::SkuTrim => self.trim_sku(records),
            StepKind::NameNormalize => self.normalize_names(records),
            StepKind::DescriptionTable => self.tabulate_descriptions(records, report),
            StepKind::DescriptionMsrpToken => self.normalize_description_msrp(records),
            StepKind::PiecesTable => self.append_pieces_table(records),
            StepKind::PiecesRaw => self.append_pieces_raw(records),
            StepKind::PriceRound => self.round_prices(records)?,
            StepKind::ImagesResolve => self.resolve_images(records, report)?,
        };
        Ok((out, true))
    }

    pub fn trim_sku(&self, records: RecordSet) -> RecordSet {
        records
            .into_iter()
            .map(|mut r| {
                if let Some(sku) = r.get_text(COL_SKU) {
                    let trimmed = sku.trim().to_string();
                    r.insert(COL_SKU, Value::Text(trimmed));
                }
                r
            })
            .collect()
    }

    /// trim → newlines to spaces → capitalize words → `MSRP USD` prices
    pub fn normalize_names(&self, records: RecordSet) -> RecordSet {
        records
            .into_iter()
            .map(|mut r| {
                let raw = text_of(&r, COL_NAME);
                let name = raw
                    .trim()
                    .replace("\r\n", " ")
                    .replace(['\n', '\r'], " ");
                let name = format_msrp_price(&capitalize_words(&name));
                debug!(sku = %r.sku(), name = %name, "normalized name");
                r.insert(COL_NAME, Value::Text(name));
                r
            })
            .collect()
    }

    /// Free text before the marker and a detail table built from the
    /// marked part, each in its own container.
    pub fn tabulate_descriptions(&self, records: RecordSet, report: &mut RunReport) -> RecordSet {
        records
            .into_iter()
            .map(|mut r| {
                let desc = text_of(&r, COL_DESCRIPTION);
                let (preamble, marked) = split_at_marker(desc.trim(), &self.marker);
                let table = match marked {
                    Some(marked) => build_product_table(&marked, &self.details_class).to_html(),
                    None => {
                        report.warn(Warning::MissingMarker { sku: r.sku() });
                        String::new()
                    }
                };
                let desc = format!(
                    "{}{}",
                    wrap_container(&self.container_class, &preamble),
                    wrap_container(&self.container_class, &table)
                );
                r.insert(COL_DESCRIPTION, Value::Text(desc));
                r
            })
            .collect()
    }

    pub fn normalize_description_msrp(&self, records: RecordSet) -> RecordSet {
        records
            .into_iter()
            .map(|mut r| {
                let desc = normalize_msrp_token(text_of(&r, COL_DESCRIPTION).trim());
                r.insert(COL_DESCRIPTION, Value::Text(desc));
                r
            })
            .collect()
    }

    /// Parse the Piece block into a stock / dye-lot table and append it to
    /// the description. Non-text Piece values are left alone.
    pub fn append_pieces_table(&self, records: RecordSet) -> RecordSet {
        records
            .into_iter()
            .map(|r| {
                let Some(piece) = r.get_text(COL_PIECE) else {
                    debug!(sku = %r.sku(), "Piece is not text; skipped");
                    return r;
                };
                let cleaned = PIECE_LABELS
                    .iter()
                    .fold(piece.trim().to_string(), |acc, label| {
                        remove_substring(&acc, label)
                    });
                let html = build_stock_dye_lot_table(&strip_label_separators(&cleaned))
                    .to_table(&self.pieces_class)
                    .to_html();
                let block = wrap_container(&self.container_class, &html);
                append_description(r, &block)
            })
            .collect()
    }

    pub fn append_pieces_raw(&self, records: RecordSet) -> RecordSet {
        records
            .into_iter()
            .map(|r| {
                let Some(piece) = r.get_text(COL_PIECE) else {
                    debug!(sku = %r.sku(), "Piece is not text; skipped");
                    return r;
                };
                let block = wrap_container(&self.container_class, piece.trim());
                append_description(r, &block)
            })
            .collect()
    }

    /// Round half to even. A price that is not a finite number fails the
    /// whole run.
    pub fn round_prices(&self, records: RecordSet) -> Result<RecordSet> {
        records
            .into_iter()
            .map(|mut r| {
                let value = r.get(COL_REGULAR_PRICE).cloned().unwrap_or(Value::Empty);
                let parsed = match &value {
                    Value::Number(n) => Some(*n),
                    Value::Text(s) => s.trim().parse::<f64>().ok(),
                    Value::Empty => None,
                };
                let price = parsed.filter(|n| n.is_finite()).ok_or_else(|| {
                    ProcessError::NumericParse {
                        column: COL_REGULAR_PRICE.to_string(),
                        sku: r.sku(),
                        raw: value.to_string(),
                    }
                })?;
                r.insert(COL_REGULAR_PRICE, Value::Number(price.round_ties_even()));
                Ok(r)
            })
            .collect()
    }

    /// Replace an image directory with the comma-joined URLs of its images.
    pub fn resolve_images(&self, records: RecordSet, report: &mut RunReport) -> Result<RecordSet> {
        records
            .into_iter()
            .map(|mut r| {
                let dir = match r.get_text(COL_IMAGES).map(str::trim) {
                    Some(dir) if !dir.is_empty() => PathBuf::from(dir),
                    _ => return Ok(r),
                };
                match self.images.list_images(&dir)? {
                    Some(files) => {
                        let urls = files
                            .iter()
                            .map(|f| image_url(&self.images_base, f))
                            .collect::<Result<Vec<String>>>()?;
                        debug!(sku = %r.sku(), count = urls.len(), "resolved images");
                        r.insert(COL_IMAGES, Value::Text(urls.join(",")));
                    }
                    None => report.warn(Warning::DirectoryNotFound {
                        sku: r.sku(),
                        path: dir,
                    }),
                }
                Ok(r)
            })
            .collect()
    }
}

fn has_columns(
    step: StepKind,
    records: &[Record],
    columns: &[&str],
    report: &mut RunReport,
) -> bool {
    let Some(first) = records.first() else {
        return false;
    };
    for column in columns {
        if !first.contains(column) {
            report.warn(Warning::MissingColumn {
                step,
                column: column.to_string(),
            });
            return false;
        }
    }
    true
}

/// Cell text; numbers are rendered, empty cells read as "".
fn text_of(record: &Record, column: &str) -> String {
    record.get(column).map(Value::to_string).unwrap_or_default()
}

fn append_description(mut record: Record, block: &str) -> Record {
    let desc = text_of(&record, COL_DESCRIPTION) + block;
    record.insert(COL_DESCRIPTION, Value::Text(desc));
    record
}

/// Drop the `:` left at the start of a line once its label is removed.
fn strip_label_separators(text: &str) -> String {
    text.lines()
        .map(|line| line.trim_start_matches(|c: char| c == ':' || c.is_whitespace()))
        .collect::<Vec<_>>()
        .join("\n")
}
