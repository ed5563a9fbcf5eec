// src/process/csv_io.rs
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::{Record, RecordSet, Value};

const BOM: char = '\u{feff}';

/// Read a headed CSV file into records. A leading UTF-8 BOM is dropped;
/// short rows get `Empty` for their missing trailing cells.
pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<RecordSet> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let content = content.strip_prefix(BOM).unwrap_or(&content);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = result?;
        if row.len() > headers.len() {
            warn!(
                file = %path.display(),
                row = idx,
                extra = row.len() - headers.len(),
                "row has more cells than the header; extra cells dropped"
            );
        }
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = row
                    .get(i)
                    .map(|cell| Value::Text(cell.to_string()))
                    .unwrap_or(Value::Empty);
                (name.to_string(), value)
            })
            .collect();
        records.push(record);
    }

    debug!(file = %path.display(), rows = records.len(), "read csv");
    Ok(records)
}

/// Read a JSON array of objects; key order is kept per record.
pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<RecordSet> {
    let file = File::open(path.as_ref())?;
    let records: RecordSet = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(records)
}

/// Pick the reader by extension: `.json` or CSV for anything else.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<RecordSet> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        read_json_file(path)
    } else {
        read_csv_file(path)
    }
}

/// Write `rows` under the given header; cells a row lacks are left empty.
pub fn write_rows<P: AsRef<Path>>(path: P, fieldnames: &[String], rows: &[Record]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path.as_ref())?;
    wtr.write_record(fieldnames)?;
    for row in rows {
        wtr.write_record(fieldnames.iter().map(|f| {
            row.get(f).map(Value::to_string).unwrap_or_default()
        }))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Single-file writer; the header is taken from the first record.
pub fn write_csv_file<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<()> {
    let fieldnames: Vec<String> = records
        .first()
        .map(|r| r.columns().map(String::from).collect())
        .unwrap_or_default();
    write_rows(path, &fieldnames, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn reads_bom_prefixed_csv() -> anyhow::Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all("\u{feff}SKU,Name,Description\n A1 ,silk,\"two\nlines\"\nB2,wool\n".as_bytes())?;

        let records = read_csv_file(tmp.path())?;
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].columns().collect::<Vec<_>>(),
            vec!["SKU", "Name", "Description"]
        );
        assert_eq!(records[0].get_text("SKU"), Some(" A1 "));
        assert_eq!(records[0].get_text("Description"), Some("two\nlines"));
        assert_eq!(records[1].get("Description"), Some(&Value::Empty));
        Ok(())
    }

    #[test]
    fn read_records_dispatches_on_extension() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let json = dir.path().join("import.JSON");
        fs::write(&json, r#"[{"SKU": "A", "Regular price": 9.5, "Piece": null}]"#)?;
        let records = read_records(&json)?;
        assert_eq!(records[0].get("Regular price"), Some(&Value::Number(9.5)));

        let csv = dir.path().join("import.csv");
        fs::write(&csv, "SKU\nA\n")?;
        assert_eq!(read_records(&csv)?[0].get_text("SKU"), Some("A"));
        Ok(())
    }

    #[test]
    fn write_then_read_keeps_rows() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        let records = vec![
            Record::new().with("SKU", "A").with("Regular price", 12.0),
            Record::new().with("SKU", "B, \"quoted\"").with("Regular price", 3.5),
        ];
        write_csv_file(&path, &records)?;

        let back = read_csv_file(&path)?;
        assert_eq!(back[0].get_text("Regular price"), Some("12"));
        assert_eq!(back[1].get_text("SKU"), Some("B, \"quoted\""));
        Ok(())
    }
}
