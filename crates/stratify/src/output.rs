//! Writing and reading the flat delimited output tables.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, StratifyError};
use crate::reshape::{CleanRecord, CleanTable};
use crate::sample::SampleSet;

/// Field delimiter for written tables.
pub const DEFAULT_OUTPUT_DELIMITER: u8 = b',';

/// Serialize the clean table (`Entity,Income,MOE`) to any writer.
pub fn write_clean_table<W: Write>(writer: W, table: &CleanTable, delimiter: u8) -> Result<()> {
    write_rows(writer, &table.records, delimiter)
}

/// Serialize the sample (`Entity,Income,MOE,Tertile`) to any writer.
pub fn write_sample<W: Write>(writer: W, sample: &SampleSet, delimiter: u8) -> Result<()> {
    write_rows(writer, &sample.records, delimiter)
}

/// Save the clean table to a file, creating parent directories as needed.
pub fn save_clean_table(path: impl AsRef<Path>, table: &CleanTable, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    write_clean_table(create_file(path)?, table, delimiter)
}

/// Save the sample table to a file, creating parent directories as needed.
pub fn save_sample(path: impl AsRef<Path>, sample: &SampleSet, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    write_sample(create_file(path)?, sample, delimiter)
}

/// Read a previously written clean table back.
///
/// Rows whose income is not a finite number are rejected.
pub fn read_clean_table<R: Read>(reader: R, delimiter: u8) -> Result<CleanTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<CleanRecord>().enumerate() {
        let record = result?;
        if !record.income.is_finite() {
            return Err(StratifyError::EmptyData(format!(
                "row {} ('{}') has no finite income",
                row + 1,
                record.entity
            )));
        }
        records.push(record);
    }

    Ok(CleanTable::from_records(records))
}

/// Load a clean table from a file.
pub fn load_clean_table(path: impl AsRef<Path>, delimiter: u8) -> Result<CleanTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StratifyError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_clean_table(file, delimiter)
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T], delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_writer(writer);

    for row in rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| StratifyError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let file = File::create(path).map_err(|e| StratifyError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::StratifiedSampler;

    fn sample_table() -> CleanTable {
        CleanTable::from_records(vec![
            CleanRecord {
                entity: "Autauga County, Alabama".to_string(),
                income: 58786.0,
                moe: "2345".to_string(),
            },
            CleanRecord {
                entity: "Baldwin County, Alabama".to_string(),
                income: 66140.5,
                moe: "".to_string(),
            },
        ])
    }

    #[test]
    fn test_clean_table_csv_layout() {
        let mut buf = Vec::new();
        write_clean_table(&mut buf, &sample_table(), DEFAULT_OUTPUT_DELIMITER).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "Entity,Income,MOE\n\
             \"Autauga County, Alabama\",58786.0,2345\n\
             \"Baldwin County, Alabama\",66140.5,\n"
        );
    }

    #[test]
    fn test_sample_has_tertile_column() {
        let sample = StratifiedSampler::new().sample(&sample_table()).unwrap();
        let mut buf = Vec::new();
        write_sample(&mut buf, &sample, b'\t').unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Entity\tIncome\tMOE\tTertile\n"));
        assert!(text.contains("\tLow\n"));
        assert!(text.contains("\tHigh\n"));
    }

    #[test]
    fn test_read_back_clean_table() {
        let mut buf = Vec::new();
        write_clean_table(&mut buf, &sample_table(), DEFAULT_OUTPUT_DELIMITER).unwrap();

        let table = read_clean_table(buf.as_slice(), DEFAULT_OUTPUT_DELIMITER).unwrap();
        assert_eq!(table.records, sample_table().records);
    }

    #[test]
    fn test_read_rejects_missing_income() {
        let data = "Entity,Income,MOE\nA,,1\n";
        assert!(read_clean_table(data.as_bytes(), b',').is_err());
    }
}
