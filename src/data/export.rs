use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use super::error::ExportError;
use super::model::DailyAggregate;

/// File name offered by the save dialog.
pub const DEFAULT_EXPORT_NAME: &str = "matching_days.csv";

/// Write matching days to `path`, choosing the format by extension
/// (`.csv`, `.json`, `.parquet` / `.pq`).
pub fn export_days(days: &[DailyAggregate], path: &Path) -> Result<(), ExportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(days, File::create(path)?),
        "json" => write_json(days, File::create(path)?),
        "parquet" | "pq" => write_parquet(days, File::create(path)?),
        other => Err(ExportError::UnsupportedExtension(other.to_string())),
    }
}

/// Comma-delimited, ISO dates, full-precision temperatures.
pub fn write_csv<W: Write>(days: &[DailyAggregate], out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["Date", "Daily avg temp (C)"])?;
    for day in days {
        writer.write_record([
            day.date.format("%Y-%m-%d").to_string(),
            day.mean_temperature.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Pretty JSON array of `{ "date", "mean_temperature" }` objects.
pub fn write_json<W: Write>(days: &[DailyAggregate], out: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(out, days)?;
    Ok(())
}

/// Two-column Parquet file: `date` (Utf8) and `mean_temperature` (Float64).
pub fn write_parquet<W: Write + Send>(days: &[DailyAggregate], out: W) -> Result<(), ExportError> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Utf8, false),
        Field::new("mean_temperature", DataType::Float64, false),
    ]));

    let dates =
        StringArray::from_iter_values(days.iter().map(|d| d.date.format("%Y-%m-%d").to_string()));
    let temps: Float64Array = days.iter().map(|d| d.mean_temperature).collect();

    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(dates), Arc::new(temps)])?;

    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(out, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn days() -> Vec<DailyAggregate> {
        vec![
            DailyAggregate {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                mean_temperature: -4.25,
            },
            DailyAggregate {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                mean_temperature: 1.0 / 3.0,
            },
        ]
    }

    #[test]
    fn csv_keeps_full_precision() {
        let mut buf = Vec::new();
        write_csv(&days(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Daily avg temp (C)");
        assert_eq!(lines[1], "2024-01-01,-4.25");
        assert_eq!(lines[2], format!("2024-01-03,{}", 1.0f64 / 3.0));
    }

    #[test]
    fn json_uses_iso_dates() {
        let mut buf = Vec::new();
        write_json(&days(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["date"], "2024-01-01");
        assert_eq!(value[0]["mean_temperature"], -4.25);
    }

    #[test]
    fn parquet_round_trips_row_count() {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let tmp = tempfile::NamedTempFile::with_suffix(".parquet").unwrap();
        export_days(&days(), tmp.path()).unwrap();
        let reader = SerializedFileReader::new(File::open(tmp.path()).unwrap()).unwrap();
        assert_eq!(reader.metadata().file_metadata().num_rows(), 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_days(&days(), &dir.path().join("out.xlsx")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedExtension(ext) if ext == "xlsx"));
    }
}
