use std::borrow::Cow;
use std::path::Path;

use super::error::FileError;
use super::model::{RawTable, SourceFormat};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a whole CSV file from disk.
pub fn read_source(path: &Path) -> Result<Vec<u8>, FileError> {
    std::fs::read(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a delimited text file into a [`RawTable`].
pub fn load_csv(path: &Path, format: SourceFormat) -> Result<RawTable, FileError> {
    let bytes = read_source(path)?;
    parse_csv_bytes(&bytes, format)
}

/// Parse delimited text already in memory.
///
/// CSV layout: first row is the header, every other row is a record.
/// Rows may be shorter or longer than the header; missing cells read as
/// empty text.
pub fn parse_csv_bytes(bytes: &[u8], format: SourceFormat) -> Result<RawTable, FileError> {
    let text = decode_text(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter.as_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(FileError::NoHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers.iter(), rows))
}

// ---------------------------------------------------------------------------
// Text decoding
// ---------------------------------------------------------------------------

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// UTF-8 (byte order mark stripped) when valid, Latin-1 otherwise.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            log::debug!("Input is not UTF-8, decoding as Latin-1");
            Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENERGY_CSV: &str = "Time; Consumption (net) kWh; Production (net) kWh; \
        Daily average temperature\n\
        2025-01-01T00:00:00.000+02:00;1,569;0,000;-4,7\n\
        2025-01-01T01:00:00.000+02:00;1,879;0,000;-4,8\n";

    #[test]
    fn reads_semicolon_export() {
        let table = parse_csv_bytes(ENERGY_CSV.as_bytes(), SourceFormat::EUROPEAN).unwrap();
        assert_eq!(
            table.headers,
            vec![
                "Time",
                "Consumption (net) kWh",
                "Production (net) kWh",
                "Daily average temperature"
            ]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 3), "-4,8");
    }

    #[test]
    fn strips_byte_order_mark() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"Time,Temperature\n2025-01-01 00:00,1.5\n");
        let table = parse_csv_bytes(&bytes, SourceFormat::INTERNATIONAL).unwrap();
        assert_eq!(table.headers[0], "Time");
    }

    #[test]
    fn falls_back_to_latin1() {
        // "Lämpötila temperature" with Latin-1 umlauts.
        let bytes = b"Time;L\xE4mp\xF6tila temperature\n2025-01-01 00:00;1,5\n";
        let table = parse_csv_bytes(bytes, SourceFormat::EUROPEAN).unwrap();
        assert_eq!(table.headers[1], "Lämpötila temperature");
    }

    #[test]
    fn short_rows_are_tolerated() {
        let table =
            parse_csv_bytes(b"Time;Temperature\n2025-01-01 00:00\n", SourceFormat::EUROPEAN)
                .unwrap();
        assert_eq!(table.cell(0, 1), "");
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(
            parse_csv_bytes(b"", SourceFormat::EUROPEAN),
            Err(FileError::NoHeader)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err =
            load_csv(Path::new("/definitely/not/here.csv"), SourceFormat::EUROPEAN).unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }
}
