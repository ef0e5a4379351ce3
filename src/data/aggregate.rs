use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use log::debug;

use super::columns::resolve_columns;
use super::error::{FileError, ParseFailure};
use super::model::{DailyAggregate, DecimalConvention, FileAggregate, RawTable, RawValue};
use super::temperature::coerce_temperature;
use super::timestamp::Normalizer;

/// Running mean for one group. Stays finite for any finite inputs.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Mean {
    mean: f64,
    count: usize,
}

impl Mean {
    pub(crate) fn push(&mut self, v: f64) {
        self.count += 1;
        let n = self.count as f64;
        self.mean += v / n - self.mean / n;
    }

    pub(crate) fn value(&self) -> f64 {
        self.mean
    }
}

/// Collapse per-date accumulators into sorted aggregates.
pub(crate) fn finish(groups: BTreeMap<NaiveDate, Mean>) -> Vec<DailyAggregate> {
    groups
        .into_iter()
        .map(|(date, mean)| DailyAggregate {
            date,
            mean_temperature: mean.value(),
        })
        .collect()
}

/// Aggregate one file into per-date mean temperatures.
///
/// Columns are resolved once for the file; a missing column rejects the
/// whole file. Each row is then normalized in file order and dropped, with
/// its [`ParseFailure`] recorded, when either field fails. The timestamp is
/// checked first, so a row bad in both fields reports the timestamp.
pub fn aggregate_file(
    table: &RawTable,
    zone: Tz,
    decimal: DecimalConvention,
) -> Result<FileAggregate, FileError> {
    let cols = resolve_columns(&table.headers)?;

    let mut normalizer = Normalizer::new(zone);
    let mut groups: BTreeMap<NaiveDate, Mean> = BTreeMap::new();
    let mut dropped = Vec::new();

    for row in 0..table.len() {
        let date = match normalizer.normalize(table.cell(row, cols.time)) {
            Ok(local) => local.date(),
            Err(source) => {
                dropped.push(ParseFailure::Timestamp { row, source });
                continue;
            }
        };
        let raw = RawValue::from(table.cell(row, cols.temperature));
        match coerce_temperature(&raw, decimal) {
            Ok(t) => groups.entry(date).or_default().push(t),
            Err(source) => dropped.push(ParseFailure::Temperature { row, source }),
        }
    }

    debug!(
        "Aggregated {} rows into {} days ({} dropped)",
        table.len(),
        groups.len(),
        dropped.len()
    );

    Ok(FileAggregate {
        days: finish(groups),
        rows_read: table.len(),
        dropped,
        time_column: table.headers[cols.time].clone(),
        temperature_column: table.headers[cols.temperature].clone(),
    })
}
