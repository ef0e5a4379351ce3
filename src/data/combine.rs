use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::aggregate::{Mean, finish};
use super::error::SeriesError;
use super::model::{DailyAggregate, DailySeries};

/// Merge per-file aggregates into one series.
///
/// A date present in several inputs gets the plain mean of those inputs'
/// daily means; files with more rows for that date carry no extra weight.
/// An empty union is [`SeriesError::EmptyCombinedSeries`].
pub fn combine<I, A>(per_file: I) -> Result<DailySeries, SeriesError>
where
    I: IntoIterator<Item = A>,
    A: AsRef<[DailyAggregate]>,
{
    let mut groups: BTreeMap<NaiveDate, Mean> = BTreeMap::new();
    for days in per_file {
        for day in days.as_ref() {
            groups.entry(day.date).or_default().push(day.mean_temperature);
        }
    }
    DailySeries::from_sorted(finish(groups)).ok_or(SeriesError::EmptyCombinedSeries)
}
