use std::sync::Arc;

use chrono_tz::Tz;
use log::{info, warn};

use crate::cache::AggregateCache;

use super::combine::combine;
use super::error::{FileError, SeriesError};
use super::model::{DailySeries, FileAggregate, SourceFormat};

/// One input file held in memory.
#[derive(Debug, Clone)]
pub struct Source {
    /// Display name, usually the file name.
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub format: SourceFormat,
}

impl Source {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>, format: SourceFormat) -> Self {
        Source {
            name: name.into(),
            bytes: bytes.into(),
            format,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Ok,
    /// Parsed, but no record survived.
    Empty,
    /// Rejected as a whole.
    Failed,
}

/// Outcome for one source of a run.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub name: String,
    pub format: SourceFormat,
    pub outcome: Result<FileAggregate, FileError>,
}

impl FileReport {
    pub fn status(&self) -> FileStatus {
        match &self.outcome {
            Ok(agg) if agg.is_empty() => FileStatus::Empty,
            Ok(_) => FileStatus::Ok,
            Err(_) => FileStatus::Failed,
        }
    }

    /// One-line description for status lists.
    pub fn summary(&self) -> String {
        match &self.outcome {
            Ok(agg) if agg.is_empty() => {
                format!("no usable rows ({} read, all dropped)", agg.rows_read)
            }
            Ok(agg) => format!(
                "{} days from {} rows ({} dropped)",
                agg.days.len(),
                agg.rows_read,
                agg.dropped.len()
            ),
            Err(e) => format!("skipped: {e}"),
        }
    }
}

/// Everything one pass over the sources produced.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub reports: Vec<FileReport>,
    pub series: Result<DailySeries, SeriesError>,
}

/// Aggregate every source, tolerating per-file failures, then combine.
pub fn run_pipeline(sources: &[Source], zone: Tz, cache: &mut AggregateCache) -> PipelineRun {
    let reports: Vec<FileReport> = sources
        .iter()
        .map(|src| {
            let outcome = cache.get_or_aggregate(&src.bytes, zone, src.format);
            match &outcome {
                Ok(agg) if agg.is_empty() => {
                    warn!("File '{}' yielded no usable rows", src.name)
                }
                Ok(agg) => info!(
                    "File '{}': {} days from {} rows",
                    src.name,
                    agg.days.len(),
                    agg.rows_read
                ),
                Err(e) => warn!("Skipping file '{}': {e}", src.name),
            }
            FileReport {
                name: src.name.clone(),
                format: src.format,
                outcome,
            }
        })
        .collect();

    let series = combine(
        reports
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok())
            .map(|agg| agg.days.as_slice()),
    );
    if let Err(e) = &series {
        warn!("{e}");
    }

    PipelineRun { reports, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::timestamp::DEFAULT_REFERENCE_ZONE;

    #[test]
    fn failing_file_does_not_stop_siblings() {
        let good = Source::new(
            "good.csv",
            b"Time;Temperature\n2024-01-01 00:00;-5,0\n2024-01-01 01:00;-3,0\n".to_vec(),
            SourceFormat::EUROPEAN,
        );
        let bad = Source::new(
            "bad.csv",
            b"Date;Temperature\n2024-01-01;1,0\n".to_vec(),
            SourceFormat::EUROPEAN,
        );
        let mut cache = AggregateCache::new();

        let run = run_pipeline(&[bad, good], DEFAULT_REFERENCE_ZONE, &mut cache);
        assert_eq!(run.reports[0].status(), FileStatus::Failed);
        assert_eq!(run.reports[1].status(), FileStatus::Ok);
        let series = run.series.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.days()[0].mean_temperature, -4.0);
    }

    #[test]
    fn all_empty_is_terminal_state() {
        let empty = Source::new(
            "empty.csv",
            b"Time;Temperature\n2024-01-01 00:00;N/A\n".to_vec(),
            SourceFormat::EUROPEAN,
        );
        let mut cache = AggregateCache::new();
        let run = run_pipeline(&[empty], DEFAULT_REFERENCE_ZONE, &mut cache);
        assert_eq!(run.reports[0].status(), FileStatus::Empty);
        assert_eq!(run.series, Err(SeriesError::EmptyCombinedSeries));
    }

    #[test]
    fn rerun_uses_cache() {
        let src = Source::new(
            "a.csv",
            b"Time;Temperature\n2024-01-01 00:00;1,0\n".to_vec(),
            SourceFormat::EUROPEAN,
        );
        let mut cache = AggregateCache::new();
        run_pipeline(std::slice::from_ref(&src), DEFAULT_REFERENCE_ZONE, &mut cache);
        run_pipeline(std::slice::from_ref(&src), DEFAULT_REFERENCE_ZONE, &mut cache);
        assert_eq!(cache.stats().hits, 1);
    }
}
