use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use temp_range_finder::cache::AggregateCache;
use temp_range_finder::config::ViewerConfig;
use temp_range_finder::data::error::{ExportError, FileError};
use temp_range_finder::data::export::export_days;
use temp_range_finder::data::filter::{RangeBounds, filter_range};
use temp_range_finder::data::loader::read_source;
use temp_range_finder::data::model::{DailySeries, FilterResult, SourceFormat};
use temp_range_finder::data::pipeline::{PipelineRun, Source, run_pipeline};

use crate::color::SourceColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A file that could not even be read from disk.
#[derive(Debug, Clone)]
pub struct UnreadableFile {
    pub name: String,
    pub error: FileError,
}

/// Headline numbers shown above the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub days_matched: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub selection: (f64, f64),
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Format assigned to files opened next.
    pub import_format: SourceFormat,

    /// Files in the current session, in the order they were opened.
    pub sources: Vec<Source>,

    /// Files whose bytes could not be read.
    pub unreadable: Vec<UnreadableFile>,

    /// Memoized per-file aggregates for this session.
    pub cache: AggregateCache,

    /// Latest pipeline pass (None until files are opened).
    pub run: Option<PipelineRun>,

    /// Slider limits for the current series.
    pub bounds: Option<RangeBounds>,

    /// Selected (lo, hi) range in °C.
    pub selection: (f64, f64),

    /// Days of the series inside `selection` (cached).
    pub result: Option<FilterResult>,

    /// Chart colour per source.
    pub colors: SourceColors,

    /// Overlay each source's own daily series on the chart.
    pub show_source_series: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            import_format: config.default_format,
            show_source_series: config.show_source_series,
            config,
            sources: Vec::new(),
            unreadable: Vec::new(),
            cache: AggregateCache::new(),
            run: None,
            bounds: None,
            selection: (0.0, 0.0),
            result: None,
            colors: SourceColors::default(),
            status_message: None,
        }
    }

    /// The combined series, when the last run produced one.
    pub fn series(&self) -> Option<&DailySeries> {
        self.run.as_ref().and_then(|run| run.series.as_ref().ok())
    }

    /// Start a new session with `paths`. Cached aggregates are discarded.
    pub fn open_files(&mut self, paths: &[PathBuf]) {
        self.cache.clear();
        self.sources.clear();
        self.unreadable.clear();
        self.bounds = None;
        self.add_files(paths);
    }

    /// Append `paths` to the current session.
    pub fn add_files(&mut self, paths: &[PathBuf]) {
        for path in paths {
            let name = display_name(path);
            match read_source(path) {
                Ok(bytes) => self.sources.push(Source::new(name, bytes, self.import_format)),
                Err(error) => {
                    log::error!("Failed to read {}: {error}", path.display());
                    self.unreadable.push(UnreadableFile { name, error });
                }
            }
        }
        self.recompute();
    }

    /// Append a source whose bytes are already in memory.
    pub fn add_source(&mut self, source: Source) {
        self.sources.push(source);
        self.recompute();
    }

    pub fn remove_source(&mut self, index: usize) {
        if index < self.sources.len() {
            let removed = self.sources.remove(index);
            log::info!("Removed source '{}'", removed.name);
            self.recompute();
        }
    }

    pub fn set_source_format(&mut self, index: usize, format: SourceFormat) {
        if let Some(src) = self.sources.get_mut(index) {
            if src.format != format {
                src.format = format;
                self.recompute();
            }
        }
    }

    /// Re-run the pipeline over all sources and refresh bounds + result.
    pub fn recompute(&mut self) {
        if self.sources.is_empty() {
            self.run = None;
            self.bounds = None;
            self.result = None;
            self.status_message = self.unreadable_message();
            return;
        }

        let run = run_pipeline(&self.sources, self.config.reference_zone, &mut self.cache);
        self.colors = SourceColors::new(self.sources.iter().map(|s| s.name.as_str()));

        match &run.series {
            Ok(series) => {
                let bounds = RangeBounds::from_series(series, self.config.slider_padding);
                self.selection = match self.bounds {
                    Some(_) => bounds.clamp(self.selection),
                    None => bounds.initial,
                };
                self.bounds = Some(bounds);
                self.status_message = self.unreadable_message();
            }
            Err(e) => {
                self.bounds = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.run = Some(run);
        self.refilter();
    }

    /// Set the selected range and recompute the result.
    pub fn set_selection(&mut self, lo: f64, hi: f64) {
        self.selection = (lo, hi);
        self.refilter();
    }

    /// Recompute `result` after a selection change.
    pub fn refilter(&mut self) {
        let (lo, hi) = self.selection;
        self.result = self.series().map(|s| filter_range(s, lo, hi));
    }

    pub fn summary(&self) -> Option<Summary> {
        let series = self.series()?;
        Some(Summary {
            days_matched: self.result.as_ref().map_or(0, FilterResult::len),
            first_date: series.first_date(),
            last_date: series.last_date(),
            selection: self.selection,
        })
    }

    /// Write the current result to `path`.
    pub fn export(&self, path: &Path) -> Result<usize, ExportError> {
        let days = self.result.as_ref().map_or(&[][..], |r| r.days.as_slice());
        export_days(days, path)?;
        log::info!("Exported {} days to {}", days.len(), path.display());
        Ok(days.len())
    }

    fn unreadable_message(&self) -> Option<String> {
        match self.unreadable.as_slice() {
            [] => None,
            [one] => Some(format!("Could not read '{}': {}", one.name, one.error)),
            many => Some(format!("{} files could not be read", many.len())),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `12345` → `12,345`
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
