use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::data::model::SourceFormat;
use crate::data::timestamp::DEFAULT_REFERENCE_ZONE;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TEMP_RANGE_FINDER_CONFIG";

/// Looked up in the working directory when [`CONFIG_ENV`] is unset.
pub const CONFIG_FILE: &str = "temp-range-finder.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown time zone '{0}'")]
    UnknownZone(String),
    #[error("slider_step must be a positive finite number, got {0}")]
    InvalidStep(f64),
    #[error("slider_padding must be a finite number, got {0}")]
    InvalidPadding(f64),
}

/// Format preset names accepted in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatPreset {
    European,
    International,
}

impl From<FormatPreset> for SourceFormat {
    fn from(p: FormatPreset) -> Self {
        match p {
            FormatPreset::European => SourceFormat::EUROPEAN,
            FormatPreset::International => SourceFormat::INTERNATIONAL,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    reference_zone: String,
    default_format: FormatPreset,
    slider_step: f64,
    slider_padding: f64,
    show_source_series: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        RawConfig {
            reference_zone: DEFAULT_REFERENCE_ZONE.name().to_string(),
            default_format: FormatPreset::European,
            slider_step: 0.1,
            slider_padding: 0.5,
            show_source_series: false,
        }
    }
}

/// Viewer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Zone whose calendar decides which day a reading belongs to.
    pub reference_zone: Tz,
    /// Format given to newly opened files.
    pub default_format: SourceFormat,
    pub slider_step: f64,
    /// Extra room left on both sides of the data's temperature extent.
    pub slider_padding: f64,
    /// Overlay each source's own daily series on the chart.
    pub show_source_series: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            reference_zone: DEFAULT_REFERENCE_ZONE,
            default_format: SourceFormat::EUROPEAN,
            slider_step: 0.1,
            slider_padding: 0.5,
            show_source_series: false,
        }
    }
}

impl ViewerConfig {
    /// Load from `$TEMP_RANGE_FINDER_CONFIG`, else `./temp-range-finder.toml`.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let reference_zone = parse_zone(&raw.reference_zone)?;
        if !raw.slider_step.is_finite() || raw.slider_step <= 0.0 {
            return Err(ConfigError::InvalidStep(raw.slider_step));
        }
        if !raw.slider_padding.is_finite() {
            return Err(ConfigError::InvalidPadding(raw.slider_padding));
        }
        Ok(ViewerConfig {
            reference_zone,
            default_format: raw.default_format.into(),
            slider_step: raw.slider_step,
            slider_padding: raw.slider_padding.abs(),
            show_source_series: raw.show_source_series,
        })
    }
}

/// Resolve an IANA zone name such as `Europe/Helsinki`.
pub fn parse_zone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::UnknownZone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(ViewerConfig::from_toml_str("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let cfg = ViewerConfig::from_toml_str(
            r#"
            reference_zone = "Europe/Stockholm"
            default_format = "international"
            show_source_series = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.reference_zone, chrono_tz::Europe::Stockholm);
        assert_eq!(cfg.default_format, SourceFormat::INTERNATIONAL);
        assert!(cfg.show_source_series);
        assert_eq!(cfg.slider_step, 0.1);
    }

    #[test]
    fn unknown_zone_is_an_error() {
        let err = ViewerConfig::from_toml_str(r#"reference_zone = "Mars/Olympus""#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownZone(z) if z == "Mars/Olympus"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            ViewerConfig::from_toml_str("slider_step = 0.0"),
            Err(ConfigError::InvalidStep(_))
        ));
        assert!(matches!(
            ViewerConfig::from_toml_str("slider_step = inf"),
            Err(ConfigError::InvalidStep(_))
        ));
        assert!(matches!(
            ViewerConfig::from_toml_str("slider_padding = nan"),
            Err(ConfigError::InvalidPadding(_))
        ));
        assert_eq!(
            ViewerConfig::from_toml_str("slider_padding = -1.5").unwrap().slider_padding,
            1.5
        );
        assert!(matches!(
            ViewerConfig::from_toml_str("colour = \"red\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ViewerConfig::from_path(Path::new("/no/such/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
