use super::error::ColumnNotFound;

/// Indices of the two columns the aggregator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub time: usize,
    pub temperature: usize,
}

/// Locate the timestamp and temperature columns among `headers`.
///
/// Each role first looks for an exact case-insensitive name, then for the
/// first header (in column order) containing the role's keyword:
///
/// | role        | exact                         | fallback substring |
/// |-------------|-------------------------------|--------------------|
/// | time        | `time`                        | `time`             |
/// | temperature | `daily average temperature`   | `temperature`      |
pub fn resolve_columns<S: AsRef<str>>(headers: &[S]) -> Result<ResolvedColumns, ColumnNotFound> {
    let time = find_column(headers, "time", "time").ok_or(ColumnNotFound("time"))?;
    let temperature = find_column(headers, "daily average temperature", "temperature")
        .ok_or(ColumnNotFound("temperature"))?;
    Ok(ResolvedColumns { time, temperature })
}

fn find_column<S: AsRef<str>>(headers: &[S], exact: &str, keyword: &str) -> Option<usize> {
    let lowered: Vec<String> = headers
        .iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .collect();

    lowered
        .iter()
        .position(|h| h == exact)
        .or_else(|| lowered.iter().position(|h| h.contains(keyword)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_export_headers() {
        let headers = [
            "Time",
            "Consumption (net) kWh",
            "Production (net) kWh",
            "Daily average temperature",
        ];
        let cols = resolve_columns(&headers).unwrap();
        assert_eq!(cols, ResolvedColumns { time: 0, temperature: 3 });
    }

    #[test]
    fn exact_match_beats_earlier_substring_match() {
        let headers = ["Timestamp", "TIME", "Temperature min", "daily average TEMPERATURE"];
        let cols = resolve_columns(&headers).unwrap();
        assert_eq!(cols.time, 1);
        assert_eq!(cols.temperature, 3);
    }

    #[test]
    fn first_substring_match_wins() {
        let headers = ["Time period", "Start time", "Air temperature", "Temperature"];
        let cols = resolve_columns(&headers).unwrap();
        assert_eq!(cols.time, 0);
        assert_eq!(cols.temperature, 2);
    }

    #[test]
    fn missing_roles_are_named() {
        assert_eq!(
            resolve_columns(&["Date", "Temperature"]),
            Err(ColumnNotFound("time"))
        );
        assert_eq!(
            resolve_columns(&["Time", "Consumption"]),
            Err(ColumnNotFound("temperature"))
        );
    }
}
