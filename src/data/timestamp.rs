use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use super::error::TimestampError;

/// Zone used by the viewer unless configured otherwise.
pub const DEFAULT_REFERENCE_ZONE: Tz = chrono_tz::Europe::Helsinki;

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A timestamp as written in the source, before localization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// Carried an explicit UTC offset (or `Z`).
    Absolute(DateTime<FixedOffset>),
    /// Wall-clock time with no zone information.
    Naive(NaiveDateTime),
}

/// Parse timestamp text, trying offset-bearing forms before naive ones.
pub fn parse_timestamp(text: &str) -> Result<ParsedTimestamp, TimestampError> {
    let s = text.trim();
    if s.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedTimestamp::Absolute(dt));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(ParsedTimestamp::Absolute(dt));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ParsedTimestamp::Naive(dt));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(ParsedTimestamp::Naive(d.and_time(chrono::NaiveTime::MIN)));
    }

    Err(TimestampError::Unrecognised(s.to_string()))
}

// ---------------------------------------------------------------------------
// Localization
// ---------------------------------------------------------------------------

/// Which branch of the localization decision table produced an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Explicit offset, converted into the reference zone.
    Converted,
    /// Naive time with exactly one mapping.
    Unique,
    /// Fall-back overlap, first occurrence chosen.
    OverlapEarlier,
    /// Fall-back overlap, second occurrence chosen because the first is not
    /// after the previous record.
    OverlapLater,
    /// Spring-forward gap, moved to the first instant after the gap.
    GapShiftedForward,
}

/// An instant in the reference zone plus how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizedTimestamp {
    pub instant: DateTime<Tz>,
    pub resolution: Resolution,
}

impl LocalizedTimestamp {
    pub fn date(&self) -> NaiveDate {
        self.instant.date_naive()
    }
}

/// Place a naive wall-clock time in `zone`.
///
/// * unique mapping: that instant
/// * overlap, no `previous`: the earlier occurrence
/// * overlap with `previous`: the earliest occurrence strictly after
///   `previous`, else the earlier occurrence
/// * gap: the first valid instant after the gap
pub fn localize_naive(
    zone: Tz,
    naive: NaiveDateTime,
    previous: Option<DateTime<Utc>>,
) -> Result<LocalizedTimestamp, TimestampError> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Ok(LocalizedTimestamp {
            instant,
            resolution: Resolution::Unique,
        }),
        LocalResult::Ambiguous(earlier, later) => {
            let pick_later = previous
                .is_some_and(|p| earlier.with_timezone(&Utc) <= p && later.with_timezone(&Utc) > p);
            Ok(if pick_later {
                LocalizedTimestamp {
                    instant: later,
                    resolution: Resolution::OverlapLater,
                }
            } else {
                LocalizedTimestamp {
                    instant: earlier,
                    resolution: Resolution::OverlapEarlier,
                }
            })
        }
        LocalResult::None => gap_end(zone, naive)
            .map(|instant| LocalizedTimestamp {
                instant,
                resolution: Resolution::GapShiftedForward,
            })
            .ok_or_else(|| TimestampError::Unrepresentable(naive.to_string())),
    }
}

/// First instant after the spring-forward gap that swallows `naive`.
fn gap_end(zone: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    let offset_at =
        |utc: NaiveDateTime| -> FixedOffset { zone.offset_from_utc_datetime(&utc).fix() };

    let before = offset_at(naive.checked_sub_signed(Duration::days(1))?);
    // `naive` read with the pre-gap offset lands at or after the transition.
    let upper =
        naive.checked_sub_signed(Duration::seconds(i64::from(before.local_minus_utc())))?;
    let after = offset_at(upper);
    let gap = i64::from(after.local_minus_utc()) - i64::from(before.local_minus_utc());
    if gap <= 0 {
        return None;
    }

    // offset_at(lo) == before, offset_at(hi) == after
    let mut hi = upper.and_utc().timestamp();
    let mut lo = hi - gap;
    if offset_at(DateTime::from_timestamp(lo, 0)?.naive_utc()) != before {
        return None;
    }
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if offset_at(DateTime::from_timestamp(mid, 0)?.naive_utc()) == after {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    DateTime::from_timestamp(hi, 0).map(|utc| utc.with_timezone(&zone))
}

/// Converts one file's timestamps to reference-zone dates, carrying the
/// previous resolved instant so fall-back overlaps follow file order.
#[derive(Debug, Clone)]
pub struct Normalizer {
    zone: Tz,
    previous: Option<DateTime<Utc>>,
}

impl Normalizer {
    pub fn new(zone: Tz) -> Self {
        Normalizer {
            zone,
            previous: None,
        }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Normalize one timestamp. Failures leave the context untouched.
    pub fn normalize(&mut self, text: &str) -> Result<LocalizedTimestamp, TimestampError> {
        let localized = match parse_timestamp(text)? {
            ParsedTimestamp::Absolute(dt) => LocalizedTimestamp {
                instant: dt.with_timezone(&self.zone),
                resolution: Resolution::Converted,
            },
            ParsedTimestamp::Naive(naive) => localize_naive(self.zone, naive, self.previous)?,
        };
        self.previous = Some(localized.instant.with_timezone(&Utc));
        Ok(localized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parses_energy_export_offsets() {
        let parsed = parse_timestamp("2025-01-01T00:00:00.000+02:00").unwrap();
        assert!(matches!(parsed, ParsedTimestamp::Absolute(_)));

        for text in [
            "2025-01-01T00:00:00Z",
            "2025-01-01 00:00:00+0200",
            "2025-01-01 00:00+02:00",
        ] {
            assert!(
                matches!(parse_timestamp(text), Ok(ParsedTimestamp::Absolute(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn parses_naive_forms() {
        for text in [
            "2025-01-01T06:00:00",
            "2025-01-01 06:00:00.000",
            "2025-01-01 06:00",
            " 2025-01-01T06:00 ",
        ] {
            assert_eq!(
                parse_timestamp(text),
                Ok(ParsedTimestamp::Naive(naive("2025-01-01 06:00:00"))),
                "{text}"
            );
        }
        assert_eq!(
            parse_timestamp("2025-01-01"),
            Ok(ParsedTimestamp::Naive(naive("2025-01-01 00:00:00")))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("   "), Err(TimestampError::Empty));
        assert_eq!(
            parse_timestamp("1.1. 00:00:00"),
            Err(TimestampError::Unrecognised("1.1. 00:00:00".to_string()))
        );
    }

    #[test]
    fn offsets_are_converted_to_the_reference_date() {
        let mut n = Normalizer::new(DEFAULT_REFERENCE_ZONE);
        // 23:30 UTC on new year's eve is already 01:30 in Helsinki.
        let local = n.normalize("2024-12-31T23:30:00Z").unwrap();
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(local.resolution, Resolution::Converted);

        let local = n.normalize("2025-01-01T00:00:00.000+02:00").unwrap();
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn naive_times_are_taken_as_reference_wall_clock() {
        let mut n = Normalizer::new(DEFAULT_REFERENCE_ZONE);
        let local = n.normalize("2024-01-01 23:30:00").unwrap();
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(local.instant.with_timezone(&Utc), utc("2024-01-01T21:30:00Z"));
        assert_eq!(local.resolution, Resolution::Unique);
    }

    #[test]
    fn spring_forward_gap_shifts_to_end_of_gap() {
        // Helsinki jumps from 03:00 EET to 04:00 EEST on 2024-03-31.
        let local =
            localize_naive(DEFAULT_REFERENCE_ZONE, naive("2024-03-31 03:30:00"), None).unwrap();
        assert_eq!(local.resolution, Resolution::GapShiftedForward);
        assert_eq!(local.instant.with_timezone(&Utc), utc("2024-03-31T01:00:00Z"));
        assert_eq!(local.instant.to_rfc3339(), "2024-03-31T04:00:00+03:00");
    }

    #[test]
    fn fall_back_overlap_without_context_takes_earlier() {
        // 03:00-03:59 happens twice in Helsinki on 2024-10-27.
        let local =
            localize_naive(DEFAULT_REFERENCE_ZONE, naive("2024-10-27 03:30:00"), None).unwrap();
        assert_eq!(local.resolution, Resolution::OverlapEarlier);
        assert_eq!(local.instant.with_timezone(&Utc), utc("2024-10-27T00:30:00Z"));
    }

    #[test]
    fn fall_back_overlap_follows_record_order() {
        let mut n = Normalizer::new(DEFAULT_REFERENCE_ZONE);
        let instants: Vec<_> = [
            "2024-10-27 02:00:00",
            "2024-10-27 03:00:00",
            "2024-10-27 03:00:00",
            "2024-10-27 04:00:00",
        ]
        .iter()
        .map(|t| n.normalize(t).unwrap())
        .collect();

        let as_utc: Vec<_> = instants.iter().map(|l| l.instant.with_timezone(&Utc)).collect();
        assert_eq!(
            as_utc,
            vec![
                utc("2024-10-26T23:00:00Z"),
                utc("2024-10-27T00:00:00Z"),
                utc("2024-10-27T01:00:00Z"),
                utc("2024-10-27T02:00:00Z"),
            ]
        );
        assert_eq!(instants[1].resolution, Resolution::OverlapEarlier);
        assert_eq!(instants[2].resolution, Resolution::OverlapLater);
    }

    #[test]
    fn failed_record_does_not_disturb_context() {
        let mut n = Normalizer::new(DEFAULT_REFERENCE_ZONE);
        n.normalize("2024-10-27 03:00:00").unwrap();
        assert!(n.normalize("not a time").is_err());
        let second = n.normalize("2024-10-27 03:00:00").unwrap();
        assert_eq!(second.resolution, Resolution::OverlapLater);
    }

    #[test]
    fn offset_record_sets_context_for_next_overlap() {
        let mut n = Normalizer::new(DEFAULT_REFERENCE_ZONE);
        // 03:30+03:00 is the first pass through 03:30 on 2024-10-27.
        let first = n.normalize("2024-10-27T03:30:00+03:00").unwrap();
        assert_eq!(first.resolution, Resolution::Converted);

        let second = n.normalize("2024-10-27 03:30:00").unwrap();
        assert_eq!(second.resolution, Resolution::OverlapLater);
        assert_eq!(second.instant.with_timezone(&Utc), utc("2024-10-27T01:30:00Z"));
    }

    #[test]
    fn times_at_the_edge_of_the_calendar_are_unrepresentable() {
        let mut n = Normalizer::new(DEFAULT_REFERENCE_ZONE);
        assert!(matches!(
            n.normalize("-262143-01-01 00:00"),
            Err(TimestampError::Unrepresentable(_))
        ));
        let local = n.normalize("2024-01-01 12:00").unwrap();
        assert_eq!(local.resolution, Resolution::Unique);
    }
}
