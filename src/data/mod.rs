/// Data layer: loading, aggregation, combination and filtering.
///
/// Architecture:
/// ```text
///  one .csv per source (bytes + SourceFormat)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + split → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  columns → timestamp / temperature → FileAggregate
///   └───────────┘
///        │   (one per file, memoized by `cache`)
///        ▼
///   ┌──────────┐
///   │ combine   │  mean-of-means per date → DailySeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive [lo, hi] → FilterResult ──► export
///   └──────────┘
/// ```

pub mod aggregate;
pub mod columns;
pub mod combine;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod temperature;
pub mod timestamp;
