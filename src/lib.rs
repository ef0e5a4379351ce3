pub mod cache;
pub mod config;
pub mod data;

pub use cache::AggregateCache;
pub use config::ViewerConfig;
pub use data::aggregate::aggregate_file;
pub use data::combine::combine;
pub use data::filter::filter_range;
