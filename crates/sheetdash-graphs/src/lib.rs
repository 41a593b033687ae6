//! # sheetdash graphs
//!
//! Period aggregation of response-sheet records and bar chart output:
//! calendar buckets, the aggregator, display-agnostic chart descriptions
//! and a plotters bitmap renderer.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod chart;
pub mod granularity;
pub mod renderer;
pub mod series;
pub mod timestamp;
pub mod types;

pub use aggregator::{
    PeriodAggregator, DEFAULT_CUSTOMER_FIELD, DEFAULT_SALES_FIELD, DEFAULT_TIMESTAMP_FIELD,
};
pub use chart::{Bar, BarChart, ChartLabels, ChartRenderer};
pub use granularity::{Bucket, Granularity, ParseGranularityError};
pub use renderer::BitmapRenderer;
pub use series::{AggregatedSeries, AggregationMode, AggregationReport, SeriesPoint};
pub use timestamp::parse_timestamp;
pub use types::*;
