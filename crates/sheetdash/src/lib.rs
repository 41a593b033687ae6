//! # sheetdash
//!
//! Host side of the dashboard: looks a client up, fetches their response
//! sheet and turns it into the active customers and total sales charts.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod dashboard;
pub mod output;

pub use dashboard::{ChartPanel, ChartPeriods, Dashboard, DashboardView};
pub use output::{write_view, OutputTarget};
