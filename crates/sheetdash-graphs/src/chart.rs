//! Bar chart descriptions built from aggregated series

use crate::granularity::Granularity;
use crate::series::AggregatedSeries;
use serde::{Deserialize, Serialize};
use sheetdash_common::Result;

/// Text shown around a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub series_name: String,
}

impl ChartLabels {
    pub fn new(
        title: impl Into<String>,
        x_axis_label: impl Into<String>,
        y_axis_label: impl Into<String>,
        series_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_axis_label: x_axis_label.into(),
            y_axis_label: y_axis_label.into(),
            series_name: series_name.into(),
        }
    }

    /// "Active Customers (Month on Month)" and friends.
    pub fn active_customers(granularity: Granularity) -> Self {
        Self::new(
            format!("Active Customers ({})", granularity.selector_label()),
            "Period",
            "Number of Active Customers",
            "Active Customers",
        )
    }

    /// "Total Sales (Week on Week)" and friends.
    pub fn total_sales(granularity: Granularity) -> Self {
        Self::new(
            format!("Total Sales ({})", granularity.selector_label()),
            "Period",
            "Total Sales",
            "Total Sales",
        )
    }
}

/// One bar: a bucket label and its height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Display-agnostic description of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub series_name: String,
    pub granularity: Granularity,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Tallest bar, or `None` for an empty chart.
    pub fn max_value(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.value).reduce(f64::max)
    }

    /// Lowest bar, or `None` for an empty chart.
    pub fn min_value(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.value).reduce(f64::min)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Maps aggregated series onto bar chart descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer;

impl ChartRenderer {
    pub fn new() -> Self {
        Self
    }

    /// One bar per emitted bucket, in bucket order.
    pub fn describe(&self, series: &AggregatedSeries, labels: &ChartLabels) -> BarChart {
        let bars = series
            .points()
            .iter()
            .map(|point| Bar {
                label: point.bucket.label(),
                value: point.value,
            })
            .collect();

        BarChart {
            title: labels.title.clone(),
            x_axis_label: labels.x_axis_label.clone(),
            y_axis_label: labels.y_axis_label.clone(),
            series_name: labels.series_name.clone(),
            granularity: series.granularity(),
            bars,
        }
    }
}
