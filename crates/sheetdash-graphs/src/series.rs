//! Aggregated series: bucket-ordered values produced by the aggregator

use crate::granularity::{Bucket, Granularity};
use serde::{Deserialize, Serialize};

/// How values inside a bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Number of distinct identifier values per bucket
    DistinctCount,
    /// Arithmetic sum of a numeric metric per bucket
    Sum,
}

/// One bucket of an aggregated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub bucket: Bucket,
    pub value: f64,
    /// Records that contributed to `value`
    pub record_count: usize,
}

/// What happened to the input records during one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Records in the input set
    pub records_seen: usize,
    /// Records dropped because the timestamp was missing or unparseable
    pub missing_timestamps: usize,
    /// Records dropped because the value was blank or not a finite number,
    /// or would have pushed its bucket total past the `f64` range
    pub rejected_values: usize,
    /// Records that ended up in a bucket
    pub contributing: usize,
}

impl AggregationReport {
    /// Records left out of every bucket.
    pub fn excluded(&self) -> usize {
        self.missing_timestamps + self.rejected_values
    }
}

/// Bucket-ordered output of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    granularity: Granularity,
    mode: AggregationMode,
    value_field: String,
    points: Vec<SeriesPoint>,
    report: AggregationReport,
}

impl AggregatedSeries {
    /// Assemble a series; points are sorted by bucket.
    pub fn new(
        granularity: Granularity,
        mode: AggregationMode,
        value_field: impl Into<String>,
        mut points: Vec<SeriesPoint>,
        report: AggregationReport,
    ) -> Self {
        points.sort_by_key(|p| p.bucket);
        Self {
            granularity,
            mode,
            value_field: value_field.into(),
            points,
            report,
        }
    }

    /// A series with no buckets.
    pub fn empty(
        granularity: Granularity,
        mode: AggregationMode,
        value_field: impl Into<String>,
    ) -> Self {
        Self::new(
            granularity,
            mode,
            value_field,
            Vec::new(),
            AggregationReport::default(),
        )
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn value_field(&self) -> &str {
        &self.value_field
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn report(&self) -> &AggregationReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all bucket values.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Sum of the per-bucket record counts.
    pub fn contributing_records(&self) -> usize {
        self.points.iter().map(|p| p.record_count).sum()
    }

    /// Copy of the series with empty periods between the first and last
    /// bucket filled in as zero-value, zero-record points.
    pub fn zero_filled(&self) -> Self {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return self.clone();
        };

        let mut filled = Vec::with_capacity(self.points.len());
        let mut existing = self.points.iter().peekable();
        let mut cursor = Some(first.bucket);

        while let Some(bucket) = cursor.filter(|b| *b <= last.bucket) {
            match existing.peek() {
                Some(point) if point.bucket == bucket => {
                    filled.push((*point).clone());
                    existing.next();
                }
                _ => filled.push(SeriesPoint {
                    bucket,
                    value: 0.0,
                    record_count: 0,
                }),
            }
            cursor = bucket.next();
        }

        Self {
            points: filled,
            ..self.clone()
        }
    }
}
