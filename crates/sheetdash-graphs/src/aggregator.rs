//! Period aggregation of spreadsheet records into bucketed series

use crate::granularity::{Bucket, Granularity};
use crate::series::{AggregatedSeries, AggregationMode, AggregationReport, SeriesPoint};
use crate::timestamp::parse_timestamp;
use sheetdash_common::{RecordSet, Result};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument, warn};

/// Column holding the form submission time
pub const DEFAULT_TIMESTAMP_FIELD: &str = "timestamp";
/// Column identifying a customer
pub const DEFAULT_CUSTOMER_FIELD: &str = "customer_mobile_number";
/// Column holding the sale amount
pub const DEFAULT_SALES_FIELD: &str = "total_sales";

/// Groups records into calendar buckets and reduces each bucket to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodAggregator {
    timestamp_field: String,
    value_field: String,
    granularity: Granularity,
    mode: AggregationMode,
}

/// Running state for one bucket
#[derive(Debug, Default)]
struct BucketAccumulator {
    distinct: HashSet<String>,
    sum: f64,
    records: usize,
}

impl BucketAccumulator {
    fn value(&self, mode: AggregationMode) -> f64 {
        match mode {
            AggregationMode::DistinctCount => self.distinct.len() as f64,
            AggregationMode::Sum => self.sum,
        }
    }
}

impl PeriodAggregator {
    pub fn new(
        timestamp_field: impl Into<String>,
        value_field: impl Into<String>,
        granularity: Granularity,
        mode: AggregationMode,
    ) -> Self {
        Self {
            timestamp_field: timestamp_field.into(),
            value_field: value_field.into(),
            granularity,
            mode,
        }
    }

    /// Count distinct values of `value_field` per bucket.
    pub fn distinct_count(
        timestamp_field: impl Into<String>,
        value_field: impl Into<String>,
        granularity: Granularity,
    ) -> Self {
        Self::new(timestamp_field, value_field, granularity, AggregationMode::DistinctCount)
    }

    /// Sum the numeric `value_field` per bucket.
    pub fn sum(
        timestamp_field: impl Into<String>,
        value_field: impl Into<String>,
        granularity: Granularity,
    ) -> Self {
        Self::new(timestamp_field, value_field, granularity, AggregationMode::Sum)
    }

    /// Distinct customers per period.
    pub fn active_customers(granularity: Granularity) -> Self {
        Self::distinct_count(DEFAULT_TIMESTAMP_FIELD, DEFAULT_CUSTOMER_FIELD, granularity)
    }

    /// Sales total per period.
    pub fn total_sales(granularity: Granularity) -> Self {
        Self::sum(DEFAULT_TIMESTAMP_FIELD, DEFAULT_SALES_FIELD, granularity)
    }

    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    pub fn value_field(&self) -> &str {
        &self.value_field
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// Aggregate `records` into a bucket-ordered series.
    ///
    /// Only a missing column fails. Records with an unparseable timestamp
    /// or an unusable value are left out and counted in the report.
    #[instrument(skip(self, records), fields(
        granularity = %self.granularity,
        mode = ?self.mode,
        value_field = %self.value_field,
        records = records.len()
    ))]
    pub fn aggregate(&self, records: &RecordSet) -> Result<AggregatedSeries> {
        let ts_index = records.column_index(&self.timestamp_field)?;
        let value_index = records.column_index(&self.value_field)?;

        if records.is_empty() {
            debug!("No records to aggregate");
            return Ok(AggregatedSeries::empty(
                self.granularity,
                self.mode,
                self.value_field.clone(),
            ));
        }

        let mut buckets: BTreeMap<Bucket, BucketAccumulator> = BTreeMap::new();
        let mut report = AggregationReport {
            records_seen: records.len(),
            ..AggregationReport::default()
        };

        for record in records.records() {
            let Some(timestamp) = record.get(ts_index).and_then(parse_timestamp) else {
                report.missing_timestamps += 1;
                continue;
            };
            let raw_value = record.get(value_index).unwrap_or_default().trim();
            let bucket = self.granularity.bucket(timestamp);

            match self.mode {
                AggregationMode::DistinctCount => {
                    if raw_value.is_empty() {
                        report.rejected_values += 1;
                        continue;
                    }
                    let acc = buckets.entry(bucket).or_default();
                    acc.distinct.insert(raw_value.to_string());
                    acc.records += 1;
                }
                AggregationMode::Sum => {
                    let Some(amount) = parse_metric(raw_value) else {
                        report.rejected_values += 1;
                        continue;
                    };
                    let acc = buckets.entry(bucket).or_default();
                    // A total past the f64 range has no usable value
                    let total = acc.sum + amount;
                    if !total.is_finite() {
                        report.rejected_values += 1;
                        continue;
                    }
                    acc.sum = total;
                    acc.records += 1;
                }
            }
            report.contributing += 1;
        }

        let points: Vec<SeriesPoint> = buckets
            .into_iter()
            .map(|(bucket, acc)| SeriesPoint {
                bucket,
                value: acc.value(self.mode),
                record_count: acc.records,
            })
            .collect();

        debug!(
            buckets = points.len(),
            contributing = report.contributing,
            missing_timestamps = report.missing_timestamps,
            rejected_values = report.rejected_values,
            "Aggregation complete"
        );
        if report.excluded() > 0 {
            warn!(
                excluded = report.excluded(),
                missing_timestamps = report.missing_timestamps,
                rejected_values = report.rejected_values,
                "Some records were left out of the series"
            );
        }

        Ok(AggregatedSeries::new(
            self.granularity,
            self.mode,
            self.value_field.clone(),
            points,
            report,
        ))
    }
}

/// Finite number from a trimmed cell, or `None` for blank and junk values.
fn parse_metric(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
