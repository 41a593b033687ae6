//! Integration tests for sheetdash-graphs crate.
//!
//! These walk records through aggregation and chart description the way
//! the dashboard does.

use sheetdash_common::test_utils::{example_records, form_responses, record_set};
use sheetdash_graphs::{
    AggregatedSeries, AggregationMode, BitmapRenderer, ChartLabels, ChartRenderer, GraphConfig,
    Granularity, PeriodAggregator,
};

fn bars(series: &AggregatedSeries, labels: &ChartLabels) -> Vec<(String, f64)> {
    ChartRenderer::new()
        .describe(series, labels)
        .bars
        .into_iter()
        .map(|bar| (bar.label, bar.value))
        .collect()
}

#[test]
fn test_monthly_active_customers_chart() {
    let series = PeriodAggregator::distinct_count("ts", "id", Granularity::Monthly)
        .aggregate(&example_records())
        .unwrap();
    assert_eq!(
        bars(&series, &ChartLabels::active_customers(Granularity::Monthly)),
        vec![("2024-03".to_string(), 2.0), ("2024-04".to_string(), 1.0)]
    );
}

#[test]
fn test_monthly_sales_chart() {
    let series = PeriodAggregator::sum("ts", "val", Granularity::Monthly)
        .aggregate(&example_records())
        .unwrap();
    assert_eq!(
        bars(&series, &ChartLabels::total_sales(Granularity::Monthly)),
        vec![("2024-03".to_string(), 30.0), ("2024-04".to_string(), 5.0)]
    );
}

#[test]
fn test_bad_timestamp_drops_one_record() {
    let clean = example_records();
    let dirty = record_set(
        &["id", "ts", "val"],
        &[
            &["A", "2024-03-01", "10"],
            &["B", "2024-03-15", "20"],
            &["A", "2024-04-02", "5"],
            &["C", "not-a-date", "7"],
        ],
    );
    let aggregator = PeriodAggregator::sum("ts", "val", Granularity::Monthly);
    let before = aggregator.aggregate(&clean).unwrap();
    let after = aggregator.aggregate(&dirty).unwrap();

    assert_eq!(after.report().records_seen, before.report().records_seen + 1);
    assert_eq!(after.report().contributing, before.report().contributing);
    assert_eq!(after.points(), before.points());
}

#[test]
fn test_empty_sheet_gives_empty_chart() {
    let records = record_set(&["timestamp", "customer_mobile_number", "total_sales"], &[]);
    let series = PeriodAggregator::active_customers(Granularity::Weekly)
        .aggregate(&records)
        .unwrap();
    let labels = ChartLabels::active_customers(Granularity::Weekly);
    let chart = ChartRenderer::new().describe(&series, &labels);
    assert!(series.is_empty());
    assert!(chart.bars.is_empty());
    assert_eq!(chart.title, "Active Customers (Week on Week)");
}

#[test]
fn test_two_charts_with_independent_granularity() {
    let records = form_responses();

    let customers = PeriodAggregator::active_customers(Granularity::Monthly)
        .aggregate(&records)
        .unwrap();
    let sales = PeriodAggregator::total_sales(Granularity::Weekly)
        .aggregate(&records)
        .unwrap();

    assert_eq!(customers.granularity(), Granularity::Monthly);
    assert_eq!(customers.mode(), AggregationMode::DistinctCount);
    assert_eq!(sales.granularity(), Granularity::Weekly);
    assert_eq!(
        bars(&sales, &ChartLabels::total_sales(Granularity::Weekly)),
        vec![
            ("2024-02-26/2024-03-03".to_string(), 200.5),
            ("2024-03-04/2024-03-10".to_string(), 200.0),
            ("2024-04-01/2024-04-07".to_string(), 60.0),
        ]
    );
}

#[test]
fn test_zero_filled_sales_chart() {
    let series = PeriodAggregator::total_sales(Granularity::Weekly)
        .aggregate(&form_responses())
        .unwrap()
        .zero_filled();
    let labels: Vec<String> = series.points().iter().map(|p| p.bucket.label()).collect();
    assert_eq!(labels.first().map(String::as_str), Some("2024-02-26/2024-03-03"));
    assert_eq!(labels.last().map(String::as_str), Some("2024-04-01/2024-04-07"));
    assert_eq!(labels.len(), 6);
    assert_eq!(series.total(), 460.5);
}

#[test]
fn test_renderer_from_deserialized_config() {
    let config: GraphConfig = serde_json::from_str(
        r##"{"width": 640, "height": 480, "style": {"bar_color": "#FF7F0E"}}"##,
    )
    .unwrap();
    let renderer = BitmapRenderer::new(config);
    assert_eq!(renderer.config().width, 640);
    assert_eq!(renderer.config().style.bar_color, "#FF7F0E");
    assert_eq!(renderer.config().style.background_color, "#FFFFFF");
}
