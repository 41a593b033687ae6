//! Dashboard orchestration: directory lookup, record fetch and the two
//! chart cycles.

use chrono::Utc;
use serde::Serialize;
use sheetdash_common::utils::format_timestamp;
use sheetdash_common::{
    ClientDirectory, ClientProfile, RecordSet, RecordSource, Result, SheetSource,
    SheetSourceConfig,
};
use sheetdash_config::{ColumnsConfig, Config};
use sheetdash_graphs::{
    AggregationReport, BarChart, ChartLabels, ChartRenderer, Granularity, PeriodAggregator,
};
use tracing::{debug, info, instrument};

/// Period selection for each chart; the two are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartPeriods {
    pub customers: Granularity,
    pub sales: Granularity,
}

impl Default for ChartPeriods {
    fn default() -> Self {
        Self {
            customers: Granularity::Monthly,
            sales: Granularity::Monthly,
        }
    }
}

/// One rendered chart with the bookkeeping of the aggregation behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub chart: BarChart,
    pub report: AggregationReport,
}

/// Everything the display surface needs for one client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub client: Option<ClientProfile>,
    /// Where the records came from
    pub source: String,
    pub generated_at: String,
    pub active_customers: ChartPanel,
    pub total_sales: ChartPanel,
}

impl DashboardView {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds dashboard views for clients in a directory.
pub struct Dashboard {
    directory: Box<dyn ClientDirectory>,
    columns: ColumnsConfig,
    fill_gaps: bool,
    source_config: SheetSourceConfig,
    renderer: ChartRenderer,
}

impl Dashboard {
    pub fn new(directory: impl ClientDirectory + 'static, config: &Config) -> Self {
        Self {
            directory: Box::new(directory),
            columns: config.columns.clone(),
            fill_gaps: config.charts.fill_gaps,
            source_config: config.source.to_source_config(),
            renderer: ChartRenderer::new(),
        }
    }

    /// Dashboard over the clients listed in the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.directory()?, config))
    }

    pub fn with_fill_gaps(mut self, fill_gaps: bool) -> Self {
        self.fill_gaps = fill_gaps;
        self
    }

    pub async fn client(&self, email: &str) -> Result<ClientProfile> {
        self.directory.client_for(email).await
    }

    /// Record source for a client's response sheet.
    pub fn source_for(&self, client: &ClientProfile) -> Result<SheetSource> {
        SheetSource::new(&client.response_sheet_link, self.source_config.clone())
    }

    /// Look the client up, fetch their sheet and build both charts.
    #[instrument(skip(self))]
    pub async fn view_for(&self, email: &str, periods: ChartPeriods) -> Result<DashboardView> {
        let client = self.client(email).await?;
        let source = self.source_for(&client)?;
        self.view_from_source(&source, Some(client), periods).await
    }

    /// Build both charts from any record source.
    pub async fn view_from_source(
        &self,
        source: &dyn RecordSource,
        client: Option<ClientProfile>,
        periods: ChartPeriods,
    ) -> Result<DashboardView> {
        let records = source.fetch().await?;
        let mut view = self.build_view(&records, periods)?;
        view.source = source.describe();
        view.client = client;
        Ok(view)
    }

    /// Both chart cycles over an already fetched record set.
    pub fn build_view(&self, records: &RecordSet, periods: ChartPeriods) -> Result<DashboardView> {
        let customers = PeriodAggregator::distinct_count(
            &self.columns.timestamp,
            &self.columns.customer,
            periods.customers,
        );
        let sales =
            PeriodAggregator::sum(&self.columns.timestamp, &self.columns.sales, periods.sales);

        let active_customers =
            self.panel(&customers, records, &ChartLabels::active_customers(periods.customers))?;
        let total_sales = self.panel(&sales, records, &ChartLabels::total_sales(periods.sales))?;

        info!(
            records = records.len(),
            customer_bars = active_customers.chart.bars.len(),
            sales_bars = total_sales.chart.bars.len(),
            "Dashboard view built"
        );

        Ok(DashboardView {
            client: None,
            source: String::new(),
            generated_at: format_timestamp(&Utc::now()),
            active_customers,
            total_sales,
        })
    }

    fn panel(
        &self,
        aggregator: &PeriodAggregator,
        records: &RecordSet,
        labels: &ChartLabels,
    ) -> Result<ChartPanel> {
        let mut series = aggregator.aggregate(records)?;
        debug!(
            series = %labels.series_name,
            buckets = series.len(),
            contributing = series.contributing_records(),
            "Chart series ready"
        );
        if self.fill_gaps {
            series = series.zero_filled();
        }
        Ok(ChartPanel {
            chart: self.renderer.describe(&series, labels),
            report: *series.report(),
        })
    }
}
