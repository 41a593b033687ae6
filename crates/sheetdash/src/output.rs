//! Writing dashboard views to stdout or an output directory

use crate::dashboard::{ChartPanel, DashboardView};
use sheetdash_common::utils::slugify;
use sheetdash_common::{DashError, Result};
use sheetdash_config::OutputFormat;
use sheetdash_graphs::BitmapRenderer;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where chart output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// JSON on stdout; bitmaps are not possible here
    Stdout,
    Directory(PathBuf),
}

impl OutputTarget {
    pub fn from_option(directory: Option<PathBuf>) -> Self {
        directory.map_or(Self::Stdout, Self::Directory)
    }
}

/// Prefix shared by every file written for a view.
fn file_stem(view: &DashboardView) -> String {
    view.client
        .as_ref()
        .map(|client| slugify(&client.business_name))
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| "dashboard".to_string())
}

fn chart_file_name(stem: &str, panel: &ChartPanel) -> String {
    format!(
        "{stem}_{}_{}.png",
        slugify(&panel.chart.series_name),
        panel.chart.granularity
    )
}

/// Write `view` in `format`; returns the files created.
pub fn write_view(
    view: &DashboardView,
    format: OutputFormat,
    target: &OutputTarget,
    renderer: &BitmapRenderer,
) -> Result<Vec<PathBuf>> {
    match target {
        OutputTarget::Stdout => {
            if format.writes_png() {
                return Err(DashError::validation_field(
                    "PNG output needs an output directory",
                    "output.directory",
                ));
            }
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", view.to_json()?)?;
            Ok(Vec::new())
        }
        OutputTarget::Directory(dir) => write_to_directory(view, format, dir, renderer),
    }
}

fn write_to_directory(
    view: &DashboardView,
    format: OutputFormat,
    dir: &Path,
    renderer: &BitmapRenderer,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let stem = file_stem(view);
    let mut written = Vec::new();

    if format.writes_json() {
        let path = dir.join(format!("{stem}_dashboard.json"));
        std::fs::write(&path, view.to_json()?)?;
        written.push(path);
    }

    if format.writes_png() {
        for panel in [&view.active_customers, &view.total_sales] {
            let path = dir.join(chart_file_name(&stem, panel));
            renderer.render_to_file(&panel.chart, &path)?;
            written.push(path);
        }
    }

    info!(files = written.len(), "Wrote dashboard output to {}", dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{ChartPeriods, Dashboard};
    use sheetdash_common::test_utils::{form_responses, record_set, sample_client};
    use sheetdash_common::StaticDirectory;
    use sheetdash_config::Config;
    use sheetdash_graphs::{Granularity, GraphConfig};

    fn view() -> DashboardView {
        let dashboard = Dashboard::new(StaticDirectory::default(), &Config::default());
        let periods = ChartPeriods {
            customers: Granularity::Weekly,
            sales: Granularity::Monthly,
        };
        dashboard.build_view(&form_responses(), periods).unwrap()
    }

    #[test]
    fn test_file_names() {
        let mut view = view();
        assert_eq!(file_stem(&view), "dashboard");
        assert_eq!(
            chart_file_name("dashboard", &view.active_customers),
            "dashboard_active_customers_weekly.png"
        );

        view.client = Some(sample_client("owner@example.com"));
        assert_eq!(file_stem(&view), "test_bakery");
    }

    #[test]
    fn test_json_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = OutputTarget::Directory(dir.path().join("out"));
        let renderer = BitmapRenderer::default();
        let written = write_view(&view(), OutputFormat::Json, &target, &renderer).unwrap();

        assert_eq!(written, vec![dir.path().join("out").join("dashboard_dashboard.json")]);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(json["total_sales"]["chart"]["granularity"], "monthly");
    }

    #[test]
    fn test_both_formats_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = OutputTarget::Directory(dir.path().to_path_buf());
        let renderer = BitmapRenderer::new(GraphConfig {
            width: 400,
            height: 300,
            ..GraphConfig::default()
        });

        let mut view = view();
        view.client = Some(sample_client("owner@example.com"));
        let written = write_view(&view, OutputFormat::Both, &target, &renderer).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join("test_bakery_dashboard.json"),
                dir.path().join("test_bakery_active_customers_weekly.png"),
                dir.path().join("test_bakery_total_sales_monthly.png"),
            ]
        );
        for png in &written[1..] {
            assert!(std::fs::read(png).unwrap().starts_with(b"\x89PNG"));
        }
    }

    #[test]
    fn test_empty_charts_render_to_png() {
        let dashboard = Dashboard::new(StaticDirectory::default(), &Config::default());
        let records = record_set(&["timestamp", "customer_mobile_number", "total_sales"], &[]);
        let view = dashboard
            .build_view(&records, ChartPeriods::default())
            .unwrap();
        assert!(view.active_customers.chart.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let target = OutputTarget::Directory(dir.path().to_path_buf());
        let written =
            write_view(&view, OutputFormat::Png, &target, &BitmapRenderer::default()).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|path| path.exists()));
        assert_eq!(
            written[1].file_name().and_then(|n| n.to_str()),
            Some("dashboard_total_sales_monthly.png")
        );
    }

    #[test]
    fn test_png_needs_directory() {
        let renderer = BitmapRenderer::default();
        let err =
            write_view(&view(), OutputFormat::Png, &OutputTarget::Stdout, &renderer).unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_target_from_option() {
        assert_eq!(OutputTarget::from_option(None), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::from_option(Some(PathBuf::from("charts"))),
            OutputTarget::Directory(PathBuf::from("charts"))
        );
    }
}
