//! Export of a computed dashboard snapshot to JSON

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dashboard::{
    AgencyCosts, BreakEvenAnalysis, ClientRevenue, Dashboard, DashboardInputs, KeyMetrics,
    ProjectionPoint, ScenarioMetrics,
};

/// Timestamped snapshot of the dashboard as currently displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardExport {
    pub timestamp: DateTime<Utc>,
    pub metrics: KeyMetrics,
    pub break_even: BreakEvenAnalysis,
    pub scenarios: Vec<ScenarioMetrics>,
    pub client_count: u32,
    pub agency_costs: AgencyCosts,
    pub client_revenue: ClientRevenue,
    pub projection: Vec<ProjectionPoint>,
}

impl DashboardExport {
    pub fn new(inputs: &DashboardInputs, dashboard: &Dashboard, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            metrics: dashboard.metrics.clone(),
            break_even: dashboard.break_even.clone(),
            scenarios: dashboard.scenarios.clone(),
            client_count: inputs.client_count,
            agency_costs: inputs.agency_costs.clone(),
            client_revenue: inputs.client_revenue.clone(),
            projection: dashboard.projection.clone(),
        }
    }
}

/// Default export file name: `profit-dashboard-YYYY-MM-DD.json`
pub fn default_export_path(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("profit-dashboard-{}.json", date.format("%Y-%m-%d")))
}

/// Export a dashboard snapshot to pretty-printed JSON
///
/// # Arguments
/// * `inputs` - Inputs the dashboard was computed from
/// * `dashboard` - Computed dashboard
/// * `path` - Destination file path (created/overwritten)
///
/// # Errors
/// Returns error if serialization, directory creation or the write fails
///
/// # Examples
///
/// ```no_run
/// use ratecard_core::dashboard::{build_dashboard, DashboardInputs};
/// use ratecard_core::export::export_dashboard_to_json;
/// use std::path::Path;
///
/// let inputs = DashboardInputs::default();
/// let dashboard = build_dashboard(&inputs);
/// export_dashboard_to_json(&inputs, &dashboard, Path::new("dashboard.json")).unwrap();
/// ```
pub fn export_dashboard_to_json(
    inputs: &DashboardInputs,
    dashboard: &Dashboard,
    path: &Path,
) -> Result<DashboardExport> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let snapshot = DashboardExport::new(inputs, dashboard, Utc::now());
    let json = serde_json::to_string_pretty(&snapshot)
        .context("Failed to serialize dashboard to JSON")?;

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Exported dashboard snapshot");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::build_dashboard;
    use tempfile::tempdir;

    #[test]
    fn test_export_dashboard_to_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dashboard.json");

        let inputs = DashboardInputs::default();
        let dashboard = build_dashboard(&inputs);
        let written = export_dashboard_to_json(&inputs, &dashboard, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        for key in [
            "timestamp",
            "metrics",
            "break_even",
            "scenarios",
            "client_count",
            "agency_costs",
            "client_revenue",
            "projection",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["client_count"], 20);
        assert_eq!(value["metrics"]["mrr"], 7000.0);

        let parsed: DashboardExport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, written);
    }

    #[test]
    fn test_default_export_path() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(
            default_export_path(date),
            PathBuf::from("profit-dashboard-2026-03-09.json")
        );
    }
}
