//! ratecard-core - Core library for ratecard
//!
//! Provides the rate table, cost and rebilling functions, aggregation,
//! growth projections and derived metrics for agency pricing scenarios.
//! Every calculation is a pure function over plain records.

pub mod aggregate;
pub mod cost;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod format;
pub mod markup;
pub mod metrics;
pub mod models;
pub mod projection;
pub mod rates;
pub mod scenario;

pub use aggregate::{aggregate, profit_margin, saas_revenue, LineItem, Subtotal, Totals};
pub use cost::{agency_cost, compare_ai_billing, usage_cost_report, AgencyCostBreakdown};
pub use dashboard::{build_dashboard, Dashboard, DashboardInputs};
pub use error::{CalcError, CalcResult};
pub use export::{export_dashboard_to_json, DashboardExport};
pub use markup::{effective_markup, rebilling_report, upgrade_analysis, ServiceConfig};
pub use models::{Plan, PlanTier};
pub use projection::{project_clients, project_saas, summarize_saas};
pub use scenario::{clamp_amount, clamp_count, Scenario};
