//! Terminal rendering for calculator results
//!
//! Every `render_*` function returns either a comfy-table report or, with
//! `json`, the pretty-printed serde form of the same result.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use ratecard_core::cost::{AgencyCostBreakdown, AiBilling, UsageCostReport};
use ratecard_core::dashboard::Dashboard;
use ratecard_core::format::{
    format_currency, format_currency_whole, format_number, format_percent, format_rate,
};
use ratecard_core::markup::{RebillingReport, UpgradeAnalysis};
use ratecard_core::metrics;
use ratecard_core::models::{
    AddOnService, BillingCycle, Plan, ServiceCategory, UsageService,
};
use ratecard_core::projection::{MonthSnapshot, SaasSummary, DEFAULT_LIFETIME_MONTHS};
use ratecard_core::rates::{self, ServiceRef};
use ratecard_core::CalcResult;
use serde::Serialize;

// ============================================================================
// Table helpers
// ============================================================================

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

fn total_row(label: &str, value: f64) -> Row {
    Row::from(vec![
        Cell::new(label).fg(Color::Green),
        Cell::new(format_currency(value)).fg(Color::Green),
    ])
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// ============================================================================
// Rates
// ============================================================================

/// One price list entry, usage service or add-on
#[derive(Debug, Serialize)]
pub struct RateRow {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    pub price: f64,
    pub unit: String,
}

impl RateRow {
    fn from_usage(service: &UsageService) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            category: service.category,
            price: service.rate,
            unit: service.unit.label().to_string(),
        }
    }

    fn from_add_on(add_on: &AddOnService) -> Self {
        let cycle = add_on.default_cycle();
        let mut unit = cycle_label(cycle).to_string();
        if add_on.per_sub_account {
            unit.push_str(" per sub-account");
        }
        Self {
            id: add_on.id.clone(),
            name: add_on.name.clone(),
            category: add_on.category,
            price: add_on.price_for(cycle).unwrap_or(0.0),
            unit,
        }
    }

    fn from_ref(service: ServiceRef<'_>) -> Self {
        match service {
            ServiceRef::Usage(s) => Self::from_usage(s),
            ServiceRef::AddOn(a) => Self::from_add_on(a),
        }
    }
}

fn cycle_label(cycle: BillingCycle) -> &'static str {
    match cycle {
        BillingCycle::Monthly => "per month",
        BillingCycle::SemiAnnual => "every 6 months",
        BillingCycle::Yearly => "per year",
        BillingCycle::OneTime => "one-time",
    }
}

#[derive(Serialize)]
struct RatesReport<'a> {
    plans: &'a [Plan],
    services: Vec<RateRow>,
}

fn rate_rows(category: Option<ServiceCategory>) -> Vec<RateRow> {
    match category {
        Some(category) => rates::services_by_category(category)
            .into_iter()
            .map(RateRow::from_ref)
            .collect(),
        None => rates::usage_services()
            .iter()
            .map(RateRow::from_usage)
            .chain(rates::add_ons().iter().map(RateRow::from_add_on))
            .collect(),
    }
}

/// Price list, optionally narrowed to one category (plans shown only unfiltered)
pub fn render_rates(category: Option<ServiceCategory>, json: bool) -> Result<String> {
    let services = rate_rows(category);
    let plans: &[Plan] = if category.is_some() { &[] } else { rates::plans() };

    if json {
        return to_json(&RatesReport { plans, services });
    }

    let mut out = Vec::new();
    if !plans.is_empty() {
        let mut table = new_table(&["Plan", "Monthly", "Yearly", "Sub-accounts", "Markup"]);
        for plan in plans {
            table.add_row(vec![
                plan.name.clone(),
                format_currency_whole(plan.monthly_price),
                format_currency_whole(plan.yearly_price),
                plan.sub_accounts
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unlimited".to_string()),
                if plan.allows_markup { "yes" } else { "no" }.to_string(),
            ]);
        }
        out.push(table.to_string());
    }

    if services.is_empty() {
        out.push("No services in this category.".to_string());
    } else {
        let mut table = new_table(&["Service", "ID", "Category", "Price", "Unit"]);
        for row in &services {
            table.add_row(vec![
                row.name.clone(),
                row.id.clone(),
                row.category.to_string(),
                format_rate(row.price),
                row.unit.clone(),
            ]);
        }
        out.push(table.to_string());
    }

    Ok(out.join("\n\n"))
}

// ============================================================================
// Agency cost
// ============================================================================

#[derive(Serialize)]
struct AgencyReport<'a> {
    plan: &'a str,
    billed_annually: bool,
    #[serde(flatten)]
    breakdown: &'a AgencyCostBreakdown,
}

pub fn render_agency(
    plan: &Plan,
    billed_annually: bool,
    breakdown: &AgencyCostBreakdown,
    json: bool,
) -> Result<String> {
    if json {
        return to_json(&AgencyReport {
            plan: plan.id.as_str(),
            billed_annually,
            breakdown,
        });
    }

    let billing = if billed_annually { "annual" } else { "monthly" };
    let mut table = new_table(&["Item", "Monthly"]);
    table.add_row(vec![
        format!("Platform ({}, {billing} billing)", plan.name),
        format_currency(breakdown.platform),
    ]);

    let usage = &breakdown.usage;
    for (label, value) in [
        ("SMS", usage.sms),
        ("Voice", usage.voice),
        ("Email", usage.email),
        ("Phone numbers", usage.phone),
    ] {
        table.add_row(vec![label.to_string(), format_currency(value)]);
    }

    let add_ons = &breakdown.add_ons;
    for (label, value) in [
        ("AI Employee", add_ons.ai_employee),
        ("WordPress hosting", add_ons.wordpress),
        ("HIPAA compliance", add_ons.hipaa),
        ("WhatsApp", add_ons.whatsapp),
        ("Online listings", add_ons.online_listings),
        ("Dedicated IP", add_ons.dedicated_ip),
        ("A2P campaigns", add_ons.a2p),
    ] {
        if value > 0.0 {
            table.add_row(vec![label.to_string(), format_currency(value)]);
        }
    }

    table.add_row(total_row("Monthly total", breakdown.monthly_total));
    table.add_row(total_row("Annual total", breakdown.annual_total));

    let mut out = table.to_string();
    if breakdown.annual_savings > 0.0 {
        out.push_str(&format!(
            "\nAnnual billing saves {} per year",
            format_currency(breakdown.annual_savings)
        ));
    }
    Ok(out)
}

// ============================================================================
// Usage cost
// ============================================================================

pub fn render_usage(report: &UsageCostReport, json: bool) -> Result<String> {
    if json {
        return to_json(report);
    }

    let mut table = new_table(&["Category", "Monthly"]);
    for (label, value) in [
        ("Messaging", report.messaging.total),
        ("Voice", report.voice.total),
        ("Email", report.email.total),
        ("AI", report.ai.total),
        ("Workflows", report.workflow.total),
    ] {
        table.add_row(vec![label.to_string(), format_currency(value)]);
    }
    table.add_row(total_row("Monthly total", report.monthly));
    table.add_row(vec![
        "Per sub-account".to_string(),
        format_currency(report.per_sub_account),
    ]);
    table.add_row(vec!["Annual".to_string(), format_currency(report.annual)]);

    let comparison = &report.ai.comparison;
    let cheaper = match comparison.cheaper {
        AiBilling::Metered => "metered",
        AiBilling::Unlimited => "unlimited",
    };
    let mut lines = vec![
        table.to_string(),
        format!(
            "AI billing: metered {} vs unlimited {} ({cheaper} is cheaper by {})",
            format_currency(comparison.metered),
            format_currency(comparison.unlimited),
            format_currency(comparison.savings.abs())
        ),
    ];

    let workflow = &report.workflow;
    if let Some(tier) = &workflow.recommended_tier {
        lines.push(format!(
            "Workflows: {} at {} saves {} over pay-per-use",
            tier.name,
            format_currency(workflow.tier_cost),
            format_currency(workflow.savings)
        ));
    }

    Ok(lines.join("\n"))
}

// ============================================================================
// Rebilling
// ============================================================================

#[derive(Serialize)]
struct RebillingOutput<'a> {
    plan: &'a str,
    report: &'a RebillingReport,
    upgrade: &'a UpgradeAnalysis,
}

pub fn render_rebilling(
    plan: &Plan,
    report: &RebillingReport,
    upgrade: &UpgradeAnalysis,
    json: bool,
) -> Result<String> {
    if json {
        return to_json(&RebillingOutput {
            plan: plan.id.as_str(),
            report,
            upgrade,
        });
    }

    let mut table = new_table(&[
        "Service", "Unit cost", "Markup", "Client price", "Volume", "Cost", "Revenue", "Profit",
    ]);
    for line in &report.lines {
        table.add_row(vec![
            line.service.clone(),
            format_rate(line.unit_cost),
            format_percent(line.effective_markup),
            format_rate(line.client_price),
            format_number(line.monthly_volume),
            format_currency(line.monthly_cost),
            format_currency(line.monthly_revenue),
            format_currency(line.monthly_profit),
        ]);
    }
    let wp = &report.wordpress;
    table.add_row(vec![
        "WordPress hosting".to_string(),
        "-".to_string(),
        "-".to_string(),
        "-".to_string(),
        format!("{} sites", format_number(wp.total_sites)),
        format_currency(wp.monthly_cost),
        format_currency(wp.monthly_revenue),
        format_currency(wp.monthly_profit),
    ]);

    let total = &report.totals.total;
    let mut lines = vec![
        table.to_string(),
        format!(
            "Plan: {}{}",
            plan.name,
            if plan.allows_markup {
                ""
            } else {
                " (rebilling at cost, markup disabled)"
            }
        ),
        format!(
            "Monthly: revenue {}, cost {}, profit {} ({} margin)",
            format_currency(total.revenue),
            format_currency(total.cost),
            format_currency(report.monthly_profit),
            format_percent(total.margin() * 100.0)
        ),
        format!(
            "Annual profit: {}  |  Per client: {}",
            format_currency(report.annual_profit),
            format_currency(report.profit_per_client)
        ),
    ];

    let recover = upgrade
        .months_to_recover
        .map(|m| format!("{m:.1} months"))
        .unwrap_or_else(|| "never".to_string());
    lines.push(format!(
        "Upgrade to markup plan: +{} per month for {} extra profit, recovered in {recover}{}",
        format_currency(upgrade.plan_difference),
        format_currency(upgrade.additional_profit),
        if upgrade.worth_it { " (worth it)" } else { "" }
    ));

    Ok(lines.join("\n"))
}

// ============================================================================
// SaaS projection
// ============================================================================

#[derive(Serialize)]
struct SaasOutput<'a> {
    months: &'a [MonthSnapshot],
    summary: &'a SaasSummary,
}

pub fn render_saas(
    snapshots: &[MonthSnapshot],
    summary: &SaasSummary,
    json: bool,
) -> Result<String> {
    if json {
        return to_json(&SaasOutput {
            months: snapshots,
            summary,
        });
    }

    let mut table = new_table(&[
        "Month", "Clients", "MRR", "Rebilling", "Costs", "Net profit", "Margin",
    ]);
    for s in snapshots {
        table.add_row(vec![
            s.month.to_string(),
            s.total_clients.to_string(),
            format_currency_whole(s.mrr),
            format_currency_whole(s.rebilling_profit),
            format_currency_whole(s.total_costs),
            format_currency_whole(s.net_profit),
            format_percent(s.profit_margin),
        ]);
    }

    let mut breakdown = new_table(&["Tier", "Clients", "MRR"]);
    for tier in &summary.revenue_breakdown {
        breakdown.add_row(vec![
            tier.name.clone(),
            tier.clients.to_string(),
            format_currency_whole(tier.mrr),
        ]);
    }

    let lines = [
        table.to_string(),
        breakdown.to_string(),
        format!(
            "Setup fees (one-time, not in revenue): {}",
            format_currency_whole(summary.current.setup_fees)
        ),
        format!(
            "Avg client value: {}  |  Lifetime: {:.1} months  |  LTV: {}",
            format_currency(summary.avg_client_value),
            summary.avg_lifetime_months,
            format_currency_whole(summary.ltv)
        ),
        format!(
            "Month {}: {} clients, {} MRR, {} net profit",
            summary.projected.month,
            summary.projected.total_clients,
            format_currency_whole(summary.projected.mrr),
            format_currency_whole(summary.projected.net_profit)
        ),
    ];
    Ok(lines.join("\n"))
}

// ============================================================================
// Dashboard
// ============================================================================

pub fn render_dashboard(dashboard: &Dashboard, json: bool) -> Result<String> {
    if json {
        return to_json(dashboard);
    }

    let m = &dashboard.metrics;
    let be = &dashboard.break_even;
    let mut lines = vec![
        format!("MRR:              {}", format_currency_whole(m.mrr)),
        format!("Costs:            {}", format_currency_whole(m.costs)),
        format!("Net profit:       {}", format_currency_whole(m.net_profit)),
        format!("Profit margin:    {}", format_percent(m.profit_margin)),
        format!("Revenue/client:   {}", format_currency(m.revenue_per_client)),
        format!("Cost/client:      {}", format_currency(m.cost_per_client)),
        format!(
            "Break-even:       {}",
            be.break_even_clients
                .map(|n| format!("{n} clients"))
                .unwrap_or_else(|| "not achievable".to_string())
        ),
        format!(
            "Months to break-even: {}",
            be.months_to_break_even
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
        format!(
            "Currently profitable: {}",
            if be.currently_profitable { "yes" } else { "no" }
        ),
    ];

    let horizons: Vec<String> = dashboard
        .scenarios
        .first()
        .map(|s| s.horizons.iter().map(|h| format!("{} months", h.months)).collect())
        .unwrap_or_default();
    let mut headers = vec!["Scenario", "Growth", "Churn"];
    headers.extend(horizons.iter().map(String::as_str));
    let mut scenarios = new_table(&headers);
    for s in &dashboard.scenarios {
        let mut row = vec![
            s.name.clone(),
            format_percent(s.monthly_growth),
            format_percent(s.churn_rate),
        ];
        row.extend(s.horizons.iter().map(|h| {
            format!("{} clients / {}", h.clients, format_currency_whole(h.mrr))
        }));
        scenarios.add_row(row);
    }
    lines.push(scenarios.to_string());

    let mut growth = new_table(&["Added clients", "Clients", "Revenue", "Profit"]);
    for g in &dashboard.client_growth {
        growth.add_row(vec![
            format!("+{}", g.added_clients),
            g.clients.to_string(),
            format_currency_whole(g.revenue),
            format_currency_whole(g.profit),
        ]);
    }
    lines.push(growth.to_string());

    Ok(lines.join("\n"))
}

// ============================================================================
// Ad-hoc metrics
// ============================================================================

#[derive(Serialize)]
struct BreakEvenOutput {
    fixed_costs: f64,
    price_per_client: f64,
    variable_cost_per_client: f64,
    break_even_clients: Option<u64>,
    reason: Option<String>,
}

/// Break-even result; an unachievable break-even is a result, not an error
pub fn render_break_even(
    fixed: f64,
    price: f64,
    variable: f64,
    result: CalcResult<u64>,
    json: bool,
) -> Result<String> {
    let (clients, reason) = match result {
        Ok(n) => (Some(n), None),
        Err(e) if e.is_invalid_input() => (None, Some(e.to_string())),
        Err(e) => return Err(e.into()),
    };

    if json {
        return to_json(&BreakEvenOutput {
            fixed_costs: fixed,
            price_per_client: price,
            variable_cost_per_client: variable,
            break_even_clients: clients,
            reason,
        });
    }

    Ok(match (clients, reason) {
        (Some(n), _) => format!(
            "Break-even: {n} clients ({} fixed, {} margin per client)",
            format_currency(fixed),
            format_currency(price - variable)
        ),
        (None, reason) => format!(
            "Break-even: not achievable ({})",
            reason.unwrap_or_default()
        ),
    })
}

/// CLV, CAC payback and ROI computed from ad-hoc inputs
#[derive(Debug, Serialize)]
pub struct MetricsReport {
    pub avg_monthly_revenue: f64,
    pub lifespan_months: f64,
    pub margin: f64,
    pub clv: f64,
    pub cac: Option<f64>,
    /// None when no CAC was given or payback is not achievable
    pub cac_payback_months: Option<f64>,
    /// ROI as a fraction
    pub roi: Option<f64>,
}

impl MetricsReport {
    pub fn compute(
        avg_monthly_revenue: f64,
        lifespan_months: Option<f64>,
        churn_fraction: f64,
        margin: f64,
        cac: Option<f64>,
        roi_inputs: Option<(f64, f64)>,
    ) -> Self {
        let lifespan_months = lifespan_months
            .unwrap_or_else(|| metrics::average_lifespan(churn_fraction, DEFAULT_LIFETIME_MONTHS));
        let clv = metrics::customer_lifetime_value(avg_monthly_revenue, lifespan_months, margin);
        let cac_payback_months = cac.and_then(|cost| {
            metrics::cac_payback_months(cost, avg_monthly_revenue * margin)
                .inspect_err(|e| tracing::debug!(error = %e, "CAC payback not achievable"))
                .ok()
        });

        Self {
            avg_monthly_revenue,
            lifespan_months,
            margin,
            clv,
            cac,
            cac_payback_months,
            roi: roi_inputs.map(|(initial, final_value)| metrics::roi(initial, final_value)),
        }
    }
}

pub fn render_metrics(report: &MetricsReport, json: bool) -> Result<String> {
    if json {
        return to_json(report);
    }

    let mut lines = vec![
        format!(
            "Customer lifetime value: {} ({} x {:.1} months x {} margin)",
            format_currency(report.clv),
            format_currency(report.avg_monthly_revenue),
            report.lifespan_months,
            format_percent(report.margin * 100.0)
        ),
    ];
    if report.cac.is_some() {
        lines.push(match report.cac_payback_months {
            Some(months) => format!("CAC payback: {months:.1} months"),
            None => "CAC payback: not achievable".to_string(),
        });
    }
    if let Some(roi) = report.roi {
        lines.push(format!("ROI: {}", format_percent(roi * 100.0)));
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratecard_core::cost::{usage_cost_report, UsageInputs};
    use ratecard_core::dashboard::{build_dashboard, DashboardInputs};
    use ratecard_core::metrics::break_even_clients;

    #[test]
    fn test_render_usage_workflow_tier_at_allocation() {
        let report = usage_cost_report(&UsageInputs {
            workflow_executions: 10_000.0,
            ..Default::default()
        });
        let out = render_usage(&report, false).unwrap();
        assert!(out.contains("Workflows: Starter at $10.00 saves $90.00 over pay-per-use"));

        let report = usage_cost_report(&UsageInputs {
            workflow_executions: 500.0,
            ..Default::default()
        });
        assert!(!render_usage(&report, false).unwrap().contains("Workflows:"));
    }

    #[test]
    fn test_rate_rows_filtered_by_category() {
        let rows = rate_rows(Some(ServiceCategory::Ai));
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.category == ServiceCategory::Ai));
        assert!(rows.iter().any(|r| r.id == "conversation_ai"));
    }

    #[test]
    fn test_rate_rows_unfiltered_cover_all_services() {
        let rows = rate_rows(None);
        assert_eq!(rows.len(), rates::usage_services().len() + rates::add_ons().len());
    }

    #[test]
    fn test_render_rates_json_omits_plans_when_filtered() {
        let out = render_rates(Some(ServiceCategory::Ai), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["plans"].as_array().map(Vec::len), Some(0));
        assert!(value["services"].as_array().is_some_and(|s| !s.is_empty()));
    }

    #[test]
    fn test_render_break_even_fixture() {
        let result = break_even_clients(2500.0, 297.0, 50.0);
        let out = render_break_even(2500.0, 297.0, 50.0, result, false).unwrap();
        assert!(out.starts_with("Break-even: 11 clients"));
    }

    #[test]
    fn test_render_break_even_not_achievable() {
        let result = break_even_clients(1000.0, 50.0, 50.0);
        let out = render_break_even(1000.0, 50.0, 50.0, result, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["break_even_clients"].is_null());
        assert!(value["reason"].is_string());
    }

    #[test]
    fn test_metrics_report_defaults() {
        let report = MetricsReport::compute(297.0, Some(24.0), 0.05, 0.6, Some(500.0), None);
        assert!((report.clv - 4276.80).abs() < 1e-6);
        let payback = report.cac_payback_months.unwrap();
        assert!((payback - 500.0 / (297.0 * 0.6)).abs() < 1e-9);
        assert!(report.roi.is_none());
    }

    #[test]
    fn test_metrics_report_lifespan_from_churn() {
        let report = MetricsReport::compute(100.0, None, 0.05, 1.0, None, Some((1000.0, 1500.0)));
        assert!((report.lifespan_months - 20.0).abs() < 1e-9);
        assert_eq!(report.roi, Some(0.5));
        assert!(report.cac_payback_months.is_none());
    }

    #[test]
    fn test_metrics_report_unachievable_payback() {
        let report = MetricsReport::compute(100.0, Some(12.0), 0.0, 0.0, Some(500.0), None);
        assert!(report.cac_payback_months.is_none());
        let out = render_metrics(&report, false).unwrap();
        assert!(out.contains("CAC payback: not achievable"));
    }

    #[test]
    fn test_render_dashboard_text() {
        let dashboard = build_dashboard(&DashboardInputs::default());
        let out = render_dashboard(&dashboard, false).unwrap();
        assert!(out.contains("$7,000"));
        assert!(out.contains("3 clients"));
        assert!(out.contains("Conservative"));
    }
}
