//! Markup and rebilling: base cost + markup → client price, revenue, profit
//!
//! Markup is gated twice: by the active plan and by the service itself.
//! Every function that consumes a configured markup takes the `Plan` and
//! routes it through [`effective_markup`], so a plan without `allows_markup`
//! always rebills at cost regardless of what the caller configured. A
//! service without `markup_allowed` rebills at cost on every plan, and one
//! without `rebillable` is left out of the rebilling report.

use serde::{Deserialize, Serialize};

use crate::aggregate::{self, LineItem, Totals};
use crate::models::{Plan, ServiceCategory, UsageService};
use crate::rates;

/// Client-facing unit price: `base × (1 + markup_pct / 100)`
pub fn client_price(base: f64, markup_pct: f64) -> f64 {
    base * (1.0 + markup_pct / 100.0)
}

/// Profit over `volume` units: `(client_price − base) × volume`.
/// Exactly 0 when `markup_pct` is 0.
pub fn markup_profit(base: f64, markup_pct: f64, volume: f64) -> f64 {
    if markup_pct == 0.0 {
        return 0.0;
    }
    (client_price(base, markup_pct) - base) * volume
}

/// Markup the plan actually permits (0 when the plan rebills at cost only)
pub fn effective_markup(plan: &Plan, configured_pct: f64) -> f64 {
    if plan.allows_markup {
        configured_pct
    } else {
        0.0
    }
}

/// Markup for one service: the plan gate, then the service's own gate
pub fn service_markup(plan: &Plan, service: &UsageService, configured_pct: f64) -> f64 {
    if service.markup_allowed {
        effective_markup(plan, configured_pct)
    } else {
        0.0
    }
}

/// Rebilling profit with markup given as a fraction (0.5 = 50%)
pub fn rebilling_profit(base: f64, markup_fraction: f64, volume: f64) -> f64 {
    markup_profit(base, markup_fraction * 100.0, volume)
}

/// Per-client volume and configured markup for one rebilled service
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub volume: f64,
    pub markup_percent: f64,
}

impl ServiceConfig {
    pub const fn new(volume: f64, markup_percent: f64) -> Self {
        Self {
            volume,
            markup_percent,
        }
    }
}

/// One rebilled service across all clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebillLine {
    pub service: String,
    pub category: ServiceCategory,
    pub unit_cost: f64,
    pub effective_markup: f64,
    pub client_price: f64,
    pub monthly_volume: f64,
    pub monthly_cost: f64,
    pub monthly_revenue: f64,
    pub monthly_profit: f64,
}

impl RebillLine {
    pub fn as_line_item(&self) -> LineItem {
        LineItem::new(self.category, self.monthly_cost, self.monthly_revenue)
    }
}

/// Price one service for `clients` clients under the plan and service
/// markup gates. `unit_cost` may differ from the listed rate (SMS adds the
/// carrier fee).
pub fn rebill_line(
    plan: &Plan,
    label: &str,
    service: &UsageService,
    unit_cost: f64,
    config: ServiceConfig,
    clients: u32,
) -> RebillLine {
    let markup = service_markup(plan, service, config.markup_percent);
    let price = client_price(unit_cost, markup);
    let monthly_volume = config.volume * clients as f64;
    let monthly_cost = unit_cost * monthly_volume;

    RebillLine {
        service: label.to_string(),
        category: service.category,
        unit_cost,
        effective_markup: markup,
        client_price: price,
        monthly_volume,
        monthly_cost,
        monthly_revenue: price * monthly_volume,
        monthly_profit: markup_profit(unit_cost, markup, monthly_volume),
    }
}

/// WordPress hosting resold at a fixed price per site (not plan-gated)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordpressResale {
    pub sites_per_client: f64,
    pub your_cost: f64,
    pub client_price: f64,
}

impl Default for WordpressResale {
    fn default() -> Self {
        Self {
            sites_per_client: 1.0,
            your_cost: 10.0,
            client_price: 25.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WordpressLine {
    pub total_sites: f64,
    pub monthly_cost: f64,
    pub monthly_revenue: f64,
    pub monthly_profit: f64,
}

pub fn wordpress_line(resale: &WordpressResale, clients: u32) -> WordpressLine {
    let total_sites = resale.sites_per_client * clients as f64;
    let monthly_cost = resale.your_cost * total_sites;
    let monthly_revenue = resale.client_price * total_sites;
    WordpressLine {
        total_sites,
        monthly_cost,
        monthly_revenue,
        monthly_profit: monthly_revenue - monthly_cost,
    }
}

/// Inputs of the rebilling calculator; volumes are per client per month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebillingInputs {
    pub client_count: u32,
    pub sms: ServiceConfig,
    pub email: ServiceConfig,
    pub conversation_ai: ServiceConfig,
    pub voice_ai: ServiceConfig,
    pub reviews_ai: ServiceConfig,
    /// Volume in words
    pub content_ai: ServiceConfig,
    pub workflows: ServiceConfig,
    pub wordpress: WordpressResale,
}

impl Default for RebillingInputs {
    fn default() -> Self {
        Self {
            client_count: 10,
            sms: ServiceConfig::new(1000.0, 100.0),
            email: ServiceConfig::new(5000.0, 150.0),
            conversation_ai: ServiceConfig::new(500.0, 200.0),
            voice_ai: ServiceConfig::new(100.0, 150.0),
            reviews_ai: ServiceConfig::new(50.0, 300.0),
            content_ai: ServiceConfig::new(10_000.0, 200.0),
            workflows: ServiceConfig::new(2000.0, 100.0),
            wordpress: WordpressResale::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebillingReport {
    pub lines: Vec<RebillLine>,
    pub wordpress: WordpressLine,
    pub totals: Totals,
    pub monthly_profit: f64,
    pub annual_profit: f64,
    pub profit_per_client: f64,
}

/// Rebilling revenue and profit for every resold service under `plan`
pub fn rebilling_report(plan: &Plan, inputs: &RebillingInputs) -> RebillingReport {
    tracing::debug!(
        plan = %plan.id,
        clients = inputs.client_count,
        allows_markup = plan.allows_markup,
        "Computing rebilling report"
    );
    let clients = inputs.client_count;
    let sms_unit = rates::SMS_SEGMENT_RATE + rates::DEFAULT_CARRIER_FEE;

    let resold = [
        ("SMS", "sms_outbound", Some(sms_unit), inputs.sms),
        ("Email", "lc_email", None, inputs.email),
        ("Conversation AI", "conversation_ai", None, inputs.conversation_ai),
        ("Voice AI", "voice_ai_engine", None, inputs.voice_ai),
        ("Reviews AI", "reviews_ai", None, inputs.reviews_ai),
        ("Content AI", "content_ai_text", None, inputs.content_ai),
        ("Premium Workflows", "workflow_premium", None, inputs.workflows),
    ];
    let lines: Vec<RebillLine> = resold
        .into_iter()
        .filter_map(|(label, id, unit_override, config)| {
            let service = rates::usage_service(id).filter(|s| s.rebillable)?;
            let unit_cost = unit_override.unwrap_or_else(|| service.unit_price());
            Some(rebill_line(plan, label, service, unit_cost, config, clients))
        })
        .collect();
    let wordpress = wordpress_line(&inputs.wordpress, clients);

    let mut items: Vec<LineItem> = lines.iter().map(RebillLine::as_line_item).collect();
    items.push(LineItem::new(
        ServiceCategory::Hosting,
        wordpress.monthly_cost,
        wordpress.monthly_revenue,
    ));
    let totals = aggregate::aggregate(&items);

    // Sum of per-line profits: zero markup stays exactly zero
    let monthly_profit =
        lines.iter().map(|l| l.monthly_profit).sum::<f64>() + wordpress.monthly_profit;
    let profit_per_client = if clients > 0 {
        monthly_profit / clients as f64
    } else {
        0.0
    };

    RebillingReport {
        lines,
        wordpress,
        totals,
        monthly_profit,
        annual_profit: monthly_profit * 12.0,
        profit_per_client,
    }
}

/// Whether moving from a rebill-at-cost plan to a markup plan pays for itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeAnalysis {
    pub plan_difference: f64,
    pub current_profit: f64,
    pub profit_without_markup: f64,
    pub additional_profit: f64,
    /// None when the upgrade adds no profit
    pub months_to_recover: Option<f64>,
    pub worth_it: bool,
}

/// Compare monthly rebilling profit on `lower` and `upper` for the same inputs.
/// The upgrade is worth it when the price difference is recovered within a year.
pub fn upgrade_analysis(lower: &Plan, upper: &Plan, inputs: &RebillingInputs) -> UpgradeAnalysis {
    let plan_difference = upper.monthly_price - lower.monthly_price;
    let current_profit = rebilling_report(upper, inputs).monthly_profit;
    let profit_without_markup = rebilling_report(lower, inputs).monthly_profit;
    let additional_profit = current_profit - profit_without_markup;

    let months_to_recover = (additional_profit > 0.0).then(|| plan_difference / additional_profit);
    let worth_it = months_to_recover.is_some_and(|m| m <= 12.0);

    UpgradeAnalysis {
        plan_difference,
        current_profit,
        profit_without_markup,
        additional_profit,
        months_to_recover,
        worth_it,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanTier;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_client_price() {
        assert!((client_price(0.0113, 100.0) - 0.0226).abs() < EPS);
        assert_eq!(client_price(10.0, 0.0), 10.0);
        assert_eq!(client_price(0.0, 250.0), 0.0);
    }

    #[test]
    fn test_zero_markup_zero_profit() {
        for volume in [0.0, 1.0, 1234.5, 1e9] {
            assert_eq!(markup_profit(0.0113, 0.0, volume), 0.0);
        }
    }

    #[test]
    fn test_markup_profit() {
        // 1000 SMS at 0.0113 with 100% markup
        assert!((markup_profit(0.0113, 100.0, 1000.0) - 11.3).abs() < EPS);
    }

    #[test]
    fn test_rebilling_profit_fraction() {
        assert!((rebilling_profit(10.0, 0.5, 4.0) - 20.0).abs() < EPS);
    }

    #[test]
    fn test_effective_markup_plan_gate() {
        let pro = rates::plan(PlanTier::Pro);
        assert_eq!(effective_markup(pro, 150.0), 150.0);

        for tier in [PlanTier::Starter, PlanTier::Unlimited] {
            let plan = rates::plan(tier);
            for configured in [0.0, 50.0, 100.0, 1000.0] {
                assert_eq!(effective_markup(plan, configured), 0.0);
            }
        }
    }

    fn service(id: &str) -> &'static UsageService {
        rates::usage_service(id).unwrap()
    }

    #[test]
    fn test_rebill_line_gated_plan_is_at_cost() {
        let plan = rates::plan(PlanTier::Unlimited);
        let line = rebill_line(
            plan,
            "SMS",
            service("sms_outbound"),
            0.0113,
            ServiceConfig::new(1000.0, 100.0),
            10,
        );
        assert_eq!(line.category, ServiceCategory::Messaging);
        assert_eq!(line.effective_markup, 0.0);
        assert_eq!(line.monthly_profit, 0.0);
        assert_eq!(line.monthly_cost, line.monthly_revenue);
    }

    #[test]
    fn test_service_without_markup_rebills_at_cost() {
        let pro = rates::plan(PlanTier::Pro);
        let funnel_ai = service("funnel_ai");
        assert!(!funnel_ai.markup_allowed);
        assert_eq!(service_markup(pro, funnel_ai, 200.0), 0.0);
        assert_eq!(service_markup(pro, service("reviews_ai"), 200.0), 200.0);

        let line = rebill_line(
            pro,
            "Funnel AI",
            funnel_ai,
            0.05,
            ServiceConfig::new(100.0, 200.0),
            4,
        );
        assert_eq!(line.effective_markup, 0.0);
        assert_eq!(line.monthly_profit, 0.0);
        assert_eq!(line.client_price, 0.05);
    }

    #[test]
    fn test_rebilling_report_lists_rebillable_services() {
        let report = rebilling_report(rates::plan(PlanTier::Pro), &RebillingInputs::default());
        let labels: Vec<&str> = report.lines.iter().map(|l| l.service.as_str()).collect();
        assert_eq!(
            labels,
            [
                "SMS",
                "Email",
                "Conversation AI",
                "Voice AI",
                "Reviews AI",
                "Content AI",
                "Premium Workflows"
            ]
        );
        assert_eq!(report.lines[6].category, ServiceCategory::Workflow);
        assert!((report.lines[6].unit_cost - rates::WORKFLOW_EXECUTION_RATE).abs() < EPS);
        assert!((report.lines[0].unit_cost - 0.0113).abs() < EPS);
    }

    #[test]
    fn test_rebilling_report_pro_defaults() {
        let report = rebilling_report(rates::plan(PlanTier::Pro), &RebillingInputs::default());
        let sms = &report.lines[0];
        assert_eq!(sms.monthly_volume, 10_000.0);
        assert!((sms.monthly_profit - 113.0).abs() < 1e-6);

        // WordPress: 10 sites × (25 − 10)
        assert_eq!(report.wordpress.monthly_profit, 150.0);
        assert!(report.monthly_profit > report.wordpress.monthly_profit);
        assert!((report.annual_profit - report.monthly_profit * 12.0).abs() < 1e-6);
        assert!((report.profit_per_client - report.monthly_profit / 10.0).abs() < EPS);
    }

    #[test]
    fn test_rebilling_report_unlimited_only_wordpress_profit() {
        let report =
            rebilling_report(rates::plan(PlanTier::Unlimited), &RebillingInputs::default());
        assert_eq!(report.monthly_profit, 150.0);
        assert!(report.lines.iter().all(|l| l.monthly_profit == 0.0));
    }

    #[test]
    fn test_rebilling_report_no_clients() {
        let inputs = RebillingInputs {
            client_count: 0,
            ..Default::default()
        };
        let report = rebilling_report(rates::plan(PlanTier::Pro), &inputs);
        assert_eq!(report.monthly_profit, 0.0);
        assert_eq!(report.profit_per_client, 0.0);
        assert_eq!(report.totals.total.cost, 0.0);
    }

    #[test]
    fn test_upgrade_analysis() {
        let analysis = upgrade_analysis(
            rates::plan(PlanTier::Unlimited),
            rates::plan(PlanTier::Pro),
            &RebillingInputs::default(),
        );
        assert_eq!(analysis.plan_difference, 200.0);
        assert_eq!(analysis.profit_without_markup, 150.0);
        let months = analysis.months_to_recover.unwrap();
        assert!((months - 200.0 / analysis.additional_profit).abs() < EPS);
        assert!(analysis.worth_it);
    }

    #[test]
    fn test_upgrade_analysis_without_markup_never_recovers() {
        let inputs = RebillingInputs {
            sms: ServiceConfig::new(1000.0, 0.0),
            email: ServiceConfig::new(5000.0, 0.0),
            conversation_ai: ServiceConfig::default(),
            voice_ai: ServiceConfig::default(),
            reviews_ai: ServiceConfig::default(),
            content_ai: ServiceConfig::default(),
            workflows: ServiceConfig::default(),
            ..Default::default()
        };
        let analysis = upgrade_analysis(
            rates::plan(PlanTier::Unlimited),
            rates::plan(PlanTier::Pro),
            &inputs,
        );
        assert_eq!(analysis.additional_profit, 0.0);
        assert!(analysis.months_to_recover.is_none());
        assert!(!analysis.worth_it);
    }
}
