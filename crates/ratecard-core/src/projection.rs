//! Compounding growth projections
//!
//! Client counts follow a closed form rather than a running product, so any
//! single month can be computed independently and month 0 always equals the
//! initial cohort:
//!
//! ```text
//! clients(m) = round(initial × (1 + net/100)^m),   net = growth − churn
//! ```
//!
//! Projections are eager: the whole series is returned as a `Vec`.
//!
//! # Examples
//!
//! ```
//! use ratecard_core::projection::project_clients;
//!
//! assert_eq!(project_clients(10, 5.0, 0), 10);
//! assert_eq!(project_clients(10, 5.0, 12), 18);
//! ```

use serde::{Deserialize, Serialize};

use crate::aggregate::profit_margin;
use crate::markup::effective_markup;
use crate::models::{GrowthMetrics, Plan, PricingTier};

/// Client count after `month` months of compounding at `net_rate_pct`.
///
/// Churn beyond 100% empties the cohort after the first month.
pub fn project_clients(initial: u32, net_rate_pct: f64, month: u32) -> u64 {
    let factor = (1.0 + net_rate_pct / 100.0).max(0.0).powi(month as i32);
    (initial as f64 * factor).round().max(0.0) as u64
}

/// Agency-side costs of running the SaaS business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaasCosts {
    /// Monthly platform subscription
    pub platform: f64,
    pub usage_per_client: f64,
    pub support_per_client: f64,
}

impl Default for SaasCosts {
    fn default() -> Self {
        Self {
            platform: 497.0,
            usage_per_client: 15.0,
            support_per_client: 25.0,
        }
    }
}

/// Markups earned on usage resold to SaaS clients, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaasRebilling {
    pub sms_markup: f64,
    pub email_markup: f64,
    pub ai_markup: f64,
    /// Rebilled usage per client per month, in dollars
    pub usage_volume_per_client: f64,
}

impl Default for SaasRebilling {
    fn default() -> Self {
        Self {
            sms_markup: 50.0,
            email_markup: 30.0,
            ai_markup: 40.0,
            usage_volume_per_client: 50.0,
        }
    }
}

impl SaasRebilling {
    /// Monthly markup profit for `clients` clients, gated by the plan
    pub fn profit(&self, plan: &Plan, clients: u64) -> f64 {
        let markup = effective_markup(plan, self.sms_markup)
            + effective_markup(plan, self.email_markup)
            + effective_markup(plan, self.ai_markup);
        clients as f64 * self.usage_volume_per_client * markup / 100.0
    }
}

/// Inputs of the SaaS revenue projector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaasInputs {
    pub tiers: Vec<PricingTier>,
    pub costs: SaasCosts,
    pub rebilling: SaasRebilling,
    pub growth: GrowthMetrics,
}

impl Default for SaasInputs {
    fn default() -> Self {
        Self {
            tiers: vec![
                PricingTier::new("Starter", 297.0, 10, 500.0),
                PricingTier::new("Pro", 497.0, 5, 1000.0),
                PricingTier::new("Enterprise", 997.0, 2, 2500.0),
            ],
            costs: SaasCosts::default(),
            rebilling: SaasRebilling::default(),
            growth: GrowthMetrics::default(),
        }
    }
}

/// Per-tier figures within one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSnapshot {
    pub name: String,
    pub clients: u64,
    pub mrr: f64,
}

/// One month of the SaaS projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSnapshot {
    pub month: u32,
    pub tiers: Vec<TierSnapshot>,
    pub total_clients: u64,
    /// Subscription revenue only
    pub mrr: f64,
    pub rebilling_profit: f64,
    /// Reported separately, not part of `total_revenue`
    pub setup_fees: f64,
    pub total_revenue: f64,
    pub total_costs: f64,
    pub net_profit: f64,
    /// Percent of total revenue, 0 when there is no revenue
    pub profit_margin: f64,
}

/// Month-by-month SaaS projection for months `0..=growth.projection_months`.
///
/// Clients are rounded per tier and then summed. Setup fees cover the full
/// cohort at month 0 and only net new clients afterwards.
pub fn project_saas(plan: &Plan, inputs: &SaasInputs) -> Vec<MonthSnapshot> {
    let net = inputs.growth.net_growth_rate();
    let active: Vec<&PricingTier> = inputs.tiers.iter().filter(|t| t.is_active()).collect();
    tracing::debug!(
        months = inputs.growth.projection_months,
        active_tiers = active.len(),
        net_growth = net,
        "Projecting SaaS revenue"
    );

    (0..=inputs.growth.projection_months)
        .map(|month| {
            let mut tiers = Vec::with_capacity(active.len());
            let mut total_clients = 0u64;
            let mut mrr = 0.0;
            let mut setup_fees = 0.0;

            for tier in &active {
                let clients = project_clients(tier.client_count, net, month);
                let new_clients = if month == 0 {
                    clients
                } else {
                    clients.saturating_sub(project_clients(tier.client_count, net, month - 1))
                };
                let tier_mrr = clients as f64 * tier.monthly_price;

                total_clients += clients;
                mrr += tier_mrr;
                setup_fees += new_clients as f64 * tier.setup_fee;
                tiers.push(TierSnapshot {
                    name: tier.name.clone(),
                    clients,
                    mrr: tier_mrr,
                });
            }

            let rebilling_profit = inputs.rebilling.profit(plan, total_clients);
            let total_costs = inputs.costs.platform
                + total_clients as f64
                    * (inputs.costs.usage_per_client + inputs.costs.support_per_client);
            let total_revenue = mrr + rebilling_profit;
            let net_profit = total_revenue - total_costs;

            MonthSnapshot {
                month,
                tiers,
                total_clients,
                mrr,
                rebilling_profit,
                setup_fees,
                total_revenue,
                total_costs,
                net_profit,
                profit_margin: profit_margin(total_revenue, total_costs) * 100.0,
            }
        })
        .collect()
}

/// Headline SaaS figures derived from the initial tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaasSummary {
    pub current: MonthSnapshot,
    pub projected: MonthSnapshot,
    pub avg_client_value: f64,
    /// Months a client stays: 1 / churn, or the fallback horizon without churn
    pub avg_lifetime_months: f64,
    pub ltv: f64,
    /// Initial MRR share per tier
    pub revenue_breakdown: Vec<TierSnapshot>,
}

/// Lifetime horizon used when there is no churn to derive one from
pub const DEFAULT_LIFETIME_MONTHS: f64 = 24.0;

pub fn summarize_saas(snapshots: &[MonthSnapshot], inputs: &SaasInputs) -> Option<SaasSummary> {
    let current = snapshots.first()?.clone();
    let projected = snapshots.last()?.clone();

    let active: Vec<&PricingTier> = inputs.tiers.iter().filter(|t| t.is_active()).collect();
    let clients: u64 = active.iter().map(|t| t.client_count as u64).sum();
    let revenue: f64 = active.iter().map(|t| t.monthly_revenue()).sum();
    let avg_client_value = if clients > 0 {
        revenue / clients as f64
    } else {
        0.0
    };

    let avg_lifetime_months = crate::metrics::average_lifespan(
        inputs.growth.monthly_churn_rate / 100.0,
        DEFAULT_LIFETIME_MONTHS,
    );

    let revenue_breakdown = active
        .iter()
        .map(|t| TierSnapshot {
            name: t.name.clone(),
            clients: t.client_count as u64,
            mrr: t.monthly_revenue(),
        })
        .collect();

    Some(SaasSummary {
        current,
        projected,
        avg_client_value,
        avg_lifetime_months,
        ltv: avg_client_value * avg_lifetime_months,
        revenue_breakdown,
    })
}

/// One month of a simple revenue growth series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub month: u32,
    pub revenue: f64,
    /// Month-over-month growth as a fraction (0 for the first month)
    pub growth: f64,
}

/// Revenue compounding at `growth_fraction` per month for months `1..=months`.
/// Month 1 is the starting revenue.
pub fn project_revenue_growth(start: f64, growth_fraction: f64, months: u32) -> Vec<RevenuePoint> {
    let mut points = Vec::with_capacity(months as usize);
    let mut revenue = start;
    for month in 1..=months {
        let previous = revenue;
        if month > 1 {
            revenue *= 1.0 + growth_fraction;
        }
        let growth = if month == 1 || previous == 0.0 {
            0.0
        } else {
            (revenue - previous) / previous
        };
        points.push(RevenuePoint {
            month,
            revenue,
            growth,
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanTier;
    use crate::rates;

    #[test]
    fn test_month_zero_is_initial_cohort() {
        for net in [-50.0, 0.0, 5.0, 20.0] {
            assert_eq!(project_clients(17, net, 0), 17);
        }
    }

    #[test]
    fn test_growth_law() {
        for month in 0..=24u32 {
            let expected = (10.0 * (1.0 + 5.0 / 100.0f64).powi(month as i32)).round() as u64;
            assert_eq!(project_clients(10, 5.0, month), expected);
        }
    }

    #[test]
    fn test_clients_never_negative() {
        assert_eq!(project_clients(10, -250.0, 3), 0);
        assert_eq!(project_clients(10, -100.0, 1), 0);
    }

    #[test]
    fn test_project_saas_length_and_month_zero() {
        let inputs = SaasInputs::default();
        let snapshots = project_saas(rates::plan(PlanTier::Pro), &inputs);
        assert_eq!(snapshots.len(), 13);

        let first = &snapshots[0];
        assert_eq!(first.total_clients, 17);
        assert_eq!(first.mrr, 2970.0 + 2485.0 + 1994.0);
        // Full cohort pays setup at month 0
        assert_eq!(first.setup_fees, 5000.0 + 5000.0 + 5000.0);
        // 17 clients × 50 × 120%
        assert!((first.rebilling_profit - 1020.0).abs() < 1e-9);
        assert_eq!(first.total_costs, 497.0 + 17.0 * 40.0);
        assert!((first.total_revenue - (first.mrr + first.rebilling_profit)).abs() < 1e-9);
    }

    #[test]
    fn test_project_saas_setup_fees_only_for_new_clients() {
        let inputs = SaasInputs {
            tiers: vec![PricingTier::new("Solo", 100.0, 10, 50.0)],
            ..Default::default()
        };
        let snapshots = project_saas(rates::plan(PlanTier::Pro), &inputs);
        for pair in snapshots.windows(2) {
            let new = pair[1].total_clients.saturating_sub(pair[0].total_clients);
            assert_eq!(pair[1].setup_fees, new as f64 * 50.0);
        }
    }

    #[test]
    fn test_project_saas_rounds_per_tier() {
        let inputs = SaasInputs {
            tiers: vec![
                PricingTier::new("A", 100.0, 3, 0.0),
                PricingTier::new("B", 100.0, 3, 0.0),
            ],
            growth: GrowthMetrics {
                monthly_growth_rate: 10.0,
                monthly_churn_rate: 0.0,
                projection_months: 1,
            },
            ..Default::default()
        };
        // 3 × 1.1 = 3.3 → 3 per tier, 6 total (6.6 would round to 7)
        let snapshots = project_saas(rates::plan(PlanTier::Pro), &inputs);
        assert_eq!(snapshots[1].total_clients, 6);
    }

    #[test]
    fn test_project_saas_gated_plan_has_no_rebilling_profit() {
        let snapshots = project_saas(rates::plan(PlanTier::Unlimited), &SaasInputs::default());
        assert!(snapshots.iter().all(|s| s.rebilling_profit == 0.0));
    }

    #[test]
    fn test_project_saas_without_tiers() {
        let inputs = SaasInputs {
            tiers: Vec::new(),
            ..Default::default()
        };
        let snapshots = project_saas(rates::plan(PlanTier::Pro), &inputs);
        assert!(snapshots.iter().all(|s| s.total_revenue == 0.0));
        assert!(snapshots.iter().all(|s| s.profit_margin == 0.0));
        assert_eq!(snapshots[0].net_profit, -497.0);
    }

    #[test]
    fn test_summarize_saas() {
        let inputs = SaasInputs::default();
        let snapshots = project_saas(rates::plan(PlanTier::Pro), &inputs);
        let summary = summarize_saas(&snapshots, &inputs).unwrap();

        assert_eq!(summary.current.month, 0);
        assert_eq!(summary.projected.month, 12);
        assert!((summary.avg_client_value - 7449.0 / 17.0).abs() < 1e-9);
        assert!((summary.avg_lifetime_months - 20.0).abs() < 1e-9);
        assert!((summary.ltv - summary.avg_client_value * 20.0).abs() < 1e-6);
        assert_eq!(summary.revenue_breakdown.len(), 3);
    }

    #[test]
    fn test_summarize_saas_no_churn_uses_fallback() {
        let inputs = SaasInputs {
            growth: GrowthMetrics {
                monthly_churn_rate: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let snapshots = project_saas(rates::plan(PlanTier::Pro), &inputs);
        let summary = summarize_saas(&snapshots, &inputs).unwrap();
        assert_eq!(summary.avg_lifetime_months, DEFAULT_LIFETIME_MONTHS);
    }

    #[test]
    fn test_project_revenue_growth() {
        let points = project_revenue_growth(1000.0, 0.1, 3);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].revenue, 1000.0);
        assert_eq!(points[0].growth, 0.0);
        assert!((points[1].revenue - 1100.0).abs() < 1e-9);
        assert!((points[2].revenue - 1210.0).abs() < 1e-9);
        assert!((points[2].growth - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_projection_idempotent() {
        let inputs = SaasInputs::default();
        let plan = rates::plan(PlanTier::Pro);
        assert_eq!(project_saas(plan, &inputs), project_saas(plan, &inputs));
    }
}
