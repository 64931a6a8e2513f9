//! Profit dashboard analytics over a cost/revenue snapshot
//!
//! Takes the agency's current monthly costs and client revenue and derives
//! headline metrics, break-even, growth scenarios and trend series. All
//! series run from month 0 ("now") to `projection_months` inclusive.

use serde::{Deserialize, Serialize};

use crate::metrics;
use crate::projection::project_clients;

/// Monthly growth assumed when estimating time to break even
pub const ASSUMED_MONTHLY_GROWTH: f64 = 0.10;
/// Share of revenue growth that shows up as extra cost
pub const COST_GROWTH_SHARE: f64 = 0.6;
/// Client additions compared in the growth-impact table
pub const CLIENT_GROWTH_STEPS: [u32; 5] = [0, 10, 25, 50, 100];
/// Horizons (months) reported for each growth scenario
pub const SCENARIO_HORIZONS: [u32; 3] = [6, 12, 24];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyCosts {
    pub platform: f64,
    pub usage: f64,
    pub add_ons: f64,
}

impl Default for AgencyCosts {
    fn default() -> Self {
        Self {
            platform: 497.0,
            usage: 150.0,
            add_ons: 200.0,
        }
    }
}

impl AgencyCosts {
    pub fn total(&self) -> f64 {
        self.platform + self.usage + self.add_ons
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRevenue {
    pub subscriptions: f64,
    pub rebilling: f64,
    pub setup_fees: f64,
}

impl Default for ClientRevenue {
    fn default() -> Self {
        Self {
            subscriptions: 5000.0,
            rebilling: 1500.0,
            setup_fees: 500.0,
        }
    }
}

impl ClientRevenue {
    pub fn total(&self) -> f64 {
        self.subscriptions + self.rebilling + self.setup_fees
    }
}

/// Inputs of the profit dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardInputs {
    pub agency_costs: AgencyCosts,
    pub client_revenue: ClientRevenue,
    pub client_count: u32,
    pub projection_months: u32,
}

impl Default for DashboardInputs {
    fn default() -> Self {
        Self {
            agency_costs: AgencyCosts::default(),
            client_revenue: ClientRevenue::default(),
            client_count: 20,
            projection_months: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    /// Total monthly revenue
    pub mrr: f64,
    pub costs: f64,
    pub net_profit: f64,
    /// Percent of revenue
    pub profit_margin: f64,
    pub revenue_per_client: f64,
    pub cost_per_client: f64,
}

pub fn key_metrics(inputs: &DashboardInputs) -> KeyMetrics {
    let mrr = inputs.client_revenue.total();
    let costs = inputs.agency_costs.total();
    let net_profit = mrr - costs;
    let per_client = |amount: f64| {
        if inputs.client_count > 0 {
            amount / inputs.client_count as f64
        } else {
            0.0
        }
    };

    KeyMetrics {
        mrr,
        costs,
        net_profit,
        profit_margin: crate::aggregate::profit_margin(mrr, costs) * 100.0,
        revenue_per_client: per_client(mrr),
        cost_per_client: per_client(costs),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenAnalysis {
    pub fixed_costs: f64,
    pub variable_cost_per_client: f64,
    pub price_per_client: f64,
    /// None when the contribution margin is not positive
    pub break_even_clients: Option<u64>,
    /// None when break-even is not achievable or there are no clients to grow from
    pub months_to_break_even: Option<u64>,
    pub currently_profitable: bool,
}

/// Break-even for the current snapshot. Fixed costs are platform and
/// add-ons; usage is spread over the current clients as variable cost.
pub fn break_even_analysis(inputs: &DashboardInputs, metrics: &KeyMetrics) -> BreakEvenAnalysis {
    let fixed_costs = inputs.agency_costs.platform + inputs.agency_costs.add_ons;
    let clients = inputs.client_count as u64;
    let variable_cost_per_client = if clients > 0 {
        inputs.agency_costs.usage / clients as f64
    } else {
        0.0
    };
    let price_per_client = metrics.revenue_per_client;

    let break_even_clients =
        match metrics::break_even_clients(fixed_costs, price_per_client, variable_cost_per_client) {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::debug!(error = %e, "Break-even not achievable");
                None
            }
        };

    let months_to_break_even = break_even_clients.and_then(|target| {
        if clients >= target {
            Some(0)
        } else if clients == 0 {
            None
        } else {
            let gap = (target - clients) as f64;
            Some((gap / (clients as f64 * ASSUMED_MONTHLY_GROWTH)).ceil() as u64)
        }
    });

    BreakEvenAnalysis {
        fixed_costs,
        variable_cost_per_client,
        price_per_client,
        currently_profitable: break_even_clients.is_some_and(|target| clients >= target),
        break_even_clients,
        months_to_break_even,
    }
}

/// Named growth assumption, rates in percent per month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthScenario {
    pub name: &'static str,
    pub monthly_growth: f64,
    pub churn_rate: f64,
    /// Share of compounded growth that lifts the margin
    pub margin_factor: f64,
    /// Margin never projected above this percentage
    pub margin_cap: f64,
}

pub const SCENARIOS: [GrowthScenario; 3] = [
    GrowthScenario {
        name: "Conservative",
        monthly_growth: 5.0,
        churn_rate: 5.0,
        margin_factor: 0.3,
        margin_cap: 80.0,
    },
    GrowthScenario {
        name: "Moderate",
        monthly_growth: 10.0,
        churn_rate: 3.0,
        margin_factor: 0.4,
        margin_cap: 85.0,
    },
    GrowthScenario {
        name: "Aggressive",
        monthly_growth: 20.0,
        churn_rate: 2.0,
        margin_factor: 0.5,
        margin_cap: 90.0,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub months: u32,
    pub clients: u64,
    pub mrr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub name: String,
    pub monthly_growth: f64,
    pub churn_rate: f64,
    /// One point per horizon in `SCENARIO_HORIZONS`
    pub horizons: Vec<ScenarioPoint>,
}

pub fn scenario_metrics(client_count: u32, revenue_per_client: f64) -> Vec<ScenarioMetrics> {
    SCENARIOS
        .iter()
        .map(|s| {
            let net = s.monthly_growth - s.churn_rate;
            let horizons = SCENARIO_HORIZONS
                .iter()
                .map(|&months| {
                    let clients = project_clients(client_count, net, months);
                    ScenarioPoint {
                        months,
                        clients,
                        mrr: clients as f64 * revenue_per_client,
                    }
                })
                .collect();
            ScenarioMetrics {
                name: s.name.to_string(),
                monthly_growth: s.monthly_growth,
                churn_rate: s.churn_rate,
                horizons,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginTrendPoint {
    pub month: u32,
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

fn scenario_margin(base_margin: f64, scenario: &GrowthScenario, month: u32) -> f64 {
    let growth = (1.0 + scenario.monthly_growth / 100.0).powi(month as i32);
    (base_margin * (1.0 + (growth - 1.0) * scenario.margin_factor)).min(scenario.margin_cap)
}

pub fn margin_trend(base_margin: f64, months: u32) -> Vec<MarginTrendPoint> {
    let [conservative, moderate, aggressive] = &SCENARIOS;
    (0..=months)
        .map(|month| MarginTrendPoint {
            month,
            conservative: scenario_margin(base_margin, conservative, month),
            moderate: scenario_margin(base_margin, moderate, month),
            aggressive: scenario_margin(base_margin, aggressive, month),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientGrowthImpact {
    pub added_clients: u32,
    pub clients: u32,
    pub revenue: f64,
    pub profit: f64,
}

/// Revenue and profit if `CLIENT_GROWTH_STEPS` clients were added at
/// today's per-client economics. The first row is the current snapshot.
pub fn client_growth_impact(
    inputs: &DashboardInputs,
    metrics: &KeyMetrics,
) -> Vec<ClientGrowthImpact> {
    CLIENT_GROWTH_STEPS
        .iter()
        .map(|&added| {
            let clients = inputs.client_count.saturating_add(added);
            if added == 0 {
                ClientGrowthImpact {
                    added_clients: 0,
                    clients,
                    revenue: metrics.mrr,
                    profit: metrics.net_profit,
                }
            } else {
                let n = clients as f64;
                ClientGrowthImpact {
                    added_clients: added,
                    clients,
                    revenue: n * metrics.revenue_per_client,
                    profit: n * (metrics.revenue_per_client - metrics.cost_per_client),
                }
            }
        })
        .collect()
}

/// Revenue vs cost point, rounded to whole dollars for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
}

/// Revenue compounding at 10% a month while costs grow at 60% of that pace
pub fn revenue_cost_projection(metrics: &KeyMetrics, months: u32) -> Vec<ProjectionPoint> {
    (0..=months)
        .map(|month| {
            let multiplier = (1.0 + ASSUMED_MONTHLY_GROWTH).powi(month as i32);
            let revenue = metrics.mrr * multiplier;
            let costs = metrics.costs * (1.0 + (multiplier - 1.0) * COST_GROWTH_SHARE);
            ProjectionPoint {
                month,
                revenue: revenue.round(),
                costs: costs.round(),
                profit: (revenue - costs).round(),
            }
        })
        .collect()
}

/// Everything the dashboard shows, computed in one pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub metrics: KeyMetrics,
    pub break_even: BreakEvenAnalysis,
    pub scenarios: Vec<ScenarioMetrics>,
    pub margin_trend: Vec<MarginTrendPoint>,
    pub client_growth: Vec<ClientGrowthImpact>,
    pub projection: Vec<ProjectionPoint>,
}

pub fn build_dashboard(inputs: &DashboardInputs) -> Dashboard {
    tracing::debug!(
        clients = inputs.client_count,
        months = inputs.projection_months,
        "Building profit dashboard"
    );
    let metrics = key_metrics(inputs);
    Dashboard {
        break_even: break_even_analysis(inputs, &metrics),
        scenarios: scenario_metrics(inputs.client_count, metrics.revenue_per_client),
        margin_trend: margin_trend(metrics.profit_margin, inputs.projection_months),
        client_growth: client_growth_impact(inputs, &metrics),
        projection: revenue_cost_projection(&metrics, inputs.projection_months),
        metrics,
    }
}
