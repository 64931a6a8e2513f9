//! ratecard - Agency pricing calculator

mod cli;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use ratecard_core::models::{PlanTier, ServiceCategory};
use ratecard_core::{
    clamp_amount, cost, dashboard, export, markup, metrics, projection, rates, Scenario,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "ratecard",
    version,
    about = "Agency pricing calculator - costs, rebilling profit and SaaS projections",
    long_about = "Computes platform costs, usage costs, rebilling profit and SaaS revenue\n\
                  projections for a white-label marketing agency from a compiled-in price list.\n\
                  \n\
                  Inputs come from a scenario file (TOML, every section optional) or built-in\n\
                  defaults. Negative or missing values are clamped before calculation.\n\
                  \n\
                  Examples:\n\
                    ratecard rates --category ai         # Price list for one category\n\
                    ratecard agency --plan unlimited     # Monthly agency cost\n\
                    ratecard rebill --clients 25         # Rebilling profit for 25 clients\n\
                    ratecard saas --months 24            # SaaS revenue projection\n\
                    ratecard breakeven --fixed 2500 --price 297 --variable 50\n\
                    ratecard export --output snapshot.json\n\
                  \n\
                  Environment Variables:\n\
                    RATECARD_SCENARIO                    # Scenario file path\n\
                    RATECARD_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Scenario file (default: ~/.config/ratecard/scenario.toml when present)
    #[arg(long, global = true, env = "RATECARD_SCENARIO")]
    scenario: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the price list
    Rates {
        /// Only services in this category (messaging, phone, email, ai, workflow, ...)
        #[arg(long, short = 'c')]
        category: Option<String>,
    },
    /// Monthly agency cost: platform + usage + add-ons
    Agency {
        /// Plan tier (starter, unlimited, pro)
        #[arg(long)]
        plan: Option<PlanTier>,
        /// Bill the platform annually
        #[arg(long)]
        annual: bool,
        /// Number of sub-accounts
        #[arg(long)]
        sub_accounts: Option<u32>,
    },
    /// Usage cost breakdown (messaging, voice, email, AI, workflows)
    Usage,
    /// Rebilling revenue and profit across clients
    Rebill {
        /// Plan tier (starter, unlimited, pro)
        #[arg(long)]
        plan: Option<PlanTier>,
        /// Number of clients
        #[arg(long)]
        clients: Option<u32>,
    },
    /// SaaS revenue projection
    Saas {
        /// Projection period in months
        #[arg(long)]
        months: Option<u32>,
    },
    /// Profit dashboard: metrics, break-even, scenarios
    Dashboard,
    /// Break-even client count for ad-hoc numbers
    Breakeven {
        /// Monthly fixed costs
        #[arg(long)]
        fixed: f64,
        /// Revenue per client per month
        #[arg(long)]
        price: f64,
        /// Variable cost per client per month
        #[arg(long, default_value = "0")]
        variable: f64,
    },
    /// CLV, CAC payback and ROI for ad-hoc numbers
    Metrics {
        /// Average monthly revenue per client
        #[arg(long, default_value = "297")]
        revenue: f64,
        /// Average client lifespan in months (overrides --churn)
        #[arg(long)]
        lifespan: Option<f64>,
        /// Monthly churn in percent
        #[arg(long, default_value = "5")]
        churn: f64,
        /// Profit margin as a fraction (0.6 = 60%)
        #[arg(long, default_value = "0.6")]
        margin: f64,
        /// Cost to acquire one client
        #[arg(long)]
        cac: Option<f64>,
        /// Initial investment, for ROI (needs --final-value)
        #[arg(long, requires = "final_value")]
        investment: Option<f64>,
        /// Final value, for ROI (needs --investment)
        #[arg(long, requires = "investment")]
        final_value: Option<f64>,
    },
    /// Export the dashboard snapshot as JSON
    Export {
        /// Output file (default: profit-dashboard-YYYY-MM-DD.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let scenario = load_scenario(cli.scenario.clone())?;
    let json = cli.json;

    let output = match cli.command {
        Command::Rates { category } => run_rates(category, json)?,
        Command::Agency {
            plan,
            annual,
            sub_accounts,
        } => run_agency(&scenario, plan, annual, sub_accounts, json)?,
        Command::Usage => {
            let report = cost::usage_cost_report(&scenario.usage);
            cli::render_usage(&report, json)?
        }
        Command::Rebill { plan, clients } => run_rebill(&scenario, plan, clients, json)?,
        Command::Saas { months } => run_saas(&scenario, months, json)?,
        Command::Dashboard => {
            let dashboard = dashboard::build_dashboard(&scenario.dashboard);
            cli::render_dashboard(&dashboard, json)?
        }
        Command::Breakeven {
            fixed,
            price,
            variable,
        } => {
            let (fixed, price, variable) =
                (clamp_amount(fixed), clamp_amount(price), clamp_amount(variable));
            let result = metrics::break_even_clients(fixed, price, variable);
            cli::render_break_even(fixed, price, variable, result, json)?
        }
        Command::Metrics {
            revenue,
            lifespan,
            churn,
            margin,
            cac,
            investment,
            final_value,
        } => {
            let report = cli::MetricsReport::compute(
                clamp_amount(revenue),
                lifespan.map(clamp_amount),
                clamp_amount(churn) / 100.0,
                clamp_amount(margin),
                cac.map(clamp_amount),
                investment.map(clamp_amount).zip(final_value.map(clamp_amount)),
            );
            cli::render_metrics(&report, json)?
        }
        Command::Export { output } => run_export(&scenario, output)?,
    };

    println!("{output}");
    Ok(())
}

/// Logs go to stderr so `--json` output stays machine-readable
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("RATECARD_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore the error: a subscriber may already be installed
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn load_scenario(explicit: Option<PathBuf>) -> Result<Scenario> {
    match explicit {
        Some(path) => Scenario::load(&path)
            .with_context(|| format!("Failed to load scenario: {}", path.display())),
        None => {
            let default = dirs::home_dir()
                .map(|h| h.join(".config").join("ratecard").join("scenario.toml"));
            Scenario::load_or_default(default.as_deref()).context("Failed to load default scenario")
        }
    }
}

fn run_rates(category: Option<String>, json: bool) -> Result<String> {
    let category = match category {
        Some(name) => Some(
            ServiceCategory::parse(&name)
                .with_context(|| format!("Unknown category: {name}"))?,
        ),
        None => None,
    };
    cli::render_rates(category, json)
}

fn run_agency(
    scenario: &Scenario,
    plan: Option<PlanTier>,
    annual: bool,
    sub_accounts: Option<u32>,
    json: bool,
) -> Result<String> {
    let plan = rates::plan(plan.unwrap_or(scenario.plan));
    let billed_annually = annual || scenario.billed_annually;
    let sub_accounts = ratecard_core::clamp_count(sub_accounts.unwrap_or(scenario.sub_accounts));

    let breakdown = cost::agency_cost(
        plan,
        billed_annually,
        sub_accounts,
        &scenario.agency.usage,
        &scenario.agency.add_ons,
    );
    cli::render_agency(plan, billed_annually, &breakdown, json)
}

fn run_rebill(
    scenario: &Scenario,
    plan: Option<PlanTier>,
    clients: Option<u32>,
    json: bool,
) -> Result<String> {
    let plan = rates::plan(plan.unwrap_or(scenario.plan));
    let mut inputs = scenario.rebilling.clone();
    if let Some(clients) = clients {
        inputs.client_count = clients;
    }

    let report = markup::rebilling_report(plan, &inputs);
    let upgrade = markup::upgrade_analysis(
        rates::plan(PlanTier::Unlimited),
        rates::plan(PlanTier::Pro),
        &inputs,
    );
    cli::render_rebilling(plan, &report, &upgrade, json)
}

fn run_saas(scenario: &Scenario, months: Option<u32>, json: bool) -> Result<String> {
    let mut inputs = scenario.saas.clone();
    if let Some(months) = months {
        inputs.growth.projection_months = ratecard_core::clamp_count(months);
    }

    let snapshots = projection::project_saas(scenario.active_plan(), &inputs);
    let summary = projection::summarize_saas(&snapshots, &inputs)
        .context("Projection produced no months")?;
    cli::render_saas(&snapshots, &summary, json)
}

fn run_export(scenario: &Scenario, output: Option<PathBuf>) -> Result<String> {
    let path = output.unwrap_or_else(|| export::default_export_path(Utc::now().date_naive()));
    let dashboard = dashboard::build_dashboard(&scenario.dashboard);
    export::export_dashboard_to_json(&scenario.dashboard, &dashboard, &path)?;
    Ok(format!("Exported dashboard snapshot to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ratecard").chain(args.iter().copied()))
    }

    #[test]
    fn test_roi_needs_both_inputs() {
        assert!(parse(&["metrics", "--investment", "1000"]).is_err());
        assert!(parse(&["metrics", "--final-value", "1500"]).is_err());

        let cli = parse(&["metrics", "--investment", "1000", "--final-value", "1500"]).unwrap();
        match cli.command {
            Command::Metrics {
                investment,
                final_value,
                ..
            } => assert_eq!(investment.zip(final_value), Some((1000.0, 1500.0))),
            _ => panic!("expected metrics command"),
        }
    }

    #[test]
    fn test_breakeven_accepts_negative_numbers() {
        let cli = parse(&["breakeven", "--fixed=-100", "--price", "297"]).unwrap();
        match cli.command {
            Command::Breakeven { fixed, price, .. } => {
                let result = metrics::break_even_clients(clamp_amount(fixed), price, 0.0);
                assert_eq!(result.unwrap(), 0);
            }
            _ => panic!("expected breakeven command"),
        }
    }
}
