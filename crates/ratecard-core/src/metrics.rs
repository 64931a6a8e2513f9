//! Derived business metrics
//!
//! Two failure policies coexist here:
//!
//! - [`break_even_clients`] and [`cac_payback_months`] have hard
//!   preconditions and return [`CalcError::InvalidInput`] when they fail.
//! - Everything else soft-defaults on a zero denominator (ROI, churn rate,
//!   lifespan) because zero is an ordinary value while inputs are edited.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Clients needed to cover `fixed_costs`: `ceil(fixed / (price − variable))`
///
/// # Errors
///
/// Returns `InvalidInput` when the contribution margin is not positive
/// (zero, negative or NaN).
///
/// # Examples
///
/// ```
/// use ratecard_core::metrics::break_even_clients;
///
/// assert_eq!(break_even_clients(2500.0, 297.0, 50.0).unwrap(), 11);
/// assert!(break_even_clients(1000.0, 50.0, 50.0).is_err());
/// ```
pub fn break_even_clients(
    fixed_costs: f64,
    price_per_client: f64,
    variable_cost_per_client: f64,
) -> CalcResult<u64> {
    let contribution_margin = price_per_client - variable_cost_per_client;
    if !(contribution_margin > 0.0) {
        return Err(CalcError::invalid_input(format!(
            "price per client ({price_per_client}) must exceed \
             variable cost per client ({variable_cost_per_client})"
        )));
    }
    Ok((fixed_costs.max(0.0) / contribution_margin).ceil() as u64)
}

/// Months to recover the cost of acquiring one client
///
/// # Errors
///
/// Returns `InvalidInput` when `monthly_profit_per_client` is not positive
/// (including NaN).
pub fn cac_payback_months(
    acquisition_cost: f64,
    monthly_profit_per_client: f64,
) -> CalcResult<f64> {
    if !(monthly_profit_per_client > 0.0) {
        return Err(CalcError::invalid_input(format!(
            "monthly profit per client must be greater than zero (got {monthly_profit_per_client})"
        )));
    }
    Ok(acquisition_cost / monthly_profit_per_client)
}

/// Average client lifespan in months: `1 / churn` (churn as a fraction),
/// or `fallback_months` when there is no churn
pub fn average_lifespan(churn_fraction: f64, fallback_months: f64) -> f64 {
    if churn_fraction > 0.0 {
        1.0 / churn_fraction
    } else {
        fallback_months
    }
}

/// Customer lifetime value: `revenue × lifespan × margin`
pub fn customer_lifetime_value(avg_monthly_revenue: f64, lifespan_months: f64, margin: f64) -> f64 {
    avg_monthly_revenue * lifespan_months * margin
}

/// CLV with the lifespan derived from a churn fraction
pub fn customer_lifetime_value_from_churn(
    avg_monthly_revenue: f64,
    churn_fraction: f64,
    margin: f64,
    fallback_months: f64,
) -> f64 {
    customer_lifetime_value(
        avg_monthly_revenue,
        average_lifespan(churn_fraction, fallback_months),
        margin,
    )
}

/// Return on investment as a fraction, 0 when nothing was invested
pub fn roi(initial_investment: f64, final_value: f64) -> f64 {
    if initial_investment == 0.0 {
        return 0.0;
    }
    (final_value - initial_investment) / initial_investment
}

/// Volume discount tier: `discount` (fraction) applies from `threshold` units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub threshold: f64,
    pub discount: f64,
}

/// Discount for `quantity`: the tier with the highest threshold not above it,
/// 0 when no tier matches. Equal thresholds keep the first listed tier.
pub fn applicable_discount(quantity: f64, tiers: &[DiscountTier]) -> f64 {
    let mut sorted: Vec<&DiscountTier> = tiers.iter().collect();
    // Stable sort, so ties keep input order
    sorted.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
    sorted
        .into_iter()
        .find(|t| quantity >= t.threshold)
        .map(|t| t.discount)
        .unwrap_or(0.0)
}

/// Total price after volume discount: `base × (1 − discount) × quantity`
pub fn volume_discount_price(base_price: f64, quantity: f64, tiers: &[DiscountTier]) -> f64 {
    base_price * (1.0 - applicable_discount(quantity, tiers)) * quantity
}

/// Annual contract value: `mrr × 12 + one_time_fees`
pub fn annual_contract_value(monthly_recurring: f64, one_time_fees: f64) -> f64 {
    monthly_recurring * 12.0 + one_time_fees
}

/// Churn over a period as a fraction of the starting count, never negative
pub fn churn_rate(starting: f64, ending: f64, new: f64) -> f64 {
    if starting == 0.0 {
        return 0.0;
    }
    ((starting + new - ending) / starting).max(0.0)
}

/// Monthly revenue after churn losses: `count × price × (1 − churn)`
pub fn net_client_revenue(client_count: f64, avg_price: f64, churn_fraction: f64) -> f64 {
    let gross = client_count * avg_price;
    gross - gross * churn_fraction
}

pub fn monthly_from_annual(annual: f64) -> f64 {
    annual / 12.0
}

/// Savings of the annual price over twelve monthly payments
pub fn annual_savings(monthly: f64, annual: f64) -> f64 {
    monthly * 12.0 - annual
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_break_even_fixture() {
        // 2500 / 247 = 10.12 → 11
        assert_eq!(break_even_clients(2500.0, 297.0, 50.0).unwrap(), 11);
    }

    #[test]
    fn test_break_even_exact_division() {
        assert_eq!(break_even_clients(1000.0, 150.0, 50.0).unwrap(), 10);
        assert_eq!(break_even_clients(0.0, 150.0, 50.0).unwrap(), 0);
    }

    #[test]
    fn test_break_even_zero_margin_fails() {
        let err = break_even_clients(1000.0, 50.0, 50.0).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(break_even_clients(1000.0, 40.0, 50.0).is_err());
    }

    #[test]
    fn test_break_even_nan_inputs_fail() {
        assert!(break_even_clients(1000.0, f64::NAN, 50.0)
            .unwrap_err()
            .is_invalid_input());
        assert!(break_even_clients(1000.0, 297.0, f64::NAN)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_cac_payback() {
        assert!((cac_payback_months(500.0, 200.0).unwrap() - 2.5).abs() < EPS);
        assert!(cac_payback_months(500.0, 0.0).unwrap_err().is_invalid_input());
        assert!(cac_payback_months(500.0, -10.0).is_err());
        assert!(cac_payback_months(500.0, f64::NAN)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_clv_worked_example() {
        assert!((customer_lifetime_value(297.0, 24.0, 0.6) - 4276.80).abs() < 1e-6);
    }

    #[test]
    fn test_clv_from_churn() {
        // 5% churn → 20 months
        let clv = customer_lifetime_value_from_churn(100.0, 0.05, 0.5, 24.0);
        assert!((clv - 1000.0).abs() < 1e-6);
        // No churn → fallback horizon
        assert_eq!(customer_lifetime_value_from_churn(100.0, 0.0, 0.5, 24.0), 1200.0);
    }

    #[test]
    fn test_roi() {
        assert_eq!(roi(0.0, 5000.0), 0.0);
        assert!((roi(1000.0, 1500.0) - 0.5).abs() < EPS);
        assert!((roi(1000.0, 500.0) + 0.5).abs() < EPS);
    }

    #[test]
    fn test_volume_discount_selection() {
        let tiers = [
            DiscountTier {
                threshold: 100.0,
                discount: 0.1,
            },
            DiscountTier {
                threshold: 50.0,
                discount: 0.05,
            },
        ];
        assert_eq!(applicable_discount(75.0, &tiers), 0.05);
        assert_eq!(applicable_discount(10.0, &tiers), 0.0);
        assert_eq!(applicable_discount(100.0, &tiers), 0.1);
        assert!((volume_discount_price(2.0, 75.0, &tiers) - 142.5).abs() < EPS);
        assert_eq!(volume_discount_price(2.0, 10.0, &tiers), 20.0);
    }

    #[test]
    fn test_volume_discount_tie_keeps_first() {
        let tiers = [
            DiscountTier {
                threshold: 50.0,
                discount: 0.2,
            },
            DiscountTier {
                threshold: 50.0,
                discount: 0.05,
            },
        ];
        assert_eq!(applicable_discount(60.0, &tiers), 0.2);
    }

    #[test]
    fn test_volume_discount_empty_tiers() {
        assert_eq!(applicable_discount(1e6, &[]), 0.0);
    }

    #[test]
    fn test_acv_and_monthly() {
        assert_eq!(annual_contract_value(297.0, 500.0), 4064.0);
        assert_eq!(monthly_from_annual(2970.0), 247.5);
        assert_eq!(annual_savings(297.0, 2970.0), 594.0);
    }

    #[test]
    fn test_churn_rate() {
        assert_eq!(churn_rate(0.0, 10.0, 10.0), 0.0);
        assert!((churn_rate(100.0, 95.0, 5.0) - 0.1).abs() < EPS);
        // More growth than churn clamps at 0
        assert_eq!(churn_rate(100.0, 150.0, 10.0), 0.0);
    }

    #[test]
    fn test_net_client_revenue() {
        assert!((net_client_revenue(10.0, 297.0, 0.05) - 2821.5).abs() < EPS);
        assert_eq!(net_client_revenue(10.0, 297.0, 0.0), 2970.0);
    }
}
