//! Aggregation of per-service {cost, revenue} records
//!
//! Sums are plain f64 additions with no intermediate rounding. Category
//! subtotals are keyed by a `BTreeMap`, so output order does not depend on
//! input order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use crate::models::{PricingTier, ServiceCategory};

/// One priced service line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub category: ServiceCategory,
    pub cost: f64,
    pub revenue: f64,
}

impl LineItem {
    pub fn new(category: ServiceCategory, cost: f64, revenue: f64) -> Self {
        Self {
            category,
            cost,
            revenue,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Subtotal {
    pub cost: f64,
    pub revenue: f64,
}

impl Subtotal {
    pub fn profit(&self) -> f64 {
        self.revenue - self.cost
    }

    /// Profit as a fraction of revenue
    pub fn margin(&self) -> f64 {
        profit_margin(self.revenue, self.cost)
    }
}

impl Add for Subtotal {
    type Output = Subtotal;

    fn add(self, rhs: Subtotal) -> Subtotal {
        Subtotal {
            cost: self.cost + rhs.cost,
            revenue: self.revenue + rhs.revenue,
        }
    }
}

impl AddAssign for Subtotal {
    fn add_assign(&mut self, rhs: Subtotal) {
        *self = *self + rhs;
    }
}

impl From<&LineItem> for Subtotal {
    fn from(item: &LineItem) -> Self {
        Subtotal {
            cost: item.cost,
            revenue: item.revenue,
        }
    }
}

/// Category subtotals plus the grand total
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub by_category: BTreeMap<ServiceCategory, Subtotal>,
    pub total: Subtotal,
}

/// Sum line items into category subtotals and a grand total.
///
/// Empty input yields all zeros.
pub fn aggregate(items: &[LineItem]) -> Totals {
    let mut totals = Totals::default();
    for item in items {
        let sub = Subtotal::from(item);
        *totals.by_category.entry(item.category).or_default() += sub;
        totals.total += sub;
    }
    totals
}

/// Total monthly recurring revenue across active SaaS tiers
pub fn saas_revenue(tiers: &[PricingTier]) -> f64 {
    tiers.iter().map(PricingTier::monthly_revenue).sum()
}

/// Profit margin as a fraction of revenue (0.35 = 35%), 0 when revenue is 0
pub fn profit_margin(revenue: f64, costs: f64) -> f64 {
    if revenue == 0.0 {
        return 0.0;
    }
    (revenue - costs) / revenue
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample() -> Vec<LineItem> {
        vec![
            LineItem::new(ServiceCategory::Messaging, 11.3, 22.6),
            LineItem::new(ServiceCategory::Email, 3.375, 8.4375),
            LineItem::new(ServiceCategory::Ai, 10.0, 20.0),
            LineItem::new(ServiceCategory::Messaging, 0.1, 0.3),
            LineItem::new(ServiceCategory::Workflow, 20.0, 40.0),
        ]
    }

    #[test]
    fn test_empty_input_sums_to_zero() {
        let totals = aggregate(&[]);
        assert!(totals.by_category.is_empty());
        assert_eq!(totals.total, Subtotal::default());
    }

    #[test]
    fn test_category_subtotals() {
        let totals = aggregate(&sample());
        let messaging = totals.by_category[&ServiceCategory::Messaging];
        assert!((messaging.cost - 11.4).abs() < EPS);
        assert!((messaging.revenue - 22.9).abs() < EPS);
        assert_eq!(totals.by_category.len(), 4);
        assert!((totals.total.cost - 44.775).abs() < EPS);
    }

    #[test]
    fn test_aggregation_order_independent() {
        let items = sample();
        let forward = aggregate(&items);

        let mut reversed = items.clone();
        reversed.reverse();
        let backward = aggregate(&reversed);

        let mut rotated = items;
        rotated.rotate_left(2);
        let shifted = aggregate(&rotated);

        for other in [&backward, &shifted] {
            assert!((forward.total.cost - other.total.cost).abs() < EPS);
            assert!((forward.total.revenue - other.total.revenue).abs() < EPS);
            assert_eq!(
                forward.by_category.keys().collect::<Vec<_>>(),
                other.by_category.keys().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_aggregation_idempotent() {
        let items = sample();
        assert_eq!(aggregate(&items), aggregate(&items));
    }

    #[test]
    fn test_saas_revenue_skips_inactive() {
        let mut disabled = PricingTier::new("Legacy", 1000.0, 3, 0.0);
        disabled.enabled = false;
        let tiers = vec![
            PricingTier::new("Starter", 297.0, 10, 500.0),
            PricingTier::new("Pro", 497.0, 5, 1000.0),
            disabled,
        ];
        assert_eq!(saas_revenue(&tiers), 2970.0 + 2485.0);
    }

    #[test]
    fn test_profit_margin() {
        assert_eq!(profit_margin(0.0, 100.0), 0.0);
        assert!((profit_margin(1000.0, 650.0) - 0.35).abs() < EPS);
        assert!((Subtotal { cost: 50.0, revenue: 200.0 }.margin() - 0.75).abs() < EPS);
    }
}
