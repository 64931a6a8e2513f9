//! SaaS-mode records: the packages an agency sells and how its client base grows

use serde::{Deserialize, Serialize};

/// Package an agency sells to its own clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTier {
    pub name: String,
    pub monthly_price: f64,
    /// Clients on this tier at month 0
    pub client_count: u32,
    /// One-time fee charged to every new client
    pub setup_fee: f64,
    pub enabled: bool,
}

impl Default for PricingTier {
    fn default() -> Self {
        Self {
            name: String::new(),
            monthly_price: 0.0,
            client_count: 0,
            setup_fee: 0.0,
            enabled: true,
        }
    }
}

impl PricingTier {
    pub fn new(name: &str, monthly_price: f64, client_count: u32, setup_fee: f64) -> Self {
        Self {
            name: name.to_string(),
            monthly_price,
            client_count,
            setup_fee,
            enabled: true,
        }
    }

    /// Disabled tiers and tiers without clients contribute nothing
    pub fn is_active(&self) -> bool {
        self.enabled && self.client_count > 0
    }

    /// Monthly revenue at the initial client count (0 when inactive)
    pub fn monthly_revenue(&self) -> f64 {
        if self.is_active() {
            self.client_count as f64 * self.monthly_price
        } else {
            0.0
        }
    }
}

/// Monthly growth assumptions, rates in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthMetrics {
    pub monthly_growth_rate: f64,
    pub monthly_churn_rate: f64,
    pub projection_months: u32,
}

impl Default for GrowthMetrics {
    fn default() -> Self {
        Self {
            monthly_growth_rate: 10.0,
            monthly_churn_rate: 5.0,
            projection_months: 12,
        }
    }
}

impl GrowthMetrics {
    /// Effective compounding rate: growth − churn
    pub fn net_growth_rate(&self) -> f64 {
        self.monthly_growth_rate - self.monthly_churn_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_tiers_contribute_nothing() {
        let mut tier = PricingTier::new("Starter", 297.0, 10, 500.0);
        assert_eq!(tier.monthly_revenue(), 2970.0);

        tier.enabled = false;
        assert_eq!(tier.monthly_revenue(), 0.0);

        let empty = PricingTier::new("Empty", 997.0, 0, 0.0);
        assert!(!empty.is_active());
    }

    #[test]
    fn test_net_growth_rate() {
        assert_eq!(GrowthMetrics::default().net_growth_rate(), 5.0);
    }
}
