//! Agency subscription plans

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// Plan tier levels, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Starter,
    Unlimited,
    Pro,
}

impl PlanTier {
    pub const ALL: [PlanTier; 3] = [PlanTier::Starter, PlanTier::Unlimited, PlanTier::Pro];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Unlimited => "unlimited",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = CalcError;

    /// Accepts tier ids and the monthly price shorthands ("97", "297", "497")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starter" | "97" => Ok(Self::Starter),
            "unlimited" | "297" => Ok(Self::Unlimited),
            "pro" | "saas" | "497" => Ok(Self::Pro),
            other => Err(CalcError::UnknownPlan {
                id: other.to_string(),
            }),
        }
    }
}

/// Core subscription plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanTier,
    pub name: String,
    pub description: String,
    /// Monthly price in USD
    pub monthly_price: f64,
    /// Annual price in USD (never above 12 monthly payments)
    pub yearly_price: f64,
    /// Included sub-accounts (None = unlimited)
    pub sub_accounts: Option<u32>,
    pub features: Vec<String>,
    /// Can rebill usage to clients at cost
    pub rebilling_at_cost: bool,
    /// Can add a markup when rebilling
    pub allows_markup: bool,
    pub saas_mode: bool,
    #[serde(default)]
    pub recommended: bool,
}

impl Plan {
    /// Savings from paying yearly instead of 12 monthly payments
    pub fn yearly_savings(&self) -> f64 {
        self.monthly_price * 12.0 - self.yearly_price
    }

    /// Platform cost for one month under the chosen billing cycle
    pub fn platform_cost(&self, billed_annually: bool) -> f64 {
        if billed_annually {
            self.yearly_price / 12.0
        } else {
            self.monthly_price
        }
    }

    /// Clamp a requested sub-account count to what the plan includes
    pub fn clamp_sub_accounts(&self, requested: u32) -> u32 {
        match self.sub_accounts {
            Some(max) => requested.min(max),
            None => requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tier() {
        assert_eq!("starter".parse::<PlanTier>().unwrap(), PlanTier::Starter);
        assert_eq!("297".parse::<PlanTier>().unwrap(), PlanTier::Unlimited);
        assert_eq!(" PRO ".parse::<PlanTier>().unwrap(), PlanTier::Pro);
        assert!("agency".parse::<PlanTier>().is_err());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(PlanTier::Starter < PlanTier::Unlimited);
        assert!(PlanTier::Unlimited < PlanTier::Pro);
    }
}
