//! Usage-based services, fixed-price add-ons and the smaller price records
//! that hang off them (carrier fees, A2P registration, workflow tiers)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::plan::PlanTier;

/// Service category, shared by usage services and add-ons
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Messaging,
    Phone,
    Email,
    Ai,
    Workflow,
    Hosting,
    Compliance,
    Marketing,
    App,
}

impl ServiceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Messaging => "messaging",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Ai => "ai",
            Self::Workflow => "workflow",
            Self::Hosting => "hosting",
            Self::Compliance => "compliance",
            Self::Marketing => "marketing",
            Self::App => "app",
        }
    }

    /// Parse category from string (unknown names yield None)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "messaging" | "sms" => Some(Self::Messaging),
            "phone" | "voice" => Some(Self::Phone),
            "email" => Some(Self::Email),
            "ai" => Some(Self::Ai),
            "workflow" | "workflows" => Some(Self::Workflow),
            "hosting" => Some(Self::Hosting),
            "compliance" => Some(Self::Compliance),
            "marketing" => Some(Self::Marketing),
            "app" => Some(Self::App),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of measurement for usage pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageUnit {
    PerMinute,
    PerSegment,
    PerMessage,
    PerReview,
    PerImage,
    PerExecution,
    Per1000Emails,
    Per1000Verifications,
    Per1000Words,
}

impl UsageUnit {
    /// Quantity covered by one `rate`: 1000 for per-thousand units, 1 otherwise
    pub fn batch_size(self) -> f64 {
        match self {
            Self::Per1000Emails | Self::Per1000Verifications | Self::Per1000Words => 1000.0,
            _ => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PerMinute => "per minute",
            Self::PerSegment => "per segment",
            Self::PerMessage => "per message",
            Self::PerReview => "per review",
            Self::PerImage => "per image",
            Self::PerExecution => "per execution",
            Self::Per1000Emails => "per 1000 emails",
            Self::Per1000Verifications => "per 1000 verifications",
            Self::Per1000Words => "per 1000 words",
        }
    }
}

/// Metered service billed per unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageService {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    /// Price per `unit`, never negative
    pub rate: f64,
    pub unit: UsageUnit,
    pub description: String,
    pub rebillable: bool,
    pub markup_allowed: bool,
    #[serde(default)]
    pub minimum_plan: Option<PlanTier>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UsageService {
    /// Price of a single unit (per-thousand rates divided out)
    pub fn unit_price(&self) -> f64 {
        self.rate / self.unit.batch_size()
    }
}

/// Billing cycle for a fixed-price add-on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    SemiAnnual,
    Yearly,
    OneTime,
}

/// Fixed-price add-on service. At least one price field is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnService {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    #[serde(default)]
    pub monthly_price: Option<f64>,
    #[serde(default)]
    pub yearly_price: Option<f64>,
    #[serde(default)]
    pub semi_annual_price: Option<f64>,
    #[serde(default)]
    pub one_time_price: Option<f64>,
    pub description: String,
    /// Charged once per sub-account
    pub per_sub_account: bool,
    #[serde(default)]
    pub minimum_plan: Option<PlanTier>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AddOnService {
    /// Price for the given cycle, if the add-on is sold that way
    pub fn price_for(&self, cycle: BillingCycle) -> Option<f64> {
        match cycle {
            BillingCycle::Monthly => self.monthly_price,
            BillingCycle::SemiAnnual => self.semi_annual_price,
            BillingCycle::Yearly => self.yearly_price,
            BillingCycle::OneTime => self.one_time_price,
        }
    }

    /// First billing cycle with a price, in monthly → yearly order
    pub fn default_cycle(&self) -> BillingCycle {
        [
            BillingCycle::Monthly,
            BillingCycle::SemiAnnual,
            BillingCycle::Yearly,
            BillingCycle::OneTime,
        ]
        .into_iter()
        .find(|c| self.price_for(*c).is_some())
        .unwrap_or(BillingCycle::Monthly)
    }

    pub fn available_on(&self, tier: PlanTier) -> bool {
        self.minimum_plan.is_none_or(|min| tier >= min)
    }
}

/// Carrier surcharge applied per SMS/MMS segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierFee {
    pub carrier: String,
    pub fee_per_segment: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Carrier fee profile used by the messaging calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarrierProfile {
    AttTmobile,
    Verizon,
    #[default]
    Weighted,
}

/// A2P 10DLC registration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum A2PKind {
    LowVolume,
    HighVolume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A2PRegistration {
    pub kind: A2PKind,
    pub name: String,
    pub one_time_fee: f64,
    pub monthly_campaign_fee: f64,
    pub description: String,
}

/// Premium workflow execution tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTier {
    pub id: String,
    pub name: String,
    pub monthly_price: f64,
    pub executions_included: u64,
    /// Allocation is granted once, not per month
    pub lifetime: bool,
    pub description: String,
}

/// Suggested package an agency can sell to its own clients in SaaS mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientTier {
    pub id: String,
    pub name: String,
    pub suggested_price: f64,
    pub cost: f64,
    pub margin: f64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_price_per_thousand() {
        let svc = UsageService {
            id: "lc_email".to_string(),
            name: "LC Email".to_string(),
            category: ServiceCategory::Email,
            rate: 0.675,
            unit: UsageUnit::Per1000Emails,
            description: String::new(),
            rebillable: true,
            markup_allowed: true,
            minimum_plan: None,
            notes: None,
        };
        assert!((svc.unit_price() - 0.000675).abs() < 1e-12);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(ServiceCategory::parse("AI"), Some(ServiceCategory::Ai));
        assert_eq!(ServiceCategory::parse("sms"), Some(ServiceCategory::Messaging));
        assert_eq!(ServiceCategory::parse("fax"), None);
    }
}
