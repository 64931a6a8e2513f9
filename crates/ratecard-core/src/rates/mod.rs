//! Rate table lookups
//!
//! Unit economics as pure data. All lookups are by id and return `None` for
//! unknown ids. There is no fallback rate.
//!
//! # Examples
//!
//! ```
//! use ratecard_core::rates;
//!
//! let sms = rates::usage_service("sms_outbound").unwrap();
//! assert_eq!(sms.rate, 0.0083);
//! assert!(rates::usage_service("fax_outbound").is_none());
//! ```

pub mod embedded;

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::{
    A2PKind, A2PRegistration, AddOnService, CarrierFee, CarrierProfile, ClientTier, Plan, PlanTier,
    ServiceCategory, UsageService, WorkflowTier,
};

pub use embedded::{
    carrier_profile_fee, A2P_CAMPAIGN_FEE, AI_UNLIMITED_PER_SUB_ACCOUNT, DEFAULT_CARRIER_FEE,
    SMS_SEGMENT_RATE, WORKFLOW_EXECUTION_RATE,
};

static USAGE_INDEX: Lazy<HashMap<&'static str, &'static UsageService>> = Lazy::new(|| {
    embedded::USAGE_SERVICES
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect()
});

static ADD_ON_INDEX: Lazy<HashMap<&'static str, &'static AddOnService>> = Lazy::new(|| {
    embedded::ADD_ONS.iter().map(|a| (a.id.as_str(), a)).collect()
});

/// All core plans, lowest tier first
pub fn plans() -> &'static [Plan] {
    &embedded::CORE_PLANS
}

/// Get plan by tier (every tier is listed, so this always succeeds)
pub fn plan(tier: PlanTier) -> &'static Plan {
    embedded::CORE_PLANS
        .iter()
        .find(|p| p.id == tier)
        .unwrap_or(&embedded::CORE_PLANS[0])
}

/// Get plan by id string ("starter", "unlimited", "pro")
pub fn plan_by_id(id: &str) -> Option<&'static Plan> {
    let tier: PlanTier = id.parse().ok()?;
    Some(plan(tier))
}

pub fn usage_services() -> &'static [UsageService] {
    &embedded::USAGE_SERVICES
}

/// Get usage service by id
pub fn usage_service(id: &str) -> Option<&'static UsageService> {
    USAGE_INDEX.get(id).copied()
}

pub fn add_ons() -> &'static [AddOnService] {
    &embedded::ADD_ONS
}

/// Get add-on service by id
pub fn add_on(id: &str) -> Option<&'static AddOnService> {
    ADD_ON_INDEX.get(id).copied()
}

/// A category listing entry: either a metered service or a fixed add-on
#[derive(Debug, Clone, Copy)]
pub enum ServiceRef<'a> {
    Usage(&'a UsageService),
    AddOn(&'a AddOnService),
}

impl ServiceRef<'_> {
    pub fn id(&self) -> &str {
        match self {
            ServiceRef::Usage(s) => &s.id,
            ServiceRef::AddOn(a) => &a.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ServiceRef::Usage(s) => &s.name,
            ServiceRef::AddOn(a) => &a.name,
        }
    }
}

/// All usage services then all add-ons in `category`, in table order
pub fn services_by_category(category: ServiceCategory) -> Vec<ServiceRef<'static>> {
    usage_services()
        .iter()
        .filter(|s| s.category == category)
        .map(ServiceRef::Usage)
        .chain(
            add_ons()
                .iter()
                .filter(|a| a.category == category)
                .map(ServiceRef::AddOn),
        )
        .collect()
}

pub fn carrier_fees() -> &'static [CarrierFee] {
    &embedded::CARRIER_FEES
}

/// Per-segment carrier surcharge for a messaging profile
pub fn carrier_fee(profile: CarrierProfile) -> f64 {
    carrier_profile_fee(profile)
}

pub fn a2p_registration(kind: A2PKind) -> Option<&'static A2PRegistration> {
    embedded::A2P_REGISTRATIONS.iter().find(|r| r.kind == kind)
}

/// One-time registration fee plus the first monthly campaign fee
pub fn a2p_first_month_cost(kind: A2PKind) -> f64 {
    a2p_registration(kind)
        .map(|r| r.one_time_fee + r.monthly_campaign_fee)
        .unwrap_or(0.0)
}

pub fn workflow_tiers() -> &'static [WorkflowTier] {
    &embedded::WORKFLOW_TIERS
}

pub fn saas_client_tiers() -> &'static [ClientTier] {
    &embedded::SAAS_CLIENT_TIERS
}

/// Savings from paying `yearly` instead of twelve times `monthly`
pub fn yearly_savings(monthly: f64, yearly: f64) -> f64 {
    monthly * 12.0 - yearly
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_prices() {
        assert_eq!(plan(PlanTier::Starter).monthly_price, 97.0);
        assert_eq!(plan(PlanTier::Unlimited).monthly_price, 297.0);
        assert_eq!(plan(PlanTier::Pro).monthly_price, 497.0);
    }

    #[test]
    fn test_yearly_never_exceeds_twelve_months() {
        for p in plans() {
            assert!(p.yearly_price <= p.monthly_price * 12.0, "{}", p.id);
        }
    }

    #[test]
    fn test_only_pro_allows_markup() {
        let allowed: Vec<_> = plans()
            .iter()
            .filter(|p| p.allows_markup)
            .map(|p| p.id)
            .collect();
        assert_eq!(allowed, vec![PlanTier::Pro]);
    }

    #[test]
    fn test_plan_by_id() {
        assert_eq!(plan_by_id("unlimited").unwrap().id, PlanTier::Unlimited);
        assert!(plan_by_id("enterprise").is_none());
    }

    #[test]
    fn test_usage_service_lookup() {
        let svc = usage_service("call_inbound").unwrap();
        assert_eq!(svc.rate, 0.01165);
        assert_eq!(svc.category, ServiceCategory::Phone);
    }

    #[test]
    fn test_unknown_ids_are_absent() {
        assert!(usage_service("").is_none());
        assert!(usage_service("SMS_OUTBOUND").is_none());
        assert!(add_on("hipaa_plus").is_none());
    }

    #[test]
    fn test_rates_non_negative() {
        assert!(usage_services().iter().all(|s| s.rate >= 0.0));
    }

    #[test]
    fn test_add_ons_have_a_price() {
        for a in add_ons() {
            assert!(
                a.monthly_price.is_some()
                    || a.yearly_price.is_some()
                    || a.semi_annual_price.is_some()
                    || a.one_time_price.is_some(),
                "{} has no price",
                a.id
            );
        }
    }

    #[test]
    fn test_services_by_category_mixes_usage_and_add_ons() {
        let email = services_by_category(ServiceCategory::Email);
        let ids: Vec<_> = email.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["lc_email", "email_verification", "dedicated_ip"]);
    }

    #[test]
    fn test_a2p_first_month() {
        assert!((a2p_first_month_cost(A2PKind::LowVolume) - 35.525).abs() < 1e-9);
        assert!((a2p_first_month_cost(A2PKind::HighVolume) - 82.935).abs() < 1e-9);
    }

    #[test]
    fn test_yearly_savings() {
        assert_eq!(yearly_savings(297.0, 2970.0), 594.0);
        assert_eq!(plan(PlanTier::Pro).yearly_savings(), 994.0);
    }

    #[test]
    fn test_carrier_fee_profiles() {
        assert_eq!(carrier_fee(CarrierProfile::AttTmobile), DEFAULT_CARRIER_FEE);
        assert_eq!(carrier_fee(CarrierProfile::Weighted), 0.0038);
        assert_eq!(carrier_fees().len(), 3);
    }
}
