//! Data models for ratecard

pub mod plan;
pub mod saas;
pub mod service;

pub use plan::{Plan, PlanTier};
pub use saas::{GrowthMetrics, PricingTier};
pub use service::{
    A2PKind, A2PRegistration, AddOnService, BillingCycle, CarrierFee, CarrierProfile, ClientTier,
    ServiceCategory, UsageService, UsageUnit, WorkflowTier,
};
