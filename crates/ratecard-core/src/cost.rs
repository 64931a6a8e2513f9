//! Cost functions: (volume, rate, modifiers) → monthly cost
//!
//! Every function here is total over non-negative input and monotonically
//! non-decreasing in volume. Inputs are assumed already clamped (see
//! `scenario::clamp_amount`); nothing is rounded, formatting happens at
//! output time.
//!
//! # Pricing Formula
//!
//! ```text
//! Metered:       cost = volume × unit_rate
//! Per-1000:      cost = (volume / 1000) × rate_per_thousand
//! SMS:           cost = segments × (base_rate + carrier_fee)
//! Add-on:        cost = price(cycle) × (sub_accounts if per_sub_account else 1)
//! ```
//!
//! # Examples
//!
//! ```
//! use ratecard_core::cost::sms_cost;
//!
//! let cost = sms_cost(1000.0, 0.0083, 0.003);
//! assert!((cost - 11.30).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{
    AddOnService, BillingCycle, CarrierProfile, Plan, UsageService, WorkflowTier,
};
use crate::rates;

// ============================================================================
// Primitive cost functions
// ============================================================================

/// Metered cost: `volume × unit_rate`
pub fn metered_cost(volume: f64, unit_rate: f64) -> f64 {
    volume * unit_rate
}

/// Per-thousand cost: `(volume / 1000) × rate_per_thousand`
pub fn per_thousand_cost(volume: f64, rate_per_thousand: f64) -> f64 {
    (volume / 1000.0) * rate_per_thousand
}

/// SMS cost including the carrier surcharge on every segment
pub fn sms_cost(segments: f64, base_rate: f64, carrier_fee: f64) -> f64 {
    segments * (base_rate + carrier_fee)
}

/// Cost of `volume` units of a rate-table service, honouring its unit
pub fn service_cost(service: &UsageService, volume: f64) -> f64 {
    (volume / service.unit.batch_size()) * service.rate
}

/// Cost with an included allowance: only units above `included` are billed
pub fn usage_cost_with_included(quantity: f64, included: f64, unit_rate: f64) -> f64 {
    (quantity - included).max(0.0) * unit_rate
}

/// Charge for one billing cycle of an add-on, or None if it is not sold on
/// that cycle. Per-sub-account add-ons are multiplied by `sub_accounts`.
pub fn add_on_cost(add_on: &AddOnService, cycle: BillingCycle, sub_accounts: u32) -> Option<f64> {
    let price = add_on.price_for(cycle)?;
    let multiplier = if add_on.per_sub_account {
        sub_accounts as f64
    } else {
        1.0
    };
    Some(price * multiplier)
}

/// Spread a charge over the months it covers. One-time charges land in full
/// on the month they are paid.
pub fn monthly_equivalent(amount: f64, cycle: BillingCycle) -> f64 {
    match cycle {
        BillingCycle::Monthly | BillingCycle::OneTime => amount,
        BillingCycle::SemiAnnual => amount / 6.0,
        BillingCycle::Yearly => amount / 12.0,
    }
}

fn unit_price(id: &str) -> f64 {
    match rates::usage_service(id) {
        Some(service) => service.unit_price(),
        None => {
            tracing::warn!(service = id, "Service missing from rate table, pricing at 0");
            0.0
        }
    }
}

fn monthly_add_on_price(id: &str) -> f64 {
    match rates::add_on(id).and_then(|a| a.monthly_price) {
        Some(price) => price,
        None => {
            tracing::warn!(add_on = id, "Add-on missing from rate table, pricing at 0");
            0.0
        }
    }
}

// ============================================================================
// Messaging (SMS / MMS)
// ============================================================================

/// Monthly SMS/MMS volumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingUsage {
    pub sms_segments: f64,
    pub mms_messages: f64,
    /// Share of MMS that is outbound, in percent (0-100)
    pub outbound_share_pct: f64,
    pub carrier: CarrierProfile,
}

impl Default for MessagingUsage {
    fn default() -> Self {
        Self {
            sms_segments: 0.0,
            mms_messages: 0.0,
            outbound_share_pct: 50.0,
            carrier: CarrierProfile::Weighted,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessagingCost {
    pub sms: f64,
    pub mms_outbound: f64,
    pub mms_inbound: f64,
    pub total: f64,
}

pub fn messaging_cost(usage: &MessagingUsage) -> MessagingCost {
    let carrier_fee = rates::carrier_fee(usage.carrier);
    let share = usage.outbound_share_pct.clamp(0.0, 100.0) / 100.0;

    let sms = sms_cost(usage.sms_segments, unit_price("sms_outbound"), carrier_fee);
    let mms_outbound = sms_cost(
        usage.mms_messages * share,
        unit_price("mms_outbound"),
        carrier_fee,
    );
    let mms_inbound = sms_cost(
        usage.mms_messages * (1.0 - share),
        unit_price("mms_inbound"),
        carrier_fee,
    );

    MessagingCost {
        sms,
        mms_outbound,
        mms_inbound,
        total: sms + mms_outbound + mms_inbound,
    }
}

// ============================================================================
// Voice
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceUsage {
    pub outbound_minutes: f64,
    pub inbound_minutes: f64,
    pub call_recording: bool,
    pub transcription: bool,
    pub voicemail_drops: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VoiceCost {
    pub outbound: f64,
    pub inbound: f64,
    pub recording: f64,
    pub transcription: f64,
    pub voicemail: f64,
    pub total: f64,
}

/// Recording and transcription are billed on all minutes, both directions
pub fn voice_cost(usage: &VoiceUsage) -> VoiceCost {
    let outbound = metered_cost(usage.outbound_minutes, unit_price("call_outbound"));
    let inbound = metered_cost(usage.inbound_minutes, unit_price("call_inbound"));
    let total_minutes = usage.outbound_minutes + usage.inbound_minutes;

    let recording = if usage.call_recording {
        metered_cost(total_minutes, unit_price("call_recording"))
    } else {
        0.0
    };
    let transcription = if usage.transcription {
        metered_cost(total_minutes, unit_price("call_transcription"))
    } else {
        0.0
    };
    let voicemail = metered_cost(usage.voicemail_drops, unit_price("voicemail_drop"));

    VoiceCost {
        outbound,
        inbound,
        recording,
        transcription,
        voicemail,
        total: outbound + inbound + recording + transcription + voicemail,
    }
}

// ============================================================================
// Email
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailUsage {
    pub emails_per_month: f64,
    pub verifications: f64,
    pub dedicated_ip: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmailCost {
    pub emails: f64,
    pub verifications: f64,
    pub dedicated_ip: f64,
    pub total: f64,
}

pub fn email_cost(usage: &EmailUsage) -> EmailCost {
    let emails = rates::usage_service("lc_email")
        .map(|s| service_cost(s, usage.emails_per_month))
        .unwrap_or_default();
    let verifications = rates::usage_service("email_verification")
        .map(|s| service_cost(s, usage.verifications))
        .unwrap_or_default();
    let dedicated_ip = if usage.dedicated_ip {
        monthly_add_on_price("dedicated_ip")
    } else {
        0.0
    };

    EmailCost {
        emails,
        verifications,
        dedicated_ip,
        total: emails + verifications + dedicated_ip,
    }
}

// ============================================================================
// AI services: metered vs unlimited
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiUsage {
    pub conversation_messages: f64,
    pub voice_minutes: f64,
    pub reviews: f64,
    pub content_words: f64,
    pub content_images: f64,
    pub workflow_executions: f64,
    /// Bill through the flat per-sub-account AI Employee plan
    pub use_unlimited: bool,
    pub sub_accounts: u32,
}

impl Default for AiUsage {
    fn default() -> Self {
        Self {
            conversation_messages: 0.0,
            voice_minutes: 0.0,
            reviews: 0.0,
            content_words: 0.0,
            content_images: 0.0,
            workflow_executions: 0.0,
            use_unlimited: false,
            sub_accounts: 1,
        }
    }
}

/// Which AI billing model is cheaper for the given usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiBilling {
    Metered,
    Unlimited,
}

/// Side-by-side AI billing comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiComparison {
    pub metered: f64,
    pub unlimited: f64,
    pub cheaper: AiBilling,
    /// `unlimited − metered`: positive when metered billing is cheaper
    pub savings: f64,
}

/// Compare a metered AI total against the flat plan for `sub_accounts`.
/// Ties go to metered billing.
pub fn compare_ai_billing(metered_total: f64, sub_accounts: u32) -> AiComparison {
    let unlimited = rates::AI_UNLIMITED_PER_SUB_ACCOUNT * sub_accounts as f64;
    let cheaper = if metered_total <= unlimited {
        AiBilling::Metered
    } else {
        AiBilling::Unlimited
    };
    AiComparison {
        metered: metered_total,
        unlimited,
        cheaper,
        savings: unlimited - metered_total,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiCost {
    pub conversation: f64,
    pub voice: f64,
    pub reviews: f64,
    pub content_words: f64,
    pub content_images: f64,
    pub workflow: f64,
    pub comparison: AiComparison,
    /// What the user pays under the billing model they selected
    pub total: f64,
}

pub fn ai_cost(usage: &AiUsage) -> AiCost {
    let conversation = metered_cost(usage.conversation_messages, unit_price("conversation_ai"));
    let voice = metered_cost(usage.voice_minutes, unit_price("voice_ai_engine"));
    let reviews = metered_cost(usage.reviews, unit_price("reviews_ai"));
    let content_words = rates::usage_service("content_ai_text")
        .map(|s| service_cost(s, usage.content_words))
        .unwrap_or_default();
    let content_images = metered_cost(usage.content_images, unit_price("content_ai_image"));
    let workflow = metered_cost(usage.workflow_executions, unit_price("workflow_ai"));

    let metered = conversation + voice + reviews + content_words + content_images + workflow;
    let comparison = compare_ai_billing(metered, usage.sub_accounts);
    let total = if usage.use_unlimited {
        comparison.unlimited
    } else {
        comparison.metered
    };

    AiCost {
        conversation,
        voice,
        reviews,
        content_words,
        content_images,
        workflow,
        comparison,
        total,
    }
}

// ============================================================================
// Premium workflows
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowCost {
    pub pay_per_use: f64,
    /// Cheapest paid tier whose allocation covers the executions, when it
    /// beats pay-per-use
    pub recommended_tier: Option<WorkflowTier>,
    /// Price of the recommended tier, or pay-per-use without one
    pub tier_cost: f64,
    /// `pay_per_use − total`, never negative
    pub savings: f64,
    /// Cheaper of pay-per-use and the cheapest covering tier
    pub total: f64,
}

/// Premium workflow bill for a month of `executions`
///
/// A tier covers the volume when `executions ≤ executions_included`. The
/// covering set only shrinks as volume grows, so the total never drops
/// when executions increase. Above the largest allocation the bill falls
/// back to pay-per-use.
pub fn workflow_cost(executions: f64) -> WorkflowCost {
    let pay_per_use = metered_cost(executions, rates::WORKFLOW_EXECUTION_RATE);

    let recommended_tier = rates::workflow_tiers()
        .iter()
        .filter(|t| !t.lifetime && executions <= t.executions_included as f64)
        .min_by(|a, b| a.monthly_price.total_cmp(&b.monthly_price))
        .filter(|t| t.monthly_price < pay_per_use)
        .cloned();

    let total = recommended_tier
        .as_ref()
        .map(|t| t.monthly_price)
        .unwrap_or(pay_per_use);

    WorkflowCost {
        pay_per_use,
        tier_cost: total,
        savings: pay_per_use - total,
        total,
        recommended_tier,
    }
}

// ============================================================================
// Usage calculator total
// ============================================================================

/// Inputs of the usage cost calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageInputs {
    pub messaging: MessagingUsage,
    pub voice: VoiceUsage,
    pub email: EmailUsage,
    pub ai: AiUsage,
    pub workflow_executions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageCostReport {
    pub messaging: MessagingCost,
    pub voice: VoiceCost,
    pub email: EmailCost,
    pub ai: AiCost,
    pub workflow: WorkflowCost,
    pub monthly: f64,
    pub per_sub_account: f64,
    pub annual: f64,
}

pub fn usage_cost_report(inputs: &UsageInputs) -> UsageCostReport {
    let messaging = messaging_cost(&inputs.messaging);
    let voice = voice_cost(&inputs.voice);
    let email = email_cost(&inputs.email);
    let ai = ai_cost(&inputs.ai);
    let workflow = workflow_cost(inputs.workflow_executions);

    let monthly = messaging.total + voice.total + email.total + ai.total + workflow.total;
    let per_sub_account = if inputs.ai.sub_accounts > 0 {
        monthly / inputs.ai.sub_accounts as f64
    } else {
        monthly
    };

    UsageCostReport {
        messaging,
        voice,
        email,
        ai,
        workflow,
        monthly,
        per_sub_account,
        annual: monthly * 12.0,
    }
}

// ============================================================================
// Agency cost (plan + usage + add-ons)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyUsage {
    pub sms_segments: f64,
    pub voice_minutes_outbound: f64,
    pub voice_minutes_inbound: f64,
    pub emails_sent: f64,
    pub local_phone_numbers: f64,
    pub toll_free_numbers: f64,
}

/// WordPress hosting level offered by the agency calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordpressHosting {
    #[default]
    None,
    Basic,
    Standard,
    Premium,
}

impl WordpressHosting {
    fn add_on_id(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Basic => Some("wordpress_standard"),
            Self::Standard => Some("wordpress_25_sites"),
            Self::Premium => Some("wordpress_unlimited"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyAddOns {
    pub ai_employee: bool,
    pub wordpress_hosting: WordpressHosting,
    pub hipaa_compliance: bool,
    pub whatsapp: bool,
    pub online_listings: bool,
    pub dedicated_ip: bool,
    pub a2p_campaigns: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgencyUsageCost {
    pub sms: f64,
    pub voice: f64,
    pub email: f64,
    pub phone: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgencyAddOnCost {
    pub ai_employee: f64,
    pub wordpress: f64,
    pub hipaa: f64,
    pub whatsapp: f64,
    pub online_listings: f64,
    pub dedicated_ip: f64,
    pub a2p: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyCostBreakdown {
    pub platform: f64,
    pub usage: AgencyUsageCost,
    pub add_ons: AgencyAddOnCost,
    pub monthly_total: f64,
    pub annual_total: f64,
    /// Savings from annual billing (0 when billed monthly)
    pub annual_savings: f64,
}

/// Total agency cost for a plan, usage estimate and add-on selection.
///
/// Sub-accounts are capped at what the plan includes; add-ons the plan
/// cannot buy (dedicated IP below Pro) are priced at 0.
pub fn agency_cost(
    plan: &Plan,
    billed_annually: bool,
    sub_accounts: u32,
    usage: &AgencyUsage,
    add_ons: &AgencyAddOns,
) -> AgencyCostBreakdown {
    let sub_accounts = plan.clamp_sub_accounts(sub_accounts);
    tracing::debug!(plan = %plan.id, billed_annually, sub_accounts, "Computing agency cost");

    let platform = plan.platform_cost(billed_annually);

    let sms = sms_cost(
        usage.sms_segments,
        rates::SMS_SEGMENT_RATE,
        rates::DEFAULT_CARRIER_FEE,
    );
    let voice = metered_cost(usage.voice_minutes_outbound, unit_price("call_outbound"))
        + metered_cost(usage.voice_minutes_inbound, unit_price("call_inbound"));
    let email = per_thousand_cost(
        usage.emails_sent,
        rates::usage_service("lc_email").map(|s| s.rate).unwrap_or_default(),
    );
    let phone = usage.local_phone_numbers * monthly_add_on_price("local_number")
        + usage.toll_free_numbers * monthly_add_on_price("toll_free_number");
    let usage_cost = AgencyUsageCost {
        sms,
        voice,
        email,
        phone,
        total: sms + voice + email + phone,
    };

    let flag = |on: bool, id: &str| -> f64 {
        if !on {
            return 0.0;
        }
        rates::add_on(id)
            .filter(|a| a.available_on(plan.id))
            .and_then(|a| add_on_cost(a, BillingCycle::Monthly, sub_accounts))
            .unwrap_or(0.0)
    };

    let ai_employee = flag(add_ons.ai_employee, "ai_employee_unlimited");
    let wordpress = add_ons
        .wordpress_hosting
        .add_on_id()
        .map(|id| flag(true, id))
        .unwrap_or(0.0);
    let hipaa = flag(add_ons.hipaa_compliance, "hipaa");
    let whatsapp = flag(add_ons.whatsapp, "whatsapp");
    // Listings are quoted as a single location in the agency calculator
    let online_listings = if add_ons.online_listings {
        monthly_add_on_price("listings_monthly")
    } else {
        0.0
    };
    let dedicated_ip = flag(add_ons.dedicated_ip, "dedicated_ip");
    let a2p = add_ons.a2p_campaigns as f64 * rates::A2P_CAMPAIGN_FEE;

    let add_on_costs = AgencyAddOnCost {
        ai_employee,
        wordpress,
        hipaa,
        whatsapp,
        online_listings,
        dedicated_ip,
        a2p,
        total: ai_employee + wordpress + hipaa + whatsapp + online_listings + dedicated_ip + a2p,
    };

    let monthly_total = platform + usage_cost.total + add_on_costs.total;
    let annual_savings = if billed_annually {
        plan.yearly_savings()
    } else {
        0.0
    };

    AgencyCostBreakdown {
        platform,
        usage: usage_cost,
        add_ons: add_on_costs,
        monthly_total,
        annual_total: monthly_total * 12.0,
        annual_savings,
    }
}
