//! Compiled-in price list for the platform (US/Canada rates, December 2025)
//!
//! Every rate here is a constant. Nothing is fetched at runtime and there is
//! no fallback pricing: callers go through the lookups in `rates` and get
//! `None` for ids that are not listed.

use once_cell::sync::Lazy;

use crate::models::{
    A2PKind, A2PRegistration, AddOnService, CarrierFee, CarrierProfile, ClientTier, Plan,
    PlanTier, ServiceCategory, UsageService, UsageUnit, WorkflowTier,
};

/// SMS outbound base rate per segment
pub const SMS_SEGMENT_RATE: f64 = 0.0083;
/// Default carrier surcharge per segment (AT&T / T-Mobile)
pub const DEFAULT_CARRIER_FEE: f64 = 0.003;
/// Flat AI Employee price per sub-account per month
pub const AI_UNLIMITED_PER_SUB_ACCOUNT: f64 = 97.0;
/// Pay-per-use price of one premium workflow execution
pub const WORKFLOW_EXECUTION_RATE: f64 = 0.01;
/// Monthly A2P campaign fee charged per registered campaign
pub const A2P_CAMPAIGN_FEE: f64 = 11.025;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn usage(
    id: &str,
    name: &str,
    category: ServiceCategory,
    rate: f64,
    unit: UsageUnit,
    description: &str,
) -> UsageService {
    UsageService {
        id: id.to_string(),
        name: name.to_string(),
        category,
        rate,
        unit,
        description: description.to_string(),
        rebillable: true,
        markup_allowed: true,
        minimum_plan: None,
        notes: None,
    }
}

fn monthly_add_on(
    id: &str,
    name: &str,
    category: ServiceCategory,
    monthly_price: f64,
    description: &str,
    per_sub_account: bool,
) -> AddOnService {
    AddOnService {
        id: id.to_string(),
        name: name.to_string(),
        category,
        monthly_price: Some(monthly_price),
        yearly_price: None,
        semi_annual_price: None,
        one_time_price: None,
        description: description.to_string(),
        per_sub_account,
        minimum_plan: None,
        features: Vec::new(),
        notes: None,
    }
}

pub static CORE_PLANS: Lazy<Vec<Plan>> = Lazy::new(|| {
    vec![
        Plan {
            id: PlanTier::Starter,
            name: "Starter Account".to_string(),
            description: "Perfect for small agencies or businesses getting started".to_string(),
            monthly_price: 97.0,
            yearly_price: 970.0,
            sub_accounts: Some(3),
            features: strings(&[
                "Up to 3 sub-accounts",
                "Unlimited contacts",
                "Email & SMS marketing",
                "CRM & Pipeline management",
                "Workflows & Automations",
                "Landing pages & Funnels",
            ]),
            rebilling_at_cost: false,
            allows_markup: false,
            saas_mode: false,
            recommended: false,
        },
        Plan {
            id: PlanTier::Unlimited,
            name: "Unlimited Account".to_string(),
            description: "For growing agencies managing multiple clients".to_string(),
            monthly_price: 297.0,
            yearly_price: 2970.0,
            sub_accounts: None,
            features: strings(&[
                "Unlimited sub-accounts",
                "All Starter features",
                "Rebilling at cost",
                "Client billing portal",
                "API access",
            ]),
            rebilling_at_cost: true,
            allows_markup: false,
            saas_mode: false,
            recommended: true,
        },
        Plan {
            id: PlanTier::Pro,
            name: "Pro / SaaS Account".to_string(),
            description: "For established agencies building their own SaaS platform".to_string(),
            monthly_price: 497.0,
            yearly_price: 4970.0,
            sub_accounts: None,
            features: strings(&[
                "Unlimited sub-accounts",
                "All Unlimited features",
                "Rebilling with markup",
                "SaaS mode configurator",
                "Dedicated IP for email (available)",
            ]),
            rebilling_at_cost: true,
            allows_markup: true,
            saas_mode: true,
            recommended: false,
        },
    ]
});

#[rustfmt::skip]
pub static USAGE_SERVICES: Lazy<Vec<UsageService>> = Lazy::new(|| {
    use ServiceCategory::*;
    use UsageUnit::*;

    let mut funnel_ai = usage(
        "funnel_ai",
        "Funnel AI",
        Ai,
        0.0,
        PerExecution,
        "AI-powered funnel builder (1000 prompts daily limit)",
    );
    funnel_ai.rebillable = false;
    funnel_ai.markup_allowed = false;
    funnel_ai.notes = Some("Free with 1000 prompts per day limit".to_string());

    let mut voice_ai = usage(
        "voice_ai_engine",
        "Voice AI (Engine)",
        Ai,
        0.06,
        PerMinute,
        "Voice AI engine cost (plus LLM token costs)",
    );
    voice_ai.notes = Some("Additional LLM token costs apply based on usage".to_string());

    vec![
        // Messaging
        usage("sms_outbound", "SMS (Outbound)", Messaging, SMS_SEGMENT_RATE, PerSegment, "Outbound SMS messages (160 characters per segment)"),
        usage("mms_outbound", "MMS (Outbound)", Messaging, 0.022, PerSegment, "Outbound MMS messages with media"),
        usage("mms_inbound", "MMS (Inbound)", Messaging, 0.0165, PerSegment, "Inbound MMS messages with media"),
        // Voice
        usage("call_outbound", "Outbound Calls", Phone, 0.0166, PerMinute, "Outbound voice calls"),
        usage("call_inbound", "Inbound Calls", Phone, 0.01165, PerMinute, "Inbound voice calls"),
        usage("voicemail_drop", "Voicemail Drops", Phone, 0.018, PerMinute, "Pre-recorded voicemail delivery"),
        usage("call_recording", "Call Recording", Phone, 0.0025, PerMinute, "Call recording service"),
        usage("call_transcription", "Call Transcription", Phone, 0.024, PerMinute, "AI-powered call transcription"),
        // Email
        usage("lc_email", "LC Email", Email, 0.675, Per1000Emails, "Email sending service ($0.000675 per email)"),
        usage("email_verification", "Email Verification", Email, 2.50, Per1000Verifications, "Email address verification service"),
        // AI
        voice_ai,
        usage("conversation_ai", "Conversation AI", Ai, 0.02, PerMessage, "AI-powered conversation responses"),
        usage("reviews_ai", "Reviews AI", Ai, 0.01, PerReview, "AI-generated review responses"),
        usage("content_ai_image", "Content AI (Images)", Ai, 0.063, PerImage, "AI-generated images"),
        usage("content_ai_text", "Content AI (Text)", Ai, 0.0945, Per1000Words, "AI-generated text content"),
        funnel_ai,
        usage("workflow_ai", "Workflow AI", Ai, 0.01, PerExecution, "AI actions within workflows"),
        // Premium workflows
        usage("workflow_premium", "Premium Workflow Actions", Workflow, WORKFLOW_EXECUTION_RATE, PerExecution, "Pay-per-use premium workflow executions"),
    ]
});

#[rustfmt::skip]
pub static ADD_ONS: Lazy<Vec<AddOnService>> = Lazy::new(|| {
    use ServiceCategory::*;

    let mut dedicated_ip = monthly_add_on(
        "dedicated_ip",
        "Dedicated IP Address",
        Email,
        59.0,
        "Dedicated IP for email sending (improves deliverability)",
        false,
    );
    dedicated_ip.minimum_plan = Some(PlanTier::Pro);

    let mut whatsapp = monthly_add_on(
        "whatsapp",
        "WhatsApp Business Integration",
        Messaging,
        10.0,
        "WhatsApp Business API integration (plus usage fees)",
        true,
    );
    whatsapp.notes = Some("Additional usage fees apply for messages sent".to_string());

    let mut listings_semiannual = monthly_add_on(
        "listings_semiannual",
        "Online Listings (6 Months)",
        Marketing,
        0.0,
        "Online listings management (6 months prepaid)",
        true,
    );
    listings_semiannual.monthly_price = None;
    listings_semiannual.semi_annual_price = Some(150.0);

    let mut listings_annual = monthly_add_on(
        "listings_annual",
        "Online Listings (Annual)",
        Marketing,
        0.0,
        "Online listings management (annual prepaid)",
        true,
    );
    listings_annual.monthly_price = None;
    listings_annual.yearly_price = Some(300.0);

    vec![
        monthly_add_on("local_number", "Local Phone Number", Phone, 1.15, "Local phone number for US/Canada", false),
        monthly_add_on("toll_free_number", "Toll-Free Phone Number", Phone, 2.15, "Toll-free phone number (1-800, 1-888, etc.)", false),
        dedicated_ip,
        monthly_add_on("ai_employee_unlimited", "AI Employee (Unlimited Plan)", Ai, AI_UNLIMITED_PER_SUB_ACCOUNT, "AI Employee with unlimited features per sub-account", true),
        monthly_add_on("wordpress_standard", "WordPress Hosting (Standard)", Hosting, 10.0, "Standard WordPress hosting per site", false),
        monthly_add_on("wordpress_25_sites", "WordPress Hosting (25 Sites)", Hosting, 220.0, "WordPress hosting for up to 25 sites", false),
        monthly_add_on("wordpress_unlimited", "WordPress Hosting (Unlimited)", Hosting, 497.0, "Unlimited WordPress hosting", false),
        whatsapp,
        monthly_add_on("listings_monthly", "Online Listings (Monthly)", Marketing, 30.0, "Online listings management", true),
        listings_semiannual,
        listings_annual,
        monthly_add_on("hipaa", "HIPAA Compliance", Compliance, 297.0, "HIPAA-compliant infrastructure and BAA", false),
        monthly_add_on("branded_app", "Branded Mobile App", App, 49.0, "White-label mobile app with your branding", false),
    ]
});

pub static CARRIER_FEES: Lazy<Vec<CarrierFee>> = Lazy::new(|| {
    vec![
        CarrierFee {
            carrier: "AT&T".to_string(),
            fee_per_segment: 0.003,
            notes: None,
        },
        CarrierFee {
            carrier: "T-Mobile".to_string(),
            fee_per_segment: 0.003,
            notes: None,
        },
        CarrierFee {
            carrier: "Verizon".to_string(),
            fee_per_segment: 0.004,
            notes: Some("May be up to $0.0065 for certain plans".to_string()),
        },
    ]
});

/// Per-segment surcharge used by the messaging calculator for each profile
pub fn carrier_profile_fee(profile: CarrierProfile) -> f64 {
    match profile {
        CarrierProfile::AttTmobile => 0.003,
        CarrierProfile::Verizon => 0.005,
        CarrierProfile::Weighted => 0.0038,
    }
}

pub static A2P_REGISTRATIONS: Lazy<Vec<A2PRegistration>> = Lazy::new(|| {
    vec![
        A2PRegistration {
            kind: A2PKind::LowVolume,
            name: "Low Volume A2P Registration".to_string(),
            one_time_fee: 24.50,
            monthly_campaign_fee: A2P_CAMPAIGN_FEE,
            description: "Standard registration for low-volume senders".to_string(),
        },
        A2PRegistration {
            kind: A2PKind::HighVolume,
            name: "High Volume A2P Registration".to_string(),
            one_time_fee: 71.91,
            monthly_campaign_fee: A2P_CAMPAIGN_FEE,
            description: "High-volume messaging with premium features".to_string(),
        },
    ]
});

pub static WORKFLOW_TIERS: Lazy<Vec<WorkflowTier>> = Lazy::new(|| {
    let tier = |id: &str, name: &str, price: f64, included: u64, lifetime: bool, desc: &str| {
        WorkflowTier {
            id: id.to_string(),
            name: name.to_string(),
            monthly_price: price,
            executions_included: included,
            lifetime,
            description: desc.to_string(),
        }
    };
    vec![
        tier("free", "Free Tier", 0.0, 100, true, "100 workflow executions (lifetime allocation)"),
        tier("starter", "Starter", 10.0, 10_000, false, "10,000 workflow executions per month"),
        tier("growth", "Growth", 25.0, 30_000, false, "30,000 workflow executions per month"),
        tier("scale", "Scale", 50.0, 65_000, false, "65,000 workflow executions per month"),
    ]
});

pub static SAAS_CLIENT_TIERS: Lazy<Vec<ClientTier>> = Lazy::new(|| {
    let tier = |id: &str, name: &str, price: f64, desc: &str| ClientTier {
        id: id.to_string(),
        name: name.to_string(),
        suggested_price: price,
        cost: 0.0,
        margin: price,
        description: desc.to_string(),
    };
    vec![
        tier("basic", "Basic", 197.0, "Entry-level package for small businesses"),
        tier("professional", "Professional", 297.0, "Full-featured package for growing businesses"),
        tier("enterprise", "Enterprise", 497.0, "Premium package for established businesses"),
    ]
});
