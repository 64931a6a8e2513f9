//! Scenario: the user's input values for every calculator
//!
//! A scenario is loaded from TOML (every section optional, missing fields
//! take the calculator defaults) and then clamped before any calculation
//! runs. Clamping is not an error: negative or NaN amounts become 0 and
//! counts that cannot be zero become 1, with a warning logged for each.
//!
//! ```toml
//! plan = "pro"
//! sub_accounts = 5
//!
//! [rebilling]
//! client_count = 25
//! sms = { volume = 2000, markup_percent = 80 }
//!
//! [dashboard]
//! client_count = 40
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cost::{AgencyAddOns, AgencyUsage, UsageInputs};
use crate::dashboard::DashboardInputs;
use crate::error::{CalcError, CalcResult};
use crate::markup::{RebillingInputs, ServiceConfig};
use crate::models::{Plan, PlanTier};
use crate::projection::SaasInputs;
use crate::rates;

/// Floor a monetary amount or volume at 0 (NaN becomes 0)
pub fn clamp_amount(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Floor a count that cannot be zero at 1
pub fn clamp_count(value: u32) -> u32 {
    value.max(1)
}

/// Agency cost calculator inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyScenario {
    pub usage: AgencyUsage,
    pub add_ons: AgencyAddOns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub plan: PlanTier,
    pub billed_annually: bool,
    pub sub_accounts: u32,
    pub agency: AgencyScenario,
    pub usage: UsageInputs,
    pub rebilling: RebillingInputs,
    pub saas: SaasInputs,
    pub dashboard: DashboardInputs,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            plan: PlanTier::Pro,
            billed_annually: false,
            sub_accounts: 1,
            agency: AgencyScenario::default(),
            usage: UsageInputs::default(),
            rebilling: RebillingInputs::default(),
            saas: SaasInputs::default(),
            dashboard: DashboardInputs::default(),
        }
    }
}

impl Scenario {
    /// Parse a scenario from TOML text; `path` is only used in errors
    pub fn from_toml_str(content: &str, path: &Path) -> CalcResult<Self> {
        toml::from_str(content).map_err(|e| CalcError::ScenarioParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
            source: e,
        })
    }

    /// Load and clamp a scenario file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CalcError::ScenarioRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let scenario = Self::from_toml_str(&content, path)?.clamped();
        tracing::debug!(?path, plan = %scenario.plan, "Loaded scenario");
        Ok(scenario)
    }

    /// Load `path` if given and present, otherwise built-in defaults.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load_or_default(path: Option<&Path>) -> CalcResult<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            Some(p) => {
                tracing::debug!(path = ?p, "Scenario file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn active_plan(&self) -> &'static Plan {
        rates::plan(self.plan)
    }

    /// Copy of the scenario with every amount floored at 0 and every
    /// non-zero count floored at 1
    pub fn clamped(mut self) -> Self {
        let mut c = Clamper::default();

        self.sub_accounts = c.count("sub_accounts", self.sub_accounts);
        self.usage.ai.sub_accounts = c.count("usage.ai.sub_accounts", self.usage.ai.sub_accounts);

        let u = &mut self.agency.usage;
        for (field, value) in [
            ("agency.usage.sms_segments", &mut u.sms_segments),
            ("agency.usage.voice_minutes_outbound", &mut u.voice_minutes_outbound),
            ("agency.usage.voice_minutes_inbound", &mut u.voice_minutes_inbound),
            ("agency.usage.emails_sent", &mut u.emails_sent),
            ("agency.usage.local_phone_numbers", &mut u.local_phone_numbers),
            ("agency.usage.toll_free_numbers", &mut u.toll_free_numbers),
        ] {
            c.amount(field, value);
        }

        let usage = &mut self.usage;
        for (field, value) in [
            ("usage.messaging.sms_segments", &mut usage.messaging.sms_segments),
            ("usage.messaging.mms_messages", &mut usage.messaging.mms_messages),
            ("usage.messaging.outbound_share_pct", &mut usage.messaging.outbound_share_pct),
            ("usage.voice.outbound_minutes", &mut usage.voice.outbound_minutes),
            ("usage.voice.inbound_minutes", &mut usage.voice.inbound_minutes),
            ("usage.voice.voicemail_drops", &mut usage.voice.voicemail_drops),
            ("usage.email.emails_per_month", &mut usage.email.emails_per_month),
            ("usage.email.verifications", &mut usage.email.verifications),
            ("usage.ai.conversation_messages", &mut usage.ai.conversation_messages),
            ("usage.ai.voice_minutes", &mut usage.ai.voice_minutes),
            ("usage.ai.reviews", &mut usage.ai.reviews),
            ("usage.ai.content_words", &mut usage.ai.content_words),
            ("usage.ai.content_images", &mut usage.ai.content_images),
            ("usage.ai.workflow_executions", &mut usage.ai.workflow_executions),
            ("usage.workflow_executions", &mut usage.workflow_executions),
        ] {
            c.amount(field, value);
        }
        if usage.messaging.outbound_share_pct > 100.0 {
            tracing::warn!(
                value = usage.messaging.outbound_share_pct,
                "Clamped usage.messaging.outbound_share_pct to 100"
            );
            usage.messaging.outbound_share_pct = 100.0;
        }

        let r = &mut self.rebilling;
        for (name, config) in [
            ("sms", &mut r.sms),
            ("email", &mut r.email),
            ("conversation_ai", &mut r.conversation_ai),
            ("voice_ai", &mut r.voice_ai),
            ("reviews_ai", &mut r.reviews_ai),
            ("content_ai", &mut r.content_ai),
            ("workflows", &mut r.workflows),
        ] {
            c.service(name, config);
        }
        for (field, value) in [
            ("rebilling.wordpress.sites_per_client", &mut r.wordpress.sites_per_client),
            ("rebilling.wordpress.your_cost", &mut r.wordpress.your_cost),
            ("rebilling.wordpress.client_price", &mut r.wordpress.client_price),
        ] {
            c.amount(field, value);
        }

        let s = &mut self.saas;
        for tier in &mut s.tiers {
            c.amount("saas.tiers.monthly_price", &mut tier.monthly_price);
            c.amount("saas.tiers.setup_fee", &mut tier.setup_fee);
        }
        for (field, value) in [
            ("saas.costs.platform", &mut s.costs.platform),
            ("saas.costs.usage_per_client", &mut s.costs.usage_per_client),
            ("saas.costs.support_per_client", &mut s.costs.support_per_client),
            ("saas.rebilling.sms_markup", &mut s.rebilling.sms_markup),
            ("saas.rebilling.email_markup", &mut s.rebilling.email_markup),
            ("saas.rebilling.ai_markup", &mut s.rebilling.ai_markup),
            ("saas.rebilling.usage_volume_per_client", &mut s.rebilling.usage_volume_per_client),
            ("saas.growth.monthly_growth_rate", &mut s.growth.monthly_growth_rate),
            ("saas.growth.monthly_churn_rate", &mut s.growth.monthly_churn_rate),
        ] {
            c.amount(field, value);
        }
        s.growth.projection_months =
            c.count("saas.growth.projection_months", s.growth.projection_months);

        let d = &mut self.dashboard;
        for (field, value) in [
            ("dashboard.agency_costs.platform", &mut d.agency_costs.platform),
            ("dashboard.agency_costs.usage", &mut d.agency_costs.usage),
            ("dashboard.agency_costs.add_ons", &mut d.agency_costs.add_ons),
            ("dashboard.client_revenue.subscriptions", &mut d.client_revenue.subscriptions),
            ("dashboard.client_revenue.rebilling", &mut d.client_revenue.rebilling),
            ("dashboard.client_revenue.setup_fees", &mut d.client_revenue.setup_fees),
        ] {
            c.amount(field, value);
        }
        d.projection_months = c.count("dashboard.projection_months", d.projection_months);

        if c.clamped > 0 {
            tracing::warn!(fields = c.clamped, "Scenario input clamped");
        }
        self
    }
}

#[derive(Default)]
struct Clamper {
    clamped: usize,
}

impl Clamper {
    fn amount(&mut self, field: &str, value: &mut f64) {
        let clamped = clamp_amount(*value);
        // NaN != NaN, so a NaN input always counts as clamped
        if clamped != *value {
            tracing::warn!(
                field = %field,
                value = *value,
                "Clamped negative or non-numeric input to 0"
            );
            self.clamped += 1;
            *value = clamped;
        }
    }

    fn count(&mut self, field: &str, value: u32) -> u32 {
        let clamped = clamp_count(value);
        if clamped != value {
            tracing::warn!(field = %field, "Clamped zero count to 1");
            self.clamped += 1;
        }
        clamped
    }

    fn service(&mut self, name: &str, config: &mut ServiceConfig) {
        self.amount(&format!("rebilling.{name}.volume"), &mut config.volume);
        self.amount(&format!("rebilling.{name}.markup_percent"), &mut config.markup_percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_clamp_amount() {
        assert_eq!(clamp_amount(-5.0), 0.0);
        assert_eq!(clamp_amount(f64::NAN), 0.0);
        assert_eq!(clamp_amount(12.5), 12.5);
        assert_eq!(clamp_amount(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(0), 1);
        assert_eq!(clamp_count(7), 7);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let scenario = Scenario::from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(scenario, Scenario::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let toml = r#"
plan = "unlimited"

[rebilling]
client_count = 25
sms = { volume = 2000, markup_percent = 80 }
"#;
        let scenario = Scenario::from_toml_str(toml, Path::new("s.toml")).unwrap();
        assert_eq!(scenario.plan, PlanTier::Unlimited);
        assert_eq!(scenario.rebilling.client_count, 25);
        assert_eq!(scenario.rebilling.sms, ServiceConfig::new(2000.0, 80.0));
        // Untouched services keep their defaults
        assert_eq!(scenario.rebilling.email, ServiceConfig::new(5000.0, 150.0));
        assert_eq!(scenario.dashboard, DashboardInputs::default());
    }

    #[test]
    fn test_parse_error_names_path() {
        let err =
            Scenario::from_toml_str("plan = \"platinum\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, CalcError::ScenarioParse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_clamped_floors_negatives_and_counts() {
        let mut scenario = Scenario::default();
        scenario.sub_accounts = 0;
        scenario.usage.voice.outbound_minutes = -10.0;
        scenario.usage.messaging.outbound_share_pct = 150.0;
        scenario.rebilling.sms.markup_percent = f64::NAN;
        scenario.dashboard.agency_costs.usage = -1.0;

        let clamped = scenario.clamped();
        assert_eq!(clamped.sub_accounts, 1);
        assert_eq!(clamped.usage.voice.outbound_minutes, 0.0);
        assert_eq!(clamped.usage.messaging.outbound_share_pct, 100.0);
        assert_eq!(clamped.rebilling.sms.markup_percent, 0.0);
        assert_eq!(clamped.dashboard.agency_costs.usage, 0.0);
    }

    #[test]
    fn test_clamped_is_noop_for_valid_input() {
        assert_eq!(Scenario::default().clamped(), Scenario::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sub_accounts = 0\n[dashboard]\nclient_count = 40").unwrap();

        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.dashboard.client_count, 40);
        assert_eq!(scenario.sub_accounts, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            Scenario::load(&path).unwrap_err(),
            CalcError::ScenarioRead { .. }
        ));
        assert_eq!(
            Scenario::load_or_default(Some(&path)).unwrap(),
            Scenario::default()
        );
    }
}
