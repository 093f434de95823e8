//! KPI platforms and reshaping of per-platform summaries.
//!
//! All metric math (CTR, ROAS, open rate) arrives pre-computed from the KPI
//! workflow. This module only picks sections out of the workflow responses
//! and fills the gaps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default reporting window when a caller omits dates.
pub const DEFAULT_KPI_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiPlatform {
    Mailchimp,
    Facebook,
    Googleads,
}

impl KpiPlatform {
    pub const ALL: [KpiPlatform; 3] = [
        KpiPlatform::Mailchimp,
        KpiPlatform::Facebook,
        KpiPlatform::Googleads,
    ];

    /// The name the KPI workflow expects.
    pub fn as_str(self) -> &'static str {
        match self {
            KpiPlatform::Mailchimp => "mailchimp",
            KpiPlatform::Facebook => "facebook",
            KpiPlatform::Googleads => "googleads",
        }
    }

    /// The key the platform's section lives under in summaries.
    pub fn section_key(self) -> &'static str {
        match self {
            KpiPlatform::Mailchimp => "email",
            KpiPlatform::Facebook => "facebook",
            KpiPlatform::Googleads => "googleAds",
        }
    }
}

impl fmt::Display for KpiPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KpiPlatform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KpiPlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid platform '{s}'. Must be one of: mailchimp, facebook, googleads"
                ))
            })
    }
}

/// One platform's slice of a summary. Fields beyond the common three are
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformKpi {
    #[serde(default)]
    pub connected: bool,
    #[serde(default = "empty_object")]
    pub summary: Value,
    #[serde(default = "empty_array")]
    pub campaigns: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PlatformKpi {
    fn default() -> Self {
        Self {
            connected: false,
            summary: empty_object(),
            campaigns: empty_array(),
            extra: Map::new(),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiOverview {
    pub email: PlatformKpi,
    pub facebook: PlatformKpi,
    pub google_ads: PlatformKpi,
    /// Cross-platform rollup when the workflow supplies one.
    pub all: Value,
    pub fetched_at: Timestamp,
}

/// Pull a platform's section out of a summary response.
///
/// A missing or malformed section becomes the disconnected default.
pub fn platform_section(platform: KpiPlatform, response: &Value) -> PlatformKpi {
    response
        .get(platform.section_key())
        .filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Merge per-platform summary responses into one overview.
///
/// Each platform's own section is taken from its own response. `all` is the
/// last rollup any response carried.
pub fn merge_overview(responses: &[(KpiPlatform, Value)], fetched_at: Timestamp) -> KpiOverview {
    let section = |platform: KpiPlatform| {
        responses
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, response)| platform_section(platform, response))
            .unwrap_or_default()
    };

    let all = responses
        .iter()
        .filter_map(|(_, response)| response.get("all"))
        .filter(|v| !v.is_null())
        .last()
        .cloned()
        .unwrap_or(Value::Null);

    KpiOverview {
        email: section(KpiPlatform::Mailchimp),
        facebook: section(KpiPlatform::Facebook),
        google_ads: section(KpiPlatform::Googleads),
        all,
        fetched_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn platform_keys() {
        assert_eq!(KpiPlatform::Mailchimp.section_key(), "email");
        assert_eq!(KpiPlatform::Googleads.section_key(), "googleAds");
        assert_eq!("facebook".parse::<KpiPlatform>().unwrap(), KpiPlatform::Facebook);
        assert!("tiktok".parse::<KpiPlatform>().is_err());
    }

    #[test]
    fn missing_section_is_disconnected() {
        let section = platform_section(KpiPlatform::Facebook, &json!({}));
        assert_eq!(section, PlatformKpi::default());
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json, json!({"connected": false, "summary": {}, "campaigns": []}));
    }

    #[test]
    fn extra_fields_pass_through() {
        let response = json!({"email": {"connected": true, "summary": {"opens": 4}, "campaigns": [], "listSize": 900}});
        let section = platform_section(KpiPlatform::Mailchimp, &response);
        assert!(section.connected);
        assert_eq!(section.extra.get("listSize"), Some(&json!(900)));
    }

    #[test]
    fn merge_picks_each_platform_from_its_own_response() {
        let now = Utc::now();
        let overview = merge_overview(
            &[
                (KpiPlatform::Mailchimp, json!({"email": {"connected": true}})),
                (KpiPlatform::Googleads, json!({"googleAds": {"connected": true}, "all": {"spend": 12}})),
            ],
            now,
        );
        assert!(overview.email.connected);
        assert!(!overview.facebook.connected);
        assert!(overview.google_ads.connected);
        assert_eq!(overview.all, json!({"spend": 12}));

        let json = serde_json::to_value(&overview).unwrap();
        assert!(json.get("googleAds").is_some());
        assert!(json.get("fetchedAt").is_some());
    }

    #[test]
    fn merge_without_rollup_has_null_all() {
        let overview = merge_overview(&[], Utc::now());
        assert_eq!(overview.all, Value::Null);
    }
}
