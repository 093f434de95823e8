//! KPI summary and drill-down fetches.
//!
//! A multi-platform overview fires every platform's summary call at once.
//! Any single failure fails the whole overview, named after its platform.

use futures::future::try_join_all;
use regatta_core::analytics::{merge_overview, platform_section, KpiOverview, KpiPlatform, PlatformKpi};
use regatta_core::schedule::DateRange;
use regatta_core::types::Timestamp;
use serde_json::{Map, Value};

use crate::error::WorkflowError;
use crate::executor::{WorkflowExecutor, WorkflowKind};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn range_vars(vars: &mut Map<String, Value>, range: &DateRange) {
    vars.insert("startDate".into(), range.start.format(DATE_FORMAT).to_string().into());
    vars.insert("endDate".into(), range.end.format(DATE_FORMAT).to_string().into());
}

fn object_or_empty(value: Option<&Value>) -> Value {
    match value {
        Some(v) if v.is_object() => v.clone(),
        _ => Value::Object(Map::new()),
    }
}

/// Raw summary response for one platform: the workflow's `result.response`.
pub async fn fetch_summary(
    executor: &dyn WorkflowExecutor,
    platform: KpiPlatform,
    range: &DateRange,
) -> Result<Value, WorkflowError> {
    let mut vars = Map::new();
    vars.insert("platform".into(), platform.as_str().into());
    range_vars(&mut vars, range);

    let result = executor.execute(WorkflowKind::KpiSummary, vars).await?;
    Ok(object_or_empty(result.get("response")))
}

/// One platform's section of the summary.
pub async fn fetch_platform(
    executor: &dyn WorkflowExecutor,
    platform: KpiPlatform,
    range: &DateRange,
) -> Result<PlatformKpi, WorkflowError> {
    let response = fetch_summary(executor, platform, range).await?;
    Ok(platform_section(platform, &response))
}

/// All platforms, fetched concurrently and merged.
pub async fn fetch_overview(
    executor: &dyn WorkflowExecutor,
    range: &DateRange,
    fetched_at: Timestamp,
) -> Result<KpiOverview, WorkflowError> {
    let fetches = KpiPlatform::ALL.into_iter().map(|platform| async move {
        fetch_summary(executor, platform, range)
            .await
            .map(|response| (platform, response))
            .map_err(|e| WorkflowError::Platform {
                platform: platform.as_str(),
                source: Box::new(e),
            })
    });
    let responses = try_join_all(fetches).await?;
    Ok(merge_overview(&responses, fetched_at))
}

/// Drill-down for one campaign on one platform: the workflow's
/// `result.output`, or `{}` when it has none.
pub async fn fetch_detail(
    executor: &dyn WorkflowExecutor,
    platform: KpiPlatform,
    campaign_id: &str,
    range: Option<&DateRange>,
) -> Result<Value, WorkflowError> {
    let mut vars = Map::new();
    vars.insert("platform".into(), platform.as_str().into());
    vars.insert("campaignId".into(), campaign_id.into());
    if let Some(range) = range {
        range_vars(&mut vars, range);
    }

    let result = executor.execute(WorkflowKind::KpiDetail, vars).await?;
    Ok(result
        .get("output")
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeExecutor;
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, Utc};
    use serde_json::json;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn summary_sends_platform_and_dates() {
        let fake = FakeExecutor::new().with_result(
            WorkflowKind::KpiSummary,
            json!({"response": {"facebook": {"connected": true}}}),
        );
        let section = fetch_platform(&fake, KpiPlatform::Facebook, &range()).await.unwrap();
        assert!(section.connected);

        let (_, vars) = &fake.calls()[0];
        assert_eq!(vars["platform"], "facebook");
        assert_eq!(vars["startDate"], "2025-09-01");
        assert_eq!(vars["endDate"], "2025-09-30");
    }

    #[tokio::test]
    async fn overview_calls_every_platform() {
        let fake = FakeExecutor::new().with_result(
            WorkflowKind::KpiSummary,
            json!({"response": {"email": {"connected": true}}}),
        );
        let overview = fetch_overview(&fake, &range(), Utc::now()).await.unwrap();
        assert_eq!(fake.calls().len(), 3);
        assert!(overview.email.connected);
        assert!(!overview.google_ads.connected);
    }

    #[tokio::test]
    async fn one_platform_failure_fails_the_overview() {
        let fake = FakeExecutor::new().fail_when("platform", "googleads");
        let err = fetch_overview(&fake, &range(), Utc::now()).await.unwrap_err();
        assert_matches!(err, WorkflowError::Platform { platform: "googleads", .. });
        assert!(err.to_string().starts_with("googleads KPI fetch failed"));
    }

    #[tokio::test]
    async fn detail_returns_output_or_empty() {
        let fake = FakeExecutor::new()
            .with_result(WorkflowKind::KpiDetail, json!({"output": {"clicks": 12}}));
        let detail = fetch_detail(&fake, KpiPlatform::Mailchimp, "c-1", None).await.unwrap();
        assert_eq!(detail, json!({"clicks": 12}));
        assert!(!fake.calls()[0].1.contains_key("startDate"));

        let empty = FakeExecutor::new();
        let detail = fetch_detail(&empty, KpiPlatform::Mailchimp, "c-1", Some(&range()))
            .await
            .unwrap();
        assert_eq!(detail, json!({}));
        assert_eq!(empty.calls()[0].1["startDate"], "2025-09-01");
    }
}
