//! Handlers for the `/campaigns` resource.
//!
//! Status changes requested through PUT/PATCH go through the lifecycle
//! table in `regatta_core::lifecycle`. Archiving has its own admin-only
//! endpoint, and generation has its own endpoint that calls the workflow
//! service before moving the campaign to SCHEDULED.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use regatta_core::activity::{ActivityAction, DEFAULT_ACTIVITY_LIMIT};
use regatta_core::campaign::{
    parse_channels, parse_image_channels, validate_content_focus, validate_required_fields,
    CampaignStatus, DEFAULT_CONTENT_FOCUS,
};
use regatta_core::error::CoreError;
use regatta_core::lifecycle::{self, Transition, Trigger};
use regatta_core::products::{generation_skus, parse_products, parse_term_sales};
use regatta_core::schedule::parse_schedule_date;
use regatta_core::types::DbId;
use regatta_db::models::campaign::{Campaign, CampaignFilter, CreateCampaign, UpdateCampaign};
use regatta_db::repositories::{ActivityRepo, CampaignRepo};
use regatta_db::DbPool;
use regatta_workflow::generation::{generate_campaign, GenerationRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};
use crate::handlers::activity::record_activity;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireEditor};
use crate::query::CampaignListParams;
use crate::response::{
    CampaignDetailResponse, CampaignListResponse, CampaignResponse, SuccessResponse,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a campaign or fail with 404.
pub(crate) async fn find_campaign(pool: &DbPool, id: DbId) -> AppResult<Campaign> {
    CampaignRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// The stored status as an enum. The CHECK constraint keeps this total.
pub(crate) fn stored_status(campaign: &Campaign) -> AppResult<CampaignStatus> {
    campaign.status.parse().map_err(|_| {
        AppError::Core(CoreError::Internal(format!(
            "Campaign {} has unknown status '{}'",
            campaign.id, campaign.status
        )))
    })
}

/// A guarded write found the campaign in a different status than it was read in.
pub(crate) fn status_moved(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Campaign {id} changed status while the request was processed; reload and retry"
    )))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Campaign",
        id,
    })
}

/// Write `update` only while the campaign is still in `from`.
///
/// Fails with 409 when another request moved the status first, or 404
/// when the campaign was deleted in the meantime.
async fn update_from_status(
    pool: &DbPool,
    id: DbId,
    from: CampaignStatus,
    update: &UpdateCampaign,
) -> AppResult<Campaign> {
    if let Some(campaign) = CampaignRepo::update_from_status(pool, id, from.as_str(), update).await? {
        return Ok(campaign);
    }
    match CampaignRepo::find_by_id(pool, id).await? {
        Some(_) => Err(status_moved(id)),
        None => Err(not_found(id)),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date_field(value: Option<&str>) -> Result<Option<chrono::NaiveDate>, CoreError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_schedule_date)
        .transpose()
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /campaigns`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub title: Option<String>,
    pub topic: Option<String>,
    pub notes: Option<String>,
    pub scheduled_date: Option<String>,
    pub channels: Option<Value>,
    pub image_channels: Option<Value>,
    pub products: Option<Value>,
    pub term_sales: Option<Value>,
    pub content_focus: Option<i16>,
    pub assigned_to_id: Option<DbId>,
    pub generated_content: Option<Value>,
    pub doc_url: Option<String>,
    pub folder_url: Option<String>,
    /// Ignored. The actor comes from the token.
    #[serde(default)]
    pub user_email: Option<String>,
}

impl CreateCampaignRequest {
    fn into_create(self, actor: DbId) -> Result<CreateCampaign, CoreError> {
        validate_required_fields(
            self.title.as_deref(),
            self.topic.as_deref(),
            self.channels.as_ref(),
        )?;

        let channels = self.channels.unwrap_or_default();
        parse_channels(&channels)?;

        let image_channels = present(self.image_channels);
        if let Some(value) = &image_channels {
            parse_image_channels(value)?;
        }

        let products = present(self.products).unwrap_or_else(|| json!([]));
        parse_products(&products)?;
        let term_sales = present(self.term_sales).unwrap_or_else(|| json!([]));
        parse_term_sales(&term_sales)?;

        let content_focus = self.content_focus.unwrap_or(DEFAULT_CONTENT_FOCUS);
        validate_content_focus(content_focus)?;

        Ok(CreateCampaign {
            title: self.title.unwrap_or_default(),
            topic: self.topic.unwrap_or_default(),
            notes: self.notes,
            scheduled_date: parse_date_field(self.scheduled_date.as_deref())?,
            channels,
            image_channels,
            products,
            term_sales,
            content_focus,
            assigned_to_id: self.assigned_to_id,
            generated_content: present(self.generated_content),
            doc_url: non_blank(self.doc_url),
            folder_url: non_blank(self.folder_url),
            created_by_id: Some(actor),
        })
    }
}

/// Body of `PUT` and `PATCH /campaigns/{id}`. Absent fields are left alone.
///
/// Serializing it back yields exactly the fields the caller sent, which is
/// what the activity log records.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_channels: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_sales: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_focus: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_url: Option<String>,
    /// Ignored. The actor comes from the token.
    #[serde(default, skip_serializing)]
    pub user_email: Option<String>,
}

impl UpdateCampaignRequest {
    /// The submitted fields as a JSON object, keyed by wire name.
    pub fn submitted(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Validate every present field and build the column update.
    /// `status` is resolved separately against the lifecycle table.
    fn to_update(&self) -> Result<UpdateCampaign, CoreError> {
        for (name, value) in [("title", &self.title), ("topic", &self.topic)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(CoreError::Validation(format!("{name} must not be blank")));
            }
        }
        if let Some(value) = &self.channels {
            parse_channels(value)?;
        }
        if let Some(value) = &self.image_channels {
            parse_image_channels(value)?;
        }
        if let Some(value) = &self.products {
            parse_products(value)?;
        }
        if let Some(value) = &self.term_sales {
            parse_term_sales(value)?;
        }
        if let Some(value) = self.content_focus {
            validate_content_focus(value)?;
        }

        Ok(UpdateCampaign {
            title: self.title.clone(),
            topic: self.topic.clone(),
            notes: self.notes.clone(),
            scheduled_date: parse_date_field(self.scheduled_date.as_deref())?,
            status: None,
            channels: self.channels.clone(),
            image_channels: self.image_channels.clone(),
            products: self.products.clone(),
            term_sales: self.term_sales.clone(),
            content_focus: self.content_focus,
            assigned_to_id: self.assigned_to_id,
            generated_content: self.generated_content.clone(),
            doc_url: non_blank(self.doc_url.clone()),
            folder_url: non_blank(self.folder_url.clone()),
            last_modified_by_id: None,
        })
    }
}

/// What an applied update did to the status.
struct StatusOutcome {
    requested: Option<CampaignStatus>,
    changed: bool,
}

/// Shared body of PUT and PATCH: validate, check the transition, write.
///
/// Field-only edits are last-write-wins. A status change is written only
/// if the campaign still has the status the transition was planned from.
async fn apply_update(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    input: &UpdateCampaignRequest,
) -> AppResult<(Campaign, StatusOutcome)> {
    let current = find_campaign(&state.pool, id).await?;
    let mut update = input.to_update()?;

    let mut outcome = StatusOutcome {
        requested: None,
        changed: false,
    };
    let mut guard = None;
    if let Some(raw) = input.status.as_deref() {
        let target: CampaignStatus = raw.parse()?;
        let from = stored_status(&current)?;
        if let Transition::Change { to, .. } = lifecycle::plan(from, target, Trigger::Edit)? {
            update.status = Some(to.as_str().to_string());
            outcome.changed = true;
            guard = Some(from);
        }
        outcome.requested = Some(target);
    }
    update.last_modified_by_id = Some(user.user_id);

    let campaign = match guard {
        Some(from) => update_from_status(&state.pool, id, from, &update).await?,
        None => CampaignRepo::update(&state.pool, id, &update)
            .await?
            .ok_or_else(|| not_found(id))?,
    };
    Ok((campaign, outcome))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns?status=&limit=&offset=
pub async fn list_campaigns(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<CampaignListParams>,
) -> AppResult<Json<CampaignListResponse>> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<CampaignStatus>)
        .transpose()?;

    let filter = CampaignFilter {
        status: status.map(|s| s.as_str().to_string()),
        limit: params.clamped_limit(),
        offset: params.clamped_offset(),
    };
    let campaigns = CampaignRepo::list(&state.pool, &filter).await?;
    let count = CampaignRepo::count(&state.pool, filter.status.as_deref()).await?;

    Ok(Json(CampaignListResponse {
        campaigns,
        count,
        limit: filter.limit,
        offset: filter.offset,
    }))
}

/// POST /api/v1/campaigns
///
/// New campaigns always start in DRAFT.
pub async fn create_campaign(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaignRequest>,
) -> AppResult<impl IntoResponse> {
    let create = input.into_create(user.user_id)?;
    let campaign = CampaignRepo::create(&state.pool, &create).await?;

    tracing::info!(
        campaign_id = %campaign.id,
        user = %user.email,
        "Campaign created",
    );
    record_activity(
        &state,
        campaign.id,
        &user.email,
        ActivityAction::Created,
        json!({ "title": campaign.title, "topic": campaign.topic }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(CampaignResponse { campaign })))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_campaign(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CampaignDetailResponse>> {
    let campaign = find_campaign(&state.pool, id).await?;
    let activities =
        ActivityRepo::list_for_campaign(&state.pool, id, DEFAULT_ACTIVITY_LIMIT).await?;
    Ok(Json(CampaignDetailResponse {
        campaign,
        activities,
    }))
}

/// PUT /api/v1/campaigns/{id}
///
/// Logged as EDITED with the list of submitted fields.
pub async fn update_campaign(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaignRequest>,
) -> AppResult<Json<CampaignResponse>> {
    let (campaign, _) = apply_update(&state, &user, id, &input).await?;

    let updated_fields: Vec<String> = input.submitted().into_iter().map(|(k, _)| k).collect();
    tracing::info!(campaign_id = %id, fields = ?updated_fields, "Campaign updated");
    record_activity(
        &state,
        id,
        &user.email,
        ActivityAction::Edited,
        json!({ "updatedFields": updated_fields }),
    )
    .await;

    Ok(Json(CampaignResponse { campaign }))
}

/// PATCH /api/v1/campaigns/{id}
///
/// Logged under a label derived from the status change, with the submitted
/// fields as details.
pub async fn patch_campaign(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaignRequest>,
) -> AppResult<Json<CampaignResponse>> {
    let (campaign, outcome) = apply_update(&state, &user, id, &input).await?;

    let action = ActivityAction::for_status_change(outcome.requested, outcome.changed);
    tracing::info!(
        campaign_id = %id,
        status = %campaign.status,
        action = action.as_str(),
        "Campaign patched",
    );
    record_activity(
        &state,
        id,
        &user.email,
        action,
        Value::Object(input.submitted()),
    )
    .await;

    Ok(Json(CampaignResponse { campaign }))
}

/// DELETE /api/v1/campaigns/{id}
///
/// Always succeeds. Activities and reviews of the campaign are kept.
pub async fn delete_campaign(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let removed = CampaignRepo::delete(&state.pool, id).await?;
    tracing::info!(campaign_id = %id, removed, user = %user.email, "Campaign delete");
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/v1/campaigns/{id}/archive
///
/// Admin override: archives from any status. Archiving an archived campaign
/// returns it unchanged.
pub async fn archive_campaign(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CampaignResponse>> {
    let current = find_campaign(&state.pool, id).await?;
    let from = stored_status(&current)?;

    let Transition::Change { to, .. } =
        lifecycle::plan(from, CampaignStatus::Archived, Trigger::Archive)?
    else {
        return Ok(Json(CampaignResponse { campaign: current }));
    };

    let campaign =
        CampaignRepo::set_status(&state.pool, id, from.as_str(), to.as_str(), Some(user.user_id))
            .await?
            .ok_or_else(|| status_moved(id))?;

    tracing::info!(campaign_id = %id, from = %from, user = %user.email, "Campaign archived");
    record_activity(
        &state,
        id,
        &user.email,
        ActivityAction::Archived,
        json!({ "previousStatus": from }),
    )
    .await;

    Ok(Json(CampaignResponse { campaign }))
}

/// POST /api/v1/campaigns/{id}/generate
///
/// Runs the content-generation workflow on the stored campaign, stores the
/// result and its document links, and moves the campaign to SCHEDULED. A
/// workflow failure leaves the campaign untouched, and so does a status
/// change made by someone else while the workflow ran (409).
pub async fn generate_content(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CampaignResponse>> {
    let current = find_campaign(&state.pool, id).await?;
    let from = stored_status(&current)?;
    lifecycle::ensure_generatable(from)?;

    let image_channels = match present(current.image_channels.clone()) {
        Some(value) => parse_image_channels(&value)?,
        None => Default::default(),
    };
    let request = GenerationRequest {
        topic: current.title.clone(),
        product_skus: generation_skus(&parse_products(&current.products)?),
        channels: parse_channels(&current.channels)?,
        image_channels,
        notes: current.notes.clone(),
        content_focus: current.content_focus,
    };

    let content = generate_campaign(state.workflow.as_ref(), &request).await?;

    let update = UpdateCampaign {
        status: Some(CampaignStatus::Scheduled.as_str().to_string()),
        generated_content: Some(content.result),
        doc_url: content.doc_url.clone(),
        folder_url: content.folder_url.clone(),
        last_modified_by_id: Some(user.user_id),
        ..Default::default()
    };
    let campaign = update_from_status(&state.pool, id, from, &update).await?;

    tracing::info!(campaign_id = %id, user = %user.email, "Campaign content generated");
    record_activity(
        &state,
        id,
        &user.email,
        ActivityAction::Scheduled,
        json!({ "docUrl": content.doc_url, "folderUrl": content.folder_url }),
    )
    .await;

    Ok(Json(CampaignResponse { campaign }))
}
