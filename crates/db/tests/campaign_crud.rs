//! Integration tests for campaign, activity and review repositories.

use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use regatta_core::types::DbId;
use regatta_db::models::activity::CreateActivity;
use regatta_db::models::campaign::{CampaignFilter, CreateCampaign, UpdateCampaign};
use regatta_db::models::review::{NewReviewer, ReviewResponse};
use regatta_db::repositories::review_repo::StatusChange;
use regatta_db::repositories::{ActivityRepo, CampaignRepo, ReviewRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_campaign(title: &str) -> CreateCampaign {
    CreateCampaign {
        title: title.to_string(),
        topic: "diving gear".to_string(),
        notes: None,
        scheduled_date: None,
        channels: json!({"email": true, "blog": true}),
        image_channels: None,
        products: json!([{"sku": "FIN-1", "name": "Split Fin"}]),
        term_sales: json!([]),
        content_focus: 3,
        assigned_to_id: None,
        generated_content: None,
        doc_url: None,
        folder_url: None,
        created_by_id: None,
    }
}

fn reviewer(email: &str) -> NewReviewer {
    NewReviewer {
        reviewer_id: None,
        reviewer_email: email.to_string(),
    }
}

async fn insert_user(pool: &PgPool, email: &str, name: Option<&str>) -> DbId {
    let row: (DbId,) = sqlx::query_as("INSERT INTO users (email, name) VALUES ($1, $2) RETURNING id")
        .bind(email)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

async fn scheduled_campaign(pool: &PgPool, title: &str) -> DbId {
    let campaign = CampaignRepo::create(pool, &new_campaign(title)).await.unwrap();
    CampaignRepo::set_status(pool, campaign.id, "DRAFT", "SCHEDULED", None)
        .await
        .unwrap()
        .unwrap();
    campaign.id
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_then_fetch_round_trips(pool: PgPool) {
    let mut input = new_campaign("Fall Sale");
    input.scheduled_date = NaiveDate::from_ymd_opt(2025, 10, 3);
    let created = CampaignRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.status, "DRAFT");

    let fetched = CampaignRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Fall Sale");
    assert_eq!(fetched.topic, "diving gear");
    assert_eq!(fetched.channels, json!({"email": true, "blog": true}));
    assert_eq!(fetched.products, input.products);
    assert_eq!(fetched.scheduled_date, NaiveDate::from_ymd_opt(2025, 10, 3));
    assert_eq!(fetched.content_focus, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn actor_recorded_only_when_user_exists(pool: PgPool) {
    let user_id = insert_user(&pool, "ann@shop.com", Some("Ann")).await;

    let mut known = new_campaign("Known");
    known.created_by_id = Some(user_id);
    let known = CampaignRepo::create(&pool, &known).await.unwrap();
    assert_eq!(known.created_by_id, Some(user_id));
    assert_eq!(known.last_modified_by_id, Some(user_id));

    let mut stranger = new_campaign("Stranger");
    stranger.created_by_id = Some(uuid::Uuid::new_v4());
    let stranger = CampaignRepo::create(&pool, &stranger).await.unwrap();
    assert_eq!(stranger.created_by_id, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_and_counts(pool: PgPool) {
    for i in 0..3 {
        CampaignRepo::create(&pool, &new_campaign(&format!("Draft {i}"))).await.unwrap();
    }
    scheduled_campaign(&pool, "Scheduled").await;

    let page = CampaignRepo::list(
        &pool,
        &CampaignFilter { status: Some("DRAFT".into()), limit: 2, offset: 0 },
    )
    .await
    .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(CampaignRepo::count(&pool, Some("DRAFT")).await.unwrap(), 3);
    assert_eq!(CampaignRepo::count(&pool, None).await.unwrap(), 4);

    let all = CampaignRepo::list(&pool, &CampaignFilter { status: None, limit: 50, offset: 0 })
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_applies_only_present_fields(pool: PgPool) {
    let created = CampaignRepo::create(&pool, &new_campaign("Old")).await.unwrap();
    let updated = CampaignRepo::update(
        &pool,
        created.id,
        &UpdateCampaign { title: Some("New".into()), ..Default::default() },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "New");
    assert_eq!(updated.topic, "diving gear");
    assert!(updated.updated_at >= created.updated_at);

    let missing = CampaignRepo::update(&pool, uuid::Uuid::new_v4(), &UpdateCampaign::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn set_status_is_guarded(pool: PgPool) {
    let created = CampaignRepo::create(&pool, &new_campaign("Guarded")).await.unwrap();
    let stale = CampaignRepo::set_status(&pool, created.id, "SCHEDULED", "PENDING_REVIEW", None)
        .await
        .unwrap();
    assert!(stale.is_none());

    let fetched = CampaignRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, "DRAFT");
}

#[sqlx::test(migrations = "./migrations")]
async fn status_update_is_guarded_on_the_read_status(pool: PgPool) {
    let created = CampaignRepo::create(&pool, &new_campaign("Racing")).await.unwrap();
    CampaignRepo::set_status(&pool, created.id, "DRAFT", "ARCHIVED", None)
        .await
        .unwrap()
        .unwrap();

    let stale = CampaignRepo::update_from_status(
        &pool,
        created.id,
        "DRAFT",
        &UpdateCampaign {
            status: Some("SCHEDULED".into()),
            doc_url: Some("https://docs.example.com/d/1".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(stale.is_none());

    let fetched = CampaignRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, "ARCHIVED");
    assert!(fetched.doc_url.is_none());

    let current = CampaignRepo::update_from_status(
        &pool,
        created.id,
        "ARCHIVED",
        &UpdateCampaign { title: Some("Still racing".into()), ..Default::default() },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(current.title, "Still racing");
}

#[sqlx::test(migrations = "./migrations")]
async fn create_keeps_imported_content(pool: PgPool) {
    let mut input = new_campaign("Imported");
    input.generated_content = Some(json!({"email": {"subject": "Fins"}}));
    input.doc_url = Some("https://docs.example.com/d/9".into());
    input.folder_url = Some("https://drive.example.com/f/9".into());

    let created = CampaignRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.status, "DRAFT");
    assert_eq!(created.generated_content, Some(json!({"email": {"subject": "Fins"}})));
    assert_eq!(created.doc_url.as_deref(), Some("https://docs.example.com/d/9"));
    assert_eq!(created.folder_url.as_deref(), Some("https://drive.example.com/f/9"));
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_orphans_activities(pool: PgPool) {
    let created = CampaignRepo::create(&pool, &new_campaign("Doomed")).await.unwrap();
    ActivityRepo::create(
        &pool,
        &CreateActivity {
            campaign_id: created.id,
            user_email: "ann@shop.com".into(),
            action: "CREATED".into(),
            details: Some(json!({"title": "Doomed"})),
        },
    )
    .await
    .unwrap();

    assert!(CampaignRepo::delete(&pool, created.id).await.unwrap());
    assert!(!CampaignRepo::delete(&pool, created.id).await.unwrap());
    assert!(CampaignRepo::find_by_id(&pool, created.id).await.unwrap().is_none());

    let activities = ActivityRepo::list_for_campaign(&pool, created.id, 50).await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].action, "CREATED");
}

#[sqlx::test(migrations = "./migrations")]
async fn scheduled_between_is_inclusive(pool: PgPool) {
    for (title, date) in [("Before", (5, 31)), ("First", (6, 1)), ("Last", (6, 30))] {
        let mut input = new_campaign(title);
        input.scheduled_date = NaiveDate::from_ymd_opt(2025, date.0, date.1);
        CampaignRepo::create(&pool, &input).await.unwrap();
    }
    let june = CampaignRepo::list_scheduled_between(
        &pool,
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
    )
    .await
    .unwrap();
    let titles: Vec<&str> = june.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Last"]);
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn activities_newest_first_and_limited(pool: PgPool) {
    let id = uuid::Uuid::new_v4();
    for action in ["CREATED", "EDITED", "SCHEDULED"] {
        ActivityRepo::create(
            &pool,
            &CreateActivity {
                campaign_id: id,
                user_email: "ann@shop.com".into(),
                action: action.into(),
                details: None,
            },
        )
        .await
        .unwrap();
    }
    let latest = ActivityRepo::list_for_campaign(&pool, id, 2).await.unwrap();
    assert_eq!(latest.len(), 2);
    assert!(latest[0].created_at >= latest[1].created_at);
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn open_round_creates_one_pending_review_per_reviewer(pool: PgPool) {
    let id = scheduled_campaign(&pool, "Review me").await;
    let (campaign, reviews) = ReviewRepo::open_round(
        &pool,
        id,
        "SCHEDULED",
        "ann@shop.com",
        &[reviewer("bob@shop.com"), reviewer("cy@shop.com")],
        None,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(campaign.status, "PENDING_REVIEW");
    assert_eq!(reviews.len(), 2);
    assert!(reviews.iter().all(|r| r.status == "PENDING" && r.requested_by_email == "ann@shop.com"));
    assert_eq!(ReviewRepo::list_for_campaign(&pool, id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn open_round_writes_nothing_when_status_moved(pool: PgPool) {
    let created = CampaignRepo::create(&pool, &new_campaign("Still draft")).await.unwrap();
    let outcome = ReviewRepo::open_round(
        &pool,
        created.id,
        "SCHEDULED",
        "ann@shop.com",
        &[reviewer("bob@shop.com")],
        None,
    )
    .await
    .unwrap();
    assert!(outcome.is_none());
    assert!(ReviewRepo::list_for_campaign(&pool, created.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn approval_flips_only_pending_reviews(pool: PgPool) {
    let id = scheduled_campaign(&pool, "Approve me").await;
    let (_, reviews) = ReviewRepo::open_round(
        &pool,
        id,
        "SCHEDULED",
        "ann@shop.com",
        &[reviewer("bob@shop.com"), reviewer("cy@shop.com"), reviewer("di@shop.com")],
        None,
    )
    .await
    .unwrap()
    .unwrap();

    let answered = ReviewRepo::respond(
        &pool,
        reviews[0].id,
        &ReviewResponse { status: "CHANGES_REQUESTED".into(), comments: Some("tone".into()) },
        None,
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(answered.0.status, "CHANGES_REQUESTED");
    assert!(answered.1.is_none());

    let (campaign, flipped) = ReviewRepo::approve_campaign(
        &pool,
        id,
        StatusChange { expected: "PENDING_REVIEW", status: "APPROVED" },
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(campaign.status, "APPROVED");
    assert_eq!(flipped, 2);

    let after = ReviewRepo::list_for_campaign(&pool, id).await.unwrap();
    let untouched = after.iter().find(|r| r.id == reviews[0].id).unwrap();
    assert_eq!(untouched.status, "CHANGES_REQUESTED");
    assert!(after
        .iter()
        .filter(|r| r.id != reviews[0].id)
        .all(|r| r.status == "APPROVED" && r.responded_at.is_some()));
}

#[sqlx::test(migrations = "./migrations")]
async fn pushback_moves_campaign_back_to_scheduled(pool: PgPool) {
    let id = scheduled_campaign(&pool, "Push back").await;
    let (_, reviews) = ReviewRepo::open_round(
        &pool,
        id,
        "SCHEDULED",
        "ann@shop.com",
        &[reviewer("bob@shop.com")],
        None,
    )
    .await
    .unwrap()
    .unwrap();

    let (review, campaign) = ReviewRepo::respond(
        &pool,
        reviews[0].id,
        &ReviewResponse { status: "REJECTED".into(), comments: None },
        Some(StatusChange { expected: "PENDING_REVIEW", status: "SCHEDULED" }),
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(review.status, "REJECTED");
    assert!(review.responded_at.is_some());
    assert_eq!(campaign.unwrap().status, "SCHEDULED");

    let again = ReviewRepo::respond(
        &pool,
        reviews[0].id,
        &ReviewResponse { status: "APPROVED".into(), comments: None },
        None,
        None,
    )
    .await
    .unwrap();
    assert!(again.is_none());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn users_ordered_by_name(pool: PgPool) {
    insert_user(&pool, "zed@shop.com", Some("Zed")).await;
    insert_user(&pool, "nameless@shop.com", None).await;
    insert_user(&pool, "amy@shop.com", Some("Amy")).await;

    let users = UserRepo::list(&pool).await.unwrap();
    let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["amy@shop.com", "zed@shop.com", "nameless@shop.com"]);
    assert!(users.iter().all(|u| u.role == "EDITOR"));
}
