use sqlx::PgPool;

/// Connect, migrate, verify the four tables exist.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    regatta_db::health_check(&pool).await.unwrap();

    let tables = ["users", "campaigns", "campaign_activities", "campaign_reviews"];
    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The status CHECK constraint rejects values outside the enumeration.
#[sqlx::test(migrations = "./migrations")]
async fn test_status_check_constraint(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO campaigns (title, topic, status, channels) VALUES ('t', 't', 'LIVE', '{}')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

/// content_focus is bounded to 1..=5 at the table level too.
#[sqlx::test(migrations = "./migrations")]
async fn test_content_focus_check_constraint(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO campaigns (title, topic, channels, content_focus) VALUES ('t', 't', '{}', 9)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}
