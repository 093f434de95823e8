//! Repository for the `users` table (read-only).

use sqlx::PgPool;

use crate::models::user::User;

const COLUMNS: &str = "id, email, name, avatar_url, role";

pub struct UserRepo;

impl UserRepo {
    /// The reviewer directory ordered by display name, unnamed users last.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY name ASC NULLS LAST, email ASC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }
}
