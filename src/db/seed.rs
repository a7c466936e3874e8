//! Demo data for the `users` table

use sqlx::PgPool;

const DEFAULT_EMAIL: &str = "john.doe@example.com";
const DEFAULT_FIRST_NAME: &str = "John";
const DEFAULT_LAST_NAME: &str = "Doe";

/// The single demo user the seed binary writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl SeedUser {
    /// Reads `SEED_USER_EMAIL`, `SEED_USER_FIRST_NAME` and
    /// `SEED_USER_LAST_NAME`, falling back to John Doe
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            email: value("SEED_USER_EMAIL", DEFAULT_EMAIL),
            first_name: value("SEED_USER_FIRST_NAME", DEFAULT_FIRST_NAME),
            last_name: value("SEED_USER_LAST_NAME", DEFAULT_LAST_NAME),
        }
    }
}

/// Inserts the demo user unless the email is taken. Returns whether a row
/// was written.
pub async fn insert_demo_user(pool: &PgPool, user: &SeedUser) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO "users" ("email", "firstName", "lastName")
        VALUES ($1, $2, $3)
        ON CONFLICT ("email") DO NOTHING
        "#,
    )
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_to_john_doe() {
        let user = SeedUser::from_lookup(&|_: &str| None);
        assert_eq!(user.email, "john.doe@example.com");
        assert_eq!(user.first_name, "John");
        assert_eq!(user.last_name, "Doe");
    }

    #[test]
    fn test_overrides_from_environment() {
        let env: HashMap<&str, &str> = [
            ("SEED_USER_EMAIL", "ada@example.com"),
            ("SEED_USER_FIRST_NAME", "Ada"),
            ("SEED_USER_LAST_NAME", "  "),
        ]
        .into_iter()
        .collect();
        let user = SeedUser::from_lookup(&|key: &str| env.get(key).map(|v| v.to_string()));

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Doe");
    }

    #[tokio::test]
    #[ignore]
    async fn test_insert_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.expect("failed to connect");
        crate::db::schema::ensure_schema(&pool).await.unwrap();

        let user = SeedUser {
            email: format!("{}@example.com", crate::common::generate_id().to_lowercase()),
            first_name: "Seed".to_string(),
            last_name: "Test".to_string(),
        };
        assert!(insert_demo_user(&pool, &user).await.unwrap());
        assert!(!insert_demo_user(&pool, &user).await.unwrap());

        let stored = sqlx::query_as::<_, crate::db::schema::DemoUser>(
            r#"SELECT * FROM "users" WHERE "email" = $1"#,
        )
        .bind(&user.email)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(stored.first_name.as_deref(), Some("Seed"));
        assert_eq!(stored.last_name.as_deref(), Some("Test"));
    }
}
