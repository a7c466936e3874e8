//! Queries against the auth tables
//!
//! This is the only code that reads or writes `user`, `session`, `account`
//! and `verification` rows.

use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::common::generate_id;
use crate::db::schema::{Account, Session, User, Verification};

/// Provider id of email/password accounts
pub const CREDENTIAL_PROVIDER: &str = "credential";

/// Fields for a new session row
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: String,
    pub token: String,
    pub expires_at: NaiveDateTime,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct AuthStore {
    pool: PgPool,
}

impl AuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // USERS
    // ========================================================================

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE "email" = $1"#)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Inserts a user together with its credential account in one transaction.
    ///
    /// Returns `None` when the email is already registered. Concurrent
    /// sign-ups for one email serialize on a transaction-scoped advisory lock
    /// and the `user_email_key` index backs that up.
    pub async fn create_credential_user(
        &self,
        name: &str,
        email: &str,
        image: Option<&str>,
        password_hash: &str,
        now: NaiveDateTime,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        let taken: Option<(String,)> =
            sqlx::query_as(r#"SELECT "id" FROM "user" WHERE "email" = $1"#)
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;
        if taken.is_some() {
            return Ok(None);
        }

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "user" ("id", "name", "email", "emailVerified", "image", "createdAt", "updatedAt")
            VALUES ($1, $2, $3, FALSE, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(generate_id())
        .bind(name)
        .bind(email)
        .bind(image)
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        let user = match inserted {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => return Ok(None),
            Err(e) => return Err(e),
        };

        sqlx::query(
            r#"
            INSERT INTO "account" ("id", "userId", "accountId", "providerId", "password", "createdAt", "updatedAt")
            VALUES ($1, $2, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(generate_id())
        .bind(&user.id)
        .bind(CREDENTIAL_PROVIDER)
        .bind(password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(user))
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    pub async fn find_credential_account(
        &self,
        user_id: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"SELECT * FROM "account" WHERE "userId" = $1 AND "providerId" = $2"#,
        )
        .bind(user_id)
        .bind(CREDENTIAL_PROVIDER)
        .fetch_optional(&self.pool)
        .await
    }

    // ========================================================================
    // SESSIONS
    // ========================================================================

    pub async fn create_session(
        &self,
        session: NewSession,
        now: NaiveDateTime,
    ) -> Result<Session, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO "session" ("id", "userId", "token", "expiresAt", "ipAddress", "userAgent", "createdAt", "updatedAt")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(generate_id())
        .bind(&session.user_id)
        .bind(&session.token)
        .bind(session.expires_at)
        .bind(&session.ip_address)
        .bind(&session.user_agent)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_session_by_token(&self, token: &str) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(r#"SELECT * FROM "session" WHERE "token" = $1"#)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn extend_session(
        &self,
        token: &str,
        expires_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"UPDATE "session" SET "expiresAt" = $2, "updatedAt" = $3 WHERE "token" = $1 RETURNING *"#,
        )
        .bind(token)
        .bind(expires_at)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete_session(&self, token: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "session" WHERE "token" = $1"#)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ========================================================================
    // VERIFICATIONS
    // ========================================================================
    // No flow writes verifications yet; these keep the table shape checked.

    #[cfg(test)]
    pub async fn create_verification(
        &self,
        identifier: &str,
        value: &str,
        expires_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Verification, sqlx::Error> {
        sqlx::query_as::<_, Verification>(
            r#"
            INSERT INTO "verification" ("id", "identifier", "value", "expiresAt", "createdAt", "updatedAt")
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(generate_id())
        .bind(identifier)
        .bind(value)
        .bind(expires_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    #[cfg(test)]
    pub async fn find_verification(
        &self,
        identifier: &str,
    ) -> Result<Option<Verification>, sqlx::Error> {
        sqlx::query_as::<_, Verification>(
            r#"SELECT * FROM "verification" WHERE "identifier" = $1 ORDER BY "createdAt" DESC LIMIT 1"#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Postgres `unique_violation`
fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(e) => e.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    //! Round-trip tests against a live PostgreSQL.
    //! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

    use super::*;
    use crate::db::schema::ensure_schema;
    use chrono::{Duration, Timelike, Utc};

    async fn store() -> AuthStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.expect("failed to connect");
        ensure_schema(&pool).await.expect("failed to create schema");
        AuthStore::new(pool)
    }

    /// Postgres keeps microseconds; trim so values compare equal
    fn now() -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        now.with_nanosecond(now.nanosecond() / 1_000 * 1_000).unwrap()
    }

    fn unique_email() -> String {
        format!("{}@example.com", generate_id().to_lowercase())
    }

    #[tokio::test]
    #[ignore]
    async fn test_user_and_account_round_trip() {
        let store = store().await;
        let now = now();
        let email = unique_email();

        let user = store
            .create_credential_user("Jane Doe", &email, Some("https://img.test/a.png"), "$argon2id$hash", now)
            .await
            .unwrap()
            .unwrap();

        let fetched = store.find_user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(fetched, user);
        assert_eq!(fetched.name, "Jane Doe");
        assert!(!fetched.email_verified);
        assert_eq!(fetched.created_at, now);

        let account = store.find_credential_account(&user.id).await.unwrap().unwrap();
        assert_eq!(account.account_id, user.id);
        assert_eq!(account.provider_id, CREDENTIAL_PROVIDER);
        assert_eq!(account.password.as_deref(), Some("$argon2id$hash"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_second_credential_user_for_email_is_refused() {
        let store = store().await;
        let now = now();
        let email = unique_email();

        let first = store
            .create_credential_user("First", &email, None, "$argon2id$hash", now)
            .await
            .unwrap();
        assert!(first.is_some());

        let second = store
            .create_credential_user("Second", &email, None, "$argon2id$hash", now)
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_session_round_trip() {
        let store = store().await;
        let now = now();
        let user = store
            .create_credential_user("Sam", &unique_email(), None, "$argon2id$hash", now)
            .await
            .unwrap()
            .unwrap();

        let created = store
            .create_session(
                NewSession {
                    user_id: user.id.clone(),
                    token: crate::common::generate_session_token(),
                    expires_at: now + Duration::days(7),
                    ip_address: Some("203.0.113.7".to_string()),
                    user_agent: Some("test-agent".to_string()),
                },
                now,
            )
            .await
            .unwrap();

        let fetched = store.find_session_by_token(&created.token).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        assert_eq!(store.delete_session(&created.token).await.unwrap(), 1);
        assert!(store.find_session_by_token(&created.token).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_verification_round_trip() {
        let store = store().await;
        let now = now();
        let identifier = unique_email();

        let created = store
            .create_verification(&identifier, "123456", now + Duration::minutes(15), now)
            .await
            .unwrap();

        let fetched = store.find_verification(&identifier).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.value, "123456");
    }
}
