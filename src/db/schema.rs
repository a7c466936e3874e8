// src/db/schema.rs
//! Persisted record types and the idempotent schema bootstrap
//!
//! Table and column names are camelCase and quoted: the auth handler reads
//! and writes these exact shapes, so they are a compatibility contract rather
//! than a free design choice. Timestamps are stored as zone-less UTC.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::common::helpers::{serialize_optional_timestamp, serialize_timestamp};

// ============================================================================
// AUTH TABLES
// ============================================================================

/// `user` table
#[derive(FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: NaiveDateTime,
}

/// `session` table
#[derive(FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub expires_at: NaiveDateTime,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: NaiveDateTime,
}

/// `account` table: one row per (provider, external account id)
#[derive(FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub provider_id: String,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(serialize_with = "serialize_optional_timestamp")]
    pub access_token_expires_at: Option<NaiveDateTime>,
    #[serde(serialize_with = "serialize_optional_timestamp")]
    pub refresh_token_expires_at: Option<NaiveDateTime>,
    pub scope: Option<String>,
    #[serde(skip_serializing)]
    pub id_token: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: NaiveDateTime,
}

/// `verification` table
#[derive(FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub id: String,
    pub identifier: String,
    pub value: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub expires_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: NaiveDateTime,
}

// ============================================================================
// DEMO TABLE
// ============================================================================

/// Application-specific `users` table written by the seed binary.
/// Unrelated to the auth `user` table.
#[derive(FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct DemoUser {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
}

// ============================================================================
// SCHEMA BOOTSTRAP
// ============================================================================

const CREATE_USER_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "user" (
        "id" TEXT PRIMARY KEY,
        "name" TEXT NOT NULL,
        "email" TEXT NOT NULL,
        "emailVerified" BOOLEAN NOT NULL,
        "image" TEXT,
        "createdAt" TIMESTAMP NOT NULL,
        "updatedAt" TIMESTAMP NOT NULL
    )
"#;

const CREATE_USER_EMAIL_INDEX: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS "user_email_key" ON "user" ("email")
"#;

const CREATE_SESSION_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "session" (
        "id" TEXT PRIMARY KEY,
        "userId" TEXT NOT NULL REFERENCES "user"("id"),
        "token" TEXT NOT NULL UNIQUE,
        "expiresAt" TIMESTAMP NOT NULL,
        "ipAddress" TEXT,
        "userAgent" TEXT,
        "createdAt" TIMESTAMP NOT NULL,
        "updatedAt" TIMESTAMP NOT NULL
    )
"#;

const CREATE_ACCOUNT_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "account" (
        "id" TEXT PRIMARY KEY,
        "userId" TEXT NOT NULL REFERENCES "user"("id"),
        "accountId" TEXT NOT NULL,
        "providerId" TEXT NOT NULL,
        "accessToken" TEXT,
        "refreshToken" TEXT,
        "accessTokenExpiresAt" TIMESTAMP,
        "refreshTokenExpiresAt" TIMESTAMP,
        "scope" TEXT,
        "idToken" TEXT,
        "password" TEXT,
        "createdAt" TIMESTAMP NOT NULL,
        "updatedAt" TIMESTAMP NOT NULL
    )
"#;

const CREATE_VERIFICATION_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "verification" (
        "id" TEXT PRIMARY KEY,
        "identifier" TEXT NOT NULL,
        "value" TEXT NOT NULL,
        "expiresAt" TIMESTAMP NOT NULL,
        "createdAt" TIMESTAMP NOT NULL,
        "updatedAt" TIMESTAMP NOT NULL
    )
"#;

const CREATE_DEMO_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "users" (
        "id" SERIAL PRIMARY KEY,
        "email" TEXT NOT NULL UNIQUE,
        "firstName" TEXT,
        "lastName" TEXT,
        "createdAt" TIMESTAMP NOT NULL DEFAULT now()
    )
"#;

/// Statements in dependency order: `user` before the tables referencing it
pub const SCHEMA_STATEMENTS: [&str; 6] = [
    CREATE_USER_TABLE,
    CREATE_USER_EMAIL_INDEX,
    CREATE_SESSION_TABLE,
    CREATE_ACCOUNT_TABLE,
    CREATE_VERIFICATION_TABLE,
    CREATE_DEMO_USERS_TABLE,
];

/// Creates any missing tables. Existing tables are left untouched; there is
/// no versioning and no down path.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("✅ Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_user_serializes_with_auth_field_names() {
        let user = User {
            id: "user-1".to_string(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            email_verified: false,
            image: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["emailVerified"], false);
        assert_eq!(json["createdAt"], "2024-01-02T03:04:05.000Z");
        assert!(json["image"].is_null());
    }

    #[test]
    fn test_account_never_serializes_secrets() {
        let account = Account {
            id: "acc-1".to_string(),
            user_id: "user-1".to_string(),
            account_id: "user-1".to_string(),
            provider_id: "credential".to_string(),
            access_token: Some("access".to_string()),
            refresh_token: Some("refresh".to_string()),
            access_token_expires_at: None,
            refresh_token_expires_at: None,
            scope: None,
            id_token: Some("id".to_string()),
            password: Some("$argon2id$...".to_string()),
            created_at: timestamp(),
            updated_at: timestamp(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("accessToken").is_none());
        assert!(json.get("refreshToken").is_none());
        assert!(json.get("idToken").is_none());
        assert_eq!(json["providerId"], "credential");
    }

    #[test]
    fn test_schema_creates_user_table_first() {
        assert!(SCHEMA_STATEMENTS[0].contains(r#"CREATE TABLE IF NOT EXISTS "user""#));
        for statement in &SCHEMA_STATEMENTS[2..4] {
            assert!(statement.contains(r#"REFERENCES "user"("id")"#));
        }
        assert!(CREATE_SESSION_TABLE.contains(r#""token" TEXT NOT NULL UNIQUE"#));
    }

    #[test]
    fn test_user_email_is_unique() {
        assert_eq!(SCHEMA_STATEMENTS[1], CREATE_USER_EMAIL_INDEX);
        assert!(CREATE_USER_EMAIL_INDEX.contains("CREATE UNIQUE INDEX IF NOT EXISTS"));
        assert!(CREATE_USER_EMAIL_INDEX.contains(r#"ON "user" ("email")"#));
    }
}
