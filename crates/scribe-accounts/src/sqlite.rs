//! SQLite Account Store
//!
//! Two tables, created at connect time: `users` and `usage`. Timestamps are
//! stored as RFC 3339 text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::actor::Actor;
use crate::error::{AccountError, Result};
use crate::store::AccountStore;
use crate::user::{Plan, User};

const CREATE_USERS: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    name TEXT,
    picture TEXT,
    plan TEXT NOT NULL DEFAULT 'free',
    email_verified INTEGER NOT NULL DEFAULT 1,
    stripe_customer_id TEXT,
    stripe_subscription_id TEXT,
    created_at TEXT NOT NULL
)";

const CREATE_USAGE: &str = "
CREATE TABLE IF NOT EXISTS usage (
    actor_type TEXT NOT NULL,
    actor_id TEXT NOT NULL,
    used INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (actor_type, actor_id)
)";

/// SQLite-backed account store
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `db_path` and ensure the
    /// schema exists.
    pub async fn connect(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_USERS).execute(&pool).await?;
        sqlx::query(CREATE_USAGE).execute(&pool).await?;

        Ok(Self { pool })
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        let plan: String = row.try_get("plan")?;
        let email_verified: i64 = row.try_get("email_verified")?;
        let created_at: String = row.try_get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| AccountError::Storage(format!("bad created_at: {e}")))?;

        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
            picture: row.try_get::<Option<String>, _>("picture")?.unwrap_or_default(),
            plan: Plan::from_str(&plan),
            email_verified: email_verified != 0,
            stripe_customer_id: row.try_get("stripe_customer_id")?,
            stripe_subscription_id: row.try_get("stripe_subscription_id")?,
            created_at,
        })
    }

    async fn fetch_user(&self, column: &str, value: &str) -> Result<Option<User>> {
        // Column names are fixed by the callers below, never user input.
        let query = format!("SELECT * FROM users WHERE {column} = ?");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.fetch_user("id", id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_user("email", &email.trim().to_lowercase()).await
    }

    async fn get_user_by_customer(&self, customer_id: &str) -> Result<Option<User>> {
        self.fetch_user("stripe_customer_id", customer_id).await
    }

    async fn create_or_get_by_email(&self, email: &str, name: &str, picture: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AccountError::MissingEmail);
        }

        if let Some(existing) = self.fetch_user("email", &email).await? {
            let name = if name.is_empty() { existing.name.clone() } else { name.to_string() };
            let picture = if picture.is_empty() {
                existing.picture.clone()
            } else {
                picture.to_string()
            };
            sqlx::query("UPDATE users SET name = ?, picture = ? WHERE email = ?")
                .bind(&name)
                .bind(&picture)
                .bind(&email)
                .execute(&self.pool)
                .await?;
            return Ok(User {
                name,
                picture,
                ..existing
            });
        }

        let user = User::new(email, name, picture);
        sqlx::query(
            "INSERT INTO users (id, email, name, picture, plan, email_verified, created_at)
             VALUES (?, ?, ?, ?, 'free', 1, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.picture)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    async fn set_stripe_customer(&self, user_id: &str, customer_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET stripe_customer_id = ? WHERE id = ?")
            .bind(customer_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound(user_id.into()));
        }
        Ok(())
    }

    async fn upgrade_to_pro(
        &self,
        user_id: &str,
        customer_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users
             SET plan = 'pro',
                 stripe_customer_id = COALESCE(?, stripe_customer_id),
                 stripe_subscription_id = COALESCE(?, stripe_subscription_id)
             WHERE id = ?",
        )
        .bind(customer_id)
        .bind(subscription_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound(user_id.into()));
        }
        Ok(())
    }

    async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<()> {
        let result = sqlx::query("UPDATE users SET plan = ? WHERE id = ?")
            .bind(plan.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound(user_id.into()));
        }
        Ok(())
    }

    async fn usage_get(&self, actor: &Actor) -> Result<u32> {
        if actor.id.is_empty() {
            return Ok(0);
        }
        let row = sqlx::query("SELECT used FROM usage WHERE actor_type = ? AND actor_id = ?")
            .bind(actor.kind.as_str())
            .bind(&actor.id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(|r| r.try_get::<i64, _>("used"))
            .transpose()?
            .unwrap_or(0) as u32)
    }

    async fn usage_incr(&self, actor: &Actor, by: u32) -> Result<u32> {
        if actor.id.is_empty() {
            return Ok(0);
        }
        let row = sqlx::query(
            "INSERT INTO usage (actor_type, actor_id, used, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (actor_type, actor_id)
             DO UPDATE SET used = usage.used + excluded.used, updated_at = excluded.updated_at
             RETURNING used",
        )
        .bind(actor.kind.as_str())
        .bind(&actor.id)
        .bind(i64::from(by))
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get::<i64, _>("used")? as u32)
    }
}
