use async_trait::async_trait;
use domain::{DeviceDirectory, DeviceRecord, DirectoryError};
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::info;

/// Postgres-backed device directory. The table doubles as the state
/// store: `compare_and_swap` is a single conditional UPDATE, so the
/// comparison and the transition cannot interleave with a concurrent
/// writer.
pub struct PgDeviceDirectory {
    pool: PgPool,
}

impl PgDeviceDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, DirectoryError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| DirectoryError(format!("Database connection error: {e}")))?;

        Ok(Self::new(pool))
    }

    /// Create the devices table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DirectoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS devices (
                id          TEXT PRIMARY KEY,
                owner       TEXT NOT NULL,
                parent      TEXT,
                state_token TEXT,
                enabled     BOOLEAN NOT NULL DEFAULT TRUE,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DirectoryError(format!("Database error: {e}")))?;

        info!("Device directory schema verified");
        Ok(())
    }

    pub async fn upsert(&self, record: &DeviceRecord) -> Result<(), DirectoryError> {
        sqlx::query(
            r#"
            INSERT INTO devices (id, owner, parent, state_token, enabled, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (id) DO UPDATE SET
                owner = EXCLUDED.owner,
                parent = EXCLUDED.parent,
                state_token = EXCLUDED.state_token,
                enabled = EXCLUDED.enabled,
                updated_at = NOW()
            "#,
        )
        .bind(&record.id)
        .bind(&record.owner)
        .bind(&record.parent)
        .bind(&record.state_token)
        .bind(record.enabled)
        .execute(&self.pool)
        .await
        .map_err(|e| DirectoryError(format!("Database error: {e}")))?;

        Ok(())
    }

    /// Replace the state token only while it still equals `expected`.
    /// `IS NOT DISTINCT FROM` makes the comparison null-safe, matching
    /// the guard's treatment of devices without a token.
    pub async fn compare_and_swap(
        &self,
        device_id: &str,
        expected: Option<&str>,
        next: Option<&str>,
    ) -> Result<bool, DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET state_token = $2, updated_at = NOW()
            WHERE id = $1 AND state_token IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(device_id)
        .bind(next)
        .bind(expected)
        .execute(&self.pool)
        .await
        .map_err(|e| DirectoryError(format!("Database error: {e}")))?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl DeviceDirectory for PgDeviceDirectory {
    async fn get(&self, device_id: &str) -> Result<Option<DeviceRecord>, DirectoryError> {
        let row = sqlx::query(
            "SELECT id, owner, parent, state_token, enabled FROM devices WHERE id = $1",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError(format!("Database error: {e}")))?;

        Ok(row.map(|row| DeviceRecord {
            id: row.get("id"),
            owner: row.get("owner"),
            parent: row.get("parent"),
            state_token: row.get("state_token"),
            enabled: row.get("enabled"),
        }))
    }
}
