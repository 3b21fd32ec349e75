//! `SQLite` implementation of [`OverlayRepository`].

use std::collections::HashMap;

use sqlx::SqlitePool;

use hearth_app::ports::OverlayRepository;
use hearth_domain::device::StateMap;
use hearth_domain::error::HearthError;
use hearth_domain::id::AccountId;
use hearth_domain::time::Timestamp;

use crate::error::StorageError;

const SELECT_ONE: &str =
    "SELECT state_json FROM device_overlays WHERE account_id = ? AND device_id = ?";

const SELECT_FOR_ACCOUNT: &str =
    "SELECT device_id, state_json FROM device_overlays WHERE account_id = ?";

const UPSERT: &str = r"
    INSERT INTO device_overlays (account_id, device_id, state_json, updated_at)
    VALUES (?, ?, ?, ?)
    ON CONFLICT (account_id, device_id)
    DO UPDATE SET state_json = excluded.state_json, updated_at = excluded.updated_at
";

const DELETE_FOR_ACCOUNT: &str = "DELETE FROM device_overlays WHERE account_id = ?";

/// `SQLite`-backed overlay repository.
pub struct SqliteOverlayRepository {
    pool: SqlitePool,
}

impl SqliteOverlayRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl OverlayRepository for SqliteOverlayRepository {
    async fn get(
        &self,
        account_id: AccountId,
        device_id: &str,
    ) -> Result<Option<StateMap>, HearthError> {
        let row: Option<(String,)> = sqlx::query_as(SELECT_ONE)
            .bind(account_id.to_string())
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.map(|(json,)| serde_json::from_str(&json).map_err(StorageError::from))
            .transpose()
            .map_err(HearthError::from)
    }

    async fn get_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<HashMap<String, StateMap>, HearthError> {
        let rows: Vec<(String, String)> = sqlx::query_as(SELECT_FOR_ACCOUNT)
            .bind(account_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let mut overlays = HashMap::with_capacity(rows.len());
        for (device_id, json) in rows {
            let state: StateMap = serde_json::from_str(&json).map_err(StorageError::from)?;
            overlays.insert(device_id, state);
        }
        Ok(overlays)
    }

    async fn upsert(
        &self,
        account_id: AccountId,
        device_id: &str,
        state: &StateMap,
        updated_at: Timestamp,
    ) -> Result<(), HearthError> {
        let json = serde_json::to_string(state).map_err(StorageError::from)?;

        sqlx::query(UPSERT)
            .bind(account_id.to_string())
            .bind(device_id)
            .bind(&json)
            .bind(updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn delete_for_account(&self, account_id: AccountId) -> Result<(), HearthError> {
        sqlx::query(DELETE_FOR_ACCOUNT)
            .bind(account_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
