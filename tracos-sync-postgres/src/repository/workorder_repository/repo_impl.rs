use sqlx::{postgres::PgRow, PgPool, Row};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tracos_sync_api::{is_sql_identifier, StoreError, StoreResult};
use tracos_sync_db::models::tracos::{TracosWorkorderModel, WorkorderStatus};

use crate::utils::TryFromRow;

pub(crate) const WORKORDER_COLUMNS: &str = "id, number, status, title, description, created_at, \
     updated_at, deleted, deleted_at, is_synced, synced_at";

pub struct WorkorderRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
    pub(crate) collection: String,
    pub(crate) operation_timeout: Duration,
}

impl WorkorderRepositoryImpl {
    pub fn new(
        pool: Arc<PgPool>,
        collection: &str,
        operation_timeout: Duration,
    ) -> StoreResult<Self> {
        if !is_sql_identifier(collection) {
            return Err(StoreError::Query(format!(
                "Invalid collection name `{collection}`"
            )));
        }
        Ok(Self {
            pool,
            collection: collection.to_string(),
            operation_timeout,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl TryFromRow<PgRow> for TracosWorkorderModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let status: String = row.try_get("status")?;
        Ok(TracosWorkorderModel {
            id: Some(row.try_get("id")?),
            number: row.try_get("number")?,
            status: status.parse::<WorkorderStatus>()?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted: row.try_get("deleted")?,
            deleted_at: row.try_get("deleted_at")?,
            is_synced: row.try_get("is_synced")?,
            synced_at: row.try_get("synced_at")?,
        })
    }
}
