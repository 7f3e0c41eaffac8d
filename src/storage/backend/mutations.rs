//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{apply_patch, site_to_active_model};
use super::operations::upsert_hit;
use super::retry;
use crate::errors::{Result, SitebeaconError};
use crate::storage::models::{Hit, HitPatch, Site};

use migration::entities::{hit, site};

impl SeaOrmStorage {
    /// Insert or overwrite a site record, keyed by id.
    pub async fn put_site(&self, s: Site) -> Result<()> {
        use sea_orm::sea_query::OnConflict;

        let active_model = site_to_active_model(&s);

        site::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(site::Column::Id)
                    .update_columns([
                        site::Column::Name,
                        site::Column::Domain,
                        site::Column::CreatedAt,
                        site::Column::IsActive,
                        site::Column::SessionTimeoutMin,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                SitebeaconError::database_operation(format!("Upsert site '{}' failed: {}", s.id, e))
            })?;

        info!("Site upserted: {}", s.id);
        Ok(())
    }

    /// Delete a site and every hit recorded for it, in one transaction.
    pub async fn delete_site(&self, site_id: &str) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SitebeaconError::database_operation(format!("Begin failed: {}", e)))?;

        let result = site::Entity::delete_by_id(site_id)
            .exec(&txn)
            .await
            .map_err(|e| {
                SitebeaconError::database_operation(format!("Delete site failed: {}", e))
            })?;

        if result.rows_affected == 0 {
            txn.rollback().await.ok();
            return Err(SitebeaconError::not_found(format!(
                "Site not found: {}",
                site_id
            )));
        }

        let hits = hit::Entity::delete_many()
            .filter(hit::Column::SiteId.eq(site_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                SitebeaconError::database_operation(format!("Delete site hits failed: {}", e))
            })?;

        txn.commit()
            .await
            .map_err(|e| SitebeaconError::database_operation(format!("Commit failed: {}", e)))?;

        info!(
            "Site deleted: {} ({} hits removed)",
            site_id, hits.rows_affected
        );
        Ok(())
    }

    /// Durably record a hit. Idempotent: a replay of the same id rewrites
    /// the same row.
    pub async fn put_hit(&self, h: Hit) -> Result<()> {
        let db = &self.db;

        retry::with_retry(&format!("put_hit({})", h.id), self.retry_config, || async {
            upsert_hit(db, &h)
                .await
                .map_err(|e| sea_orm::DbErr::Custom(e.to_string()))
        })
        .await
        .map_err(|e| SitebeaconError::database_operation(format!("Record hit failed: {}", e)))
    }

    /// Backfill exit fields on an existing hit.
    ///
    /// Returns Ok(false) without touching anything when the target row
    /// does not exist: the patch may have outrun its hit or the hit may
    /// never have been delivered, and neither is an error.
    pub async fn patch_hit(&self, id: &str, patch: &HitPatch) -> Result<bool> {
        if patch.is_empty() {
            return Ok(true);
        }

        let db = &self.db;
        let result = retry::with_retry(
            &format!("patch_hit({})", id),
            self.retry_config,
            || async {
                hit::Entity::update_many()
                    .set(apply_patch(id, patch))
                    .filter(hit::Column::Id.eq(id))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| SitebeaconError::database_operation(format!("Patch hit failed: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Remove every site and hit. Used by the demo seeder and `wipe`.
    pub async fn wipe_all(&self) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SitebeaconError::database_operation(format!("Begin failed: {}", e)))?;

        hit::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| SitebeaconError::database_operation(format!("Wipe hits failed: {}", e)))?;
        site::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| {
                SitebeaconError::database_operation(format!("Wipe sites failed: {}", e))
            })?;

        txn.commit()
            .await
            .map_err(|e| SitebeaconError::database_operation(format!("Commit failed: {}", e)))?;

        info!("All data wiped");
        Ok(())
    }
}
