//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations. Reads feed the
//! metrics engine directly, so database failures surface as errors instead
//! of being flattened into empty results.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{error, info};

use super::converters::{model_to_hit, model_to_site};
use super::{SeaOrmStorage, TsRange, retry};
use crate::errors::{Result, SitebeaconError};
use crate::storage::models::{Hit, Site};

use migration::entities::{hit, site};

impl SeaOrmStorage {
    pub async fn get_site(&self, site_id: &str) -> Result<Option<Site>> {
        let db = &self.db;
        let id_owned = site_id.to_string();

        let model = retry::with_retry(
            &format!("get_site({})", site_id),
            self.retry_config,
            || async { site::Entity::find_by_id(&id_owned).one(db).await },
        )
        .await
        .map_err(|e| SitebeaconError::database_operation(format!("Get site failed: {}", e)))?;

        Ok(model.map(model_to_site))
    }

    /// All sites, newest first
    pub async fn list_sites(&self) -> Result<Vec<Site>> {
        let models = site::Entity::find()
            .order_by_desc(site::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                SitebeaconError::database_operation(format!("List sites failed: {}", e))
            })?;

        Ok(models.into_iter().map(model_to_site).collect())
    }

    pub async fn get_hit(&self, id: &str) -> Result<Option<Hit>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_hit({})", id), self.retry_config, || async {
            hit::Entity::find_by_id(&id_owned).one(db).await
        })
        .await
        .map_err(|e| SitebeaconError::database_operation(format!("Get hit failed: {}", e)))?;

        model.map(model_to_hit).transpose()
    }

    /// Load a site's hits in ascending ts order, optionally restricted to an
    /// inclusive timestamp range. Rows with corrupted categorical columns
    /// are logged and skipped rather than failing the whole read.
    pub async fn hits_for_site(&self, site_id: &str, range: Option<TsRange>) -> Result<Vec<Hit>> {
        let mut query = hit::Entity::find().filter(hit::Column::SiteId.eq(site_id));

        if let Some(r) = range {
            query = query
                .filter(hit::Column::Ts.gte(r.start))
                .filter(hit::Column::Ts.lte(r.end));
        }

        let models = query
            .order_by_asc(hit::Column::Ts)
            .all(&self.db)
            .await
            .map_err(|e| {
                SitebeaconError::database_operation(format!("Load hits failed: {}", e))
            })?;

        let hits: Vec<Hit> = models
            .into_iter()
            .filter_map(|m| match model_to_hit(m) {
                Ok(h) => Some(h),
                Err(e) => {
                    error!("Skipping unreadable hit row: {}", e);
                    None
                }
            })
            .collect();

        Ok(hits)
    }

    /// Stored hits in ascending ts order, in the full native record shape,
    /// optionally restricted to one site. Used by the export command.
    pub async fn export_hits(&self, site_id: Option<&str>) -> Result<Vec<Hit>> {
        let mut query = hit::Entity::find();
        if let Some(site_id) = site_id {
            query = query.filter(hit::Column::SiteId.eq(site_id));
        }

        let models = query
            .order_by_asc(hit::Column::Ts)
            .all(&self.db)
            .await
            .map_err(|e| {
                SitebeaconError::database_operation(format!("Export hits failed: {}", e))
            })?;

        let count = models.len();
        let hits: Vec<Hit> = models
            .into_iter()
            .filter_map(|m| match model_to_hit(m) {
                Ok(h) => Some(h),
                Err(e) => {
                    error!("Skipping unreadable hit row: {}", e);
                    None
                }
            })
            .collect();

        info!("Exported {} of {} hit rows", hits.len(), count);
        Ok(hits)
    }

    pub async fn count_hits(&self, site_id: &str) -> Result<u64> {
        let db = &self.db;
        let id_owned = site_id.to_string();

        retry::with_retry(
            &format!("count_hits({})", site_id),
            self.retry_config,
            || async {
                hit::Entity::find()
                    .filter(hit::Column::SiteId.eq(&id_owned))
                    .count(db)
                    .await
            },
        )
        .await
        .map_err(|e| SitebeaconError::database_operation(format!("Count hits failed: {}", e)))
    }
}
