use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::errors::{Result, SitebeaconError};
use crate::storage::Hit;
use migration::entities::hit;

use super::converters::hit_to_active_model;

/// Atomic id-keyed upsert via ON CONFLICT.
///
/// A replayed message carries the same id and overwrites the row with
/// identical values, so duplicate delivery leaves one logical record.
pub async fn upsert_hit(db: &DatabaseConnection, h: &Hit) -> Result<()> {
    use sea_orm::InsertResult;
    use sea_orm::{EntityTrait, sea_query::OnConflict};

    let active_model = hit_to_active_model(h);

    let result: std::result::Result<InsertResult<hit::ActiveModel>, sea_orm::DbErr> =
        hit::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(hit::Column::Id)
                    .update_columns([
                        hit::Column::SiteId,
                        hit::Column::HitType,
                        hit::Column::Ts,
                        hit::Column::Url,
                        hit::Column::Title,
                        hit::Column::Referrer,
                        hit::Column::VisitorId,
                        hit::Column::SessionId,
                        hit::Column::DurationMs,
                        hit::Column::ScrollMax,
                        hit::Column::DeviceType,
                        hit::Column::Browser,
                        hit::Column::Os,
                        hit::Column::Lang,
                        hit::Column::Tz,
                        hit::Column::CountryHint,
                        hit::Column::Channel,
                        hit::Column::UtmSource,
                        hit::Column::UtmMedium,
                        hit::Column::UtmCampaign,
                        hit::Column::UtmTerm,
                        hit::Column::UtmContent,
                        hit::Column::EventName,
                        hit::Column::EventProps,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await;

    match result {
        Ok(_) => {
            debug!("Hit upserted: {} ({})", h.id, h.hit_type);
            Ok(())
        }
        Err(e) => Err(SitebeaconError::database_operation(format!(
            "Upsert hit '{}' failed (site: {}): {}",
            h.id, h.site_id, e
        ))),
    }
}
