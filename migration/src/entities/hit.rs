//! Hit entity: one recorded pageview, custom event, or outbound click.
//!
//! Rows are written once by the collector and patched at most once to
//! backfill engagement fields (`duration_ms`, `scroll_max`). There is no
//! foreign key to `sites`: orphaned hits are tolerated and pruned only by
//! the cascading site delete.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub site_id: String,
    /// "pageview" | "event" | "outbound"
    pub hit_type: String,
    /// Epoch milliseconds, assigned by the collector at capture time
    pub ts: i64,
    pub url: String,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub referrer: String,
    pub visitor_id: String,
    pub session_id: String,
    pub duration_ms: Option<i64>,
    pub scroll_max: Option<f64>,
    /// "desktop" | "mobile" | "tablet"
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub lang: String,
    pub tz: String,
    pub country_hint: String,
    pub channel: String,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub event_name: Option<String>,
    /// JSON object serialized to text
    #[sea_orm(column_type = "Text", nullable)]
    pub event_props: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
