//! Single-column equality indexes for breakdown queries
//!
//! Every categorical field the dashboard breaks traffic down by gets its own
//! index: type, url, channel, browser, os, device type, country hint, and the
//! visitor/session grouping keys.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, Hits)] = &[
    ("idx_hits_type", Hits::HitType),
    ("idx_hits_url", Hits::Url),
    ("idx_hits_channel", Hits::Channel),
    ("idx_hits_browser", Hits::Browser),
    ("idx_hits_os", Hits::Os),
    ("idx_hits_device_type", Hits::DeviceType),
    ("idx_hits_country_hint", Hits::CountryHint),
    ("idx_hits_visitor_id", Hits::VisitorId),
    ("idx_hits_session_id", Hits::SessionId),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, col) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(*name)
                        .table(Hits::Table)
                        .col(*col)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, _) in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(*name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Hits {
    #[sea_orm(iden = "hits")]
    Table,
    HitType,
    Url,
    Channel,
    Browser,
    Os,
    DeviceType,
    CountryHint,
    VisitorId,
    SessionId,
}
