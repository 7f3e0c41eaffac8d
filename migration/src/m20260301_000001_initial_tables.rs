//! Initial tables for the hit store
//!
//! Creates the `sites` and `hits` tables. All timestamps are stored as
//! epoch milliseconds, matching what the collector sends on the wire.
//! The composite `(site_id, ts)` index backs the dashboard range scans;
//! `(site_id, hit_type, ts)` backs the pageview-only aggregation queries.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sites::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sites::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Sites::Domain).string_len(255).not_null())
                    .col(ColumnDef::new(Sites::CreatedAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(Sites::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sites::SessionTimeoutMin)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sites_created_at")
                    .table(Sites::Table)
                    .col(Sites::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Hits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hits::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hits::SiteId).string_len(64).not_null())
                    .col(ColumnDef::new(Hits::HitType).string_len(16).not_null())
                    .col(ColumnDef::new(Hits::Ts).big_integer().not_null())
                    .col(ColumnDef::new(Hits::Url).string_len(512).not_null())
                    .col(ColumnDef::new(Hits::Title).text().not_null())
                    .col(ColumnDef::new(Hits::Referrer).text().not_null())
                    .col(ColumnDef::new(Hits::VisitorId).string_len(64).not_null())
                    .col(ColumnDef::new(Hits::SessionId).string_len(64).not_null())
                    .col(ColumnDef::new(Hits::DurationMs).big_integer().null())
                    .col(ColumnDef::new(Hits::ScrollMax).double().null())
                    .col(ColumnDef::new(Hits::DeviceType).string_len(16).not_null())
                    .col(ColumnDef::new(Hits::Browser).string_len(64).not_null())
                    .col(ColumnDef::new(Hits::Os).string_len(64).not_null())
                    .col(ColumnDef::new(Hits::Lang).string_len(32).not_null())
                    .col(ColumnDef::new(Hits::Tz).string_len(64).not_null())
                    .col(ColumnDef::new(Hits::CountryHint).string_len(64).not_null())
                    .col(ColumnDef::new(Hits::Channel).string_len(32).not_null())
                    .col(ColumnDef::new(Hits::UtmSource).string_len(255).null())
                    .col(ColumnDef::new(Hits::UtmMedium).string_len(255).null())
                    .col(ColumnDef::new(Hits::UtmCampaign).string_len(255).null())
                    .col(ColumnDef::new(Hits::UtmTerm).string_len(255).null())
                    .col(ColumnDef::new(Hits::UtmContent).string_len(255).null())
                    .col(ColumnDef::new(Hits::EventName).string_len(255).null())
                    .col(ColumnDef::new(Hits::EventProps).text().null())
                    .to_owned(),
            )
            .await?;

        // Range scans: all hits of a site inside a time window
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hits_site_ts")
                    .table(Hits::Table)
                    .col(Hits::SiteId)
                    .col(Hits::Ts)
                    .to_owned(),
            )
            .await?;

        // Pageview-only aggregation queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hits_site_type_ts")
                    .table(Hits::Table)
                    .col(Hits::SiteId)
                    .col(Hits::HitType)
                    .col(Hits::Ts)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_hits_site_type_ts").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_hits_site_ts").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Hits::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sites_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sites {
    #[sea_orm(iden = "sites")]
    Table,
    Id,
    Name,
    Domain,
    CreatedAt,
    IsActive,
    SessionTimeoutMin,
}

#[derive(DeriveIden)]
enum Hits {
    #[sea_orm(iden = "hits")]
    Table,
    Id,
    SiteId,
    HitType,
    Ts,
    Url,
    Title,
    Referrer,
    VisitorId,
    SessionId,
    DurationMs,
    ScrollMax,
    DeviceType,
    Browser,
    Os,
    Lang,
    Tz,
    CountryHint,
    Channel,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    UtmTerm,
    UtmContent,
    EventName,
    EventProps,
}
