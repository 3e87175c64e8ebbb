//! 事件与线索表迁移
//!
//! events 为仅追加的行为日志，funnel 聚合按 (rep_id, created_at)
//! 与 (event_type, created_at) 两条复合索引做时间窗口扫描。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 events 表
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::RepId).integer().not_null())
                    .col(ColumnDef::new(Events::EventType).string_len(32).not_null())
                    .col(ColumnDef::new(Events::Meta).text().null())
                    .col(ColumnDef::new(Events::UserAgent).text().null())
                    .col(ColumnDef::new(Events::Ip).string_len(45).null())
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 单 rep 时间序列查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_rep_time")
                    .table(Events::Table)
                    .col(Events::RepId)
                    .col(Events::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 按类型时间窗口计数
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_type_time")
                    .table(Events::Table)
                    .col(Events::EventType)
                    .col(Events::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建 leads 表
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leads::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leads::RepId).integer().not_null())
                    .col(ColumnDef::new(Leads::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Leads::Phone).string_len(64).null())
                    .col(ColumnDef::new(Leads::Email).string_len(255).null())
                    .col(ColumnDef::new(Leads::Address).text().null())
                    .col(ColumnDef::new(Leads::City).string_len(100).null())
                    .col(ColumnDef::new(Leads::State).string_len(32).null())
                    .col(ColumnDef::new(Leads::Zip).string_len(16).null())
                    .col(ColumnDef::new(Leads::Notes).text().null())
                    .col(
                        ColumnDef::new(Leads::Status)
                            .string_len(32)
                            .not_null()
                            .default("NEW"),
                    )
                    .col(
                        ColumnDef::new(Leads::Source)
                            .string_len(32)
                            .not_null()
                            .default("nfc"),
                    )
                    .col(ColumnDef::new(Leads::UserAgent).text().null())
                    .col(ColumnDef::new(Leads::Ip).string_len(45).null())
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Leads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_leads_rep_time")
                    .table(Leads::Table)
                    .col(Leads::RepId)
                    .col(Leads::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_leads_status")
                    .table(Leads::Table)
                    .col(Leads::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除索引
        for name in [
            "idx_leads_status",
            "idx_leads_rep_time",
            "idx_events_type_time",
            "idx_events_rep_time",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Events {
    #[sea_orm(iden = "events")]
    Table,
    Id,
    RepId,
    EventType,
    Meta,
    UserAgent,
    Ip,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Leads {
    #[sea_orm(iden = "leads")]
    Table,
    Id,
    RepId,
    Name,
    Phone,
    Email,
    Address,
    City,
    State,
    Zip,
    Notes,
    Status,
    Source,
    UserAgent,
    Ip,
    CreatedAt,
    UpdatedAt,
}
