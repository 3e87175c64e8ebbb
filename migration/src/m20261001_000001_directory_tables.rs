//! 目录类表迁移
//!
//! 创建 reps、tags、jobs、deal_page 四张表：
//! - reps: 销售代表（主键由运营指定）
//! - tags: NFC 芯片库存
//! - jobs: 已完工项目
//! - deal_page: 单行促销页内容

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 reps 表
        manager
            .create_table(
                Table::create()
                    .table(Reps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reps::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reps::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Reps::Phone).string_len(64).null())
                    .col(ColumnDef::new(Reps::Email).string_len(255).null())
                    .col(ColumnDef::new(Reps::Title).string_len(255).null())
                    .col(ColumnDef::new(Reps::Company).string_len(255).null())
                    .col(ColumnDef::new(Reps::Bio).text().null())
                    .col(ColumnDef::new(Reps::PhotoUrl).text().null())
                    .col(ColumnDef::new(Reps::CalLink).text().null())
                    .col(
                        ColumnDef::new(Reps::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Reps::RedirectUrl).text().null())
                    .col(
                        ColumnDef::new(Reps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reps::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 jobs 表
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Jobs::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Jobs::JobNumber).string_len(64).null())
                    .col(
                        ColumnDef::new(Jobs::HomeownerName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Jobs::Address).text().not_null())
                    .col(ColumnDef::new(Jobs::City).string_len(100).null())
                    .col(ColumnDef::new(Jobs::State).string_len(32).null())
                    .col(ColumnDef::new(Jobs::Zip).string_len(16).null())
                    .col(ColumnDef::new(Jobs::Phone).string_len(64).null())
                    .col(ColumnDef::new(Jobs::Email).string_len(255).null())
                    .col(
                        ColumnDef::new(Jobs::CompletionDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Jobs::ShingleType).string_len(100).null())
                    .col(ColumnDef::new(Jobs::ShingleColor).string_len(100).null())
                    .col(ColumnDef::new(Jobs::Manufacturer).string_len(100).null())
                    .col(ColumnDef::new(Jobs::WarrantyYears).integer().null())
                    .col(ColumnDef::new(Jobs::WarrantyCode).string_len(100).null())
                    .col(ColumnDef::new(Jobs::RepId).integer().null())
                    .col(ColumnDef::new(Jobs::Notes).text().null())
                    .col(ColumnDef::new(Jobs::DroneVideoUrl).text().null())
                    .col(ColumnDef::new(Jobs::PhotoUrls).text().not_null())
                    .col(
                        ColumnDef::new(Jobs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 tags 表
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::Uid).string_len(64).null().unique_key())
                    .col(ColumnDef::new(Tags::Label).string_len(255).null())
                    .col(ColumnDef::new(Tags::TagType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Tags::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Tags::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Tags::RepId).integer().null())
                    .col(ColumnDef::new(Tags::JobId).string_len(36).null())
                    .col(ColumnDef::new(Tags::Notes).text().null())
                    .col(
                        ColumnDef::new(Tags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 按类型筛选 tag
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tags_tag_type")
                    .table(Tags::Table)
                    .col(Tags::TagType)
                    .to_owned(),
            )
            .await?;

        // 创建 deal_page 表
        manager
            .create_table(
                Table::create()
                    .table(DealPage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DealPage::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DealPage::IsLive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(DealPage::Badge).string_len(255).null())
                    .col(ColumnDef::new(DealPage::Headline).text().null())
                    .col(ColumnDef::new(DealPage::Subheadline).text().null())
                    .col(ColumnDef::new(DealPage::Body).text().null())
                    .col(ColumnDef::new(DealPage::CtaText).string_len(255).null())
                    .col(ColumnDef::new(DealPage::CtaUrl).text().null())
                    .col(ColumnDef::new(DealPage::CompanyName).string_len(255).null())
                    .col(ColumnDef::new(DealPage::LogoUrl).text().null())
                    .col(
                        ColumnDef::new(DealPage::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_tags_tag_type").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DealPage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reps::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reps {
    #[sea_orm(iden = "reps")]
    Table,
    Id,
    Name,
    Phone,
    Email,
    Title,
    Company,
    Bio,
    PhotoUrl,
    CalLink,
    IsActive,
    RedirectUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Jobs {
    #[sea_orm(iden = "jobs")]
    Table,
    Id,
    JobNumber,
    HomeownerName,
    Address,
    City,
    State,
    Zip,
    Phone,
    Email,
    CompletionDate,
    ShingleType,
    ShingleColor,
    Manufacturer,
    WarrantyYears,
    WarrantyCode,
    RepId,
    Notes,
    DroneVideoUrl,
    PhotoUrls,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tags {
    #[sea_orm(iden = "tags")]
    Table,
    Id,
    Uid,
    Label,
    TagType,
    IsLocked,
    IsActive,
    RepId,
    JobId,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DealPage {
    #[sea_orm(iden = "deal_page")]
    Table,
    Id,
    IsLive,
    Badge,
    Headline,
    Subheadline,
    Body,
    CtaText,
    CtaUrl,
    CompanyName,
    LogoUrl,
    UpdatedAt,
}
