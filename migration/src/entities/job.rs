//! Completed job entity (referenced by JOB tags)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub job_number: Option<String>,
    pub homeowner_name: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub completion_date: Option<DateTimeUtc>,
    pub shingle_type: Option<String>,
    pub shingle_color: Option<String>,
    pub manufacturer: Option<String>,
    pub warranty_years: Option<i32>,
    pub warranty_code: Option<String>,
    pub rep_id: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub drone_video_url: Option<String>,
    /// JSON 数组文本
    #[sea_orm(column_type = "Text")]
    pub photo_urls: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
