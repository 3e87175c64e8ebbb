//! NFC tag inventory entity
//!
//! Tag 只是库存记录，路由不会在运行时查询它。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// 芯片物理 UID（可选，唯一）
    #[sea_orm(unique)]
    pub uid: Option<String>,
    pub label: Option<String>,
    /// REP / JOB / TRADESHOW / STATIC
    pub tag_type: String,
    pub is_locked: bool,
    pub is_active: bool,
    pub rep_id: Option<i32>,
    pub job_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
