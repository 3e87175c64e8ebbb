//! Append-only tap/view/submit event log

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub rep_id: i32,
    /// TAP / VIEW / SUBMIT / CONTACT_SAVE
    pub event_type: String,
    /// 任意 JSON 对象（序列化为文本）
    #[sea_orm(column_type = "Text", nullable)]
    pub meta: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
