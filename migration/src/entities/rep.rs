//! Rep entity
//!
//! Rep 的主键由运营人员显式指定（印在 NFC 卡片上），不自增。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "reps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub photo_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cal_link: Option<String>,
    pub is_active: bool,
    /// 设置后所有 tap 直接跳转到该地址
    #[sea_orm(column_type = "Text", nullable)]
    pub redirect_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
