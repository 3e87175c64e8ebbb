//! Singleton deal page content (id = 1)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "deal_page")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub is_live: bool,
    pub badge: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub headline: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub subheadline: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    pub cta_text: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cta_url: Option<String>,
    pub company_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub logo_url: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
