pub mod deal_page;
pub mod event;
pub mod job;
pub mod lead;
pub mod rep;
pub mod tag;

pub use deal_page::Entity as DealPageEntity;
pub use event::Entity as EventEntity;
pub use job::Entity as JobEntity;
pub use lead::Entity as LeadEntity;
pub use rep::Entity as RepEntity;
pub use tag::Entity as TagEntity;
