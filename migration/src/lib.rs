pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users_and_meals;
mod m20250901_000002_create_orders;
mod m20250901_000003_create_bookmarks_reviews_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users_and_meals::Migration),
            Box::new(m20250901_000002_create_orders::Migration),
            Box::new(m20250901_000003_create_bookmarks_reviews_messages::Migration),
        ]
    }
}
