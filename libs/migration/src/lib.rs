pub use sea_orm_migration::prelude::*;

mod m20250901_000000_create_users;
mod m20250901_000001_create_requests;
mod m20250901_000002_create_items;
mod m20250901_000003_create_bookings;
mod m20250901_000004_create_comments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000000_create_users::Migration),
            Box::new(m20250901_000001_create_requests::Migration),
            Box::new(m20250901_000002_create_items::Migration),
            Box::new(m20250901_000003_create_bookings::Migration),
            Box::new(m20250901_000004_create_comments::Migration),
        ]
    }
}
