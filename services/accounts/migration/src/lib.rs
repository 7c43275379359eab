use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_sessions;
mod m20260301_000003_create_login_history;
mod m20260301_000004_create_outbox_events;
mod m20260301_000005_create_addresses;

/// Accounts migrations. Run before the orders migrations: orders and
/// invoices reference `users`, and both services write `outbox_events`.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_sessions::Migration),
            Box::new(m20260301_000003_create_login_history::Migration),
            Box::new(m20260301_000004_create_outbox_events::Migration),
            Box::new(m20260301_000005_create_addresses::Migration),
        ]
    }
}
