use sea_orm_migration::prelude::*;

mod m20260302_000001_create_restaurants;
mod m20260302_000002_create_dishes;
mod m20260302_000003_create_orders;
mod m20260302_000004_create_invoices;

/// Orders migrations. Depend on the accounts migrations (`users`,
/// `addresses`, `outbox_events`) having run against the same database.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260302_000001_create_restaurants::Migration),
            Box::new(m20260302_000002_create_dishes::Migration),
            Box::new(m20260302_000003_create_orders::Migration),
            Box::new(m20260302_000004_create_invoices::Migration),
        ]
    }

    // Both services share one database; each tracks its own migrations.
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_orders").into_iden()
    }
}
