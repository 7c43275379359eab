pub mod addresses;
pub mod dishes;
pub mod invoices;
pub mod orders;
pub mod outbox_events;
pub mod restaurants;
