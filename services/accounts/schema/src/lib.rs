pub mod addresses;
pub mod login_history;
pub mod outbox_events;
pub mod sessions;
pub mod users;
