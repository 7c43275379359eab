pub mod dish;
pub mod lifecycle;
pub mod place_order;
pub mod query;
pub mod restaurant;
