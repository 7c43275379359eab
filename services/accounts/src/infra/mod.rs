pub mod cache;
pub mod db;
pub mod password;
