pub mod address;
pub mod login;
pub mod profile;
pub mod session;
pub mod signup;
pub mod suspicious;
pub mod verification;
