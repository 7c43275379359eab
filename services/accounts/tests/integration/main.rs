mod address_test;
mod helpers;
mod login_test;
mod profile_test;
mod session_test;
