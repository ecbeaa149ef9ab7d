pub mod auth;
pub mod internal_auth;
