// marketplace-client/src/services/mod.rs
pub mod auth;

pub use auth::{display_and_clean_logout_msg, sign_in, sign_out};
