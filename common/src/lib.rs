pub mod messages;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use messages::*;
pub use crate::config::*;
pub use error::*;
pub use models::*;
pub use utils::*;
