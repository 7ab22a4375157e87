// common/src/models/mod.rs
pub mod catalog;
pub mod notification;
pub mod session;
pub mod theme;
pub mod viewport;

pub use catalog::*;
pub use notification::*;
pub use session::*;
pub use theme::*;
pub use viewport::*;
