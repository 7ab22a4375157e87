// marketplace-client/src/actors/mod.rs

pub mod catalog_store;
pub mod notification_bus;
pub mod session_manager;
pub mod theme_controller;

pub use catalog_store::{CatalogHandle, CatalogStore};
pub use notification_bus::NotificationBus;
pub use session_manager::SessionManager;
pub use theme_controller::ThemeController;
