// marketplace-client/src/lib.rs
//! Headless client state for the nftropoly marketplace: notifications,
//! theme, viewport, session lifecycle and the listing catalog.

pub mod actors;
pub mod catalog_source;
pub mod context;
pub mod error;
pub mod identity;
pub mod platform;
pub mod services;
pub mod viewport;

pub use context::{MarketplaceContext, Platform};
pub use error::ClientError;
