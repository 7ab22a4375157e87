// marketplace-client/src/identity/mod.rs
//! Seam to the external identity SDK.

pub mod simulated;

pub use simulated::{LoginScript, SimulatedIdentityProvider};

use async_trait::async_trait;
use common::{IdentityConfig, IdentityError, IdentityHandle};
use std::sync::Arc;
use std::time::Duration;

/// Parameters for one interactive login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOptions {
    pub identity_provider: String,
    /// Upper bound on the validity of the issued delegation
    pub max_time_to_live: Duration,
    /// Popup window feature string, e.g. `width=400,height=600,top=100,left=300`
    pub window_features: String,
}

impl LoginOptions {
    /// Build login options with the popup centered in a viewport of the given size
    pub fn centered(config: &IdentityConfig, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            identity_provider: config.provider_url.clone(),
            max_time_to_live: config.max_time_to_live(),
            window_features: popup_center(
                viewport_width,
                viewport_height,
                config.popup_width,
                config.popup_height,
            ),
        }
    }
}

/// Feature string for a popup of `width`×`height` centered in the viewport.
/// Offsets go negative when the popup is larger than the viewport.
pub fn popup_center(viewport_width: u32, viewport_height: u32, width: u32, height: u32) -> String {
    let left = i64::from(viewport_width) / 2 - i64::from(width) / 2;
    let top = i64::from(viewport_height) / 2 - i64::from(height) / 2;
    format!("width={},height={},top={},left={}", width, height, top, left)
}

/// A client of the identity provider. One instance holds at most one session.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    async fn is_authenticated(&self) -> bool;

    fn identity(&self) -> Option<IdentityHandle>;

    /// Run the interactive flow. Cancellation is reported as `IdentityError::UserInterrupt`.
    async fn login(&self, options: LoginOptions) -> Result<(), IdentityError>;

    async fn logout(&self) -> Result<(), IdentityError>;
}

/// Builds identity clients on demand
#[async_trait]
pub trait IdentityClientFactory: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn IdentityClient>, IdentityError>;
}
