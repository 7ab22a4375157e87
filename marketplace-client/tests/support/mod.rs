// marketplace-client/tests/support/mod.rs
#![allow(dead_code)]

use common::{Config, ListNotifications, Notification};
use marketplace_client::identity::SimulatedIdentityProvider;
use marketplace_client::platform::{HeadlessWindow, InMemoryStorage};
use marketplace_client::{MarketplaceContext, Platform};
use std::sync::Arc;

pub const NOTIFICATION_TTL_MS: u64 = 200;

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.notifications.ttl_ms = NOTIFICATION_TTL_MS;
    config
}

pub struct Harness {
    pub ctx: MarketplaceContext,
    pub window: Arc<HeadlessWindow>,
    pub local_storage: Arc<InMemoryStorage>,
    pub identity: SimulatedIdentityProvider,
}

pub fn provider() -> SimulatedIdentityProvider {
    SimulatedIdentityProvider::new("test-secret", Arc::new(InMemoryStorage::new()))
}

pub fn harness() -> Harness {
    harness_with(HeadlessWindow::new(1200, 800), provider(), |_| {})
}

pub fn harness_with(
    window: HeadlessWindow,
    identity: SimulatedIdentityProvider,
    customize: impl FnOnce(&mut Platform),
) -> Harness {
    let window = Arc::new(window);
    let local_storage = Arc::new(InMemoryStorage::new());
    let mut platform = Platform::headless(window.clone(), local_storage.clone(), identity.clone());
    customize(&mut platform);

    Harness {
        ctx: MarketplaceContext::start(test_config(), platform),
        window,
        local_storage,
        identity,
    }
}

/// Current notifications, read through the bus mailbox so earlier sends are processed
pub async fn notifications(ctx: &MarketplaceContext) -> Vec<Notification> {
    ctx.notification_bus().send(ListNotifications).await.unwrap()
}
