// marketplace-client/src/main.rs
// Headless driver: boots the client state layer against an in-process window
// and walks through a typical marketplace session.

use common::{setup_tracing, Blockchain, Config, ListingDraft, SignInOutcome};
use marketplace_client::identity::SimulatedIdentityProvider;
use marketplace_client::platform::{
    HeadlessWindow, InMemoryStorage, JsonFileStorage, KeyValueStorage, Location,
};
use marketplace_client::services::{display_and_clean_logout_msg, sign_in, sign_out};
use marketplace_client::{MarketplaceContext, Platform};
use std::sync::Arc;

#[actix::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Setup tracing
    setup_tracing(&config.log_level);

    let local_storage: Arc<dyn KeyValueStorage> = match JsonFileStorage::open(&config.storage.path) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            tracing::warn!("Falling back to volatile storage: {}", e);
            Arc::new(InMemoryStorage::new())
        }
    };

    let window = Arc::new(
        HeadlessWindow::new(config.viewport.fallback_width, config.viewport.fallback_height)
            .with_url("http://localhost:5173/?msg=Welcome%20back&level=info"),
    );
    let identity = SimulatedIdentityProvider::new(
        config.identity.signing_secret.as_bytes(),
        local_storage.clone(),
    );

    let ctx = MarketplaceContext::start(config, Platform::headless(window.clone(), local_storage, identity));

    display_and_clean_logout_msg(&ctx);
    tracing::info!("Location after redirect message: {}", window.href());

    let session = ctx.sync_session().await?;
    tracing::info!("Session after sync: authenticated={}", session.is_authenticated());

    match sign_in(&ctx).await {
        SignInOutcome::Ok => tracing::info!("Signed in"),
        SignInOutcome::Cancelled => tracing::info!("Sign-in cancelled"),
        SignInOutcome::Failed(e) => tracing::warn!("Sign-in failed: {}", e),
    }

    let listings = ctx.catalog().fetch(Some(Blockchain::IC)).await?;
    tracing::info!("Fetched {} IC listings", listings.len());

    let owner = ctx
        .session()
        .identity()
        .map(|identity| identity.principal.clone())
        .unwrap_or_default();
    let listed = ctx
        .catalog()
        .list_for_sale(ListingDraft {
            id: None,
            name: "Harbor Lighthouse".to_string(),
            description: "Coastal landmark that lights up the board".to_string(),
            price: 3.3,
            image_url: "https://placehold.co/400x400/0ea5e9/ffffff?text=Lighthouse".to_string(),
            owner: owner.clone(),
            blockchain: Blockchain::IC,
            token_id: None,
            collection: Some("NFTropoly Genesis".to_string()),
            attributes: None,
            royalties: Some(5.0),
        })
        .await?;
    if let Some(item) = listed {
        ctx.catalog().purchase(&item.id).await?;
    }
    tracing::info!("Listings owned by {}: {}", owner, ctx.catalog().get_by_owner(&owner).len());

    window.resize(800, 1024);
    tracing::info!("Device class after resize: {:?}", ctx.viewport().device_class());

    let theme = ctx.toggle_theme().await?;
    tracing::info!("Theme toggled to {} (root classes: {:?})", theme, window.classes());

    for notification in ctx.notification_bus().send(common::ListNotifications).await? {
        tracing::info!("[{}] {}", notification.level, notification.text);
    }

    sign_out(&ctx).await?;
    tracing::info!("Signed out: authenticated={}", ctx.session().is_authenticated());

    ctx.shutdown();
    Ok(())
}
