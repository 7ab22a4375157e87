// marketplace-client/src/context.rs
use crate::actors::{CatalogHandle, CatalogStore, NotificationBus, SessionManager, ThemeController};
use crate::catalog_source::{CatalogSource, MockCatalogSource};
use crate::error::ClientError;
use crate::identity::{IdentityClientFactory, SimulatedIdentityProvider};
use crate::platform::{
    DisplayEnvironment, HeadlessWindow, InMemoryStorage, KeyValueStorage, Location, VisualRoot,
};
use crate::viewport::ViewportClassifier;
use actix::{Actor, Addr};
use common::{
    ClearNotifications, Config, CurrentTheme, Notification, NotificationLevel, NotifyError,
    ResetClient, SessionState, SetTheme, ShowNotification, SyncSession, Theme, ToggleTheme,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Host services the client state layer runs against
#[derive(Clone)]
pub struct Platform {
    /// Durable storage (theme preference)
    pub local_storage: Arc<dyn KeyValueStorage>,
    /// Session-scoped storage, cleared on sign-out
    pub session_storage: Arc<dyn KeyValueStorage>,
    pub root: Arc<dyn VisualRoot>,
    pub display: Option<Arc<dyn DisplayEnvironment>>,
    pub location: Option<Arc<dyn Location>>,
    pub identity: Arc<dyn IdentityClientFactory>,
    pub catalog: Arc<dyn CatalogSource>,
}

impl Platform {
    /// Wire every seam to an in-process window, simulated identity provider
    /// and the static catalog
    pub fn headless(
        window: Arc<HeadlessWindow>,
        local_storage: Arc<dyn KeyValueStorage>,
        identity: SimulatedIdentityProvider,
    ) -> Self {
        Self {
            local_storage,
            session_storage: Arc::new(InMemoryStorage::new()),
            root: window.clone(),
            display: Some(window.clone()),
            location: Some(window),
            identity: Arc::new(identity),
            catalog: Arc::new(MockCatalogSource),
        }
    }
}

/// Explicitly constructed owner of every stateful component.
///
/// Must be started inside a running actix system.
pub struct MarketplaceContext {
    config: Config,
    pub(crate) notifications: Addr<NotificationBus>,
    notifications_rx: watch::Receiver<Vec<Notification>>,
    theme: Addr<ThemeController>,
    theme_rx: watch::Receiver<Theme>,
    viewport: ViewportClassifier,
    pub(crate) session: Addr<SessionManager>,
    session_rx: watch::Receiver<SessionState>,
    catalog: CatalogHandle,
    pub(crate) session_storage: Arc<dyn KeyValueStorage>,
    pub(crate) location: Option<Arc<dyn Location>>,
}

impl MarketplaceContext {
    pub fn start(config: Config, platform: Platform) -> Self {
        let bus = NotificationBus::new(config.notifications.ttl());
        let notifications_rx = bus.subscribe();
        let notifications = bus.start();

        let theme_controller = ThemeController::new(
            config.theme.clone(),
            platform.local_storage.clone(),
            platform.root.clone(),
            platform.display.clone(),
        );
        let theme_rx = theme_controller.subscribe();
        let theme = theme_controller.start();

        let viewport = match &platform.display {
            Some(display) => ViewportClassifier::attach(&config.viewport, display.clone()),
            None => ViewportClassifier::detached(&config.viewport),
        };

        let session_manager = SessionManager::new(
            platform.identity.clone(),
            config.identity.clone(),
            viewport.subscribe(),
        );
        let session_rx = session_manager.subscribe();
        let session = session_manager.start();

        let store = CatalogStore::new(platform.catalog.clone(), notifications.clone());
        let catalog_rx = store.subscribe();
        let catalog = CatalogHandle::new(store.start(), catalog_rx);

        tracing::info!("Marketplace context started");
        Self {
            config,
            notifications,
            notifications_rx,
            theme,
            theme_rx,
            viewport,
            session,
            session_rx,
            catalog,
            session_storage: platform.session_storage,
            location: platform.location,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // Notifications

    pub fn show(&self, text: impl Into<String>, level: NotificationLevel) {
        self.notifications.do_send(ShowNotification::new(text, level));
    }

    pub fn notify_error(&self, text: impl Into<String>, cause: Option<String>) {
        self.notifications.do_send(NotifyError::new(text, cause));
    }

    pub async fn clear_notifications(&self) -> Result<(), ClientError> {
        Ok(self.notifications.send(ClearNotifications).await?)
    }

    /// Last published notification list
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications_rx.borrow().clone()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Vec<Notification>> {
        self.notifications_rx.clone()
    }

    pub fn notification_bus(&self) -> &Addr<NotificationBus> {
        &self.notifications
    }

    // Theme

    pub async fn toggle_theme(&self) -> Result<Theme, ClientError> {
        Ok(self.theme.send(ToggleTheme).await?)
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), ClientError> {
        Ok(self.theme.send(SetTheme(theme)).await?)
    }

    pub async fn current_theme(&self) -> Result<Theme, ClientError> {
        Ok(self.theme.send(CurrentTheme).await?)
    }

    pub fn theme(&self) -> Theme {
        *self.theme_rx.borrow()
    }

    pub fn subscribe_theme(&self) -> watch::Receiver<Theme> {
        self.theme_rx.clone()
    }

    // Viewport

    pub fn viewport(&self) -> &ViewportClassifier {
        &self.viewport
    }

    // Session

    pub async fn sync_session(&self) -> Result<SessionState, ClientError> {
        Ok(self.session.send(SyncSession).await??)
    }

    pub async fn reset_identity_client(&self) -> Result<(), ClientError> {
        Ok(self.session.send(ResetClient).await?)
    }

    pub fn session(&self) -> SessionState {
        self.session_rx.borrow().clone()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.session_rx.clone()
    }

    // Catalog

    pub fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    /// Return every component to its freshly started state after sign-out.
    /// The persisted theme and the signed-out session are kept.
    pub async fn reset(&self) -> Result<(), ClientError> {
        self.notifications.send(ClearNotifications).await?;
        self.catalog.reset().await?;
        self.viewport.refresh();
        tracing::info!("Marketplace context reset");
        Ok(())
    }

    /// Detach host listeners; actors stop once the context is dropped
    pub fn shutdown(mut self) {
        self.viewport.detach();
        tracing::info!("Marketplace context shut down");
    }
}
