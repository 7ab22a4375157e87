// marketplace-client/src/actors/theme_controller.rs
use crate::platform::{DisplayEnvironment, KeyValueStorage, ListenerHandle, VisualRoot};
use actix::{Actor, AsyncContext, Context, Handler, MessageResult};
use common::{ColorSchemeChanged, CurrentTheme, SetTheme, Theme, ThemeConfig, ToggleTheme};
use std::sync::Arc;
use tokio::sync::watch;

/// Actor owning the light/dark preference.
///
/// Precedence: persisted choice, then OS preference, then the configured
/// default. Only explicit `set`/`toggle` calls are persisted; OS changes are
/// followed for as long as nothing has been persisted.
pub struct ThemeController {
    theme: Theme,
    config: ThemeConfig,
    storage: Arc<dyn KeyValueStorage>,
    root: Arc<dyn VisualRoot>,
    display: Option<Arc<dyn DisplayEnvironment>>,
    listener: Option<ListenerHandle>,
    published: watch::Sender<Theme>,
}

impl ThemeController {
    /// Resolve the initial theme and apply it to the visual root
    pub fn new(
        config: ThemeConfig,
        storage: Arc<dyn KeyValueStorage>,
        root: Arc<dyn VisualRoot>,
        display: Option<Arc<dyn DisplayEnvironment>>,
    ) -> Self {
        let theme = resolve_initial(&config, storage.as_ref(), display.as_deref());
        let (published, _) = watch::channel(theme);
        let controller = Self {
            theme,
            config,
            storage,
            root,
            display,
            listener: None,
            published,
        };
        controller.apply();
        controller
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.published.subscribe()
    }

    fn has_persisted_choice(&self) -> bool {
        self.storage.get(&self.config.storage_key).is_some()
    }

    fn transition(&mut self, theme: Theme, persist: bool) {
        if persist {
            if let Err(e) = self.storage.set(&self.config.storage_key, theme.as_str()) {
                tracing::error!("Failed to persist theme preference: {}", e);
            }
        }

        if theme != self.theme {
            tracing::info!("Theme changed: {} -> {}", self.theme, theme);
        }
        self.theme = theme;
        self.apply();
        self.published.send_replace(theme);
    }

    // Swap the root classes and chrome hint; adding an existing class is skipped
    fn apply(&self) {
        self.root.remove_class(self.theme.opposite().as_str());
        if !self.root.has_class(self.theme.as_str()) {
            self.root.add_class(self.theme.as_str());
        }

        let color = match self.theme {
            Theme::Light => &self.config.light_chrome_color,
            Theme::Dark => &self.config.dark_chrome_color,
        };
        self.root.set_chrome_color(color);
    }
}

fn resolve_initial(
    config: &ThemeConfig,
    storage: &dyn KeyValueStorage,
    display: Option<&dyn DisplayEnvironment>,
) -> Theme {
    if let Some(saved) = storage.get(&config.storage_key) {
        match saved.parse::<Theme>() {
            Ok(theme) => return theme,
            Err(e) => tracing::warn!("Ignoring persisted theme: {}", e),
        }
    }

    display
        .and_then(|display| display.prefers_dark())
        .map(Theme::from_prefers_dark)
        .unwrap_or(config.default_theme)
}

impl Actor for ThemeController {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("ThemeController started with theme: {}", self.theme);

        if let Some(display) = &self.display {
            // Weak so the registration alone does not keep the actor alive
            let addr = ctx.address().downgrade();
            self.listener = Some(display.on_color_scheme_change(Arc::new(move |prefers_dark: bool| {
                if let Some(addr) = addr.upgrade() {
                    addr.do_send(ColorSchemeChanged { prefers_dark });
                }
            })));
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(listener) = self.listener.take() {
            listener.remove();
        }
        tracing::info!("ThemeController stopped");
    }
}

impl Handler<ToggleTheme> for ThemeController {
    type Result = MessageResult<ToggleTheme>;

    fn handle(&mut self, _msg: ToggleTheme, _ctx: &mut Self::Context) -> Self::Result {
        let next = self.theme.opposite();
        self.transition(next, true);
        MessageResult(next)
    }
}

impl Handler<SetTheme> for ThemeController {
    type Result = ();

    fn handle(&mut self, msg: SetTheme, _ctx: &mut Self::Context) -> Self::Result {
        self.transition(msg.0, true);
    }
}

impl Handler<CurrentTheme> for ThemeController {
    type Result = MessageResult<CurrentTheme>;

    fn handle(&mut self, _msg: CurrentTheme, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.theme)
    }
}

impl Handler<ColorSchemeChanged> for ThemeController {
    type Result = ();

    fn handle(&mut self, msg: ColorSchemeChanged, _ctx: &mut Self::Context) -> Self::Result {
        // Re-read storage on every event; an explicit choice always wins
        if self.has_persisted_choice() {
            tracing::debug!("Ignoring OS colour scheme change, user preference is set");
            return;
        }
        self.transition(Theme::from_prefers_dark(msg.prefers_dark), false);
    }
}
