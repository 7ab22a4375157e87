// marketplace-client/src/viewport.rs
use crate::platform::{DisplayEnvironment, ListenerHandle};
use common::{Breakpoints, DeviceClass, ViewportConfig, ViewportSnapshot};
use std::sync::Arc;
use tokio::sync::watch;

/// Tracks window dimensions and the device class derived from them.
///
/// Every resize event republishes the snapshot; classification is O(1) so
/// there is no debouncing.
pub struct ViewportClassifier {
    breakpoints: Breakpoints,
    display: Option<Arc<dyn DisplayEnvironment>>,
    published: Arc<watch::Sender<ViewportSnapshot>>,
    listener: Option<ListenerHandle>,
}

impl ViewportClassifier {
    /// Read the current size and follow resize events until `detach`
    pub fn attach(config: &ViewportConfig, display: Arc<dyn DisplayEnvironment>) -> Self {
        let breakpoints = config.breakpoints();
        let (width, height) = display.inner_size();
        let (tx, _) = watch::channel(ViewportSnapshot::new(width, height, &breakpoints));
        let published = Arc::new(tx);

        let sink = published.clone();
        let listener = display.on_resize(Arc::new(move |(width, height): (u32, u32)| {
            sink.send_replace(ViewportSnapshot::new(width, height, &breakpoints));
        }));

        tracing::debug!("Viewport attached at {}x{}", width, height);
        Self {
            breakpoints,
            display: Some(display),
            published,
            listener: Some(listener),
        }
    }

    /// Classifier with no environment; reports the configured fallback size
    pub fn detached(config: &ViewportConfig) -> Self {
        let breakpoints = config.breakpoints();
        let (tx, _) = watch::channel(ViewportSnapshot::new(
            config.fallback_width,
            config.fallback_height,
            &breakpoints,
        ));
        Self {
            breakpoints,
            display: None,
            published: Arc::new(tx),
            listener: None,
        }
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        *self.published.borrow()
    }

    pub fn device_class(&self) -> DeviceClass {
        self.snapshot().device
    }

    pub fn is_mobile(&self) -> bool {
        self.device_class().is_mobile()
    }

    pub fn is_tablet(&self) -> bool {
        self.device_class().is_tablet()
    }

    pub fn is_desktop(&self) -> bool {
        self.device_class().is_desktop()
    }

    pub fn is_mobile_or_tablet(&self) -> bool {
        self.device_class().is_mobile_or_tablet()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewportSnapshot> {
        self.published.subscribe()
    }

    /// Re-read the environment size
    pub fn refresh(&self) {
        if let Some(display) = &self.display {
            let (width, height) = display.inner_size();
            self.published
                .send_replace(ViewportSnapshot::new(width, height, &self.breakpoints));
        }
    }

    /// Remove the resize listener; the last snapshot stays readable
    pub fn detach(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.remove();
            tracing::debug!("Viewport detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }
}
