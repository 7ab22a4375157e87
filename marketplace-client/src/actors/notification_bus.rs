// marketplace-client/src/actors/notification_bus.rs
use actix::{Actor, AsyncContext, Context, Handler, MessageResult};
use common::{
    short_token, ClearNotifications, ListNotifications, Notification, NotificationLevel,
    NotifyError, ShowNotification,
};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::watch;

/// Actor holding the ordered list of transient notifications.
///
/// Each notification is removed `ttl` after it was appended. Removal timers
/// are never cancelled; a timer firing after `clear` finds nothing to remove.
/// Ids with a pending timer are never reissued, so a stale timer cannot
/// remove a newer notification.
pub struct NotificationBus {
    notifications: Vec<Notification>,
    scheduled: HashSet<String>,
    ttl: Duration,
    published: watch::Sender<Vec<Notification>>,
}

impl NotificationBus {
    pub fn new(ttl: Duration) -> Self {
        let (published, _) = watch::channel(Vec::new());
        Self {
            notifications: Vec::new(),
            scheduled: HashSet::new(),
            ttl,
            published,
        }
    }

    /// Receiver observing the collection after every change
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.published.subscribe()
    }

    fn fresh_id(&self, mut draw: impl FnMut() -> String) -> String {
        loop {
            let id = draw();
            if !self.scheduled.contains(&id) && !self.notifications.iter().any(|n| n.id == id) {
                return id;
            }
        }
    }

    fn publish(&self) {
        self.published.send_replace(self.notifications.clone());
    }

    fn append(&mut self, text: String, level: NotificationLevel, ctx: &mut Context<Self>) {
        let id = self.fresh_id(short_token);
        self.scheduled.insert(id.clone());
        self.notifications.push(Notification {
            id: id.clone(),
            text,
            level,
        });
        self.publish();
        tracing::debug!("Notification {} shown ({})", id, level);

        ctx.run_later(self.ttl, move |act, _ctx| {
            act.scheduled.remove(&id);
            act.remove(&id);
        });
    }

    fn remove(&mut self, id: &str) {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        if self.notifications.len() != before {
            tracing::trace!("Notification {} expired", id);
            self.publish();
        }
    }
}

impl Actor for NotificationBus {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("NotificationBus started with ttl: {}ms", self.ttl.as_millis());
    }
}

impl Handler<ShowNotification> for NotificationBus {
    type Result = ();

    fn handle(&mut self, msg: ShowNotification, ctx: &mut Self::Context) -> Self::Result {
        self.append(msg.text, msg.level, ctx);
    }
}

impl Handler<NotifyError> for NotificationBus {
    type Result = ();

    fn handle(&mut self, msg: NotifyError, ctx: &mut Self::Context) -> Self::Result {
        match &msg.cause {
            Some(cause) => tracing::error!("{}: {}", msg.text, cause),
            None => tracing::error!("{}", msg.text),
        }
        self.append(msg.text, NotificationLevel::Error, ctx);
    }
}

impl Handler<ClearNotifications> for NotificationBus {
    type Result = ();

    fn handle(&mut self, _msg: ClearNotifications, _ctx: &mut Self::Context) -> Self::Result {
        if !self.notifications.is_empty() {
            tracing::debug!("Clearing {} notifications", self.notifications.len());
        }
        self.notifications.clear();
        self.publish();
    }
}

impl Handler<ListNotifications> for NotificationBus {
    type Result = MessageResult<ListNotifications>;

    fn handle(&mut self, _msg: ListNotifications, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.notifications.clone())
    }
}
