// marketplace-client/src/actors/catalog_store.rs
use super::notification_bus::NotificationBus;
use crate::catalog_source::CatalogSource;
use crate::error::ClientError;
use actix::prelude::*;
use chrono::Utc;
use common::{
    short_token, Blockchain, CatalogError, CatalogItem, CatalogSnapshot, FetchListings,
    FetchStatus, ListForSale, ListingDraft, NotifyError, PurchaseListing, ResetCatalog,
    ShowNotification,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Actor owning the shared catalog collection.
///
/// Every mutation goes through this mailbox and is published as a whole
/// snapshot, so readers never see a half-applied update.
pub struct CatalogStore {
    snapshot: CatalogSnapshot,
    source: Arc<dyn CatalogSource>,
    notifications: Addr<NotificationBus>,
    published: watch::Sender<CatalogSnapshot>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CatalogSource>, notifications: Addr<NotificationBus>) -> Self {
        let (published, _) = watch::channel(CatalogSnapshot::default());
        Self {
            snapshot: CatalogSnapshot::default(),
            source,
            notifications,
            published,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.published.subscribe()
    }

    fn publish(&self) {
        self.published.send_replace(self.snapshot.clone());
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = short_token();
            if self.snapshot.get_by_id(&id).is_none() {
                return id;
            }
        }
    }

    fn apply_fetch(
        &mut self,
        result: Result<Vec<CatalogItem>, CatalogError>,
        blockchain: Option<Blockchain>,
    ) -> Vec<CatalogItem> {
        match result {
            Ok(items) => {
                let items: Vec<CatalogItem> = match blockchain {
                    Some(chain) => items.into_iter().filter(|item| item.blockchain == chain).collect(),
                    None => items,
                };
                tracing::debug!("Catalog loaded {} items", items.len());
                self.snapshot.items = items.clone();
                self.snapshot.status = FetchStatus::Loaded;
                self.publish();
                items
            },
            Err(e) => {
                self.snapshot.items.clear();
                self.snapshot.status = FetchStatus::Errored(format!("Failed to fetch NFTs: {}", e));
                self.publish();
                self.notifications
                    .do_send(NotifyError::new("Failed to fetch NFTs", Some(e.to_string())));
                Vec::new()
            }
        }
    }
}

impl Actor for CatalogStore {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("CatalogStore started");
    }
}

impl Handler<FetchListings> for CatalogStore {
    type Result = AtomicResponse<Self, Vec<CatalogItem>>;

    fn handle(&mut self, msg: FetchListings, _ctx: &mut Self::Context) -> Self::Result {
        self.snapshot.status = FetchStatus::Loading;
        self.publish();

        let source = self.source.clone();
        let blockchain = msg.blockchain;

        AtomicResponse::new(Box::pin(
            async move { source.fetch_listings().await }
                .into_actor(self)
                .map(move |result, act, _ctx| act.apply_fetch(result, blockchain)),
        ))
    }
}

impl Handler<PurchaseListing> for CatalogStore {
    type Result = bool;

    fn handle(&mut self, msg: PurchaseListing, _ctx: &mut Self::Context) -> Self::Result {
        let Some(item) = self.snapshot.get_by_id(&msg.id) else {
            let err = CatalogError::NotFound(msg.id);
            self.notifications
                .do_send(NotifyError::new("Failed to purchase NFT", Some(err.to_string())));
            return false;
        };

        // Ownership is not transferred until purchases reach the ledger
        tracing::info!("Purchase confirmed for listing: {}", item.id);
        self.notifications.do_send(ShowNotification::success(format!(
            "Successfully purchased {} for {} tokens",
            item.name, item.price
        )));
        true
    }
}

impl Handler<ListForSale> for CatalogStore {
    type Result = MessageResult<ListForSale>;

    fn handle(&mut self, msg: ListForSale, _ctx: &mut Self::Context) -> Self::Result {
        let draft: ListingDraft = msg.draft;

        if let Some(id) = draft.id.as_deref().filter(|id| !id.is_empty()) {
            if self.snapshot.get_by_id(id).is_some() {
                self.notifications.do_send(NotifyError::new(
                    "Failed to list NFT for sale",
                    Some(format!("listing {} already exists", id)),
                ));
                return MessageResult(None);
            }
        }

        let item = draft.into_item(self.fresh_id(), Utc::now());
        self.snapshot.items.push(item.clone());
        self.publish();

        tracing::info!("Listed {} as {}", item.name, item.id);
        self.notifications.do_send(ShowNotification::success(format!(
            "Successfully listed {} for {} tokens",
            item.name, item.price
        )));
        MessageResult(Some(item))
    }
}

impl Handler<ResetCatalog> for CatalogStore {
    type Result = ();

    fn handle(&mut self, _msg: ResetCatalog, _ctx: &mut Self::Context) -> Self::Result {
        self.snapshot = CatalogSnapshot::default();
        self.publish();
    }
}

/// Caller-side view of the catalog store
#[derive(Clone)]
pub struct CatalogHandle {
    addr: Addr<CatalogStore>,
    snapshot: watch::Receiver<CatalogSnapshot>,
}

impl CatalogHandle {
    pub fn new(addr: Addr<CatalogStore>, snapshot: watch::Receiver<CatalogSnapshot>) -> Self {
        Self { addr, snapshot }
    }

    pub async fn fetch(&self, blockchain: Option<Blockchain>) -> Result<Vec<CatalogItem>, ClientError> {
        Ok(self.addr.send(FetchListings { blockchain }).await?)
    }

    pub async fn purchase(&self, id: &str) -> Result<bool, ClientError> {
        Ok(self.addr.send(PurchaseListing { id: id.to_string() }).await?)
    }

    pub async fn list_for_sale(&self, draft: ListingDraft) -> Result<Option<CatalogItem>, ClientError> {
        Ok(self.addr.send(ListForSale { draft }).await?)
    }

    pub async fn reset(&self) -> Result<(), ClientError> {
        Ok(self.addr.send(ResetCatalog).await?)
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<CatalogItem> {
        self.snapshot.borrow().get_by_id(id).cloned()
    }

    pub fn get_by_owner(&self, owner: &str) -> Vec<CatalogItem> {
        self.snapshot.borrow().get_by_owner(owner)
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.snapshot.clone()
    }
}
