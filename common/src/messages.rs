// common/src/messages.rs
use actix::prelude::*;
use crate::error::IdentityError;
use crate::models::{
    Blockchain, CatalogItem, IdentityHandle, ListingDraft, Notification, NotificationLevel,
    SessionState, Theme,
};

// Notification bus

/// Append a notification that expires after the bus ttl
#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct ShowNotification {
    pub text: String,
    pub level: NotificationLevel,
}

impl ShowNotification {
    pub fn new(text: impl Into<String>, level: NotificationLevel) -> Self {
        Self { text: text.into(), level }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, NotificationLevel::Info)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, NotificationLevel::Success)
    }
}

/// Append an error notification and log its cause
#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct NotifyError {
    pub text: String,
    pub cause: Option<String>,
}

impl NotifyError {
    pub fn new(text: impl Into<String>, cause: Option<String>) -> Self {
        Self { text: text.into(), cause }
    }
}

#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct ClearNotifications;

#[derive(Debug, Clone, Message)]
#[rtype(result = "Vec<Notification>")]
pub struct ListNotifications;

// Theme controller

/// Flip the theme; replies with the new value
#[derive(Debug, Clone, Message)]
#[rtype(result = "Theme")]
pub struct ToggleTheme;

#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct SetTheme(pub Theme);

#[derive(Debug, Clone, Message)]
#[rtype(result = "Theme")]
pub struct CurrentTheme;

/// OS colour-scheme preference changed
#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct ColorSchemeChanged {
    pub prefers_dark: bool,
}

// Session lifecycle

#[derive(Debug, Clone, Message)]
#[rtype(result = "Result<SessionState, IdentityError>")]
pub struct SyncSession;

#[derive(Debug, Clone, Message)]
#[rtype(result = "Result<IdentityHandle, IdentityError>")]
pub struct SignIn;

#[derive(Debug, Clone, Message)]
#[rtype(result = "Result<(), IdentityError>")]
pub struct SignOut;

/// Drop the memoized identity client so the next use rebuilds it
#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct ResetClient;

// Catalog store

#[derive(Debug, Clone, Message)]
#[rtype(result = "Vec<CatalogItem>")]
pub struct FetchListings {
    pub blockchain: Option<Blockchain>,
}

#[derive(Debug, Clone, Message)]
#[rtype(result = "bool")]
pub struct PurchaseListing {
    pub id: String,
}

#[derive(Debug, Clone, Message)]
#[rtype(result = "Option<CatalogItem>")]
pub struct ListForSale {
    pub draft: ListingDraft,
}

#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct ResetCatalog;
