// marketplace-client/tests/session_test.rs
mod support;

use common::{Blockchain, IdentityError, NotificationLevel, SessionState, SignInOutcome};
use marketplace_client::identity::LoginScript;
use marketplace_client::platform::{HeadlessWindow, InMemoryStorage, KeyValueStorage};
use marketplace_client::services::{sign_in, sign_out};
use marketplace_client::ClientError;
use std::sync::Arc;
use std::time::Duration;
use support::{harness, harness_with, notifications, provider};

#[actix::test]
async fn test_session_unknown_until_synced() {
    let h = harness();
    assert!(h.ctx.session().is_unknown());

    let state = h.ctx.sync_session().await.unwrap();
    assert_eq!(state, SessionState::Absent);
    assert_eq!(h.ctx.session(), SessionState::Absent);
}

#[actix::test]
async fn test_sync_reuses_memoized_client() {
    let h = harness();
    h.ctx.sync_session().await.unwrap();
    h.ctx.sync_session().await.unwrap();
    h.ctx.sync_session().await.unwrap();
    assert_eq!(h.identity.clients_created(), 1);

    h.ctx.reset_identity_client().await.unwrap();
    h.ctx.sync_session().await.unwrap();
    assert_eq!(h.identity.clients_created(), 2);
}

#[actix::test]
async fn test_sign_in_then_out_then_in_again() {
    let h = harness();
    h.ctx.sync_session().await.unwrap();

    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    let identity = h.ctx.session().identity().cloned().unwrap();
    assert_eq!(identity.principal, h.identity.default_principal());
    assert!(!identity.is_expired());

    sign_out(&h.ctx).await.unwrap();
    assert_eq!(h.ctx.session(), SessionState::Absent);

    // Sign-out discards the client, so a new one is built
    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    assert!(h.ctx.session().is_authenticated());
    assert_eq!(h.identity.clients_created(), 2);
}

#[actix::test]
async fn test_sign_in_without_prior_sync_builds_client() {
    let h = harness();
    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    assert!(h.ctx.session().is_authenticated());
    assert_eq!(h.identity.clients_created(), 1);
}

#[actix::test]
async fn test_existing_delegation_restored_on_sync() {
    let identity = provider();
    let first = harness_with(HeadlessWindow::new(1200, 800), identity.clone(), |_| {});
    assert_eq!(sign_in(&first.ctx).await, SignInOutcome::Ok);

    // A second context sharing the provider sees the stored delegation
    let second = harness_with(HeadlessWindow::new(1200, 800), identity.clone(), |_| {});
    let state = second.ctx.sync_session().await.unwrap();
    assert!(state.is_authenticated());
    assert_eq!(state.identity().unwrap().principal, identity.default_principal());
}

#[actix::test]
async fn test_cancelled_sign_in_is_silent() {
    let h = harness();
    h.ctx.sync_session().await.unwrap();
    h.identity.script_next_login(LoginScript::Cancel);

    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Cancelled);
    assert!(notifications(&h.ctx).await.is_empty());
    assert_eq!(h.ctx.session(), SessionState::Absent);
}

#[actix::test]
async fn test_failed_sign_in_shows_one_error() {
    let h = harness();
    h.ctx.sync_session().await.unwrap();
    h.identity.script_next_login(LoginScript::Reject("denied".to_string()));

    let outcome = sign_in(&h.ctx).await;
    assert_eq!(outcome, SignInOutcome::Failed(IdentityError::Rejected("denied".to_string())));

    let list = notifications(&h.ctx).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].text, "Error while signing in");
    assert_eq!(list[0].level, NotificationLevel::Error);
    assert_eq!(h.ctx.session(), SessionState::Absent);

    // The client survives the failure and is reused by the retry
    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    assert_eq!(h.identity.clients_created(), 1);
}

#[actix::test]
async fn test_successful_sign_in_clears_notifications() {
    let h = harness();
    h.ctx.show("stale", NotificationLevel::Warn);
    h.ctx.notify_error("older failure", None);
    assert_eq!(notifications(&h.ctx).await.len(), 2);

    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    assert!(notifications(&h.ctx).await.is_empty());
    assert!(h.ctx.notifications().is_empty());
}

#[actix::test]
async fn test_failed_sign_out_propagates_without_toast() {
    let h = harness();
    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    h.identity.fail_logouts(true);

    let result = sign_out(&h.ctx).await;
    assert!(matches!(result, Err(ClientError::Identity(IdentityError::Unavailable(_)))));
    assert!(notifications(&h.ctx).await.is_empty());
    assert!(h.ctx.session().is_authenticated());

    h.identity.fail_logouts(false);
    sign_out(&h.ctx).await.unwrap();
    assert_eq!(h.ctx.session(), SessionState::Absent);
    assert_eq!(h.identity.clients_created(), 1);
}

#[actix::test]
async fn test_sign_out_resets_components() {
    let session_storage = Arc::new(InMemoryStorage::new());
    let storage = session_storage.clone();
    let h = harness_with(HeadlessWindow::new(1200, 800), provider(), move |platform| {
        platform.session_storage = storage;
    });

    session_storage.set("cart", "[\"3\"]").unwrap();
    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    h.ctx.catalog().fetch(Some(Blockchain::IC)).await.unwrap();
    h.ctx.show("before sign-out", NotificationLevel::Info);
    let theme = h.ctx.toggle_theme().await.unwrap();

    sign_out(&h.ctx).await.unwrap();

    assert!(session_storage.is_empty());
    assert!(h.ctx.catalog().snapshot().items.is_empty());
    assert!(notifications(&h.ctx).await.is_empty());
    assert_eq!(h.ctx.session(), SessionState::Absent);
    // The explicit theme choice survives
    assert_eq!(h.ctx.current_theme().await.unwrap(), theme);
    assert_eq!(h.local_storage.get("nftropoly-theme").as_deref(), Some(theme.as_str()));
}

#[actix::test]
async fn test_login_popup_follows_viewport() {
    let h = harness();
    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    let options = h.identity.last_login_options().unwrap();
    assert_eq!(options.window_features, "width=400,height=600,top=100,left=400");

    sign_out(&h.ctx).await.unwrap();
    h.window.resize(1024, 768);

    assert_eq!(sign_in(&h.ctx).await, SignInOutcome::Ok);
    let options = h.identity.last_login_options().unwrap();
    assert_eq!(options.identity_provider, "https://identity.ic0.app");
    assert_eq!(options.max_time_to_live, Duration::from_secs(8 * 24 * 3600));
    assert_eq!(options.window_features, "width=400,height=600,top=84,left=312");
}
