// marketplace-client/tests/theme_controller_test.rs
use actix::Actor;
use common::{CurrentTheme, SetTheme, Theme, ThemeConfig, ToggleTheme};
use marketplace_client::actors::ThemeController;
use marketplace_client::platform::{HeadlessWindow, InMemoryStorage, KeyValueStorage};
use std::sync::Arc;
use std::time::Duration;

const KEY: &str = "nftropoly-theme";

fn controller(window: &Arc<HeadlessWindow>, storage: &Arc<InMemoryStorage>) -> ThemeController {
    ThemeController::new(
        ThemeConfig::default(),
        storage.clone(),
        window.clone(),
        Some(window.clone()),
    )
}

#[actix::test]
async fn test_initial_theme_precedence() {
    // Persisted value wins over the OS preference
    let window = Arc::new(HeadlessWindow::new(1200, 800).with_os_preference(true));
    let storage = Arc::new(InMemoryStorage::new());
    storage.set(KEY, "light").unwrap();
    let addr = controller(&window, &storage).start();
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Light);
    assert_eq!(window.classes(), vec!["light".to_string()]);

    // OS preference used when nothing is persisted
    let window = Arc::new(HeadlessWindow::new(1200, 800).with_os_preference(false));
    let storage = Arc::new(InMemoryStorage::new());
    let addr = controller(&window, &storage).start();
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Light);

    // Default when neither is available
    let window = Arc::new(HeadlessWindow::new(1200, 800));
    let addr = controller(&window, &storage).start();
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Dark);
    assert_eq!(window.classes(), vec!["dark".to_string()]);
    assert_eq!(window.chrome_color().as_deref(), Some("#0f172a"));
}

#[actix::test]
async fn test_invalid_persisted_value_is_ignored() {
    let window = Arc::new(HeadlessWindow::new(1200, 800).with_os_preference(false));
    let storage = Arc::new(InMemoryStorage::new());
    storage.set(KEY, "sepia").unwrap();

    let addr = controller(&window, &storage).start();
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Light);
}

#[actix::test]
async fn test_toggle_twice_restores_and_persists() {
    let window = Arc::new(HeadlessWindow::new(1200, 800));
    let storage = Arc::new(InMemoryStorage::new());
    let addr = controller(&window, &storage).start();

    let original = addr.send(CurrentTheme).await.unwrap();
    let flipped = addr.send(ToggleTheme).await.unwrap();
    assert_eq!(flipped, original.opposite());
    assert_eq!(storage.get(KEY).as_deref(), Some(flipped.as_str()));
    assert_eq!(window.classes(), vec![flipped.as_str().to_string()]);

    let restored = addr.send(ToggleTheme).await.unwrap();
    assert_eq!(restored, original);
    assert_eq!(storage.get(KEY).as_deref(), Some(original.as_str()));
    assert_eq!(window.classes(), vec![original.as_str().to_string()]);
}

#[actix::test]
async fn test_set_is_idempotent_on_root() {
    let window = Arc::new(HeadlessWindow::new(1200, 800));
    let storage = Arc::new(InMemoryStorage::new());
    let controller = controller(&window, &storage);
    let mut rx = controller.subscribe();
    let addr = controller.start();

    addr.send(SetTheme(Theme::Light)).await.unwrap();
    addr.send(SetTheme(Theme::Light)).await.unwrap();
    assert_eq!(window.classes(), vec!["light".to_string()]);
    assert_eq!(window.chrome_color().as_deref(), Some("#ffffff"));
    assert_eq!(storage.get(KEY).as_deref(), Some("light"));
    assert_eq!(*rx.borrow_and_update(), Theme::Light);
}

#[actix::test]
async fn test_os_changes_followed_until_user_chooses() {
    let window = Arc::new(HeadlessWindow::new(1200, 800).with_os_preference(true));
    let storage = Arc::new(InMemoryStorage::new());
    let addr = controller(&window, &storage).start();
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Dark);

    window.set_os_preference(false);
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Light);
    // Following the OS is not an explicit choice
    assert!(storage.get(KEY).is_none());

    window.set_os_preference(true);
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Dark);

    addr.send(ToggleTheme).await.unwrap();
    window.set_os_preference(true);
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Light);
    window.set_os_preference(false);
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Light);
}

#[actix::test]
async fn test_preference_is_rechecked_on_every_event() {
    let window = Arc::new(HeadlessWindow::new(1200, 800).with_os_preference(true));
    let storage = Arc::new(InMemoryStorage::new());
    let addr = controller(&window, &storage).start();

    addr.send(SetTheme(Theme::Dark)).await.unwrap();
    window.set_os_preference(false);
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Dark);

    // Once the stored choice disappears the OS is followed again
    storage.remove(KEY).unwrap();
    window.set_os_preference(false);
    assert_eq!(addr.send(CurrentTheme).await.unwrap(), Theme::Light);
}

#[actix::test]
async fn test_listener_removed_when_controller_stops() {
    let window = Arc::new(HeadlessWindow::new(1200, 800));
    let storage = Arc::new(InMemoryStorage::new());
    let addr = controller(&window, &storage).start();
    addr.send(CurrentTheme).await.unwrap();
    assert_eq!(window.scheme_listener_count(), 1);

    drop(addr);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(window.scheme_listener_count(), 0);
}
