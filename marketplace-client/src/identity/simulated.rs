// marketplace-client/src/identity/simulated.rs
use super::{IdentityClient, IdentityClientFactory, LoginOptions};
use crate::platform::KeyValueStorage;
use async_trait::async_trait;
use common::{issue_delegation, verify_delegation, IdentityError, IdentityHandle};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use uuid::Uuid;

// Storage key holding the current delegation, shared by every client instance
const DELEGATION_KEY: &str = "identity-delegation";

/// How the provider answers the next interactive login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginScript {
    Approve(String),
    /// The user closes the popup
    Cancel,
    Reject(String),
}

struct ProviderState {
    secret: Vec<u8>,
    storage: Arc<dyn KeyValueStorage>,
    script: Mutex<VecDeque<LoginScript>>,
    default_principal: String,
    clients_created: AtomicUsize,
    fail_logout: AtomicBool,
    last_login: Mutex<Option<LoginOptions>>,
}

/// In-process identity provider issuing signed, expiring delegations.
///
/// Delegations are persisted in the given storage, so a freshly constructed
/// client picks up a session left by an earlier one, like the browser SDK does.
#[derive(Clone)]
pub struct SimulatedIdentityProvider {
    state: Arc<ProviderState>,
}

impl SimulatedIdentityProvider {
    pub fn new(secret: impl Into<Vec<u8>>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            state: Arc::new(ProviderState {
                secret: secret.into(),
                storage,
                script: Mutex::new(VecDeque::new()),
                default_principal: format!("principal-{}", Uuid::new_v4()),
                clients_created: AtomicUsize::new(0),
                fail_logout: AtomicBool::new(false),
                last_login: Mutex::new(None),
            }),
        }
    }

    /// Queue the answer for the next login; unqueued logins are approved
    pub fn script_next_login(&self, script: LoginScript) {
        self.state
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(script);
    }

    pub fn fail_logouts(&self, fail: bool) {
        self.state.fail_logout.store(fail, Ordering::SeqCst);
    }

    pub fn clients_created(&self) -> usize {
        self.state.clients_created.load(Ordering::SeqCst)
    }

    pub fn default_principal(&self) -> &str {
        &self.state.default_principal
    }

    /// Options passed to the most recent interactive login
    pub fn last_login_options(&self) -> Option<LoginOptions> {
        self.state
            .last_login
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IdentityClientFactory for SimulatedIdentityProvider {
    async fn create(&self) -> Result<Arc<dyn IdentityClient>, IdentityError> {
        let instance = self.state.clients_created.fetch_add(1, Ordering::SeqCst) + 1;
        let client = SimulatedAuthClient {
            provider: self.state.clone(),
            identity: RwLock::new(None),
        };
        client.restore();

        tracing::debug!("Created identity client #{}", instance);
        Ok(Arc::new(client))
    }
}

struct SimulatedAuthClient {
    provider: Arc<ProviderState>,
    identity: RwLock<Option<IdentityHandle>>,
}

impl SimulatedAuthClient {
    // Pick up a delegation persisted by an earlier client
    fn restore(&self) {
        let Some(token) = self.provider.storage.get(DELEGATION_KEY) else {
            return;
        };

        match verify_delegation(&token, &self.provider.secret) {
            Ok(claims) => {
                let handle = IdentityHandle {
                    principal: claims.sub.clone(),
                    delegation: token,
                    expires_at: claims.expires_at(),
                };
                self.set_identity(Some(handle));
            },
            Err(e) => {
                tracing::debug!("Discarding stored delegation: {}", e);
            }
        }
    }

    fn set_identity(&self, identity: Option<IdentityHandle>) {
        *self.identity.write().unwrap_or_else(PoisonError::into_inner) = identity;
    }

    fn next_script(&self) -> LoginScript {
        self.provider
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| LoginScript::Approve(self.provider.default_principal.clone()))
    }
}

#[async_trait]
impl IdentityClient for SimulatedAuthClient {
    async fn is_authenticated(&self) -> bool {
        match self.identity() {
            Some(handle) => verify_delegation(&handle.delegation, &self.provider.secret).is_ok(),
            None => false,
        }
    }

    fn identity(&self) -> Option<IdentityHandle> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn login(&self, options: LoginOptions) -> Result<(), IdentityError> {
        tracing::debug!(
            "Opening {} with features {}",
            options.identity_provider,
            options.window_features
        );
        *self
            .provider
            .last_login
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(options.clone());

        match self.next_script() {
            LoginScript::Approve(principal) => {
                let (token, claims) =
                    issue_delegation(&principal, options.max_time_to_live, &self.provider.secret)?;
                self.provider.storage.set(DELEGATION_KEY, &token)?;
                self.set_identity(Some(IdentityHandle {
                    principal,
                    delegation: token,
                    expires_at: claims.expires_at(),
                }));
                Ok(())
            },
            LoginScript::Cancel => Err(IdentityError::UserInterrupt),
            LoginScript::Reject(reason) => Err(IdentityError::Rejected(reason)),
        }
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        if self.provider.fail_logout.load(Ordering::SeqCst) {
            return Err(IdentityError::Unavailable("logout request failed".to_string()));
        }

        self.provider.storage.remove(DELEGATION_KEY)?;
        self.set_identity(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::InMemoryStorage;
    use std::time::Duration;

    fn options() -> LoginOptions {
        LoginOptions {
            identity_provider: "https://identity.ic0.app".to_string(),
            max_time_to_live: Duration::from_secs(8 * 24 * 3600),
            window_features: "width=400,height=600,top=100,left=400".to_string(),
        }
    }

    #[actix::test]
    async fn test_login_persists_across_clients() {
        let provider = SimulatedIdentityProvider::new("secret", Arc::new(InMemoryStorage::new()));
        let first = provider.create().await.unwrap();
        assert!(!first.is_authenticated().await);

        first.login(options()).await.unwrap();
        assert!(first.is_authenticated().await);
        let principal = first.identity().unwrap().principal;
        assert_eq!(principal, provider.default_principal());

        let second = provider.create().await.unwrap();
        assert!(second.is_authenticated().await);
        assert_eq!(second.identity().unwrap().principal, principal);
        assert_eq!(provider.clients_created(), 2);
    }

    #[actix::test]
    async fn test_scripted_outcomes() {
        let provider = SimulatedIdentityProvider::new("secret", Arc::new(InMemoryStorage::new()));
        let client = provider.create().await.unwrap();

        provider.script_next_login(LoginScript::Cancel);
        assert!(matches!(client.login(options()).await, Err(IdentityError::UserInterrupt)));

        provider.script_next_login(LoginScript::Reject("denied".into()));
        assert!(matches!(client.login(options()).await, Err(IdentityError::Rejected(_))));
        assert!(!client.is_authenticated().await);

        provider.script_next_login(LoginScript::Approve("ryjl3-tyaaa-aaaaa-aaaba-cai".into()));
        client.login(options()).await.unwrap();
        assert_eq!(client.identity().unwrap().principal, "ryjl3-tyaaa-aaaaa-aaaba-cai");
    }

    #[actix::test]
    async fn test_logout_clears_delegation() {
        let storage = Arc::new(InMemoryStorage::new());
        let provider = SimulatedIdentityProvider::new("secret", storage.clone());
        let client = provider.create().await.unwrap();
        client.login(options()).await.unwrap();
        assert!(storage.get(DELEGATION_KEY).is_some());

        provider.fail_logouts(true);
        assert!(client.logout().await.is_err());
        assert!(client.is_authenticated().await);

        provider.fail_logouts(false);
        client.logout().await.unwrap();
        assert!(!client.is_authenticated().await);
        assert!(storage.get(DELEGATION_KEY).is_none());
    }
}
