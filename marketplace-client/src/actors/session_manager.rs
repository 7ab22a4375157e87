// marketplace-client/src/actors/session_manager.rs
use crate::identity::{IdentityClient, IdentityClientFactory, LoginOptions};
use actix::prelude::*;
use common::{
    IdentityConfig, IdentityError, IdentityHandle, ResetClient, SessionState, SignIn, SignOut,
    SyncSession, ViewportSnapshot,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Actor owning the session lifecycle.
///
/// The identity client is built lazily and memoized until sign-out or an
/// explicit `ResetClient`. Lifecycle handlers run as atomic responses, so a
/// sync never interleaves with an in-flight sign-in or sign-out.
pub struct SessionManager {
    factory: Arc<dyn IdentityClientFactory>,
    client: Option<Arc<dyn IdentityClient>>,
    config: IdentityConfig,
    viewport: watch::Receiver<ViewportSnapshot>,
    published: watch::Sender<SessionState>,
}

impl SessionManager {
    pub fn new(
        factory: Arc<dyn IdentityClientFactory>,
        config: IdentityConfig,
        viewport: watch::Receiver<ViewportSnapshot>,
    ) -> Self {
        let (published, _) = watch::channel(SessionState::Unknown);
        Self {
            factory,
            client: None,
            config,
            viewport,
            published,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.published.subscribe()
    }

    fn publish(&self, state: SessionState) {
        match &state {
            SessionState::Present(identity) => {
                tracing::info!("Session present for principal: {}", identity.principal)
            },
            SessionState::Absent => tracing::info!("Session absent"),
            SessionState::Unknown => tracing::debug!("Session unknown"),
        }
        self.published.send_replace(state);
    }

    fn login_options(&self) -> LoginOptions {
        let viewport = *self.viewport.borrow();
        LoginOptions::centered(&self.config, viewport.width, viewport.height)
    }
}

async fn ensure_client(
    existing: Option<Arc<dyn IdentityClient>>,
    factory: Arc<dyn IdentityClientFactory>,
) -> Result<Arc<dyn IdentityClient>, IdentityError> {
    match existing {
        Some(client) => Ok(client),
        None => factory.create().await,
    }
}

async fn probe(
    existing: Option<Arc<dyn IdentityClient>>,
    factory: Arc<dyn IdentityClientFactory>,
) -> Result<(Arc<dyn IdentityClient>, Option<IdentityHandle>), IdentityError> {
    let client = ensure_client(existing, factory).await?;
    let identity = if client.is_authenticated().await {
        client.identity()
    } else {
        None
    };
    Ok((client, identity))
}

// The client is kept even when the login fails, so a retry reuses it
async fn login(
    existing: Option<Arc<dyn IdentityClient>>,
    factory: Arc<dyn IdentityClientFactory>,
    options: LoginOptions,
) -> (Option<Arc<dyn IdentityClient>>, Result<IdentityHandle, IdentityError>) {
    let client = match ensure_client(existing, factory).await {
        Ok(client) => client,
        Err(e) => return (None, Err(e)),
    };

    let result = match client.login(options).await {
        Ok(()) => client
            .identity()
            .ok_or_else(|| IdentityError::Rejected("provider returned no identity".to_string())),
        Err(e) => Err(e),
    };

    (Some(client), result)
}

async fn logout(
    existing: Option<Arc<dyn IdentityClient>>,
    factory: Arc<dyn IdentityClientFactory>,
) -> Result<(), IdentityError> {
    let client = ensure_client(existing, factory).await?;
    client.logout().await
}

impl Actor for SessionManager {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("SessionManager started for provider: {}", self.config.provider_url);
    }
}

impl Handler<SyncSession> for SessionManager {
    type Result = AtomicResponse<Self, Result<SessionState, IdentityError>>;

    fn handle(&mut self, _msg: SyncSession, _ctx: &mut Self::Context) -> Self::Result {
        let existing = self.client.clone();
        let factory = self.factory.clone();

        AtomicResponse::new(Box::pin(probe(existing, factory).into_actor(self).map(
            |result, act, _ctx| {
                let (client, identity) = result?;
                act.client = Some(client);
                let state = SessionState::from_identity(identity);
                act.publish(state.clone());
                Ok(state)
            },
        )))
    }
}

impl Handler<SignIn> for SessionManager {
    type Result = AtomicResponse<Self, Result<IdentityHandle, IdentityError>>;

    fn handle(&mut self, _msg: SignIn, _ctx: &mut Self::Context) -> Self::Result {
        let existing = self.client.clone();
        let factory = self.factory.clone();
        let options = self.login_options();

        AtomicResponse::new(Box::pin(login(existing, factory, options).into_actor(self).map(
            |(client, result), act, _ctx| {
                if let Some(client) = client {
                    act.client = Some(client);
                }

                match &result {
                    Ok(identity) => act.publish(SessionState::Present(identity.clone())),
                    Err(IdentityError::UserInterrupt) => tracing::info!("Sign-in cancelled by user"),
                    Err(e) => tracing::warn!("Sign-in failed: {}", e),
                }
                result
            },
        )))
    }
}

impl Handler<SignOut> for SessionManager {
    type Result = AtomicResponse<Self, Result<(), IdentityError>>;

    fn handle(&mut self, _msg: SignOut, _ctx: &mut Self::Context) -> Self::Result {
        let existing = self.client.clone();
        let factory = self.factory.clone();

        AtomicResponse::new(Box::pin(logout(existing, factory).into_actor(self).map(
            |result, act, _ctx| {
                result?;
                // A fresh client is required for the next sign-in
                act.client = None;
                act.publish(SessionState::Absent);
                Ok(())
            },
        )))
    }
}

impl Handler<ResetClient> for SessionManager {
    type Result = ();

    fn handle(&mut self, _msg: ResetClient, _ctx: &mut Self::Context) -> Self::Result {
        if self.client.take().is_some() {
            tracing::debug!("Discarded memoized identity client");
        }
    }
}
