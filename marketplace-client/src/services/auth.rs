// marketplace-client/src/services/auth.rs
use crate::context::MarketplaceContext;
use crate::error::ClientError;
use common::{ClearNotifications, IdentityError, NotificationLevel, NotifyError, SignIn, SignInOutcome, SignOut};
use url::Url;

const MSG_PARAM: &str = "msg";
const LEVEL_PARAM: &str = "level";

/// Run the interactive sign-in.
///
/// Cancellation is silent. Any other failure produces one error notification
/// and is returned as `SignInOutcome::Failed`. On success earlier
/// notifications are cleared.
pub async fn sign_in(ctx: &MarketplaceContext) -> SignInOutcome {
    let result = match ctx.session.send(SignIn).await {
        Ok(result) => result,
        Err(e) => Err(IdentityError::Unavailable(e.to_string())),
    };

    let outcome = SignInOutcome::from(result);
    match &outcome {
        SignInOutcome::Ok => {
            if let Err(e) = ctx.notifications.send(ClearNotifications).await {
                tracing::warn!("Failed to clear notifications after sign-in: {}", e);
            }
        },
        SignInOutcome::Cancelled => {},
        SignInOutcome::Failed(err) => {
            ctx.notifications
                .do_send(NotifyError::new("Error while signing in", Some(err.to_string())));
        }
    }
    outcome
}

/// Sign out and reset every component.
///
/// Errors propagate to the caller without a notification.
pub async fn sign_out(ctx: &MarketplaceContext) -> Result<(), ClientError> {
    ctx.session_storage.clear()?;
    ctx.session.send(SignOut).await??;
    ctx.reset().await
}

/// Show a message passed through the `msg`/`level` query parameters after a
/// redirect, then strip both parameters from the visible URL.
/// Returns whether a message was shown.
pub fn display_and_clean_logout_msg(ctx: &MarketplaceContext) -> bool {
    let Some(location) = &ctx.location else {
        return false;
    };

    let href = location.href();
    let mut url = match Url::parse(&href) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot parse location {}: {}", href, e);
            return false;
        }
    };

    let mut msg = None;
    let mut level = None;
    for (key, value) in url.query_pairs() {
        match &*key {
            MSG_PARAM if msg.is_none() => msg = Some(value.into_owned()),
            LEVEL_PARAM if level.is_none() => level = Some(value.into_owned()),
            _ => {},
        }
    }

    let Some(msg) = msg.filter(|msg| !msg.is_empty()) else {
        return false;
    };

    let level = match level {
        Some(raw) => raw.parse::<NotificationLevel>().unwrap_or_else(|e| {
            tracing::warn!("{}, showing as info", e);
            NotificationLevel::Info
        }),
        None => NotificationLevel::Success,
    };
    ctx.show(msg, level);

    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != MSG_PARAM && key != LEVEL_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if remaining.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(remaining);
    }

    location.replace_state(url.as_str());
    true
}
