// common/src/models/session.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::error::IdentityError;

/// Opaque identity issued by the external provider after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityHandle {
    /// Principal the provider authenticated
    pub principal: String,
    /// Signed delegation token backing the identity
    pub delegation: String,
    /// End of the session validity window
    pub expires_at: DateTime<Utc>,
}

impl IdentityHandle {
    /// Check whether the delegation has run past its validity window
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Published session snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not yet synced with the identity client
    #[default]
    Unknown,
    /// Synced, no authenticated identity
    Absent,
    Present(IdentityHandle),
}

impl SessionState {
    pub fn from_identity(identity: Option<IdentityHandle>) -> Self {
        match identity {
            Some(handle) => SessionState::Present(handle),
            None => SessionState::Absent,
        }
    }

    pub fn identity(&self) -> Option<&IdentityHandle> {
        match self {
            SessionState::Present(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Present(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SessionState::Unknown)
    }
}

/// Result of an interactive sign-in as seen by callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    Ok,
    /// The user closed or aborted the provider flow
    Cancelled,
    Failed(IdentityError),
}

impl SignInOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, SignInOutcome::Ok)
    }
}

impl From<Result<IdentityHandle, IdentityError>> for SignInOutcome {
    fn from(result: Result<IdentityHandle, IdentityError>) -> Self {
        match result {
            Ok(_) => SignInOutcome::Ok,
            Err(IdentityError::UserInterrupt) => SignInOutcome::Cancelled,
            Err(err) => SignInOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn handle(expires_in: Duration) -> IdentityHandle {
        IdentityHandle {
            principal: "rrkah-fqaaa-aaaaa-aaaaq-cai".to_string(),
            delegation: "token".to_string(),
            expires_at: Utc::now() + expires_in,
        }
    }

    #[test]
    fn test_state_from_identity() {
        assert_eq!(SessionState::from_identity(None), SessionState::Absent);
        let state = SessionState::from_identity(Some(handle(Duration::hours(1))));
        assert!(state.is_authenticated());
        assert!(!SessionState::default().is_authenticated());
        assert!(SessionState::default().is_unknown());
    }

    #[test]
    fn test_handle_expiry() {
        assert!(!handle(Duration::hours(1)).is_expired());
        assert!(handle(Duration::seconds(-1)).is_expired());
    }

    #[test]
    fn test_outcome_discriminates_interrupt() {
        let cancelled: SignInOutcome = Err(IdentityError::UserInterrupt).into();
        assert!(matches!(cancelled, SignInOutcome::Cancelled));

        let failed: SignInOutcome = Err(IdentityError::Rejected("denied".into())).into();
        assert!(matches!(failed, SignInOutcome::Failed(IdentityError::Rejected(_))));

        let ok: SignInOutcome = Ok(handle(Duration::hours(1))).into();
        assert!(ok.is_ok());
    }
}
