// marketplace-client/src/error.rs
use common::{IdentityError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("actor mailbox error: {0}")]
    Mailbox(#[from] actix::MailboxError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
