pub mod alice;
pub mod bob;

use crate::net::MessageType;
use std::future::Future;
use tokio::sync::watch;

/// How handling a protocol message can fail. Verification failures are fatal
/// for the session; `ChainRpc` is transient and leaves the session ongoing;
/// `UnexpectedMessage` leaves the state untouched entirely.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("received unexpected message type {got}, expected {expected}")]
    UnexpectedMessage {
        expected: MessageType,
        got: MessageType,
    },
    #[error("peer did not send all required keys")]
    MissingKeys,
    #[error("peer did not send an address")]
    MissingAddress,
    #[error("DLEq proof does not verify against the claimed keys")]
    InvalidDleq,
    #[error("joint account address {got} does not match the expected address {expected}")]
    AddressMismatch { expected: String, got: String },
    #[error("deployed contract does not match the agreed swap: {0}")]
    ContractMismatch(&'static str),
    #[error("locked amount of {got} piconero is less than the expected {expected} piconero")]
    InsufficientLock { expected: u64, got: u64 },
    #[error("a contract is already deployed for this session")]
    AlreadyDeployed,
    #[error("chain RPC call failed: {0:#}")]
    ChainRpc(#[source] anyhow::Error),
    #[error("swap is no longer active")]
    Cancelled,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Fatal errors terminate the session; everything else leaves it alive.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::UnexpectedMessage { .. } | Error::ChainRpc(_) | Error::Cancelled
        )
    }
}

/// A one-shot event in the style of a closed channel: `set` is idempotent,
/// `wait` resolves once set, no matter in which order the two happen.
#[derive(Clone, Debug)]
pub struct Event {
    tx: watch::Sender<bool>,
}

impl Event {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn set(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_set(&self) -> bool {
        *self.tx.borrow()
    }

    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|set| *set).await;
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a chain call while listening for session cancellation, so blocking
/// RPC calls cannot outlive the swap they belong to.
pub(crate) async fn race_cancel<T, F>(cancel: &Event, call: F) -> Result<T, Error>
where
    F: Future<Output = anyhow::Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.wait() => Err(Error::Cancelled),
        result = call => result.map_err(Error::ChainRpc),
    }
}
