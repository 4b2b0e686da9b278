use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub type SessionId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Supplies ETH, deploys the contract.
    Alice,
    /// Supplies XMR, claims the ETH.
    Bob,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Alice => write!(f, "alice"),
            Role::Bob => write!(f, "bob"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ongoing,
    Success,
    Refunded,
    Aborted,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Ongoing)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ongoing => write!(f, "ongoing"),
            Status::Success => write!(f, "success"),
            Status::Refunded => write!(f, "refunded"),
            Status::Aborted => write!(f, "aborted"),
        }
    }
}

/// Snapshot of one swap as reported to the RPC layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwapInfo {
    pub id: SessionId,
    pub role: Role,
    pub peer: String,
    pub provided_amount: Decimal,
    pub received_amount: Option<Decimal>,
    pub exchange_rate: Option<Decimal>,
    pub status: Status,
}

/// Live, shared record of one swap session. The protocol engine updates it,
/// the façade reads it.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    inner: Mutex<SwapInfo>,
}

impl Session {
    fn new(id: SessionId, role: Role, peer: String, provided_amount: Decimal) -> Self {
        Self {
            id,
            inner: Mutex::new(SwapInfo {
                id,
                role,
                peer,
                provided_amount,
                received_amount: None,
                exchange_rate: None,
                status: Status::Ongoing,
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn info(&self) -> SwapInfo {
        self.inner.lock().expect("session lock poisoned").clone()
    }

    pub fn status(&self) -> Status {
        self.inner.lock().expect("session lock poisoned").status
    }

    pub fn provided_amount(&self) -> Decimal {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .provided_amount
    }

    pub fn received_amount(&self) -> Option<Decimal> {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .received_amount
    }

    /// Records what the peer provides and derives the exchange rate from it.
    pub fn set_received_amount(&self, amount: Decimal) {
        let mut info = self.inner.lock().expect("session lock poisoned");
        info.received_amount = Some(amount);
        info.exchange_rate = amount.checked_div(info.provided_amount);
    }

    /// Moves the session to `status`. Transitions are monotonic: once a
    /// terminal status is set, later transitions are ignored.
    pub fn set_status(&self, status: Status) -> bool {
        let mut info = self.inner.lock().expect("session lock poisoned");
        if info.status.is_terminal() {
            return false;
        }

        tracing::info!(id = self.id, %status, "Swap status changed");
        info.status = status;
        true
    }
}

#[derive(Debug, Default)]
struct Inner {
    ongoing: HashMap<SessionId, Arc<Session>>,
    past: HashMap<SessionId, SwapInfo>,
}

/// Hands out session ids and keeps track of ongoing and past swaps.
#[derive(Debug, Default)]
pub struct Manager {
    next_id: AtomicU64,
    inner: Mutex<Inner>,
}

impl Manager {
    pub fn new_session(&self, role: Role, peer: String, provided_amount: Decimal) -> Arc<Session> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let session = Arc::new(Session::new(id, role, peer, provided_amount));

        let mut inner = self.inner.lock().expect("manager lock poisoned");
        inner.ongoing.insert(id, session.clone());

        session
    }

    pub fn ongoing(&self) -> Vec<SwapInfo> {
        let mut inner = self.inner.lock().expect("manager lock poisoned");
        Self::sweep(&mut inner);

        inner.ongoing.values().map(|s| s.info()).collect()
    }

    pub fn past_ids(&self) -> Vec<SessionId> {
        let mut inner = self.inner.lock().expect("manager lock poisoned");
        Self::sweep(&mut inner);

        let mut ids: Vec<_> = inner.past.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn past(&self, id: SessionId) -> Option<SwapInfo> {
        let mut inner = self.inner.lock().expect("manager lock poisoned");
        Self::sweep(&mut inner);

        inner.past.get(&id).cloned()
    }

    /// Sessions that reached a terminal status move from ongoing to past.
    fn sweep(inner: &mut Inner) {
        let finished: Vec<SessionId> = inner
            .ongoing
            .iter()
            .filter(|(_, session)| session.status().is_terminal())
            .map(|(id, _)| *id)
            .collect();

        for id in finished {
            if let Some(session) = inner.ongoing.remove(&id) {
                inner.past.insert(id, session.info());
            }
        }
    }
}
