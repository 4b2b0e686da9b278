mod message;

pub use message::{
    DecodeError, Message, MessageType, NotifyClaimed, NotifyContractDeployed, NotifyReady,
    NotifyRefund, NotifyXMRLock, QueryResponse, SendKeysMessage,
};

use crate::session::SessionId;
use anyhow::{anyhow, Result};
use tokio::sync::mpsc;

/// A message on its way to a peer, tagged with the session it belongs to.
/// The transport layer owns the other end of the channel.
#[derive(Clone, Debug)]
pub struct OutboundMessage {
    pub session_id: SessionId,
    pub peer: String,
    pub message: Message,
}

/// Handle through which one session talks to its peer. Replies and
/// timer-driven sends go through the same channel, so ordering on the wire
/// matches the order the session produced them in.
#[derive(Clone, Debug)]
pub struct MessageSender {
    session_id: SessionId,
    peer: String,
    tx: mpsc::Sender<OutboundMessage>,
}

impl MessageSender {
    pub fn new(session_id: SessionId, peer: String, tx: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            session_id,
            peer,
            tx,
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub async fn send(&self, message: Message) -> Result<()> {
        self.tx
            .send(OutboundMessage {
                session_id: self.session_id,
                peer: self.peer.clone(),
                message,
            })
            .await
            .map_err(|_| anyhow!("peer transport is gone"))
    }
}
