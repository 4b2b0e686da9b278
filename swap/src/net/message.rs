//! Wire format of the swap protocol: one tag byte followed by a UTF-8 JSON
//! object.

use crate::offer::Offer;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    QueryResponse,
    SendKeys,
    NotifyContractDeployed,
    NotifyXMRLock,
    NotifyReady,
    NotifyClaimed,
    NotifyRefund,
}

impl MessageType {
    fn tag(&self) -> u8 {
        match self {
            MessageType::QueryResponse => 0,
            MessageType::SendKeys => 1,
            MessageType::NotifyContractDeployed => 2,
            MessageType::NotifyXMRLock => 3,
            MessageType::NotifyReady => 4,
            MessageType::NotifyClaimed => 5,
            MessageType::NotifyRefund => 6,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        let message_type = match tag {
            0 => MessageType::QueryResponse,
            1 => MessageType::SendKeys,
            2 => MessageType::NotifyContractDeployed,
            3 => MessageType::NotifyXMRLock,
            4 => MessageType::NotifyReady,
            5 => MessageType::NotifyClaimed,
            6 => MessageType::NotifyRefund,
            _ => return None,
        };

        Some(message_type)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::QueryResponse => "QueryResponse",
            MessageType::SendKeys => "SendKeysMessage",
            MessageType::NotifyContractDeployed => "NotifyContractDeployed",
            MessageType::NotifyXMRLock => "NotifyXMRLock",
            MessageType::NotifyReady => "NotifyReady",
            MessageType::NotifyClaimed => "NotifyClaimed",
            MessageType::NotifyRefund => "NotifyRefund",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid message frame")]
    InvalidFrame,
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("malformed message payload: {0}")]
    Json(#[source] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    QueryResponse(QueryResponse),
    SendKeys(SendKeysMessage),
    NotifyContractDeployed(NotifyContractDeployed),
    NotifyXMRLock(NotifyXMRLock),
    NotifyReady(NotifyReady),
    NotifyClaimed(NotifyClaimed),
    NotifyRefund(NotifyRefund),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::QueryResponse(_) => MessageType::QueryResponse,
            Message::SendKeys(_) => MessageType::SendKeys,
            Message::NotifyContractDeployed(_) => MessageType::NotifyContractDeployed,
            Message::NotifyXMRLock(_) => MessageType::NotifyXMRLock,
            Message::NotifyReady(_) => MessageType::NotifyReady,
            Message::NotifyClaimed(_) => MessageType::NotifyClaimed,
            Message::NotifyRefund(_) => MessageType::NotifyRefund,
        }
    }

    pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
        let body = match self {
            Message::QueryResponse(m) => serde_json::to_vec(m),
            Message::SendKeys(m) => serde_json::to_vec(m),
            Message::NotifyContractDeployed(m) => serde_json::to_vec(m),
            Message::NotifyXMRLock(m) => serde_json::to_vec(m),
            Message::NotifyReady(m) => serde_json::to_vec(m),
            Message::NotifyClaimed(m) => serde_json::to_vec(m),
            Message::NotifyRefund(m) => serde_json::to_vec(m),
        }?;

        let mut frame = Vec::with_capacity(1 + body.len());
        frame.push(self.message_type().tag());
        frame.extend_from_slice(&body);

        Ok(frame)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (tag, body) = bytes.split_first().ok_or(DecodeError::InvalidFrame)?;
        let message_type = MessageType::from_tag(*tag).ok_or(DecodeError::InvalidFrame)?;

        let message = match message_type {
            MessageType::QueryResponse => Message::QueryResponse(decode_body(body)?),
            MessageType::SendKeys => Message::SendKeys(decode_body(body)?),
            MessageType::NotifyContractDeployed => {
                Message::NotifyContractDeployed(decode_body(body)?)
            }
            MessageType::NotifyXMRLock => Message::NotifyXMRLock(decode_body(body)?),
            MessageType::NotifyReady => Message::NotifyReady(decode_body(body)?),
            MessageType::NotifyClaimed => Message::NotifyClaimed(decode_body(body)?),
            MessageType::NotifyRefund => Message::NotifyRefund(decode_body(body)?),
        };

        Ok(message)
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(body).map_err(|e| {
        let description = e.to_string();
        match description
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
        {
            Some(field) => DecodeError::MissingField(field.to_owned()),
            None => DecodeError::Json(e),
        }
    })
}

/// Answer to an offer query, listing what the maker currently sells.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub offers: Vec<Offer>,
}

/// First message of both roles: amounts, chain-M keys (including the private
/// view key so the peer can watch the joint account) and the DLEq-bound
/// secp256k1 key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendKeysMessage {
    pub offer_id: String,
    pub provided_amount: Decimal,
    pub pub_spend: String,
    pub pub_view: String,
    pub priv_view: String,
    pub dleq_proof: String,
    pub secp_pub: String,
    pub eth_addr: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotifyContractDeployed {
    pub contract_address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotifyXMRLock {
    pub joint_address: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyReady {}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotifyClaimed {
    pub tx_hash: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotifyRefund {
    pub tx_hash: String,
}
