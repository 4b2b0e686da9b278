//! The operations the JSON-RPC layer calls into. The façade creates and
//! registers sessions and hands inbound messages to the right engine; it
//! never drives a state machine beyond that.

use crate::env;
use crate::ethereum::{self, SwapContract};
use crate::monero::{self, MoneroWallet};
use crate::net::{Message, MessageSender, OutboundMessage, SendKeysMessage};
use crate::offer::{Offer, OfferBook, OfferId, ProvidesCoin};
use crate::protocol::{alice, bob, Error};
use crate::session::{Manager, Role, SessionId, SwapInfo};
use anyhow::{bail, Context, Result};
use rand::rngs::OsRng;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum RoleSwap<C, W> {
    Alice(alice::Swap<C, W>),
    Bob(bob::Swap<C, W>),
}

impl<C, W> Clone for RoleSwap<C, W> {
    fn clone(&self) -> Self {
        match self {
            RoleSwap::Alice(swap) => RoleSwap::Alice(swap.clone()),
            RoleSwap::Bob(swap) => RoleSwap::Bob(swap.clone()),
        }
    }
}

#[derive(Debug)]
pub struct Facade<C, W> {
    env: env::Config,
    basepath: PathBuf,
    eth_address: ethereum::Address,
    monero_refund_address: monero::Address,
    contract: Arc<C>,
    monero_wallet: Arc<W>,
    outbound: mpsc::Sender<OutboundMessage>,
    offers: OfferBook,
    manager: Manager,
    sessions: Mutex<HashMap<SessionId, RoleSwap<C, W>>>,
}

impl<C, W> Facade<C, W>
where
    C: SwapContract + 'static,
    W: MoneroWallet + 'static,
{
    pub fn new(
        env: env::Config,
        basepath: PathBuf,
        eth_address: ethereum::Address,
        monero_refund_address: monero::Address,
        contract: Arc<C>,
        monero_wallet: Arc<W>,
        outbound: mpsc::Sender<OutboundMessage>,
    ) -> Self {
        Self {
            env,
            basepath,
            eth_address,
            monero_refund_address,
            contract,
            monero_wallet,
            outbound,
            offers: OfferBook::default(),
            manager: Manager::default(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Advertises a new offer to sell XMR and returns it.
    pub fn make_offer(
        &self,
        minimum_amount: Decimal,
        maximum_amount: Decimal,
        exchange_rate: Decimal,
    ) -> Result<Offer> {
        if minimum_amount <= Decimal::ZERO || maximum_amount < minimum_amount {
            bail!("offer amounts must be positive and min <= max");
        }
        if exchange_rate <= Decimal::ZERO {
            bail!("exchange rate must be positive");
        }

        let offer = Offer::new(
            &mut OsRng,
            ProvidesCoin::Xmr,
            minimum_amount,
            maximum_amount,
            exchange_rate,
        );
        tracing::info!(%offer, "Made new offer");
        self.offers.insert(offer.clone());

        Ok(offer)
    }

    /// What we currently advertise; the network layer answers queries with
    /// this.
    pub fn offers(&self) -> Vec<Offer> {
        self.offers.all()
    }

    /// Takes a maker's offer by providing ETH against it. Starts a role A
    /// session and sends our keys.
    pub async fn take_offer(
        &self,
        peer: String,
        offer_id: OfferId,
        provides_amount: Decimal,
    ) -> Result<SessionId> {
        if provides_amount <= Decimal::ZERO {
            bail!("provided amount must be positive");
        }

        self.start_session(peer, ProvidesCoin::Eth, provides_amount, offer_id.to_string())
            .await
    }

    /// Starts a swap with a peer directly, without an offer. The role
    /// follows from the coin we provide.
    pub async fn initiate(
        &self,
        peer: String,
        provides: ProvidesCoin,
        provides_amount: Decimal,
    ) -> Result<SessionId> {
        if provides_amount <= Decimal::ZERO {
            bail!("provided amount must be positive");
        }

        self.start_session(peer, provides, provides_amount, String::new())
            .await
    }

    async fn start_session(
        &self,
        peer: String,
        provides: ProvidesCoin,
        provides_amount: Decimal,
        offer_id: String,
    ) -> Result<SessionId> {
        let role = match provides {
            ProvidesCoin::Eth => Role::Alice,
            ProvidesCoin::Xmr => Role::Bob,
        };

        let session = self.manager.new_session(role, peer.clone(), provides_amount);
        let id = session.id();
        let sender = MessageSender::new(id, peer, self.outbound.clone());

        let (swap, keys_message): (RoleSwap<C, W>, SendKeysMessage) = match role {
            Role::Alice => {
                let swap = alice::Swap::new(
                    &mut OsRng,
                    session,
                    sender.clone(),
                    self.contract.clone(),
                    self.monero_wallet.clone(),
                    self.env,
                    self.eth_address,
                )?;
                let message = swap.send_keys_message(offer_id)?;
                (RoleSwap::Alice(swap), message)
            }
            Role::Bob => {
                let swap = bob::Swap::new(
                    &mut OsRng,
                    session,
                    sender.clone(),
                    self.contract.clone(),
                    self.monero_wallet.clone(),
                    self.env,
                    self.eth_address,
                    self.monero_refund_address,
                    self.basepath.clone(),
                );
                let message = swap.send_keys_message(offer_id)?;
                (RoleSwap::Bob(swap), message)
            }
        };

        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .insert(id, swap);

        sender
            .send(Message::SendKeys(keys_message))
            .await
            .context("Failed to send our keys to the peer")?;

        tracing::info!(id, %role, "Started swap session");

        Ok(id)
    }

    /// Inbound dispatch: the network layer calls this for every framed
    /// message it decoded for `id`.
    pub async fn handle_protocol_message(
        &self,
        id: SessionId,
        message: Message,
    ) -> Result<Option<Message>, Error> {
        let swap = self
            .sessions
            .lock()
            .expect("session map lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::Other(anyhow::anyhow!("no session with id {}", id)))?;

        match swap {
            RoleSwap::Alice(swap) => swap.handle_message(message).await,
            RoleSwap::Bob(swap) => swap.handle_message(message).await,
        }
    }

    /// Aborts a session; its timers drop and pending chain calls return.
    pub fn cancel(&self, id: SessionId) -> Result<()> {
        let swap = self
            .sessions
            .lock()
            .expect("session map lock poisoned")
            .get(&id)
            .cloned()
            .context("no such session")?;

        match swap {
            RoleSwap::Alice(swap) => swap.cancel(),
            RoleSwap::Bob(swap) => swap.cancel(),
        }

        Ok(())
    }

    pub fn ongoing(&self) -> Vec<SwapInfo> {
        self.manager.ongoing()
    }

    pub fn past_ids(&self) -> Vec<SessionId> {
        self.manager.past_ids()
    }

    pub fn past(&self, id: SessionId) -> Option<SwapInfo> {
        self.manager.past(id)
    }
}
