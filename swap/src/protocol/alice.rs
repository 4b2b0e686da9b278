//! Role A: supplies ETH, deploys the swap contract and ends up with the
//! joint XMR account once the peer's claim reveals its spend half.

use crate::crypto::{self, LocalKeys, Secp256k1PublicKey};
use crate::env;
use crate::ethereum::{self, RevealEvent, SwapContract, Timestamp};
use crate::monero::{self, MoneroWallet, PrivateViewKey};
use crate::net::{
    Message, MessageSender, MessageType, NotifyClaimed, NotifyContractDeployed, NotifyReady,
    NotifyRefund, NotifyXMRLock, SendKeysMessage,
};
use crate::protocol::{race_cancel, Error, Event};
use crate::session::{Session, Status};
use anyhow::anyhow;
use rand::{CryptoRng, RngCore};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct Swap<C, W> {
    inner: Arc<Inner<C, W>>,
}

impl<C, W> Clone for Swap<C, W> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[derive(Debug)]
struct Inner<C, W> {
    contract: Arc<C>,
    monero_wallet: Arc<W>,
    env: env::Config,
    session: Arc<Session>,
    net: MessageSender,
    keys: LocalKeys,
    eth_address: ethereum::Address,
    eth_amount: ethereum::Amount,
    state: Mutex<State>,
    cancel: Event,
    xmr_locked: Event,
    claimed: Event,
}

/// Pure state record; the surrounding reactor only mutates it while holding
/// the session lock.
#[derive(Debug)]
struct State {
    next_expected: MessageType,
    peer_spend_key: Option<monero::PublicKey>,
    peer_view_key: Option<PrivateViewKey>,
    peer_eth_address: Option<ethereum::Address>,
    contract: Option<ethereum::Address>,
    t0: Option<Timestamp>,
    t1: Option<Timestamp>,
}

impl<C, W> Swap<C, W>
where
    C: SwapContract + 'static,
    W: MoneroWallet + 'static,
{
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        session: Arc<Session>,
        net: MessageSender,
        contract: Arc<C>,
        monero_wallet: Arc<W>,
        env: env::Config,
        eth_address: ethereum::Address,
    ) -> anyhow::Result<Self> {
        let eth_amount = ethereum::Amount::from_ether(session.provided_amount())?;

        Ok(Self {
            inner: Arc::new(Inner {
                contract,
                monero_wallet,
                env,
                session,
                net,
                keys: LocalKeys::generate(rng),
                eth_address,
                eth_amount,
                state: Mutex::new(State {
                    next_expected: MessageType::SendKeys,
                    peer_spend_key: None,
                    peer_view_key: None,
                    peer_eth_address: None,
                    contract: None,
                    t0: None,
                    t1: None,
                }),
                cancel: Event::new(),
                xmr_locked: Event::new(),
                claimed: Event::new(),
            }),
        })
    }

    pub fn session(&self) -> Arc<Session> {
        self.inner.session.clone()
    }

    /// Aborts the session: pending chain calls return, timers drop.
    pub fn cancel(&self) {
        self.inner.session.set_status(Status::Aborted);
        self.inner.cancel.set();
    }

    /// The message that opens the protocol from our side.
    pub fn send_keys_message(&self, offer_id: String) -> anyhow::Result<SendKeysMessage> {
        Ok(SendKeysMessage {
            offer_id,
            provided_amount: self.inner.session.provided_amount(),
            pub_spend: monero::public_key_to_hex(&self.inner.keys.public_spend),
            pub_view: monero::public_key_to_hex(&self.inner.keys.view.public().into()),
            priv_view: self.inner.keys.view.to_hex(),
            dleq_proof: crypto::encode_proof(&self.inner.keys.proof)?,
            secp_pub: self.inner.keys.secp.to_hex(),
            eth_addr: ethereum::address_to_hex(&self.inner.eth_address),
        })
    }

    /// Called by the network layer for every inbound message of this
    /// session. Messages are handled strictly in arrival order under the
    /// session lock.
    pub async fn handle_message(&self, msg: Message) -> Result<Option<Message>, Error> {
        let mut state = self.inner.state.lock().await;

        if self.inner.cancel.is_set() || self.inner.session.status().is_terminal() {
            return Err(Error::Cancelled);
        }

        let got = msg.message_type();
        if got != state.next_expected {
            return Err(Error::UnexpectedMessage {
                expected: state.next_expected,
                got,
            });
        }

        let result = match msg {
            Message::SendKeys(msg) => self.handle_send_keys(&mut state, msg).await.map(Some),
            Message::NotifyXMRLock(msg) => self.handle_xmr_lock(&mut state, msg).await.map(Some),
            Message::NotifyClaimed(msg) => self.handle_claimed(&mut state, msg).await.map(|_| None),
            other => Err(Error::UnexpectedMessage {
                expected: state.next_expected,
                got: other.message_type(),
            }),
        };

        if let Err(err) = &result {
            // Before the contract is deployed nothing is at stake, so a
            // fatal error simply ends the session. Afterwards the session
            // stays alive: the refund timer is the recovery path.
            if err.is_fatal() && state.contract.is_none() {
                tracing::error!("Aborting swap: {:#}", err);
                self.inner.session.set_status(Status::Aborted);
                self.inner.cancel.set();
            }
        }

        result
    }

    async fn handle_send_keys(
        &self,
        state: &mut State,
        msg: SendKeysMessage,
    ) -> Result<Message, Error> {
        if state.contract.is_some() {
            return Err(Error::AlreadyDeployed);
        }

        self.inner.session.set_received_amount(msg.provided_amount);
        tracing::info!(amount = %msg.provided_amount, "Peer will lock XMR for this swap");

        if msg.pub_spend.is_empty() || msg.priv_view.is_empty() {
            return Err(Error::MissingKeys);
        }
        if msg.eth_addr.is_empty() {
            return Err(Error::MissingAddress);
        }

        let peer_spend_key = monero::public_key_from_hex(&msg.pub_spend)?;
        let peer_view_key = PrivateViewKey::from_hex(&msg.priv_view)?;
        let peer_eth_address = ethereum::address_from_hex(&msg.eth_addr)?;

        let proof = crypto::decode_proof(&msg.dleq_proof)?;
        let peer_secp = Secp256k1PublicKey::from_hex(&msg.secp_pub)?;
        if !crypto::verify_key_binding(&proof, &peer_secp, &peer_spend_key)
            .map_err(|_| Error::InvalidDleq)?
        {
            return Err(Error::InvalidDleq);
        }

        tracing::debug!(address = %peer_eth_address, "Got peer's keys and claim address");

        let claim_commitment = peer_secp.commitment();
        let refund_commitment = self.inner.keys.secp.commitment();

        let (contract_address, _) = race_cancel(
            &self.inner.cancel,
            self.inner.contract.deploy(
                claim_commitment,
                refund_commitment,
                peer_eth_address,
                self.inner.env.contract_timeout,
                self.inner.eth_amount,
            ),
        )
        .await?;

        tracing::info!(contract = %ethereum::address_to_hex(&contract_address), "Deployed swap contract, waiting for XMR to be locked");

        let (t0, t1) = race_cancel(
            &self.inner.cancel,
            self.inner.contract.timeouts(contract_address),
        )
        .await?;

        state.peer_spend_key = Some(peer_spend_key);
        state.peer_view_key = Some(peer_view_key);
        state.peer_eth_address = Some(peer_eth_address);
        state.contract = Some(contract_address);
        state.t0 = Some(t0);
        state.t1 = Some(t1);

        // If the peer never locks we must refund strictly before t0 closes
        // the window; the buffer leaves room for the transaction to be
        // mined.
        self.spawn_refund_timer(
            t0.saturating_sub(self.inner.env.refund_buffer),
            self.inner.xmr_locked.clone(),
        );

        state.next_expected = MessageType::NotifyXMRLock;

        Ok(Message::NotifyContractDeployed(NotifyContractDeployed {
            contract_address: ethereum::address_to_hex(&contract_address),
        }))
    }

    async fn handle_xmr_lock(
        &self,
        state: &mut State,
        msg: NotifyXMRLock,
    ) -> Result<Message, Error> {
        if msg.joint_address.is_empty() {
            return Err(Error::MissingAddress);
        }

        let peer_spend_key = state
            .peer_spend_key
            .ok_or_else(|| anyhow!("peer keys not recorded"))?;
        let peer_view_key = state
            .peer_view_key
            .ok_or_else(|| anyhow!("peer keys not recorded"))?;
        let contract = state
            .contract
            .ok_or_else(|| anyhow!("contract not recorded"))?;

        let view_joint = peer_view_key + self.inner.keys.view;
        let expected = monero::joint_address(
            &peer_spend_key,
            &self.inner.keys.public_spend,
            view_joint,
            self.inner.env.monero_network,
        )?;
        if msg.joint_address != expected.to_string() {
            return Err(Error::AddressMismatch {
                expected: expected.to_string(),
                got: msg.joint_address,
            });
        }

        let expected_amount = monero::amount_from_decimal(
            self.inner
                .session
                .received_amount()
                .ok_or_else(|| anyhow!("received amount not recorded"))?,
        )?;

        let balance = race_cancel(
            &self.inner.cancel,
            self.inner.monero_wallet.joint_account_balance(
                expected,
                view_joint,
                self.inner.env.monero_finality_confirmations,
            ),
        )
        .await?;

        if balance < expected_amount {
            return Err(Error::InsufficientLock {
                expected: expected_amount.as_pico(),
                got: balance.as_pico(),
            });
        }

        tracing::info!(%balance, "Joint account is funded, setting the contract ready");

        race_cancel(&self.inner.cancel, self.inner.contract.set_ready(contract)).await?;

        // SetReady shifts t1, so read both back.
        let (t0, t1) = race_cancel(&self.inner.cancel, self.inner.contract.timeouts(contract))
            .await?;
        state.t0 = Some(t0);
        state.t1 = Some(t1);

        self.inner.xmr_locked.set();
        self.spawn_refund_timer(
            t1 + self.inner.env.claim_margin,
            self.inner.claimed.clone(),
        );

        state.next_expected = MessageType::NotifyClaimed;

        Ok(Message::NotifyReady(NotifyReady {}))
    }

    async fn handle_claimed(&self, state: &mut State, msg: NotifyClaimed) -> Result<(), Error> {
        let tx_hash = ethereum::tx_hash_from_hex(&msg.tx_hash)?;

        let secret = race_cancel(
            &self.inner.cancel,
            self.inner
                .contract
                .secret_from_tx(tx_hash, RevealEvent::Claimed),
        )
        .await?;

        let peer_view_key = state
            .peer_view_key
            .ok_or_else(|| anyhow!("peer keys not recorded"))?;

        // The revealed scalar is the peer's spend half; adding ours makes
        // the joint account spendable.
        let peer_spend = crypto::spend_key_from_secret(secret);
        let joint_spend = monero::PrivateKey::from_scalar(self.inner.keys.spend + peer_spend.scalar);
        let joint_view: monero::PrivateKey = (peer_view_key + self.inner.keys.view).into();

        let wallet_name = format!("swap-{}", self.inner.session.id());
        let address = race_cancel(
            &self.inner.cancel,
            self.inner
                .monero_wallet
                .create_wallet_from_keys(&wallet_name, joint_spend, joint_view),
        )
        .await?;

        tracing::info!(%address, "Created Monero wallet from the revealed secret");

        self.inner.claimed.set();
        self.inner.session.set_status(Status::Success);

        Ok(())
    }

    /// Arms the single outstanding timer: at `deadline` we refund and tell
    /// the peer, unless `disarm` (or the session) got there first.
    fn spawn_refund_timer(&self, deadline: Timestamp, disarm: Event) {
        let swap = self.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = swap.inner.cancel.wait() => {}
                _ = disarm.wait() => {}
                _ = tokio::time::sleep(deadline.duration_until()) => {
                    swap.refund_and_notify(&disarm).await;
                }
            }
        });
    }

    async fn refund_and_notify(&self, disarm: &Event) {
        // The timer fired concurrently with whatever the reactor was doing;
        // take the lock and re-check before acting.
        let state = self.inner.state.lock().await;

        if disarm.is_set()
            || self.inner.cancel.is_set()
            || self.inner.session.status().is_terminal()
        {
            return;
        }

        let Some(contract) = state.contract else {
            return;
        };

        let refund = race_cancel(
            &self.inner.cancel,
            self.inner
                .contract
                .refund(contract, self.inner.keys.contract_secret()),
        )
        .await;

        match refund {
            Ok(tx_hash) => {
                tracing::info!(tx_hash = %ethereum::tx_hash_to_hex(&tx_hash), "Got our ETH back");
                self.inner.session.set_status(Status::Refunded);

                let notify = Message::NotifyRefund(NotifyRefund {
                    tx_hash: ethereum::tx_hash_to_hex(&tx_hash),
                });
                if let Err(err) = self.inner.net.send(notify).await {
                    tracing::error!("Failed to send refund notification: {:#}", err);
                }
            }
            Err(err) => tracing::error!("Failed to refund: {:#}", err),
        }
    }
}
