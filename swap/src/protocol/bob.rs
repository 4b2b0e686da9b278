//! Role B: supplies XMR, locks it into the joint account once the deployed
//! contract checks out, and claims the ETH with its spend half — revealing
//! that half to the peer in the process.

use crate::crypto::{self, LocalKeys, Secp256k1PublicKey};
use crate::env;
use crate::ethereum::{self, RevealEvent, SwapContract, Timestamp};
use crate::monero::{self, MoneroWallet, PrivateViewKey};
use crate::net::{
    Message, MessageSender, MessageType, NotifyClaimed, NotifyContractDeployed, NotifyRefund,
    NotifyXMRLock, SendKeysMessage,
};
use crate::protocol::{race_cancel, Error, Event};
use crate::session::{Session, Status};
use anyhow::{anyhow, Context};
use rand::{CryptoRng, RngCore};
use std::path::PathBuf;
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
    /// Our claim address on chain-E.
    eth_address: ethereum::Address,
    /// Where reclaimed XMR goes if the peer refunds.
    refund_address: monero::Address,
    basepath: PathBuf,
    state: Mutex<State>,
    cancel: Event,
    /// Set once the peer declared the contract ready; disarms the claim
    /// timer.
    ready: Event,
}

#[derive(Debug)]
struct State {
    next_expected: MessageType,
    peer_spend_key: Option<monero::PublicKey>,
    peer_view_key: Option<PrivateViewKey>,
    peer_secp: Option<Secp256k1PublicKey>,
    contract: Option<ethereum::Address>,
    joint_address: Option<monero::Address>,
    t0: Option<Timestamp>,
    t1: Option<Timestamp>,
}

impl<C, W> Swap<C, W>
where
    C: SwapContract + 'static,
    W: MoneroWallet + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        session: Arc<Session>,
        net: MessageSender,
        contract: Arc<C>,
        monero_wallet: Arc<W>,
        env: env::Config,
        eth_address: ethereum::Address,
        refund_address: monero::Address,
        basepath: PathBuf,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                contract,
                monero_wallet,
                env,
                session,
                net,
                keys: LocalKeys::generate(rng),
                eth_address,
                refund_address,
                basepath,
                state: Mutex::new(State {
                    next_expected: MessageType::SendKeys,
                    peer_spend_key: None,
                    peer_view_key: None,
                    peer_secp: None,
                    contract: None,
                    joint_address: None,
                    t0: None,
                    t1: None,
                }),
                cancel: Event::new(),
                ready: Event::new(),
            }),
        }
    }

    pub fn session(&self) -> Arc<Session> {
        self.inner.session.clone()
    }

    pub fn cancel(&self) {
        self.inner.session.set_status(Status::Aborted);
        self.inner.cancel.set();
    }

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

    pub async fn handle_message(&self, msg: Message) -> Result<Option<Message>, Error> {
        let mut state = self.inner.state.lock().await;

        if self.inner.cancel.is_set() || self.inner.session.status().is_terminal() {
            return Err(Error::Cancelled);
        }

        // The peer may refund any time before t0 or after t1, so
        // NotifyRefund is accepted in every non-terminal state.
        let got = msg.message_type();
        if got != MessageType::NotifyRefund && got != state.next_expected {
            return Err(Error::UnexpectedMessage {
                expected: state.next_expected,
                got,
            });
        }

        let result = match msg {
            Message::SendKeys(msg) => self.handle_send_keys(&mut state, msg).await.map(|_| None),
            Message::NotifyContractDeployed(msg) => self
                .handle_contract_deployed(&mut state, msg)
                .await
                .map(Some),
            Message::NotifyReady(_) => self.handle_ready(&mut state).await.map(Some),
            Message::NotifyRefund(msg) => self.handle_refund(&mut state, msg).await.map(|_| None),
            other => Err(Error::UnexpectedMessage {
                expected: state.next_expected,
                got: other.message_type(),
            }),
        };

        if let Err(err) = &result {
            // Nothing of ours is locked before the XMR transfer; afterwards
            // the session must stay alive so the peer's refund (or our
            // claim timer) can still settle it.
            if err.is_fatal() && state.joint_address.is_none() {
                tracing::error!("Aborting swap: {:#}", err);
                self.inner.session.set_status(Status::Aborted);
                self.inner.cancel.set();
            }
        }

        result
    }

    async fn handle_send_keys(&self, state: &mut State, msg: SendKeysMessage) -> Result<(), Error> {
        self.inner.session.set_received_amount(msg.provided_amount);

        if msg.pub_spend.is_empty() || msg.pub_view.is_empty() || msg.priv_view.is_empty() {
            return Err(Error::MissingKeys);
        }

        let peer_spend_key = monero::public_key_from_hex(&msg.pub_spend)?;
        let _peer_view_public = monero::public_key_from_hex(&msg.pub_view)?;
        let peer_view_key = PrivateViewKey::from_hex(&msg.priv_view)?;

        let proof = crypto::decode_proof(&msg.dleq_proof)?;
        let peer_secp = Secp256k1PublicKey::from_hex(&msg.secp_pub)?;
        if !crypto::verify_key_binding(&proof, &peer_secp, &peer_spend_key)
            .map_err(|_| Error::InvalidDleq)?
        {
            return Err(Error::InvalidDleq);
        }

        tracing::debug!("Got peer's keys");

        state.peer_spend_key = Some(peer_spend_key);
        state.peer_view_key = Some(peer_view_key);
        state.peer_secp = Some(peer_secp);
        state.next_expected = MessageType::NotifyContractDeployed;

        Ok(())
    }

    async fn handle_contract_deployed(
        &self,
        state: &mut State,
        msg: NotifyContractDeployed,
    ) -> Result<Message, Error> {
        if msg.contract_address.is_empty() {
            return Err(Error::MissingAddress);
        }
        let contract = ethereum::address_from_hex(&msg.contract_address)?;

        tracing::info!(contract = %msg.contract_address, "Got the swap contract address");

        let path = self
            .inner
            .basepath
            .join(self.inner.session.id().to_string())
            .join("contractaddress");
        swap_fs::write_atomic(&path, &format!("{}\n", msg.contract_address))
            .context("Failed to persist contract address")?;

        self.check_contract(state, contract).await?;

        // Only now is it safe to lock: the contract commits to our claim
        // key, our address and the agreed window.
        let peer_spend_key = state
            .peer_spend_key
            .ok_or_else(|| anyhow!("peer keys not recorded"))?;
        let peer_view_key = state
            .peer_view_key
            .ok_or_else(|| anyhow!("peer keys not recorded"))?;

        let view_joint = peer_view_key + self.inner.keys.view;
        let joint_address = monero::joint_address(
            &peer_spend_key,
            &self.inner.keys.public_spend,
            view_joint,
            self.inner.env.monero_network,
        )?;

        let amount = monero::amount_from_decimal(self.inner.session.provided_amount())?;
        let tx = race_cancel(
            &self.inner.cancel,
            self.inner.monero_wallet.transfer(joint_address.clone(), amount),
        )
        .await?;

        tracing::info!(address = %joint_address, tx_hash = %tx, "Locked XMR in the joint account");

        let (t0, t1) = race_cancel(&self.inner.cancel, self.inner.contract.timeouts(contract))
            .await?;

        state.contract = Some(contract);
        state.joint_address = Some(joint_address.clone());
        state.t0 = Some(t0);
        state.t1 = Some(t1);

        // After t0 the contract lets us claim even without SetReady.
        self.spawn_claim_timer(t0 + self.inner.env.claim_margin);

        state.next_expected = MessageType::NotifyReady;

        Ok(Message::NotifyXMRLock(NotifyXMRLock {
            joint_address: joint_address.to_string(),
        }))
    }

    async fn check_contract(
        &self,
        state: &State,
        contract: ethereum::Address,
    ) -> Result<(), Error> {
        let parameters = race_cancel(&self.inner.cancel, self.inner.contract.parameters(contract))
            .await?;

        let peer_secp = state
            .peer_secp
            .ok_or_else(|| anyhow!("peer keys not recorded"))?;

        if parameters.claim_commitment != self.inner.keys.secp.commitment() {
            return Err(Error::ContractMismatch(
                "claim commitment is not our secp256k1 key",
            ));
        }
        if parameters.refund_commitment != peer_secp.commitment() {
            return Err(Error::ContractMismatch(
                "refund commitment is not the peer's secp256k1 key",
            ));
        }
        if parameters.claimer != self.inner.eth_address {
            return Err(Error::ContractMismatch("claimer is not our address"));
        }
        if parameters.timeout_duration != self.inner.env.contract_timeout {
            return Err(Error::ContractMismatch(
                "timeout duration is not the agreed window",
            ));
        }

        let expected_balance = ethereum::Amount::from_ether(
            self.inner
                .session
                .received_amount()
                .ok_or_else(|| anyhow!("received amount not recorded"))?,
        )?;
        if parameters.balance < expected_balance {
            return Err(Error::ContractMismatch(
                "contract does not hold the agreed ether",
            ));
        }

        Ok(())
    }

    async fn handle_ready(&self, state: &mut State) -> Result<Message, Error> {
        tracing::debug!("Contract is ready, claiming our ETH");

        self.inner.ready.set();

        let contract = state
            .contract
            .ok_or_else(|| anyhow!("contract not recorded"))?;

        let tx_hash = race_cancel(
            &self.inner.cancel,
            self.inner
                .contract
                .claim(contract, self.inner.keys.contract_secret()),
        )
        .await?;

        tracing::info!(tx_hash = %ethereum::tx_hash_to_hex(&tx_hash), "Claimed our ETH");
        self.inner.session.set_status(Status::Success);

        Ok(Message::NotifyClaimed(NotifyClaimed {
            tx_hash: ethereum::tx_hash_to_hex(&tx_hash),
        }))
    }

    /// The peer refunded; its secret is on chain, which hands us the joint
    /// account: sum of the revealed spend half and ours.
    async fn handle_refund(&self, state: &mut State, msg: NotifyRefund) -> Result<(), Error> {
        let tx_hash = ethereum::tx_hash_from_hex(&msg.tx_hash)?;

        let secret = race_cancel(
            &self.inner.cancel,
            self.inner
                .contract
                .secret_from_tx(tx_hash, RevealEvent::Refunded),
        )
        .await?;

        let peer_view_key = state
            .peer_view_key
            .ok_or_else(|| anyhow!("peer keys not recorded"))?;

        let peer_spend = crypto::spend_key_from_secret(secret);
        let joint_spend = monero::PrivateKey::from_scalar(peer_spend.scalar + self.inner.keys.spend);
        let joint_view: monero::PrivateKey = (peer_view_key + self.inner.keys.view).into();

        // We may not have locked anything yet; creating the wallet is then a
        // no-op money-wise but keeps the flow uniform.
        let wallet_name = format!("swap-{}-reclaim", self.inner.session.id());
        let address = race_cancel(
            &self.inner.cancel,
            self.inner
                .monero_wallet
                .create_wallet_from_keys(&wallet_name, joint_spend, joint_view),
        )
        .await?;

        if state.joint_address.is_some() {
            let tx_hashes = race_cancel(
                &self.inner.cancel,
                self.inner
                    .monero_wallet
                    .sweep_all(self.inner.refund_address.clone()),
            )
            .await?;

            for tx_hash in &tx_hashes {
                tracing::info!(%tx_hash, "Swept reclaimed XMR back to our wallet");
            }
        }

        tracing::info!(%address, "Regained control over the joint account");

        // The claim timer must not fire once the swap is settled.
        self.inner.ready.set();
        self.inner.session.set_status(Status::Refunded);

        Ok(())
    }

    /// Arms the single outstanding timer: if the peer never calls SetReady
    /// we claim directly once t0 has passed.
    fn spawn_claim_timer(&self, deadline: Timestamp) {
        let swap = self.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = swap.inner.cancel.wait() => {}
                _ = swap.inner.ready.wait() => {}
                _ = tokio::time::sleep(deadline.duration_until()) => {
                    swap.claim_and_notify().await;
                }
            }
        });
    }

    async fn claim_and_notify(&self) {
        let state = self.inner.state.lock().await;

        if self.inner.ready.is_set()
            || self.inner.cancel.is_set()
            || self.inner.session.status().is_terminal()
        {
            return;
        }

        let Some(contract) = state.contract else {
            return;
        };
        // Claiming reverts once t1 has passed; leave ourselves a margin and
        // let the peer's refund path take over beyond it.
        let retry_until = match state.t1 {
            Some(t1) => t1.saturating_sub(self.inner.env.claim_margin),
            None => return,
        };
        let secret = self.inner.keys.contract_secret();

        loop {
            match race_cancel(&self.inner.cancel, self.inner.contract.claim(contract, secret))
                .await
            {
                Ok(tx_hash) => {
                    tracing::info!(tx_hash = %ethereum::tx_hash_to_hex(&tx_hash), "Claimed our ETH after t0");
                    self.inner.session.set_status(Status::Success);

                    let notify = Message::NotifyClaimed(NotifyClaimed {
                        tx_hash: ethereum::tx_hash_to_hex(&tx_hash),
                    });
                    if let Err(err) = self.inner.net.send(notify).await {
                        tracing::error!("Failed to send claim notification: {:#}", err);
                    }
                    return;
                }
                Err(Error::Cancelled) => return,
                Err(err) => {
                    if (Timestamp::now() + self.inner.env.claim_retry_interval) >= retry_until {
                        tracing::error!("Giving up on claiming before t1: {:#}", err);
                        return;
                    }

                    tracing::warn!("Claim failed, retrying: {:#}", err);
                    tokio::time::sleep(self.inner.env.claim_retry_interval).await;
                }
            }
        }
    }
}
