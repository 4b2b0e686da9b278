#![allow(dead_code)]

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use rand::rngs::OsRng;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use swap::crypto::{self, Commitment, LocalKeys};
use swap::env;
use swap::ethereum::{
    Address, Amount as EthAmount, RevealEvent, SwapContract, SwapParameters, Timestamp, TxHash,
};
use swap::monero::{
    self, Amount as XmrAmount, MoneroWallet, PrivateKey, PrivateViewKey, PublicKey,
};
use swap::net::{Message, MessageSender, OutboundMessage, SendKeysMessage};
use swap::protocol::{alice, bob};
use swap::session::{Manager, Role};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn alice_eth_address() -> Address {
    Address::from_low_u64_be(0xaa)
}

pub fn bob_eth_address() -> Address {
    Address::from_low_u64_be(0xbb)
}

pub fn test_env(
    contract_timeout: Duration,
    refund_buffer: Duration,
    claim_margin: Duration,
) -> env::Config {
    env::Config {
        contract_timeout,
        refund_buffer,
        claim_margin,
        // The in-memory chain settles instantly, so the margin is exactly
        // one "block".
        eth_avg_block_time: claim_margin,
        claim_retry_interval: Duration::from_millis(100),
        monero_finality_confirmations: 0,
        monero_avg_block_time: Duration::from_millis(100),
        monero_network: monero::Network::Mainnet,
    }
}

/// In-memory stand-in for the swap contract on chain-E, enforcing the same
/// commitment and window rules as the deployed one.
#[derive(Debug)]
pub struct FakeContract {
    timeout_duration: Duration,
    inner: Mutex<ChainState>,
}

#[derive(Debug, Default)]
struct ChainState {
    next_address: u64,
    next_tx: u64,
    contracts: HashMap<Address, Deployed>,
    receipts: HashMap<TxHash, (RevealEvent, [u8; 32])>,
}

#[derive(Debug, Clone, Copy)]
struct Deployed {
    claim_commitment: Commitment,
    refund_commitment: Commitment,
    claimer: Address,
    value: EthAmount,
    t0: Timestamp,
    t1: Timestamp,
    ready: bool,
    claimed: bool,
    refunded: bool,
}

impl FakeContract {
    pub fn new(timeout_duration: Duration) -> Arc<Self> {
        Arc::new(Self {
            timeout_duration,
            inner: Mutex::new(ChainState::default()),
        })
    }

    /// Puts a contract on the fake chain without going through the driver
    /// trait, for tests that play role A by hand.
    pub fn deploy_raw(
        &self,
        claim_commitment: Commitment,
        refund_commitment: Commitment,
        claimer: Address,
        value: EthAmount,
    ) -> Address {
        let mut chain = self.inner.lock().unwrap();
        let t0 = Timestamp::now() + self.timeout_duration;

        chain.next_address += 1;
        let address = Address::from_low_u64_be(chain.next_address);
        chain.contracts.insert(
            address,
            Deployed {
                claim_commitment,
                refund_commitment,
                claimer,
                value,
                t0,
                t1: t0 + self.timeout_duration,
                ready: false,
                claimed: false,
                refunded: false,
            },
        );

        address
    }

    pub fn is_claimed(&self, contract: Address) -> bool {
        self.inner.lock().unwrap().contracts[&contract].claimed
    }

    pub fn is_refunded(&self, contract: Address) -> bool {
        self.inner.lock().unwrap().contracts[&contract].refunded
    }

    pub fn deployed_contracts(&self) -> usize {
        self.inner.lock().unwrap().contracts.len()
    }

    fn record_tx(chain: &mut ChainState, event: RevealEvent, secret: [u8; 32]) -> TxHash {
        chain.next_tx += 1;
        let tx_hash = TxHash::from_low_u64_be(chain.next_tx);
        chain.receipts.insert(tx_hash, (event, secret));
        tx_hash
    }
}

#[async_trait]
impl SwapContract for FakeContract {
    async fn deploy(
        &self,
        claim_commitment: Commitment,
        refund_commitment: Commitment,
        claimer: Address,
        timeout_duration: Duration,
        value: EthAmount,
    ) -> Result<(Address, TxHash)> {
        if timeout_duration != self.timeout_duration {
            bail!("unexpected timeout duration");
        }

        let address = self.deploy_raw(claim_commitment, refund_commitment, claimer, value);
        let tx_hash = {
            let mut chain = self.inner.lock().unwrap();
            chain.next_tx += 1;
            TxHash::from_low_u64_be(chain.next_tx)
        };

        Ok((address, tx_hash))
    }

    async fn set_ready(&self, contract: Address) -> Result<TxHash> {
        let mut chain = self.inner.lock().unwrap();
        let deployed = chain
            .contracts
            .get_mut(&contract)
            .context("no such contract")?;

        if deployed.claimed || deployed.refunded {
            bail!("contract already settled");
        }
        deployed.ready = true;

        chain.next_tx += 1;
        Ok(TxHash::from_low_u64_be(chain.next_tx))
    }

    async fn claim(&self, contract: Address, secret: [u8; 32]) -> Result<TxHash> {
        let mut chain = self.inner.lock().unwrap();
        let deployed = *chain.contracts.get(&contract).context("no such contract")?;

        if deployed.claimed || deployed.refunded {
            bail!("contract already settled");
        }
        if crypto::commitment_for_secret(secret)? != deployed.claim_commitment {
            bail!("secret does not open the claim commitment");
        }
        if !deployed.ready && !deployed.t0.has_passed() {
            bail!("claim before t0 on a contract that is not ready");
        }
        if deployed.t1.has_passed() {
            bail!("claim after t1");
        }

        chain
            .contracts
            .get_mut(&contract)
            .expect("checked above")
            .claimed = true;

        Ok(Self::record_tx(&mut chain, RevealEvent::Claimed, secret))
    }

    async fn refund(&self, contract: Address, secret: [u8; 32]) -> Result<TxHash> {
        let mut chain = self.inner.lock().unwrap();
        let deployed = *chain.contracts.get(&contract).context("no such contract")?;

        if deployed.claimed || deployed.refunded {
            bail!("contract already settled");
        }
        if crypto::commitment_for_secret(secret)? != deployed.refund_commitment {
            bail!("secret does not open the refund commitment");
        }

        let before_t0 = !deployed.ready && !deployed.t0.has_passed();
        let after_t1 = deployed.t1.has_passed();
        if !before_t0 && !after_t1 {
            bail!("refund inside the claim window");
        }

        chain
            .contracts
            .get_mut(&contract)
            .expect("checked above")
            .refunded = true;

        Ok(Self::record_tx(&mut chain, RevealEvent::Refunded, secret))
    }

    async fn timeouts(&self, contract: Address) -> Result<(Timestamp, Timestamp)> {
        let chain = self.inner.lock().unwrap();
        let deployed = chain.contracts.get(&contract).context("no such contract")?;

        Ok((deployed.t0, deployed.t1))
    }

    async fn parameters(&self, contract: Address) -> Result<SwapParameters> {
        let chain = self.inner.lock().unwrap();
        let deployed = chain.contracts.get(&contract).context("no such contract")?;

        Ok(SwapParameters {
            claim_commitment: deployed.claim_commitment,
            refund_commitment: deployed.refund_commitment,
            claimer: deployed.claimer,
            timeout_duration: self.timeout_duration,
            balance: deployed.value,
        })
    }

    async fn secret_from_tx(&self, tx_hash: TxHash, event: RevealEvent) -> Result<[u8; 32]> {
        let chain = self.inner.lock().unwrap();
        let (recorded_event, secret) = chain
            .receipts
            .get(&tx_hash)
            .context("no receipt for transaction")?;

        if *recorded_event != event {
            bail!("transaction did not emit a {} event", event.name());
        }

        Ok(*secret)
    }
}

/// In-memory stand-in for the monero wallet RPC: plain piconero bookkeeping
/// per address.
#[derive(Debug)]
pub struct FakeMoneroWallet {
    network: monero::Network,
    inner: Mutex<WalletState>,
}

#[derive(Debug, Default)]
struct WalletState {
    balances: HashMap<String, u64>,
    created_wallets: Vec<CreatedWallet>,
    open_wallet: Option<String>,
    next_tx: u64,
}

#[derive(Debug, Clone)]
pub struct CreatedWallet {
    pub name: String,
    pub spend_key: PrivateKey,
    pub view_key: PrivateKey,
    pub address: monero::Address,
}

impl FakeMoneroWallet {
    pub fn new(network: monero::Network) -> Arc<Self> {
        Arc::new(Self {
            network,
            inner: Mutex::new(WalletState::default()),
        })
    }

    /// Seeds a balance directly, bypassing `transfer`.
    pub fn seed_balance(&self, address: &monero::Address, amount: XmrAmount) {
        self.inner
            .lock()
            .unwrap()
            .balances
            .insert(address.to_string(), amount.as_pico());
    }

    pub fn balance(&self, address: &monero::Address) -> u64 {
        self.inner
            .lock()
            .unwrap()
            .balances
            .get(&address.to_string())
            .copied()
            .unwrap_or(0)
    }

    pub fn created_wallets(&self) -> Vec<CreatedWallet> {
        self.inner.lock().unwrap().created_wallets.clone()
    }
}

#[async_trait]
impl MoneroWallet for FakeMoneroWallet {
    async fn joint_account_balance(
        &self,
        address: monero::Address,
        _view_key: PrivateViewKey,
        _wait_blocks: u64,
    ) -> Result<XmrAmount> {
        Ok(XmrAmount::from_pico(self.balance(&address)))
    }

    async fn transfer(&self, to: monero::Address, amount: XmrAmount) -> Result<monero::TxHash> {
        let mut wallet = self.inner.lock().unwrap();
        *wallet.balances.entry(to.to_string()).or_insert(0) += amount.as_pico();

        wallet.next_tx += 1;
        Ok(monero::TxHash(format!("xmr-tx-{}", wallet.next_tx)))
    }

    async fn create_wallet_from_keys(
        &self,
        wallet_name: &str,
        spend_key: PrivateKey,
        view_key: PrivateKey,
    ) -> Result<monero::Address> {
        let address = monero::Address::standard(
            self.network,
            PublicKey::from_private_key(&spend_key),
            PublicKey::from_private_key(&view_key),
        );

        let mut wallet = self.inner.lock().unwrap();
        wallet.created_wallets.push(CreatedWallet {
            name: wallet_name.to_owned(),
            spend_key,
            view_key,
            address,
        });
        wallet.open_wallet = Some(address.to_string());

        Ok(address)
    }

    async fn sweep_all(&self, to: monero::Address) -> Result<Vec<monero::TxHash>> {
        let mut wallet = self.inner.lock().unwrap();
        let open = wallet
            .open_wallet
            .clone()
            .ok_or_else(|| anyhow!("no wallet open"))?;

        let amount = wallet.balances.remove(&open).unwrap_or(0);
        *wallet.balances.entry(to.to_string()).or_insert(0) += amount;

        wallet.next_tx += 1;
        Ok(vec![monero::TxHash(format!("xmr-sweep-{}", wallet.next_tx))])
    }
}

pub struct AliceHarness {
    pub swap: alice::Swap<FakeContract, FakeMoneroWallet>,
    pub outbound: tokio::sync::mpsc::Receiver<OutboundMessage>,
    pub manager: Manager,
}

pub fn start_alice(
    env: env::Config,
    contract: Arc<FakeContract>,
    wallet: Arc<FakeMoneroWallet>,
    provided_eth: Decimal,
) -> AliceHarness {
    let manager = Manager::default();
    let session = manager.new_session(Role::Alice, "/memory/bob".to_string(), provided_eth);
    let (tx, outbound) = tokio::sync::mpsc::channel(16);
    let sender = MessageSender::new(session.id(), "/memory/bob".to_string(), tx);

    let swap = alice::Swap::new(
        &mut OsRng,
        session,
        sender,
        contract,
        wallet,
        env,
        alice_eth_address(),
    )
    .unwrap();

    AliceHarness {
        swap,
        outbound,
        manager,
    }
}

pub struct BobHarness {
    pub swap: bob::Swap<FakeContract, FakeMoneroWallet>,
    pub outbound: tokio::sync::mpsc::Receiver<OutboundMessage>,
    pub manager: Manager,
    pub refund_address: monero::Address,
    pub basepath: PathBuf,
}

pub fn start_bob(
    env: env::Config,
    contract: Arc<FakeContract>,
    wallet: Arc<FakeMoneroWallet>,
    provided_xmr: Decimal,
    basepath: PathBuf,
) -> BobHarness {
    let manager = Manager::default();
    let session = manager.new_session(Role::Bob, "/memory/alice".to_string(), provided_xmr);
    let (tx, outbound) = tokio::sync::mpsc::channel(16);
    let sender = MessageSender::new(session.id(), "/memory/alice".to_string(), tx);

    let refund_address = {
        let keys = LocalKeys::generate(&mut OsRng);
        monero::Address::standard(
            env.monero_network,
            PublicKey::from_private_key(&PrivateKey::from_scalar(keys.spend)),
            keys.view.public().into(),
        )
    };

    let swap = bob::Swap::new(
        &mut OsRng,
        session,
        sender,
        contract,
        wallet,
        env,
        bob_eth_address(),
        refund_address.clone(),
        basepath.clone(),
    );

    BobHarness {
        swap,
        outbound,
        manager,
        refund_address,
        basepath,
    }
}

/// Builds the opening message a peer with `keys` would send.
pub fn send_keys_message(
    keys: &LocalKeys,
    provided_amount: Decimal,
    eth_address: Address,
) -> SendKeysMessage {
    SendKeysMessage {
        offer_id: String::new(),
        provided_amount,
        pub_spend: monero::public_key_to_hex(&keys.public_spend),
        pub_view: monero::public_key_to_hex(&keys.view.public().into()),
        priv_view: keys.view.to_hex(),
        dleq_proof: crypto::encode_proof(&keys.proof).unwrap(),
        secp_pub: keys.secp.to_hex(),
        eth_addr: format!("{:#x}", eth_address),
    }
}

/// Joint account both parties derive for the given spend halves and view
/// keys.
pub fn joint_address(
    spend_a: &PublicKey,
    spend_b: &PublicKey,
    view_a: PrivateViewKey,
    view_b: PrivateViewKey,
    network: monero::Network,
) -> monero::Address {
    monero::joint_address(spend_a, spend_b, view_a + view_b, network).unwrap()
}

/// Waits for the next outbound message of a session, failing the test if
/// none arrives in time.
pub async fn expect_message(
    rx: &mut tokio::sync::mpsc::Receiver<OutboundMessage>,
    within: Duration,
) -> Message {
    tokio::time::timeout(within, rx.recv())
        .await
        .expect("timed out waiting for outbound message")
        .expect("outbound channel closed")
        .message
}
