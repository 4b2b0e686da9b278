pub mod contract;

use crate::crypto::Commitment;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::Add;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use ethers::types::{Address, TransactionReceipt, H256, U256};

pub type TxHash = H256;

pub fn address_from_hex(hex: &str) -> Result<Address> {
    hex.parse()
        .map_err(|_| anyhow!("`{}` is not an ethereum address", hex))
}

pub fn address_to_hex(address: &Address) -> String {
    format!("{:#x}", address)
}

pub fn tx_hash_from_hex(hex: &str) -> Result<TxHash> {
    hex.parse()
        .map_err(|_| anyhow!("`{}` is not a transaction hash", hex))
}

pub fn tx_hash_to_hex(tx_hash: &TxHash) -> String {
    format!("{:#x}", tx_hash)
}

const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// An amount of ether, internally in wei.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Amount = Amount(U256::zero());

    pub fn from_ether(ether: Decimal) -> Result<Self> {
        anyhow::ensure!(!ether.is_sign_negative(), "amount must not be negative");

        let wei = ether
            .checked_mul(Decimal::from(WEI_PER_ETHER))
            .context("Amount of ether is too large")?
            .trunc()
            .normalize();
        let wei = U256::from_dec_str(&wei.to_string()).context("Failed to convert to wei")?;

        Ok(Self(wei))
    }

    pub fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    pub fn as_wei(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

/// A contract timestamp, unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock is set after 1970");

        Self(since_epoch.as_secs())
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Wall-clock time left until this timestamp, zero if it has passed.
    pub fn duration_until(&self) -> Duration {
        Duration::from_secs(self.0.saturating_sub(Self::now().0))
    }

    pub fn has_passed(&self) -> bool {
        Self::now().0 >= self.0
    }

    pub fn saturating_sub(&self, duration: Duration) -> Timestamp {
        Self(self.0.saturating_sub(duration.as_secs()))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, duration: Duration) -> Self::Output {
        Self(self.0 + duration.as_secs())
    }
}

impl TryFrom<U256> for Timestamp {
    type Error = anyhow::Error;

    fn try_from(value: U256) -> Result<Self> {
        if value > U256::from(u64::MAX) {
            anyhow::bail!("timestamp does not fit into u64");
        }

        Ok(Self(value.low_u64()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the deployed contract commits to, read back for verification before
/// any funds are locked against it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwapParameters {
    pub claim_commitment: Commitment,
    pub refund_commitment: Commitment,
    pub claimer: Address,
    pub timeout_duration: Duration,
    pub balance: Amount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Claimed,
    Refunded,
}

impl RevealEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RevealEvent::Claimed => "Claimed",
            RevealEvent::Refunded => "Refunded",
        }
    }
}

/// The swap contract as seen by the protocol engines. One implementation
/// talks to a chain-E node; tests plug in an in-memory contract.
#[async_trait]
pub trait SwapContract: Send + Sync {
    /// Deploys a fresh swap contract funded with `value`.
    async fn deploy(
        &self,
        claim_commitment: Commitment,
        refund_commitment: Commitment,
        claimer: Address,
        timeout_duration: Duration,
        value: Amount,
    ) -> Result<(Address, TxHash)>;

    async fn set_ready(&self, contract: Address) -> Result<TxHash>;

    async fn claim(&self, contract: Address, secret: [u8; 32]) -> Result<TxHash>;

    async fn refund(&self, contract: Address, secret: [u8; 32]) -> Result<TxHash>;

    /// (t0, t1). SetReady may shift t1, so these must be re-read after every
    /// state-changing call.
    async fn timeouts(&self, contract: Address) -> Result<(Timestamp, Timestamp)>;

    async fn parameters(&self, contract: Address) -> Result<SwapParameters>;

    /// Extracts the secret a `Claimed`/`Refunded` event revealed, waiting
    /// for the transaction receipt first. The secret is returned in contract
    /// encoding (big-endian secp256k1 scalar).
    async fn secret_from_tx(&self, tx_hash: TxHash, event: RevealEvent) -> Result<[u8; 32]>;
}
