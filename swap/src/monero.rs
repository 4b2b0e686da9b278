pub mod wallet;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::{CryptoRng, RngCore};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::Add;

pub use curve25519_dalek::scalar::Scalar;
pub use monero::{Address, Amount, Network, PrivateKey, PublicKey};

pub fn public_key_from_hex(hex: &str) -> Result<PublicKey> {
    let bytes = hex::decode(hex).context("public key is not valid hex")?;
    PublicKey::from_slice(&bytes).context("bytes are not an ed25519 public key")
}

pub fn public_key_to_hex(key: &PublicKey) -> String {
    hex::encode(key.as_bytes())
}

/// Adds the two spend key halves; the result is the public spend key of the
/// joint account which neither party alone controls.
pub fn sum_public_keys(a: &PublicKey, b: &PublicKey) -> Result<PublicKey> {
    let a = a
        .point
        .decompress()
        .ok_or_else(|| anyhow!("public key is not an ed25519 curve point"))?;
    let b = b
        .point
        .decompress()
        .ok_or_else(|| anyhow!("public key is not an ed25519 curve point"))?;

    Ok(PublicKey {
        point: (a + b).compress(),
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PrivateViewKey(PrivateKey);

impl PrivateViewKey {
    pub fn new_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(PrivateKey::from_scalar(Scalar::random(rng)))
    }

    pub fn public(&self) -> PublicViewKey {
        PublicViewKey(PublicKey::from_private_key(&self.0))
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex::decode(hex).context("view key is not valid hex")?;
        let key = PrivateKey::from_slice(&bytes).context("bytes are not an ed25519 scalar")?;

        Ok(Self(key))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }
}

impl Add for PrivateViewKey {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(PrivateKey::from_scalar(self.0.scalar + rhs.0.scalar))
    }
}

impl From<PrivateViewKey> for PrivateKey {
    fn from(from: PrivateViewKey) -> Self {
        from.0
    }
}

impl fmt::Debug for PrivateViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateViewKey").finish()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PublicViewKey(PublicKey);

impl From<PublicViewKey> for PublicKey {
    fn from(from: PublicViewKey) -> Self {
        from.0
    }
}

/// Standard address of the account spendable only with both spend halves.
pub fn joint_address(
    spend_a: &PublicKey,
    spend_b: &PublicKey,
    view_joint: PrivateViewKey,
    network: Network,
) -> Result<Address> {
    let spend = sum_public_keys(spend_a, spend_b)?;

    Ok(Address::standard(network, spend, view_joint.public().into()))
}

/// Converts a display-unit XMR amount into piconero.
pub fn amount_from_decimal(xmr: Decimal) -> Result<Amount> {
    let piconero = xmr
        .checked_mul(Decimal::from(Amount::ONE_XMR.as_pico()))
        .context("Amount of XMR is too large")?
        .to_u64()
        .context("Failed to fit piconero amount into a u64")?;

    Ok(Amount::from_pico(piconero))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The slice of `monero-wallet-rpc` a swap needs. The wallet RPC is a
/// process-wide singleton; implementations serialize access internally and
/// close any wallet they opened before returning.
#[async_trait]
pub trait MoneroWallet: Send + Sync {
    /// Opens a view-only wallet on the joint account, waits for `wait_blocks`
    /// fresh blocks so the lock transaction becomes visible, and returns the
    /// confirmed balance. The view-only wallet is closed again on every path
    /// out of this call.
    async fn joint_account_balance(
        &self,
        address: Address,
        view_key: PrivateViewKey,
        wait_blocks: u64,
    ) -> Result<Amount>;

    async fn transfer(&self, to: Address, amount: Amount) -> Result<TxHash>;

    /// Restores (and leaves open) a spendable wallet from the joint keys.
    async fn create_wallet_from_keys(
        &self,
        wallet_name: &str,
        spend_key: PrivateKey,
        view_key: PrivateKey,
    ) -> Result<Address>;

    /// Sweeps everything in the currently open wallet to `to`.
    async fn sweep_all(&self, to: Address) -> Result<Vec<TxHash>>;
}
