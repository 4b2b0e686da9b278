use anyhow::{anyhow, bail, Result};
use rand::{CryptoRng, RngCore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

/// The coin a swap participant puts on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvidesCoin {
    #[serde(rename = "XMR")]
    Xmr,
    #[serde(rename = "ETH")]
    Eth,
}

impl FromStr for ProvidesCoin {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "XMR" => Ok(ProvidesCoin::Xmr),
            "ETH" => Ok(ProvidesCoin::Eth),
            other => bail!("`{}` is not a coin we can provide", other),
        }
    }
}

impl fmt::Display for ProvidesCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvidesCoin::Xmr => write!(f, "XMR"),
            ProvidesCoin::Eth => write!(f, "ETH"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OfferId([u8; 32]);

impl From<OfferId> for String {
    fn from(id: OfferId) -> Self {
        hex::encode(id.0)
    }
}

impl TryFrom<String> for OfferId {
    type Error = anyhow::Error;

    fn try_from(hex: String) -> Result<Self> {
        hex.parse()
    }
}

impl FromStr for OfferId {
    type Err = anyhow::Error;

    fn from_str(hex: &str) -> Result<Self> {
        let bytes = hex::decode(hex)?;
        let bytes =
            <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| anyhow!("offer id must be 32 bytes"))?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OfferId({})", self)
    }
}

/// A standing offer to swap. `exchange_rate` is the price of 1 XMR in ETH.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub provides: ProvidesCoin,
    pub minimum_amount: Decimal,
    pub maximum_amount: Decimal,
    pub exchange_rate: Decimal,
}

impl Offer {
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        provides: ProvidesCoin,
        minimum_amount: Decimal,
        maximum_amount: Decimal,
        exchange_rate: Decimal,
    ) -> Self {
        // A fresh nonce goes into the hash so two otherwise identical offers
        // get distinct ids.
        let mut nonce = [0u8; 16];
        rng.fill_bytes(&mut nonce);

        let mut hasher = Sha3_256::new();
        hasher.update(format!(
            "{}:{}:{}:{}",
            provides, minimum_amount, maximum_amount, exchange_rate
        ));
        hasher.update(nonce);

        Self {
            id: OfferId(hasher.finalize().into()),
            provides,
            minimum_amount,
            maximum_amount,
            exchange_rate,
        }
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Offer id={} provides={} min={} max={} rate={}",
            self.id, self.provides, self.minimum_amount, self.maximum_amount, self.exchange_rate
        )
    }
}

/// The offers this daemon currently advertises.
#[derive(Debug, Default)]
pub struct OfferBook {
    inner: Mutex<HashMap<OfferId, Offer>>,
}

impl OfferBook {
    pub fn insert(&self, offer: Offer) {
        self.inner
            .lock()
            .expect("offer book lock poisoned")
            .insert(offer.id, offer);
    }

    pub fn take(&self, id: &OfferId) -> Option<Offer> {
        self.inner
            .lock()
            .expect("offer book lock poisoned")
            .remove(id)
    }

    pub fn all(&self) -> Vec<Offer> {
        self.inner
            .lock()
            .expect("offer book lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}
