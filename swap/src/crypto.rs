//! Binds the chain-M spend key halves to the secp256k1 commitments the swap
//! contract enforces. The same scalar lives on both curves; the DLEq proof
//! shows that without revealing it.

use crate::monero;
use anyhow::{anyhow, Context, Result};
use conquer_once::Lazy;
use ecdsa_fun::fun::{g, G};
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use sigma_fun::ext::dl_secp256k1_ed25519_eq::{CrossCurveDLEQ, CrossCurveDLEQProof};
use sigma_fun::HashTranscript;
use std::fmt;

pub static CROSS_CURVE_PROOF_SYSTEM: Lazy<
    CrossCurveDLEQ<HashTranscript<Sha256, rand_chacha::ChaCha20Rng>>,
> = Lazy::new(|| {
    CrossCurveDLEQ::<HashTranscript<Sha256, rand_chacha::ChaCha20Rng>>::new(
        (*G).normalize(),
        curve25519_dalek::constants::ED25519_BASEPOINT_POINT,
    )
});

/// A secp256k1 public key, the chain-E side of a cross-curve key pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Secp256k1PublicKey(ecdsa_fun::fun::Point);

impl Secp256k1PublicKey {
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex::decode(hex).context("public key is not valid hex")?;
        let bytes = <[u8; 33]>::try_from(bytes.as_slice())
            .map_err(|_| anyhow!("expected 33 byte compressed secp256k1 public key"))?;
        let point = ecdsa_fun::fun::Point::from_bytes(bytes)
            .ok_or_else(|| anyhow!("bytes are not a secp256k1 curve point"))?;

        Ok(Self(point))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    /// The on-chain commitment to this key: keccak256 over the uncompressed
    /// point, X coordinate followed by Y.
    pub fn commitment(&self) -> Commitment {
        let uncompressed = self.0.to_bytes_uncompressed();
        Commitment(Keccak256::digest(&uncompressed[1..]).into())
    }
}

impl fmt::Display for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// keccak256 of a secp256k1 public key, as stored in the swap contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commitment([u8; 32]);

impl Commitment {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn into_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// The key material one party contributes to a swap: the spend half (which
/// doubles as the contract secret), the view half, and the proof binding the
/// spend half to its secp256k1 counterpart.
#[derive(Clone)]
pub struct LocalKeys {
    pub spend: monero::Scalar,
    pub view: monero::PrivateViewKey,
    pub public_spend: monero::PublicKey,
    pub secp: Secp256k1PublicKey,
    pub proof: CrossCurveDLEQProof,
}

impl LocalKeys {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let spend = monero::Scalar::random(rng);
        let (proof, (secp_point, ed_point)) = CROSS_CURVE_PROOF_SYSTEM.prove(&spend, rng);

        Self {
            spend,
            view: monero::PrivateViewKey::new_random(rng),
            public_spend: monero::PublicKey {
                point: ed_point.compress(),
            },
            secp: Secp256k1PublicKey(secp_point),
            proof,
        }
    }

    /// The secret in the encoding the contract expects.
    pub fn contract_secret(&self) -> [u8; 32] {
        secret_from_spend_scalar(&self.spend)
    }
}

impl fmt::Debug for LocalKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeys")
            .field("public_spend", &self.public_spend)
            .field("secp", &self.secp)
            .finish_non_exhaustive()
    }
}

pub fn encode_proof(proof: &CrossCurveDLEQProof) -> Result<String> {
    let bytes = serde_cbor::to_vec(proof).context("Failed to serialize DLEq proof")?;
    Ok(hex::encode(bytes))
}

pub fn decode_proof(hex: &str) -> Result<CrossCurveDLEQProof> {
    let bytes = hex::decode(hex).context("DLEq proof is not valid hex")?;
    serde_cbor::from_slice(&bytes).context("Failed to deserialize DLEq proof")
}

/// Checks that `proof` shows `secp_pub` and `public_spend_key` to share one
/// discrete logarithm across the two curves.
pub fn verify_key_binding(
    proof: &CrossCurveDLEQProof,
    secp_pub: &Secp256k1PublicKey,
    public_spend_key: &monero::PublicKey,
) -> Result<bool> {
    let ed_point = public_spend_key
        .point
        .decompress()
        .ok_or_else(|| anyhow!("public spend key is not an ed25519 curve point"))?;

    Ok(CROSS_CURVE_PROOF_SYSTEM.verify(proof, (secp_pub.0, ed_point)))
}

/// The byte-order boundary between the curves: the contract reveals secrets
/// as big-endian secp256k1 scalars, chain-M scalars are little-endian.
pub fn spend_key_from_secret(secret: [u8; 32]) -> monero::PrivateKey {
    let mut little_endian = secret;
    little_endian.reverse();

    monero::PrivateKey::from_scalar(monero::Scalar::from_bytes_mod_order(little_endian))
}

pub fn secret_from_spend_scalar(scalar: &monero::Scalar) -> [u8; 32] {
    let mut big_endian = scalar.to_bytes();
    big_endian.reverse();

    big_endian
}

/// Commitment a given contract secret opens, i.e. what `Claim(s)` checks.
pub fn commitment_for_secret(secret: [u8; 32]) -> Result<Commitment> {
    let scalar = ecdsa_fun::fun::Scalar::from_bytes(secret)
        .ok_or_else(|| anyhow!("secret is not a canonical secp256k1 scalar"))?
        .non_zero()
        .ok_or_else(|| anyhow!("secret must not be zero"))?;
    let point = g!(scalar * G).normalize();

    Ok(Secp256k1PublicKey(point).commitment())
}
