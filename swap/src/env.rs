use crate::monero;
use std::time::Duration;

/// Tuning knobs of a swap that depend on the pair of networks we run against.
///
/// The two margins exist because the contract enforces its windows with
/// block timestamps: `refund_buffer` leaves enough headroom for a refund
/// transaction to be mined before t0 closes the window, `claim_margin` must
/// be at least one chain-E block interval so a claim sent right after t0 (or
/// a refund sent right after t1) lands in a block whose timestamp is inside
/// the window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Window length passed to the contract deploy; t0 = deploy + timeout,
    /// t1 = t0 + timeout.
    pub contract_timeout: Duration,
    /// How long before t0 role A gives up waiting for the XMR lock.
    pub refund_buffer: Duration,
    /// Safety margin added after t0/t1 before acting on an elapsed window.
    /// Must be at least `eth_avg_block_time`, otherwise a transaction sent
    /// right at the margin can land in a block timestamped outside the
    /// window.
    pub claim_margin: Duration,
    pub eth_avg_block_time: Duration,
    /// Pause between retries of role B's post-t0 claim.
    pub claim_retry_interval: Duration,
    /// Fresh blocks to wait before trusting the balance of the joint
    /// account. Zero skips the wait entirely (dev setups with instant
    /// confirmation).
    pub monero_finality_confirmations: u64,
    pub monero_avg_block_time: Duration,
    pub monero_network: monero::Network,
}

pub trait GetConfig {
    fn get_config() -> Config;
}

#[derive(Clone, Copy, Debug)]
pub struct Mainnet;

#[derive(Clone, Copy, Debug)]
pub struct Stagenet;

#[derive(Clone, Copy, Debug)]
pub struct Dev;

impl GetConfig for Mainnet {
    fn get_config() -> Config {
        Config {
            contract_timeout: Duration::from_secs(60 * 60),
            refund_buffer: Duration::from_secs(5 * 60),
            claim_margin: Duration::from_secs(15),
            eth_avg_block_time: Duration::from_secs(12),
            claim_retry_interval: Duration::from_secs(30),
            monero_finality_confirmations: 2,
            monero_avg_block_time: Duration::from_secs(2 * 60),
            monero_network: monero::Network::Mainnet,
        }
    }
}

impl GetConfig for Stagenet {
    fn get_config() -> Config {
        Config {
            contract_timeout: Duration::from_secs(30 * 60),
            refund_buffer: Duration::from_secs(5 * 60),
            claim_margin: Duration::from_secs(15),
            eth_avg_block_time: Duration::from_secs(12),
            claim_retry_interval: Duration::from_secs(15),
            monero_finality_confirmations: 2,
            monero_avg_block_time: Duration::from_secs(2 * 60),
            monero_network: monero::Network::Stagenet,
        }
    }
}

impl GetConfig for Dev {
    fn get_config() -> Config {
        Config {
            contract_timeout: Duration::from_secs(60),
            refund_buffer: Duration::from_secs(10),
            claim_margin: Duration::from_secs(1),
            eth_avg_block_time: Duration::from_secs(1),
            claim_retry_interval: Duration::from_secs(1),
            monero_finality_confirmations: 0,
            monero_avg_block_time: Duration::from_secs(1),
            monero_network: monero::Network::Mainnet, // monero-wallet-rpc --regtest uses mainnet addresses
        }
    }
}
