use super::{Address, Amount, MoneroWallet, Network, PrivateKey, PrivateViewKey, PublicKey, TxHash};
use anyhow::{Context, Result};
use async_trait::async_trait;
use monero_rpc::wallet::MoneroWalletRpc;
use std::time::Duration;
use tokio::sync::Mutex;

/// The one `monero-wallet-rpc` process the daemon drives. All sessions share
/// it, so calls are serialized through the inner lock and every wallet we
/// open is closed before the lock is released.
#[derive(Debug)]
pub struct Wallet {
    inner: Mutex<monero_rpc::wallet::Client>,
    network: Network,
    sync_interval: Duration,
}

impl Wallet {
    pub fn new(client: monero_rpc::wallet::Client, network: Network, sync_interval: Duration) -> Self {
        Self {
            inner: Mutex::new(client),
            network,
            sync_interval,
        }
    }

    pub fn localhost(port: u16, network: Network, sync_interval: Duration) -> Self {
        Self::new(monero_rpc::wallet::Client::localhost(port), network, sync_interval)
    }

    async fn confirmed_balance(
        &self,
        client: &monero_rpc::wallet::Client,
        address: &Address,
        wait_blocks: u64,
    ) -> Result<Amount> {
        if wait_blocks > 0 {
            let start = u64::from(client.get_height().await?.height);
            loop {
                client.refresh().await?;
                let height = u64::from(client.get_height().await?.height);
                if height >= start + wait_blocks {
                    break;
                }
                tokio::time::sleep(self.sync_interval).await;
            }
        }

        client.refresh().await?;

        let accounts = client.get_accounts(String::new()).await?;
        let account = accounts
            .subaddress_accounts
            .iter()
            .find(|account| account.base_address == address.to_string())
            .with_context(|| format!("No wallet account with address {}", address))?;

        let balance = client.get_balance(account.account_index).await?;

        Ok(Amount::from_pico(balance.balance))
    }
}

#[async_trait]
impl MoneroWallet for Wallet {
    async fn joint_account_balance(
        &self,
        address: Address,
        view_key: PrivateViewKey,
        wait_blocks: u64,
    ) -> Result<Amount> {
        let client = self.inner.lock().await;

        let wallet_name = format!("joint-view-{}", address);
        tracing::debug!(wallet = %wallet_name, "Generating view-only wallet to check the locked funds");

        client
            .generate_view_only_wallet(
                wallet_name,
                address.to_string(),
                view_key.to_hex(),
                0,
                String::new(),
            )
            .await
            .context("Failed to generate view-only wallet")?;

        // From here on the wallet is open; every path out of this call must
        // close it again before the singleton is handed back, or the RPC
        // daemon is wedged for all later swaps.
        let balance = self.confirmed_balance(&client, &address, wait_blocks).await;

        if let Err(err) = client.close_wallet().await {
            tracing::warn!("Failed to close view-only wallet: {:#}", err);
        }

        balance
    }

    async fn transfer(&self, to: Address, amount: Amount) -> Result<TxHash> {
        let client = self.inner.lock().await;

        let transfer = client
            .transfer_single(0, amount.as_pico(), &to.to_string())
            .await
            .context("Failed to transfer to the joint account")?;

        tracing::debug!(tx_hash = %transfer.tx_hash, fee = transfer.fee, "Published Monero transfer");

        Ok(TxHash(transfer.tx_hash))
    }

    async fn create_wallet_from_keys(
        &self,
        wallet_name: &str,
        spend_key: PrivateKey,
        view_key: PrivateKey,
    ) -> Result<Address> {
        let client = self.inner.lock().await;

        let address = Address::standard(
            self.network,
            PublicKey::from_private_key(&spend_key),
            PublicKey::from_private_key(&view_key),
        );

        // NOTE: generate_from_keys opens the new wallet, closing whatever
        // was open before.
        client
            .generate_from_keys(
                wallet_name.to_owned(),
                address.to_string(),
                hex::encode(spend_key.as_bytes()),
                hex::encode(view_key.as_bytes()),
                0,
                String::new(),
                true,
            )
            .await
            .context("Failed to generate wallet from keys")?;

        Ok(address)
    }

    async fn sweep_all(&self, to: Address) -> Result<Vec<TxHash>> {
        let client = self.inner.lock().await;

        let sweep = client
            .sweep_all(to.to_string())
            .await
            .context("Failed to sweep wallet")?;

        Ok(sweep.tx_hash_list.into_iter().map(TxHash).collect())
    }
}
