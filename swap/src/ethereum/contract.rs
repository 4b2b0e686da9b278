use super::{
    Address, Amount, RevealEvent, SwapContract, SwapParameters, Timestamp, TransactionReceipt,
    TxHash, U256,
};
use crate::crypto::Commitment;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use ethers::abi::RawLog;
use ethers::contract::{abigen, ContractFactory, EthLogDecode};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Bytes;
use std::sync::Arc;
use std::time::Duration;

abigen!(
    Swap,
    r#"[
        constructor(bytes32 _pubKeyClaim, bytes32 _pubKeyRefund, address _claimer, uint256 _timeoutDuration) payable
        function set_ready() external
        function claim(bytes32 _s) external
        function refund(bytes32 _s) external
        function is_ready() external view returns (bool)
        function timeout_0() external view returns (uint256)
        function timeout_1() external view returns (uint256)
        function pubKeyClaim() external view returns (bytes32)
        function pubKeyRefund() external view returns (bytes32)
        function claimer() external view returns (address)
        event Claimed(bytes32 s)
        event Refunded(bytes32 s)
    ]"#
);

pub type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Swap contract driver backed by a chain-E JSON-RPC node. The contract
/// build artifact (creation bytecode) is supplied by the daemon setup; the
/// Solidity source lives outside this repository.
#[derive(Debug, Clone)]
pub struct Ethereum {
    client: Arc<Client>,
    bytecode: Bytes,
    receipt_poll_interval: Duration,
}

impl Ethereum {
    pub fn new(endpoint: &str, wallet: LocalWallet, chain_id: u64, bytecode: Bytes) -> Result<Self> {
        let provider =
            Provider::<Http>::try_from(endpoint).context("Failed to parse node endpoint")?;
        let client = SignerMiddleware::new(provider, wallet.with_chain_id(chain_id));

        Ok(Self {
            client: Arc::new(client),
            bytecode,
            receipt_poll_interval: Duration::from_secs(1),
        })
    }

    /// The account transactions are signed with; role B passes this as its
    /// claim address.
    pub fn account(&self) -> Address {
        self.client.signer().address()
    }

    fn instance(&self, contract: Address) -> Swap<Client> {
        Swap::new(contract, self.client.clone())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt> {
        loop {
            if let Some(receipt) = self
                .client
                .get_transaction_receipt(tx_hash)
                .await
                .context("Failed to query transaction receipt")?
            {
                return Ok(receipt);
            }

            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}

#[async_trait]
impl SwapContract for Ethereum {
    async fn deploy(
        &self,
        claim_commitment: Commitment,
        refund_commitment: Commitment,
        claimer: Address,
        timeout_duration: Duration,
        value: Amount,
    ) -> Result<(Address, TxHash)> {
        let factory =
            ContractFactory::new(SWAP_ABI.clone(), self.bytecode.clone(), self.client.clone());

        let mut deployer = factory
            .deploy((
                claim_commitment.into_bytes(),
                refund_commitment.into_bytes(),
                claimer,
                U256::from(timeout_duration.as_secs()),
            ))
            .context("Failed to construct deployment transaction")?;
        deployer.tx.set_value(value.as_wei());

        let (contract, receipt) = deployer
            .send_with_receipt()
            .await
            .context("Failed to deploy swap contract")?;

        Ok((contract.address(), receipt.transaction_hash))
    }

    async fn set_ready(&self, contract: Address) -> Result<TxHash> {
        let instance = self.instance(contract);
        let call = instance.set_ready();

        let pending = call.send().await.context("Failed to send SetReady")?;
        let tx_hash = *pending;
        pending.await.context("SetReady was not mined")?;

        Ok(tx_hash)
    }

    async fn claim(&self, contract: Address, secret: [u8; 32]) -> Result<TxHash> {
        let instance = self.instance(contract);
        let call = instance.claim(secret);

        let pending = call.send().await.context("Failed to send Claim")?;
        let tx_hash = *pending;
        pending.await.context("Claim was not mined")?;

        Ok(tx_hash)
    }

    async fn refund(&self, contract: Address, secret: [u8; 32]) -> Result<TxHash> {
        let instance = self.instance(contract);
        let call = instance.refund(secret);

        let pending = call.send().await.context("Failed to send Refund")?;
        let tx_hash = *pending;
        pending.await.context("Refund was not mined")?;

        Ok(tx_hash)
    }

    async fn timeouts(&self, contract: Address) -> Result<(Timestamp, Timestamp)> {
        let instance = self.instance(contract);

        let t0 = instance
            .timeout_0()
            .call()
            .await
            .context("Failed to read t0")?;
        let t1 = instance
            .timeout_1()
            .call()
            .await
            .context("Failed to read t1")?;

        Ok((t0.try_into()?, t1.try_into()?))
    }

    async fn parameters(&self, contract: Address) -> Result<SwapParameters> {
        let instance = self.instance(contract);

        let claim_commitment = instance
            .pub_key_claim()
            .call()
            .await
            .context("Failed to read claim commitment")?;
        let refund_commitment = instance
            .pub_key_refund()
            .call()
            .await
            .context("Failed to read refund commitment")?;
        let claimer = instance
            .claimer()
            .call()
            .await
            .context("Failed to read claimer")?;
        let (t0, t1) = self.timeouts(contract).await?;
        let balance = self
            .client
            .get_balance(contract, None)
            .await
            .context("Failed to read contract balance")?;

        Ok(SwapParameters {
            claim_commitment: Commitment::from_bytes(claim_commitment),
            refund_commitment: Commitment::from_bytes(refund_commitment),
            claimer,
            timeout_duration: Duration::from_secs(t1.as_secs().saturating_sub(t0.as_secs())),
            balance: Amount::from_wei(balance),
        })
    }

    async fn secret_from_tx(&self, tx_hash: TxHash, event: RevealEvent) -> Result<[u8; 32]> {
        let receipt = self.wait_for_receipt(tx_hash).await?;

        let log = match receipt.logs.first() {
            Some(log) => RawLog::from(log.clone()),
            None => bail!("{} transaction has no logs", event.name()),
        };

        let secret = match event {
            RevealEvent::Claimed => {
                ClaimedFilter::decode_log(&log)
                    .context("Log is not a Claimed event")?
                    .s
            }
            RevealEvent::Refunded => {
                RefundedFilter::decode_log(&log)
                    .context("Log is not a Refunded event")?
                    .s
            }
        };

        Ok(secret)
    }
}
