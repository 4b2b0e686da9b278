use serde::{Deserialize, Serialize};

#[jsonrpc_client::api(version = "2.0")]
pub trait MoneroWalletRpc {
    #[allow(clippy::too_many_arguments)]
    async fn generate_from_keys(
        &self,
        filename: String,
        address: String,
        spendkey: String,
        viewkey: String,
        restore_height: u32,
        password: String,
        autosave_current: bool,
    ) -> GenerateFromKeys;
    async fn open_wallet(&self, filename: String);
    async fn close_wallet(&self);
    async fn refresh(&self) -> Refreshed;
    async fn get_accounts(&self, tag: String) -> GetAccounts;
    async fn get_balance(&self, account_index: u32) -> Balance;
    async fn get_height(&self) -> BlockHeight;
    async fn transfer(&self, account_index: u32, destinations: Vec<Destination>) -> Transfer;
    async fn sweep_all(&self, address: String) -> SweepAll;
}

#[jsonrpc_client::implement(MoneroWalletRpc)]
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
    base_url: reqwest::Url,
}

impl Client {
    /// Constructs a monero-wallet-rpc client with localhost endpoint.
    pub fn localhost(port: u16) -> Self {
        Client::new(
            format!("http://127.0.0.1:{}/json_rpc", port)
                .parse()
                .expect("url is well formed"),
        )
    }

    /// Constructs a monero-wallet-rpc client with `url` endpoint.
    pub fn new(url: reqwest::Url) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: url,
        }
    }

    /// Transfers `amount` piconero from `account_index` to `address`.
    pub async fn transfer_single(
        &self,
        account_index: u32,
        amount: u64,
        address: &str,
    ) -> Result<Transfer, jsonrpc_client::Error<reqwest::Error>> {
        let dest = vec![Destination {
            amount,
            address: address.to_owned(),
        }];
        self.transfer(account_index, dest).await
    }

    /// Restores a view-only wallet from a private view key, by passing an
    /// empty spend key to `generate_from_keys`.
    pub async fn generate_view_only_wallet(
        &self,
        filename: String,
        address: String,
        viewkey: String,
        restore_height: u32,
        password: String,
    ) -> Result<GenerateFromKeys, jsonrpc_client::Error<reqwest::Error>> {
        self.generate_from_keys(
            filename,
            address,
            String::new(),
            viewkey,
            restore_height,
            password,
            true,
        )
        .await
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenerateFromKeys {
    pub address: String,
    pub info: String,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Refreshed {
    pub blocks_fetched: u32,
    pub received_money: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetAccounts {
    pub subaddress_accounts: Vec<SubAddressAccount>,
    pub total_balance: u64,
    pub total_unlocked_balance: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubAddressAccount {
    pub account_index: u32,
    pub balance: u64,
    pub base_address: String,
    pub label: String,
    pub tag: String,
    pub unlocked_balance: u64,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Balance {
    pub balance: u64,
    pub blocks_to_unlock: u32,
    pub unlocked_balance: u64,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct BlockHeight {
    pub height: u32,
}

#[derive(Serialize, Debug, Clone)]
pub struct Destination {
    pub amount: u64,
    pub address: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Transfer {
    pub amount: u64,
    pub fee: u64,
    pub tx_hash: String,
    pub tx_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SweepAll {
    pub amount_list: Vec<u64>,
    pub fee_list: Vec<u64>,
    pub tx_hash_list: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpc_client::Response;

    #[test]
    fn can_deserialize_get_accounts_response() {
        let response = r#"{
          "id": "0",
          "jsonrpc": "2.0",
          "result": {
            "subaddress_accounts": [{
              "account_index": 0,
              "balance": 157663195572433688,
              "base_address": "55LTR8KniP4LQGJSPtbYDacR7dz8RBFnsfAKMaMuwUNYX6aQbBcovzDPyrQF9KXF9tVU6Xk3K8no1BywnJX6GvZX8yJsXvt",
              "label": "Primary account",
              "tag": "",
              "unlocked_balance": 157443303037455077
            }],
            "total_balance": 157663195572433688,
            "total_unlocked_balance": 157443303037455077
          }
        }"#;

        let _: Response<GetAccounts> = serde_json::from_str(response).unwrap();
    }

    #[test]
    fn can_deserialize_sweep_all_response() {
        let response = r#"{
          "id": "0",
          "jsonrpc": "2.0",
          "result": {
            "amount_list": [29921410000],
            "fee_list": [78590000],
            "multisig_txset": "",
            "tx_hash_list": ["c1d8cfa87d445c1915a59d67be3e93ba8a29018640cf69b465f07b1840a8f8c8"],
            "unsigned_txset": "",
            "weight_list": [1448]
          }
        }"#;

        let _: Response<SweepAll> = serde_json::from_str(response).unwrap();
    }

    #[test]
    fn can_deserialize_balance_response() {
        let response = r#"{
          "id": "0",
          "jsonrpc": "2.0",
          "result": {
            "balance": 157443303037455077,
            "blocks_to_unlock": 0,
            "multisig_import_needed": false,
            "time_to_unlock": 0,
            "unlocked_balance": 157443303037455077
          }
        }"#;

        let _: Response<Balance> = serde_json::from_str(response).unwrap();
    }
}
