pub mod harness;

use harness::*;
use rand::rngs::OsRng;
use rust_decimal_macros::dec;
use std::time::Duration;
use swap::crypto::LocalKeys;
use swap::ethereum::{self, Amount as EthAmount};
use swap::monero;
use swap::net::{Message, NotifyContractDeployed};
use swap::protocol::Error;
use swap::session::Status;

/// The deployed contract does not commit to Bob's claim key; Bob must walk
/// away without locking a single piconero.
#[tokio::test]
async fn bob_rejects_contract_with_wrong_commitment() {
    init_tracing();

    let env = test_env(
        Duration::from_secs(60),
        Duration::from_secs(5),
        Duration::from_secs(1),
    );
    let contract = FakeContract::new(Duration::from_secs(60));
    let wallet = FakeMoneroWallet::new(env.monero_network);
    let basepath = tempfile::tempdir().unwrap();

    let bob = start_bob(
        env,
        contract.clone(),
        wallet.clone(),
        dec!(100),
        basepath.path().to_path_buf(),
    );

    let alice_keys = LocalKeys::generate(&mut OsRng);

    assert!(bob
        .swap
        .handle_message(Message::SendKeys(send_keys_message(
            &alice_keys,
            dec!(1),
            alice_eth_address(),
        )))
        .await
        .unwrap()
        .is_none());

    let bob_keys = bob.swap.send_keys_message(String::new()).unwrap();

    // The claim commitment is Alice's key, not Bob's.
    let contract_address = contract.deploy_raw(
        alice_keys.secp.commitment(),
        alice_keys.secp.commitment(),
        bob_eth_address(),
        EthAmount::from_ether(dec!(1)).unwrap(),
    );

    let err = bob
        .swap
        .handle_message(Message::NotifyContractDeployed(NotifyContractDeployed {
            contract_address: ethereum::address_to_hex(&contract_address),
        }))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ContractMismatch(_)));
    assert_eq!(bob.swap.session().status(), Status::Aborted);

    // No XMR moved anywhere.
    let joint = joint_address(
        &monero::public_key_from_hex(
            &send_keys_message(&alice_keys, dec!(1), alice_eth_address()).pub_spend,
        )
        .unwrap(),
        &monero::public_key_from_hex(&bob_keys.pub_spend).unwrap(),
        alice_keys.view,
        monero::PrivateViewKey::from_hex(&bob_keys.priv_view).unwrap(),
        env.monero_network,
    );
    assert_eq!(wallet.balance(&joint), 0);
    assert!(wallet.created_wallets().is_empty());
}
