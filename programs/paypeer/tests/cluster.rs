// Calls `initialize` over RPC against whatever cluster the Anchor provider
// environment points at. `anchor test` exports ANCHOR_PROVIDER_URL and
// ANCHOR_WALLET after deploying to its local validator.

use std::env;
use std::rc::Rc;

use anchor_client::solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signature, Signer},
    system_program,
};
use anchor_client::{Client, ClientError, Cluster};

fn provider_from_env() -> Option<(Cluster, Keypair)> {
    let url = env::var("ANCHOR_PROVIDER_URL").ok()?;
    let wallet = env::var("ANCHOR_WALLET").ok()?;
    let cluster = url.parse::<Cluster>().expect("ANCHOR_PROVIDER_URL is a cluster url");
    let payer = read_keypair_file(&wallet).expect("ANCHOR_WALLET is a keypair file");
    Some((cluster, payer))
}

fn initialize(cluster: Cluster, payer: Keypair) -> Result<Signature, ClientError> {
    let payer = Rc::new(payer);
    let client = Client::new_with_options(cluster, payer.clone(), CommitmentConfig::confirmed());
    let program = client.program(paypeer::ID)?;
    let config = Pubkey::find_program_address(&[b"config"], &paypeer::ID).0;

    let sig = program
        .request()
        .accounts(paypeer::accounts::Initialize {
            authority: payer.pubkey(),
            config,
            system_program: system_program::ID,
        })
        .args(paypeer::instruction::Initialize {})
        .send();
    sig
}

#[test]
fn is_initialized_on_provider_cluster() {
    let Some((cluster, payer)) = provider_from_env() else {
        eprintln!("ANCHOR_PROVIDER_URL / ANCHOR_WALLET not set, skipping");
        return;
    };

    let tx = initialize(cluster, payer).unwrap();
    assert_ne!(tx, Signature::default());
    println!("Your transaction signature {tx}");
}

#[test]
fn initialize_against_unreachable_cluster_fails() {
    let cluster = Cluster::Custom(
        "http://127.0.0.1:1".to_string(),
        "ws://127.0.0.1:2".to_string(),
    );
    let result = initialize(cluster, Keypair::new());
    assert!(result.is_err(), "expected an RPC error, got {result:?}");
}
