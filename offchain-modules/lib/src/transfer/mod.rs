use crate::util::ckb_tx_generator::Generator;
use crate::util::ckb_util::{
    build_lockscript_from_address, encode_address, parse_capacity, parse_token_amount,
};
use crate::util::config::AcpConfig;
use crate::util::scripts::{NetworkScripts, USDI_DECIMALS};
use acp_sdk::chain::CkbChain;
use acp_sdk::signer::{KeySigner, SecpSigner};
use acp_sdk::tx_helper::TxSkeleton;
use acp_sdk::util::{ensure_indexer_sync, wait_tx_committed};
use anyhow::{anyhow, bail, Result};
use ckb_types::{bytes::Bytes, packed::Script, H256};
use log::info;

const INDEXER_SYNC_TIMEOUT: u64 = 60;

pub fn init_generator(config: &AcpConfig) -> Result<Generator<CkbChain>> {
    let chain = CkbChain::new(&config.ckb_rpc_url, &config.ckb_indexer_url)?;
    Ok(Generator::new(
        chain,
        config.network_scripts(),
        config.fee_rate,
    ))
}

pub fn load_signer(config: &AcpConfig) -> Result<SecpSigner> {
    SecpSigner::from_privkey_str(config.ckb_secp256k1_private_key.as_deref())
        .map_err(|e| anyhow!("{}, set CKB_SECP256K1_PRIVATE_KEY", e))
}

/// (secp256k1 address, acp address) of the signer
pub fn signer_addresses(scripts: &NetworkScripts, lock_args: Bytes) -> (String, String) {
    (
        encode_address(scripts.secp256k1_lockscript(lock_args.clone()), scripts.network),
        encode_address(scripts.acp_lockscript(lock_args), scripts.network),
    )
}

/// The acp lock behind `address` must be the one of `lock_args`.
pub fn check_acp_owner(scripts: &NetworkScripts, address: &str, lock_args: &Bytes) -> Result<Script> {
    let lockscript = build_lockscript_from_address(address, scripts.network)?;
    if !scripts.is_acp_lockscript(&lockscript) {
        bail!("{} is not an acp address", address);
    }
    if &lockscript.args().raw_data() != lock_args {
        bail!("acp address {} is not owned by the configured private key", address);
    }
    Ok(lockscript)
}

pub fn show_address(config: &AcpConfig) -> Result<(String, String)> {
    let signer = load_signer(config)?;
    Ok(signer_addresses(&config.network_scripts(), signer.lock_args()))
}

/// (capacity in shannons, USDI amount) held by `address`
pub async fn get_balance(config: &AcpConfig, address: &str) -> Result<(u64, u128)> {
    let generator = init_generator(config)?;
    let lockscript = build_lockscript_from_address(address, config.network())?;
    let capacity = generator.get_capacities(lockscript.clone()).await?;
    let usdi = generator.get_usdi_balance(lockscript).await?;
    Ok((capacity, usdi))
}

async fn sync_indexer(generator: &Generator<CkbChain>) -> Result<()> {
    ensure_indexer_sync(
        &generator.chain.rpc_client,
        &generator.chain.indexer_client,
        INDEXER_SYNC_TIMEOUT,
    )
    .await
    .map_err(|e| anyhow!("failed to ensure indexer sync : {}", e))
}

async fn sign_and_send(
    generator: &Generator<CkbChain>,
    skeleton: TxSkeleton,
    signer: &SecpSigner,
    wait: u64,
) -> Result<H256> {
    let tx_hash = generator.sign_and_send_transaction(skeleton, signer).await?;
    if wait > 0 {
        wait_tx_committed(&generator.chain.rpc_client, &tx_hash, wait).await?;
        info!("tx {:#x} committed", tx_hash);
    }
    Ok(tx_hash)
}

pub async fn create_acp_cells(
    config: &AcpConfig,
    count: usize,
    capacity: &str,
    wait: u64,
) -> Result<H256> {
    let signer = load_signer(config)?;
    let capacity = parse_capacity(capacity)?;
    let generator = init_generator(config)?;
    sync_indexer(&generator).await?;

    let skeleton = generator
        .create_acp_cells(signer.lock_args(), count, capacity)
        .await?;
    sign_and_send(&generator, skeleton, &signer, wait).await
}

pub async fn transfer_to_acp(
    config: &AcpConfig,
    to_address: &str,
    amount: &str,
    wait: u64,
) -> Result<H256> {
    let signer = load_signer(config)?;
    let scripts = config.network_scripts();
    let to_lockscript = build_lockscript_from_address(to_address, scripts.network)?;
    if !scripts.is_acp_lockscript(&to_lockscript) {
        bail!("{} is not an acp address", to_address);
    }
    let amount = parse_token_amount(amount, USDI_DECIMALS)?;
    let generator = init_generator(config)?;
    sync_indexer(&generator).await?;

    let skeleton = generator
        .transfer_to_acp(signer.lock_args(), to_lockscript, amount)
        .await?;
    sign_and_send(&generator, skeleton, &signer, wait).await
}

pub async fn transfer_all_from_acp(
    config: &AcpConfig,
    from_address: &str,
    to_address: &str,
    wait: u64,
) -> Result<H256> {
    let signer = load_signer(config)?;
    let scripts = config.network_scripts();
    check_acp_owner(&scripts, from_address, &signer.lock_args())?;
    let to_lockscript = build_lockscript_from_address(to_address, scripts.network)?;
    let generator = init_generator(config)?;
    sync_indexer(&generator).await?;

    let skeleton = generator
        .transfer_all_from_acp(signer.lock_args(), to_lockscript)
        .await?;
    sign_and_send(&generator, skeleton, &signer, wait).await
}
