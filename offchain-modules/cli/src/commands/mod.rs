pub mod types;

use acp_usdi_lib::transfer::{
    create_acp_cells, get_balance, show_address, transfer_all_from_acp, transfer_to_acp,
};
use acp_usdi_lib::util::ckb_util::{format_capacity, format_token_amount};
use acp_usdi_lib::util::config::AcpConfig;
use acp_usdi_lib::util::scripts::USDI_DECIMALS;
use anyhow::Result;
use log::debug;
use shellexpand::tilde;
use types::*;

pub async fn handler(opt: Opts) -> Result<()> {
    let config_path = opt.config_path;
    match opt.subcmd {
        SubCommand::Address => address_handler(&config_path),
        SubCommand::Balance(args) => balance_handler(&config_path, args).await,
        SubCommand::CreateAcpCells(args) => create_acp_cells_handler(&config_path, args).await,
        SubCommand::TransferToAcp(args) => transfer_to_acp_handler(&config_path, args).await,
        SubCommand::TransferAllFromAcp(args) => {
            transfer_all_from_acp_handler(&config_path, args).await
        }
        SubCommand::Init(args) => init_handler(&config_path, args),
    }
}

fn load_config(config_path: &str) -> Result<AcpConfig> {
    AcpConfig::new(Some(config_path))
}

pub fn init_handler(config_path: &str, args: InitArgs) -> Result<()> {
    if std::path::Path::new(&tilde(config_path).into_owned()).exists() && !args.force {
        return Err(anyhow::anyhow!(
            "acp-usdi config already exists at {}, use `-f` in command if you want to overwrite it",
            config_path
        ));
    }
    let mut config = load_config(config_path)?;
    // keys stay in the environment
    config.ckb_secp256k1_private_key = None;
    config.write(config_path)?;
    println!("config written to {}", config_path);
    Ok(())
}

pub fn address_handler(config_path: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let (secp_address, acp_address) = show_address(&config)?;
    println!("secp256k1 address: {}", secp_address);
    println!("acp address: {}", acp_address);
    Ok(())
}

pub async fn balance_handler(config_path: &str, args: BalanceArgs) -> Result<()> {
    debug!("balance_handler args: {:?}", &args);
    let config = load_config(config_path)?;
    let (capacity, usdi) = get_balance(&config, &args.address).await?;
    println!("capacity: {} CKB", format_capacity(capacity));
    println!("usdi: {}", format_token_amount(usdi, USDI_DECIMALS));
    Ok(())
}

pub async fn create_acp_cells_handler(config_path: &str, args: CreateAcpCellsArgs) -> Result<()> {
    debug!("create_acp_cells_handler args: {:?}", &args);
    let config = load_config(config_path)?;
    let hash = create_acp_cells(&config, args.count, &args.capacity, args.wait).await?;
    println!("create acp cells tx_hash: {:#x}", &hash);
    Ok(())
}

pub async fn transfer_to_acp_handler(config_path: &str, args: TransferToAcpArgs) -> Result<()> {
    debug!("transfer_to_acp_handler args: {:?}", &args);
    let config = load_config(config_path)?;
    let hash = transfer_to_acp(&config, &args.to, &args.amount, args.wait).await?;
    println!("transfer to acp tx_hash: {:#x}", &hash);
    Ok(())
}

pub async fn transfer_all_from_acp_handler(
    config_path: &str,
    args: TransferAllFromAcpArgs,
) -> Result<()> {
    debug!("transfer_all_from_acp_handler args: {:?}", &args);
    let config = load_config(config_path)?;
    let hash = transfer_all_from_acp(&config, &args.from, &args.to, args.wait).await?;
    println!("transfer all from acp tx_hash: {:#x}", &hash);
    Ok(())
}
