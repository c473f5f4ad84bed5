use clap::{Args, Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[command(version = "0.1", about = "Build, sign and send ACP/USDI transactions on CKB")]
pub struct Opts {
    /// Settings file, overridden by IS_MAINNET, CKB_RPC_URL, CKB_INDEXER_URL,
    /// CKB_SECP256K1_PRIVATE_KEY and FEE_RATE
    #[arg(long, global = true, default_value = "~/.acp-usdi/config.toml")]
    pub config_path: String,
    #[command(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum SubCommand {
    /// Print the secp256k1 and acp addresses of the configured key
    Address,
    Balance(BalanceArgs),
    CreateAcpCells(CreateAcpCellsArgs),
    TransferToAcp(TransferToAcpArgs),
    TransferAllFromAcp(TransferAllFromAcpArgs),
    /// Write the effective settings to --config-path
    Init(InitArgs),
}

#[derive(Args, Clone, Debug)]
pub struct BalanceArgs {
    #[arg(long)]
    pub address: String,
}

#[derive(Args, Clone, Debug)]
pub struct CreateAcpCellsArgs {
    #[arg(long, default_value = "1")]
    pub count: usize,
    /// CKB per cell
    #[arg(long, default_value = "144.01")]
    pub capacity: String,
    /// seconds to wait for the tx to be committed, 0 returns once sent
    #[arg(long, default_value = "0")]
    pub wait: u64,
}

#[derive(Args, Clone, Debug)]
pub struct TransferToAcpArgs {
    /// recipient acp address
    #[arg(long)]
    pub to: String,
    /// USDI, e.g. 12.5
    #[arg(long)]
    pub amount: String,
    #[arg(long, default_value = "0")]
    pub wait: u64,
}

#[derive(Args, Clone, Debug)]
pub struct TransferAllFromAcpArgs {
    /// acp address owned by the configured key
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    #[arg(long, default_value = "0")]
    pub wait: u64,
}

#[derive(Args, Clone, Debug)]
pub struct InitArgs {
    #[arg(short, long)]
    pub force: bool,
}
