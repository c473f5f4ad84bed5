use derive_more::Display;

pub type Result<T, E = TxBuildError> = std::result::Result<T, E>;

/// Every failure of the assembly pipeline is terminal, nothing is retried.
/// Only `RpcError` can happen after a transaction left the process.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum TxBuildError {
    #[display(
        fmt = "insufficient capacity, required: {} shannons, available: {} shannons",
        required,
        available
    )]
    InsufficientFunds { required: u64, available: u64 },
    #[display(
        fmt = "insufficient token amount, required: {}, available: {}",
        required,
        available
    )]
    InsufficientToken { required: u128, available: u128 },
    #[display(fmt = "no matching cell: {}", _0)]
    NoMatchingCell(String),
    #[display(fmt = "fee {} exceeds change output capacity {}", fee, change)]
    FeeExceedsChange { fee: u64, change: u64 },
    #[display(fmt = "malformed transaction draft: {}", _0)]
    MalformedDraft(String),
    #[display(fmt = "signing private key is not configured")]
    SigningKeyMissing,
    #[display(fmt = "rpc error: {}", _0)]
    RpcError(String),
}

impl std::error::Error for TxBuildError {}

impl From<reqwest::Error> for TxBuildError {
    fn from(e: reqwest::Error) -> Self {
        Self::RpcError(e.to_string())
    }
}

impl From<serde_json::Error> for TxBuildError {
    fn from(e: serde_json::Error) -> Self {
        Self::RpcError(e.to_string())
    }
}
