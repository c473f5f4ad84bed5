pub mod capacity;
pub mod cell;
pub mod cell_collector;
pub mod cell_selector;
pub mod chain;
pub mod constants;
pub mod error;
pub mod fee;
#[macro_use]
pub mod indexer;
pub mod mock;
pub mod rpc;
pub mod signer;
pub mod tx_helper;
pub mod util;

pub use error::{Result, TxBuildError};
