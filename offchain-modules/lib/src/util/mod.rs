pub mod ckb_tx_generator;
pub mod ckb_util;
pub mod config;
pub mod scripts;
