use ckb_jsonrpc_types::{BlockNumber, OutputsValidator, Status, Transaction};
use ckb_types::H256;
use serde::{Deserialize, Serialize};

jsonrpc!(pub struct CkbRpcClient {
pub fn get_tip_block_number(&self) -> BlockNumber;

pub fn send_transaction(
    &self,
    tx: Transaction,
    outputs_validator: Option<OutputsValidator>
) -> H256;

pub fn get_transaction(&self, tx_hash: H256) -> Option<TransactionWithStatus>;
});

impl CkbRpcClient {
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// Only the status part of `get_transaction` is needed to follow a
/// broadcast transaction.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct TransactionWithStatus {
    pub tx_status: TxStatus,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct TxStatus {
    pub status: Status,
    #[serde(default)]
    pub block_hash: Option<H256>,
    #[serde(default)]
    pub reason: Option<String>,
}
