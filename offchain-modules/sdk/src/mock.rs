use crate::cell::LiveCell;
use crate::chain::{CellQuery, ChainQuery};
use crate::error::{Result, TxBuildError};
use ckb_types::{core::TransactionView, prelude::*, H256};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream};
use futures::{FutureExt, StreamExt};
use std::sync::Mutex;

/// In-memory chain: serves `cells` in insertion order and records every
/// broadcast transaction.
#[derive(Debug, Default)]
pub struct MockChain {
    pub cells: Vec<LiveCell>,
    pub sent_txs: Mutex<Vec<TransactionView>>,
    pub reject_broadcast: bool,
}

impl MockChain {
    pub fn new(cells: Vec<LiveCell>) -> Self {
        MockChain {
            cells,
            ..Default::default()
        }
    }

    pub fn sent_txs(&self) -> Vec<TransactionView> {
        self.sent_txs
            .lock()
            .map(|txs| txs.clone())
            .unwrap_or_default()
    }
}

impl ChainQuery for MockChain {
    fn query_cells(&self, query: CellQuery) -> BoxStream<'_, Result<LiveCell>> {
        stream::iter(
            self.cells
                .iter()
                .filter(move |cell| query.matches(cell))
                .cloned()
                .map(Ok),
        )
        .boxed()
    }

    fn broadcast(&self, tx: TransactionView) -> BoxFuture<'_, Result<H256>> {
        async move {
            if self.reject_broadcast {
                return Err(TxBuildError::RpcError(
                    "PoolRejectedTransactionByMinFeeRate".to_string(),
                ));
            }
            let tx_hash: H256 = tx.hash().unpack();
            self.sent_txs
                .lock()
                .map_err(|e| TxBuildError::RpcError(e.to_string()))?
                .push(tx);
            Ok(tx_hash)
        }
        .boxed()
    }
}
