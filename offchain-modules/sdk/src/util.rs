use crate::error::{Result, TxBuildError};
use crate::indexer::IndexerRpcClient;
use crate::rpc::CkbRpcClient;
use ckb_jsonrpc_types::Status;
use ckb_types::H256;
use std::time::Duration;

pub fn clear_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Polls `get_transaction` once a second until `tx_hash` is committed, for at
/// most `timeout` seconds.
pub async fn wait_tx_committed(
    rpc_client: &CkbRpcClient,
    tx_hash: &H256,
    timeout: u64,
) -> Result<()> {
    for i in 0..timeout {
        let tx_status = rpc_client
            .get_transaction(tx_hash.clone())
            .await?
            .map(|t| t.tx_status);
        log::info!(
            "waiting for tx {:#x} to be committed, loop index: {}, status: {:?}",
            tx_hash,
            i,
            tx_status.as_ref().map(|s| &s.status)
        );
        match tx_status {
            Some(s) if s.status == Status::Committed => return Ok(()),
            Some(s) if s.status == Status::Rejected => {
                return Err(TxBuildError::RpcError(format!(
                    "tx {:#x} rejected: {}",
                    tx_hash,
                    s.reason.unwrap_or_default()
                )))
            }
            _ => {}
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    Err(TxBuildError::RpcError(format!(
        "tx {:#x} not committed in {} seconds",
        tx_hash, timeout
    )))
}

/// Waits at most `timeout` seconds for the indexer to reach the node's tip.
pub async fn ensure_indexer_sync(
    rpc_client: &CkbRpcClient,
    indexer_client: &IndexerRpcClient,
    timeout: u64,
) -> Result<()> {
    let rpc_tip = rpc_client.get_tip_block_number().await?.value();
    for _ in 0..timeout {
        let indexer_tip = indexer_client
            .get_tip()
            .await?
            .map(|t| t.block_number.value())
            .unwrap_or(0);
        log::info!("rpc_tip: {}, indexer_tip: {}", rpc_tip, indexer_tip);
        if indexer_tip >= rpc_tip {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    log::warn!("indexer is still behind rpc tip {}", rpc_tip);
    Ok(())
}
