use crate::cell::LiveCell;
use crate::cell_selector::{select_cells, Selection, Threshold};
use crate::chain::{CellQuery, ChainQuery};
use crate::error::Result;
use ckb_types::packed::Script;
use futures::future;
use futures::TryStreamExt;

/// get the first live cell matching `query`
pub async fn get_live_cell<C: ChainQuery + ?Sized>(
    chain: &C,
    query: CellQuery,
) -> Result<Option<LiveCell>> {
    chain.query_cells(query).try_next().await
}

/// get plain capacity cells whose capacity strictly exceeds `capacity`
pub async fn collect_capacity_cells<C: ChainQuery + ?Sized>(
    chain: &C,
    lockscript: Script,
    capacity: u64,
) -> Result<Selection> {
    let cells = chain.query_cells(CellQuery::empty_cells(lockscript));
    select_cells(cells, Threshold::Capacity(capacity)).await
}

/// get udt cells whose amount strictly exceeds `need_udt_amount`, cells
/// without a well-formed amount are skipped
pub async fn collect_udt_cells_by_amount<C: ChainQuery + ?Sized>(
    chain: &C,
    lockscript: Script,
    udt_typescript: Script,
    need_udt_amount: u128,
) -> Result<Selection> {
    let cells = chain
        .query_cells(CellQuery::typed_cells(lockscript, udt_typescript))
        .try_filter(|cell| future::ready(cell.udt_amount().is_some()));
    select_cells(cells, Threshold::Token(need_udt_amount)).await
}

pub async fn collect_all_udt_cells<C: ChainQuery + ?Sized>(
    chain: &C,
    lockscript: Script,
    udt_typescript: Script,
) -> Result<Vec<LiveCell>> {
    chain
        .query_cells(CellQuery::typed_cells(lockscript, udt_typescript))
        .try_filter(|cell| future::ready(cell.udt_amount().is_some()))
        .try_collect()
        .await
}

pub async fn collect_udt_amount<C: ChainQuery + ?Sized>(
    chain: &C,
    lockscript: Script,
    udt_typescript: Script,
) -> Result<u128> {
    chain
        .query_cells(CellQuery::typed_cells(lockscript, udt_typescript.clone()))
        .try_fold(0u128, |total, cell| {
            future::ready(Ok(total.saturating_add(cell.udt_amount_of(&udt_typescript))))
        })
        .await
}

/// total capacity of every live cell of `lockscript`
pub async fn collect_capacity<C: ChainQuery + ?Sized>(chain: &C, lockscript: Script) -> Result<u64> {
    chain
        .query_cells(CellQuery::by_lock(lockscript))
        .map_ok(|cell| cell.capacity())
        .try_fold(0u64, |total, capacity| future::ready(Ok(total.saturating_add(capacity))))
        .await
}
