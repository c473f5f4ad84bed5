use crate::cell::LiveCell;
use crate::error::{Result, TxBuildError};
use crate::indexer::{IndexerRpcClient, Order, ScriptType, SearchKey, SearchKeyFilter};
use crate::rpc::CkbRpcClient;
use ckb_jsonrpc_types::{JsonBytes, OutputsValidator, Uint32};
use ckb_types::{core::TransactionView, packed::Script, H256};
use futures::future::{self, BoxFuture};
use futures::stream::{self, BoxStream};
use futures::{FutureExt, StreamExt, TryStreamExt};

pub const PAGE_LIMIT: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeFilter {
    Any,
    /// no type script and no data
    Empty,
    Script(Script),
}

/// Lock filter, optional type filter and optional `[min, max)` capacity range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellQuery {
    pub lock: Script,
    pub type_filter: TypeFilter,
    pub capacity_range: Option<(u64, u64)>,
}

impl CellQuery {
    pub fn by_lock(lock: Script) -> Self {
        CellQuery {
            lock,
            type_filter: TypeFilter::Any,
            capacity_range: None,
        }
    }

    pub fn empty_cells(lock: Script) -> Self {
        CellQuery {
            lock,
            type_filter: TypeFilter::Empty,
            capacity_range: None,
        }
    }

    pub fn typed_cells(lock: Script, typescript: Script) -> Self {
        CellQuery {
            lock,
            type_filter: TypeFilter::Script(typescript),
            capacity_range: None,
        }
    }

    pub fn with_capacity_range(mut self, min: u64, max: u64) -> Self {
        self.capacity_range = Some((min, max));
        self
    }

    pub fn matches(&self, cell: &LiveCell) -> bool {
        if cell.lock() != self.lock {
            return false;
        }
        let type_matched = match &self.type_filter {
            TypeFilter::Any => true,
            TypeFilter::Empty => cell.is_capacity_cell(),
            TypeFilter::Script(script) => cell.type_script().as_ref() == Some(script),
        };
        let capacity_matched = self
            .capacity_range
            .map(|(min, max)| cell.capacity() >= min && cell.capacity() < max)
            .unwrap_or(true);
        type_matched && capacity_matched
    }

    pub fn to_search_key(&self) -> SearchKey {
        let mut filter = SearchKeyFilter::default();
        match &self.type_filter {
            TypeFilter::Any => {}
            TypeFilter::Empty => {
                filter.script_len_range = Some([0u64.into(), 1u64.into()]);
                filter.output_data_len_range = Some([0u64.into(), 1u64.into()]);
            }
            TypeFilter::Script(script) => filter.script = Some(script.clone().into()),
        }
        filter.output_capacity_range = self
            .capacity_range
            .map(|(min, max)| [min.into(), max.into()]);
        let filter = if filter == SearchKeyFilter::default() {
            None
        } else {
            Some(filter)
        };
        SearchKey {
            script: self.lock.clone().into(),
            script_type: ScriptType::Lock,
            filter,
        }
    }
}

/// The chain as seen by the transaction builder.
pub trait ChainQuery: Send + Sync {
    /// Live cells matching `query`, in a stable order, fetched lazily.
    fn query_cells(&self, query: CellQuery) -> BoxStream<'_, Result<LiveCell>>;

    fn broadcast(&self, tx: TransactionView) -> BoxFuture<'_, Result<H256>>;
}

pub struct CkbChain {
    pub rpc_client: CkbRpcClient,
    pub indexer_client: IndexerRpcClient,
}

impl CkbChain {
    pub fn new(rpc_url: &str, indexer_url: &str) -> Result<Self> {
        Ok(CkbChain {
            rpc_client: CkbRpcClient::new(rpc_url)?,
            indexer_client: IndexerRpcClient::new(indexer_url)?,
        })
    }

    /// The next page of cells after `cursor` and the cursor to continue
    /// from, `None` once the last page has been read.
    async fn next_page(
        &self,
        search_key: SearchKey,
        cursor: Cursor,
    ) -> Result<Option<(Vec<LiveCell>, Cursor)>> {
        let after = match cursor {
            Cursor::Start => None,
            Cursor::After(cursor) => Some(cursor),
            Cursor::Done => return Ok(None),
        };
        let page = self
            .indexer_client
            .get_cells(search_key, Order::Asc, Uint32::from(PAGE_LIMIT), after)
            .await?;
        let next = if page.objects.len() < PAGE_LIMIT as usize {
            Cursor::Done
        } else {
            Cursor::After(page.last_cursor)
        };
        let cells = page.objects.into_iter().map(LiveCell::from).collect();
        Ok(Some((cells, next)))
    }
}

enum Cursor {
    Start,
    After(JsonBytes),
    Done,
}

impl ChainQuery for CkbChain {
    fn query_cells(&self, query: CellQuery) -> BoxStream<'_, Result<LiveCell>> {
        let search_key = query.to_search_key();
        stream::try_unfold(Cursor::Start, move |cursor| {
            let search_key = search_key.clone();
            async move { self.next_page(search_key, cursor).await }
        })
        .map_ok(|cells| stream::iter(cells.into_iter().map(Ok::<_, TxBuildError>)))
        .try_flatten()
        .try_filter(move |cell| future::ready(query.matches(cell)))
        .boxed()
    }

    fn broadcast(&self, tx: TransactionView) -> BoxFuture<'_, Result<H256>> {
        async move {
            self.rpc_client
                .send_transaction(tx.data().into(), Some(OutputsValidator::Passthrough))
                .await
        }
        .boxed()
    }
}
