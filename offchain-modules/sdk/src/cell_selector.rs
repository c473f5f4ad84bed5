use crate::cell::LiveCell;
use crate::error::{Result, TxBuildError};
use futures::{Stream, StreamExt};
use std::convert::TryFrom;

/// What the selection has to strictly exceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Threshold {
    /// shannons
    Capacity(u64),
    /// udt amount read from the head of the cell data
    Token(u128),
}

impl Threshold {
    fn measure(&self, cell: &LiveCell) -> u128 {
        match self {
            Threshold::Capacity(_) => u128::from(cell.capacity()),
            Threshold::Token(_) => cell.udt_amount().unwrap_or(0),
        }
    }

    fn target(&self) -> u128 {
        match *self {
            Threshold::Capacity(capacity) => u128::from(capacity),
            Threshold::Token(amount) => amount,
        }
    }

    fn insufficient(&self, available: u128) -> TxBuildError {
        match *self {
            Threshold::Capacity(required) => TxBuildError::InsufficientFunds {
                required,
                available: u64::try_from(available).unwrap_or(u64::MAX),
            },
            Threshold::Token(required) => TxBuildError::InsufficientToken { required, available },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub cells: Vec<LiveCell>,
    /// in the unit of the threshold
    pub total: u128,
}

impl Selection {
    pub fn capacity(&self) -> u64 {
        self.cells.iter().map(LiveCell::capacity).sum()
    }
}

/// Greedy first-fit over `cells` in arrival order: takes cells until the
/// accumulated total strictly exceeds the threshold. Pulls no more cells
/// from the stream than it selects.
pub async fn select_cells<S>(mut cells: S, threshold: Threshold) -> Result<Selection>
where
    S: Stream<Item = Result<LiveCell>> + Unpin,
{
    let target = threshold.target();
    let mut selection = Selection::default();
    while let Some(cell) = cells.next().await {
        let cell = cell?;
        selection.total = selection.total.saturating_add(threshold.measure(&cell));
        selection.cells.push(cell);
        if selection.total > target {
            log::debug!(
                "selected {} cells, total: {}, threshold: {:?}",
                selection.cells.len(),
                selection.total,
                threshold
            );
            return Ok(selection);
        }
    }
    Err(threshold.insufficient(selection.total))
}
