//! Occupied capacity checks.
//!
//! A cell must hold at least as many CKB as the bytes it occupies on chain:
//! 8 bytes of capacity, its lock script, its type script if any, and its data.

use crate::error::{Result, TxBuildError};
use ckb_types::{core::Capacity, packed::CellOutput, prelude::*};

pub fn minimal_cell_capacity(output: &CellOutput, data_len: usize) -> Result<u64> {
    Capacity::bytes(data_len)
        .and_then(|data_capacity| output.occupied_capacity(data_capacity))
        .map(|capacity| capacity.as_u64())
        .map_err(|err| TxBuildError::MalformedDraft(format!("occupied capacity overflow: {:?}", err)))
}

/// Whether `output` holds at least its occupied capacity.
pub fn is_capacity_sufficient(output: &CellOutput, data_len: usize) -> Result<bool> {
    let capacity: u64 = output.capacity().unpack();
    Ok(capacity >= minimal_cell_capacity(output, data_len)?)
}

/// The capacity `output` holds above its occupied capacity, 0 if it holds
/// none or is under-funded.
pub fn surplus_capacity(output: &CellOutput, data_len: usize) -> Result<u64> {
    let capacity: u64 = output.capacity().unpack();
    Ok(capacity.saturating_sub(minimal_cell_capacity(output, data_len)?))
}

/// An output whose surplus above its occupied capacity is less than `fee`
/// cannot have the fee deducted from it, so a plain capacity cell has to be
/// added to the inputs.
pub fn needs_auxiliary_capacity_cell(output: &CellOutput, data_len: usize, fee: u64) -> Result<bool> {
    Ok(surplus_capacity(output, data_len)? < fee)
}
