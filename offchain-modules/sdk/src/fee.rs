use crate::capacity::minimal_cell_capacity;
use crate::constants::TX_OFFSET_SIZE;
use crate::error::{Result, TxBuildError};
use crate::tx_helper::TxSkeleton;
use ckb_types::prelude::*;
use std::convert::TryFrom;

/// ceil(size * fee_rate / 1000), fee_rate in shannons per 1000 bytes
pub fn calculate_fee(tx_size: usize, fee_rate: u64) -> u64 {
    let product = tx_size as u128 * u128::from(fee_rate);
    let fee = product / 1000 + u128::from(product % 1000 != 0);
    u64::try_from(fee).unwrap_or(u64::MAX)
}

/// Size the transaction takes in a block: its molecule encoding plus the
/// offset entry of the block's transaction vector.
pub fn tx_size(skeleton: &TxSkeleton) -> usize {
    skeleton.to_transaction_view().data().as_slice().len() + TX_OFFSET_SIZE
}

/// Deducts the fee from the change output. The witnesses already hold the
/// signature placeholder and capacity is a fixed 8 bytes, so the size
/// measured here is the size of the sealed transaction.
pub fn pay_fee(skeleton: TxSkeleton, fee_rate: u64) -> Result<(TxSkeleton, u64)> {
    let fee = calculate_fee(tx_size(&skeleton), fee_rate);
    let change = skeleton.change_capacity();
    let data_len = skeleton.outputs_data[skeleton.change_index].len();
    let minimal = minimal_cell_capacity(skeleton.change_output(), data_len)?;
    let new_change = change
        .checked_sub(fee)
        .filter(|capacity| *capacity >= minimal)
        .ok_or(TxBuildError::FeeExceedsChange { fee, change })?;
    log::debug!(
        "fee: {} shannons, change: {} -> {} shannons",
        fee,
        change,
        new_change
    );
    Ok((skeleton.with_change_capacity(new_change), fee))
}
