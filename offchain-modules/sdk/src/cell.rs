use crate::constants::UDT_LEN;
use crate::indexer::Cell;
use ckb_types::{
    bytes::Bytes,
    packed::{CellOutput, OutPoint, Script},
    prelude::*,
};

/// A live cell as returned by the chain query service, ready to be used as
/// an input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveCell {
    pub output: CellOutput,
    pub output_data: Bytes,
    pub out_point: OutPoint,
}

impl LiveCell {
    pub fn new(output: CellOutput, output_data: Bytes, out_point: OutPoint) -> Self {
        LiveCell {
            output,
            output_data,
            out_point,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.output.capacity().unpack()
    }

    pub fn lock(&self) -> Script {
        self.output.lock()
    }

    pub fn type_script(&self) -> Option<Script> {
        self.output.type_().to_opt()
    }

    /// Plain capacity cell: no type script and no data.
    pub fn is_capacity_cell(&self) -> bool {
        self.output.type_().is_none() && self.output_data.is_empty()
    }

    pub fn udt_amount(&self) -> Option<u128> {
        parse_udt_amount(&self.output_data)
    }

    /// The udt amount if the cell is typed by `udt_typescript`, 0 otherwise.
    pub fn udt_amount_of(&self, udt_typescript: &Script) -> u128 {
        match self.type_script() {
            Some(ref script) if script == udt_typescript => self.udt_amount().unwrap_or(0),
            _ => 0,
        }
    }
}

impl From<Cell> for LiveCell {
    fn from(cell: Cell) -> Self {
        LiveCell {
            output: cell.output.into(),
            output_data: cell
                .output_data
                .map(|data| data.into_bytes())
                .unwrap_or_default(),
            out_point: cell.out_point.into(),
        }
    }
}

pub fn parse_udt_amount(data: &[u8]) -> Option<u128> {
    if data.len() < UDT_LEN {
        return None;
    }
    let mut buf = [0u8; UDT_LEN];
    buf.copy_from_slice(&data[..UDT_LEN]);
    Some(u128::from_le_bytes(buf))
}

pub fn udt_data(amount: u128) -> Bytes {
    Bytes::from(amount.to_le_bytes().to_vec())
}
