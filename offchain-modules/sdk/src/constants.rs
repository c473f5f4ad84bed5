use ckb_types::{h256, H256};

pub const ONE_CKB: u64 = 100_000_000;

/// sUDT-style amount: u128 little endian at the head of cell data.
pub const UDT_LEN: usize = 16;

/// 65 bytes recoverable signature: 64 bytes compact + 1 byte recovery id.
pub const SECP_SIGNATURE_SIZE: usize = 65;

/// Offset entry a transaction takes in the block's `TransactionVec` header.
pub const TX_OFFSET_SIZE: usize = 4;

/// shannons per 1000 bytes
pub const DEFAULT_FEE_RATE: u64 = 1000;

/// capacity(8) + secp256k1 lock(32 + 1 + 20)
pub const MIN_SECP_CELL_CAPACITY: u64 = 61 * ONE_CKB;

pub const SIGHASH_TYPE_HASH: H256 =
    h256!("0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8");
