use acp_sdk::constants::SIGHASH_TYPE_HASH;
use ckb_sdk::NetworkType;
use ckb_types::{
    bytes::Bytes,
    core::{DepType, ScriptHashType},
    h256,
    packed::{CellDep, OutPoint, Script},
    prelude::*,
    H256,
};

const SECP256K1_MAINNET_DEP_GROUP: H256 =
    h256!("0x71a7ba8fc96349fea0ed3a5c47992e3b4084b031a42264a018e0072e8172e46c");
const SECP256K1_TESTNET_DEP_GROUP: H256 =
    h256!("0xf8de3bb47d055cdf460d93a2a6e1b05f7432f9777c8c474abf4eec1d4aee5d37");

const ACP_MAINNET_CODE_HASH: H256 =
    h256!("0xd369597ff47f29fbc0d47d2e3775370d1250b85140c670e4718af712983a2354");
const ACP_MAINNET_DEP_GROUP: H256 =
    h256!("0x4153a2014952d7cac45f285ce9a7c5c0c0e1b21f2d378b82ac1433cb11c25c4d");
const ACP_TESTNET_CODE_HASH: H256 =
    h256!("0x3419a1c09eb2567f6552ee7a8ecffd64155cffe0f1796e6e61ec088d740c1356");
const ACP_TESTNET_DEP_GROUP: H256 =
    h256!("0xec26b0f85ed839ece5f11c4c4e837ec359f5adc4420410f6453b1f6b60fb96a6");

const USDI_MAINNET_CODE_HASH: H256 =
    h256!("0xbfa35a9c38a676682b65ade8f02be164d48632281477e36f8dc2f41f79e56bfc");
const USDI_MAINNET_ARGS: H256 =
    h256!("0xd591ebdc69626647e056e13345fd830c8b876bb06aa07ba610479eb77153ea9f");
const USDI_MAINNET_CODE_CELL: H256 =
    h256!("0xf6a5eef65101899db9709c8de1cc28f23c1bee90d857ebe176f6647ef109e20d");
const USDI_TESTNET_CODE_HASH: H256 =
    h256!("0xcc9dc33ef234e14bc788c43a4848556a5fb16401a04662fc55db9bb201987037");
const USDI_TESTNET_ARGS: H256 =
    h256!("0x71fd1985b2971a9903e4d8ed0d59e6710166985217ca0681437883837b86162f");
const USDI_TESTNET_CODE_CELL: H256 =
    h256!("0xaec423c2af7fe844b476333190096b10fc5726e6d9ac58a9b71f71ffac204fee");

/// USDI has 6 decimals.
pub const USDI_DECIMALS: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub fn from_is_mainnet(is_mainnet: bool) -> Self {
        if is_mainnet {
            Network::Mainnet
        } else {
            Network::Testnet
        }
    }

    pub fn address_network(self) -> NetworkType {
        match self {
            Network::Testnet => NetworkType::Testnet,
            Network::Mainnet => NetworkType::Mainnet,
        }
    }
}

/// Lock and type scripts of one network, with the cells they depend on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkScripts {
    pub network: Network,
    pub secp256k1_dep: CellDep,
    pub acp_code_hash: H256,
    pub acp_dep: CellDep,
    pub usdi_typescript: Script,
    pub usdi_dep: CellDep,
}

fn cell_dep(tx_hash: &H256, index: u32, dep_type: DepType) -> CellDep {
    let out_point = OutPoint::new_builder()
        .tx_hash(tx_hash.pack())
        .index(index.pack())
        .build();
    CellDep::new_builder()
        .out_point(out_point)
        .dep_type(dep_type.into())
        .build()
}

fn type_script(code_hash: &H256, args: Bytes) -> Script {
    Script::new_builder()
        .code_hash(code_hash.pack())
        .hash_type(ScriptHashType::Type.into())
        .args(args.pack())
        .build()
}

impl NetworkScripts {
    pub fn new(network: Network) -> Self {
        match network {
            Network::Mainnet => NetworkScripts {
                network,
                secp256k1_dep: cell_dep(&SECP256K1_MAINNET_DEP_GROUP, 0, DepType::DepGroup),
                acp_code_hash: ACP_MAINNET_CODE_HASH,
                acp_dep: cell_dep(&ACP_MAINNET_DEP_GROUP, 0, DepType::DepGroup),
                usdi_typescript: type_script(
                    &USDI_MAINNET_CODE_HASH,
                    Bytes::from(USDI_MAINNET_ARGS.as_bytes().to_vec()),
                ),
                usdi_dep: cell_dep(&USDI_MAINNET_CODE_CELL, 0, DepType::Code),
            },
            Network::Testnet => NetworkScripts {
                network,
                secp256k1_dep: cell_dep(&SECP256K1_TESTNET_DEP_GROUP, 0, DepType::DepGroup),
                acp_code_hash: ACP_TESTNET_CODE_HASH,
                acp_dep: cell_dep(&ACP_TESTNET_DEP_GROUP, 0, DepType::DepGroup),
                usdi_typescript: type_script(
                    &USDI_TESTNET_CODE_HASH,
                    Bytes::from(USDI_TESTNET_ARGS.as_bytes().to_vec()),
                ),
                usdi_dep: cell_dep(&USDI_TESTNET_CODE_CELL, 0, DepType::Code),
            },
        }
    }

    pub fn secp256k1_lockscript(&self, lock_args: Bytes) -> Script {
        type_script(&SIGHASH_TYPE_HASH, lock_args)
    }

    pub fn acp_lockscript(&self, lock_args: Bytes) -> Script {
        type_script(&self.acp_code_hash, lock_args)
    }

    pub fn is_acp_lockscript(&self, script: &Script) -> bool {
        script.code_hash() == self.acp_code_hash.pack()
            && script.hash_type() == ScriptHashType::Type.into()
    }
}
