use ckb_jsonrpc_types::{BlockNumber, CellOutput, JsonBytes, OutPoint, Script, Uint32, Uint64};
use ckb_types::H256;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! jsonrpc {
    (
        $(#[$struct_attr:meta])*
        pub struct $struct_name:ident {$(
            $(#[$attr:meta])*
            pub fn $method:ident(&$selff:ident $(, $arg_name:ident: $arg_ty:ty)*)
                -> $return_ty:ty;
        )*}
    ) => (
        $(#[$struct_attr])*
        pub struct $struct_name {
            pub client: reqwest::Client,
            pub url: reqwest::Url,
            pub id: std::sync::atomic::AtomicU64,
        }

        impl $struct_name {
            pub fn new(uri: &str) -> $crate::error::Result<Self> {
                let url = reqwest::Url::parse(uri).map_err(|err| {
                    $crate::error::TxBuildError::RpcError(format!("invalid url {}: {}", uri, err))
                })?;
                Ok($struct_name {
                    url,
                    id: std::sync::atomic::AtomicU64::new(0),
                    client: reqwest::Client::new(),
                })
            }

            $(
                $(#[$attr])*
                pub async fn $method(&$selff $(, $arg_name: $arg_ty)*) -> $crate::error::Result<$return_ty> {
                    let method = String::from(stringify!($method));
                    let params = serialize_parameters!($($arg_name,)*);
                    let id = $selff.id.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;

                    let mut req_json = serde_json::Map::new();
                    req_json.insert("id".to_owned(), serde_json::json!(id));
                    req_json.insert("jsonrpc".to_owned(), serde_json::json!("2.0"));
                    req_json.insert("method".to_owned(), serde_json::json!(method));
                    req_json.insert("params".to_owned(), params);

                    let resp = $selff.client.post($selff.url.clone()).json(&req_json).send().await?;
                    let output = resp.json::<$crate::indexer::RpcOutput>().await?;
                    match output {
                        $crate::indexer::RpcOutput::Success { result } => {
                            serde_json::from_value(result).map_err(Into::into)
                        },
                        $crate::indexer::RpcOutput::Failure { error } => {
                            Err($crate::error::TxBuildError::RpcError(format!("{} failed: {}", method, error)))
                        }
                    }
                }
            )*
        }
    )
}

macro_rules! serialize_parameters {
    () => ( serde_json::Value::Array(vec![]) );
    ($($arg_name:ident,)+) => ( serde_json::to_value(($($arg_name,)+))?)
}

/// JSON-RPC 2.0 response envelope.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum RpcOutput {
    Failure { error: RpcFailure },
    Success { result: serde_json::Value },
}

#[derive(Deserialize, Debug)]
pub struct RpcFailure {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for RpcFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "code: {}, message: {}, data: {}", self.code, self.message, data),
            None => write!(f, "code: {}, message: {}", self.code, self.message),
        }
    }
}

jsonrpc!(pub struct IndexerRpcClient {
pub fn get_tip(&self) -> Option<Tip>;

pub fn get_cells(
    &self,
    search_key: SearchKey,
    order: Order,
    limit: Uint32,
    after: Option<JsonBytes>
) -> Pagination<Cell>;
});

impl IndexerRpcClient {
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct SearchKey {
    pub script: Script,
    pub script_type: ScriptType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<SearchKeyFilter>,
}

/// Ranges are `[start, end)`.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct SearchKeyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<Script>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_len_range: Option<[Uint64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_data_len_range: Option<[Uint64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_capacity_range: Option<[Uint64; 2]>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    Lock,
    Type,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Desc,
    Asc,
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Tip {
    pub block_hash: H256,
    pub block_number: BlockNumber,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    pub output: CellOutput,
    #[serde(default)]
    pub output_data: Option<JsonBytes>,
    pub out_point: OutPoint,
    pub block_number: BlockNumber,
    pub tx_index: Uint32,
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Pagination<T> {
    pub objects: Vec<T>,
    pub last_cursor: JsonBytes,
}
