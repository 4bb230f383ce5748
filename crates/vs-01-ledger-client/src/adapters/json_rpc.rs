//! # JSON-RPC Adapter
//!
//! [`LedgerConnection`] over HTTP JSON-RPC 2.0, for local development nodes
//! and hosted gateways alike.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{quantity, Address, Bytes, Hash, TransactionReceipt, TransactionRequest, U256};
use tracing::{debug, trace};

use crate::errors::ConnectionError;
use crate::ports::outbound::LedgerConnection;

/// JSON-RPC error code nodes use for execution reverts.
pub const EXECUTION_ERROR_CODE: i64 = 3;

/// HTTP settings for [`JsonRpcConnection`].
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// JSON-RPC ledger client.
pub struct JsonRpcConnection {
    client: Client,
    url: String,
    request_id: AtomicU64,
}

impl JsonRpcConnection {
    /// Creates a client for `url` with default timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self, ConnectionError> {
        Self::with_settings(url, &HttpSettings::default())
    }

    /// Creates a client for `url`.
    pub fn with_settings(
        url: impl Into<String>,
        settings: &HttpSettings,
    ) -> Result<Self, ConnectionError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| ConnectionError::Transport {
                endpoint: redact_url(&url),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url,
            request_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Calls a JSON-RPC method and decodes its result.
    async fn request<R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<R, ConnectionError> {
        let id = self.next_id();
        trace!(method, id, "JSON-RPC request");
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let body: JsonRpcResponse = response.json().await.map_err(|e| {
            if status.is_success() {
                ConnectionError::Decode {
                    what: "JSON-RPC envelope",
                    message: e.to_string(),
                }
            } else {
                ConnectionError::Transport {
                    endpoint: self.endpoint(),
                    message: format!("HTTP {status}"),
                }
            }
        })?;

        if let Some(error) = body.error {
            debug!(method, code = error.code, message = %error.message, "JSON-RPC error");
            return Err(classify_error(error));
        }

        serde_json::from_value(body.result.unwrap_or(Value::Null)).map_err(|e| {
            ConnectionError::Decode {
                what: method,
                message: e.to_string(),
            }
        })
    }

    fn transport_error(&self, error: &reqwest::Error) -> ConnectionError {
        let message = if error.is_connect() {
            "cannot connect".to_string()
        } else if error.is_timeout() {
            "request timed out".to_string()
        } else {
            message_without_url(error)
        };
        ConnectionError::Transport {
            endpoint: self.endpoint(),
            message,
        }
    }
}

/// reqwest's message without the request URL, which may embed gateway
/// credentials.
fn message_without_url(error: &reqwest::Error) -> String {
    let message = error.to_string();
    match error.url() {
        Some(url) => message.replace(url.as_str(), "<endpoint>"),
        None => message,
    }
}

/// Strips path and query from `url`, which may carry credentials.
fn redact_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split(['/', '?']).next().unwrap_or(rest);
            format!("{scheme}://{host}")
        }
        None => "<endpoint>".to_string(),
    }
}

/// Maps a JSON-RPC error object to a [`ConnectionError`].
fn classify_error(error: JsonRpcError) -> ConnectionError {
    let revert_data = error.data.as_ref().and_then(find_revert_data);
    let is_revert = error.code == EXECUTION_ERROR_CODE
        || revert_data.is_some()
        || error.message.to_ascii_lowercase().contains("revert");

    if is_revert {
        ConnectionError::Execution {
            message: error.message,
            data: revert_data,
        }
    } else {
        ConnectionError::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}

/// Finds a hex revert payload in an error's `data`, which nodes nest
/// differently (`"0x.."`, `{"data": "0x.."}`, `{"originalError": {...}}`).
fn find_revert_data(value: &Value) -> Option<Bytes> {
    match value {
        Value::String(s) if s.starts_with("0x") && s.len() > 2 => s.parse().ok(),
        Value::Object(map) => map
            .get("data")
            .and_then(find_revert_data)
            .or_else(|| map.values().find_map(find_revert_data)),
        _ => None,
    }
}

fn parse_quantity_value(what: &'static str, value: &str) -> Result<u64, ConnectionError> {
    quantity::parse_quantity(value).map_err(|e| ConnectionError::Decode {
        what,
        message: e.to_string(),
    })
}

#[async_trait]
impl LedgerConnection for JsonRpcConnection {
    fn endpoint(&self) -> String {
        redact_url(&self.url)
    }

    async fn chain_id(&self) -> Result<u64, ConnectionError> {
        let value: String = self.request("eth_chainId", json!([])).await?;
        parse_quantity_value("eth_chainId", &value)
    }

    async fn block_number(&self) -> Result<u64, ConnectionError> {
        let value: String = self.request("eth_blockNumber", json!([])).await?;
        parse_quantity_value("eth_blockNumber", &value)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ConnectionError> {
        self.request("eth_accounts", json!([])).await
    }

    async fn get_balance(&self, address: Address) -> Result<U256, ConnectionError> {
        self.request("eth_getBalance", json!([address, "latest"])).await
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ConnectionError> {
        let value: String = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        parse_quantity_value("eth_getTransactionCount", &value)
    }

    async fn gas_price(&self) -> Result<U256, ConnectionError> {
        self.request("eth_gasPrice", json!([])).await
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, ConnectionError> {
        let value: String = self.request("eth_estimateGas", json!([request])).await?;
        parse_quantity_value("eth_estimateGas", &value)
    }

    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ConnectionError> {
        self.request("eth_call", json!([request, "latest"])).await
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<Hash, ConnectionError> {
        self.request("eth_sendTransaction", json!([request])).await
    }

    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<Hash, ConnectionError> {
        self.request("eth_sendRawTransaction", json!([raw])).await
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ConnectionError> {
        self.request("eth_getTransactionReceipt", json!([tx_hash]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::abi;

    fn rpc_error(value: Value) -> JsonRpcError {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_revert_with_top_level_data() {
        let payload = abi::encode_revert_reason("NotOwner");
        let err = classify_error(rpc_error(json!({
            "code": 3,
            "message": "execution reverted: NotOwner",
            "data": payload.to_hex(),
        })));
        assert_eq!(err.revert_data(), Some(&payload));
    }

    #[test]
    fn test_revert_with_nested_data() {
        let payload = abi::encode_revert_reason("NotOwner");
        let err = classify_error(rpc_error(json!({
            "code": -32603,
            "message": "Error: VM Exception while processing transaction",
            "data": { "message": "reverted", "data": payload.to_hex() },
        })));
        assert!(err.is_revert());
        assert_eq!(err.revert_data(), Some(&payload));
    }

    #[test]
    fn test_revert_message_without_data() {
        let err = classify_error(rpc_error(json!({
            "code": -32000,
            "message": "execution reverted",
        })));
        assert!(err.is_revert());
        assert!(err.revert_data().is_none());
    }

    #[test]
    fn test_other_errors_stay_rpc() {
        let err = classify_error(rpc_error(json!({
            "code": -32000,
            "message": "nonce too low",
        })));
        assert!(matches!(err, ConnectionError::Rpc { code: -32000, .. }));
    }

    #[test]
    fn test_endpoint_hides_credentials() {
        assert_eq!(
            redact_url("https://sepolia.infura.io/v3/secret-project-id"),
            "https://sepolia.infura.io"
        );
        assert_eq!(redact_url("http://localhost:8545"), "http://localhost:8545");
        assert_eq!(redact_url("garbage"), "<endpoint>");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let conn = JsonRpcConnection::with_settings(
            "http://127.0.0.1:1",
            &HttpSettings {
                request_timeout: Duration::from_secs(2),
                connect_timeout: Duration::from_secs(1),
            },
        )
        .unwrap();
        let err = conn.chain_id().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Transport { .. }));
    }

    // =========================================================================
    // CANNED NODE
    // =========================================================================

    const MINED_TX: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
    const STORE: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

    /// Answers as a development node holding one mined transaction.
    fn devnode(method: &str, params: &Value) -> Value {
        match method {
            "eth_chainId" => json!({ "result": "0x7a69" }),
            "eth_getBalance" => json!({ "result": "0x21e19e0c9bab2400000" }),
            "eth_getTransactionReceipt" if params[0] == MINED_TX => json!({
                "result": {
                    "transactionHash": MINED_TX,
                    "transactionIndex": "0x0",
                    "blockNumber": "0x2",
                    "blockHash": format!("0x{}", "22".repeat(32)),
                    "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                    "to": STORE,
                    "contractAddress": null,
                    "cumulativeGasUsed": "0x8b1c",
                    "gasUsed": "0x8b1c",
                    "effectiveGasPrice": "0x3b9aca00",
                    "status": "0x1",
                    "type": "0x0",
                    "logsBloom": format!("0x{}", "00".repeat(256)),
                    "logs": [{
                        "address": STORE,
                        "topics": [format!("0x{}", "33".repeat(32))],
                        "data": "0x",
                        "blockNumber": "0x2",
                        "transactionHash": MINED_TX,
                        "logIndex": "0x0",
                        "removed": false,
                    }],
                }
            }),
            "eth_getTransactionReceipt" => json!({ "result": null }),
            "eth_call" => json!({
                "error": {
                    "code": 3,
                    "message": "execution reverted: NotOwner",
                    "data": abi::encode_revert_reason("NotOwner").to_hex(),
                }
            }),
            _ => json!({ "error": { "code": -32601, "message": "method not found" } }),
        }
    }

    /// Serves `answer` over HTTP/1.1 on an ephemeral port and returns its URL.
    async fn serve(answer: fn(&str, &Value) -> Value) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_connection(stream, answer));
            }
        });
        format!("http://{addr}")
    }

    async fn serve_connection(
        mut stream: tokio::net::TcpStream,
        answer: fn(&str, &Value) -> Value,
    ) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let header_end = loop {
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            };
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < header_end + length {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }

            let body = &buf[header_end..header_end + length];
            let request: Value = serde_json::from_slice(body).unwrap();
            buf.drain(..header_end + length);

            let method = request["method"].as_str().unwrap_or_default();
            let mut reply = answer(method, &request["params"]);
            reply["jsonrpc"] = json!("2.0");
            reply["id"] = request["id"].clone();
            let body = reply.to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{body}",
                body.len()
            );
            if stream.write_all(response.as_bytes()).await.is_err() {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_decodes_node_answers() {
        let conn = JsonRpcConnection::new(serve(devnode).await).unwrap();

        assert_eq!(conn.chain_id().await.unwrap(), 31337);
        let balance = conn.get_balance(STORE.parse().unwrap()).await.unwrap();
        assert_eq!(balance, shared_types::ether(10_000));
    }

    #[tokio::test]
    async fn test_receipt_pending_and_mined() {
        let conn = JsonRpcConnection::new(serve(devnode).await).unwrap();

        let pending = conn
            .get_transaction_receipt(Hash::new([0x44; 32]))
            .await
            .unwrap();
        assert!(pending.is_none());

        let receipt = conn
            .get_transaction_receipt(MINED_TX.parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(receipt.succeeded());
        assert_eq!(receipt.block_number, 2);
        assert_eq!(receipt.to, Some(STORE.parse().unwrap()));
        assert!(receipt.contract_address.is_none());
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].address, STORE.parse().unwrap());
        assert_eq!(receipt.logs[0].log_index, Some(0));
    }

    #[tokio::test]
    async fn test_reverted_call_carries_reason() {
        let conn = JsonRpcConnection::new(serve(devnode).await).unwrap();
        let request = TransactionRequest::call(STORE.parse().unwrap(), Bytes::from(vec![0x01]));

        let err = conn.call(&request).await.unwrap_err();
        match err {
            ConnectionError::Execution { ref message, ref data } => {
                assert_eq!(message, "execution reverted: NotOwner");
                let data = data.as_ref().unwrap();
                assert_eq!(
                    abi::decode_revert_reason(data.as_slice()).as_deref(),
                    Some("NotOwner")
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
