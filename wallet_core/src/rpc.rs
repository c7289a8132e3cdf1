//! JSON-RPC 2.0 transport over HTTP.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::RpcError;

/// Default connection timeout for the endpoint.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP JSON-RPC client bound to a single endpoint URL.
///
/// Cheap to clone; clones share the connection pool and request id counter.
#[derive(Clone)]
pub struct JsonRpcTransport {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl JsonRpcTransport {
    /// Create a transport targeting `url` (e.g. `http://127.0.0.1:8545`).
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and decode its `result`.
    ///
    /// A `null` result decodes into `T` as-is, so callers polling for
    /// not-yet-available data should ask for an `Option<_>`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::trace!(%method, id, "json-rpc request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Transport(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    RpcError::Transport(format!("connection failed: {e}"))
                } else {
                    RpcError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("invalid JSON response: {e}")))?;

        decode_envelope(envelope)
    }
}

fn decode_envelope<T: DeserializeOwned>(envelope: RpcResponse) -> Result<T, RpcError> {
    if let Some(err) = envelope.error {
        return Err(RpcError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    let result = envelope.result.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse(e.to_string()))
}

/// Parse a `0x`-prefixed hex quantity (e.g. `eth_chainId`, block numbers).
pub fn parse_quantity(s: &str) -> Result<u64, RpcError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| RpcError::InvalidResponse(format!("invalid hex quantity {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: serde_json::Value) -> RpcResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn result_is_decoded() {
        let env = envelope(serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": "0x7a69"}));
        let chain: String = decode_envelope(env).unwrap();
        assert_eq!(parse_quantity(&chain).unwrap(), 31337);
    }

    #[test]
    fn error_object_wins() {
        let env = envelope(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 4001, "message": "User rejected the request."}
        }));
        let err = decode_envelope::<String>(env).unwrap_err();
        assert!(err.is_user_rejection());
    }

    #[test]
    fn null_result_decodes_into_option() {
        let env = envelope(serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": null}));
        let receipt: Option<serde_json::Value> = decode_envelope(env).unwrap();
        assert!(receipt.is_none());
    }

    #[test]
    fn wrong_result_shape_is_invalid_response() {
        let env = envelope(serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": 5}));
        let err = decode_envelope::<Vec<String>>(env).unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn quantity_parsing() {
        assert_eq!(parse_quantity("0x1").unwrap(), 1);
        assert_eq!(parse_quantity("ff").unwrap(), 255);
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn transport_creation() {
        let transport =
            JsonRpcTransport::new("http://127.0.0.1:8545", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.url(), "http://127.0.0.1:8545");
    }
}
