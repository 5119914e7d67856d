//! JSON-RPC 2.0 message types and `Content-Length` framing.
//!
//! Every message on the wire is a header block followed by a UTF-8 JSON body:
//!
//! ```text
//! Content-Length: <N>\r\n
//! \r\n
//! <N bytes of JSON>
//! ```
//!
//! Headers other than `Content-Length` are ignored.

use crate::config::SyncConfig;
use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC error code for an unknown method.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Outbound or inbound JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::Number(id.into()),
            method: method.into(),
            params: Some(params),
        }
    }
}

/// JSON-RPC notification (no id, no response).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcNotification {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: Some(params),
        }
    }
}

/// JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

impl RpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }

    /// The numeric id this response answers, if it has one.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.as_ref().and_then(Value::as_u64)
    }

    /// Convert into the call result. A missing result is `null`.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(LibraryError::Rpc {
                code: err.code,
                message: err.message,
            }),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A message received from the peer, classified by shape.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    Response(RpcResponse),
    Notification(RpcNotification),
    Request(RpcRequest),
}

impl IncomingMessage {
    /// Classify a message body: `method` with `id` is a request, `method`
    /// alone a notification, anything else a response.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        let has_method = value.get("method").is_some();
        let has_id = value.get("id").is_some_and(|id| !id.is_null());

        let message = match (has_method, has_id) {
            (true, true) => IncomingMessage::Request(serde_json::from_value(value)?),
            (true, false) => IncomingMessage::Notification(serde_json::from_value(value)?),
            (false, _) => IncomingMessage::Response(serde_json::from_value(value)?),
        };
        Ok(message)
    }
}

/// Read one framed message body.
///
/// Returns `None` on clean EOF before any header byte.
pub async fn read_message<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut content_length: Option<usize> = None;
    let mut line = String::new();
    let mut first = true;

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            if first {
                return Ok(None);
            }
            return Err(protocol_error("Unexpected end of stream in message header"));
        }
        first = false;

        let header = line.trim();
        if header.is_empty() {
            break;
        }

        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("Content-Length") {
                let len = value.trim().parse::<usize>().map_err(|_| {
                    protocol_error(format!("Invalid Content-Length: {}", value.trim()))
                })?;
                content_length = Some(len);
            }
        }
    }

    let len = content_length.ok_or_else(|| protocol_error("Missing Content-Length header"))?;
    if len > SyncConfig::MAX_MESSAGE_SIZE {
        return Err(protocol_error(format!(
            "Message size {} exceeds maximum {}",
            len,
            SyncConfig::MAX_MESSAGE_SIZE
        )));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

/// Write one framed message body.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, body: &[u8]) -> Result<()> {
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    Ok(())
}

/// Serialize `message` and write it framed.
pub async fn write_json<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let body = serde_json::to_vec(message)?;
    write_message(writer, &body).await
}

fn protocol_error(message: impl Into<String>) -> LibraryError {
    LibraryError::Protocol {
        message: message.into(),
    }
}
