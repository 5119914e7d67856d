//! JSON-RPC client over a pair of byte streams.
//!
//! Requests get increasing integer ids. A background reader task routes each
//! response to the caller awaiting that id, so responses may arrive in any
//! order. Inbound notifications go to a callback; inbound requests are
//! answered with `Method not found`.
//!
//! # Thread Safety
//!
//! The writer sits behind a tokio `Mutex` so whole messages are never
//! interleaved. The pending-request map is the only other shared state and
//! its lock is never held across an await.

use super::protocol::{
    read_message, write_json, IncomingMessage, RpcNotification, RpcRequest, RpcResponse,
    METHOD_NOT_FOUND,
};
use crate::error::{LibraryError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;
type PendingMap = HashMap<u64, oneshot::Sender<Result<Value>>>;

/// Shared state between the client handle and its reader task.
struct Shared {
    writer: Mutex<BoxedWriter>,
    pending: std::sync::Mutex<PendingMap>,
    closed: AtomicBool,
}

impl Shared {
    fn take_pending(&self, id: u64) -> Option<oneshot::Sender<Result<Value>>> {
        self.pending.lock().ok()?.remove(&id)
    }

    /// Mark the channel closed and fail every in-flight request.
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Ok(mut pending) = self.pending.lock() {
            for (_, tx) in pending.drain() {
                let _ = tx.send(Err(LibraryError::ChannelClosed));
            }
        }
    }
}

/// JSON-RPC client bound to one peer.
pub struct RpcClient {
    shared: Arc<Shared>,
    next_id: AtomicU64,
    reader_task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl RpcClient {
    /// Start a client over `reader`/`writer`.
    ///
    /// `on_notification` runs on the reader task for every inbound
    /// notification.
    pub fn start<R, W, F>(reader: R, writer: W, on_notification: F) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
        F: Fn(RpcNotification) + Send + 'static,
    {
        let shared = Arc::new(Shared {
            writer: Mutex::new(Box::new(writer)),
            pending: std::sync::Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        });

        let task_shared = Arc::clone(&shared);
        let reader_task = tokio::spawn(async move {
            read_loop(BufReader::new(reader), &task_shared, on_notification).await;
            task_shared.close();
        });

        Self {
            shared,
            next_id: AtomicU64::new(1),
            reader_task: std::sync::Mutex::new(Some(reader_task)),
        }
    }

    /// Whether the peer has gone away or the client was shut down.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Send a request and wait up to `timeout` for its response.
    pub async fn request(&self, method: &str, params: Value, timeout: Duration) -> Result<Value> {
        if self.is_closed() {
            return Err(LibraryError::ChannelClosed);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.shared
            .pending
            .lock()
            .map_err(|_| LibraryError::ChannelClosed)?
            .insert(id, tx);

        let request = RpcRequest::new(method, params, id);
        debug!("Sending request {} ({})", id, method);
        if let Err(e) = self.write(&request).await {
            self.shared.take_pending(id);
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(LibraryError::ChannelClosed),
            Err(_) => {
                self.shared.take_pending(id);
                Err(LibraryError::Timeout(timeout))
            }
        }
    }

    /// Send a notification.
    pub async fn notify(&self, method: &str, params: Value) -> Result<()> {
        if self.is_closed() {
            return Err(LibraryError::ChannelClosed);
        }
        debug!("Sending notification {}", method);
        self.write(&RpcNotification::new(method, params)).await
    }

    /// Stop the reader task, fail in-flight requests and close the writer.
    pub async fn shutdown(&self) {
        if let Some(task) = self.reader_task.lock().ok().and_then(|mut t| t.take()) {
            task.abort();
        }
        self.shared.close();
        let mut writer = self.shared.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            debug!("Error closing analysis service stream: {}", e);
        }
    }

    async fn write<T: serde::Serialize>(&self, message: &T) -> Result<()> {
        let mut writer = self.shared.writer.lock().await;
        write_json(&mut *writer, message).await
    }
}

impl Drop for RpcClient {
    fn drop(&mut self) {
        if let Some(task) = self.reader_task.get_mut().ok().and_then(Option::take) {
            task.abort();
        }
    }
}

async fn read_loop<R, F>(mut reader: BufReader<R>, shared: &Shared, on_notification: F)
where
    R: AsyncRead + Unpin,
    F: Fn(RpcNotification),
{
    loop {
        let body = match read_message(&mut reader).await {
            Ok(Some(body)) => body,
            Ok(None) => {
                debug!("Analysis service closed the connection");
                return;
            }
            Err(e) => {
                warn!("Failed to read from analysis service: {}", e);
                return;
            }
        };

        match IncomingMessage::parse(&body) {
            Ok(IncomingMessage::Response(response)) => route_response(shared, response),
            Ok(IncomingMessage::Notification(notification)) => on_notification(notification),
            Ok(IncomingMessage::Request(request)) => {
                debug!("Rejecting inbound request {}", request.method);
                let reply = RpcResponse::error(
                    Some(request.id),
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", request.method),
                );
                let mut writer = shared.writer.lock().await;
                if let Err(e) = write_json(&mut *writer, &reply).await {
                    warn!("Failed to answer inbound request: {}", e);
                }
            }
            Err(e) => warn!("Ignoring malformed message from analysis service: {}", e),
        }
    }
}

fn route_response(shared: &Shared, response: RpcResponse) {
    let Some(id) = response.numeric_id() else {
        warn!("Ignoring response without a numeric id");
        return;
    };
    match shared.take_pending(id) {
        Some(tx) => {
            let _ = tx.send(response.into_result());
        }
        None => debug!("Dropping response for unknown or expired request {}", id),
    }
}
