//! Synchronization with the external analysis service.
//!
//! The editor side is the source of truth for which libraries exist. After
//! every successful registry change the service is told about it once
//! (`library/add`, `library/remove`); it may answer with informational
//! confirmations (`library/added`, `library/removed`). Completions and
//! diagnostics are plain requests.
//!
//! Request failures of any kind degrade to empty results: they are logged,
//! never surfaced and never sticky.

pub mod client;
pub mod diagnostics;
pub mod messages;
pub mod protocol;

pub use client::RpcClient;
pub use diagnostics::DiagnosticsTracker;
pub use messages::{
    CompletionCandidate, Confirmation, Diagnostic, DiagnosticSeverity, Position, Range,
};

use crate::config::SyncConfig;
use crate::error::{LibraryError, Result};
use crate::library::Library;
use messages::{
    CheckErrorsParams, CompletionParams, LibraryAddParams, LibraryRemoveParams,
    TextDocumentIdentifier,
};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Channel to one analysis service instance.
pub struct SyncChannel {
    client: RpcClient,
    diagnostics: DiagnosticsTracker,
    request_timeout: Duration,
}

impl SyncChannel {
    /// Start a channel over an established byte stream pair.
    ///
    /// Confirmations pushed by the service arrive on the returned receiver.
    pub fn connect<R, W>(reader: R, writer: W) -> (Self, mpsc::UnboundedReceiver<Confirmation>)
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = RpcClient::start(reader, writer, move |notification| {
            match Confirmation::from_notification(&notification.method, notification.params) {
                Some(confirmation) => {
                    debug!("Received confirmation {:?}", confirmation);
                    let _ = tx.send(confirmation);
                }
                None => debug!("Ignoring notification {}", notification.method),
            }
        });

        let channel = Self {
            client,
            diagnostics: DiagnosticsTracker::new(),
            request_timeout: SyncConfig::REQUEST_TIMEOUT,
        };
        (channel, rx)
    }

    /// Connect to a service listening on TCP.
    pub async fn connect_tcp<A: ToSocketAddrs>(
        addr: A,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Confirmation>)> {
        let stream = tokio::time::timeout(SyncConfig::CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| LibraryError::Timeout(SyncConfig::CONNECT_TIMEOUT))??;

        if let Ok(peer) = stream.peer_addr() {
            info!("Connected to analysis service at {}", peer);
        }

        let (reader, writer) = stream.into_split();
        Ok(Self::connect(reader, writer))
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }

    /// Tell the service a library was registered.
    pub async fn library_added(&self, library: &Library) -> Result<()> {
        let params = serde_json::to_value(LibraryAddParams::from(library))?;
        self.client.notify(messages::LIBRARY_ADD, params).await
    }

    /// Tell the service a library was unregistered.
    pub async fn library_removed(&self, library: &Library) -> Result<()> {
        let params = serde_json::to_value(LibraryRemoveParams::from(library))?;
        self.client.notify(messages::LIBRARY_REMOVE, params).await
    }

    /// Completion candidates at `position` in `uri`; empty on any failure.
    pub async fn completions_at(&self, uri: &str, position: Position) -> Vec<CompletionCandidate> {
        match self.request_completions(uri, position).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Completion request for {} failed: {}", uri, e);
                Vec::new()
            }
        }
    }

    /// Diagnostics for `uri`; empty on any failure.
    pub async fn diagnostics_for(&self, uri: &str) -> Vec<Diagnostic> {
        match self.request_diagnostics(uri).await {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                warn!("Diagnostics request for {} failed: {}", uri, e);
                Vec::new()
            }
        }
    }

    /// Diagnostics for `uri`, or `None` if a newer check of the same
    /// document started while this one was in flight.
    pub async fn check_document(&self, uri: &str) -> Option<Vec<Diagnostic>> {
        let seq = self.diagnostics.begin(uri);
        let diagnostics = self.diagnostics_for(uri).await;
        if self.diagnostics.finish(uri, seq) {
            Some(diagnostics)
        } else {
            debug!("Discarding superseded diagnostics for {}", uri);
            None
        }
    }

    /// Close the channel. In-flight requests resolve to empty results.
    pub async fn shutdown(&self) {
        self.client.shutdown().await;
        info!("Analysis service channel closed");
    }

    async fn request_completions(
        &self,
        uri: &str,
        position: Position,
    ) -> Result<Vec<CompletionCandidate>> {
        let params = serde_json::to_value(CompletionParams {
            text_document: TextDocumentIdentifier {
                uri: uri.to_string(),
            },
            position,
        })?;
        let result = self
            .client
            .request(messages::COMPLETIONS, params, self.request_timeout)
            .await
            .map_err(|e| e.into_request_failed(messages::COMPLETIONS))?;
        messages::parse_completions(result).map_err(|e| LibraryError::RequestFailed {
            method: messages::COMPLETIONS.to_string(),
            message: format!("Malformed result: {}", e),
        })
    }

    async fn request_diagnostics(&self, uri: &str) -> Result<Vec<Diagnostic>> {
        let params = serde_json::to_value(CheckErrorsParams {
            text_document: TextDocumentIdentifier {
                uri: uri.to_string(),
            },
        })?;
        let result = self
            .client
            .request(messages::CHECK_ERRORS, params, self.request_timeout)
            .await
            .map_err(|e| e.into_request_failed(messages::CHECK_ERRORS))?;
        messages::parse_diagnostics(result).map_err(|e| LibraryError::RequestFailed {
            method: messages::CHECK_ERRORS.to_string(),
            message: format!("Malformed result: {}", e),
        })
    }
}
