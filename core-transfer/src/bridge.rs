//! # File Transfer Bridge
//!
//! Entry point for upload/download commands. The bridge validates each
//! command, registers a [`TransferDelegate`] under the command's object id,
//! spawns a task that drives the HTTP transfer against the secure container,
//! and hands back a typed event channel. Exactly one terminal event is
//! emitted per transfer: the delegate's state machine arbitrates races
//! between cancellation and completion, and the registry entry is removed
//! before the terminal event is sent.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, COOKIE,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method, StatusCode};
use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use bridge_traits::{KeepAliveProvider, SecureFileAccess};

use crate::command::{split_cookie_header, DownloadCommand, ObjectId, UploadCommand, UploadMethod};
use crate::delegate::{SharedDelegate, TransferDelegate, TransferDirection};
use crate::error::{FileTransferError, Result, TransferErrorCode};
use crate::events::TransferEvent;
use crate::probe::probe_entity_length;
use crate::registry::{ActiveTransfer, TransferRegistry};

const USER_AGENT: &str = "secure-transfer-core/0.1.0";

/// Handle returned to the host for one started transfer.
#[derive(Debug)]
pub struct TransferHandle {
    pub object_id: ObjectId,
    /// Live view of the transfer's state record
    pub delegate: SharedDelegate,
    /// Callback channel; ends with exactly one terminal event
    pub events: UnboundedReceiver<TransferEvent>,
}

/// Upload/download bridge over the secure container.
///
/// Cheap to clone; all state is behind `Arc`s and spawned transfer tasks
/// hold their own clone.
#[derive(Clone)]
pub struct FileTransferBridge {
    client: Client,
    trust_all_client: Client,
    container: Arc<dyn SecureFileAccess>,
    keep_alive: Arc<dyn KeepAliveProvider>,
    registry: Arc<TransferRegistry>,
}

impl FileTransferBridge {
    /// Create a bridge with default HTTP clients.
    pub fn new(
        container: Arc<dyn SecureFileAccess>,
        keep_alive: Arc<dyn KeepAliveProvider>,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        // Only ever used when a command sets trust_all_hosts.
        let trust_all_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to build HTTP client");

        Self::with_clients(client, trust_all_client, container, keep_alive)
    }

    /// Create a bridge with caller-supplied HTTP clients.
    pub fn with_clients(
        client: Client,
        trust_all_client: Client,
        container: Arc<dyn SecureFileAccess>,
        keep_alive: Arc<dyn KeepAliveProvider>,
    ) -> Self {
        Self {
            client,
            trust_all_client,
            container,
            keep_alive,
            registry: Arc::new(TransferRegistry::new()),
        }
    }

    fn client_for(&self, trust_all_hosts: bool) -> &Client {
        if trust_all_hosts {
            &self.trust_all_client
        } else {
            &self.client
        }
    }

    /// Number of transfers currently in flight.
    pub async fn active_transfers(&self) -> usize {
        self.registry.len().await
    }

    /// Whether a transfer with this object id is in flight.
    pub async fn is_active(&self, object_id: &ObjectId) -> bool {
        self.registry.contains(object_id).await
    }

    /// Start an upload.
    ///
    /// Validation failures (unreadable source, malformed target URL, object
    /// id already in use) are returned directly; everything after the
    /// transfer starts arrives on the handle's event channel.
    pub async fn upload(&self, cmd: UploadCommand) -> Result<TransferHandle> {
        let url = parse_transfer_url(&cmd.target, &cmd.source, &cmd.target)?;

        let metadata = self
            .container
            .metadata(Path::new(&cmd.source))
            .await
            .map_err(|err| {
                FileTransferError::new(TransferErrorCode::FileNotFound, &cmd.source, &cmd.target)
                    .with_exception(err.to_string())
            })?;
        if metadata.is_directory {
            return Err(FileTransferError::new(
                TransferErrorCode::FileNotFound,
                &cmd.source,
                &cmd.target,
            )
            .into());
        }

        let delegate = SharedDelegate::new(TransferDelegate::new(
            cmd.object_id.clone(),
            TransferDirection::Upload,
            &cmd.source,
            &cmd.target,
        ));
        if metadata.size > 0 {
            delegate.lock().update_bytes_expected(metadata.size)?;
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        self.registry
            .register(
                cmd.object_id.clone(),
                ActiveTransfer {
                    delegate: delegate.clone(),
                    cancel: cancel.clone(),
                    events: events_tx.clone(),
                },
            )
            .await?;

        debug!(
            object_id = %cmd.object_id,
            source = %cmd.source,
            target = %cmd.target,
            chunked = cmd.chunked_mode,
            "Starting upload"
        );

        let bridge = self.clone();
        let object_id = cmd.object_id.clone();
        let task_delegate = delegate.clone();
        tokio::spawn(async move {
            bridge
                .run_upload(cmd, url, metadata.size, task_delegate, cancel, events_tx)
                .await;
        });

        Ok(TransferHandle {
            object_id,
            delegate,
            events: events_rx,
        })
    }

    /// Start a download.
    pub async fn download(&self, cmd: DownloadCommand) -> Result<TransferHandle> {
        let url = parse_transfer_url(&cmd.source, &cmd.source, &cmd.target)?;

        let delegate = SharedDelegate::new(TransferDelegate::new(
            cmd.object_id.clone(),
            TransferDirection::Download,
            &cmd.source,
            &cmd.target,
        ));

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        self.registry
            .register(
                cmd.object_id.clone(),
                ActiveTransfer {
                    delegate: delegate.clone(),
                    cancel: cancel.clone(),
                    events: events_tx.clone(),
                },
            )
            .await?;

        debug!(
            object_id = %cmd.object_id,
            source = %cmd.source,
            target = %cmd.target,
            "Starting download"
        );

        let bridge = self.clone();
        let object_id = cmd.object_id.clone();
        let task_delegate = delegate.clone();
        tokio::spawn(async move {
            bridge
                .run_download(cmd, url, task_delegate, cancel, events_tx)
                .await;
        });

        Ok(TransferHandle {
            object_id,
            delegate,
            events: events_rx,
        })
    }

    /// Cancel an in-flight transfer by object id.
    ///
    /// The CONNECTION_ABORTED event is emitted immediately; the transfer
    /// task observes the cancellation token and cleans up its network task
    /// and any partially written file. Aborting an unknown or already
    /// finished transfer is a no-op.
    pub async fn abort(&self, object_id: &ObjectId) -> Result<()> {
        let Some(active) = self.registry.remove(object_id).await else {
            debug!(object_id = %object_id, "Abort requested for unknown or finished transfer");
            return Ok(());
        };

        active.cancel.cancel();

        let payload = {
            let mut delegate = active.delegate.lock();
            let source = delegate.source.clone();
            let target = delegate.target.clone();
            delegate
                .cancel()
                .is_ok()
                .then(|| FileTransferError::new(TransferErrorCode::Aborted, source, target))
        };

        if let Some(payload) = payload {
            debug!(object_id = %object_id, "Transfer aborted");
            let _ = active.events.send(TransferEvent::Failed(payload));
        }

        Ok(())
    }

    async fn run_upload(
        &self,
        cmd: UploadCommand,
        url: Url,
        file_size: u64,
        delegate: SharedDelegate,
        cancel: CancellationToken,
        events: UnboundedSender<TransferEvent>,
    ) {
        let _lease = match self
            .keep_alive
            .acquire(&format!("upload:{}", cmd.object_id))
            .await
        {
            Ok(lease) => Some(lease),
            Err(err) => {
                warn!(error = %err, "Keep-alive lease unavailable; continuing without one");
                None
            }
        };

        if cancel.is_cancelled() {
            self.finish_cancelled(&cmd.object_id, &delegate, &events).await;
            return;
        }
        if delegate.lock().start().is_err() {
            // Abort won the race before any I/O happened.
            return;
        }

        let (plain_headers, cookie) = split_cookie_header(&cmd.headers);
        let header_map = match build_header_map(&plain_headers, cookie.as_deref(), &cmd.source, &cmd.target)
        {
            Ok(map) => map,
            Err(error) => {
                self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                return;
            }
        };
        let explicit_content_type = plain_headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("content-type"));

        let reader = match self.container.open_read_stream(Path::new(&cmd.source)).await {
            Ok(reader) => reader,
            Err(err) => {
                let error = FileTransferError::new(
                    TransferErrorCode::FileNotFound,
                    &cmd.source,
                    &cmd.target,
                )
                .with_exception(err.to_string());
                self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                return;
            }
        };
        let progress = ProgressStream::new(ReaderStream::new(reader), delegate.clone(), events.clone());

        let method = match cmd.http_method {
            UploadMethod::Post => Method::POST,
            UploadMethod::Put => Method::PUT,
        };
        let mut request = self
            .client_for(cmd.trust_all_hosts)
            .request(method, url)
            .headers(header_map)
            .header("X-Requested-With", "XMLHttpRequest");

        if explicit_content_type {
            // An explicit Content-Type means the caller wants the file bytes
            // as the raw request body, not a multipart form.
            if cmd.chunked_mode {
                request = request.body(Body::wrap_stream(progress));
            } else {
                // Buffer so the request declares a Content-Length.
                let mut progress = progress;
                let mut buffered: Vec<u8> = Vec::with_capacity(file_size as usize);
                while let Some(chunk) = progress.next().await {
                    match chunk {
                        Ok(bytes) => buffered.extend_from_slice(&bytes),
                        Err(err) => {
                            let error = FileTransferError::new(
                                TransferErrorCode::Connection,
                                &cmd.source,
                                &cmd.target,
                            )
                            .with_exception(err.to_string());
                            self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                            return;
                        }
                    }
                }
                let length = buffered.len() as u64;
                request = request.header(CONTENT_LENGTH, length).body(buffered);
            }
        } else {
            let body = Body::wrap_stream(progress);
            let part = if cmd.chunked_mode {
                Part::stream(body)
            } else {
                Part::stream_with_length(body, file_size)
            };
            let part = match part.file_name(cmd.file_name.clone()).mime_str(&cmd.mime_type) {
                Ok(part) => part,
                Err(err) => {
                    let error = FileTransferError::new(
                        TransferErrorCode::Connection,
                        &cmd.source,
                        &cmd.target,
                    )
                    .with_exception(err.to_string());
                    self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                    return;
                }
            };

            let mut form = Form::new();
            for (key, value) in &cmd.params {
                form = form.text(key.clone(), value.clone());
            }
            form = form.part(cmd.file_key.clone(), part);
            request = request.multipart(form);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => {
                self.finish_cancelled(&cmd.object_id, &delegate, &events).await;
                return;
            }
            result = request.send() => result,
        };
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                let error = connection_payload(&err, &cmd.source, &cmd.target);
                self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                return;
            }
        };

        let status = response.status();
        let response_headers = headers_to_map(response.headers());
        let mime_type = content_type_of(response.headers());
        delegate
            .lock()
            .set_response(status.as_u16(), response_headers, mime_type);

        let body_text = tokio::select! {
            _ = cancel.cancelled() => {
                self.finish_cancelled(&cmd.object_id, &delegate, &events).await;
                return;
            }
            text = response.text() => text.unwrap_or_default(),
        };

        if status.is_success() {
            let bytes_sent = delegate.lock().bytes_transferred;
            self.registry.remove(&cmd.object_id).await;
            if delegate.lock().complete().is_ok() {
                debug!(object_id = %cmd.object_id, bytes_sent, "Upload completed");
                let _ = events.send(TransferEvent::UploadCompleted {
                    response_code: status.as_u16(),
                    bytes_sent,
                    response: body_text,
                });
            }
        } else {
            // 401 is reported as a URL problem, matching the host contract.
            let code = if status == StatusCode::UNAUTHORIZED {
                TransferErrorCode::InvalidUrl
            } else {
                TransferErrorCode::Connection
            };
            let error = FileTransferError::new(code, &cmd.source, &cmd.target)
                .with_http_status(status.as_u16())
                .with_body(body_text);
            self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
        }
    }

    async fn run_download(
        &self,
        cmd: DownloadCommand,
        url: Url,
        delegate: SharedDelegate,
        cancel: CancellationToken,
        events: UnboundedSender<TransferEvent>,
    ) {
        let _lease = match self
            .keep_alive
            .acquire(&format!("download:{}", cmd.object_id))
            .await
        {
            Ok(lease) => Some(lease),
            Err(err) => {
                warn!(error = %err, "Keep-alive lease unavailable; continuing without one");
                None
            }
        };

        if cancel.is_cancelled() {
            self.finish_cancelled(&cmd.object_id, &delegate, &events).await;
            return;
        }
        if delegate.lock().start().is_err() {
            return;
        }

        let (plain_headers, cookie) = split_cookie_header(&cmd.headers);
        let mut header_map = match build_header_map(&plain_headers, cookie.as_deref(), &cmd.source, &cmd.target)
        {
            Ok(map) => map,
            Err(error) => {
                self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                return;
            }
        };
        header_map.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let client = self.client_for(cmd.trust_all_hosts);
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                self.finish_cancelled(&cmd.object_id, &delegate, &events).await;
                return;
            }
            result = client.get(url.clone()).headers(header_map.clone()).send() => result,
        };
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                let error = connection_payload(&err, &cmd.source, &cmd.target);
                self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                return;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            let error = FileTransferError::new(
                TransferErrorCode::NotModified,
                &cmd.source,
                &cmd.target,
            )
            .with_http_status(status.as_u16());
            self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
            return;
        }
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let code = if status == StatusCode::NOT_FOUND {
                TransferErrorCode::FileNotFound
            } else {
                TransferErrorCode::Connection
            };
            let error = FileTransferError::new(code, &cmd.source, &cmd.target)
                .with_http_status(status.as_u16())
                .with_body(body_text);
            self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
            return;
        }

        let response_headers = headers_to_map(response.headers());
        let mime_type = content_type_of(response.headers());
        delegate
            .lock()
            .set_response(status.as_u16(), response_headers, mime_type);

        match response.content_length() {
            Some(length) => {
                let _ = delegate.lock().update_bytes_expected(length);
            }
            None => {
                // Chunked or transformed body: resolve the total separately.
                if let Some(length) = probe_entity_length(client, url.clone(), header_map).await {
                    let _ = delegate.lock().update_bytes_expected(length);
                }
            }
        }

        let mut writer = match self.container.open_write_stream(Path::new(&cmd.target)).await {
            Ok(writer) => writer,
            Err(err) => {
                let error = FileTransferError::new(
                    TransferErrorCode::FileNotFound,
                    &cmd.source,
                    &cmd.target,
                )
                .with_exception(err.to_string());
                self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                return;
            }
        };

        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;
        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => {
                    drop(writer);
                    self.remove_partial(&cmd.target).await;
                    self.finish_cancelled(&cmd.object_id, &delegate, &events).await;
                    return;
                }
                chunk = stream.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    if let Err(err) = writer.write_all(&bytes).await {
                        drop(writer);
                        self.remove_partial(&cmd.target).await;
                        let error = FileTransferError::new(
                            TransferErrorCode::Connection,
                            &cmd.source,
                            &cmd.target,
                        )
                        .with_exception(err.to_string());
                        self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                        return;
                    }
                    bytes_written += bytes.len() as u64;

                    let progress = {
                        let mut d = delegate.lock();
                        d.record_progress(bytes_written).map(|_| d.bytes_expected)
                    };
                    match progress {
                        Ok(bytes_expected) => {
                            let _ = events.send(TransferEvent::Progress {
                                bytes_transferred: bytes_written,
                                bytes_expected,
                            });
                        }
                        Err(err) => {
                            drop(writer);
                            self.remove_partial(&cmd.target).await;
                            let error = FileTransferError::new(
                                TransferErrorCode::Connection,
                                &cmd.source,
                                &cmd.target,
                            )
                            .with_exception(err.to_string());
                            self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                            return;
                        }
                    }
                }
                Some(Err(err)) => {
                    drop(writer);
                    self.remove_partial(&cmd.target).await;
                    let error = connection_payload(&err, &cmd.source, &cmd.target);
                    self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
                    return;
                }
                None => break,
            }
        }

        if let Err(err) = writer.shutdown().await {
            self.remove_partial(&cmd.target).await;
            let error =
                FileTransferError::new(TransferErrorCode::Connection, &cmd.source, &cmd.target)
                    .with_exception(err.to_string());
            self.finish_failed(&cmd.object_id, &delegate, &events, error).await;
            return;
        }
        drop(writer);

        self.registry.remove(&cmd.object_id).await;
        if delegate.lock().complete().is_ok() {
            debug!(object_id = %cmd.object_id, bytes_written, "Download completed");
            let _ = events.send(TransferEvent::DownloadCompleted {
                response_code: status.as_u16(),
                bytes_written,
                target: cmd.target.clone(),
            });
        } else {
            // Abort won the race at the finish line; honor it.
            self.remove_partial(&cmd.target).await;
        }
    }

    /// Fail the transfer and emit its terminal event, unless another
    /// terminal event already won.
    async fn finish_failed(
        &self,
        object_id: &ObjectId,
        delegate: &SharedDelegate,
        events: &UnboundedSender<TransferEvent>,
        error: FileTransferError,
    ) {
        self.registry.remove(object_id).await;
        if delegate.lock().fail(error.clone()).is_ok() {
            warn!(object_id = %object_id, code = %error.code, "Transfer failed");
            let _ = events.send(TransferEvent::Failed(error));
        } else {
            debug!(object_id = %object_id, "Suppressing terminal event; transfer already finished");
        }
    }

    /// Cancel the transfer from inside the task, if abort has not already
    /// emitted the terminal event.
    async fn finish_cancelled(
        &self,
        object_id: &ObjectId,
        delegate: &SharedDelegate,
        events: &UnboundedSender<TransferEvent>,
    ) {
        self.registry.remove(object_id).await;
        let payload = {
            let mut d = delegate.lock();
            let source = d.source.clone();
            let target = d.target.clone();
            d.cancel()
                .is_ok()
                .then(|| FileTransferError::new(TransferErrorCode::Aborted, source, target))
        };
        if let Some(payload) = payload {
            let _ = events.send(TransferEvent::Failed(payload));
        }
    }

    async fn remove_partial(&self, target: &str) {
        if let Err(err) = self.container.delete_file(Path::new(target)).await {
            debug!(target, error = %err, "Could not remove partial download");
        }
    }
}

/// Validate a transfer URL; only http/https are supported.
fn parse_transfer_url(raw: &str, source: &str, target: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|err| {
        FileTransferError::new(TransferErrorCode::InvalidUrl, source, target)
            .with_exception(err.to_string())
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(
            FileTransferError::new(TransferErrorCode::InvalidUrl, source, target)
                .with_exception(format!("unsupported scheme: {}", url.scheme()))
                .into(),
        );
    }
    Ok(url)
}

fn build_header_map(
    headers: &HashMap<String, String>,
    cookie: Option<&str>,
    source: &str,
    target: &str,
) -> std::result::Result<HeaderMap, FileTransferError> {
    let invalid = |err: String| {
        FileTransferError::new(TransferErrorCode::Connection, source, target).with_exception(err)
    };

    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| invalid(format!("invalid header name {:?}: {}", name, err)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| invalid(format!("invalid header value for {}: {}", name, err)))?;
        map.insert(name, value);
    }
    if let Some(cookie) = cookie {
        let value = HeaderValue::from_str(cookie)
            .map_err(|err| invalid(format!("invalid cookie value: {}", err)))?;
        map.insert(COOKIE, value);
    }
    Ok(map)
}

fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
        .collect()
}

fn content_type_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn connection_payload(err: &reqwest::Error, source: &str, target: &str) -> FileTransferError {
    let mut payload = FileTransferError::new(TransferErrorCode::Connection, source, target)
        .with_exception(err.to_string());
    if let Some(status) = err.status() {
        payload = payload.with_http_status(status.as_u16());
    }
    payload
}

/// Counts bytes flowing out of the source file, updating the delegate and
/// emitting a progress event per chunk. A byte-accounting violation turns
/// into a stream error, which tears the request down.
struct ProgressStream<S> {
    inner: S,
    delegate: SharedDelegate,
    events: UnboundedSender<TransferEvent>,
    transferred: u64,
}

impl<S> ProgressStream<S> {
    fn new(inner: S, delegate: SharedDelegate, events: UnboundedSender<TransferEvent>) -> Self {
        Self {
            inner,
            delegate,
            events,
            transferred: 0,
        }
    }
}

impl<S> Stream for ProgressStream<S>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.transferred += chunk.len() as u64;
                let progress = {
                    let mut delegate = this.delegate.lock();
                    delegate
                        .record_progress(this.transferred)
                        .map(|_| delegate.bytes_expected)
                };
                match progress {
                    Ok(bytes_expected) => {
                        let _ = this.events.send(TransferEvent::Progress {
                            bytes_transferred: this.transferred,
                            bytes_expected,
                        });
                        Poll::Ready(Some(Ok(chunk)))
                    }
                    Err(err) => Poll::Ready(Some(Err(std::io::Error::other(err)))),
                }
            }
            other => other,
        }
    }
}
