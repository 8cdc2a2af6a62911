//! WebSocket client for the tracking service
//!
//! [`StreamClient::connect`] dials the service, sends the configuration
//! handshake and spawns a single receive task that decodes inbound messages
//! and hands frames to the caller's [`FrameHandler`]. Payloads that fail to
//! decode are skipped. Any transport error ends the task: the underlying
//! stream yields nothing after reporting one, so there is no message to skip
//! past. The task also stops when the client is closed or dropped, or when
//! the service closes the connection.

use crate::config::ClientConfig;
use crate::done::{done_pair, DoneGuard, DoneSignal};
use crate::error::{Result, SourceError};
use crate::protocol::{self, HandshakeMessage, InboundMessage};
use crate::stats::{ReceiveStats, StatsSnapshot};
use crate::traits::{DeviceEventHandler, FrameHandler, SkipObserver};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Default)]
struct Callbacks {
    frame: Option<Box<dyn FrameHandler>>,
    device_event: Option<Box<dyn DeviceEventHandler>>,
    skip: Option<Box<dyn SkipObserver>>,
}

/// Collects the optional callbacks before connecting.
///
/// Without a frame handler, frames are still decoded and counted but not
/// delivered anywhere.
pub struct StreamClientBuilder {
    config: ClientConfig,
    callbacks: Callbacks,
}

impl StreamClientBuilder {
    pub fn on_frame(mut self, handler: impl FrameHandler) -> Self {
        self.callbacks.frame = Some(Box::new(handler));
        self
    }

    pub fn on_device_event(mut self, handler: impl DeviceEventHandler) -> Self {
        self.callbacks.device_event = Some(Box::new(handler));
        self
    }

    /// Observe payloads the receive loop drops because they fail to decode.
    /// Purely diagnostic, delivery of other frames is unaffected.
    pub fn on_skip(mut self, observer: impl SkipObserver) -> Self {
        self.callbacks.skip = Some(Box::new(observer));
        self
    }

    pub async fn connect(self) -> Result<StreamClient> {
        let Self { config, callbacks } = self;

        let mut ws = open(&config).await?;
        info!("Connected to tracking service at {}", config.url);

        for message in HandshakeMessage::sequence(config.enable_gestures, config.background) {
            ws.send(message.to_message()?).await.map_err(|e| {
                SourceError::HandshakeError(format!("Failed to send {:?}: {}", message, e))
            })?;
        }
        debug!(
            "Handshake sent (gestures: {}, background: {})",
            config.enable_gestures, config.background
        );

        let (sink, stream) = ws.split();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (done_guard, done) = done_pair();
        let stats = Arc::new(ReceiveStats::default());

        let receive_loop = ReceiveLoop {
            stream,
            shutdown: shutdown_rx,
            callbacks,
            stats: stats.clone(),
        };
        tokio::spawn(receive_loop.run(done_guard));

        Ok(StreamClient {
            url: config.url,
            sink: Mutex::new(Some(sink)),
            shutdown: shutdown_tx,
            done,
            stats,
        })
    }
}

/// A live connection to the tracking service.
///
/// Dropping the client without calling [`close`](Self::close) also stops the
/// receive task, but skips the WebSocket close handshake.
pub struct StreamClient {
    url: String,
    sink: Mutex<Option<SplitSink<WsStream, Message>>>,
    shutdown: watch::Sender<bool>,
    done: DoneSignal,
    stats: Arc<ReceiveStats>,
}

impl StreamClient {
    pub fn builder(config: ClientConfig) -> StreamClientBuilder {
        StreamClientBuilder {
            config,
            callbacks: Callbacks::default(),
        }
    }

    /// Connect and deliver every decoded frame to `handler`.
    pub async fn connect(config: ClientConfig, handler: impl FrameHandler) -> Result<Self> {
        Self::builder(config).on_frame(handler).connect().await
    }

    /// Close the connection.
    ///
    /// Safe to call concurrently with the running receive loop and more than
    /// once; only the first call touches the transport. Returns before the
    /// loop has exited, wait on [`done`](Self::done) for that.
    pub async fn close(&self) -> Result<()> {
        self.shutdown.send_replace(true);

        let Some(mut sink) = self.sink.lock().await.take() else {
            return Ok(());
        };

        info!("Closing connection to {}", self.url);
        match sink.close().await {
            Ok(()) => Ok(()),
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(SourceError::CloseError(e.to_string())),
        }
    }

    pub fn done(&self) -> DoneSignal {
        self.done.clone()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

async fn open(config: &ClientConfig) -> Result<WsStream> {
    let url = config.validate()?;

    let mut request = url.as_str().into_client_request().map_err(|e| {
        SourceError::ConfigError(format!("Invalid upgrade request for {}: {}", config.url, e))
    })?;
    if let Some(origin) = &config.origin {
        request.headers_mut().insert(ORIGIN, header_value(origin)?);
    }
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SourceError::ConfigError(format!("Invalid header name '{}': {}", name, e)))?;
        request.headers_mut().insert(name, header_value(value)?);
    }

    let dial = connect_async(request);
    let result = match config.connect_timeout() {
        Some(limit) => tokio::time::timeout(limit, dial).await.map_err(|_| {
            SourceError::Timeout(format!("Connecting to {} took longer than {:?}", config.url, limit))
        })?,
        None => dial.await,
    };

    let (ws, _response) = result.map_err(|e| {
        SourceError::ConnectionError(format!("Failed to connect to {}: {}", config.url, e))
    })?;
    Ok(ws)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| SourceError::ConfigError(format!("Invalid header value '{}': {}", value, e)))
}

struct ReceiveLoop {
    stream: SplitStream<WsStream>,
    shutdown: watch::Receiver<bool>,
    callbacks: Callbacks,
    stats: Arc<ReceiveStats>,
}

impl ReceiveLoop {
    async fn run(mut self, _done: DoneGuard) {
        loop {
            let next = tokio::select! {
                biased;
                // Fires on close() and also when the client is dropped.
                _ = self.shutdown.changed() => {
                    debug!("Receive loop stopped by client");
                    break;
                }
                next = self.stream.next() => next,
            };

            match next {
                None => {
                    debug!("WebSocket stream ended");
                    break;
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("Tracking service closed the connection: {:?}", frame);
                    break;
                }
                Some(Ok(message)) => self.dispatch(&message),
                Some(Err(e)) => {
                    warn!("WebSocket receive failed, stopping: {}", e);
                    break;
                }
            }
        }
    }

    fn dispatch(&mut self, message: &Message) {
        match protocol::decode_message(message) {
            Ok(Some(InboundMessage::Frame(frame))) => {
                self.stats.frame_received();
                if let Some(handler) = self.callbacks.frame.as_mut() {
                    self.stats.frame_delivered();
                    handler.on_frame(*frame);
                }
            }
            Ok(Some(InboundMessage::DeviceEvent(event))) => {
                self.stats.device_event();
                debug!(
                    "Device {} attached: {} streaming: {}",
                    event.id, event.attached, event.streaming
                );
                if let Some(handler) = self.callbacks.device_event.as_mut() {
                    handler.on_device_event(event);
                }
            }
            Ok(Some(InboundMessage::ServiceVersion(version))) => {
                info!(
                    "Tracking service {} speaking protocol v{}",
                    version.service_version, version.version
                );
            }
            Ok(None) => {}
            Err(e) => self.skip(e),
        }
    }

    fn skip(&mut self, error: SourceError) {
        self.stats.message_skipped();
        debug!("Skipping inbound message: {}", error);
        if let Some(observer) = self.callbacks.skip.as_mut() {
            observer.on_skip(&error);
        }
    }
}
