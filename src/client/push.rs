//! Push Channel Adapter
//!
//! Keeps one STOMP-over-WebSocket session open to the notification broker,
//! subscribed to the comment and reaction topics, and forwards decoded
//! [`PushEvent`]s through a tokio channel.
//!
//! # Lifecycle
//!
//! [`PushChannel::connect`] spawns a background task and returns at once. The
//! task connects, negotiates heartbeats, subscribes and then forwards frames
//! until the session breaks, at which point it waits the configured fixed
//! delay and starts over. [`PushChannel::close`] (or dropping the handle)
//! unsubscribes, sends `DISCONNECT` and ends the task, which closes the event
//! channel.
//!
//! Malformed payloads are logged and dropped; they never end the session.

use crate::client::config::Config;
use crate::client::stomp::{Command, Frame, Heartbeat, HEARTBEAT};
use crate::shared::error::{FeedError, FeedResult};
use crate::shared::event::{PushEvent, COMMENTS_TOPIC, REACTIONS_TOPIC};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

/// Buffered events between the socket task and the consumer
const EVENT_BUFFER: usize = 256;

/// How long `close` waits for the task to say goodbye
const CLOSE_GRACE: Duration = Duration::from_secs(2);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Push connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    Connecting,
    Connected,
    /// Waiting out the reconnect delay after a failure
    Retrying,
    /// Closed for good
    Disconnected,
}

#[derive(Debug, Clone)]
struct ChannelSettings {
    url: String,
    host: String,
    reconnect_delay: Duration,
    heartbeat_outgoing: Duration,
    heartbeat_incoming: Duration,
    handshake_timeout: Duration,
}

impl ChannelSettings {
    fn from_config(config: &Config) -> Self {
        let url = config.push_url().to_string();
        let host = reqwest::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "localhost".to_string());
        Self {
            url,
            host,
            reconnect_delay: config.reconnect_delay(),
            heartbeat_outgoing: config.heartbeat_outgoing(),
            heartbeat_incoming: config.heartbeat_incoming(),
            handshake_timeout: config.request_timeout(),
        }
    }
}

/// How a session ended without error
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Shutdown,
    ReceiverDropped,
}

/// Handle to the background push task
#[derive(Debug)]
pub struct PushChannel {
    status: watch::Receiver<PushStatus>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PushChannel {
    /// Start the push task. Events arrive on the returned receiver until the
    /// channel is closed.
    pub fn connect(config: &Config) -> (Self, mpsc::Receiver<PushEvent>) {
        let settings = ChannelSettings::from_config(config);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (status_tx, status_rx) = watch::channel(PushStatus::Connecting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tracing::info!("Starting push channel for {}", settings.url);
        let task = tokio::spawn(run_channel(settings, event_tx, status_tx, shutdown_rx));

        (
            Self {
                status: status_rx,
                shutdown: shutdown_tx,
                task: Some(task),
            },
            event_rx,
        )
    }

    pub fn status(&self) -> PushStatus {
        *self.status.borrow()
    }

    /// Receiver notified on every status change
    pub fn watch_status(&self) -> watch::Receiver<PushStatus> {
        self.status.clone()
    }

    /// Unsubscribe, disconnect and wait for the task to finish. A task that
    /// overruns the grace period is aborted, so no event is delivered after
    /// this returns.
    pub async fn close(mut self) {
        self.shutdown.send_replace(true);
        if let Some(mut task) = self.task.take() {
            if tokio::time::timeout(CLOSE_GRACE, &mut task).await.is_err() {
                tracing::warn!("Push task did not stop in time, aborting it");
                task.abort();
            }
        }
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        // The task notices on its own and disconnects cleanly
        self.shutdown.send_replace(true);
    }
}

async fn run_channel(
    settings: ChannelSettings,
    events: mpsc::Sender<PushEvent>,
    status: watch::Sender<PushStatus>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        status.send_replace(PushStatus::Connecting);
        match run_session(&settings, &events, &status, &mut shutdown).await {
            Ok(SessionEnd::Shutdown) => {
                tracing::info!("Push channel closed");
                break;
            }
            Ok(SessionEnd::ReceiverDropped) => {
                tracing::info!("Push event receiver dropped, stopping");
                break;
            }
            Err(e) => {
                tracing::warn!(
                    "Push session ended: {} (reconnecting in {:?})",
                    e,
                    settings.reconnect_delay
                );
                status.send_replace(PushStatus::Retrying);
                tokio::select! {
                    _ = tokio::time::sleep(settings.reconnect_delay) => {}
                    _ = shutdown_requested(&mut shutdown) => break,
                    _ = events.closed() => break,
                }
            }
        }
    }
    status.send_replace(PushStatus::Disconnected);
}

/// One connection, from handshake to teardown
async fn run_session(
    settings: &ChannelSettings,
    events: &mpsc::Sender<PushEvent>,
    status: &watch::Sender<PushStatus>,
    shutdown: &mut watch::Receiver<bool>,
) -> FeedResult<SessionEnd> {
    let (mut sink, mut source, heartbeat) = tokio::select! {
        result = tokio::time::timeout(settings.handshake_timeout, handshake(settings)) => {
            result.map_err(|_| FeedError::connection("STOMP handshake timed out"))??
        }
        _ = shutdown_requested(shutdown) => return Ok(SessionEnd::Shutdown),
    };

    let subscriptions = [("sub-0", COMMENTS_TOPIC), ("sub-1", REACTIONS_TOPIC)];
    for (id, topic) in subscriptions {
        send_frame(&mut sink, &Frame::subscribe(id, topic)).await?;
    }
    tracing::info!(
        "Push channel connected (heartbeat out {:?}, in {:?})",
        heartbeat.outgoing,
        heartbeat.incoming
    );
    status.send_replace(PushStatus::Connected);

    let mut ping = heartbeat
        .outgoing
        .map(|every| tokio::time::interval_at(Instant::now() + every, every));
    let silence_limit = heartbeat.incoming_deadline();
    let mut last_seen = Instant::now();
    // Decoded event waiting for room in the channel; reading pauses meanwhile
    let mut pending: Option<PushEvent> = None;

    loop {
        let deadline = silence_limit.map(|limit| last_seen + limit);
        tokio::select! {
            _ = shutdown_requested(shutdown) => {
                for (id, _) in subscriptions {
                    let _ = send_frame(&mut sink, &Frame::unsubscribe(id)).await;
                }
                let receipt = Uuid::new_v4().to_string();
                let _ = send_frame(&mut sink, &Frame::disconnect(&receipt)).await;
                let _ = sink.close().await;
                if pending.is_some() {
                    tracing::debug!("Discarding undelivered push event on shutdown");
                }
                return Ok(SessionEnd::Shutdown);
            }
            _ = events.closed() => {
                let _ = sink.close().await;
                return Ok(SessionEnd::ReceiverDropped);
            }
            _ = tick(&mut ping) => {
                sink.send(Message::Text(HEARTBEAT.to_string()))
                    .await
                    .map_err(|e| FeedError::connection(format!("heartbeat failed: {}", e)))?;
            }
            permit = events.reserve(), if pending.is_some() => {
                let Ok(permit) = permit else {
                    let _ = sink.close().await;
                    return Ok(SessionEnd::ReceiverDropped);
                };
                if let Some(event) = pending.take() {
                    permit.send(event);
                }
                last_seen = Instant::now();
            }
            _ = expire(deadline), if pending.is_none() => {
                return Err(FeedError::connection(format!(
                    "no traffic from broker for {:?}",
                    silence_limit.unwrap_or_default()
                )));
            }
            incoming = read_frame(&mut source), if pending.is_none() => {
                last_seen = Instant::now();
                match incoming? {
                    Incoming::Frame(frame) => pending = decode_frame(frame)?,
                    Incoming::Keepalive => {}
                    Incoming::Closed => {
                        return Err(FeedError::connection("broker closed the socket"));
                    }
                }
            }
        }
    }
}

async fn handshake(settings: &ChannelSettings) -> FeedResult<(WsSink, WsSource, Heartbeat)> {
    let (ws, _) = connect_async(settings.url.as_str())
        .await
        .map_err(|e| FeedError::connection(format!("failed to connect to {}: {}", settings.url, e)))?;
    let (mut sink, mut source) = ws.split();

    let connect = Frame::connect(
        &settings.host,
        settings.heartbeat_outgoing,
        settings.heartbeat_incoming,
    );
    send_frame(&mut sink, &connect).await?;

    loop {
        match read_frame(&mut source).await? {
            Incoming::Frame(frame) if frame.command == Command::Connected => {
                let heartbeat = Heartbeat::negotiate(
                    settings.heartbeat_outgoing,
                    settings.heartbeat_incoming,
                    frame.header("heart-beat"),
                );
                return Ok((sink, source, heartbeat));
            }
            Incoming::Frame(frame) if frame.command == Command::Error => {
                return Err(FeedError::connection(broker_error(&frame)));
            }
            Incoming::Frame(frame) => {
                tracing::debug!("Ignoring {} before CONNECTED", frame.command);
            }
            Incoming::Keepalive => {}
            Incoming::Closed => {
                return Err(FeedError::connection("socket closed during handshake"));
            }
        }
    }
}

/// Decode a frame into an event. `None` for frames that carry nothing to
/// deliver; an `ERROR` frame ends the session.
fn decode_frame(frame: Frame) -> FeedResult<Option<PushEvent>> {
    match frame.command {
        Command::Message => {
            let Some(destination) = frame.header("destination") else {
                tracing::warn!("Dropping MESSAGE without destination");
                return Ok(None);
            };
            match PushEvent::decode(destination, &frame.body) {
                Ok(event) => {
                    tracing::debug!("Received {} event", event.kind());
                    Ok(Some(event))
                }
                Err(e) => {
                    tracing::warn!("Dropping push event: {}", e);
                    Ok(None)
                }
            }
        }
        Command::Error => Err(FeedError::connection(broker_error(&frame))),
        other => {
            tracing::debug!("Ignoring {} frame", other);
            Ok(None)
        }
    }
}

fn broker_error(frame: &Frame) -> String {
    let message = frame.header("message").unwrap_or("no message");
    if frame.body.is_empty() {
        format!("broker error: {}", message)
    } else {
        format!("broker error: {} ({})", message, frame.body.trim())
    }
}

async fn send_frame(sink: &mut WsSink, frame: &Frame) -> FeedResult<()> {
    sink.send(Message::Text(frame.encode()))
        .await
        .map_err(|e| FeedError::connection(format!("failed to send {}: {}", frame.command, e)))
}

enum Incoming {
    Frame(Frame),
    /// Heartbeat, control frame or garbage; proof of life either way
    Keepalive,
    Closed,
}

async fn read_frame(source: &mut WsSource) -> FeedResult<Incoming> {
    let text = match source.next().await {
        None => return Ok(Incoming::Closed),
        Some(Err(e)) => return Err(FeedError::connection(format!("socket error: {}", e))),
        Some(Ok(Message::Text(text))) => text,
        Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
            Ok(text) => text,
            Err(_) => {
                tracing::warn!("Dropping non UTF-8 binary frame");
                return Ok(Incoming::Keepalive);
            }
        },
        Some(Ok(Message::Close(_))) => return Ok(Incoming::Closed),
        Some(Ok(_)) => return Ok(Incoming::Keepalive),
    };

    match Frame::parse(&text) {
        Ok(Some(frame)) => Ok(Incoming::Frame(frame)),
        Ok(None) => Ok(Incoming::Keepalive),
        Err(e) => {
            tracing::warn!("Dropping unparseable STOMP frame: {}", e);
            Ok(Incoming::Keepalive)
        }
    }
}

async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
