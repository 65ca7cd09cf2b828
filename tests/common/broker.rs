//! Fake STOMP broker for push channel tests
//!
//! Accepts WebSocket connections on a random local port and lets a test
//! script the broker's side of each session.

use futures_util::{SinkExt, StreamExt};
use post_reactions::client::stomp::{Command, Frame};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

pub struct FakeBroker {
    listener: TcpListener,
    pub url: String,
}

impl FakeBroker {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind broker");
        let addr = listener.local_addr().expect("broker address");
        Self {
            listener,
            url: format!("ws://{}/ws", addr),
        }
    }

    pub async fn accept(&self) -> BrokerSession {
        let (tcp, _) = self.listener.accept().await.expect("accept");
        let ws = accept_async(tcp).await.expect("websocket handshake");
        BrokerSession { ws }
    }
}

pub struct BrokerSession {
    ws: WebSocketStream<TcpStream>,
}

impl BrokerSession {
    /// Next STOMP frame from the client, skipping heartbeats. `None` once closed.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        loop {
            match self.ws.next().await? {
                Ok(Message::Text(text)) => {
                    if let Ok(Some(frame)) = Frame::parse(&text) {
                        return Some(frame);
                    }
                }
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => {}
            }
        }
    }

    /// Answer CONNECT and collect both SUBSCRIBE frames
    pub async fn handshake(&mut self, heart_beat: &str) -> (Frame, Vec<Frame>) {
        let connect = self.next_frame().await.expect("CONNECT frame");
        assert_eq!(connect.command, Command::Connect);

        let connected = Frame::new(Command::Connected)
            .with_header("version", "1.2")
            .with_header("heart-beat", heart_beat);
        self.send_raw(&connected.encode()).await;

        let mut subscriptions = Vec::new();
        while subscriptions.len() < 2 {
            let frame = self.next_frame().await.expect("SUBSCRIBE frame");
            assert_eq!(frame.command, Command::Subscribe);
            subscriptions.push(frame);
        }
        (connect, subscriptions)
    }

    pub async fn send_message(&mut self, destination: &str, body: &str) {
        let mut frame = Frame::new(Command::Message)
            .with_header("destination", destination)
            .with_header("subscription", "sub-0")
            .with_header("message-id", "1");
        frame.body = body.to_string();
        self.send_raw(&frame.encode()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string()))
            .await
            .expect("broker send");
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
