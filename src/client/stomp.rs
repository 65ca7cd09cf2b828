//! STOMP 1.2 frame codec
//!
//! The push socket carries STOMP frames, one frame per WebSocket text
//! message. Only the subset a subscriber needs is modelled: the client sends
//! `CONNECT`, `SUBSCRIBE`, `UNSUBSCRIBE` and `DISCONNECT`, and the server
//! answers with `CONNECTED`, `MESSAGE`, `RECEIPT` and `ERROR`. A message
//! consisting only of end-of-line characters is a heartbeat.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Accepted protocol version
pub const STOMP_VERSION: &str = "1.2";

/// Heartbeat payload
pub const HEARTBEAT: &str = "\n";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StompError {
    #[error("frame is not NUL-terminated")]
    MissingNul,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("malformed header line '{0}'")]
    MalformedHeader(String),
    #[error("invalid escape sequence in '{0}'")]
    InvalidEscape(String),
    #[error("invalid content-length '{0}'")]
    InvalidContentLength(String),
    #[error("body is not valid UTF-8")]
    InvalidBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Subscribe,
    Unsubscribe,
    Disconnect,
    Message,
    Receipt,
    Error,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Disconnect => "DISCONNECT",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        }
    }

    fn parse(raw: &str) -> Result<Self, StompError> {
        Ok(match raw {
            "CONNECT" | "STOMP" => Command::Connect,
            "CONNECTED" => Command::Connected,
            "SUBSCRIBE" => Command::Subscribe,
            "UNSUBSCRIBE" => Command::Unsubscribe,
            "DISCONNECT" => Command::Disconnect,
            "MESSAGE" => Command::Message,
            "RECEIPT" => Command::Receipt,
            "ERROR" => Command::Error,
            other => return Err(StompError::UnknownCommand(other.to_string())),
        })
    }

    /// CONNECT and CONNECTED headers are never escaped
    fn escapes_headers(self) -> bool {
        !matches!(self, Command::Connect | Command::Connected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single STOMP frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    /// In wire order; repeated names keep only the first on lookup
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// `CONNECT` offering `heart-beat: <outgoing>,<incoming>` in milliseconds
    pub fn connect(host: &str, outgoing: Duration, incoming: Duration) -> Self {
        Frame::new(Command::Connect)
            .with_header("accept-version", STOMP_VERSION)
            .with_header("host", host)
            .with_header(
                "heart-beat",
                format!("{},{}", outgoing.as_millis(), incoming.as_millis()),
            )
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Frame::new(Command::Subscribe)
            .with_header("id", id)
            .with_header("destination", destination)
            .with_header("ack", "auto")
    }

    pub fn unsubscribe(id: &str) -> Self {
        Frame::new(Command::Unsubscribe).with_header("id", id)
    }

    pub fn disconnect(receipt: &str) -> Self {
        Frame::new(Command::Disconnect).with_header("receipt", receipt)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize to wire text, terminated by NUL
    pub fn encode(&self) -> String {
        let escape = self.command.escapes_headers();
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(self.command.as_str());
        out.push('\n');
        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        if !self.body.is_empty() && self.header("content-length").is_none() {
            out.push_str(&format!("content-length:{}\n", self.body.len()));
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parse wire text. `Ok(None)` is a heartbeat.
    pub fn parse(input: &str) -> Result<Option<Frame>, StompError> {
        let input = input.trim_start_matches(['\r', '\n']);
        if input.is_empty() {
            return Ok(None);
        }

        let (command_line, mut rest) = split_line(input);
        let command = Command::parse(command_line)?;
        let escaped = command.escapes_headers();

        let mut headers = Vec::new();
        loop {
            if rest.is_empty() {
                return Err(StompError::MissingNul);
            }
            let (line, tail) = split_line(rest);
            rest = tail;
            if line.is_empty() {
                break;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| StompError::MalformedHeader(line.to_string()))?;
            if escaped {
                headers.push((unescape_header(name)?, unescape_header(value)?));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        let content_length = headers
            .iter()
            .find(|(n, _)| n == "content-length")
            .map(|(_, v)| {
                v.trim()
                    .parse::<usize>()
                    .map_err(|_| StompError::InvalidContentLength(v.clone()))
            })
            .transpose()?;

        let bytes = rest.as_bytes();
        let body_end = match content_length {
            Some(len) => {
                if bytes.get(len) != Some(&0) {
                    return Err(StompError::MissingNul);
                }
                len
            }
            None => bytes.iter().position(|b| *b == 0).ok_or(StompError::MissingNul)?,
        };
        let body = std::str::from_utf8(&bytes[..body_end])
            .map_err(|_| StompError::InvalidBody)?
            .to_string();

        Ok(Some(Frame {
            command,
            headers,
            body,
        }))
    }
}

fn split_line(input: &str) -> (&str, &str) {
    match input.find('\n') {
        Some(idx) => (input[..idx].trim_end_matches('\r'), &input[idx + 1..]),
        None => (input.trim_end_matches('\r'), ""),
    }
}

fn escape_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_header(raw: &str) -> Result<String, StompError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            _ => return Err(StompError::InvalidEscape(raw.to_string())),
        }
    }
    Ok(out)
}

/// Heartbeat intervals agreed with the server; `None` disables a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    pub outgoing: Option<Duration>,
    pub incoming: Option<Duration>,
}

impl Heartbeat {
    /// Combine the client offer with the server's `heart-beat` header.
    ///
    /// Each direction is the larger of the two sides' values, or disabled if
    /// either side sent 0. A missing or garbled header disables both.
    pub fn negotiate(client_out: Duration, client_in: Duration, server: Option<&str>) -> Self {
        let (server_out, server_in) = server
            .and_then(|h| h.split_once(','))
            .and_then(|(sx, sy)| Some((sx.trim().parse::<u64>().ok()?, sy.trim().parse::<u64>().ok()?)))
            .unwrap_or((0, 0));

        let pick = |ours: Duration, theirs: u64| {
            if ours.is_zero() || theirs == 0 {
                None
            } else {
                Some(ours.max(Duration::from_millis(theirs)))
            }
        };

        Self {
            outgoing: pick(client_out, server_in),
            incoming: pick(client_in, server_out),
        }
    }

    /// Silence after which the connection is considered dead
    pub fn incoming_deadline(&self) -> Option<Duration> {
        self.incoming.map(|d| d * 2)
    }
}
