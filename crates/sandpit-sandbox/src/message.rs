//! The diagnostic message contract and the generation-tagged channel
//!
//! Sandboxed contexts post exactly
//! `{ "type": "console", "level": "log"|"error"|"warn"|"info", "message": string }`
//! to their host. The host-side [`ContextPort`] a context posts through is
//! stamped with the [`Generation`] of the load that created it, so the runner
//! can tell a superseded context's late messages from current ones.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;

/// Value of the `type` field on console diagnostics
pub const CONSOLE_MESSAGE_TYPE: &str = "console";

/// Monotonically increasing id of a sandbox load. Zero means "never loaded".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    /// Generation before any load
    pub const NONE: Generation = Generation(0);

    /// The generation following this one
    #[inline]
    #[must_use]
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Diagnostic severity, one per intercepted console primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// `console.log`
    Log,
    /// `console.info`
    Info,
    /// `console.warn`
    Warn,
    /// `console.error`
    Error,
}

impl Severity {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Log => "log",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log" => Ok(Severity::Log),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(other.to_string()),
        }
    }
}

/// A decoded console diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    /// Which console primitive produced it
    pub level: Severity,
    /// Space-joined stringified arguments
    pub message: String,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    level: Severity,
    message: &'a str,
}

impl ConsoleMessage {
    /// Build a message
    #[must_use]
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Encode in the wire shape a sandboxed context posts
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(WireMessage {
            kind: CONSOLE_MESSAGE_TYPE,
            level: self.level,
            message: &self.message,
        })
        .unwrap_or(Value::Null)
    }
}

/// Outcome of decoding a posted payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A well-formed console diagnostic
    Console(ConsoleMessage),
    /// Some other message kind; not ours
    Foreign,
    /// Claims to be a console diagnostic but does not fit the contract
    Malformed(String),
}

/// Decode a payload posted by a sandboxed context.
///
/// `message` may also be an array, which is joined with single spaces;
/// other non-string values are rendered as JSON text. A missing `message`
/// decodes as the empty string.
#[must_use]
pub fn decode(payload: &Value) -> Decoded {
    if payload.get("type").and_then(Value::as_str) != Some(CONSOLE_MESSAGE_TYPE) {
        return Decoded::Foreign;
    }

    let level = match payload.get("level").and_then(Value::as_str) {
        Some(raw) => match raw.parse::<Severity>() {
            Ok(level) => level,
            Err(raw) => return Decoded::Malformed(format!("unknown level `{raw}`")),
        },
        None => return Decoded::Malformed("missing level".to_string()),
    };

    let message = match payload.get("message") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .map(render_part)
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => other.to_string(),
    };

    Decoded::Console(ConsoleMessage { level, message })
}

fn render_part(part: &Value) -> String {
    match part {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A payload tagged with the generation of the context that posted it
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Load that created the posting context
    pub generation: Generation,
    /// Raw posted data
    pub payload: Value,
}

/// Host-side endpoint handed to one loaded context.
///
/// Cheap to clone; every clone stamps the same generation.
#[derive(Debug, Clone)]
pub struct ContextPort {
    generation: Generation,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl ContextPort {
    pub(crate) fn new(generation: Generation, tx: mpsc::UnboundedSender<Envelope>) -> Self {
        Self { generation, tx }
    }

    /// Generation this port stamps on everything it posts
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Post raw data to the host. Returns `false` once the host is gone.
    pub fn post(&self, payload: Value) -> bool {
        self.tx
            .send(Envelope {
                generation: self.generation,
                payload,
            })
            .is_ok()
    }

    /// Post a console diagnostic in wire shape
    pub fn post_console(&self, level: Severity, message: impl Into<String>) -> bool {
        self.post(ConsoleMessage::new(level, message).to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_bit_exact_contract() {
        let value = ConsoleMessage::new(Severity::Warn, "careful").to_value();
        assert_eq!(
            value,
            json!({ "type": "console", "level": "warn", "message": "careful" })
        );
    }

    #[test]
    fn decodes_console_message() {
        let decoded = decode(&json!({ "type": "console", "level": "log", "message": "x" }));
        assert_eq!(decoded, Decoded::Console(ConsoleMessage::new(Severity::Log, "x")));
    }

    #[test]
    fn array_messages_are_space_joined() {
        let decoded = decode(&json!({ "type": "console", "level": "info", "message": ["a", 1, true] }));
        assert_eq!(decoded, Decoded::Console(ConsoleMessage::new(Severity::Info, "a 1 true")));
    }

    #[test]
    fn other_types_are_foreign() {
        assert_eq!(decode(&json!({ "type": "resize", "height": 10 })), Decoded::Foreign);
        assert_eq!(decode(&json!("console")), Decoded::Foreign);
        assert_eq!(decode(&Value::Null), Decoded::Foreign);
    }

    #[test]
    fn unknown_level_is_malformed() {
        let decoded = decode(&json!({ "type": "console", "level": "debug", "message": "x" }));
        assert!(matches!(decoded, Decoded::Malformed(_)));
    }

    #[test]
    fn generations_increase() {
        let g = Generation::NONE.next();
        assert_eq!(g, Generation(1));
        assert!(g.next() > g);
    }

    #[test]
    fn port_stamps_its_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let port = ContextPort::new(Generation(7), tx);
        assert!(port.post_console(Severity::Error, "boom"));
        let env = rx.try_recv().unwrap();
        assert_eq!(env.generation, Generation(7));
        assert_eq!(env.payload["message"], "boom");
    }
}
