use serde_json::Value;

/// Text the account server attaches to login, strategy and close replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerMessage {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ServerMessage {
    /// Reads `message` and `error` from any JSON body. Bodies that are not
    /// objects carry neither.
    pub fn from_body(body: &Value) -> Self {
        Self {
            message: body.get("message").and_then(display_text),
            error: body.get("error").and_then(display_text),
        }
    }

    /// 2xx replies: only `message` is shown, `error` is ignored.
    pub fn from_success(body: &Value) -> Self {
        Self {
            message: body.get("message").and_then(display_text),
            error: None,
        }
    }

    /// Best human-readable text in the reply, if any.
    pub fn detail(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

/// Display text for a loosely typed reply value. Null, false, empty strings
/// and zero count as absent; strings show as-is, anything else as JSON.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
