//! # Callback Types
//!
//! Contracts for gateway notifications: the ordered field bag a callback is
//! parsed into, the read-only typed view handed to callers, and the handler
//! trait that sits between them.
//!
//! ```text
//! raw payload ──► CallbackHandler::handle ──► signature check ──► CallbackData
//!                        │                          │
//!                   ParseError              InvalidSignature /
//!                                           InvalidCallbackData
//! ```

use crate::error::{PaymentError, PaymentResult};
use serde_json::{Map, Value};
use std::fmt;

/// Ordered name → value mapping of notification fields.
///
/// Insertion order is kept: some gateways sign the values in the order they
/// arrive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackFields(Map<String, Value>);

impl CallbackFields {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Parse a JSON object
    pub fn from_json_str(raw: &str) -> PaymentResult<Self> {
        Self::from_json_slice(raw.as_bytes())
    }

    /// Parse a JSON object from bytes
    pub fn from_json_slice(raw: &[u8]) -> PaymentResult<Self> {
        match serde_json::from_slice::<Value>(raw)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PaymentError::ParseError(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remove a field, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    /// Field rendered as text; `None` when absent or null
    pub fn text(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::Null => None,
            value => Some(value_to_text(value)),
        }
    }

    /// Field read as an integer, accepting numeric strings
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        }
    }

    /// Field read as a float, accepting numeric strings
    pub fn decimal(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// All values rendered as text, in field order
    pub fn values_as_text(&self) -> impl Iterator<Item = String> + '_ {
        self.0.values().map(value_to_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for CallbackFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CallbackFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Render a scalar the way the gateways stringify values before hashing.
///
/// Integral floats lose their fractional part (`10.0` → `"10"`), booleans
/// become `"1"` / `""`, null becomes `""`. Nested values fall back to JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or_default();
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", f as i64)
                } else {
                    format!("{}", f)
                }
            }
        }
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        nested => nested.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Raw notification as delivered by the transport layer
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackPayload {
    /// Already-decoded fields (form body or parsed JSON)
    Fields(CallbackFields),
    /// Undecoded body, expected to be a JSON object
    Raw(String),
}

impl CallbackPayload {
    /// Decode into a field bag, parsing `Raw` as JSON
    pub fn into_fields(self) -> PaymentResult<CallbackFields> {
        match self {
            CallbackPayload::Fields(fields) => Ok(fields),
            CallbackPayload::Raw(raw) => CallbackFields::from_json_str(&raw),
        }
    }
}

impl From<CallbackFields> for CallbackPayload {
    fn from(fields: CallbackFields) -> Self {
        CallbackPayload::Fields(fields)
    }
}

impl From<String> for CallbackPayload {
    fn from(raw: String) -> Self {
        CallbackPayload::Raw(raw)
    }
}

impl From<&str> for CallbackPayload {
    fn from(raw: &str) -> Self {
        CallbackPayload::Raw(raw.to_string())
    }
}

/// Read-only view over a verified notification.
///
/// Implementations are only constructed by their gateway's
/// [`CallbackHandler`] after the signature check passed.
pub trait CallbackData: fmt::Debug + Send + Sync {
    /// The gateway reports the payment as completed
    fn is_success(&self) -> bool;

    fn order_id(&self) -> Option<String>;

    fn amount(&self) -> Option<String>;

    /// Gateway-specific status string (e.g. "success", "Approved")
    fn transaction_status(&self) -> Option<String>;

    /// Every verified field
    fn fields(&self) -> &CallbackFields;
}

/// Parses and authenticates one gateway's notifications
pub trait CallbackHandler: Send + Sync {
    type Data: CallbackData;

    /// Gateway name this handler verifies
    fn gateway(&self) -> &'static str;

    /// Verify the payload and return its typed view
    fn handle(&self, payload: CallbackPayload) -> PaymentResult<Self::Data>;

    fn supports(&self, gateway: &str) -> bool {
        gateway == self.gateway()
    }
}
