//! # LiqPay Signatures
//!
//! `base64(sha1(private_key + data + private_key))` over the base64-encoded
//! JSON payload. The raw 20-byte digest is base64-encoded, not its hex form.
//! This is a plain keyed hash, not HMAC.

use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;
use pay_core::{constant_time_compare, CallbackFields, PaymentError, PaymentResult};
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fmt;

/// Signs and verifies LiqPay `data` strings
#[derive(Clone)]
pub struct LiqPaySigner {
    private_key: String,
}

impl LiqPaySigner {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
        }
    }

    /// Signature over an already base64-encoded `data` string
    pub fn sign(&self, data: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.private_key.as_bytes());
        hasher.update(data.as_bytes());
        hasher.update(self.private_key.as_bytes());
        b64.encode(hasher.finalize())
    }

    /// `data` is passed exactly as received; it must not be re-encoded.
    pub fn verify(&self, data: &str, signature: &str) -> bool {
        constant_time_compare(&self.sign(data), signature)
    }
}

impl fmt::Debug for LiqPaySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiqPaySigner")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// `base64(JSON(payload))`, the form LiqPay expects in its `data` field
pub fn encode_data<T: Serialize>(payload: &T) -> PaymentResult<String> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| PaymentError::RequestError(format!("Failed to encode payload: {}", e)))?;
    Ok(b64.encode(json))
}

/// Decode a received `data` field into its JSON object
pub fn decode_data(data: &str) -> PaymentResult<CallbackFields> {
    let json = b64
        .decode(data.trim())
        .map_err(|e| PaymentError::ParseError(format!("Invalid base64 data: {}", e)))?;
    CallbackFields::from_json_slice(&json)
}
