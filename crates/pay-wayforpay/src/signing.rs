//! # WayForPay Signatures
//!
//! HMAC-MD5 keyed with the merchant secret over `;`-joined values, hex
//! encoded. Outgoing invoices and incoming callbacks sign different field
//! lists, and the two lists must not be merged.

use hmac::{Hmac, Mac};
use md5::Md5;
use pay_core::{constant_time_compare, CallbackFields, PaymentError, PaymentResult};
use std::fmt;

type HmacMd5 = Hmac<Md5>;

/// Field order signed when creating an invoice
pub const INVOICE_SIGNATURE_FIELDS: [&str; 9] = [
    "merchantAccount",
    "merchantDomainName",
    "orderReference",
    "orderDate",
    "amount",
    "currency",
    "productName[]",
    "productCount[]",
    "productPrice[]",
];

/// Field order signed by the gateway on a callback
pub const CALLBACK_SIGNATURE_FIELDS: [&str; 8] = [
    "merchantAccount",
    "orderReference",
    "amount",
    "currency",
    "authCode",
    "cardPan",
    "transactionStatus",
    "reasonCode",
];

/// Name of the signature field in both directions
pub const SIGNATURE_FIELD: &str = "merchantSignature";

/// Signs and verifies WayForPay merchant signatures
#[derive(Clone)]
pub struct WayForPaySigner {
    secret: String,
}

impl WayForPaySigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac<I, S>(&self, values: I) -> HmacMd5
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mac =
            HmacMd5::new_from_slice(self.secret.as_bytes()).expect("HMAC can take key of any size");
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                mac.update(b";");
            }
            mac.update(value.as_ref().as_bytes());
        }
        mac
    }

    /// Hex HMAC-MD5 over `values` joined by `;`
    pub fn sign<I, S>(&self, values: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        hex::encode(self.mac(values).finalize().into_bytes())
    }

    /// Timing-safe, exact comparison against the lowercase hex signature
    pub fn verify<I, S>(&self, values: I, signature: &str) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        constant_time_compare(&self.sign(values), signature)
    }

    /// Values of the eight callback fields, in signing order
    pub fn callback_values(fields: &CallbackFields) -> PaymentResult<Vec<String>> {
        CALLBACK_SIGNATURE_FIELDS
            .iter()
            .map(|name| fields.text(name).ok_or(PaymentError::InvalidCallbackData))
            .collect()
    }
}

impl fmt::Debug for WayForPaySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WayForPaySigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CALLBACK_VALUES: [&str; 8] = [
        "test_merchant",
        "ORDER-123",
        "100.5",
        "USD",
        "123456",
        "4444555566667777",
        "Approved",
        "1100",
    ];

    #[test]
    fn test_known_answer_invoice() {
        let signer = WayForPaySigner::new("flk3409refn54t54t*FNJRET");
        let signature = signer.sign([
            "test_merch_n1",
            "www.market.ua",
            "DH783023",
            "1415379863",
            "1547.36",
            "UAH",
            "Samsung WB1100F",
            "1",
            "1547.36",
        ]);

        assert_eq!(signature, "32272ca88e73b210a94453f5d3c99bdc");
    }

    #[test]
    fn test_known_answer_callback() {
        let signer = WayForPaySigner::new("test_private_key");
        assert_eq!(
            signer.sign(CALLBACK_VALUES),
            "1b9f7bcb35d7f0a2a59bef113ed4ee85"
        );
    }

    #[test]
    fn test_sign_then_verify() {
        let signer = WayForPaySigner::new("test_private_key");
        let signature = signer.sign(CALLBACK_VALUES);

        assert!(signer.verify(CALLBACK_VALUES, &signature));
    }

    #[test]
    fn test_verify_is_exact() {
        let signer = WayForPaySigner::new("test_private_key");
        let signature = signer.sign(CALLBACK_VALUES);

        assert!(!signer.verify(CALLBACK_VALUES, &signature.to_uppercase()));
        assert!(!signer.verify(CALLBACK_VALUES, &format!(" {} ", signature)));
        assert!(!signer.verify(CALLBACK_VALUES, &format!("{}\n", signature)));
    }

    #[test]
    fn test_permuted_order_fails() {
        let signer = WayForPaySigner::new("test_private_key");
        let signature = signer.sign(CALLBACK_VALUES);

        let mut permuted = CALLBACK_VALUES;
        permuted.swap(0, 1);
        assert!(!signer.verify(permuted, &signature));

        let mut permuted = CALLBACK_VALUES;
        permuted.swap(6, 7);
        assert!(!signer.verify(permuted, &signature));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let signer = WayForPaySigner::new("test_private_key");

        assert!(!signer.verify(CALLBACK_VALUES, "invalid_signature"));
        assert!(!signer.verify(CALLBACK_VALUES, ""));
        assert!(!signer.verify(CALLBACK_VALUES, "00112233"));
    }

    #[test]
    fn test_callback_values_from_fields() {
        let fields = CallbackFields::from_json_str(
            &json!({
                "merchantAccount": "test_merchant",
                "orderReference": "ORDER-123",
                "amount": 100.50,
                "currency": "USD",
                "authCode": "123456",
                "cardPan": "4444555566667777",
                "transactionStatus": "Approved",
                "reasonCode": 1100,
                "email": "ignored@example.com"
            })
            .to_string(),
        )
        .unwrap();

        let values = WayForPaySigner::callback_values(&fields).unwrap();
        assert_eq!(values, CALLBACK_VALUES);
    }

    #[test]
    fn test_callback_values_require_all_fields() {
        let fields = CallbackFields::from_json_str(
            r#"{"merchantAccount":"test_merchant","orderReference":"ORDER-123"}"#,
        )
        .unwrap();

        assert!(matches!(
            WayForPaySigner::callback_values(&fields),
            Err(PaymentError::InvalidCallbackData)
        ));
    }
}
