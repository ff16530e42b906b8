//! Payment confirmation gateway adapter.
//!
//! The gateway itself is a hosted third party: we only build the signed
//! redirect URL the customer is sent to, and interpret the signed return
//! leg. The lifecycle manager never sequences payment itself; the storefront
//! drives the redirect and calls back into order creation after the return
//! leg reports success (see DESIGN.md on why this ordering is not enforced
//! server-side).

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Return payload signature mismatch")]
    BadSignature,
    #[error("Malformed return payload: {0}")]
    MalformedReturn(String),
    #[error("Amount not representable in minor units: {0}")]
    BadAmount(Decimal),
}

/// What the gateway's response code means for the order flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Cancelled,
    Failed,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Builds the redirect URL the customer is sent to for payment.
    async fn build_redirect_url(
        &self,
        order_ref: &str,
        amount: Decimal,
        return_url: &str,
    ) -> Result<String, PaymentError>;

    /// Verifies and interprets the query parameters of the return leg.
    async fn parse_return(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<PaymentOutcome, PaymentError>;
}

const SIGNATURE_CONTEXT: &str = "bloomline payment gateway v1";
const PARAM_SIGNATURE: &str = "sig";
const CODE_SUCCESS: &str = "00";
const CODE_CANCELLED: &str = "24";

/// Gateway adapter that signs the canonical query string with a keyed hash.
#[derive(Debug, Clone)]
pub struct SignedRedirectGateway {
    merchant_code: String,
    base_url: String,
    key: [u8; 32],
}

impl SignedRedirectGateway {
    pub fn new(merchant_code: String, base_url: String, secret_key: &str) -> Self {
        let key = blake3::derive_key(SIGNATURE_CONTEXT, secret_key.as_bytes());
        Self {
            merchant_code,
            base_url,
            key,
        }
    }

    /// Keyed hash over `k=v` pairs in ascending key order, hex-encoded.
    fn sign(&self, params: &BTreeMap<String, String>) -> String {
        let canonical = params
            .iter()
            .filter(|(k, _)| k.as_str() != PARAM_SIGNATURE)
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        hex::encode(blake3::keyed_hash(&self.key, canonical.as_bytes()).as_bytes())
    }

    /// Amount in minor units (cents); the gateway wire format takes no
    /// decimal point.
    fn minor_units(amount: Decimal) -> Result<i64, PaymentError> {
        let scaled = amount * Decimal::from(100);
        if scaled.fract() != Decimal::ZERO {
            return Err(PaymentError::BadAmount(amount));
        }
        scaled.to_i64().ok_or(PaymentError::BadAmount(amount))
    }
}

/// Percent-encodes everything outside the URL-unreserved set.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            other => {
                out.push_str(&format!("%{other:02X}"));
            }
        }
    }
    out
}

#[async_trait]
impl PaymentGateway for SignedRedirectGateway {
    async fn build_redirect_url(
        &self,
        order_ref: &str,
        amount: Decimal,
        return_url: &str,
    ) -> Result<String, PaymentError> {
        let mut params = BTreeMap::new();
        params.insert("amount".to_string(), Self::minor_units(amount)?.to_string());
        params.insert("merchant".to_string(), self.merchant_code.clone());
        params.insert("order_ref".to_string(), order_ref.to_string());
        params.insert("return_url".to_string(), return_url.to_string());

        let signature = self.sign(&params);
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", encode_component(v)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}?{query}&{PARAM_SIGNATURE}={signature}", self.base_url);
        debug!(order_ref, "Redirect URL built");
        Ok(url)
    }

    async fn parse_return(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<PaymentOutcome, PaymentError> {
        let provided = params
            .get(PARAM_SIGNATURE)
            .ok_or_else(|| PaymentError::MalformedReturn("missing signature".to_string()))?;
        if *provided != self.sign(params) {
            return Err(PaymentError::BadSignature);
        }
        let code = params
            .get("code")
            .ok_or_else(|| PaymentError::MalformedReturn("missing response code".to_string()))?;
        Ok(match code.as_str() {
            CODE_SUCCESS => PaymentOutcome::Success,
            CODE_CANCELLED => PaymentOutcome::Cancelled,
            _ => PaymentOutcome::Failed,
        })
    }
}
