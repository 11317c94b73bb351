//! Wire format types for the NLx402 payment flow.
//!
//! The protocol is a four-step handshake against a payment-gated service:
//!
//! 1. `GET /api/metadata` — discover supported chains and mints
//! 2. `GET /protected` with `x-total-price` — obtain a [`QuoteResponse`]
//! 3. `POST /verify` — submit the quote for acceptance ([`VerifyResponse`])
//! 4. `GET /protected` with `x-payment` — fetch the resource after paying
//!    ([`PaidAccessResponse`])
//!
//! All wire field names are snake_case, matching the JSON exactly.
//!
//! # Lenient decoding
//!
//! Individual fields decode leniently: a missing or mistyped field becomes
//! that field's zero value ([`DefaultOnError`]), and non-string entries in
//! string arrays are skipped in order ([`VecSkipError`]). A document that
//! is not valid JSON at all is rejected by the caller before these types
//! are involved.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, VecSkipError, serde_as};

use crate::amount::{self, AmountError};

/// Response from the public `GET /api/metadata` endpoint.
///
/// A snapshot of what the service currently supports; created fresh per
/// call and never mutated.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    /// Whether the service reported success.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub ok: bool,

    /// Nested service description.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: ServiceMetadata,

    /// Mint addresses the service accepts payment in.
    #[serde_as(deserialize_as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    pub supported_mints: Vec<String>,
}

/// The nested `metadata` object of a [`MetadataResponse`].
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceMetadata {
    /// Network the service settles on (e.g. `"mainnet"`).
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub network: String,

    /// Chains the service can quote for, in service order.
    #[serde_as(deserialize_as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    pub supported_chains: Vec<String>,

    /// Service version string.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub version: String,
}

/// Response from `GET /api/auth/me`: introspection of the caller's key.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthMeResponse {
    /// Whether the key is valid.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub ok: bool,

    /// Unix timestamp (seconds) the key was created at.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub created_at: f64,

    /// Wallet the key is bound to.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub wallet_id: String,

    /// Mint the wallet currently pays with.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub selected_mint: String,
}

/// A price quote for one access to the protected resource.
///
/// A quote is only meaningful together with its `nonce`, which correlates
/// it to the later verification and settlement steps. `expires_at` bounds
/// the quote's validity window; expiry is enforced server-side.
///
/// Field declaration order is the wire order: re-serializing a quote (for
/// the verify step's `payment_data` form field) must produce the same key
/// sequence the service uses when it re-derives the quote for its tamper
/// check.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Amount due, in atomic units, as a decimal string.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub amount: String,

    /// Chain the payment must land on.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub chain: String,

    /// Decimal places of the mint (scales `amount` into UI units).
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub decimals: u32,

    /// Unix timestamp (seconds) after which the quote is void.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub expires_at: i64,

    /// Mint (token) the payment must use.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub mint: String,

    /// Network identifier.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub network: String,

    /// One-time identifier tying this quote to verification and settlement.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub nonce: String,

    /// Address the payment must be sent to.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub recipient: String,

    /// Quote format version.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub version: String,
}

impl QuoteResponse {
    /// Parses the atomic `amount` string as a decimal.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Parse`] if the amount is not a valid decimal
    /// string (including the empty default of a lenient decode).
    pub fn amount_decimal(&self) -> Result<Decimal, AmountError> {
        amount::parse(&self.amount)
    }

    /// Returns the amount scaled into UI units by this quote's `decimals`.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError`] if the amount does not parse or cannot be
    /// represented at the quoted scale.
    pub fn ui_amount(&self) -> Result<Decimal, AmountError> {
        amount::to_ui_units(&self.amount, self.decimals)
    }
}

/// Response from `POST /verify`: acceptance or rejection of a quote.
#[serde_as]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the service accepted the submitted quote.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub ok: bool,
}

/// Settlement details echoed back inside a [`PaidAccessResponse`].
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementDetails {
    /// Amount that was settled, in atomic units.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub amount: String,

    /// Decimal places of the settled mint.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub decimals: u32,

    /// Mint the payment used.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub mint: String,

    /// Nonce of the settled quote.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub nonce: String,

    /// Settlement status reported by the service.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub status: String,

    /// On-chain transaction identifier.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub tx: String,

    /// Settlement format version.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub version: String,
}

/// Response from the paid `GET /protected` call.
///
/// The service echoes the payment details under `x402` as proof of
/// settlement alongside the access result.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaidAccessResponse {
    /// Whether access was granted.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub ok: bool,

    /// Echoed settlement details.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub x402: SettlementDetails,
}

/// Proof of settlement presented in the `x-payment` request header.
///
/// Serialized inline as compact JSON; field order is part of the wire
/// format (`tx` before `nonce`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    /// On-chain transaction identifier of the payment.
    pub tx: String,
    /// Nonce of the quote the payment settles.
    pub nonce: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_metadata() {
        let body = json!({
            "ok": true,
            "metadata": {
                "network": "mainnet",
                "supported_chains": ["solana", "base"],
                "version": "1.2.0"
            },
            "supported_mints": ["USDC", "USDT"]
        });
        let parsed: MetadataResponse = serde_json::from_value(body).unwrap();
        assert!(parsed.ok);
        assert_eq!(parsed.metadata.network, "mainnet");
        assert_eq!(parsed.metadata.supported_chains, ["solana", "base"]);
        assert_eq!(parsed.metadata.version, "1.2.0");
        assert_eq!(parsed.supported_mints, ["USDC", "USDT"]);
    }

    #[test]
    fn skips_non_string_array_entries_in_order() {
        let body = json!({
            "metadata": { "supported_chains": ["solana", 7, null, "base", {}] },
            "supported_mints": ["USDC", false]
        });
        let parsed: MetadataResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.metadata.supported_chains, ["solana", "base"]);
        assert_eq!(parsed.supported_mints, ["USDC"]);
    }

    #[test]
    fn mistyped_fields_decode_to_zero_values() {
        let body = json!({
            "ok": "yes",
            "metadata": 42,
            "supported_mints": "USDC"
        });
        let parsed: MetadataResponse = serde_json::from_value(body).unwrap();
        assert!(!parsed.ok);
        assert_eq!(parsed.metadata, ServiceMetadata::default());
        assert!(parsed.supported_mints.is_empty());
    }

    #[test]
    fn auth_me_tolerates_missing_fields() {
        let parsed: AuthMeResponse = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert!(parsed.ok);
        assert_eq!(parsed.created_at, 0.0);
        assert_eq!(parsed.wallet_id, "");
        assert_eq!(parsed.selected_mint, "");
    }

    #[test]
    fn decodes_full_quote() {
        let body = json!({
            "amount": "1500000",
            "chain": "solana",
            "decimals": 6,
            "expires_at": 1_700_000_000,
            "mint": "USDC",
            "network": "mainnet",
            "nonce": "n-123",
            "recipient": "wallet-1",
            "version": "1"
        });
        let parsed: QuoteResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.amount, "1500000");
        assert_eq!(parsed.decimals, 6);
        assert_eq!(parsed.expires_at, 1_700_000_000);
        assert_eq!(parsed.nonce, "n-123");
        assert_eq!(parsed.ui_amount().unwrap().to_string(), "1.500000");
    }

    #[test]
    fn quote_serializes_in_wire_order() {
        let quote = QuoteResponse {
            amount: "1000".into(),
            chain: "solana".into(),
            decimals: 6,
            expires_at: 1_700_000_000,
            mint: "USDC".into(),
            network: "mainnet".into(),
            nonce: "n-1".into(),
            recipient: "r-1".into(),
            version: "1".into(),
        };
        let json = serde_json::to_string(&quote).unwrap();
        assert_eq!(
            json,
            r#"{"amount":"1000","chain":"solana","decimals":6,"expires_at":1700000000,"mint":"USDC","network":"mainnet","nonce":"n-1","recipient":"r-1","version":"1"}"#
        );
    }

    #[test]
    fn default_quote_serializes_all_nine_fields() {
        let json = serde_json::to_string(&QuoteResponse::default()).unwrap();
        assert_eq!(
            json,
            r#"{"amount":"","chain":"","decimals":0,"expires_at":0,"mint":"","network":"","nonce":"","recipient":"","version":""}"#
        );
    }

    #[test]
    fn paid_access_without_settlement_details_defaults() {
        let parsed: PaidAccessResponse = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert!(parsed.ok);
        assert_eq!(parsed.x402, SettlementDetails::default());
    }

    #[test]
    fn paid_access_decodes_nested_settlement() {
        let body = json!({
            "ok": true,
            "x402": {
                "amount": "1500000",
                "decimals": 6,
                "mint": "USDC",
                "nonce": "n-123",
                "status": "settled",
                "tx": "sig-abc",
                "version": "1"
            }
        });
        let parsed: PaidAccessResponse = serde_json::from_value(body).unwrap();
        assert!(parsed.ok);
        assert_eq!(parsed.x402.tx, "sig-abc");
        assert_eq!(parsed.x402.status, "settled");
        assert_eq!(parsed.x402.decimals, 6);
    }

    #[test]
    fn payment_proof_serializes_tx_before_nonce() {
        let proof = PaymentProof {
            tx: "sig-abc".into(),
            nonce: "n-123".into(),
        };
        assert_eq!(
            serde_json::to_string(&proof).unwrap(),
            r#"{"tx":"sig-abc","nonce":"n-123"}"#
        );
    }
}
