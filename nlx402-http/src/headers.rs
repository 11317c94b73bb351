//! Wire-format encoding for NLx402 request headers and bodies.
//!
//! These are pure functions so the exact bytes put on the wire can be
//! unit-tested without a server.

use nlx402::proto::{PaymentProof, QuoteResponse};

use crate::constants::DEFAULT_TOTAL_PRICE;
use crate::error::Error;

/// Formats the `x-total-price` header value with eight fraction digits.
///
/// Non-positive prices are replaced by [`DEFAULT_TOTAL_PRICE`]. The
/// substitution (rather than a rejection) is long-standing client
/// behavior that callers depend on; see the module tests.
#[must_use]
pub fn total_price_value(total_price: f64) -> String {
    let total = if total_price <= 0.0 {
        DEFAULT_TOTAL_PRICE
    } else {
        total_price
    };
    format!("{total:.8}")
}

/// Serializes a quote into the compact JSON carried by the `payment_data`
/// form field. All nine quote fields are emitted in wire order, with
/// unset strings as `""` and unset numerics as `0`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if JSON serialization fails.
pub fn quote_payment_data(quote: &QuoteResponse) -> Result<String, Error> {
    serde_json::to_string(quote).map_err(|e| Error::Decode {
        context: "serialize payment_data",
        source: e,
    })
}

/// Builds the `x-payment` header value: the settlement proof as compact
/// inline JSON, `tx` before `nonce`. The value must stay parseable by the
/// service, so it is never percent-encoded.
///
/// # Errors
///
/// Returns [`Error::Decode`] if JSON serialization fails.
pub fn payment_header_value(tx: &str, nonce: &str) -> Result<String, Error> {
    let proof = PaymentProof {
        tx: tx.to_owned(),
        nonce: nonce.to_owned(),
    };
    serde_json::to_string(&proof).map_err(|e| Error::Decode {
        context: "serialize x-payment header",
        source: e,
    })
}

/// Assembles the `POST /verify` form body.
///
/// Only `payment_data` is percent-encoded; `nonce` is appended raw, as
/// the service expects this exact shape. A nonce containing `&` or `=`
/// would corrupt the body, but nonces are service-issued opaque tokens
/// and the raw tail is kept for wire compatibility.
#[must_use]
pub fn verify_form_body(payment_data: &str, nonce: &str) -> String {
    format!(
        "payment_data={}&nonce={}",
        urlencoding::encode(payment_data),
        nonce
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_price_with_eight_fraction_digits() {
        assert_eq!(total_price_value(0.002), "0.00200000");
        assert_eq!(total_price_value(1.0), "1.00000000");
        assert_eq!(total_price_value(12.345_678_9), "12.34567890");
    }

    #[test]
    fn non_positive_prices_fall_back_to_default() {
        assert_eq!(total_price_value(0.0), "0.50000000");
        assert_eq!(total_price_value(-5.0), "0.50000000");
    }

    #[test]
    fn form_body_encodes_payment_data_only() {
        let body = verify_form_body(r#"{"a":"b"}"#, "n-1&x=y");
        assert_eq!(body, "payment_data=%7B%22a%22%3A%22b%22%7D&nonce=n-1&x=y");
    }

    #[test]
    fn form_body_round_trips_a_full_quote() {
        let quote = QuoteResponse {
            amount: "1500000".into(),
            chain: "solana".into(),
            decimals: 6,
            expires_at: 1_700_000_000,
            mint: "USDC".into(),
            network: "mainnet".into(),
            nonce: "n-123".into(),
            recipient: "wallet-1".into(),
            version: "1".into(),
        };
        let payment_data = quote_payment_data(&quote).unwrap();
        let body = verify_form_body(&payment_data, &quote.nonce);

        let encoded = body
            .strip_prefix("payment_data=")
            .and_then(|rest| rest.strip_suffix("&nonce=n-123"))
            .unwrap();
        let decoded = urlencoding::decode(encoded).unwrap();
        let parsed: QuoteResponse = serde_json::from_str(&decoded).unwrap();
        assert_eq!(parsed, quote);
    }

    #[test]
    fn default_quote_payment_data_has_all_nine_keys() {
        let data = quote_payment_data(&QuoteResponse::default()).unwrap();
        for key in [
            "\"amount\":\"\"",
            "\"chain\":\"\"",
            "\"decimals\":0",
            "\"expires_at\":0",
            "\"mint\":\"\"",
            "\"network\":\"\"",
            "\"nonce\":\"\"",
            "\"recipient\":\"\"",
            "\"version\":\"\"",
        ] {
            assert!(data.contains(key), "missing {key} in {data}");
        }
    }

    #[test]
    fn payment_header_is_inline_json() {
        assert_eq!(
            payment_header_value("sig-abc", "n-123").unwrap(),
            r#"{"tx":"sig-abc","nonce":"n-123"}"#
        );
    }
}
