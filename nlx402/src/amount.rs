//! Decimal parsing and scaling for NLx402 amount strings.
//!
//! Quote amounts travel on the wire as decimal strings to avoid float
//! precision loss. This module parses them with [`rust_decimal`] and
//! scales atomic token amounts into UI units using a mint's `decimals`.

use rust_decimal::Decimal;

/// Maximum `decimals` value representable by [`Decimal`].
const MAX_DECIMALS: u32 = 28;

/// Errors from parsing or scaling an amount string.
#[derive(Debug, thiserror::Error)]
pub enum AmountError {
    /// The amount string is not a valid decimal number.
    #[error("invalid amount string {value:?}: {source}")]
    Parse {
        /// The offending input.
        value: String,
        /// The underlying decimal parse error.
        #[source]
        source: rust_decimal::Error,
    },

    /// The `decimals` value exceeds the precision [`Decimal`] can carry.
    #[error("unsupported decimals value {0} (max 28)")]
    UnsupportedDecimals(u32),

    /// The scaled amount cannot be represented without losing precision.
    #[error("amount {value:?} cannot be represented at {decimals} decimals")]
    OutOfRange {
        /// The atomic amount that failed to scale.
        value: String,
        /// The requested scale.
        decimals: u32,
    },
}

/// Parses a decimal-as-string amount.
///
/// # Errors
///
/// Returns [`AmountError::Parse`] if the string is not a valid decimal.
pub fn parse(value: &str) -> Result<Decimal, AmountError> {
    value.parse::<Decimal>().map_err(|e| AmountError::Parse {
        value: value.to_owned(),
        source: e,
    })
}

/// Scales an atomic amount string into UI units (`amount / 10^decimals`).
///
/// # Errors
///
/// Returns [`AmountError`] if the string does not parse, `decimals`
/// exceeds the supported precision, or the scaled result cannot be
/// represented exactly.
pub fn to_ui_units(value: &str, decimals: u32) -> Result<Decimal, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    let atomic = parse(value)?;
    atomic
        .checked_mul(Decimal::new(1, decimals))
        .ok_or_else(|| AmountError::OutOfRange {
            value: value.to_owned(),
            decimals,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimal_strings() {
        assert_eq!(parse("1500000").unwrap(), Decimal::new(1_500_000, 0));
        assert_eq!(parse("0.5").unwrap(), Decimal::new(5, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse("not a number"), Err(AmountError::Parse { .. })));
        assert!(matches!(parse(""), Err(AmountError::Parse { .. })));
    }

    #[test]
    fn scales_atomic_amounts_by_decimals() {
        assert_eq!(to_ui_units("1500000", 6).unwrap(), Decimal::new(15, 1));
        assert_eq!(to_ui_units("1", 9).unwrap(), Decimal::new(1, 9));
        assert_eq!(to_ui_units("42", 0).unwrap(), Decimal::new(42, 0));
    }

    #[test]
    fn rejects_oversized_decimals() {
        assert!(matches!(
            to_ui_units("1", 29),
            Err(AmountError::UnsupportedDecimals(29))
        ));
    }
}
