//! HTTP constants for the NLx402 protocol.

/// Default NLx402 service URL.
pub const DEFAULT_BASE_URL: &str = "https://pay.thrt.ai";

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the requested total price on quote requests.
pub const TOTAL_PRICE_HEADER: &str = "x-total-price";

/// Header carrying proof of settlement on paid-access requests.
pub const PAYMENT_HEADER: &str = "x-payment";

/// Path of the public metadata endpoint.
pub const METADATA_PATH: &str = "/api/metadata";

/// Path of the API key introspection endpoint.
pub const AUTH_ME_PATH: &str = "/api/auth/me";

/// Path of the protected resource (quote and paid-access requests).
pub const PROTECTED_PATH: &str = "/protected";

/// Path of the quote verification endpoint.
pub const VERIFY_PATH: &str = "/verify";

/// Price substituted when a caller passes a non-positive total price.
pub const DEFAULT_TOTAL_PRICE: f64 = 0.5;
