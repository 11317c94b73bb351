//! HTTP client for the NLx402 quote, verify, and paid-access flow.
//!
//! [`Nlx402Client`] drives the protocol handshake against an NLx402
//! service: fetch a price quote for the protected resource, submit it for
//! verification, and, after paying on-chain, retrieve the resource with
//! proof of settlement. Each operation is a single HTTP round trip (the
//! composite [`Nlx402Client::get_and_verify_quote`] is two, strictly
//! sequential); the client performs no retries, caching, or background
//! work.

use std::time::Duration;

use nlx402::proto::{
    AuthMeResponse, MetadataResponse, PaidAccessResponse, QuoteResponse, VerifyResponse,
};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::constants::{
    API_KEY_HEADER, AUTH_ME_PATH, DEFAULT_BASE_URL, METADATA_PATH, PAYMENT_HEADER, PROTECTED_PATH,
    TOTAL_PRICE_HEADER, VERIFY_PATH,
};
use crate::error::Error;
use crate::headers;

/// Configuration for [`Nlx402Client`].
pub struct ClientConfig {
    /// Service base URL. Trailing slashes are stripped by the client;
    /// an empty string falls back to [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Optional API key for authenticated endpoints. Can also be set
    /// later via [`Nlx402Client::set_api_key`].
    pub api_key: Option<String>,

    /// HTTP request timeout. Ignored when `http_client` is provided.
    pub timeout: Duration,

    /// Optional pre-configured reqwest client. If `None`, a new client
    /// is created with the configured timeout.
    pub http_client: Option<reqwest::Client>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(30),
            http_client: None,
        }
    }
}

impl ClientConfig {
    /// Creates a config with the given service base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("timeout", &self.timeout)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Result of [`Nlx402Client::get_and_verify_quote`].
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteAndVerify {
    /// The fetched quote.
    pub quote: QuoteResponse,
    /// The verification outcome for that quote.
    pub verify: VerifyResponse,
}

/// Client for an NLx402 payment-gated service.
///
/// All operations are async and strictly sequential; nothing runs in the
/// background. The API key is plain per-instance state: rotating it with
/// [`set_api_key`](Self::set_api_key) requires exclusive access and does
/// not affect clones, which keep their own copy of the key. Callers
/// sharing one logical key across tasks must coordinate rotation
/// themselves.
///
/// # Example
///
/// ```no_run
/// use nlx402_http::client::{ClientConfig, Nlx402Client};
///
/// # async fn run() -> Result<(), nlx402_http::error::Error> {
/// let client = Nlx402Client::new(ClientConfig::default().with_api_key("nlx-key"));
/// let flow = client.get_and_verify_quote(0.002).await?;
/// // Pay on-chain, then:
/// let access = client.get_paid_access("tx-signature", &flow.quote.nonce).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Nlx402Client {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl Nlx402Client {
    /// Creates a new client from the given configuration.
    ///
    /// The base URL is canonicalized by stripping all trailing `/`
    /// characters, so concatenated request paths never double up.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let base = if config.base_url.is_empty() {
            DEFAULT_BASE_URL.to_owned()
        } else {
            config.base_url
        };
        let base_url = base.trim_end_matches('/').to_owned();

        let client = config.http_client.unwrap_or_else(|| {
            reqwest::Client::builder()
                .timeout(config.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .expect("failed to build reqwest::Client")
        });

        Self {
            base_url,
            api_key: config.api_key,
            client,
        }
    }

    /// Creates a client for the default service URL with the given key.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::new(ClientConfig::default().with_api_key(api_key))
    }

    /// Returns the canonicalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns whether an API key is currently set.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Replaces the stored API key, e.g. after obtaining one from an
    /// auth flow.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    /// Fetches the service's public payment metadata.
    ///
    /// `GET /api/metadata`; no API key required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`], [`Error::Api`], or [`Error::Decode`].
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "nlx402.client.get_metadata", skip_all, err)
    )]
    pub async fn get_metadata(&self) -> Result<MetadataResponse, Error> {
        let body = self
            .request(
                Method::GET,
                METADATA_PATH,
                false,
                HeaderMap::new(),
                None,
                "GET /api/metadata",
            )
            .await?;
        decode(&body, "GET /api/metadata")
    }

    /// Introspects the caller's API key and wallet state.
    ///
    /// `GET /api/auth/me`; API key required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthRequired`] before any network call if no key
    /// is set, otherwise [`Error::Transport`], [`Error::Api`], or
    /// [`Error::Decode`].
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "nlx402.client.get_auth_me", skip_all, err)
    )]
    pub async fn get_auth_me(&self) -> Result<AuthMeResponse, Error> {
        let body = self
            .request(
                Method::GET,
                AUTH_ME_PATH,
                true,
                HeaderMap::new(),
                None,
                "GET /api/auth/me",
            )
            .await?;
        decode(&body, "GET /api/auth/me")
    }

    /// Requests a price quote for the protected resource.
    ///
    /// `GET /protected` with `x-total-price`; API key required. A
    /// non-positive `total_price` is silently replaced by the service
    /// default of `0.5` rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthRequired`] before any network call if no key
    /// is set, otherwise [`Error::Transport`], [`Error::Api`], or
    /// [`Error::Decode`].
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "nlx402.client.get_quote", skip(self), err)
    )]
    pub async fn get_quote(&self, total_price: f64) -> Result<QuoteResponse, Error> {
        let mut extra = HeaderMap::new();
        let price = headers::total_price_value(total_price);
        extra.insert(
            TOTAL_PRICE_HEADER,
            HeaderValue::from_str(&price).expect("formatted price is a valid header value"),
        );

        let body = self
            .request(
                Method::GET,
                PROTECTED_PATH,
                true,
                extra,
                None,
                "GET /protected (quote)",
            )
            .await?;
        decode(&body, "GET /protected (quote)")
    }

    /// Submits a quote for verification.
    ///
    /// `POST /verify` with a form body carrying the re-serialized quote;
    /// API key required. The service re-derives the quote server-side
    /// and checks that nothing was tampered with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without any network call if
    /// `nonce` or the quote's own `nonce` is empty, and
    /// [`Error::AuthRequired`] if no key is set; otherwise
    /// [`Error::Transport`], [`Error::Api`], or [`Error::Decode`].
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "nlx402.client.verify_quote", skip_all, err)
    )]
    pub async fn verify_quote(
        &self,
        quote: &QuoteResponse,
        nonce: &str,
    ) -> Result<VerifyResponse, Error> {
        if nonce.is_empty() {
            return Err(Error::InvalidArgument {
                context: "verify_quote: nonce is required",
            });
        }
        if quote.nonce.is_empty() {
            return Err(Error::InvalidArgument {
                context: "verify_quote: quote has no nonce",
            });
        }

        let payment_data = headers::quote_payment_data(quote)?;
        self.post_verify(&payment_data, nonce).await
    }

    /// Submits a pre-serialized quote JSON string for verification.
    ///
    /// Same wire behavior as [`verify_quote`](Self::verify_quote) for
    /// callers that kept the quote as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without any network call if
    /// `quote_json` or `nonce` is empty; otherwise the same errors as
    /// [`verify_quote`](Self::verify_quote).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "nlx402.client.verify_quote_raw", skip_all, err)
    )]
    pub async fn verify_quote_raw(
        &self,
        quote_json: &str,
        nonce: &str,
    ) -> Result<VerifyResponse, Error> {
        if nonce.is_empty() {
            return Err(Error::InvalidArgument {
                context: "verify_quote_raw: nonce is required",
            });
        }
        if quote_json.is_empty() {
            return Err(Error::InvalidArgument {
                context: "verify_quote_raw: payment data is required",
            });
        }

        self.post_verify(quote_json, nonce).await
    }

    /// Retrieves the protected resource with proof of settlement.
    ///
    /// `GET /protected` with the `x-payment` header; API key required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without any network call if
    /// `tx` or `nonce` is empty (or not header-safe), and
    /// [`Error::AuthRequired`] if no key is set; otherwise
    /// [`Error::Transport`], [`Error::Api`], or [`Error::Decode`].
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "nlx402.client.get_paid_access", skip_all, err)
    )]
    pub async fn get_paid_access(
        &self,
        tx: &str,
        nonce: &str,
    ) -> Result<PaidAccessResponse, Error> {
        if tx.is_empty() || nonce.is_empty() {
            return Err(Error::InvalidArgument {
                context: "get_paid_access: tx and nonce are required",
            });
        }

        let value = headers::payment_header_value(tx, nonce)?;
        let mut extra = HeaderMap::new();
        extra.insert(
            PAYMENT_HEADER,
            HeaderValue::from_str(&value).map_err(|_| Error::InvalidArgument {
                context: "get_paid_access: tx and nonce must be header-safe",
            })?,
        );

        let body = self
            .request(
                Method::GET,
                PROTECTED_PATH,
                true,
                extra,
                None,
                "GET /protected (paid access)",
            )
            .await?;
        decode(&body, "GET /protected (paid access)")
    }

    /// Fetches a quote and immediately submits it for verification.
    ///
    /// The verify step uses the quote's own nonce. A failed quote fetch
    /// short-circuits: verification is never attempted and no partial
    /// result is returned. The caller still needs to pay on-chain and
    /// call [`get_paid_access`](Self::get_paid_access) afterwards.
    ///
    /// # Errors
    ///
    /// Propagates the first failure from either step unchanged.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "nlx402.client.get_and_verify_quote", skip(self), err)
    )]
    pub async fn get_and_verify_quote(&self, total_price: f64) -> Result<QuoteAndVerify, Error> {
        let quote = self.get_quote(total_price).await?;
        let nonce = quote.nonce.clone();
        let verify = self.verify_quote(&quote, &nonce).await?;
        Ok(QuoteAndVerify { quote, verify })
    }

    /// `POST /verify` with an already-built `payment_data` value.
    async fn post_verify(&self, payment_data: &str, nonce: &str) -> Result<VerifyResponse, Error> {
        let body = headers::verify_form_body(payment_data, nonce);
        let mut extra = HeaderMap::new();
        extra.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let text = self
            .request(
                Method::POST,
                VERIFY_PATH,
                true,
                extra,
                Some(body),
                "POST /verify",
            )
            .await?;
        decode(&text, "POST /verify")
    }

    /// Performs one HTTP round trip against `base_url + path`.
    ///
    /// Attaches the `x-api-key` header when `require_api_key` is set,
    /// failing fast with [`Error::AuthRequired`] before any network call
    /// if the key is unset. Returns the raw response body on a 2xx
    /// status; a non-2xx status preserves the body in [`Error::Api`].
    async fn request(
        &self,
        method: Method,
        path: &'static str,
        require_api_key: bool,
        extra_headers: HeaderMap,
        body: Option<String>,
        context: &'static str,
    ) -> Result<String, Error> {
        let mut header_map = HeaderMap::new();
        if require_api_key {
            let key = self.api_key.as_deref().ok_or(Error::AuthRequired)?;
            let value = HeaderValue::from_str(key).map_err(|_| Error::InvalidArgument {
                context: "API key is not a valid HTTP header value",
            })?;
            header_map.insert(API_KEY_HEADER, value);
        }
        header_map.extend(extra_headers);

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url).headers(header_map);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport { context, source: e })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport { context, source: e })?;

        if !status.is_success() {
            #[cfg(feature = "telemetry")]
            tracing::warn!(%status, context, "NLx402 request failed");
            return Err(Error::Api {
                context,
                status,
                body: text,
            });
        }

        Ok(text)
    }
}

impl std::fmt::Debug for Nlx402Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nlx402Client")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Decodes a response body, tagging failures with the request context.
fn decode<T: serde::de::DeserializeOwned>(body: &str, context: &'static str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Decode { context, source: e })
}
