#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP client for the NLx402 pay-per-request access protocol.
//!
//! Provides [`client::Nlx402Client`], which drives the quote, verify, and
//! paid-access handshake against an NLx402 service over HTTP.
//!
//! # Modules
//!
//! - [`client`] - The protocol client and its configuration
//! - [`constants`] - HTTP header names, request paths, default URLs
//! - [`error`] - Client error taxonomy
//! - [`headers`] - Wire-format encoding for headers and form bodies
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables `tracing` instrumentation of protocol calls

pub mod client;
pub mod constants;
pub mod error;
pub mod headers;
