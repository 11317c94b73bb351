#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the NLx402 pay-per-request access protocol.
//!
//! NLx402 gates HTTP resources behind micropayments: a client asks the
//! service for a price quote, submits the quote for verification, pays
//! on-chain, and then retrieves the resource by presenting proof of
//! settlement. This crate provides the wire types exchanged during that
//! flow. It performs no I/O; the HTTP client lives in the `nlx402-http`
//! crate.
//!
//! # Modules
//!
//! - [`amount`] - Decimal parsing and scaling for amount strings
//! - [`proto`] - Wire format types for quotes, verification, and settlement
//!
//! # Decoding model
//!
//! NLx402 services evolve their response shapes independently of clients,
//! so the response types here decode leniently: a missing or mistyped
//! field yields that field's zero value instead of failing the whole
//! response. Only an unparsable document is an error, and that error is
//! raised by the transport layer, not here.

pub mod amount;
pub mod proto;
