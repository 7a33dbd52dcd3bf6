//! Transceiver Manager - Attestation Aggregation for NTT
//!
//! This contract maintains, for each registered message handler, an ordered
//! list of attestation channels (transceivers), fans outbound envelopes out to
//! all of them, collects inbound attestations, and dispatches a message to its
//! handler once the handler's threshold of independent attestations is met.
//!
//! # Outbound
//! 1. A handler sends its encoded envelope with the exact delivery fee
//! 2. The fee is re-quoted and split across the handler's transceivers
//! 3. Each transceiver receives its fee slice and its own instruction
//!
//! # Inbound
//! 1. Each transceiver independently delivers a verified envelope
//! 2. Attestations are recorded per (digest, transceiver), duplicates rejected
//! 3. Once the handler's threshold is met, anyone may execute the message,
//!    which flips the permanent executed flag and dispatches to the handler
//!
//! # Security
//! - Per-channel single attestation, per-message single execution
//! - Transceiver order is registration order and is part of the contract
//! - Per-handler pause switch gates both directions

pub mod contract;
pub mod error;
mod execute;
pub mod msg;
pub mod query;
pub mod state;

pub use crate::error::ContractError;
