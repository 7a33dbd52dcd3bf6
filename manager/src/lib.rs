//! NTT Manager - Native Token Transfer Orchestration
//!
//! This contract is the user-facing entry point of the NTT core. It validates
//! outbound transfers, trims amounts to wire precision, drives the rate
//! limiter, and hands encoded envelopes to the transceiver manager for
//! fan-out. Inbound, it terminates attested messages dispatched back by the
//! transceiver manager and mints to the recipient.
//!
//! # Outbound Flow
//! 1. User grants a burn allowance and calls `Transfer` with the delivery fee
//! 2. The amount is trimmed to the peer's wire precision; dust is rejected
//! 3. On capacity the envelope is sent through every configured transceiver;
//!    on shortfall the transfer is queued for deferred completion
//!
//! # Inbound Flow
//! 1. Transceivers attest a remote envelope at the transceiver manager
//! 2. Once the threshold is met, anyone executes the message
//! 3. The manager validates the peer registry entry, applies the inbound rate
//!    limit and either mints immediately or queues for deferred completion
//!
//! # Security
//! - Dual-bucket continuous-refill rate limiting with cross-direction credit
//! - Peer registry is authoritative; envelope claims are always cross-checked
//! - Deposits are burned up front; cancellation mints back
//! - Security-weakening governance changes (admin handover, threshold
//!   decrease) rest on a schedule before they can be applied
//! - Emergency pause gates every user-facing operation

pub mod contract;
pub mod error;
mod execute;
pub mod msg;
mod query;
pub mod rate_limit;
pub mod state;

pub use crate::error::ContractError;
pub use crate::rate_limit::{inbound_bucket_id, outbound_bucket_id, RateLimitBucket};
