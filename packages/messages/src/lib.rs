//! NTT Messages - Wire Formats and Shared Interface Types
//!
//! This package defines everything that crosses a boundary between the NTT
//! contracts or between chains:
//!
//! - [`TrimmedAmount`] and the trim/untrim scaling rules for cross-chain
//!   amounts (at most 8 significant decimal places on the wire)
//! - the fixed-layout binary payloads: the 79-byte native token transfer
//!   payload and the transceiver envelope that wraps it
//! - message digests (keccak-256) used as attestation keys
//! - universal 32-byte address encoding for local addresses
//! - the execute/query interfaces spoken between the manager, the
//!   transceiver manager and individual transceivers
//!
//! All multi-byte integers on the wire are big-endian.

pub mod address;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod hash;
pub mod transceiver;
pub mod transfer;
pub mod trimmed_amount;

pub use crate::address::{from_universal, is_zero_address, to_universal};
pub use crate::envelope::{message_digest, ManagerMessage, TransceiverEnvelope};
pub use crate::error::CodecError;
pub use crate::handler::AttestedMessage;
pub use crate::hash::{bytes32_to_hex, keccak256, keccak256_parts};
pub use crate::transceiver::TransceiverInstruction;
pub use crate::transfer::NativeTokenTransfer;
pub use crate::trimmed_amount::{TrimmedAmount, TRIMMED_DECIMALS};
