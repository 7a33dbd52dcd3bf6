//! State definitions for the Transceiver Manager contract

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:transceiver-manager";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = "0.1.0";

/// Maximum number of transceivers per handler
pub const MAX_TRANSCEIVERS: usize = 32;

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Native denom delivery fees are paid in
    pub fee_denom: String,
}

/// A registered message handler
#[cw_serde]
pub struct HandlerInfo {
    /// Admin for this handler's transceiver set and pause switch
    pub admin: Addr,
    /// Whether this handler is paused (neither sends nor accepts)
    pub paused: bool,
}

/// Attestation state for a single message digest
#[cw_serde]
pub struct AttestationRecord {
    /// The handler the message is addressed to
    pub handler: Addr,
    /// Transceivers that have attested, in attestation order.
    /// The attestation count is the length of this set.
    pub attested: Vec<Addr>,
    /// Permanent single-shot execution flag
    pub executed: bool,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Registered handlers
/// Key: handler address, Value: HandlerInfo
pub const HANDLERS: Map<&Addr, HandlerInfo> = Map::new("handlers");

/// Reverse index from a handler's 32-byte universal address to its address,
/// used to resolve the recipient manager field of received envelopes.
pub const HANDLER_BY_UNIVERSAL: Map<&[u8], Addr> = Map::new("handler_by_universal");

/// Per-handler transceiver lists, in registration order.
/// Order is authoritative for instruction validation and must survive removal.
pub const TRANSCEIVERS: Map<&Addr, Vec<Addr>> = Map::new("transceivers");

/// Attestation records
/// Key: 32-byte message digest as &[u8], Value: AttestationRecord
pub const ATTESTATIONS: Map<&[u8], AttestationRecord> = Map::new("attestations");
