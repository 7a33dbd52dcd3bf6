//! State definitions for the NTT Manager contract

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};
use ntt_messages::{TransceiverInstruction, TrimmedAmount};

use crate::error::ContractError;
use crate::rate_limit::RateLimitBucket;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Whether the manager is currently paused
    pub paused: bool,
    /// This chain's id in the peer registry namespace
    pub chain_id: u16,
    /// The transceiver manager this handler sends through
    pub aggregator: Addr,
    /// Attestations required before an inbound message may execute
    pub threshold: u8,
    /// Native denom delivery fees are paid in
    pub fee_denom: String,
    /// The NTT token, bound at initialisation
    pub token: Option<TokenConfig>,
}

impl Config {
    /// The bound NTT token, or `Uninitialised` before `Initialize`.
    pub fn token(&self) -> Result<&TokenConfig, ContractError> {
        self.token.as_ref().ok_or(ContractError::Uninitialised)
    }
}

/// The cw20 token the manager burns and mints
#[cw_serde]
pub struct TokenConfig {
    /// Token contract address
    pub address: Addr,
    /// Token decimals on this chain
    pub decimals: u8,
}

/// Manager statistics
///
/// Counters track submissions: a cancelled outbound transfer stays counted
/// (its deposit is minted back but the submission happened).
#[cw_serde]
pub struct Stats {
    /// Outbound transfers accepted (dispatched or queued)
    pub total_outbound_transfers: u64,
    /// Inbound transfers minted (immediate or after queueing)
    pub total_inbound_transfers: u64,
    /// Total amount burned by outbound submissions
    pub total_burned: Uint128,
    /// Total amount minted to inbound recipients
    pub total_minted: Uint128,
}

// ============================================================================
// Timelocked Governance Changes
// ============================================================================

/// A governance change that weakens a security control and therefore rests
/// for a mandatory period before it can be applied.
///
/// Strengthening moves (raising the threshold) bypass this machinery and
/// apply immediately; both changes here widen the attack surface, so users
/// get the rest period as notice.
#[cw_serde]
pub enum GovernanceChange {
    /// Hand the admin role to a new address.
    /// Applied by the designated recipient, claiming the role.
    AdminHandover { to: Addr },
    /// Lower the attestation threshold.
    /// Messages whose attestations accumulated under the old threshold would
    /// otherwise flip to approved retroactively.
    ThresholdDecrease { threshold: u8 },
}

impl GovernanceChange {
    pub fn kind(&self) -> ChangeKind {
        match self {
            GovernanceChange::AdminHandover { .. } => ChangeKind::AdminHandover,
            GovernanceChange::ThresholdDecrease { .. } => ChangeKind::ThresholdDecrease,
        }
    }

    /// Seconds the change must rest before it may be applied.
    pub fn rest_period(&self) -> u64 {
        match self {
            // a week of notice before the manager changes hands
            GovernanceChange::AdminHandover { .. } => 60 * 60 * 24 * 7,
            // a day of notice before in-flight messages need fewer votes
            GovernanceChange::ThresholdDecrease { .. } => 60 * 60 * 24,
        }
    }
}

/// Selects one slot in the governance schedule. At most one change of each
/// kind is scheduled at a time; rescheduling restarts the rest period.
#[cw_serde]
#[derive(Copy)]
pub enum ChangeKind {
    AdminHandover,
    ThresholdDecrease,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::AdminHandover => "admin_handover",
            ChangeKind::ThresholdDecrease => "threshold_decrease",
        }
    }
}

/// A governance change sitting out its rest period
#[cw_serde]
pub struct ScheduledChange {
    /// The change to apply
    pub change: GovernanceChange,
    /// Block timestamp at which the change becomes applicable
    pub ready_at: u64,
}

// ============================================================================
// Peer Registry
// ============================================================================

/// A registered peer manager on a remote chain
#[cw_serde]
pub struct Peer {
    /// Peer manager contract address (32 bytes, never zero)
    pub address: [u8; 32],
    /// Token decimals on the peer chain, in [1, 18]
    pub decimals: u8,
}

// ============================================================================
// Deferred Transfers
// ============================================================================

/// An outbound transfer awaiting rate-limit capacity
///
/// The deposit is already burned; completion dispatches the envelope,
/// cancellation mints the deposit back to the initiator.
#[cw_serde]
pub struct OutboundQueuedTransfer {
    /// Block timestamp when the transfer was queued
    pub queued_at: u64,
    /// Deposited amount at local precision
    pub untrimmed: Uint128,
    /// Amount at wire precision
    pub amount: TrimmedAmount,
    /// Destination chain
    pub to_chain: u16,
    /// Recipient on the destination chain
    pub recipient: [u8; 32],
    /// Local account that initiated the transfer
    pub initiator: Addr,
    /// Transceiver instructions captured at submission
    pub instructions: Vec<TransceiverInstruction>,
}

/// An inbound transfer awaiting rate-limit capacity
#[cw_serde]
pub struct InboundQueuedTransfer {
    /// Block timestamp when the transfer was queued
    pub queued_at: u64,
    /// Amount to mint at local precision
    pub amount: Uint128,
    /// Chain the transfer arrived from
    pub source_chain: u16,
    /// Local recipient
    pub recipient: Addr,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:ntt-manager";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = "0.1.0";

// ============================================================================
// Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Manager statistics
pub const STATS: Item<Stats> = Item::new("stats");

/// Governance changes sitting out their rest period
/// Key: ChangeKind::as_str(), Value: ScheduledChange
pub const SCHEDULED_CHANGES: Map<&str, ScheduledChange> = Map::new("scheduled_changes");

/// Outbound message sequence counter; strictly monotonic and gap-free
pub const SEQUENCE: Item<u64> = Item::new("sequence");

/// Peer registry
/// Key: peer chain id, Value: Peer
pub const PEERS: Map<u16, Peer> = Map::new("peers");

/// Rate limit buckets
/// Key: 32-byte bucket id as &[u8], Value: RateLimitBucket
pub const BUCKETS: Map<&[u8], RateLimitBucket> = Map::new("buckets");

/// Outbound transfers awaiting capacity
/// Key: 32-byte message id as &[u8], Value: OutboundQueuedTransfer
pub const OUTBOUND_QUEUE: Map<&[u8], OutboundQueuedTransfer> = Map::new("outbound_queue");

/// Inbound transfers awaiting capacity
/// Key: 32-byte message digest as &[u8], Value: InboundQueuedTransfer
pub const INBOUND_QUEUE: Map<&[u8], InboundQueuedTransfer> = Map::new("inbound_queue");
