//! Message types for the NTT Manager contract

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128, Uint256};
use cw20::Cw20ReceiveMsg;
use ntt_messages::handler::ThresholdResponse;
use ntt_messages::{AttestedMessage, TransceiverInstruction};

use crate::state::{ChangeKind, GovernanceChange};

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// This chain's id in the peer registry namespace
    pub chain_id: u16,
    /// The transceiver manager to register with and send through
    pub aggregator: String,
    /// Attestations required before an inbound message may execute
    pub threshold: u8,
    /// Native denom delivery fees are paid in
    pub fee_denom: String,
    /// Outbound bucket limit
    pub outbound_limit: Uint256,
    /// Outbound bucket refill window in seconds
    pub rate_duration: u64,
}

/// Selects a rate limit bucket
#[cw_serde]
pub enum BucketSelector {
    /// The single outbound bucket
    Outbound {},
    /// The inbound bucket for a peer chain
    Inbound { chain: u16 },
}

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    /// Send tokens to a peer chain.
    /// The caller must have granted the manager a burn allowance for
    /// `amount`; the delivery fee is attached as native funds and any excess
    /// over the quoted total is refunded.
    Transfer {
        /// Amount to transfer, at local precision
        amount: Uint128,
        /// Destination chain
        to_chain: u16,
        /// Recipient on the destination chain (32 bytes)
        recipient: Binary,
        /// Queue instead of failing on a rate-limit shortfall
        should_queue: bool,
        /// Per-transceiver instructions, in transceiver registration order
        transceiver_instructions: Vec<TransceiverInstruction>,
    },

    /// Send tokens to a peer chain via a cw20 send hook.
    /// Must originate from the configured NTT token; no native fee can ride
    /// the hook, so the quoted delivery total must be zero unless the
    /// transfer queues.
    Receive(Cw20ReceiveMsg),

    /// Terminate an attested inbound message.
    /// Only the transceiver manager may call; it has already enforced the
    /// attestation threshold and the single-shot execution flag.
    ReceiveAttestedMessage(AttestedMessage),

    /// Dispatch an outbound transfer that was queued on a rate-limit
    /// shortfall. Anyone may call once the outbound window has elapsed,
    /// attaching the delivery fee.
    CompleteOutboundQueued { message_id: Binary },

    /// Cancel a queued outbound transfer, minting the deposit back.
    /// Only the initiator may cancel.
    CancelOutboundQueued { message_id: Binary },

    /// Mint an inbound transfer that was queued on a rate-limit shortfall.
    /// Anyone may call once the inbound window has elapsed.
    CompleteInboundQueued { digest: Binary },

    /// Bind the NTT token and register with the transceiver manager
    /// (admin only, one-shot)
    Initialize { token: String },

    /// Create or replace a peer registry entry (admin only)
    SetPeer {
        chain: u16,
        /// Peer manager contract address (32 bytes, never zero)
        address: Binary,
        /// Token decimals on the peer chain, in [1, 18]
        decimals: u8,
        /// Inbound bucket limit for this peer
        inbound_limit: Uint256,
    },

    /// Update a bucket's limit (admin only)
    SetRateLimit {
        bucket: BucketSelector,
        limit: Uint256,
    },

    /// Update a bucket's refill window (admin only)
    SetRateDuration {
        bucket: BucketSelector,
        duration: u64,
    },

    /// Update the attestation threshold (admin only).
    /// Increases apply immediately; a decrease enters the governance
    /// schedule and rests before it can be applied.
    SetThreshold { threshold: u8 },

    /// Schedule handing the admin role to a new address (admin only).
    /// The recipient claims the role with `ApplyChange` after the rest
    /// period.
    HandOverAdmin { to: String },

    /// Apply a scheduled governance change once its rest period has elapsed.
    /// An admin handover is claimed by its recipient; a threshold decrease
    /// is applied by the admin.
    ApplyChange { kind: ChangeKind },

    /// Take a scheduled governance change off the schedule (admin only)
    CancelChange { kind: ChangeKind },

    /// Pause the manager (admin only)
    Pause {},

    /// Unpause the manager (admin only)
    Unpause {},
}

/// cw20 receive hook message (second deposit path)
#[cw_serde]
pub enum ReceiveMsg {
    /// Send the received tokens to a peer chain
    Transfer {
        to_chain: u16,
        recipient: Binary,
        should_queue: bool,
        transceiver_instructions: Vec<TransceiverInstruction>,
    },
}

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns manager status
    #[returns(StatusResponse)]
    Status {},

    /// Returns manager statistics
    #[returns(StatsResponse)]
    Stats {},

    /// Returns a peer registry entry
    #[returns(PeerResponse)]
    Peer { chain: u16 },

    /// Returns peer registry entries
    #[returns(PeersResponse)]
    Peers {
        start_after: Option<u16>,
        limit: Option<u32>,
    },

    /// Returns the next outbound sequence number
    #[returns(SequenceResponse)]
    Sequence {},

    /// Returns the attestation threshold
    /// (also read by the transceiver manager at execution time)
    #[returns(ThresholdResponse)]
    Threshold {},

    /// Returns a bucket with its capacity at query time
    #[returns(BucketResponse)]
    Bucket { bucket: BucketSelector },

    /// Returns a queued outbound transfer
    #[returns(Option<OutboundQueuedResponse>)]
    OutboundQueued { message_id: Binary },

    /// Returns queued outbound transfers
    #[returns(OutboundQueueResponse)]
    OutboundQueue {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    /// Returns a queued inbound transfer
    #[returns(Option<InboundQueuedResponse>)]
    InboundQueued { digest: Binary },

    /// Returns queued inbound transfers
    #[returns(InboundQueueResponse)]
    InboundQueue {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    /// Returns the governance changes currently sitting out their rest
    /// period
    #[returns(ScheduledChangesResponse)]
    ScheduledChanges {},
}

// Response types

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub chain_id: u16,
    pub aggregator: Addr,
    pub threshold: u8,
    pub fee_denom: String,
    pub token: Option<Addr>,
    pub token_decimals: Option<u8>,
}

#[cw_serde]
pub struct StatusResponse {
    pub paused: bool,
    pub initialized: bool,
    pub registered_peers: u32,
    pub sequence: u64,
    pub threshold: u8,
}

#[cw_serde]
pub struct StatsResponse {
    pub total_outbound_transfers: u64,
    pub total_inbound_transfers: u64,
    pub total_burned: Uint128,
    pub total_minted: Uint128,
}

#[cw_serde]
pub struct PeerResponse {
    pub chain: u16,
    pub address: Binary,
    pub decimals: u8,
}

#[cw_serde]
pub struct PeersResponse {
    pub peers: Vec<PeerResponse>,
}

#[cw_serde]
pub struct SequenceResponse {
    pub sequence: u64,
}

#[cw_serde]
pub struct BucketResponse {
    pub bucket_id: Binary,
    pub limit: Uint256,
    pub capacity: Uint256,
    pub rate_duration: u64,
    pub last_updated: u64,
}

#[cw_serde]
pub struct OutboundQueuedResponse {
    pub message_id: Binary,
    pub queued_at: u64,
    pub releasable_at: u64,
    pub untrimmed: Uint128,
    pub trimmed_amount: u64,
    pub trimmed_decimals: u8,
    pub to_chain: u16,
    pub recipient: Binary,
    pub initiator: Addr,
}

#[cw_serde]
pub struct OutboundQueueResponse {
    pub transfers: Vec<OutboundQueuedResponse>,
}

#[cw_serde]
pub struct InboundQueueResponse {
    pub transfers: Vec<InboundQueuedResponse>,
}

#[cw_serde]
pub struct InboundQueuedResponse {
    pub digest: Binary,
    pub queued_at: u64,
    pub releasable_at: u64,
    pub amount: Uint128,
    pub source_chain: u16,
    pub recipient: Addr,
}

#[cw_serde]
pub struct ScheduledChangeResponse {
    pub change: GovernanceChange,
    pub ready_at: u64,
}

#[cw_serde]
pub struct ScheduledChangesResponse {
    pub changes: Vec<ScheduledChangeResponse>,
}
