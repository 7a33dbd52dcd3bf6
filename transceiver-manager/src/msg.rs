//! Message types for the Transceiver Manager contract

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};
use ntt_messages::TransceiverInstruction;

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Native denom delivery fees are paid in
    pub fee_denom: String,
}

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    /// Register the calling contract as a message handler.
    /// Idempotent: an existing registration is left untouched.
    RegisterHandler {
        /// Admin for the handler's transceiver set and pause switch
        admin: String,
    },

    /// Append a transceiver to a handler's list (handler admin only)
    AddTransceiver {
        handler: String,
        transceiver: String,
    },

    /// Remove a transceiver, preserving the order of survivors
    /// (handler admin only)
    RemoveTransceiver {
        handler: String,
        transceiver: String,
    },

    /// Pause or unpause a handler (handler admin only)
    SetHandlerPaused { handler: String, paused: bool },

    /// Fan an outbound envelope out to the caller's transceivers.
    /// The caller must be the envelope's source manager and the attached
    /// funds must equal the re-quoted delivery total exactly.
    SendMessage {
        message: Binary,
        instructions: Vec<TransceiverInstruction>,
    },

    /// Record an attestation for a received envelope.
    /// The caller must be a registered transceiver of the envelope's handler.
    AttestationReceived { source_chain: u16, message: Binary },

    /// Execute a message whose attestation count has met its handler's
    /// threshold. Anyone may call; each message executes at most once.
    ExecuteMessage { source_chain: u16, message: Binary },
}

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns a handler's registration
    #[returns(HandlerResponse)]
    Handler { handler: String },

    /// Returns registered handlers
    #[returns(HandlersResponse)]
    Handlers {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    /// Returns the attestation count for a digest
    #[returns(AttestationCountResponse)]
    MessageAttestations { digest: Binary },

    /// Returns the full attestation state for a digest
    #[returns(MessageStatusResponse)]
    MessageStatus { digest: Binary },

    /// Returns the summed delivery price over a handler's transceivers,
    /// in registration order
    #[returns(QuoteResponse)]
    QuoteDeliveryPrices {
        handler: String,
        message: Binary,
        instructions: Vec<TransceiverInstruction>,
    },

    /// Returns the digest a received envelope would be keyed under
    #[returns(DigestResponse)]
    CalculateDigest { source_chain: u16, message: Binary },
}

// Response types

#[cw_serde]
pub struct ConfigResponse {
    pub fee_denom: String,
}

#[cw_serde]
pub struct HandlerResponse {
    pub handler: Addr,
    pub admin: Addr,
    pub paused: bool,
    pub transceivers: Vec<Addr>,
}

#[cw_serde]
pub struct HandlersResponse {
    pub handlers: Vec<HandlerResponse>,
}

#[cw_serde]
pub struct AttestationCountResponse {
    pub count: u64,
}

#[cw_serde]
pub struct MessageStatusResponse {
    pub attestations: u64,
    pub executed: bool,
    pub attested_by: Vec<Addr>,
}

#[cw_serde]
pub struct QuoteResponse {
    pub total: Uint128,
}

#[cw_serde]
pub struct DigestResponse {
    pub digest: Binary,
}
