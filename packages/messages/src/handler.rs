//! The interface spoken between the transceiver manager and message handlers.
//!
//! Once a message crosses its handler's attestation threshold, the
//! transceiver manager dispatches it to the handler wrapped in
//! [`AttestedMessage`], following the same hook pattern cw20 uses for
//! `Receive`. The handler exposes its threshold to the transceiver manager
//! through [`HandlerQueryMsg::Threshold`].

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Binary, StdResult};

/// An envelope that has met its handler's attestation threshold.
#[cw_serde]
pub struct AttestedMessage {
    /// Chain the message was attested from
    pub source_chain: u16,
    /// The encoded transceiver envelope
    pub message: Binary,
}

impl AttestedMessage {
    /// Serialize into the handler's expected execute message.
    pub fn into_json_binary(self) -> StdResult<Binary> {
        let msg = HandlerExecuteMsg::ReceiveAttestedMessage(self);
        to_json_binary(&msg)
    }
}

/// Serialization shim: handlers embed a matching variant in their own
/// `ExecuteMsg`.
#[cw_serde]
enum HandlerExecuteMsg {
    ReceiveAttestedMessage(AttestedMessage),
}

/// Queries a handler must answer for the transceiver manager.
#[cw_serde]
#[derive(QueryResponses)]
pub enum HandlerQueryMsg {
    /// The handler's current attestation threshold.
    #[returns(ThresholdResponse)]
    Threshold {},
}

#[cw_serde]
pub struct ThresholdResponse {
    pub threshold: u8,
}
