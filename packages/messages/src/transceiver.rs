//! The interface spoken between the transceiver manager and individual
//! transceivers.
//!
//! Transceivers are interchangeable: the transceiver manager knows nothing of
//! their internals beyond this execute/query surface. Instructions are
//! per-transceiver opaque payloads addressed by the transceiver's position in
//! the handler's registration-ordered list.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Uint128};

/// An opaque instruction for the transceiver at `index` in the handler's
/// transceiver list.
#[cw_serde]
pub struct TransceiverInstruction {
    /// Position of the addressed transceiver in registration order
    pub index: u8,
    /// Transceiver-specific payload
    pub payload: Binary,
}

/// Execute interface every transceiver implements.
#[cw_serde]
pub enum TransceiverExecuteMsg {
    /// Dispatch an outbound envelope. The attached funds are this
    /// transceiver's quoted delivery fee.
    SendMessage {
        message: Binary,
        instruction: Option<Binary>,
    },
}

/// Query interface every transceiver implements.
#[cw_serde]
#[derive(QueryResponses)]
pub enum TransceiverQueryMsg {
    /// Quote the delivery fee for an envelope.
    #[returns(DeliveryPriceResponse)]
    DeliveryPrice {
        message: Binary,
        instruction: Option<Binary>,
    },
}

#[cw_serde]
pub struct DeliveryPriceResponse {
    pub price: Uint128,
}
