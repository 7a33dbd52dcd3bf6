//! Error types for the Transceiver Manager contract

use cosmwasm_std::{StdError, Uint128};
use ntt_messages::CodecError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Codec(#[from] CodecError),

    #[error("Unauthorized: only the handler admin can perform this action")]
    Unauthorized,

    #[error("Caller is not the message source address")]
    CallerNotSource,

    #[error("Message handler unknown: {handler}")]
    MessageHandlerUnknown { handler: String },

    #[error("Message handler is paused")]
    HandlerPaused,

    #[error("Message handler is not paused")]
    HandlerNotPaused,

    #[error("Transceiver not configured for this handler: {transceiver}")]
    TransceiverNotConfigured { transceiver: String },

    #[error("Transceiver already configured for this handler: {transceiver}")]
    TransceiverAlreadyConfigured { transceiver: String },

    #[error("Cannot configure more than {max} transceivers")]
    MaxTransceiversExceeded { max: usize },

    #[error("Instruction array is out of order or names an unknown transceiver")]
    UnorderedOrUnknownInstruction,

    #[error("Duplicate attestation from {transceiver}")]
    DuplicateAttestation { transceiver: String },

    #[error("Message already executed")]
    AlreadyExecuted,

    #[error("Threshold not met: {attestations} of {threshold} attestations")]
    ThresholdNotMet { attestations: u64, threshold: u8 },

    #[error("Incorrect fee payment: required {required}, got {got}")]
    IncorrectFeePayment { required: Uint128, got: Uint128 },

    #[error("Unsupported fee denom: {denom}")]
    UnsupportedFeeDenom { denom: String },
}
