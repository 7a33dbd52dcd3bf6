//! Error types for the NTT Manager contract

use cosmwasm_std::{StdError, Uint128, Uint256};
use ntt_messages::CodecError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Codec(#[from] CodecError),

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("No {kind} change is scheduled")]
    NoScheduledChange { kind: String },

    #[error("Change is resting until {ready_at}")]
    ChangeStillResting { ready_at: u64 },

    #[error("Only the designated recipient can claim the admin role")]
    NotHandoverRecipient,

    #[error("Manager is not initialised with a token")]
    Uninitialised,

    #[error("Manager is already initialised")]
    AlreadyInitialised,

    #[error("Manager is paused")]
    Paused,

    #[error("Manager is already paused")]
    AlreadyPaused,

    #[error("Manager is not paused")]
    NotPaused,

    #[error("Unknown peer chain: {chain}")]
    UnknownPeerChain { chain: u16 },

    #[error("Invalid peer chain: {chain}")]
    InvalidPeerChain { chain: u16 },

    #[error("Peer contract address must not be zero")]
    InvalidPeerAddress,

    #[error("Peer decimals out of range [1, 18]: {decimals}")]
    InvalidPeerDecimals { decimals: u8 },

    #[error("Token decimals out of range [1, 18]: {decimals}")]
    InvalidTokenDecimals { decimals: u8 },

    #[error("Unknown rate limit bucket: {bucket_id}")]
    UnknownBucket { bucket_id: String },

    #[error("Insufficient capacity: {capacity} available, {amount} requested")]
    InsufficientCapacity { capacity: Uint256, amount: Uint256 },

    #[error("Transfer is still queued until {releasable_at}")]
    StillQueued { releasable_at: u64 },

    #[error("Queued transfer not found")]
    QueuedTransferNotFound,

    #[error("Only the initiator can cancel a queued transfer")]
    CancellerNotInitiator,

    #[error("Message is not addressed to this chain: {chain}")]
    InvalidTargetChain { chain: u16 },

    #[error("Envelope source does not match the registered peer contract")]
    EmitterAddressMismatch,

    #[error("Envelope recipient is not this manager")]
    InvalidHandlerAddress,

    #[error("Asset deposit does not originate from the configured token")]
    UnauthorizedAssetSender,

    #[error("Amount would lose dust when trimmed: {amount}")]
    DustNotAllowed { amount: Uint128 },

    #[error("Incorrect fee payment: required {required}, got {got}")]
    IncorrectFeePayment { required: Uint128, got: Uint128 },

    #[error("Unsupported fee denom: {denom}")]
    UnsupportedFeeDenom { denom: String },

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Threshold must be greater than zero")]
    ZeroThreshold,

    #[error("Recipient address must not be zero")]
    InvalidRecipient,

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },
}
