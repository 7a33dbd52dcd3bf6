//! Attestation accounting and threshold-gated execution.
//!
//! State machine per message digest:
//!
//! ```text
//! Unknown -- first attestation --> Pending
//! Pending -- attestation, count < threshold --> Pending
//! Pending -- attestation, count >= threshold --> Approved
//! Approved -- execute_message --> Executed (terminal)
//! ```
//!
//! There is no rejected state; an under-attested message stays pending
//! indefinitely.

use cosmwasm_std::{Addr, Binary, CosmosMsg, DepsMut, Event, MessageInfo, Response, WasmMsg};
use ntt_messages::envelope::{message_digest, TransceiverEnvelope};
use ntt_messages::handler::{AttestedMessage, HandlerQueryMsg, ThresholdResponse};
use ntt_messages::bytes32_to_hex;

use crate::error::ContractError;
use crate::state::{AttestationRecord, ATTESTATIONS, HANDLERS, HANDLER_BY_UNIVERSAL, TRANSCEIVERS};

/// Record one transceiver's attestation for a received envelope.
pub fn execute_attestation_received(
    deps: DepsMut,
    info: MessageInfo,
    source_chain: u16,
    message: Binary,
) -> Result<Response, ContractError> {
    let envelope = TransceiverEnvelope::decode(message.as_slice())?;
    let handler = resolve_handler(&deps, &envelope)?;

    let handler_info = HANDLERS.load(deps.storage, &handler)?;
    if handler_info.paused {
        return Err(ContractError::HandlerPaused);
    }

    let transceivers = TRANSCEIVERS.load(deps.storage, &handler)?;
    if !transceivers.contains(&info.sender) {
        return Err(ContractError::TransceiverNotConfigured {
            transceiver: info.sender.to_string(),
        });
    }

    let digest = message_digest(source_chain, &envelope);
    let mut record = ATTESTATIONS
        .may_load(deps.storage, &digest)?
        .unwrap_or(AttestationRecord {
            handler: handler.clone(),
            attested: vec![],
            executed: false,
        });

    if record.executed {
        return Err(ContractError::AlreadyExecuted);
    }
    if record.attested.contains(&info.sender) {
        return Err(ContractError::DuplicateAttestation {
            transceiver: info.sender.to_string(),
        });
    }
    record.attested.push(info.sender.clone());
    ATTESTATIONS.save(deps.storage, &digest, &record)?;

    Ok(Response::new()
        .add_event(
            Event::new("attestation_received")
                .add_attribute("message_id", bytes32_to_hex(&envelope.message.id))
                .add_attribute("source_chain", source_chain.to_string())
                .add_attribute("source_address", bytes32_to_hex(&envelope.source_manager))
                .add_attribute("handler", handler.as_str())
                .add_attribute("digest", bytes32_to_hex(&digest))
                .add_attribute("count", record.attested.len().to_string()),
        )
        .add_attribute("action", "attestation_received")
        .add_attribute("transceiver", info.sender))
}

/// Execute a message whose attestation count has met its handler's threshold.
///
/// Anyone may call. The threshold is read from the handler at call time; the
/// executed flag flips exactly once and the whole transaction reverts if the
/// handler rejects the dispatch.
pub fn execute_execute_message(
    deps: DepsMut,
    _info: MessageInfo,
    source_chain: u16,
    message: Binary,
) -> Result<Response, ContractError> {
    let envelope = TransceiverEnvelope::decode(message.as_slice())?;
    let handler = resolve_handler(&deps, &envelope)?;

    let handler_info = HANDLERS.load(deps.storage, &handler)?;
    if handler_info.paused {
        return Err(ContractError::HandlerPaused);
    }

    let threshold: ThresholdResponse = deps
        .querier
        .query_wasm_smart(&handler, &HandlerQueryMsg::Threshold {})?;

    let digest = message_digest(source_chain, &envelope);
    let mut record = ATTESTATIONS
        .may_load(deps.storage, &digest)?
        .unwrap_or(AttestationRecord {
            handler: handler.clone(),
            attested: vec![],
            executed: false,
        });

    if record.executed {
        return Err(ContractError::AlreadyExecuted);
    }
    let attestations = record.attested.len() as u64;
    if attestations < u64::from(threshold.threshold) {
        return Err(ContractError::ThresholdNotMet {
            attestations,
            threshold: threshold.threshold,
        });
    }

    record.executed = true;
    ATTESTATIONS.save(deps.storage, &digest, &record)?;

    let attested = AttestedMessage {
        source_chain,
        message,
    };
    let dispatch = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: handler.to_string(),
        msg: attested.into_json_binary()?,
        funds: vec![],
    });

    Ok(Response::new()
        .add_message(dispatch)
        .add_attribute("action", "execute_message")
        .add_attribute("handler", handler)
        .add_attribute("digest", bytes32_to_hex(&digest))
        .add_attribute("attestations", attestations.to_string()))
}

/// Resolve the envelope's recipient manager to a registered handler.
fn resolve_handler(
    deps: &DepsMut,
    envelope: &TransceiverEnvelope,
) -> Result<Addr, ContractError> {
    HANDLER_BY_UNIVERSAL
        .may_load(deps.storage, &envelope.recipient_manager)?
        .ok_or(ContractError::MessageHandlerUnknown {
            handler: bytes32_to_hex(&envelope.recipient_manager),
        })
}
