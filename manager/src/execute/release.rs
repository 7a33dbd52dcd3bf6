//! Deferred completion and cancellation of queued transfers.
//!
//! A queued transfer becomes releasable once its direction's rate window has
//! elapsed since it was queued. Completion is permissionless; cancellation of
//! an outbound entry is reserved to its initiator and undoes the deposit by
//! minting it back.

use cosmwasm_std::{Binary, DepsMut, Env, Event, MessageInfo, Response};
use ntt_messages::{bytes32_to_hex, to_universal};

use crate::error::ContractError;
use crate::execute::redeem::{mint_msg, minted_event, record_mint};
use crate::execute::transfer::{build_envelope, send_via_aggregator, transfer_sent_event};
use crate::execute::{paid_fee, parse_bytes32};
use crate::rate_limit::{inbound_bucket_id, load_bucket, outbound_bucket_id};
use crate::state::{CONFIG, INBOUND_QUEUE, OUTBOUND_QUEUE, PEERS};

/// Dispatch a queued outbound transfer after its rate window.
pub fn execute_complete_outbound_queued(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    message_id: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::Paused);
    }

    let message_id = parse_bytes32(&message_id)?;
    let entry = OUTBOUND_QUEUE
        .may_load(deps.storage, &message_id)?
        .ok_or(ContractError::QueuedTransferNotFound)?;

    let now = env.block.time.seconds();
    let bucket = load_bucket(deps.storage, &outbound_bucket_id())?;
    let releasable_at = entry.queued_at + bucket.rate_duration;
    if now < releasable_at {
        return Err(ContractError::StillQueued { releasable_at });
    }

    let peer = PEERS
        .may_load(deps.storage, entry.to_chain)?
        .ok_or(ContractError::UnknownPeerChain {
            chain: entry.to_chain,
        })?;

    let manager_universal = to_universal(deps.api, &env.contract.address)?;
    let envelope = build_envelope(
        deps.as_ref(),
        manager_universal,
        &peer,
        message_id,
        &entry.initiator,
        entry.amount,
        entry.recipient,
        entry.to_chain,
    )?;
    let message = Binary::from(envelope.encode()?);

    let fee_paid = paid_fee(&info, &config.fee_denom)?;
    let (messages, delivery_price) = send_via_aggregator(
        deps.as_ref(),
        &config,
        &env.contract.address,
        message,
        &entry.instructions,
        fee_paid,
        &info.sender,
    )?;

    OUTBOUND_QUEUE.remove(deps.storage, &message_id);

    Ok(Response::new()
        .add_messages(messages)
        .add_event(
            Event::new("outbound_transfer_deleted")
                .add_attribute("message_id", bytes32_to_hex(&message_id)),
        )
        .add_event(transfer_sent_event(
            &message_id,
            &entry.recipient,
            entry.to_chain,
            entry.untrimmed,
            delivery_price,
        ))
        .add_attribute("action", "complete_outbound_queued")
        .add_attribute("message_id", bytes32_to_hex(&message_id)))
}

/// Cancel a queued outbound transfer, minting the deposit back.
pub fn execute_cancel_outbound_queued(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    message_id: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::Paused);
    }
    let token = config.token()?;

    let message_id = parse_bytes32(&message_id)?;
    let entry = OUTBOUND_QUEUE
        .may_load(deps.storage, &message_id)?
        .ok_or(ContractError::QueuedTransferNotFound)?;

    if info.sender != entry.initiator {
        return Err(ContractError::CancellerNotInitiator);
    }

    OUTBOUND_QUEUE.remove(deps.storage, &message_id);

    Ok(Response::new()
        .add_message(mint_msg(&token.address, &entry.initiator, entry.untrimmed)?)
        .add_event(
            Event::new("outbound_transfer_deleted")
                .add_attribute("message_id", bytes32_to_hex(&message_id)),
        )
        .add_attribute("action", "cancel_outbound_queued")
        .add_attribute("message_id", bytes32_to_hex(&message_id))
        .add_attribute("initiator", entry.initiator))
}

/// Mint a queued inbound transfer after its rate window.
pub fn execute_complete_inbound_queued(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    digest: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::Paused);
    }
    let token = config.token()?;

    let digest = parse_bytes32(&digest)?;
    let entry = INBOUND_QUEUE
        .may_load(deps.storage, &digest)?
        .ok_or(ContractError::QueuedTransferNotFound)?;

    let now = env.block.time.seconds();
    let bucket = load_bucket(deps.storage, &inbound_bucket_id(entry.source_chain))?;
    let releasable_at = entry.queued_at + bucket.rate_duration;
    if now < releasable_at {
        return Err(ContractError::StillQueued { releasable_at });
    }

    INBOUND_QUEUE.remove(deps.storage, &digest);
    record_mint(deps.storage, entry.amount)?;

    Ok(Response::new()
        .add_message(mint_msg(&token.address, &entry.recipient, entry.amount)?)
        .add_event(
            Event::new("inbound_transfer_deleted")
                .add_attribute("message_digest", bytes32_to_hex(&digest)),
        )
        .add_event(minted_event(&entry.recipient, entry.amount))
        .add_attribute("action", "complete_inbound_queued")
        .add_attribute("message_digest", bytes32_to_hex(&digest)))
}
