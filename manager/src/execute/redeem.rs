//! Attested inbound message termination.
//!
//! The transceiver manager dispatches here once a message has met the
//! attestation threshold; it has already flipped the single-shot executed
//! flag. This handler is the only place an inbound payload is decoded, and
//! the peer registry is authoritative: a message whose claimed source does
//! not match the registered peer contract is rejected even though it was
//! correctly attested.

use cosmwasm_std::{
    to_json_binary, Addr, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response, Uint128, Uint256,
    WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use ntt_messages::envelope::{message_digest, TransceiverEnvelope};
use ntt_messages::transfer::NativeTokenTransfer;
use ntt_messages::{bytes32_to_hex, from_universal, to_universal, AttestedMessage};

use crate::error::ContractError;
use crate::rate_limit::{
    capacity_of, consume_bucket, fill_bucket, inbound_bucket_id, outbound_bucket_id,
};
use crate::state::{InboundQueuedTransfer, CONFIG, INBOUND_QUEUE, PEERS, STATS};

/// Execute handler for attested messages dispatched by the transceiver
/// manager.
pub fn execute_receive_attested(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    attested: AttestedMessage,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.aggregator {
        return Err(ContractError::Unauthorized);
    }
    if config.paused {
        return Err(ContractError::Paused);
    }
    let token = config.token()?.clone();

    let source_chain = attested.source_chain;
    let envelope = TransceiverEnvelope::decode(attested.message.as_slice())?;

    let peer = PEERS
        .may_load(deps.storage, source_chain)?
        .ok_or(ContractError::UnknownPeerChain {
            chain: source_chain,
        })?;
    if peer.address != envelope.source_manager {
        return Err(ContractError::EmitterAddressMismatch);
    }
    let manager_universal = to_universal(deps.api, &env.contract.address)?;
    if envelope.recipient_manager != manager_universal {
        return Err(ContractError::InvalidHandlerAddress);
    }

    let transfer = NativeTokenTransfer::read_from(&envelope.message.payload)?;
    if transfer.to_chain != config.chain_id {
        return Err(ContractError::InvalidTargetChain {
            chain: transfer.to_chain,
        });
    }

    let recipient = from_universal(deps.api, &transfer.recipient)?;
    let untrimmed = Uint128::new(transfer.amount.untrim(token.decimals)?);

    let digest = message_digest(source_chain, &envelope);
    let now = env.block.time.seconds();
    let inbound_id = inbound_bucket_id(source_chain);
    let (_, capacity) = capacity_of(deps.storage, &inbound_id, now)?;
    let requested = Uint256::from(untrimmed);

    // an inbound shortfall always queues, never fails
    if capacity < requested {
        INBOUND_QUEUE.save(
            deps.storage,
            &digest,
            &InboundQueuedTransfer {
                queued_at: now,
                amount: untrimmed,
                source_chain,
                recipient: recipient.clone(),
            },
        )?;
        return Ok(Response::new()
            .add_event(
                Event::new("inbound_transfer_rate_limited")
                    .add_attribute("recipient", recipient.as_str())
                    .add_attribute("message_digest", bytes32_to_hex(&digest))
                    .add_attribute("current_capacity", capacity.to_string())
                    .add_attribute("amount", transfer.amount.amount.to_string()),
            )
            .add_attribute("action", "execute_transfer")
            .add_attribute("queued", "true")
            .add_attribute("digest", bytes32_to_hex(&digest)));
    }

    let consumed = consume_bucket(deps.storage, &inbound_id, now, requested)?;
    let filled = fill_bucket(deps.storage, &outbound_bucket_id(), now, requested)?;

    record_mint(deps.storage, untrimmed)?;

    Ok(Response::new()
        .add_message(mint_msg(&token.address, &recipient, untrimmed)?)
        .add_event(consumed)
        .add_event(filled)
        .add_event(minted_event(&recipient, untrimmed))
        .add_attribute("action", "execute_transfer")
        .add_attribute("queued", "false")
        .add_attribute("digest", bytes32_to_hex(&digest)))
}

/// Record an inbound mint in the manager statistics.
pub(crate) fn record_mint(
    storage: &mut dyn cosmwasm_std::Storage,
    amount: Uint128,
) -> Result<(), ContractError> {
    let mut stats = STATS.load(storage)?;
    stats.total_inbound_transfers += 1;
    stats.total_minted += amount;
    STATS.save(storage, &stats)?;
    Ok(())
}

pub(crate) fn mint_msg(
    token: &Addr,
    recipient: &Addr,
    amount: Uint128,
) -> Result<CosmosMsg, ContractError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount,
        })?,
        funds: vec![],
    }))
}

pub(crate) fn minted_event(recipient: &Addr, amount: Uint128) -> Event {
    Event::new("minted")
        .add_attribute("recipient", recipient.as_str())
        .add_attribute("amount", amount.to_string())
}
