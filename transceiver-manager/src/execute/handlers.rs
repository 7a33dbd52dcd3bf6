//! Handler registration, transceiver set management and the pause switch.

use cosmwasm_std::{Addr, DepsMut, Event, MessageInfo, Response};
use ntt_messages::to_universal;

use crate::error::ContractError;
use crate::state::{HandlerInfo, HANDLERS, HANDLER_BY_UNIVERSAL, MAX_TRANSCEIVERS, TRANSCEIVERS};

/// Register the calling contract as a message handler.
///
/// Idempotent: a second registration leaves the existing record (and its
/// admin) untouched and reports `is_new: false`.
pub fn execute_register_handler(
    deps: DepsMut,
    info: MessageInfo,
    admin: String,
) -> Result<Response, ContractError> {
    let handler = info.sender;

    if HANDLERS.has(deps.storage, &handler) {
        return Ok(Response::new()
            .add_attribute("action", "register_handler")
            .add_attribute("handler", handler)
            .add_attribute("is_new", "false"));
    }

    let admin = deps.api.addr_validate(&admin)?;
    HANDLERS.save(
        deps.storage,
        &handler,
        &HandlerInfo {
            admin: admin.clone(),
            paused: false,
        },
    )?;
    TRANSCEIVERS.save(deps.storage, &handler, &vec![])?;

    let universal = to_universal(deps.api, &handler)?;
    HANDLER_BY_UNIVERSAL.save(deps.storage, &universal, &handler)?;

    Ok(Response::new()
        .add_event(
            Event::new("message_handler_added")
                .add_attribute("handler", handler.as_str())
                .add_attribute("admin", admin.as_str()),
        )
        .add_attribute("action", "register_handler")
        .add_attribute("handler", handler)
        .add_attribute("is_new", "true"))
}

/// Append a transceiver to the end of a handler's list.
pub fn execute_add_transceiver(
    deps: DepsMut,
    info: MessageInfo,
    handler: String,
    transceiver: String,
) -> Result<Response, ContractError> {
    let handler = load_handler_for_admin(&deps, &info, &handler)?;
    let transceiver = deps.api.addr_validate(&transceiver)?;

    let mut transceivers = TRANSCEIVERS.load(deps.storage, &handler)?;
    if transceivers.contains(&transceiver) {
        return Err(ContractError::TransceiverAlreadyConfigured {
            transceiver: transceiver.to_string(),
        });
    }
    if transceivers.len() >= MAX_TRANSCEIVERS {
        return Err(ContractError::MaxTransceiversExceeded {
            max: MAX_TRANSCEIVERS,
        });
    }
    transceivers.push(transceiver.clone());
    TRANSCEIVERS.save(deps.storage, &handler, &transceivers)?;

    Ok(Response::new()
        .add_attribute("action", "add_transceiver")
        .add_attribute("handler", handler)
        .add_attribute("transceiver", transceiver)
        .add_attribute("count", transceivers.len().to_string()))
}

/// Remove a transceiver from a handler's list.
///
/// The order of the surviving entries is preserved; instruction indices refer
/// to positions in this list.
pub fn execute_remove_transceiver(
    deps: DepsMut,
    info: MessageInfo,
    handler: String,
    transceiver: String,
) -> Result<Response, ContractError> {
    let handler = load_handler_for_admin(&deps, &info, &handler)?;
    let transceiver = deps.api.addr_validate(&transceiver)?;

    let mut transceivers = TRANSCEIVERS.load(deps.storage, &handler)?;
    let position = transceivers
        .iter()
        .position(|entry| *entry == transceiver)
        .ok_or(ContractError::TransceiverNotConfigured {
            transceiver: transceiver.to_string(),
        })?;
    transceivers.remove(position);
    TRANSCEIVERS.save(deps.storage, &handler, &transceivers)?;

    Ok(Response::new()
        .add_attribute("action", "remove_transceiver")
        .add_attribute("handler", handler)
        .add_attribute("transceiver", transceiver)
        .add_attribute("count", transceivers.len().to_string()))
}

/// Pause or unpause a handler.
pub fn execute_set_handler_paused(
    deps: DepsMut,
    info: MessageInfo,
    handler: String,
    paused: bool,
) -> Result<Response, ContractError> {
    let handler = load_handler_for_admin(&deps, &info, &handler)?;
    let mut handler_info = HANDLERS.load(deps.storage, &handler)?;

    if handler_info.paused == paused {
        return Err(if paused {
            ContractError::HandlerPaused
        } else {
            ContractError::HandlerNotPaused
        });
    }
    handler_info.paused = paused;
    HANDLERS.save(deps.storage, &handler, &handler_info)?;

    Ok(Response::new()
        .add_event(
            Event::new("paused")
                .add_attribute("handler", handler.as_str())
                .add_attribute("paused", paused.to_string()),
        )
        .add_attribute("action", "set_handler_paused")
        .add_attribute("handler", handler))
}

/// Resolve a handler and verify the caller is its admin.
fn load_handler_for_admin(
    deps: &DepsMut,
    info: &MessageInfo,
    handler: &str,
) -> Result<Addr, ContractError> {
    let handler = deps.api.addr_validate(handler)?;
    let handler_info = HANDLERS
        .may_load(deps.storage, &handler)?
        .ok_or(ContractError::MessageHandlerUnknown {
            handler: handler.to_string(),
        })?;
    if info.sender != handler_info.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(handler)
}
