//! Transceiver Manager Contract - Entry Points

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_add_transceiver, execute_attestation_received, execute_execute_message,
    execute_register_handler, execute_remove_transceiver, execute_send_message,
    execute_set_handler_paused,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_calculate_digest, query_config, query_handler, query_handlers,
    query_message_attestations, query_message_status, query_quote_delivery_prices,
};
use crate::state::{Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    CONFIG.save(
        deps.storage,
        &Config {
            fee_denom: msg.fee_denom.clone(),
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("fee_denom", msg.fee_denom))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RegisterHandler { admin } => execute_register_handler(deps, info, admin),
        ExecuteMsg::AddTransceiver {
            handler,
            transceiver,
        } => execute_add_transceiver(deps, info, handler, transceiver),
        ExecuteMsg::RemoveTransceiver {
            handler,
            transceiver,
        } => execute_remove_transceiver(deps, info, handler, transceiver),
        ExecuteMsg::SetHandlerPaused { handler, paused } => {
            execute_set_handler_paused(deps, info, handler, paused)
        }
        ExecuteMsg::SendMessage {
            message,
            instructions,
        } => execute_send_message(deps, info, message, instructions),
        ExecuteMsg::AttestationReceived {
            source_chain,
            message,
        } => execute_attestation_received(deps, info, source_chain, message),
        ExecuteMsg::ExecuteMessage {
            source_chain,
            message,
        } => execute_execute_message(deps, info, source_chain, message),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Handler { handler } => to_json_binary(&query_handler(deps, handler)?),
        QueryMsg::Handlers { start_after, limit } => {
            to_json_binary(&query_handlers(deps, start_after, limit)?)
        }
        QueryMsg::MessageAttestations { digest } => {
            to_json_binary(&query_message_attestations(deps, digest)?)
        }
        QueryMsg::MessageStatus { digest } => to_json_binary(&query_message_status(deps, digest)?),
        QueryMsg::QuoteDeliveryPrices {
            handler,
            message,
            instructions,
        } => to_json_binary(&query_quote_delivery_prices(
            deps,
            handler,
            message,
            instructions,
        )?),
        QueryMsg::CalculateDigest {
            source_chain,
            message,
        } => to_json_binary(&query_calculate_digest(source_chain, message)?),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
