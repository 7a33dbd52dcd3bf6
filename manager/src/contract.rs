//! NTT Manager Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers
//! - `rate_limit` - Bucket arithmetic and storage helpers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, Event, MessageInfo, Response,
    StdResult, Uint128,
};
use cw2::set_contract_version;
use ntt_messages::bytes32_to_hex;

use crate::error::ContractError;
use crate::execute::{
    execute_apply_change, execute_cancel_change, execute_cancel_outbound_queued,
    execute_complete_inbound_queued, execute_complete_outbound_queued, execute_hand_over_admin,
    execute_initialize, execute_pause, execute_receive, execute_receive_attested,
    execute_set_peer, execute_set_rate_duration, execute_set_rate_limit, execute_set_threshold,
    execute_transfer, execute_unpause,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_bucket, query_config, query_inbound_queue, query_inbound_queued, query_outbound_queue,
    query_outbound_queued, query_peer, query_peers, query_scheduled_changes, query_sequence,
    query_stats, query_status, query_threshold,
};
use crate::rate_limit::{outbound_bucket_id, RateLimitBucket};
use crate::state::{
    Config, Stats, BUCKETS, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, SEQUENCE, STATS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.threshold == 0 {
        return Err(ContractError::ZeroThreshold);
    }

    let admin = deps.api.addr_validate(&msg.admin)?;
    let aggregator = deps.api.addr_validate(&msg.aggregator)?;

    let config = Config {
        admin,
        paused: false,
        chain_id: msg.chain_id,
        aggregator,
        threshold: msg.threshold,
        fee_denom: msg.fee_denom,
        token: None,
    };
    CONFIG.save(deps.storage, &config)?;

    SEQUENCE.save(deps.storage, &0u64)?;

    STATS.save(
        deps.storage,
        &Stats {
            total_outbound_transfers: 0,
            total_inbound_transfers: 0,
            total_burned: Uint128::zero(),
            total_minted: Uint128::zero(),
        },
    )?;

    let now = env.block.time.seconds();
    let bucket_id = outbound_bucket_id();
    let bucket = RateLimitBucket::new(msg.outbound_limit, msg.rate_duration, now);
    BUCKETS.save(deps.storage, &bucket_id, &bucket)?;

    Ok(Response::new()
        .add_event(
            Event::new("bucket_added")
                .add_attribute("bucket_id", bytes32_to_hex(&bucket_id))
                .add_attribute("capacity", msg.outbound_limit.to_string())
                .add_attribute("last_updated", now.to_string()),
        )
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("chain_id", config.chain_id.to_string())
        .add_attribute("threshold", config.threshold.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Outbound transfers
        ExecuteMsg::Transfer {
            amount,
            to_chain,
            recipient,
            should_queue,
            transceiver_instructions,
        } => execute_transfer(
            deps,
            env,
            info,
            amount,
            to_chain,
            recipient,
            should_queue,
            transceiver_instructions,
        ),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, env, info, cw20_msg),

        // Inbound termination
        ExecuteMsg::ReceiveAttestedMessage(attested) => {
            execute_receive_attested(deps, env, info, attested)
        }

        // Deferred transfers
        ExecuteMsg::CompleteOutboundQueued { message_id } => {
            execute_complete_outbound_queued(deps, env, info, message_id)
        }
        ExecuteMsg::CancelOutboundQueued { message_id } => {
            execute_cancel_outbound_queued(deps, env, info, message_id)
        }
        ExecuteMsg::CompleteInboundQueued { digest } => {
            execute_complete_inbound_queued(deps, env, info, digest)
        }

        // Configuration
        ExecuteMsg::Initialize { token } => execute_initialize(deps, info, token),
        ExecuteMsg::SetPeer {
            chain,
            address,
            decimals,
            inbound_limit,
        } => execute_set_peer(deps, env, info, chain, address, decimals, inbound_limit),
        ExecuteMsg::SetRateLimit { bucket, limit } => {
            execute_set_rate_limit(deps, env, info, bucket, limit)
        }
        ExecuteMsg::SetRateDuration { bucket, duration } => {
            execute_set_rate_duration(deps, env, info, bucket, duration)
        }
        ExecuteMsg::SetThreshold { threshold } => {
            execute_set_threshold(deps, env, info, threshold)
        }

        // Governance schedule
        ExecuteMsg::HandOverAdmin { to } => execute_hand_over_admin(deps, env, info, to),
        ExecuteMsg::ApplyChange { kind } => execute_apply_change(deps, env, info, kind),
        ExecuteMsg::CancelChange { kind } => execute_cancel_change(deps, info, kind),

        // Pause
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Status {} => to_json_binary(&query_status(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::Peer { chain } => to_json_binary(&query_peer(deps, chain)?),
        QueryMsg::Peers { start_after, limit } => {
            to_json_binary(&query_peers(deps, start_after, limit)?)
        }
        QueryMsg::Sequence {} => to_json_binary(&query_sequence(deps)?),
        QueryMsg::Threshold {} => to_json_binary(&query_threshold(deps)?),
        QueryMsg::Bucket { bucket } => to_json_binary(&query_bucket(deps, env, bucket)?),
        QueryMsg::OutboundQueued { message_id } => {
            to_json_binary(&query_outbound_queued(deps, message_id)?)
        }
        QueryMsg::OutboundQueue { start_after, limit } => {
            to_json_binary(&query_outbound_queue(deps, start_after, limit)?)
        }
        QueryMsg::InboundQueued { digest } => to_json_binary(&query_inbound_queued(deps, digest)?),
        QueryMsg::InboundQueue { start_after, limit } => {
            to_json_binary(&query_inbound_queue(deps, start_after, limit)?)
        }
        QueryMsg::ScheduledChanges {} => to_json_binary(&query_scheduled_changes(deps)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
