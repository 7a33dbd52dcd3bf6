//! Admin operations handlers.
//!
//! This module handles:
//! - One-shot initialisation (token binding + handler registration)
//! - Peer registry management with inbound bucket provisioning
//! - Bucket limit and duration updates
//! - The governance schedule: security-weakening changes (admin handover,
//!   threshold decrease) rest for a mandatory period before they apply
//! - Pause/unpause
//!
//! A paused manager rejects user-facing operations but keeps accepting
//! everything in this module.

use cosmwasm_std::{
    to_json_binary, Binary, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response, Storage,
    Uint256, WasmMsg,
};
use cw20::{Cw20QueryMsg, TokenInfoResponse};
use ntt_messages::{bytes32_to_hex, is_zero_address};
use transceiver_manager::msg::ExecuteMsg as AggregatorExecuteMsg;

use crate::error::ContractError;
use crate::execute::{ensure_admin, parse_bytes32};
use crate::msg::BucketSelector;
use crate::rate_limit::{inbound_bucket_id, load_bucket, outbound_bucket_id, RateLimitBucket};
use crate::state::{
    ChangeKind, GovernanceChange, Peer, ScheduledChange, TokenConfig, BUCKETS, CONFIG, PEERS,
    SCHEDULED_CHANGES,
};

// ============================================================================
// Initialisation
// ============================================================================

/// Bind the NTT token and register this manager with the transceiver
/// manager. One-shot; user-facing operations fail until this has run.
pub fn execute_initialize(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;
    if config.token.is_some() {
        return Err(ContractError::AlreadyInitialised);
    }

    let address = deps.api.addr_validate(&token)?;
    let token_info: TokenInfoResponse = deps
        .querier
        .query_wasm_smart(&address, &Cw20QueryMsg::TokenInfo {})?;
    if !(1..=18).contains(&token_info.decimals) {
        return Err(ContractError::InvalidTokenDecimals {
            decimals: token_info.decimals,
        });
    }

    config.token = Some(TokenConfig {
        address: address.clone(),
        decimals: token_info.decimals,
    });
    CONFIG.save(deps.storage, &config)?;

    let register = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.aggregator.to_string(),
        msg: to_json_binary(&AggregatorExecuteMsg::RegisterHandler {
            admin: config.admin.to_string(),
        })?,
        funds: vec![],
    });

    Ok(Response::new()
        .add_message(register)
        .add_attribute("action", "initialize")
        .add_attribute("token", address)
        .add_attribute("token_decimals", token_info.decimals.to_string()))
}

// ============================================================================
// Peer Registry
// ============================================================================

/// Create or replace a peer registry entry.
///
/// The local chain must not be its own peer and the peer contract must not
/// be zero. A first registration provisions the peer's inbound bucket; an
/// override adjusts its limit in place.
pub fn execute_set_peer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    chain: u16,
    address: Binary,
    decimals: u8,
    inbound_limit: Uint256,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    if chain == config.chain_id {
        return Err(ContractError::InvalidPeerChain { chain });
    }
    let address = parse_bytes32(&address)?;
    if is_zero_address(&address) {
        return Err(ContractError::InvalidPeerAddress);
    }
    if !(1..=18).contains(&decimals) {
        return Err(ContractError::InvalidPeerDecimals { decimals });
    }

    let now = env.block.time.seconds();
    let is_new = !PEERS.has(deps.storage, chain);
    PEERS.save(deps.storage, chain, &Peer { address, decimals })?;

    let bucket_id = inbound_bucket_id(chain);
    let bucket_event = if is_new {
        // a new peer's inbound bucket inherits the outbound refill window
        let outbound = load_bucket(deps.storage, &outbound_bucket_id())?;
        let bucket = RateLimitBucket::new(inbound_limit, outbound.rate_duration, now);
        BUCKETS.save(deps.storage, &bucket_id, &bucket)?;
        Event::new("bucket_added")
            .add_attribute("bucket_id", bytes32_to_hex(&bucket_id))
            .add_attribute("capacity", inbound_limit.to_string())
            .add_attribute("last_updated", now.to_string())
    } else {
        let mut bucket = load_bucket(deps.storage, &bucket_id)?;
        bucket.set_limit(now, inbound_limit);
        BUCKETS.save(deps.storage, &bucket_id, &bucket)?;
        Event::new("bucket_rate_limit_updated")
            .add_attribute("bucket_id", bytes32_to_hex(&bucket_id))
            .add_attribute("new_limit", inbound_limit.to_string())
    };

    Ok(Response::new()
        .add_event(bucket_event)
        .add_event(
            Event::new("ntt_manager_peer_set")
                .add_attribute("chain", chain.to_string())
                .add_attribute("peer", bytes32_to_hex(&address))
                .add_attribute("decimals", decimals.to_string())
                .add_attribute("is_new", is_new.to_string()),
        )
        .add_attribute("action", "set_peer")
        .add_attribute("chain", chain.to_string()))
}

// ============================================================================
// Rate Limit Configuration
// ============================================================================

fn resolve_bucket_id(bucket: &BucketSelector) -> [u8; 32] {
    match bucket {
        BucketSelector::Outbound {} => outbound_bucket_id(),
        BucketSelector::Inbound { chain } => inbound_bucket_id(*chain),
    }
}

/// Update a bucket's limit, preserving how much is already consumed.
pub fn execute_set_rate_limit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    selector: BucketSelector,
    limit: Uint256,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let bucket_id = resolve_bucket_id(&selector);
    let now = env.block.time.seconds();
    let mut bucket = load_bucket(deps.storage, &bucket_id)?;
    bucket.set_limit(now, limit);
    BUCKETS.save(deps.storage, &bucket_id, &bucket)?;

    Ok(Response::new()
        .add_event(
            Event::new("bucket_rate_limit_updated")
                .add_attribute("bucket_id", bytes32_to_hex(&bucket_id))
                .add_attribute("new_limit", limit.to_string()),
        )
        .add_attribute("action", "set_rate_limit"))
}

/// Update a bucket's refill window.
pub fn execute_set_rate_duration(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    selector: BucketSelector,
    duration: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let bucket_id = resolve_bucket_id(&selector);
    let now = env.block.time.seconds();
    let mut bucket = load_bucket(deps.storage, &bucket_id)?;
    bucket.set_duration(now, duration);
    BUCKETS.save(deps.storage, &bucket_id, &bucket)?;

    Ok(Response::new()
        .add_event(
            Event::new("bucket_rate_duration_updated")
                .add_attribute("bucket_id", bytes32_to_hex(&bucket_id))
                .add_attribute("new_duration", duration.to_string()),
        )
        .add_attribute("action", "set_rate_duration"))
}

// ============================================================================
// Governance Schedule
// ============================================================================

/// Put a security-weakening change on the governance schedule.
///
/// Rescheduling a change of the same kind replaces it and restarts its rest
/// period.
fn schedule_change(
    storage: &mut dyn Storage,
    now: u64,
    change: GovernanceChange,
) -> Result<Response, ContractError> {
    let kind = change.kind();
    let scheduled = ScheduledChange {
        ready_at: now + change.rest_period(),
        change,
    };
    SCHEDULED_CHANGES.save(storage, kind.as_str(), &scheduled)?;

    Ok(Response::new()
        .add_attribute("action", "schedule_change")
        .add_attribute("kind", kind.as_str())
        .add_attribute("ready_at", scheduled.ready_at.to_string()))
}

/// Update the attestation threshold.
///
/// Raising the bar needs no notice and applies immediately, clearing any
/// scheduled decrease. Lowering it would retroactively approve in-flight
/// messages, so a decrease only enters the governance schedule.
pub fn execute_set_threshold(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    threshold: u8,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;
    if threshold == 0 {
        return Err(ContractError::ZeroThreshold);
    }

    if threshold >= config.threshold {
        config.threshold = threshold;
        CONFIG.save(deps.storage, &config)?;
        SCHEDULED_CHANGES.remove(deps.storage, ChangeKind::ThresholdDecrease.as_str());
        return Ok(Response::new()
            .add_event(
                Event::new("threshold_updated")
                    .add_attribute("new_threshold", threshold.to_string()),
            )
            .add_attribute("action", "set_threshold"));
    }

    let now = env.block.time.seconds();
    let response = schedule_change(
        deps.storage,
        now,
        GovernanceChange::ThresholdDecrease { threshold },
    )?;
    Ok(response.add_attribute("threshold", threshold.to_string()))
}

/// Schedule handing the admin role to a new address.
///
/// The current admin keeps the role through the rest period; the recipient
/// claims it afterwards with `ApplyChange`.
pub fn execute_hand_over_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    to: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let to = deps.api.addr_validate(&to)?;
    let now = env.block.time.seconds();
    let response = schedule_change(
        deps.storage,
        now,
        GovernanceChange::AdminHandover { to: to.clone() },
    )?;
    Ok(response.add_attribute("to", to))
}

/// Apply a scheduled change once its rest period has elapsed.
///
/// An admin handover is claimed by its designated recipient; a threshold
/// decrease is applied by the admin.
pub fn execute_apply_change(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    kind: ChangeKind,
) -> Result<Response, ContractError> {
    let scheduled = SCHEDULED_CHANGES
        .may_load(deps.storage, kind.as_str())?
        .ok_or_else(|| ContractError::NoScheduledChange {
            kind: kind.as_str().to_string(),
        })?;
    if env.block.time.seconds() < scheduled.ready_at {
        return Err(ContractError::ChangeStillResting {
            ready_at: scheduled.ready_at,
        });
    }

    let mut config = CONFIG.load(deps.storage)?;
    let response = match scheduled.change {
        GovernanceChange::AdminHandover { to } => {
            if info.sender != to {
                return Err(ContractError::NotHandoverRecipient);
            }
            config.admin = to.clone();
            Response::new()
                .add_attribute("action", "apply_change")
                .add_attribute("kind", kind.as_str())
                .add_attribute("new_admin", to)
        }
        GovernanceChange::ThresholdDecrease { threshold } => {
            ensure_admin(&config, &info)?;
            config.threshold = threshold;
            Response::new()
                .add_event(
                    Event::new("threshold_updated")
                        .add_attribute("new_threshold", threshold.to_string()),
                )
                .add_attribute("action", "apply_change")
                .add_attribute("kind", kind.as_str())
        }
    };
    CONFIG.save(deps.storage, &config)?;
    SCHEDULED_CHANGES.remove(deps.storage, kind.as_str());

    Ok(response)
}

/// Take a scheduled change off the governance schedule.
pub fn execute_cancel_change(
    deps: DepsMut,
    info: MessageInfo,
    kind: ChangeKind,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    if !SCHEDULED_CHANGES.has(deps.storage, kind.as_str()) {
        return Err(ContractError::NoScheduledChange {
            kind: kind.as_str().to_string(),
        });
    }
    SCHEDULED_CHANGES.remove(deps.storage, kind.as_str());

    Ok(Response::new()
        .add_attribute("action", "cancel_change")
        .add_attribute("kind", kind.as_str()))
}

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the manager (stops all user-facing operations).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;
    if config.paused {
        return Err(ContractError::AlreadyPaused);
    }

    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_event(Event::new("paused").add_attribute("paused", "true"))
        .add_attribute("action", "pause"))
}

/// Unpause the manager.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;
    if !config.paused {
        return Err(ContractError::NotPaused);
    }

    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_event(Event::new("paused").add_attribute("paused", "false"))
        .add_attribute("action", "unpause"))
}

