//! Query message handlers.

use cosmwasm_std::{Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;
use ntt_messages::handler::ThresholdResponse;

use crate::msg::{
    BucketResponse, BucketSelector, ConfigResponse, InboundQueueResponse, InboundQueuedResponse,
    OutboundQueueResponse, OutboundQueuedResponse, PeerResponse, PeersResponse,
    ScheduledChangeResponse, ScheduledChangesResponse, SequenceResponse, StatsResponse,
    StatusResponse,
};
use crate::rate_limit::{inbound_bucket_id, outbound_bucket_id};
use crate::state::{
    BUCKETS, CONFIG, INBOUND_QUEUE, OUTBOUND_QUEUE, PEERS, SCHEDULED_CHANGES, SEQUENCE, STATS,
};

/// Default page size for listing queries
const DEFAULT_LIMIT: u32 = 10;

/// Maximum page size for listing queries
const MAX_LIMIT: u32 = 30;

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        chain_id: config.chain_id,
        aggregator: config.aggregator,
        threshold: config.threshold,
        fee_denom: config.fee_denom,
        token: config.token.as_ref().map(|token| token.address.clone()),
        token_decimals: config.token.as_ref().map(|token| token.decimals),
    })
}

pub fn query_peer(deps: Deps, chain: u16) -> StdResult<PeerResponse> {
    let peer = PEERS
        .may_load(deps.storage, chain)?
        .ok_or_else(|| StdError::not_found("peer"))?;
    Ok(PeerResponse {
        chain,
        address: Binary::from(peer.address.to_vec()),
        decimals: peer.decimals,
    })
}

pub fn query_status(deps: Deps) -> StdResult<StatusResponse> {
    let config = CONFIG.load(deps.storage)?;
    let registered_peers = PEERS
        .keys(deps.storage, None, None, Order::Ascending)
        .count() as u32;
    Ok(StatusResponse {
        paused: config.paused,
        initialized: config.token.is_some(),
        registered_peers,
        sequence: SEQUENCE.load(deps.storage)?,
        threshold: config.threshold,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        total_outbound_transfers: stats.total_outbound_transfers,
        total_inbound_transfers: stats.total_inbound_transfers,
        total_burned: stats.total_burned,
        total_minted: stats.total_minted,
    })
}

pub fn query_peers(
    deps: Deps,
    start_after: Option<u16>,
    limit: Option<u32>,
) -> StdResult<PeersResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);
    let peers = PEERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (chain, peer) = item?;
            Ok(PeerResponse {
                chain,
                address: Binary::from(peer.address.to_vec()),
                decimals: peer.decimals,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;
    Ok(PeersResponse { peers })
}

pub fn query_sequence(deps: Deps) -> StdResult<SequenceResponse> {
    Ok(SequenceResponse {
        sequence: SEQUENCE.load(deps.storage)?,
    })
}

pub fn query_threshold(deps: Deps) -> StdResult<ThresholdResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ThresholdResponse {
        threshold: config.threshold,
    })
}

pub fn query_bucket(deps: Deps, env: Env, selector: BucketSelector) -> StdResult<BucketResponse> {
    let bucket_id = match selector {
        BucketSelector::Outbound {} => outbound_bucket_id(),
        BucketSelector::Inbound { chain } => inbound_bucket_id(chain),
    };
    let bucket = BUCKETS
        .may_load(deps.storage, &bucket_id)?
        .ok_or_else(|| StdError::not_found("bucket"))?;
    Ok(BucketResponse {
        bucket_id: Binary::from(bucket_id.to_vec()),
        limit: bucket.limit,
        capacity: bucket.capacity_at(env.block.time.seconds()),
        rate_duration: bucket.rate_duration,
        last_updated: bucket.last_tx_timestamp,
    })
}

pub fn query_outbound_queued(
    deps: Deps,
    message_id: Binary,
) -> StdResult<Option<OutboundQueuedResponse>> {
    let entry = OUTBOUND_QUEUE.may_load(deps.storage, message_id.as_slice())?;
    let Some(entry) = entry else {
        return Ok(None);
    };
    let bucket = BUCKETS
        .may_load(deps.storage, &outbound_bucket_id())?
        .ok_or_else(|| StdError::not_found("bucket"))?;
    Ok(Some(OutboundQueuedResponse {
        message_id,
        queued_at: entry.queued_at,
        releasable_at: entry.queued_at + bucket.rate_duration,
        untrimmed: entry.untrimmed,
        trimmed_amount: entry.amount.amount,
        trimmed_decimals: entry.amount.decimals,
        to_chain: entry.to_chain,
        recipient: Binary::from(entry.recipient.to_vec()),
        initiator: entry.initiator,
    }))
}

pub fn query_inbound_queued(deps: Deps, digest: Binary) -> StdResult<Option<InboundQueuedResponse>> {
    let entry = INBOUND_QUEUE.may_load(deps.storage, digest.as_slice())?;
    let Some(entry) = entry else {
        return Ok(None);
    };
    let bucket = BUCKETS
        .may_load(deps.storage, &inbound_bucket_id(entry.source_chain))?
        .ok_or_else(|| StdError::not_found("bucket"))?;
    Ok(Some(InboundQueuedResponse {
        digest,
        queued_at: entry.queued_at,
        releasable_at: entry.queued_at + bucket.rate_duration,
        amount: entry.amount,
        source_chain: entry.source_chain,
        recipient: entry.recipient,
    }))
}

pub fn query_outbound_queue(
    deps: Deps,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<OutboundQueueResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let bucket = BUCKETS
        .may_load(deps.storage, &outbound_bucket_id())?
        .ok_or_else(|| StdError::not_found("bucket"))?;
    let start = start_after
        .as_ref()
        .map(|key| Bound::exclusive(key.as_slice()));
    let transfers = OUTBOUND_QUEUE
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (message_id, entry) = item?;
            Ok(OutboundQueuedResponse {
                message_id: Binary::from(message_id),
                queued_at: entry.queued_at,
                releasable_at: entry.queued_at + bucket.rate_duration,
                untrimmed: entry.untrimmed,
                trimmed_amount: entry.amount.amount,
                trimmed_decimals: entry.amount.decimals,
                to_chain: entry.to_chain,
                recipient: Binary::from(entry.recipient.to_vec()),
                initiator: entry.initiator,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;
    Ok(OutboundQueueResponse { transfers })
}

pub fn query_inbound_queue(
    deps: Deps,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<InboundQueueResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after
        .as_ref()
        .map(|key| Bound::exclusive(key.as_slice()));
    let transfers = INBOUND_QUEUE
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (digest, entry) = item?;
            let bucket = BUCKETS
                .may_load(deps.storage, &inbound_bucket_id(entry.source_chain))?
                .ok_or_else(|| StdError::not_found("bucket"))?;
            Ok(InboundQueuedResponse {
                digest: Binary::from(digest),
                queued_at: entry.queued_at,
                releasable_at: entry.queued_at + bucket.rate_duration,
                amount: entry.amount,
                source_chain: entry.source_chain,
                recipient: entry.recipient,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;
    Ok(InboundQueueResponse { transfers })
}

pub fn query_scheduled_changes(deps: Deps) -> StdResult<ScheduledChangesResponse> {
    let changes = SCHEDULED_CHANGES
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| {
            let (_, scheduled) = item?;
            Ok(ScheduledChangeResponse {
                change: scheduled.change,
                ready_at: scheduled.ready_at,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;
    Ok(ScheduledChangesResponse { changes })
}
